//! SELECT pipeline assembly
//!
//! ```text
//! TableScan(base) ─┬─ NestedLoopJoin ── Filter ── Sort ── Projection ── Distinct ── Limit
//! TableScan(join) ─┘
//! ```
//!
//! ORDER BY runs on the filtered rows before grouping; grouped output keeps that order
//! through group discovery.

use crate::error::{TabqlError, TabqlResult};
use crate::sql::executor::Predicate;
use crate::sql::executor::operators::{
    DistinctOperator, FilterOperator, LimitOperator, NestedLoopJoinOperator, PhysicalOperator,
    ProjectionOperator, SortOperator, TableScanOperator,
};
use crate::sql::query::SelectQuery;
use crate::table::Table;

/// Build the operator tree for `query` over already loaded tables.
///
/// `join` must be present exactly when the query has a JOIN clause.
pub fn build_select_pipeline(
    query: &SelectQuery,
    base: Table,
    join: Option<Table>,
) -> TabqlResult<Box<dyn PhysicalOperator>> {
    let base_columns = base.columns().to_vec();
    let mut plan: Box<dyn PhysicalOperator> =
        Box::new(TableScanOperator::new(query.table.clone(), base.into_rows()));

    match (&query.join, join) {
        (Some(spec), Some(join_table)) => {
            let join_columns = join_table.columns().to_vec();
            let probe = Box::new(TableScanOperator::new(
                spec.table.clone(),
                join_table.into_rows(),
            ));
            plan = Box::new(NestedLoopJoinOperator::new(
                plan,
                probe,
                query.table.clone(),
                spec.clone(),
                base_columns,
                join_columns,
            ));
        }
        (None, None) => {}
        (Some(spec), None) => {
            return Err(TabqlError::SqlExecution {
                message: format!("join table '{}' was not loaded", spec.table),
                context: "build_select_pipeline".to_string(),
            });
        }
        (None, Some(_)) => {
            return Err(TabqlError::SqlExecution {
                message: "join table supplied for a query without JOIN".to_string(),
                context: "build_select_pipeline".to_string(),
            });
        }
    }

    if let Some(condition) = &query.filter {
        plan = Box::new(FilterOperator::new(plan, Predicate::compile(condition)?));
    }

    if !query.order_by.is_empty() {
        plan = Box::new(SortOperator::new(plan, query.order_by.clone()));
    }

    plan = Box::new(ProjectionOperator::new(
        plan,
        query.group_by.clone(),
        query.fields.clone(),
        query.is_grouped(),
    ));

    if query.distinct {
        plan = Box::new(DistinctOperator::new(plan));
    }

    // 음수 LIMIT은 무제한
    if let Some(count) = query.limit.and_then(|n| usize::try_from(n).ok()) {
        plan = Box::new(LimitOperator::new(plan, count));
    }

    Ok(plan)
}
