//! Sort Operator — ORDER BY clause handling

use crate::error::TabqlResult;
use crate::sql::executor::operators::PhysicalOperator;
use crate::sql::query::{OrderByField, SortDirection};
use crate::table::{Row, Value};
use std::cmp::Ordering;

/// Sort 연산자 (ORDER BY) — 안정 정렬, 다중 키
///
/// 키 순서는 null(없는 필드 포함) < 숫자 < 텍스트. 숫자끼리는 숫자 비교, 텍스트끼리는 텍스트 비교.
pub struct SortOperator {
    input: Box<dyn PhysicalOperator>,
    order_by: Vec<OrderByField>,
    /// Materialized sorted result (sort requires all data)
    sorted: Option<Vec<Row>>,
    emitted: bool,
}

impl SortOperator {
    pub fn new(input: Box<dyn PhysicalOperator>, order_by: Vec<OrderByField>) -> Self {
        Self {
            input,
            order_by,
            sorted: None,
            emitted: false,
        }
    }

    /// Materialize all input batches into one sorted batch.
    fn materialize(&mut self) -> TabqlResult<()> {
        let mut rows = Vec::new();
        while let Some(batch) = self.input.next()? {
            rows.extend(batch);
        }

        rows.sort_by(|a, b| compare_rows(a, b, &self.order_by));
        tracing::debug!(target: "executor", rows = rows.len(), keys = self.order_by.len(), "sorted");

        self.sorted = if rows.is_empty() { None } else { Some(rows) };
        Ok(())
    }
}

static NULL: Value = Value::Null;

fn compare_rows(a: &Row, b: &Row, order_by: &[OrderByField]) -> Ordering {
    for key in order_by {
        let left = a.get(&key.field).unwrap_or(&NULL);
        let right = b.get(&key.field).unwrap_or(&NULL);
        let ordering = match key.direction {
            SortDirection::Asc => left.sort_cmp(right),
            SortDirection::Desc => right.sort_cmp(left),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

impl PhysicalOperator for SortOperator {
    fn next(&mut self) -> TabqlResult<Option<Vec<Row>>> {
        if self.sorted.is_none() && !self.emitted {
            self.materialize()?;
        }

        if self.emitted {
            return Ok(None);
        }

        self.emitted = true;
        Ok(self.sorted.take())
    }

    fn reset(&mut self) -> TabqlResult<()> {
        self.sorted = None;
        self.emitted = false;
        self.input.reset()
    }
}
