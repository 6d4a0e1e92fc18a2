//! SQL Query Executor Module

pub mod aggregate;
pub mod operators;
pub mod pipeline;
pub mod predicate;

pub use aggregate::{Group, aggregate, group_and_aggregate, project_groups};
pub use operators::{
    DistinctOperator, FilterOperator, LimitOperator, NestedLoopJoinOperator, PhysicalOperator,
    ProjectionOperator, SortOperator, TableScanOperator, collect_rows,
};
pub use pipeline::build_select_pipeline;
pub use predicate::{Predicate, evaluate};
