//! Physical Operators Module

mod distinct;
mod filter;
mod join;
mod limit;
mod physical_operator;
mod projection;
mod sort;
mod table_scan;

pub use distinct::DistinctOperator;
pub use filter::FilterOperator;
pub use join::NestedLoopJoinOperator;
pub use limit::LimitOperator;
pub use physical_operator::{PhysicalOperator, collect_rows};
pub use projection::ProjectionOperator;
pub use sort::SortOperator;
pub use table_scan::TableScanOperator;
