// SQL 모듈 진입점
pub mod executor;
pub mod parser;
pub mod query;


pub use executor::{
    DistinctOperator, FilterOperator, Group, LimitOperator, NestedLoopJoinOperator,
    PhysicalOperator, Predicate, ProjectionOperator, SortOperator, TableScanOperator,
    build_select_pipeline, collect_rows, evaluate, group_and_aggregate, project_groups,
};
pub use parser::SqlParser;
pub use query::{
    AggregateCall, AggregateFunction, Clause, CompareOp, Condition, DeleteQuery, InsertQuery,
    JoinSpec, JoinType, OrderByField, QualifiedField, SelectItem, SelectQuery, SortDirection,
    Statement, WhereClause,
};
