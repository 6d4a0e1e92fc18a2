//! Database Engine Module

pub mod config;
pub mod constructors;
pub mod crud;
pub mod database;
pub mod sql_interface;

pub use config::EngineConfig;
pub use database::Database;
pub use sql_interface::QueryOutput;
