pub mod config;
pub use config::{Config, StoreAssignmentPolicy};

pub mod schema;
pub use schema::{Attribute, DataType, Metadata, StructField};

pub mod ast;

pub mod planner;
pub use planner::LogicalPlan;

pub mod analyzer;
pub use analyzer::{AnalyzerError, OutputResolver, OverflowResolver};
