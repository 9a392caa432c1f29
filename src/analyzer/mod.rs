pub mod analyzer_error;
pub use analyzer_error::*;

pub mod column_path;
pub use column_path::*;

pub mod write_context;
pub use write_context::*;

pub mod write_compat;
pub use write_compat::*;

pub mod resolvers;
pub use resolvers::*;
