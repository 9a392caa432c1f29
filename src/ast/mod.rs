pub mod expression;
pub use expression::*;

pub mod named_expression;
pub use named_expression::*;
