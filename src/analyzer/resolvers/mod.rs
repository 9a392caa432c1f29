pub mod field_resolver;
pub use field_resolver::*;

pub mod column_resolver;
pub use column_resolver::*;

pub mod struct_resolver;
pub use struct_resolver::*;

pub mod array_resolver;
pub use array_resolver::*;

pub mod map_resolver;
pub use map_resolver::*;

pub mod overflow_resolver;
pub use overflow_resolver::*;

pub mod output_resolver;
pub use output_resolver::*;
