pub mod data_type;
pub use data_type::*;

pub mod struct_field;
pub use struct_field::*;

pub mod attribute;
pub use attribute::*;

pub mod char_varchar;
pub use char_varchar::*;

pub mod cast_rules;
pub use cast_rules::*;

/// Free-form column metadata, kept as a JSON object.
pub type Metadata = serde_json::Map<String, serde_json::Value>;
