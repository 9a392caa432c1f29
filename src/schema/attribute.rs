use serde::{Deserialize, Serialize};

use crate::schema::{CharVarchar, DataType, Metadata};

/// A named, typed column: a target table column or a direct reference to a
/// column produced by a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Attribute {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self { name: name.into(), data_type, nullable, metadata: Metadata::new() }
    }

    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self { name: name.into(), ..self.clone() }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Declared type including any `char`/`varchar` limit recorded in metadata.
    pub fn raw_type(&self) -> DataType {
        CharVarchar::raw_type(&self.data_type, &self.metadata)
    }
}
