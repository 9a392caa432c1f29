use serde::{Deserialize, Serialize};

use crate::schema::StructField;

/// Type of a column or of a nested value.
///
/// Scalars are leaves; `Struct`, `Array` and `Map` nest other types. The tree
/// is always finite. `Char` and `Varchar` are strings with a length limit that
/// is enforced on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// Type of an untyped `NULL`.
    Null,
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal { precision: u8, scale: u8 },
    String,
    Char { length: u32 },
    Varchar { length: u32 },
    Binary,
    Date,
    /// Timestamp with session time zone.
    Timestamp,
    /// Timestamp without time zone.
    TimestampNtz,
    Struct { fields: Vec<StructField> },
    Array { element_type: Box<DataType>, contains_null: bool },
    /// Map keys are never null.
    Map { key_type: Box<DataType>, value_type: Box<DataType>, value_contains_null: bool },
}

impl DataType {
    pub fn decimal(precision: u8, scale: u8) -> Self {
        DataType::Decimal { precision, scale }
    }

    pub fn array(element_type: DataType, contains_null: bool) -> Self {
        DataType::Array { element_type: Box::new(element_type), contains_null }
    }

    pub fn map(key_type: DataType, value_type: DataType, value_contains_null: bool) -> Self {
        DataType::Map {
            key_type: Box::new(key_type),
            value_type: Box::new(value_type),
            value_contains_null,
        }
    }

    pub fn structure(fields: Vec<StructField>) -> Self {
        DataType::Struct { fields }
    }

    pub fn is_integral(&self) -> bool {
        matches!(self, DataType::Byte | DataType::Short | DataType::Int | DataType::Long)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integral() || matches!(self, DataType::Float | DataType::Double | DataType::Decimal { .. })
    }

    pub fn is_string_like(&self) -> bool {
        matches!(self, DataType::String | DataType::Char { .. } | DataType::Varchar { .. })
    }

    /// Scalar types other than `Null`.
    pub fn is_atomic(&self) -> bool {
        !matches!(self, DataType::Null | DataType::Struct { .. } | DataType::Array { .. } | DataType::Map { .. })
    }

    /// Decimal wide enough to hold every value of an integral type.
    pub fn integral_as_decimal(&self) -> Option<(u8, u8)> {
        match self {
            DataType::Byte => Some((3, 0)),
            DataType::Short => Some((5, 0)),
            DataType::Int => Some((10, 0)),
            DataType::Long => Some((20, 0)),
            _ => None,
        }
    }

    /// True when this type, or any type nested in it, is integral or decimal.
    pub fn contains_integral_or_decimal(&self) -> bool {
        match self {
            DataType::Decimal { .. } => true,
            t if t.is_integral() => true,
            DataType::Array { element_type, .. } => element_type.contains_integral_or_decimal(),
            DataType::Map { key_type, value_type, .. } => {
                key_type.contains_integral_or_decimal() || value_type.contains_integral_or_decimal()
            }
            DataType::Struct { fields } => fields.iter().any(|f| f.data_type.contains_integral_or_decimal()),
            _ => false,
        }
    }

    /// Structural equality that ignores nullability flags and metadata.
    /// Struct field names are compared with the session's case sensitivity.
    pub fn same_type(&self, other: &DataType, case_sensitive: bool) -> bool {
        match (self, other) {
            (
                DataType::Array { element_type: left, .. },
                DataType::Array { element_type: right, .. },
            ) => left.same_type(right, case_sensitive),
            (
                DataType::Map { key_type: lk, value_type: lv, .. },
                DataType::Map { key_type: rk, value_type: rv, .. },
            ) => lk.same_type(rk, case_sensitive) && lv.same_type(rv, case_sensitive),
            (DataType::Struct { fields: left }, DataType::Struct { fields: right }) => {
                left.len() == right.len()
                    && left.iter().zip(right).all(|(l, r)| {
                        let names = if case_sensitive {
                            l.name == r.name
                        } else {
                            l.name.to_lowercase() == r.name.to_lowercase()
                        };
                        names && l.data_type.same_type(&r.data_type, case_sensitive)
                    })
            }
            (left, right) => left == right,
        }
    }

    /// SQL-ish rendering used in diagnostics, e.g. `array<decimal(10,2)>`.
    pub fn catalog_string(&self) -> String {
        match self {
            DataType::Null => "void".to_string(),
            DataType::Boolean => "boolean".to_string(),
            DataType::Byte => "tinyint".to_string(),
            DataType::Short => "smallint".to_string(),
            DataType::Int => "int".to_string(),
            DataType::Long => "bigint".to_string(),
            DataType::Float => "float".to_string(),
            DataType::Double => "double".to_string(),
            DataType::Decimal { precision, scale } => format!("decimal({},{})", precision, scale),
            DataType::String => "string".to_string(),
            DataType::Char { length } => format!("char({})", length),
            DataType::Varchar { length } => format!("varchar({})", length),
            DataType::Binary => "binary".to_string(),
            DataType::Date => "date".to_string(),
            DataType::Timestamp => "timestamp".to_string(),
            DataType::TimestampNtz => "timestamp_ntz".to_string(),
            DataType::Struct { fields } => {
                let inner: Vec<String> = fields
                    .iter()
                    .map(|f| format!("{}:{}", f.name, f.data_type.catalog_string()))
                    .collect();
                format!("struct<{}>", inner.join(","))
            }
            DataType::Array { element_type, .. } => format!("array<{}>", element_type.catalog_string()),
            DataType::Map { key_type, value_type, .. } => {
                format!("map<{},{}>", key_type.catalog_string(), value_type.catalog_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_string_renders_nested_types() {
        let ty = DataType::structure(vec![
            StructField::new("a", DataType::Int, false),
            StructField::new("b", DataType::array(DataType::decimal(10, 2), true), true),
        ]);
        assert_eq!(ty.catalog_string(), "struct<a:int,b:array<decimal(10,2)>>");
        assert_eq!(DataType::map(DataType::String, DataType::Long, true).catalog_string(), "map<string,bigint>");
    }

    #[test]
    fn same_type_ignores_nullability() {
        let left = DataType::array(DataType::Int, true);
        let right = DataType::array(DataType::Int, false);
        assert!(left.same_type(&right, true));
        assert_ne!(left, right);
    }

    #[test]
    fn same_type_field_names_follow_case_sensitivity() {
        let left = DataType::structure(vec![StructField::new("A", DataType::Int, true)]);
        let right = DataType::structure(vec![StructField::new("a", DataType::Int, false)]);
        assert!(left.same_type(&right, false));
        assert!(!left.same_type(&right, true));
    }

    #[test]
    fn contains_integral_or_decimal_looks_through_nesting() {
        assert!(DataType::Int.contains_integral_or_decimal());
        assert!(DataType::map(DataType::String, DataType::decimal(5, 1), true).contains_integral_or_decimal());
        assert!(!DataType::array(DataType::Double, true).contains_integral_or_decimal());
        let nested = DataType::structure(vec![
            StructField::new("s", DataType::String, true),
            StructField::new("n", DataType::array(DataType::Short, false), true),
        ]);
        assert!(nested.contains_integral_or_decimal());
    }

    #[test]
    fn deserializes_from_json() {
        let ty: DataType = serde_json::from_str(r#"{ "array": { "element_type": "int", "contains_null": false } }"#).unwrap();
        assert_eq!(ty, DataType::array(DataType::Int, false));
    }
}
