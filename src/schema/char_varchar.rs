use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::{
    ast::{Alias, Expression, Lambda, LambdaVariable, LengthLimit, NamedExpression},
    schema::{DataType, Metadata, StructField},
};

/// Metadata key holding the declared `char(n)`/`varchar(n)` type of a column
/// whose base type is `string`.
pub const CHAR_VARCHAR_TYPE_STRING: &str = "__CHAR_VARCHAR_TYPE_STRING";

static RAW_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(char|varchar)\s*\(\s*(\d+)\s*\)\s*$").expect("valid char/varchar pattern")
});

/// Helpers for length-limited string types.
pub struct CharVarchar;

impl CharVarchar {
    /// Parse `char(n)` or `varchar(n)`.
    pub fn parse_raw_type(text: &str) -> Option<DataType> {
        let caps = RAW_TYPE.captures(text)?;
        let length = caps.get(2)?.as_str().parse::<u32>().ok()?;
        match caps.get(1)?.as_str().to_ascii_lowercase().as_str() {
            "char" => Some(DataType::Char { length }),
            "varchar" => Some(DataType::Varchar { length }),
            _ => None,
        }
    }

    /// Declared type of a column, taking an out-of-band limit from `metadata`
    /// when the base type is a plain string.
    pub fn raw_type(data_type: &DataType, metadata: &Metadata) -> DataType {
        if *data_type == DataType::String
            && let Some(Value::String(text)) = metadata.get(CHAR_VARCHAR_TYPE_STRING)
            && let Some(raw) = Self::parse_raw_type(text)
        {
            return raw;
        }
        data_type.clone()
    }

    pub fn has_char_varchar(data_type: &DataType) -> bool {
        match data_type {
            DataType::Char { .. } | DataType::Varchar { .. } => true,
            DataType::Array { element_type, .. } => Self::has_char_varchar(element_type),
            DataType::Map { key_type, value_type, .. } => {
                Self::has_char_varchar(key_type) || Self::has_char_varchar(value_type)
            }
            DataType::Struct { fields } => fields.iter().any(|f| Self::has_char_varchar(&f.data_type)),
            _ => false,
        }
    }

    pub fn replace_char_varchar_with_string(data_type: &DataType) -> DataType {
        match data_type {
            DataType::Char { .. } | DataType::Varchar { .. } => DataType::String,
            DataType::Array { element_type, contains_null } => {
                DataType::array(Self::replace_char_varchar_with_string(element_type), *contains_null)
            }
            DataType::Map { key_type, value_type, value_contains_null } => DataType::map(
                Self::replace_char_varchar_with_string(key_type),
                Self::replace_char_varchar_with_string(value_type),
                *value_contains_null,
            ),
            DataType::Struct { fields } => DataType::structure(
                fields
                    .iter()
                    .map(|f| StructField {
                        data_type: Self::replace_char_varchar_with_string(&f.data_type),
                        ..f.clone()
                    })
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Wrap `expr` so that every `char`/`varchar` leaf of `raw_type` is length
    /// checked on write. Parts of the value without a limit are left as is.
    pub fn string_length_check(expr: Expression, raw_type: &DataType) -> Expression {
        match raw_type {
            DataType::Char { length } => Expression::StringLengthCheck { child: Box::new(expr), limit: LengthLimit::Char(*length) },
            DataType::Varchar { length } => {
                Expression::StringLengthCheck { child: Box::new(expr), limit: LengthLimit::Varchar(*length) }
            }
            DataType::Struct { fields } if Self::has_char_varchar(raw_type) => {
                let nullable = expr.nullable();
                let source = if nullable { Expression::known_not_null(expr.clone()) } else { expr.clone() };
                let members = fields
                    .iter()
                    .enumerate()
                    .map(|(ordinal, field)| {
                        let extracted = Expression::GetStructField {
                            child: Box::new(source.clone()),
                            ordinal,
                            name: field.name.clone(),
                        };
                        NamedExpression::Alias(Alias::new(
                            Self::string_length_check(extracted, &field.data_type),
                            field.name.clone(),
                        ))
                    })
                    .collect();
                let rebuilt = Expression::CreateStruct(members);
                if nullable {
                    let null_struct = Expression::NullLiteral(Self::replace_char_varchar_with_string(raw_type));
                    Expression::if_else(Expression::is_null(expr), null_struct, rebuilt)
                } else {
                    rebuilt
                }
            }
            DataType::Array { element_type, contains_null } if Self::has_char_varchar(element_type) => {
                let function = Self::element_check("element", element_type, *contains_null);
                Expression::array_transform(expr, function)
            }
            DataType::Map { key_type, value_type, value_contains_null } if Self::has_char_varchar(raw_type) => {
                let keys = Expression::array_transform(
                    Expression::MapKeys(Box::new(expr.clone())),
                    Self::element_check("key", key_type, false),
                );
                let values = Expression::array_transform(
                    Expression::MapValues(Box::new(expr)),
                    Self::element_check("value", value_type, *value_contains_null),
                );
                Expression::MapFromArrays { keys: Box::new(keys), values: Box::new(values) }
            }
            _ => expr,
        }
    }

    fn element_check(name: &str, raw_type: &DataType, nullable: bool) -> Lambda {
        let param = LambdaVariable::new(name, Self::replace_char_varchar_with_string(raw_type), nullable);
        let body = Self::string_length_check(NamedExpression::Variable(param.clone()).into_expr(), raw_type);
        Lambda::new(body, vec![param])
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::Attribute;

    fn column(name: &str, ty: DataType, nullable: bool) -> Expression {
        NamedExpression::from(Attribute::new(name, ty, nullable)).into_expr()
    }

    #[test]
    fn parse_raw_type_accepts_both_kinds() {
        assert_eq!(CharVarchar::parse_raw_type("CHAR(3)"), Some(DataType::Char { length: 3 }));
        assert_eq!(CharVarchar::parse_raw_type(" varchar( 20 ) "), Some(DataType::Varchar { length: 20 }));
        assert_eq!(CharVarchar::parse_raw_type("string"), None);
        assert_eq!(CharVarchar::parse_raw_type("varchar()"), None);
    }

    #[test]
    fn raw_type_ignores_metadata_on_non_strings() {
        let mut metadata = Metadata::new();
        metadata.insert(CHAR_VARCHAR_TYPE_STRING.into(), json!("char(2)"));
        assert_eq!(CharVarchar::raw_type(&DataType::Int, &metadata), DataType::Int);
        assert_eq!(CharVarchar::raw_type(&DataType::String, &metadata), DataType::Char { length: 2 });
    }

    #[test]
    fn replace_reaches_nested_types() {
        let ty = DataType::map(
            DataType::Char { length: 2 },
            DataType::structure(vec![StructField::new("v", DataType::Varchar { length: 5 }, true)]),
            true,
        );
        let replaced = CharVarchar::replace_char_varchar_with_string(&ty);
        assert_eq!(
            replaced,
            DataType::map(DataType::String, DataType::structure(vec![StructField::new("v", DataType::String, true)]), true)
        );
        assert!(CharVarchar::has_char_varchar(&ty));
        assert!(!CharVarchar::has_char_varchar(&replaced));
    }

    #[test]
    fn length_check_on_top_level_varchar() {
        let checked = CharVarchar::string_length_check(column("s", DataType::String, true), &DataType::Varchar { length: 4 });
        assert!(matches!(checked, Expression::StringLengthCheck { limit: LengthLimit::Varchar(4), .. }));
        assert_eq!(checked.data_type(), DataType::String);
    }

    #[test]
    fn length_check_on_array_elements() {
        let input = column("xs", DataType::array(DataType::String, true), false);
        let checked = CharVarchar::string_length_check(input, &DataType::array(DataType::Char { length: 1 }, true));
        match &checked {
            Expression::ArrayTransform { function, .. } => {
                assert!(matches!(function.body.as_ref(), Expression::StringLengthCheck { limit: LengthLimit::Char(1), .. }));
            }
            other => panic!("expected transform, got {other:?}"),
        }
        assert_eq!(checked.data_type(), DataType::array(DataType::String, true));
    }

    #[test]
    fn length_check_on_nullable_struct_is_null_guarded() {
        let raw = DataType::structure(vec![
            StructField::new("code", DataType::Char { length: 2 }, false),
            StructField::new("n", DataType::Int, false),
        ]);
        let input_type = CharVarchar::replace_char_varchar_with_string(&raw);
        let checked = CharVarchar::string_length_check(column("s", input_type.clone(), true), &raw);
        assert_eq!(checked.data_type(), input_type);
        match checked {
            Expression::If { otherwise, .. } => assert_eq!(otherwise.data_type(), input_type),
            other => panic!("expected null guard, got {other:?}"),
        }
    }

    #[test]
    fn no_limit_means_no_wrapper() {
        let input = column("xs", DataType::array(DataType::String, true), false);
        let checked = CharVarchar::string_length_check(input.clone(), &DataType::array(DataType::String, true));
        assert_eq!(checked, input);
    }
}
