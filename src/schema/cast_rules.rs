use crate::schema::DataType;

/// Which conversions between types are considered safe.
pub struct CastRules;

const NUMERIC_PRECEDENCE: [DataType; 6] = [
    DataType::Byte,
    DataType::Short,
    DataType::Int,
    DataType::Long,
    DataType::Float,
    DataType::Double,
];

impl CastRules {
    /// True when every value of `from` converts to `to` without loss.
    pub fn can_up_cast(from: &DataType, to: &DataType) -> bool {
        if from == to {
            return true;
        }
        match (from, to) {
            (f, DataType::Decimal { precision, scale }) if f.is_numeric() && Self::decimal_is_wider_than(*precision, *scale, f) => true,
            (DataType::Decimal { precision, scale }, t) if t.is_numeric() && Self::decimal_is_tighter_than(*precision, *scale, t) => true,
            (f, t) if Self::legal_numeric_precedence(f, t) => true,
            (DataType::Date, DataType::Timestamp) | (DataType::Date, DataType::TimestampNtz) => true,
            (f, t) if f.is_atomic() && t.is_string_like() => true,
            (DataType::Null, _) => true,
            (DataType::Timestamp, DataType::Long) | (DataType::Long, DataType::Timestamp) => true,
            (
                DataType::Array { element_type: from_elem, contains_null: from_null },
                DataType::Array { element_type: to_elem, contains_null: to_null },
            ) => Self::resolvable_nullability(*from_null, *to_null) && Self::can_up_cast(from_elem, to_elem),
            (
                DataType::Map { key_type: from_key, value_type: from_value, value_contains_null: from_null },
                DataType::Map { key_type: to_key, value_type: to_value, value_contains_null: to_null },
            ) => {
                Self::resolvable_nullability(*from_null, *to_null)
                    && Self::can_up_cast(from_key, to_key)
                    && Self::can_up_cast(from_value, to_value)
            }
            (DataType::Struct { fields: from_fields }, DataType::Struct { fields: to_fields }) => {
                from_fields.len() == to_fields.len()
                    && from_fields.iter().zip(to_fields).all(|(f, t)| {
                        Self::resolvable_nullability(f.nullable, t.nullable) && Self::can_up_cast(&f.data_type, &t.data_type)
                    })
            }
            _ => false,
        }
    }

    /// Conversions allowed by ANSI store assignment. Runtime failures such as
    /// overflow are still possible.
    pub fn can_ansi_store_assign(from: &DataType, to: &DataType) -> bool {
        if from == to {
            return true;
        }
        match (from, to) {
            (DataType::Null, _) => true,
            (f, t) if f.is_numeric() && t.is_numeric() => true,
            (f, t) if f.is_atomic() && t.is_string_like() => true,
            (
                DataType::Date | DataType::Timestamp | DataType::TimestampNtz,
                DataType::Date | DataType::Timestamp | DataType::TimestampNtz,
            ) => true,
            (
                DataType::Array { element_type: from_elem, contains_null: from_null },
                DataType::Array { element_type: to_elem, contains_null: to_null },
            ) => Self::resolvable_nullability(*from_null, *to_null) && Self::can_ansi_store_assign(from_elem, to_elem),
            (
                DataType::Map { key_type: from_key, value_type: from_value, value_contains_null: from_null },
                DataType::Map { key_type: to_key, value_type: to_value, value_contains_null: to_null },
            ) => {
                Self::resolvable_nullability(*from_null, *to_null)
                    && Self::can_ansi_store_assign(from_key, to_key)
                    && Self::can_ansi_store_assign(from_value, to_value)
            }
            (DataType::Struct { fields: from_fields }, DataType::Struct { fields: to_fields }) => {
                from_fields.len() == to_fields.len()
                    && from_fields.iter().zip(to_fields).all(|(f, t)| {
                        Self::resolvable_nullability(f.nullable, t.nullable)
                            && Self::can_ansi_store_assign(&f.data_type, &t.data_type)
                    })
            }
            _ => false,
        }
    }

    /// A non-ANSI cast between these types turns invalid input into null.
    pub fn force_nullable(from: &DataType, to: &DataType) -> bool {
        match (from, to) {
            (f, t) if f == t => false,
            (DataType::Null, _) => true,
            (f, t) if f.is_string_like() => !t.is_string_like() && *t != DataType::Binary,
            (DataType::Float | DataType::Double, DataType::Decimal { .. }) => true,
            (f, t @ DataType::Decimal { .. }) if f.is_numeric() => !Self::can_up_cast(f, t),
            _ => false,
        }
    }

    pub fn resolvable_nullability(from: bool, to: bool) -> bool {
        !from || to
    }

    fn legal_numeric_precedence(from: &DataType, to: &DataType) -> bool {
        let from_idx = NUMERIC_PRECEDENCE.iter().position(|t| t == from);
        let to_idx = NUMERIC_PRECEDENCE.iter().position(|t| t == to);
        match (from_idx, to_idx) {
            (Some(f), Some(t)) => f < t,
            _ => false,
        }
    }

    fn decimal_is_wider_than(precision: u8, scale: u8, other: &DataType) -> bool {
        let (other_precision, other_scale) = match other {
            DataType::Decimal { precision, scale } => (*precision, *scale),
            t => match t.integral_as_decimal() {
                Some(bounds) => bounds,
                None => return false,
            },
        };
        (precision as i32 - scale as i32) >= (other_precision as i32 - other_scale as i32) && scale >= other_scale
    }

    fn decimal_is_tighter_than(precision: u8, scale: u8, other: &DataType) -> bool {
        let (other_precision, other_scale) = match other {
            DataType::Decimal { precision, scale } => (*precision, *scale),
            t => match t.integral_as_decimal() {
                Some(bounds) => bounds,
                None => return false,
            },
        };
        (precision as i32 - scale as i32) <= (other_precision as i32 - other_scale as i32) && scale <= other_scale
    }
}
