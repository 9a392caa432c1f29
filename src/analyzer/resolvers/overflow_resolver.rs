use crate::{
    ast::{Cast, Expression},
    schema::CastRules,
};

pub struct OverflowResolver;

impl OverflowResolver {
    /// Tag a cast for a table insertion so that an overflow names the column
    /// being written. Casts that cannot overflow are returned unchanged.
    pub fn check_cast_overflow_in_table_insert(cast: Cast, column_name: &str) -> Expression {
        if Self::can_cause_cast_overflow(&cast) {
            Expression::CheckOverflowInTableInsert {
                child: Box::new(Expression::Cast(cast)),
                column_name: column_name.to_string(),
            }
        } else {
            Expression::Cast(cast)
        }
    }

    fn can_cause_cast_overflow(cast: &Cast) -> bool {
        cast.data_type.contains_integral_or_decimal() && !CastRules::can_up_cast(&cast.child.data_type(), &cast.data_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ast::NamedExpression, schema::{Attribute, DataType, StructField}};

    fn cast(from: DataType, to: DataType) -> Cast {
        Cast::new(NamedExpression::from(Attribute::new("c", from, true)).into_expr(), to, None, true)
    }

    #[test]
    fn narrowing_integral_cast_is_wrapped() {
        let out = OverflowResolver::check_cast_overflow_in_table_insert(cast(DataType::Long, DataType::Short), "t.c");
        match out {
            Expression::CheckOverflowInTableInsert { column_name, child } => {
                assert_eq!(column_name, "t.c");
                assert!(matches!(child.as_ref(), Expression::Cast(_)));
            }
            other => panic!("expected overflow check, got {other:?}"),
        }
    }

    #[test]
    fn widening_cast_is_left_alone() {
        let original = cast(DataType::Int, DataType::Long);
        let out = OverflowResolver::check_cast_overflow_in_table_insert(original.clone(), "c");
        assert_eq!(out, Expression::Cast(original));
    }

    #[test]
    fn double_to_decimal_is_wrapped() {
        let out = OverflowResolver::check_cast_overflow_in_table_insert(cast(DataType::Double, DataType::decimal(10, 2)), "c");
        assert!(matches!(out, Expression::CheckOverflowInTableInsert { .. }));
    }

    #[test]
    fn non_numeric_target_is_never_wrapped() {
        let out = OverflowResolver::check_cast_overflow_in_table_insert(cast(DataType::Long, DataType::String), "c");
        assert!(matches!(out, Expression::Cast(_)));
        let out = OverflowResolver::check_cast_overflow_in_table_insert(cast(DataType::String, DataType::Double), "c");
        assert!(matches!(out, Expression::Cast(_)));
    }

    #[test]
    fn nested_integral_target_is_checked() {
        let from = DataType::structure(vec![StructField::new("n", DataType::Long, true)]);
        let to = DataType::structure(vec![StructField::new("n", DataType::Int, true)]);
        let out = OverflowResolver::check_cast_overflow_in_table_insert(cast(from, to), "c");
        assert!(matches!(out, Expression::CheckOverflowInTableInsert { .. }));
    }
}
