use crate::{
    analyzer::{ColumnPath, ColumnResolver, WriteContext},
    ast::{Alias, Expression, Lambda, LambdaVariable, NamedExpression},
    schema::{Attribute, DataType},
};

pub const KEY: &str = "key";
pub const VALUE: &str = "value";

pub struct MapResolver;

impl MapResolver {
    /// Resolve a map by reconciling keys and values separately, then zipping
    /// the converted key and value arrays back into a map.
    pub fn resolve(
        input: NamedExpression,
        input_type: &DataType,
        expected: &Attribute,
        ctx: &mut WriteContext,
        col_path: &ColumnPath,
    ) -> Option<NamedExpression> {
        let (
            DataType::Map { key_type: input_key, value_type: input_value, value_contains_null: input_null },
            DataType::Map { key_type: expected_key, value_type: expected_value, value_contains_null: expected_null },
        ) = (input_type, &expected.data_type)
        else {
            return None;
        };

        if *input_null && !*expected_null {
            ctx.add_error(format!("Cannot write nullable values to map of non-nulls: '{}'", col_path));
            return None;
        }

        // keys and values are both resolved so that every problem is reported
        let key_param = LambdaVariable::new(KEY, (**input_key).clone(), false);
        let key_attr = Attribute::new(KEY, (**expected_key).clone(), false);
        let resolved_key = ColumnResolver::reorder_columns_by_name(
            vec![NamedExpression::Variable(key_param.clone())],
            &[key_attr],
            ctx,
            col_path,
        );

        let value_param = LambdaVariable::new(VALUE, (**input_value).clone(), *input_null);
        let value_attr = Attribute::new(VALUE, (**expected_value).clone(), *expected_null);
        let resolved_value = ColumnResolver::reorder_columns_by_name(
            vec![NamedExpression::Variable(value_param.clone())],
            &[value_attr],
            ctx,
            col_path,
        );

        let [key_body] = <[NamedExpression; 1]>::try_from(resolved_key).ok()?;
        let [value_body] = <[NamedExpression; 1]>::try_from(resolved_value).ok()?;

        let input = input.into_expr();
        let keys = Expression::array_transform(
            Expression::MapKeys(Box::new(input.clone())),
            Lambda::new(key_body.into_expr(), vec![key_param]),
        );
        let values = Expression::array_transform(
            Expression::MapValues(Box::new(input)),
            Lambda::new(value_body.into_expr(), vec![value_param]),
        );
        let rebuilt = Expression::MapFromArrays { keys: Box::new(keys), values: Box::new(values) };
        Some(NamedExpression::Alias(Alias::with_metadata(rebuilt, expected.name.clone(), expected.metadata.clone())))
    }
}
