use crate::{
    analyzer::{ColumnPath, ColumnResolver, WriteContext},
    ast::{Alias, Expression, Lambda, LambdaVariable, NamedExpression},
    schema::{Attribute, DataType},
};

/// Name given to the element of an array while it is being resolved.
pub const ELEMENT: &str = "element";

pub struct ArrayResolver;

impl ArrayResolver {
    /// Resolve an array by reconciling its element type and applying the
    /// result to every element.
    pub fn resolve(
        input: NamedExpression,
        input_type: &DataType,
        expected: &Attribute,
        ctx: &mut WriteContext,
        col_path: &ColumnPath,
    ) -> Option<NamedExpression> {
        let (
            DataType::Array { element_type: input_elem, contains_null: input_null },
            DataType::Array { element_type: expected_elem, contains_null: expected_null },
        ) = (input_type, &expected.data_type)
        else {
            return None;
        };

        if *input_null && !*expected_null {
            ctx.add_error(format!("Cannot write nullable elements to array of non-nulls: '{}'", col_path));
            return None;
        }

        let param = LambdaVariable::new(ELEMENT, (**input_elem).clone(), *input_null);
        let fake_attr = Attribute::new(ELEMENT, (**expected_elem).clone(), *expected_null);
        let resolved = ColumnResolver::reorder_columns_by_name(
            vec![NamedExpression::Variable(param.clone())],
            &[fake_attr],
            ctx,
            col_path,
        );
        let [body] = <[NamedExpression; 1]>::try_from(resolved).ok()?;

        let transformed = Expression::array_transform(input.into_expr(), Lambda::new(body.into_expr(), vec![param]));
        Some(NamedExpression::Alias(Alias::with_metadata(transformed, expected.name.clone(), expected.metadata.clone())))
    }
}
