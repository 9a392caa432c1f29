use crate::{
    analyzer::{ColumnPath, ColumnResolver, WriteContext},
    ast::{Alias, Expression, NamedExpression},
    schema::{Attribute, CharVarchar, DataType, StructField},
};

pub struct StructResolver;

impl StructResolver {
    /// Resolve a struct value against a target struct by field name and rebuild
    /// it in the target's field order. A nullable input stays null.
    pub fn resolve(
        input: NamedExpression,
        input_fields: &[StructField],
        expected: &Attribute,
        expected_fields: &[StructField],
        ctx: &mut WriteContext,
        col_path: &ColumnPath,
    ) -> Option<NamedExpression> {
        let input = input.into_expr();
        // fields are only read when the struct itself is not null
        let source = if input.nullable() { Expression::known_not_null(input.clone()) } else { input.clone() };
        let fields: Vec<NamedExpression> = input_fields
            .iter()
            .enumerate()
            .map(|(ordinal, field)| {
                let extracted = Expression::GetStructField {
                    child: Box::new(source.clone()),
                    ordinal,
                    name: field.name.clone(),
                };
                NamedExpression::alias(extracted, field.name.clone())
            })
            .collect();
        let expected_attrs: Vec<Attribute> = expected_fields.iter().map(StructField::to_attribute).collect();

        let reordered = ColumnResolver::reorder_columns_by_name(fields, &expected_attrs, ctx, col_path);
        if reordered.len() != expected_fields.len() {
            return None;
        }

        let rebuilt = Expression::CreateStruct(reordered);
        let value = if input.nullable() {
            let null_struct = Expression::NullLiteral(CharVarchar::replace_char_varchar_with_string(
                &DataType::structure(expected_fields.to_vec()),
            ));
            Expression::if_else(Expression::is_null(input), null_struct, rebuilt)
        } else {
            rebuilt
        };
        Some(NamedExpression::Alias(Alias::with_metadata(value, expected.name.clone(), expected.metadata.clone())))
    }
}
