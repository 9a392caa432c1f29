use indexmap::IndexSet;
use tracing::trace;

use crate::{
    analyzer::{ArrayResolver, ColumnPath, FieldResolver, MapResolver, StructResolver, WriteContext},
    ast::NamedExpression,
    config::StoreAssignmentPolicy,
    schema::{Attribute, CharVarchar, DataType},
};

pub struct ColumnResolver;

impl ColumnResolver {
    /// Match `input_cols` to `expected_cols` by name and return them in the
    /// target order, converted where needed.
    ///
    /// Problems are reported to `ctx`. The result is empty unless every
    /// target column was resolved and every input column was used.
    pub fn reorder_columns_by_name(
        input_cols: Vec<NamedExpression>,
        expected_cols: &[Attribute],
        ctx: &mut WriteContext,
        col_path: &ColumnPath,
    ) -> Vec<NamedExpression> {
        let mut matched_cols: IndexSet<String> = IndexSet::new();
        let mut reordered = Vec::with_capacity(expected_cols.len());

        for expected in expected_cols {
            let new_path = col_path.child(&expected.name);
            let matched: Vec<&NamedExpression> = input_cols
                .iter()
                .filter(|col| ctx.names_match(col.name(), &expected.name))
                .collect();

            match matched.as_slice() {
                [] => ctx.add_error(format!("Cannot find data for output column '{}'", new_path)),
                [single] => {
                    matched_cols.insert(single.name().to_string());
                    let matched_col = (*single).clone().renamed(&expected.name);
                    if let Some(resolved) = Self::resolve_matched(matched_col, expected, ctx, &new_path) {
                        reordered.push(resolved);
                    }
                }
                _ => ctx.add_error(format!("Ambiguous column name in the input data: '{}'", new_path)),
            }
        }

        if reordered.len() != expected_cols.len() {
            return Vec::new();
        }

        if matched_cols.len() < input_cols.len() {
            let extra: Vec<String> = input_cols
                .iter()
                .filter(|col| !matched_cols.contains(col.name()))
                .map(|col| format!("'{}'", col.name()))
                .collect();
            if col_path.is_empty() {
                ctx.add_error(format!("Cannot write extra fields to table: {}", extra.join(", ")));
            } else {
                ctx.add_error(format!("Cannot write extra fields to struct '{}': {}", col_path, extra.join(", ")));
            }
            return Vec::new();
        }

        reordered
    }

    fn resolve_matched(
        matched: NamedExpression,
        expected: &Attribute,
        ctx: &mut WriteContext,
        col_path: &ColumnPath,
    ) -> Option<NamedExpression> {
        let input_type = matched.data_type();
        if Self::is_unchanged_composite(&matched, &input_type, expected) {
            trace!(column = %col_path, "composite passes through");
            Self::check_nullability(&matched, expected, ctx, col_path);
            return Some(matched);
        }

        match (input_type, &expected.data_type) {
            (DataType::Struct { fields }, DataType::Struct { fields: expected_fields }) => {
                trace!(column = %col_path, "resolving struct by name");
                Self::check_nullability(&matched, expected, ctx, col_path);
                StructResolver::resolve(matched, &fields, expected, expected_fields, ctx, col_path)
            }
            (input_type @ DataType::Array { .. }, DataType::Array { .. }) => {
                trace!(column = %col_path, "resolving array by name");
                Self::check_nullability(&matched, expected, ctx, col_path);
                ArrayResolver::resolve(matched, &input_type, expected, ctx, col_path)
            }
            (input_type @ DataType::Map { .. }, DataType::Map { .. }) => {
                trace!(column = %col_path, "resolving map by name");
                Self::check_nullability(&matched, expected, ctx, col_path);
                MapResolver::resolve(matched, &input_type, expected, ctx, col_path)
            }
            _ => FieldResolver::check_field(expected, matched, true, ctx, col_path),
        }
    }

    /// A struct, array or map that already has the target's exact type, name
    /// and metadata needs no rebuilding.
    fn is_unchanged_composite(matched: &NamedExpression, input_type: &DataType, expected: &Attribute) -> bool {
        matches!(input_type, DataType::Struct { .. } | DataType::Array { .. } | DataType::Map { .. })
            && *input_type == expected.data_type
            && !CharVarchar::has_char_varchar(&expected.data_type)
            && matched.name() == expected.name
            && matched.metadata() == expected.metadata
    }

    fn check_nullability(input: &NamedExpression, expected: &Attribute, ctx: &mut WriteContext, col_path: &ColumnPath) {
        if input.nullable() && !expected.nullable && ctx.policy() != StoreAssignmentPolicy::Legacy {
            ctx.add_error(format!("Cannot write nullable values to non-null column '{}'", col_path));
        }
    }
}
