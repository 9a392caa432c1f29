use tracing::trace;

use crate::{
    analyzer::{ColumnPath, OverflowResolver, WriteCompat, WriteContext},
    ast::{Alias, Cast, Expression, NamedExpression},
    config::StoreAssignmentPolicy,
    schema::{Attribute, CharVarchar, DataType},
};

pub struct FieldResolver;

impl FieldResolver {
    /// Reconcile one produced value with one target column.
    ///
    /// Returns the value unchanged when it already has the target's type, name
    /// and metadata; otherwise a cast aliased with the target's name and
    /// metadata. Under `Strict` and `Ansi` the write compatibility and the
    /// nullability of the value are both checked and any failure yields `None`.
    pub fn check_field(
        target: &Attribute,
        input: NamedExpression,
        by_name: bool,
        ctx: &mut WriteContext,
        col_path: &ColumnPath,
    ) -> Option<NamedExpression> {
        let raw_type = target.raw_type();
        let has_char_varchar = CharVarchar::has_char_varchar(&raw_type);
        let target_type = if has_char_varchar {
            CharVarchar::replace_char_varchar_with_string(&raw_type)
        } else {
            target.data_type.clone()
        };

        match ctx.policy() {
            StoreAssignmentPolicy::Legacy => {}
            StoreAssignmentPolicy::Strict | StoreAssignmentPolicy::Ansi => {
                // both checks always run so every reason is reported
                let can_write = WriteCompat::can_write(&input.data_type(), &target_type, by_name, ctx, &col_path.quoted());
                let null_safe = if input.nullable() && !target.nullable {
                    ctx.add_error(format!("Cannot write nullable values to non-null column '{}'", col_path));
                    false
                } else {
                    true
                };
                if !(can_write && null_safe) {
                    trace!(column = %col_path, "field rejected");
                    return None;
                }
            }
        }

        Some(Self::output_field(target, input, target_type, &raw_type, has_char_varchar, ctx, col_path))
    }

    fn output_field(
        target: &Attribute,
        input: NamedExpression,
        target_type: DataType,
        raw_type: &DataType,
        has_char_varchar: bool,
        ctx: &WriteContext,
        col_path: &ColumnPath,
    ) -> NamedExpression {
        // a char/varchar declared in the type itself always needs its length check
        if target.data_type == target_type
            && input.data_type().same_type(&target_type, ctx.config.case_sensitive)
            && input.name() == target.name
            && input.metadata() == target.metadata
        {
            trace!(column = %col_path, "field passes through");
            return input;
        }

        let casted = Self::cast(input.into_expr(), target_type, ctx, col_path);
        let checked = if ctx.config.char_varchar_as_string || !has_char_varchar {
            casted
        } else {
            CharVarchar::string_length_check(casted, raw_type)
        };
        trace!(column = %col_path, expr = %checked, "field converted");
        NamedExpression::Alias(Alias::with_metadata(checked, target.name.clone(), target.metadata.clone()))
    }

    /// Cast for a table insertion. ANSI-evaluated casts that can overflow are
    /// tagged with the column name.
    fn cast(child: Expression, to: DataType, ctx: &WriteContext, col_path: &ColumnPath) -> Expression {
        let ansi = match ctx.policy() {
            StoreAssignmentPolicy::Ansi => true,
            StoreAssignmentPolicy::Legacy => false,
            StoreAssignmentPolicy::Strict => ctx.config.ansi_enabled,
        };
        let mut cast = Cast::new(child, to, Some(ctx.config.session_time_zone.clone()), ansi);
        cast.table_insertion = true;
        if ansi {
            OverflowResolver::check_cast_overflow_in_table_insert(cast, &col_path.quoted())
        } else {
            Expression::Cast(cast)
        }
    }
}
