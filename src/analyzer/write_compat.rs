use crate::{
    analyzer::WriteContext,
    config::StoreAssignmentPolicy,
    schema::{CastRules, DataType},
};

/// Decides whether values of one type may be stored into a column of another
/// under the active store assignment policy.
pub struct WriteCompat;

impl WriteCompat {
    /// Check that `write` (the produced type) can be stored as `read` (the
    /// table type). Every problem found is added to `ctx`; nested types are
    /// checked completely rather than stopping at the first problem.
    pub fn can_write(write: &DataType, read: &DataType, by_name: bool, ctx: &mut WriteContext, context: &str) -> bool {
        let policy = ctx.policy();
        match (write, read) {
            (
                DataType::Array { element_type: w_elem, contains_null: w_null },
                DataType::Array { element_type: r_elem, contains_null: r_null },
            ) => {
                let compatible = Self::can_write(w_elem, r_elem, by_name, ctx, &format!("{}.element", context));
                if *w_null && !*r_null {
                    ctx.add_error(format!("Cannot write nullable elements to array of non-nulls: '{}'", context));
                    false
                } else {
                    compatible
                }
            }

            (
                DataType::Map { key_type: w_key, value_type: w_value, value_contains_null: w_null },
                DataType::Map { key_type: r_key, value_type: r_value, value_contains_null: r_null },
            ) => {
                let key_compatible = Self::can_write(w_key, r_key, by_name, ctx, &format!("{}.key", context));
                let value_compatible = Self::can_write(w_value, r_value, by_name, ctx, &format!("{}.value", context));
                if *w_null && !*r_null {
                    ctx.add_error(format!("Cannot write nullable values to map of non-nulls: '{}'", context));
                    false
                } else {
                    key_compatible && value_compatible
                }
            }

            (DataType::Struct { fields: write_fields }, DataType::Struct { fields: read_fields }) => {
                let mut compatible = true;
                for (i, (r_field, w_field)) in read_fields.iter().zip(write_fields).enumerate() {
                    let name_match = ctx.names_match(&w_field.name, &r_field.name) || Self::is_generated_name(&w_field.name);
                    let field_context = format!("{}.{}", context, r_field.name);
                    let types_compatible = Self::can_write(&w_field.data_type, &r_field.data_type, by_name, ctx, &field_context);
                    if by_name && !name_match {
                        ctx.add_error(format!(
                            "Struct '{}' {}-th field name does not match (may be out of order): expected '{}', found '{}'",
                            context, i, r_field.name, w_field.name
                        ));
                        compatible = false;
                    } else if !r_field.nullable && w_field.nullable {
                        ctx.add_error(format!("Cannot write nullable values to non-null field: '{}'", field_context));
                        compatible = false;
                    } else if !types_compatible {
                        compatible = false;
                    }
                }

                if read_fields.len() > write_fields.len() {
                    let missing: Vec<String> = read_fields[write_fields.len()..].iter().map(|f| format!("'{}'", f.name)).collect();
                    ctx.add_error(format!("Struct '{}' missing fields: {}", context, missing.join(", ")));
                    compatible = false;
                } else if write_fields.len() > read_fields.len() {
                    let extra: Vec<String> = write_fields[read_fields.len()..].iter().map(|f| format!("'{}'", f.name)).collect();
                    ctx.add_error(format!("Cannot write extra fields to struct '{}': {}", context, extra.join(", ")));
                    compatible = false;
                }
                compatible
            }

            (w, r) if w.is_atomic() && r.is_atomic() && policy == StoreAssignmentPolicy::Strict => {
                if CastRules::can_up_cast(w, r) {
                    true
                } else {
                    ctx.add_error(format!("Cannot safely cast '{}': {} to {}", context, w.catalog_string(), r.catalog_string()));
                    false
                }
            }

            (DataType::Null, _) if policy == StoreAssignmentPolicy::Ansi => true,

            (w, r) if w.is_atomic() && r.is_atomic() && policy == StoreAssignmentPolicy::Ansi => {
                if CastRules::can_ansi_store_assign(w, r) {
                    true
                } else {
                    ctx.add_error(format!("Cannot safely cast '{}': {} to {}", context, w.catalog_string(), r.catalog_string()));
                    false
                }
            }

            (w, r) if *w != DataType::Null && w.same_type(r, ctx.config.case_sensitive) => true,

            (w, r) => {
                ctx.add_error(format!(
                    "Cannot write '{}': {} is incompatible with {}",
                    context,
                    w.catalog_string(),
                    r.catalog_string()
                ));
                false
            }
        }
    }

    /// Names such as `col1` that struct constructors assign to unnamed
    /// members; they match any target field name.
    fn is_generated_name(name: &str) -> bool {
        matches!(name.strip_prefix("col"), Some(d) if !d.is_empty() && d.chars().all(|c| c.is_ascii_digit()))
    }
}
