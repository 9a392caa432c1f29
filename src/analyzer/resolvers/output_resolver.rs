use tracing::debug;

use crate::{
    analyzer::{AnalyzerError, ColumnPath, ColumnResolver, FieldResolver, WriteContext},
    ast::NamedExpression,
    config::Config,
    planner::LogicalPlan,
    schema::Attribute,
};

pub struct OutputResolver;

impl OutputResolver {
    /// Fit the output of `query` to the columns of table `table_name`.
    ///
    /// Columns are matched by name when `by_name` is set and by position
    /// otherwise. Returns `query` itself when its output already fits, or a
    /// projection over it that reorders and converts the columns. Every
    /// problem found is returned at once in a single `SchemaMismatch`.
    pub fn resolve_output_columns(
        table_name: &str,
        expected: &[Attribute],
        query: LogicalPlan,
        by_name: bool,
        config: &Config,
    ) -> Result<LogicalPlan, AnalyzerError> {
        let output = query.output();
        debug!(table = table_name, expected = expected.len(), actual = output.len(), by_name, "resolving output columns");

        if output.len() > expected.len() || (!by_name && output.len() < expected.len()) {
            return Err(AnalyzerError::ColumnCountMismatch {
                table: table_name.to_string(),
                expected: expected.len(),
                actual: output.len(),
            });
        }

        let mut ctx = WriteContext::new(config);
        let resolved: Vec<NamedExpression> = if by_name {
            ColumnResolver::reorder_columns_by_name(output.clone(), expected, &mut ctx, &ColumnPath::root())
        } else {
            let mut resolved = Vec::with_capacity(expected.len());
            for (query_col, table_col) in output.iter().cloned().zip(expected) {
                let path = ColumnPath::root().child(&table_col.name);
                if let Some(field) = FieldResolver::check_field(table_col, query_col, false, &mut ctx, &path) {
                    resolved.push(field);
                }
            }
            resolved
        };

        if ctx.has_errors() {
            let diagnostics = ctx.into_diagnostics();
            debug!(table = table_name, errors = diagnostics.len(), "output columns do not fit the table");
            return Err(AnalyzerError::SchemaMismatch { table: table_name.to_string(), diagnostics });
        }

        if resolved == output {
            debug!(table = table_name, "query output already matches the table");
            Ok(query)
        } else {
            Ok(LogicalPlan::project(query, resolved))
        }
    }
}
