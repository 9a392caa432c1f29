use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzerError {
    /// The query produces more columns than the table has, or fewer in a
    /// by-position write.
    ColumnCountMismatch { table: String, expected: usize, actual: usize },
    /// Every reason the query's output cannot be written to the table.
    SchemaMismatch { table: String, diagnostics: Vec<String> },
    InvalidConfig(String),
}

impl Display for AnalyzerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzerError::ColumnCountMismatch { table, expected, actual } => {
                let problem = if actual > expected { "too many data columns" } else { "not enough data columns" };
                write!(
                    f,
                    "Cannot write to '{}', {}: table has {} column(s) but the data has {}",
                    table, problem, expected, actual
                )
            }
            AnalyzerError::SchemaMismatch { table, diagnostics } => {
                write!(f, "Cannot write incompatible data to table '{}':", table)?;
                for diagnostic in diagnostics {
                    write!(f, "\n- {}", diagnostic)?;
                }
                Ok(())
            }
            AnalyzerError::InvalidConfig(message) => write!(f, "Invalid configuration: {}", message),
        }
    }
}

impl std::error::Error for AnalyzerError {}
