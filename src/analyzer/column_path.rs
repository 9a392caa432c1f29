use std::fmt;

/// Names from the root of the target schema down to the column being
/// resolved. Only used to label diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPath(Vec<String>);

impl ColumnPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, name: &str) -> Self {
        let mut parts = self.0.clone();
        parts.push(name.to_string());
        Self(parts)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Dotted path; parts that are not plain identifiers are back-quoted.
    pub fn quoted(&self) -> String {
        self.0.iter().map(|p| Self::quote_part(p)).collect::<Vec<_>>().join(".")
    }

    fn quote_part(part: &str) -> String {
        if !part.is_empty() && part.chars().all(|c| c.is_alphanumeric() || c == '_') {
            part.to_string()
        } else {
            format!("`{}`", part.replace('`', "``"))
        }
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.quoted())
    }
}
