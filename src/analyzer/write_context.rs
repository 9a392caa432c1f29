use tracing::trace;

use crate::config::{Config, StoreAssignmentPolicy};

/// State of one output resolution: the session settings and every diagnostic
/// found so far, in discovery order.
pub struct WriteContext<'a> {
    pub config: &'a Config,
    diagnostics: Vec<String>,
}

impl<'a> WriteContext<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config, diagnostics: Vec::new() }
    }

    pub fn policy(&self) -> StoreAssignmentPolicy {
        self.config.store_assignment_policy
    }

    pub fn names_match(&self, left: &str, right: &str) -> bool {
        self.config.names_match(left, right)
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        trace!(%message, "output resolution diagnostic");
        self.diagnostics.push(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<String> {
        self.diagnostics
    }
}
