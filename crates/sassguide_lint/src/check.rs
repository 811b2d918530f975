//! The check trait and the registry that holds check implementations.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use sassguide_syntax::StyleSheet;

use crate::config::LintConfig;
use crate::error::{LintError, LintResult};
use crate::violation::{Severity, Violation};

/// Everything a check sees while inspecting one file.
pub struct CheckContext<'a> {
    /// Display path of the file
    pub file: &'a str,
    pub sheet: &'a StyleSheet,
    pub config: &'a LintConfig,
    pub rule_id: &'a str,
    /// Severity after configuration overrides
    pub severity: Severity,
}

impl<'a> CheckContext<'a> {
    /// Build a violation of the current rule at a byte offset.
    pub fn violation(&self, offset: u32, message: impl Into<String>) -> Violation {
        Violation::new(
            self.rule_id,
            self.severity,
            self.file,
            self.sheet.location(offset),
            message,
        )
    }

    /// An error-severity `unevaluable` violation for one node the check
    /// cannot judge. The check keeps going with the remaining nodes.
    pub fn unevaluable(&self, offset: u32, reason: impl Into<String>) -> Violation {
        let error = LintError::unevaluable(offset, reason);
        warn!("{}: check {} could not evaluate: {}", self.file, self.rule_id, error);
        Violation::new(
            self.rule_id,
            Severity::Error,
            self.file,
            self.sheet.location(offset),
            error.to_string(),
        )
    }
}

/// A single style rule evaluated against one parsed file.
///
/// Checks are pure: the same tree and configuration always produce the same
/// violations. A check returns `Err` when part of the tree cannot be judged.
pub trait Check: Send + Sync {
    /// Stable rule identifier, e.g. `no-id-selector`.
    fn id(&self) -> &str;

    fn description(&self) -> &str;

    fn default_severity(&self) -> Severity;

    fn check(&self, ctx: &CheckContext<'_>) -> LintResult<Vec<Violation>>;
}

/// A registry of check implementations keyed by rule id.
#[derive(Default, Clone)]
pub struct CheckRegistry {
    checks: HashMap<String, Arc<dyn Check>>,
}

impl CheckRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            checks: HashMap::new(),
        }
    }

    /// Registry holding every built-in check.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for check in crate::checks::builtin() {
            registry.register(check);
        }
        registry
    }

    /// Register a check under its `id()`. An existing check with the same id is replaced.
    pub fn register(&mut self, check: Arc<dyn Check>) {
        let id = check.id().to_string();
        debug!("Registering check: {}", id);
        self.checks.insert(id, check);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Check>> {
        self.checks.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.checks.contains_key(id)
    }

    /// Registered rule ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.checks.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// Registered checks in rule id order.
    pub fn checks(&self) -> Vec<Arc<dyn Check>> {
        let mut checks: Vec<_> = self.checks.values().cloned().collect();
        checks.sort_by(|a, b| a.id().cmp(b.id()));
        checks
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn unregister(&mut self, id: &str) -> Option<Arc<dyn Check>> {
        debug!("Unregistering check: {}", id);
        self.checks.remove(id)
    }
}

impl std::fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("checks", &self.ids())
            .finish()
    }
}
