//! Lint engine.
//!
//! Runs every enabled check against a parsed file and turns check failures
//! into `unevaluable` violations, so one bad sub-tree never stops a run.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sassguide_syntax::{Location, StyleSheet};

use crate::check::{CheckContext, CheckRegistry};
use crate::config::LintConfig;
use crate::error::{LintError, LintResult};
use crate::locality::{MediaQueryLocality, SelectorFacts, MEDIA_QUERY_LOCALITY};
use crate::violation::{Severity, Violation};

/// Rule id of the differences reported against formatter output.
pub const FORMATTING_RULE: &str = "formatting";

/// Catalog entry for one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleInfo {
    pub id: String,
    pub description: String,
    pub default_severity: Severity,
}

/// Every rule the engine knows, per-file checks plus the project-wide ones, sorted by id.
pub fn catalog(registry: &CheckRegistry) -> Vec<RuleInfo> {
    let mut rules: Vec<RuleInfo> = registry
        .checks()
        .iter()
        .map(|check| RuleInfo {
            id: check.id().to_string(),
            description: check.description().to_string(),
            default_severity: check.default_severity(),
        })
        .collect();
    rules.push(RuleInfo {
        id: MEDIA_QUERY_LOCALITY.to_string(),
        description: MediaQueryLocality::DESCRIPTION.to_string(),
        default_severity: MediaQueryLocality::DEFAULT_SEVERITY,
    });
    rules.push(RuleInfo {
        id: FORMATTING_RULE.to_string(),
        description: "Source matches the formatter's canonical output".to_string(),
        default_severity: Severity::Warning,
    });
    rules.sort_by(|a, b| a.id.cmp(&b.id));
    rules
}

/// Outcome of linting one file.
#[derive(Debug, Clone, Default)]
pub struct FileLint {
    pub violations: Vec<Violation>,
    /// Input for the cross-file locality check, when it is enabled and could be collected.
    pub facts: Option<SelectorFacts>,
}

/// Applies the configured checks to parsed files.
#[derive(Debug, Clone)]
pub struct Linter {
    config: LintConfig,
    registry: CheckRegistry,
}

impl Linter {
    /// Create a linter with the built-in checks. Fails on unknown rule ids in the configuration.
    pub fn new(config: LintConfig) -> LintResult<Self> {
        Self::with_registry(config, CheckRegistry::builtin())
    }

    pub fn with_registry(config: LintConfig, registry: CheckRegistry) -> LintResult<Self> {
        let rules = catalog(&registry);
        let known: Vec<&str> = rules.iter().map(|r| r.id.as_str()).collect();
        config.validate(&known)?;
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> Vec<RuleInfo> {
        catalog(&self.registry)
    }

    /// Severity of `formatting` violations, or `None` when they are not wanted.
    pub fn formatting_severity(&self) -> Option<Severity> {
        if !self.config.check_formatting {
            return None;
        }
        self.config.severity_for(FORMATTING_RULE, Severity::Warning)
    }

    /// Run every enabled check against one file.
    pub fn lint(&self, file: &str, sheet: &StyleSheet) -> FileLint {
        let mut result = FileLint::default();

        for check in self.registry.checks() {
            let Some(severity) = self.config.severity_for(check.id(), check.default_severity()) else {
                continue;
            };
            let ctx = CheckContext {
                file,
                sheet,
                config: &self.config,
                rule_id: check.id(),
                severity,
            };
            match check.check(&ctx) {
                Ok(violations) => {
                    if !violations.is_empty() {
                        debug!("{}: {} violation(s) of {}", file, violations.len(), check.id());
                    }
                    result.violations.extend(violations);
                }
                Err(e) => result.violations.push(unevaluable(check.id(), file, sheet, e)),
            }
        }

        if self.locality_severity().is_some() {
            let (facts, errors) = SelectorFacts::collect(file, sheet);
            result.violations.extend(
                errors
                    .into_iter()
                    .map(|e| unevaluable(MEDIA_QUERY_LOCALITY, file, sheet, e)),
            );
            result.facts = Some(facts);
        }

        result
    }

    /// Run the cross-file checks over the facts of every linted file.
    pub fn check_project(&self, facts: &[SelectorFacts]) -> Vec<Violation> {
        let Some(severity) = self.locality_severity() else {
            return Vec::new();
        };
        MediaQueryLocality { severity }.check(facts)
    }

    fn locality_severity(&self) -> Option<Severity> {
        self.config
            .severity_for(MEDIA_QUERY_LOCALITY, MediaQueryLocality::DEFAULT_SEVERITY)
    }
}

fn unevaluable(rule_id: &str, file: &str, sheet: &StyleSheet, error: LintError) -> Violation {
    warn!("{}: check {} could not evaluate: {}", file, rule_id, error);
    let (location, message) = match error {
        LintError::Unevaluable { offset, .. } => (sheet.location(offset), error.to_string()),
        other => (Location::new(1, 1), format!("unevaluable: {}", other)),
    };
    Violation::new(rule_id, Severity::Error, file, location, message)
}
