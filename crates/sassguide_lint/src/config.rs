//! Lint configuration loaded from `.sassguide.yml`.
//!
//! ```yaml
//! comment_style: line
//! max_nesting_depth: 3
//! rules:
//!   no-extend:
//!     severity: error
//!   selector-per-line:
//!     enabled: false
//! ignore:
//!   - "vendor/**"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LintError, LintResult};
use crate::violation::Severity;

/// Default file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".sassguide.yml";

/// Which comment syntax the project has settled on.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommentStyle {
    /// Both `//` and `/* */` are fine.
    #[default]
    Any,
    /// Only `//` comments.
    Line,
}

/// Per-rule overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleOverride {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// Lint configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LintConfig {
    /// Overrides keyed by rule id
    pub rules: BTreeMap<String, RuleOverride>,
    pub comment_style: CommentStyle,
    /// Deepest rule nesting allowed before `nesting-depth` fires
    pub max_nesting_depth: usize,
    /// Files larger than this many bytes are not parsed
    pub max_file_size: u64,
    /// Report differences against formatter output
    pub check_formatting: bool,
    /// Glob patterns of paths to skip
    pub ignore: Vec<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            rules: BTreeMap::new(),
            comment_style: CommentStyle::Any,
            max_nesting_depth: 3,
            max_file_size: 1024 * 1024,
            check_formatting: true,
            ignore: Vec::new(),
        }
    }
}

impl LintConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml(text: &str) -> LintResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load configuration from a file.
    pub fn load(path: impl AsRef<Path>) -> LintResult<Self> {
        let path = path.as_ref();
        debug!("Loading lint configuration from {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| LintError::InvalidConfiguration {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `.sassguide.yml` from `dir` if present.
    pub fn discover(dir: impl AsRef<Path>) -> LintResult<Option<(Self, PathBuf)>> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        let config = Self::load(&path)?;
        Ok(Some((config, path)))
    }

    /// Reject overrides for rules that do not exist.
    pub fn validate(&self, known_rules: &[&str]) -> LintResult<()> {
        for id in self.rules.keys() {
            if !known_rules.contains(&id.as_str()) {
                return Err(LintError::UnknownRule(id.clone()));
            }
        }
        Ok(())
    }

    /// Effective severity of a rule, or `None` when disabled.
    pub fn severity_for(&self, rule_id: &str, default: Severity) -> Option<Severity> {
        match self.rules.get(rule_id) {
            Some(RuleOverride {
                enabled: Some(false),
                ..
            }) => None,
            Some(RuleOverride {
                severity: Some(severity),
                ..
            }) => Some(*severity),
            _ => Some(default),
        }
    }

    pub fn with_rule(mut self, rule_id: impl Into<String>, rule: RuleOverride) -> Self {
        self.rules.insert(rule_id.into(), rule);
        self
    }

    pub fn with_comment_style(mut self, style: CommentStyle) -> Self {
        self.comment_style = style;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config = LintConfig::from_yaml("").unwrap();
        assert_eq!(config, LintConfig::default());
        assert_eq!(config.max_nesting_depth, 3);
        assert!(config.check_formatting);
    }

    #[test]
    fn test_overrides() {
        let config = LintConfig::from_yaml(
            "comment_style: line\nrules:\n  no-extend:\n    severity: error\n  selector-per-line:\n    enabled: false\n",
        )
        .unwrap();
        assert_eq!(config.comment_style, CommentStyle::Line);
        assert_eq!(config.severity_for("no-extend", Severity::Warning), Some(Severity::Error));
        assert_eq!(config.severity_for("selector-per-line", Severity::Warning), None);
        assert_eq!(config.severity_for("no-id-selector", Severity::Error), Some(Severity::Error));
    }

    #[test]
    fn test_validate_rejects_unknown_rules() {
        let config = LintConfig::default().with_rule("no-such-rule", RuleOverride::default());
        let err = config.validate(&["no-extend"]).unwrap_err();
        assert!(matches!(err, LintError::UnknownRule(id) if id == "no-such-rule"));
    }

    #[test]
    fn test_discover() {
        let temp = tempdir().unwrap();
        assert!(LintConfig::discover(temp.path()).unwrap().is_none());

        fs::write(temp.path().join(CONFIG_FILE_NAME), "max_nesting_depth: 4\n").unwrap();
        let (config, path) = LintConfig::discover(temp.path()).unwrap().unwrap();
        assert_eq!(config.max_nesting_depth, 4);
        assert!(path.ends_with(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_invalid_yaml_names_the_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "max_nesting_depth: [not a number\n").unwrap();
        let err = LintConfig::load(&path).unwrap_err();
        assert!(matches!(err, LintError::InvalidConfiguration { .. }));
    }
}
