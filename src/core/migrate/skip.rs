//! Skip policy: protected sub-vocabularies that are never rewritten.

use crate::defaults::RuleSetConfig;
use crate::error::Result;
use crate::utils::validation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipPattern {
    /// Literal substring.
    pub pattern: String,
    /// Human-readable reason reported for lines that contain it.
    pub reason: String,
}

/// Line-granular exemption check.
#[derive(Debug, Clone)]
pub struct SkipPolicy {
    marker: String,
    patterns: Vec<SkipPattern>,
}

impl SkipPolicy {
    pub fn from_config(config: &RuleSetConfig) -> Result<Self> {
        let marker = format!("{}.", config.legacy_namespace.trim());
        let mut patterns = Vec::with_capacity(config.skip.len());

        for skip in &config.skip {
            let pattern = validation::require_non_empty(&skip.pattern, "rules.skip.pattern")?;
            patterns.push(SkipPattern {
                pattern: pattern.to_string(),
                reason: format!("Contains {} ({})", pattern, skip.label.trim()),
            });
        }

        Ok(Self { marker, patterns })
    }

    /// Reason of the first protected pattern on the line.
    ///
    /// A line without the legacy marker is never skipped: it has nothing to
    /// migrate, and counting it would inflate the review list.
    pub fn should_skip(&self, line: &str) -> Option<&str> {
        if !line.contains(&self.marker) {
            return None;
        }

        self.patterns
            .iter()
            .find(|p| line.contains(&p.pattern))
            .map(|p| p.reason.as_str())
    }

    pub fn patterns(&self) -> &[SkipPattern] {
        &self.patterns
    }
}
