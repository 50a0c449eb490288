//! Line rewriter: one line in, one outcome out.
//!
//! Per line, in order:
//! 1. No legacy marker: unchanged, nothing reported.
//! 2. Skip policy hit: original line unchanged, reported as protected.
//! 3. Direct pass, then parameterized pass.
//! 4. Marker still present: first remaining reference reported as
//!    unresolved. Replacements already made on the line still count and
//!    the rewritten line is still returned.

use serde::Serialize;

use super::rules::RuleTable;
use super::skip::SkipPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipKind {
    /// Line belongs to a protected sub-vocabulary.
    Protected,
    /// Line still holds a legacy reference no rule maps.
    Unresolved,
}

/// A line that needs a human to look at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedInstance {
    pub line_number: usize,
    /// Trimmed source line.
    pub line: String,
    pub kind: SkipKind,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOutcome {
    pub line: String,
    pub replacements: usize,
    pub skipped: Option<SkippedInstance>,
}

impl LineOutcome {
    fn unchanged(line: &str) -> Self {
        Self {
            line: line.to_string(),
            replacements: 0,
            skipped: None,
        }
    }
}

/// Applies a rule table and skip policy to single lines. Never fails.
#[derive(Debug, Clone, Copy)]
pub struct LineRewriter<'a> {
    rules: &'a RuleTable,
    skip: &'a SkipPolicy,
}

impl<'a> LineRewriter<'a> {
    pub fn new(rules: &'a RuleTable, skip: &'a SkipPolicy) -> Self {
        Self { rules, skip }
    }

    /// Rewrite one line (without its terminator). `line_number` is 1-based.
    pub fn rewrite(&self, line: &str, line_number: usize) -> LineOutcome {
        if !self.rules.contains_marker(line) {
            return LineOutcome::unchanged(line);
        }

        if let Some(reason) = self.skip.should_skip(line) {
            return LineOutcome {
                line: line.to_string(),
                replacements: 0,
                skipped: Some(SkippedInstance {
                    line_number,
                    line: line.trim().to_string(),
                    kind: SkipKind::Protected,
                    reason: reason.to_string(),
                }),
            };
        }

        let (after_direct, direct_count) = self.rules.lookup_direct(line);
        let parameterized = self.rules.lookup_parameterized(&after_direct);
        let rewritten = parameterized.text;
        let replacements = direct_count + parameterized.count;

        let skipped = if self.rules.contains_marker(&rewritten) {
            let pattern = self
                .rules
                .unresolved(&rewritten)
                .into_iter()
                .next()
                .unwrap_or_else(|| self.rules.marker().to_string());

            Some(SkippedInstance {
                line_number,
                line: rewritten.trim().to_string(),
                kind: SkipKind::Unresolved,
                reason: format!("Unhandled pattern: {}", pattern),
            })
        } else {
            None
        };

        LineOutcome {
            line: rewritten,
            replacements,
            skipped,
        }
    }
}
