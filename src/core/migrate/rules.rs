//! Rule table: compiled direct and parameterized mappings for one token family.
//!
//! Direct rules rewrite a bare `<legacy>.<symbol>` reference. A reference
//! that continues with member access (`AppColors.primary.opacity(..)`,
//! `AppColors.Budget.warning`) is never touched by a direct rule; the
//! parameterized pass owns the `.opacity(<literal>)` form and everything
//! else is left in place for the unresolved report.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use serde::Serialize;

use crate::defaults::RuleSetConfig;
use crate::error::{Error, Result};
use crate::utils::validation;

/// A single direct symbol → symbol rewrite.
#[derive(Debug, Clone)]
pub struct ReplacementRule {
    pub name: String,
    /// Matches `<legacy>.<symbol>` as a whole identifier.
    pub pattern: Regex,
    /// Fully qualified replacement (`SemanticColors.primaryAction`).
    pub replacement: String,
    pub description: String,
}

/// A legacy symbol that may be rewritten with an opacity argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterizedColorEntry {
    pub legacy_symbol: String,
    pub new_symbol: String,
}

/// Static literal → level buckets. Never interpolated.
#[derive(Debug, Clone)]
pub struct OpacityMapping {
    levels: HashMap<String, String>,
    level_namespace: String,
}

impl OpacityMapping {
    /// Qualified level for an exact literal (`"0.3"` → `Opacity.light`).
    pub fn resolve(&self, literal: &str) -> Option<String> {
        self.levels
            .get(literal)
            .map(|level| format!("{}.{}", self.level_namespace, level))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Output of the parameterized pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterizedLookup {
    pub text: String,
    pub count: usize,
    /// Opacity-form references left untouched (unknown symbol or unmapped literal).
    pub unresolved: Vec<String>,
}

/// Immutable rule table, built once per run and shared by reference.
#[derive(Debug, Clone)]
pub struct RuleTable {
    legacy_namespace: String,
    new_namespace: String,
    marker: String,
    direct: Vec<ReplacementRule>,
    opacity: OpacityMapping,
    parameterized: Vec<ParameterizedColorEntry>,
    parameterized_index: HashMap<String, usize>,
    opacity_call: Regex,
    remaining: Regex,
}

impl RuleTable {
    /// Validate a rule set and compile its patterns.
    pub fn from_config(config: &RuleSetConfig) -> Result<Self> {
        let legacy = validation::require_identifier(
            validation::require_non_empty(&config.legacy_namespace, "rules.legacy_namespace")?,
            "rules.legacy_namespace",
        )?
        .to_string();
        let new = validation::require_identifier(
            validation::require_non_empty(&config.new_namespace, "rules.new_namespace")?,
            "rules.new_namespace",
        )?
        .to_string();
        let level_namespace = validation::require_identifier(
            validation::require_non_empty(&config.level_namespace, "rules.level_namespace")?,
            "rules.level_namespace",
        )?
        .to_string();

        let marker = format!("{}.", legacy);

        // Rewritten text must never contain the marker again, or a second
        // run would flag its own output.
        for (key, namespace) in [
            ("rules.new_namespace", &new),
            ("rules.level_namespace", &level_namespace),
        ] {
            if format!("{}.", namespace).contains(&marker) {
                return Err(Error::config_invalid_value(
                    key,
                    Some(namespace.clone()),
                    format!("must not end with the legacy namespace '{}'", legacy),
                ));
            }
        }

        let escaped_legacy = regex::escape(&legacy);
        let mut direct = Vec::with_capacity(config.direct.len());
        let mut replacements_by_symbol: HashMap<&str, &str> = HashMap::new();

        for rule in &config.direct {
            validation::require_identifier(&rule.symbol, "rules.direct.symbol")?;
            validation::require_identifier(&rule.replacement, "rules.direct.replacement")?;

            if replacements_by_symbol
                .insert(rule.symbol.as_str(), rule.replacement.as_str())
                .is_some()
            {
                return Err(Error::config_invalid_value(
                    "rules.direct.symbol",
                    Some(rule.symbol.clone()),
                    "duplicate direct rule for the same legacy symbol",
                ));
            }

            let pattern = Regex::new(&format!(
                r"\b{}\.{}\b",
                escaped_legacy,
                regex::escape(&rule.symbol)
            ))
            .map_err(|e| {
                Error::config_invalid_value("rules.direct", Some(rule.name.clone()), e.to_string())
            })?;

            direct.push(ReplacementRule {
                name: if rule.name.trim().is_empty() {
                    rule.symbol.clone()
                } else {
                    rule.name.clone()
                },
                pattern,
                replacement: format!("{}.{}", new, rule.replacement),
                description: rule.description.clone(),
            });
        }

        let mut levels = HashMap::with_capacity(config.opacity.len());
        for (literal, level) in &config.opacity {
            let literal = validation::require_non_empty(literal, "rules.opacity")?;
            validation::require_identifier(level, "rules.opacity")?;
            levels.insert(literal.to_string(), level.clone());
        }

        let mut parameterized = Vec::with_capacity(config.parameterized.len());
        let mut parameterized_index = HashMap::new();
        let mut seen = HashSet::new();
        for symbol in &config.parameterized {
            let Some(replacement) = replacements_by_symbol.get(symbol.as_str()) else {
                return Err(Error::config_invalid_value(
                    "rules.parameterized",
                    Some(symbol.clone()),
                    "parameterized symbol has no direct rule",
                ));
            };
            if !seen.insert(symbol.as_str()) {
                continue;
            }
            parameterized_index.insert(symbol.clone(), parameterized.len());
            parameterized.push(ParameterizedColorEntry {
                legacy_symbol: symbol.clone(),
                new_symbol: format!("{}.{}", new, replacement),
            });
        }

        let opacity_call = Regex::new(&format!(
            r"\b{}\.(\w+)\.opacity\(\s*([^()]*?)\s*\)",
            escaped_legacy
        ))
        .map_err(|e| Error::internal_unexpected(e.to_string()))?;

        let remaining = Regex::new(&format!(r"{}\.\w+(?:\.\w+)*(?:\([^)]*\))?", escaped_legacy))
            .map_err(|e| Error::internal_unexpected(e.to_string()))?;

        Ok(Self {
            legacy_namespace: legacy,
            new_namespace: new,
            marker,
            direct,
            opacity: OpacityMapping {
                levels,
                level_namespace,
            },
            parameterized,
            parameterized_index,
            opacity_call,
            remaining,
        })
    }

    /// The legacy marker (`AppColors.`).
    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn contains_marker(&self, text: &str) -> bool {
        text.contains(&self.marker)
    }

    pub fn legacy_namespace(&self) -> &str {
        &self.legacy_namespace
    }

    pub fn new_namespace(&self) -> &str {
        &self.new_namespace
    }

    pub fn direct_rules(&self) -> &[ReplacementRule] {
        &self.direct
    }

    pub fn parameterized_entries(&self) -> &[ParameterizedColorEntry] {
        &self.parameterized
    }

    pub fn opacity(&self) -> &OpacityMapping {
        &self.opacity
    }

    /// Apply every direct rule; returns the rewritten text and substitution count.
    pub fn lookup_direct(&self, text: &str) -> (String, usize) {
        let mut current = text.to_string();
        let mut total = 0;

        for rule in &self.direct {
            let (next, count) = replace_bare(rule, &current);
            if count > 0 {
                current = next;
                total += count;
            }
        }

        (current, total)
    }

    /// Rewrite `<legacy>.<symbol>.opacity(<literal>)` for parameterized symbols
    /// whose literal has a bucket. Anything else in that form is reported.
    pub fn lookup_parameterized(&self, text: &str) -> ParameterizedLookup {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        let mut count = 0;
        let mut unresolved = Vec::new();

        for caps in self.opacity_call.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let symbol = &caps[1];
            let literal = &caps[2];

            let entry = self
                .parameterized_index
                .get(symbol)
                .map(|&idx| &self.parameterized[idx]);

            match (entry, self.opacity.resolve(literal)) {
                (Some(entry), Some(level)) => {
                    out.push_str(&text[last..whole.start()]);
                    out.push_str(&format!("{}.opacity({})", entry.new_symbol, level));
                    last = whole.end();
                    count += 1;
                }
                _ => unresolved.push(whole.as_str().to_string()),
            }
        }

        out.push_str(&text[last..]);

        ParameterizedLookup {
            text: out,
            count,
            unresolved,
        }
    }

    /// Every legacy reference still present in `text`, in order.
    pub fn unresolved(&self, text: &str) -> Vec<String> {
        self.remaining
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Replace matches of a direct rule that are not followed by member access.
fn replace_bare(rule: &ReplacementRule, text: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut count = 0;

    for m in rule.pattern.find_iter(text) {
        if text[m.end()..].starts_with('.') {
            continue;
        }
        out.push_str(&text[last..m.start()]);
        out.push_str(&rule.replacement);
        last = m.end();
        count += 1;
    }

    if count == 0 {
        return (text.to_string(), 0);
    }

    out.push_str(&text[last..]);
    (out, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{builtin_config, DirectRuleConfig};

    fn table() -> RuleTable {
        RuleTable::from_config(&builtin_config().rules).unwrap()
    }

    #[test]
    fn direct_rewrites_bare_reference() {
        let (out, count) = table().lookup_direct("Text(title).foregroundColor(AppColors.textPrimary)");
        assert_eq!(out, "Text(title).foregroundColor(SemanticColors.textPrimary)");
        assert_eq!(count, 1);
    }

    #[test]
    fn direct_renames_action_colors() {
        let (out, count) = table().lookup_direct("a: AppColors.primary, b: AppColors.secondary");
        assert_eq!(out, "a: SemanticColors.primaryAction, b: SemanticColors.secondaryAction");
        assert_eq!(count, 2);
    }

    #[test]
    fn direct_counts_repeated_occurrences() {
        let (_, count) = table().lookup_direct("AppColors.border AppColors.border AppColors.border");
        assert_eq!(count, 3);
    }

    #[test]
    fn direct_ignores_member_access_continuation() {
        let line = "AppColors.primary.opacity(0.5)";
        let (out, count) = table().lookup_direct(line);
        assert_eq!(out, line);
        assert_eq!(count, 0);
    }

    #[test]
    fn direct_requires_whole_identifier() {
        let (out, count) = table().lookup_direct("AppColors.primaryDark");
        assert_eq!(out, "AppColors.primaryDark");
        assert_eq!(count, 0);

        let (out, _) = table().lookup_direct("AppColors.errorLight AppColors.error");
        assert_eq!(out, "SemanticColors.errorLight SemanticColors.error");
    }

    #[test]
    fn direct_ignores_longer_namespace() {
        let (out, count) = table().lookup_direct("MyAppColors.primary");
        assert_eq!(out, "MyAppColors.primary");
        assert_eq!(count, 0);
    }

    #[test]
    fn parameterized_rewrites_mapped_literal() {
        let lookup = table().lookup_parameterized("AppColors.textPrimary.opacity(0.3)");
        assert_eq!(lookup.text, "SemanticColors.textPrimary.opacity(Opacity.light)");
        assert_eq!(lookup.count, 1);
        assert!(lookup.unresolved.is_empty());
    }

    #[test]
    fn parameterized_uses_direct_replacement_name() {
        let lookup = table().lookup_parameterized("AppColors.primary.opacity(0.05)");
        assert_eq!(lookup.text, "SemanticColors.primaryAction.opacity(Opacity.verySubtle)");
    }

    #[test]
    fn parameterized_tolerates_inner_whitespace() {
        let lookup = table().lookup_parameterized("AppColors.border.opacity( 0.9 )");
        assert_eq!(lookup.text, "SemanticColors.border.opacity(Opacity.strong)");
    }

    #[test]
    fn parameterized_never_guesses_unmapped_literal() {
        let line = "x: AppColors.textPrimary.opacity(0.33)";
        let lookup = table().lookup_parameterized(line);
        assert_eq!(lookup.text, line);
        assert_eq!(lookup.count, 0);
        assert_eq!(lookup.unresolved, vec!["AppColors.textPrimary.opacity(0.33)".to_string()]);
    }

    #[test]
    fn parameterized_reports_non_parameterized_symbol() {
        let lookup = table().lookup_parameterized("AppColors.shadow.opacity(0.3)");
        assert_eq!(lookup.count, 0);
        assert_eq!(lookup.unresolved, vec!["AppColors.shadow.opacity(0.3)".to_string()]);
    }

    #[test]
    fn parameterized_handles_mixed_line() {
        let lookup = table().lookup_parameterized(
            "AppColors.error.opacity(0.1), AppColors.error.opacity(0.11), AppColors.info.opacity(0.6)",
        );
        assert_eq!(
            lookup.text,
            "SemanticColors.error.opacity(Opacity.subtle), AppColors.error.opacity(0.11), SemanticColors.info.opacity(Opacity.medium)"
        );
        assert_eq!(lookup.count, 2);
        assert_eq!(lookup.unresolved.len(), 1);
    }

    #[test]
    fn unresolved_extracts_full_reference() {
        let found = table().unresolved("fill(AppColors.Budget.income.opacity(0.2)) AppColors.brand");
        assert_eq!(
            found,
            vec![
                "AppColors.Budget.income.opacity(0.2)".to_string(),
                "AppColors.brand".to_string()
            ]
        );
    }

    #[test]
    fn opacity_mapping_is_exact() {
        let t = table();
        assert_eq!(t.opacity().resolve("0.4").as_deref(), Some("Opacity.light"));
        assert_eq!(t.opacity().resolve("0.40"), None);
        assert_eq!(t.opacity().resolve(".4"), None);
        assert_eq!(t.opacity().len(), 13);
    }

    #[test]
    fn rejects_new_namespace_that_reintroduces_marker() {
        let mut config = builtin_config().rules;
        config.new_namespace = "NewAppColors".to_string();
        let err = RuleTable::from_config(&config).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
        assert_eq!(err.details["key"], "rules.new_namespace");
    }

    #[test]
    fn rejects_duplicate_direct_symbol() {
        let mut config = builtin_config().rules;
        config.direct.push(DirectRuleConfig {
            name: "again".to_string(),
            symbol: "primary".to_string(),
            replacement: "brand".to_string(),
            description: String::new(),
        });
        assert!(RuleTable::from_config(&config).is_err());
    }

    #[test]
    fn rejects_parameterized_symbol_without_direct_rule() {
        let mut config = builtin_config().rules;
        config.parameterized.push("brand".to_string());
        let err = RuleTable::from_config(&config).unwrap_err();
        assert_eq!(err.details["key"], "rules.parameterized");
    }

    #[test]
    fn custom_namespace_is_escaped_and_applied() {
        let mut config = builtin_config().rules;
        config.legacy_namespace = "Palette".to_string();
        config.new_namespace = "Tokens".to_string();
        let t = RuleTable::from_config(&config).unwrap();
        assert_eq!(t.marker(), "Palette.");
        let (out, count) = t.lookup_direct("Palette.accent AppColors.accent");
        assert_eq!(out, "Tokens.accent AppColors.accent");
        assert_eq!(count, 1);
    }
}
