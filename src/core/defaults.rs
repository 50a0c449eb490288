use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::paths;

/// Root configuration structure for repaint.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepaintConfig {
    #[serde(default = "default_rules")]
    pub rules: RuleSetConfig,

    #[serde(default = "default_discovery")]
    pub discovery: DiscoveryConfig,
}

impl Default for RepaintConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            discovery: default_discovery(),
        }
    }
}

/// A token family migration: legacy vocabulary, new vocabulary, and the
/// exceptions that must never be rewritten.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleSetConfig {
    #[serde(default = "default_legacy_namespace")]
    pub legacy_namespace: String,

    #[serde(default = "default_new_namespace")]
    pub new_namespace: String,

    /// Namespace the symbolic opacity levels live in (`Opacity.light`).
    #[serde(default = "default_level_namespace")]
    pub level_namespace: String,

    #[serde(default = "default_direct_rules")]
    pub direct: Vec<DirectRuleConfig>,

    /// Literal argument → symbolic level name. Several literals share a level.
    #[serde(default = "default_opacity_levels")]
    pub opacity: BTreeMap<String, String>,

    /// Legacy symbols that may be rewritten with an opacity argument.
    /// Each must also have a direct rule; its replacement is reused.
    #[serde(default = "default_parameterized")]
    pub parameterized: Vec<String>,

    #[serde(default = "default_skip_patterns")]
    pub skip: Vec<SkipPatternConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectRuleConfig {
    pub name: String,
    /// Legacy member name (`primary` in `AppColors.primary`).
    pub symbol: String,
    /// New member name (`primaryAction` in `SemanticColors.primaryAction`).
    pub replacement: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkipPatternConfig {
    /// Literal substring; any line containing it is left alone.
    pub pattern: String,
    #[serde(default = "default_skip_label")]
    pub label: String,
}

/// Configuration for candidate file discovery
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscoveryConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns matched against root-relative paths.
    #[serde(default)]
    pub exclude: Vec<String>,
}

// =============================================================================
// Default value functions (the AppColors → SemanticColors family)
// =============================================================================

fn default_rules() -> RuleSetConfig {
    RuleSetConfig {
        legacy_namespace: default_legacy_namespace(),
        new_namespace: default_new_namespace(),
        level_namespace: default_level_namespace(),
        direct: default_direct_rules(),
        opacity: default_opacity_levels(),
        parameterized: default_parameterized(),
        skip: default_skip_patterns(),
    }
}

fn default_legacy_namespace() -> String {
    "AppColors".to_string()
}

fn default_new_namespace() -> String {
    "SemanticColors".to_string()
}

fn default_level_namespace() -> String {
    "Opacity".to_string()
}

fn direct(name: &str, symbol: &str, replacement: &str, description: &str) -> DirectRuleConfig {
    DirectRuleConfig {
        name: name.to_string(),
        symbol: symbol.to_string(),
        replacement: replacement.to_string(),
        description: description.to_string(),
    }
}

fn default_direct_rules() -> Vec<DirectRuleConfig> {
    vec![
        // Text
        direct("textPrimary", "textPrimary", "textPrimary", "Primary text color"),
        direct("textSecondary", "textSecondary", "textSecondary", "Secondary text color"),
        direct("textTertiary", "textTertiary", "textTertiary", "Tertiary text color"),
        // Actions
        direct("primary_action", "primary", "primaryAction", "Primary action color"),
        direct("secondary_action", "secondary", "secondaryAction", "Secondary action color"),
        direct("accent", "accent", "accent", "Accent color"),
        // Status
        direct("success", "success", "success", "Success color"),
        direct("warning", "warning", "warning", "Warning color"),
        direct("error", "error", "error", "Error color"),
        direct("info", "info", "info", "Info color"),
        direct("errorLight", "errorLight", "errorLight", "Light error color"),
        direct("successLight", "successLight", "successLight", "Light success color"),
        direct("warningLight", "warningLight", "warningLight", "Light warning color"),
        direct("infoLight", "infoLight", "infoLight", "Light info color"),
        // Surfaces
        direct("background", "background", "background", "Background color"),
        direct(
            "backgroundSecondary",
            "backgroundSecondary",
            "backgroundSecondary",
            "Secondary background color",
        ),
        direct("cardBackground", "cardBackground", "cardBackground", "Card background color"),
        direct("border", "border", "border", "Border color"),
        direct("divider", "divider", "divider", "Divider color"),
        direct("shadowLight", "shadowLight", "shadowLight", "Light shadow color"),
        direct("shadow", "shadow", "shadow", "Shadow color"),
        // Interactive states
        direct("hover", "hover", "hover", "Hover state color"),
        direct("pressed", "pressed", "pressed", "Pressed state color"),
        direct("disabled", "disabled", "disabled", "Disabled state color"),
        direct("selected", "selected", "selected", "Selected state color"),
    ]
}

fn default_opacity_levels() -> BTreeMap<String, String> {
    [
        ("0.05", "verySubtle"),
        ("0.08", "verySubtle"),
        ("0.1", "subtle"),
        ("0.15", "subtle"),
        ("0.2", "subtle"),
        ("0.25", "light"),
        ("0.3", "light"),
        ("0.4", "light"),
        ("0.5", "medium"),
        ("0.6", "medium"),
        ("0.7", "medium"),
        ("0.8", "strong"),
        ("0.9", "strong"),
    ]
    .into_iter()
    .map(|(literal, level)| (literal.to_string(), level.to_string()))
    .collect()
}

fn default_parameterized() -> Vec<String> {
    [
        "textPrimary",
        "textSecondary",
        "textTertiary",
        "primary",
        "secondary",
        "accent",
        "success",
        "warning",
        "error",
        "info",
        "background",
        "border",
        "divider",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_skip_patterns() -> Vec<SkipPatternConfig> {
    ["Budget", "Vendor", "Guest", "Avatar", "Task"]
        .iter()
        .map(|group| SkipPatternConfig {
            pattern: format!("AppColors.{}.", group),
            label: default_skip_label(),
        })
        .collect()
}

fn default_skip_label() -> String {
    "domain-specific color".to_string()
}

fn default_discovery() -> DiscoveryConfig {
    DiscoveryConfig {
        extensions: default_extensions(),
        exclude: Vec::new(),
    }
}

fn default_extensions() -> Vec<String> {
    vec!["swift".to_string()]
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load the effective config.
///
/// An explicit rules file must exist and parse. Without one, the global
/// repaint.json is used when present, and built-in defaults otherwise.
pub fn load_config(rules_path: Option<&Path>) -> crate::Result<RepaintConfig> {
    if let Some(path) = rules_path {
        if !path.is_file() {
            return Err(crate::Error::target_not_found(
                "rules file",
                path.display().to_string(),
            ));
        }
        return load_config_from_file(path);
    }

    let global = paths::repaint_json()?;
    if !global.exists() {
        return Ok(RepaintConfig::default());
    }

    load_config_from_file(&global)
}

/// Parse a config file.
pub fn load_config_from_file(path: &Path) -> crate::Result<RepaintConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    serde_json::from_str(&content)
        .map_err(|e| crate::Error::config_invalid_json(path.display().to_string(), e))
}

/// Save config to repaint.json file (creates if missing).
pub fn save_config(config: &RepaintConfig) -> crate::Result<()> {
    let path = paths::repaint_json()?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            crate::Error::internal_io(e.to_string(), Some(format!("create {}", parent.display())))
        })?;
    }

    let content = serde_json::to_string_pretty(config).map_err(|e| {
        crate::Error::internal_json(e.to_string(), Some("serialize repaint.json".to_string()))
    })?;

    fs::write(&path, content).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("write {}", path.display())))
    })?;

    Ok(())
}

/// Check if repaint.json file exists
pub fn config_exists() -> bool {
    paths::repaint_json()
        .map(|p| p.exists())
        .unwrap_or(false)
}

/// Get the path to repaint.json (for display purposes)
pub fn config_path() -> crate::Result<String> {
    Ok(paths::repaint_json()?.display().to_string())
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_config() -> RepaintConfig {
    RepaintConfig::default()
}
