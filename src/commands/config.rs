use clap::{Args, Subcommand};
use serde::Serialize;

use repaint::defaults::{self, RepaintConfig};
use repaint::migrate::Engine;

use super::CmdResult;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display the effective configuration
    Show {
        /// Show only built-in defaults (ignore repaint.json)
        #[arg(long)]
        builtin: bool,
        /// Rule set JSON file to show instead of the global config
        #[arg(long)]
        rules: Option<String>,
    },
    /// Compile the effective rule set and report its size
    Validate {
        /// Rule set JSON file to validate instead of the global config
        #[arg(long)]
        rules: Option<String>,
    },
    /// Write the built-in configuration to repaint.json
    Init {
        /// Overwrite an existing repaint.json
        #[arg(long)]
        force: bool,
    },
    /// Show the path to repaint.json
    Path,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<RepaintConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    written: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule_counts: Option<RuleCounts>,
}

#[derive(Debug, Serialize)]
pub struct RuleCounts {
    marker: String,
    legacy_namespace: String,
    new_namespace: String,
    direct: usize,
    parameterized: usize,
    opacity_levels: usize,
    skip_patterns: usize,
}

impl ConfigOutput {
    fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            config: None,
            path: None,
            exists: None,
            written: None,
            rule_counts: None,
        }
    }
}

pub fn run(args: ConfigArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show { builtin, rules } => show(builtin, rules.as_deref()),
        ConfigCommand::Validate { rules } => validate(rules.as_deref()),
        ConfigCommand::Init { force } => init(force),
        ConfigCommand::Path => path(),
    }
}

fn show(builtin: bool, rules: Option<&str>) -> CmdResult<ConfigOutput> {
    let config = if builtin {
        defaults::builtin_config()
    } else {
        super::load_config(rules)?
    };

    Ok((
        ConfigOutput {
            config: Some(config),
            ..ConfigOutput::new("config.show")
        },
        0,
    ))
}

fn validate(rules: Option<&str>) -> CmdResult<ConfigOutput> {
    let config = super::load_config(rules)?;
    let engine = Engine::from_config(&config.rules)?;

    Ok((
        ConfigOutput {
            rule_counts: Some(RuleCounts {
                marker: engine.rules.marker().to_string(),
                legacy_namespace: engine.rules.legacy_namespace().to_string(),
                new_namespace: engine.rules.new_namespace().to_string(),
                direct: engine.rules.direct_rules().len(),
                parameterized: engine.rules.parameterized_entries().len(),
                opacity_levels: engine.rules.opacity().len(),
                skip_patterns: engine.skip.patterns().len(),
            }),
            ..ConfigOutput::new("config.validate")
        },
        0,
    ))
}

fn init(force: bool) -> CmdResult<ConfigOutput> {
    let path = defaults::config_path()?;

    if defaults::config_exists() && !force {
        return Err(repaint::Error::validation_invalid_argument(
            "force",
            format!("{} already exists", path),
            None,
            None,
        )
        .with_hint("Run 'repaint config init --force' to overwrite it"));
    }

    let config = defaults::builtin_config();
    defaults::save_config(&config)?;

    Ok((
        ConfigOutput {
            config: Some(config),
            path: Some(path),
            exists: Some(true),
            written: Some(true),
            ..ConfigOutput::new("config.init")
        },
        0,
    ))
}

fn path() -> CmdResult<ConfigOutput> {
    Ok((
        ConfigOutput {
            path: Some(defaults::config_path()?),
            exists: Some(defaults::config_exists()),
            ..ConfigOutput::new("config.path")
        },
        0,
    ))
}
