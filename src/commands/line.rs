use clap::Args;
use serde::Serialize;

use repaint::migrate::{Engine, SkippedInstance};

use super::CmdResult;

#[derive(Args)]
pub struct LineArgs {
    /// Source line to rewrite
    pub text: String,

    /// Line number to report (1-based)
    #[arg(long, default_value_t = 1)]
    pub line_number: usize,

    /// Rule set JSON file (defaults to the global repaint.json, then built-ins)
    #[arg(long)]
    pub rules: Option<String>,
}

#[derive(Serialize)]
pub struct LineOutput {
    command: String,
    input: String,
    output: String,
    replacements: usize,
    changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped: Option<SkippedInstance>,
}

pub fn run(args: LineArgs, _global: &super::GlobalArgs) -> CmdResult<LineOutput> {
    let config = super::load_config(args.rules.as_deref())?;
    let engine = Engine::from_config(&config.rules)?;

    let outcome = engine.rewriter().rewrite(&args.text, args.line_number);
    let exit_code = if outcome.skipped.is_some() { 1 } else { 0 };

    Ok((
        LineOutput {
            command: "line".to_string(),
            changed: outcome.line != args.text,
            input: args.text,
            output: outcome.line,
            replacements: outcome.replacements,
            skipped: outcome.skipped,
        },
        exit_code,
    ))
}
