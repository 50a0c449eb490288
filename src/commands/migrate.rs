use clap::Args;
use serde::Serialize;

use repaint::migrate::{self, MigrateOptions, MigrationReport};
use repaint::paths;
use repaint::utils::io;

use super::CmdResult;

#[derive(Args)]
pub struct MigrateArgs {
    /// Root directory to scan
    #[arg(long, default_value = ".")]
    pub path: String,

    /// Process only this file (relative to --path unless absolute)
    #[arg(long)]
    pub file: Option<String>,

    /// Show what would change without modifying files
    #[arg(long)]
    pub dry_run: bool,

    /// Rule set JSON file (defaults to the global repaint.json, then built-ins)
    #[arg(long)]
    pub rules: Option<String>,

    /// Write skipped instances to a review file
    #[arg(long, value_name = "FILE")]
    pub output_skipped: Option<String>,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum MigrateOutput {
    #[serde(rename = "migrate")]
    Migrate {
        root: String,
        dry_run: bool,
        #[serde(flatten)]
        report: MigrationReport,
        #[serde(skip_serializing_if = "Option::is_none")]
        review_file: Option<String>,
    },
}

pub fn run(args: MigrateArgs, _global: &super::GlobalArgs) -> CmdResult<MigrateOutput> {
    let config = super::load_config(args.rules.as_deref())?;

    let options = MigrateOptions {
        root: paths::expand(&args.path),
        file: args.file.as_deref().map(paths::expand),
        dry_run: args.dry_run,
    };

    let report = migrate::run(&config, &options)?;

    let review_file = match &args.output_skipped {
        Some(target) => {
            let path = paths::expand(target);
            let generated_at = chrono::Local::now().to_rfc3339();
            io::write_file(
                &path,
                &migrate::render_review(&report, &generated_at),
                &format!("write review file {}", path.display()),
            )?;
            Some(path.display().to_string())
        }
        None => None,
    };

    let exit_code = if report.needs_review() { 1 } else { 0 };

    Ok((
        MigrateOutput::Migrate {
            root: options.root.display().to_string(),
            dry_run: options.dry_run,
            report,
            review_file,
        },
        exit_code,
    ))
}
