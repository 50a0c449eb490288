use clap::Args;
use serde::Serialize;

use repaint::migrate::{self, CandidateFile};
use repaint::paths;

use super::CmdResult;

#[derive(Args)]
pub struct ListArgs {
    /// Root directory to scan
    #[arg(long, default_value = ".")]
    pub path: String,

    /// Rule set JSON file (defaults to the global repaint.json, then built-ins)
    #[arg(long)]
    pub rules: Option<String>,
}

#[derive(Serialize)]
pub struct ListOutput {
    command: String,
    root: String,
    files: Vec<CandidateFile>,
    total_instances: usize,
    total_files: usize,
}

pub fn run(args: ListArgs, _global: &super::GlobalArgs) -> CmdResult<ListOutput> {
    let config = super::load_config(args.rules.as_deref())?;
    let root = paths::expand(&args.path);

    let files = migrate::list(&config, &root)?;
    let total_instances = files.iter().map(|f| f.instances).sum();

    Ok((
        ListOutput {
            command: "list".to_string(),
            root: root.display().to_string(),
            total_files: files.len(),
            total_instances,
            files,
        },
        0,
    ))
}
