use std::path::PathBuf;

use repaint::defaults::{self, RepaintConfig};
use repaint::paths;

pub type CmdResult<T> = repaint::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod config;
pub mod line;
pub mod list;
pub mod migrate;

/// Load the effective config, honouring an explicit `--rules` file.
pub(crate) fn load_config(rules: Option<&str>) -> repaint::Result<RepaintConfig> {
    let rules_path: Option<PathBuf> = rules.map(paths::expand);
    defaults::load_config(rules_path.as_deref())
}

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (repaint::Result<serde_json::Value>, i32) {
    crate::tty::status("repaint is working...");

    match command {
        crate::Commands::Migrate(args) => dispatch!(args, global, migrate),
        crate::Commands::List(args) => dispatch!(args, global, list),
        crate::Commands::Line(args) => dispatch!(args, global, line),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}
