use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Environment override for the config directory.
const CONFIG_DIR_ENV: &str = "REPAINT_CONFIG_DIR";

/// Base repaint config directory (universal ~/.config/repaint/ on all platforms)
pub fn repaint() -> Result<PathBuf> {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(shellexpand::tilde(&dir).to_string()));
        }
    }

    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("repaint"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("repaint"))
    }
}

/// Global repaint.json config file path
pub fn repaint_json() -> Result<PathBuf> {
    Ok(repaint()?.join("repaint.json"))
}

/// Expand `~` in a user-supplied path.
pub fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}
