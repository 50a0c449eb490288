//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read file contents with standardized error handling.
///
/// Wraps `fs::read_to_string` with consistent `Error::internal_io` formatting.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Write content to file with standardized error handling.
///
/// Wraps `fs::write` with consistent `Error::internal_io` formatting.
pub fn write_file(path: &Path, content: &str, operation: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Write content to file atomically (write to .tmp, then rename).
///
/// The full content goes out in one write to a temp file beside the real
/// target, which then replaces it. Symlinks are resolved first, so the link
/// stays a link and the file it points at receives the content. Permissions
/// of an existing target are carried over to the replacement.
pub fn write_file_atomic(path: &Path, content: &str, operation: &str) -> Result<()> {
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    let parent = target.parent().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let filename = target.file_name().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let tmp_path = parent.join(format!(".{}.repaint.tmp", filename.to_string_lossy()));

    let staged = fs::write(&tmp_path, content)
        .map_err(|e| (e, "write temp"))
        .and_then(|()| match fs::metadata(&target) {
            Ok(meta) => fs::set_permissions(&tmp_path, meta.permissions())
                .map_err(|e| (e, "copy permissions")),
            Err(_) => Ok(()),
        })
        .and_then(|()| fs::rename(&tmp_path, &target).map_err(|e| (e, "rename")));

    if let Err((e, step)) = staged {
        let _ = fs::remove_file(&tmp_path);
        return Err(Error::internal_io(
            e.to_string(),
            Some(format!("{} ({})", operation, step)),
        ));
    }

    Ok(())
}
