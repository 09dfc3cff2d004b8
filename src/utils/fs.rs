//! File writing helpers.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, SwitchError};

/// Replace the file at `path` with `content` in one step.
///
/// The content goes to a temporary file in the same directory, which is then
/// renamed over the target, so readers never see a half-written file.
/// Parent directories are created as needed.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| SwitchError::write(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| SwitchError::write(path, e))?;
    tmp.write_all(content)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| SwitchError::write(path, e))?;
    tmp.persist(path)
        .map_err(|e| SwitchError::write(path, e.error))?;

    Ok(())
}
