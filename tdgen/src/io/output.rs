//! Output file helpers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Atomically write `contents` to `path` (temp file + rename).
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let mut tmp_name = path
        .file_name()
        .with_context(|| format!("output path missing file name {}", path.display()))?
        .to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = parent.join(tmp_name);
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace {}", path.display()))?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

/// Write a serialized document followed by a trailing newline.
pub fn write_document(path: &Path, serialized: &str) -> Result<()> {
    let mut buf = serialized.to_string();
    buf.push('\n');
    write_atomic(path, &buf)
}
