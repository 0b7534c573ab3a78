//! Output directory materialization.

use std::fs;
use std::io;
use std::path::Path;

/// Creates every missing directory above `file_path`. Succeeds when they
/// already exist; a bare file name (no parent) is a no-op.
pub fn ensure_parent_dir(file_path: &Path) -> io::Result<()> {
    match file_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}
