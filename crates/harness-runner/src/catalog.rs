use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{LaunchError, Result};

/// File names (extension kept) of the test scripts directly inside `dir`,
/// sorted by name.
pub fn list_scripts(dir: &Path, extension: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| LaunchError::ScriptsDir {
            path: dir.to_path_buf(),
            source: e
                .into_io_error()
                .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "directory loop")),
        })?;
        // Symlinked scripts count; `path().is_file()` follows the link.
        if !entry.path().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some(extension) {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    tracing::debug!(dir = %dir.display(), count = names.len(), "listed test scripts");
    Ok(names)
}
