/// Recursive discovery of texture files under the search root.
use crate::texture_io::TextureFormat;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Lists every file below `root` with the requested extension.
/// Unreadable entries are reported and skipped.
pub fn discover_textures(root: &Path, format: TextureFormat) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| format.matches(path))
        .collect()
}
