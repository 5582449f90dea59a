//! Source tree scanning and output path mapping.

use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

/// Collects every visible regular file under `source_dir`, in a stable
/// order. Hidden entries (leading dot) are skipped along with everything
/// beneath a hidden directory; unreadable entries are logged and skipped.
pub fn collect_sources(source_dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(source_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(DirEntry::into_path)
        .collect()
}

/// Maps a source file to its `.mp3` destination under `output_dir`.
///
/// With `mirror_tree` the path relative to `source_dir` is preserved;
/// otherwise the file lands directly in `output_dir`, where same-named
/// sources from different subfolders collide on one destination.
pub fn output_path_for(
    source_dir: &Path,
    output_dir: &Path,
    input: &Path,
    mirror_tree: bool,
) -> PathBuf {
    let relative: &Path = if mirror_tree {
        input.strip_prefix(source_dir).unwrap_or(input)
    } else {
        input.file_name().map(Path::new).unwrap_or(input)
    };
    output_dir.join(relative).with_extension("mp3")
}
