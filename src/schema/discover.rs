use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use walkdir::WalkDir;

/// First file under `root` matching `patterns`, tried in order. Directories
/// named in `ignored_dirs` are not descended into.
pub fn find_schema_file(root: &Path, patterns: &[String], ignored_dirs: &[String]) -> Option<PathBuf> {
    let matchers: Vec<GlobMatcher> = patterns
        .iter()
        .filter_map(|pattern| match Glob::new(pattern) {
            Ok(glob) => Some(glob.compile_matcher()),
            Err(err) => {
                tracing::warn!(%pattern, %err, "ignoring invalid schema pattern");
                None
            }
        })
        .collect();
    if matchers.is_empty() {
        return None;
    }

    let candidates: Vec<PathBuf> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.depth() > 0
                && entry.file_type().is_dir()
                && ignored_dirs.iter().any(|dir| entry.file_name() == dir.as_str()))
        })
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();

    matchers
        .iter()
        .find_map(|m| candidates.iter().find(|rel| m.is_match(rel)))
        .map(|rel| root.join(rel))
}
