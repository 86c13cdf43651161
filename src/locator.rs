//! Recursive discovery of `.env` templates under a workspace root.

use std::path::Path;

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::models::TemplateFile;

pub(crate) const TEMPLATE_NAMES: [&str; 4] =
    [".env.example", ".env.template", ".env.sample", ".env.dist"];

const DEPENDENCY_DIR: &str = "node_modules";

/// Walks `root` depth first in directory listing order.
///
/// Hidden directories and the dependency cache are never entered, and a
/// directory that cannot be listed is skipped without failing the walk.
pub(crate) fn locate_templates(root: &Path) -> Vec<TemplateFile> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_pruned(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!("skipping: {err}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !TEMPLATE_NAMES.contains(&name.as_str()) {
                return None;
            }
            let path = entry.into_path();
            let relative = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .to_string_lossy()
                .into_owned();
            Some(TemplateFile {
                path,
                name,
                relative,
            })
        })
        .collect()
}

fn is_pruned(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name == DEPENDENCY_DIR
}
