//! Result document discovery.

use std::path::{Path, PathBuf};

use sleval_core::Result;
use walkdir::{DirEntry, WalkDir};

/// A discovered result document and the model it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    /// Name of the directory directly containing the document.
    pub model: String,
    pub path: PathBuf,
}

/// Result documents are named `results*.json`.
fn is_result_document(name: &str) -> bool {
    name.starts_with("results") && name.ends_with(".json")
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}

/// Recursively find result documents under `root`, in sorted path order.
///
/// Hidden directories are not descended into.
pub fn discover_result_documents(root: &Path) -> Result<Vec<DocumentRef>> {
    let mut found = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !is_result_document(&entry.file_name().to_string_lossy()) {
            continue;
        }

        let model = entry
            .path()
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::debug!("Result document for {}: {}", model, entry.path().display());

        found.push(DocumentRef {
            model,
            path: entry.into_path(),
        });
    }

    Ok(found)
}
