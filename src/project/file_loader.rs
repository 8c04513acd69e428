use super::LoadError;
use crate::base::SOURCE_EXTENSION;
use crate::parser::{Parse, parse};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collect Ballerina source files under `dir`, sorted by path
///
/// Hidden directories (`.git`, `.ballerina`) and `target/` are skipped.
pub fn collect_file_paths(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut paths = Vec::new();
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_ignored_dir(entry));
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            LoadError::Io {
                path,
                source: e.into(),
            }
        })?;
        if entry.file_type().is_file() && validate_extension(entry.path()).is_ok() {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.') || name == "target")
}

pub fn validate_extension(path: &Path) -> Result<(), LoadError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(SOURCE_EXTENSION) => Ok(()),
        _ => Err(LoadError::UnsupportedExtension {
            path: path.to_path_buf(),
        }),
    }
}

/// Read a source file after checking its extension
pub fn load_file(path: &Path) -> Result<String, LoadError> {
    validate_extension(path)?;
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_and_parse(path: &Path) -> Result<Parse, LoadError> {
    let source = load_file(path)?;
    let parsed = parse(&source);
    if !parsed.ok() {
        tracing::debug!(
            path = %path.display(),
            errors = parsed.errors.len(),
            "parsed with errors"
        );
    }
    Ok(parsed)
}
