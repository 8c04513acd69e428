//! Loading and parsing Ballerina source trees
//!
//! ```ignore
//! use balsyn::project;
//!
//! for file in project::parse_tree("src/")? {
//!     for error in &file.parse.errors {
//!         eprintln!("{}: {}", file.path.display(), error.format());
//!     }
//! }
//! ```

mod file_loader;

pub use file_loader::{collect_file_paths, load_and_parse, load_file, validate_extension};

use crate::parser::{Parse, ParseOptions};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to read a source file or a source tree
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported file extension for {}: expected .{}", .path.display(), crate::base::SOURCE_EXTENSION)]
    UnsupportedExtension { path: PathBuf },
    #[error("not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },
}

/// One parsed source file
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub parse: Parse,
}

impl ParsedFile {
    pub fn has_errors(&self) -> bool {
        !self.parse.ok()
    }
}

/// Parse every `.bal` file under `dir` with default options
pub fn parse_tree(dir: impl AsRef<Path>) -> Result<Vec<ParsedFile>, LoadError> {
    parse_tree_with(dir, &ParseOptions::default())
}

/// Parse every `.bal` file under `dir`, one parser session per file, in parallel
///
/// Files come back sorted by path. The first unreadable file fails the batch.
pub fn parse_tree_with(
    dir: impl AsRef<Path>,
    options: &ParseOptions,
) -> Result<Vec<ParsedFile>, LoadError> {
    let paths = collect_file_paths(dir.as_ref())?;
    tracing::debug!(files = paths.len(), dir = %dir.as_ref().display(), "parsing source tree");

    let mut files = paths
        .par_iter()
        .map(|path| {
            let source = load_file(path)?;
            Ok(ParsedFile {
                path: path.clone(),
                parse: crate::parser::parse_with(&source, options),
            })
        })
        .collect::<Result<Vec<_>, LoadError>>()?;

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}
