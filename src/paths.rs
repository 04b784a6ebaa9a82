//! Resolve command-line path arguments, which may be glob patterns.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use thiserror::Error;

/// Errors while resolving path arguments.
#[derive(Error, Debug)]
pub enum PathError {
    #[error("could not find file(s) given by the path '{0}'")]
    NotFound(String),

    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        source: ignore::Error,
    },
}

/// Expand `pattern` into the existing files it names.
///
/// Patterns containing `*`, `?`, `[` or `]` are matched against the files
/// below their literal directory prefix, hidden files included. Other
/// patterns name a single file. When `required` is set, finding nothing is
/// an error.
pub fn filepaths(pattern: &str, required: bool) -> Result<Vec<PathBuf>, PathError> {
    let paths = if is_glob(pattern) {
        expand_glob(pattern)?
    } else {
        let path = PathBuf::from(pattern);
        if path.is_file() { vec![path] } else { Vec::new() }
    };

    if required && paths.is_empty() {
        return Err(PathError::NotFound(pattern.to_string()));
    }
    Ok(paths)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', ']'])
}

/// Walk the literal prefix of `pattern` and keep the files matching the rest.
fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>, PathError> {
    let invalid = |source| PathError::InvalidGlob {
        pattern: pattern.to_string(),
        source,
    };

    // Split into a literal root directory and the glob below it.
    let mut root = PathBuf::new();
    let mut rest = Vec::new();
    for component in Path::new(pattern).components() {
        let part = component.as_os_str().to_string_lossy();
        if rest.is_empty() && !is_glob(&part) {
            root.push(component);
        } else {
            rest.push(part.into_owned());
        }
    }
    if root.as_os_str().is_empty() {
        root.push(".");
    }
    let glob = rest.join("/");
    let depth = if glob.contains("**") { None } else { Some(rest.len()) };

    // Anchor at the root so a bare file name does not match in subdirectories.
    let mut overrides = OverrideBuilder::new(&root);
    overrides.add(&format!("/{glob}")).map_err(invalid)?;
    let overrides = overrides.build().map_err(invalid)?;

    let walker = WalkBuilder::new(&root)
        .standard_filters(false)
        .overrides(overrides)
        .max_depth(depth)
        .build();

    let mut paths: Vec<PathBuf> = walker
        .flatten()
        .filter(|entry| entry.depth() > 0 && entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .collect();
    paths.sort();
    Ok(paths)
}
