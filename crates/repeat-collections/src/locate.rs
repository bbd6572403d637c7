use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use repeat_archive::is_within;

use crate::error::{Error, Result};
use crate::options::LoadOptions;

/// Find the single `<repeat_pattern>/<collections_file>` file directly under
/// `root` and return its canonical path.
///
/// Zero or several candidates are both an error: an archive is expected to
/// hold exactly one collection database. Candidates whose real location is
/// outside `root` are never accepted.
pub fn locate_database(root: &Path, options: &LoadOptions) -> Result<PathBuf> {
    let pattern = Pattern::new(&options.repeat_pattern).map_err(|source| Error::Pattern {
        pattern: options.repeat_pattern.clone(),
        source,
    })?;
    let real_root = fs::canonicalize(root)?;

    let mut matches = Vec::new();
    for entry in fs::read_dir(&real_root)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            tracing::debug!("skipping non UTF-8 entry '{}'", entry.path().display());
            continue;
        };
        if !pattern.matches(name) {
            continue;
        }
        let candidate = entry.path().join(&options.collections_file);
        let Ok(real) = fs::canonicalize(&candidate) else {
            continue;
        };
        if !is_within(&real_root, &real) {
            tracing::warn!(
                "ignoring '{}': resolves outside the archive to '{}'",
                candidate.display(),
                real.display()
            );
            continue;
        }
        if real.is_file() {
            matches.push(real);
        }
    }
    matches.sort();
    matches.dedup();

    match matches.len() {
        1 => {
            let found = matches.remove(0);
            tracing::debug!("located collection database '{}'", found.display());
            Ok(found)
        }
        _ => Err(Error::CollectionNotFound {
            pattern: options.database_pattern(),
            matches: matches
                .iter()
                .map(|m| m.strip_prefix(&real_root).unwrap_or(m).to_path_buf())
                .collect(),
        }),
    }
}
