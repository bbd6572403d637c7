use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Result of sanitizing an archive entry path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SanitizedPath {
    pub original: PathBuf,
    pub resolved: PathBuf,
}

/// Resolve an archive entry path against `base` and reject it if the result
/// leaves `base`.
///
/// `base` is expected to be absolute and already canonical. The entry path is
/// joined first and normalized afterwards, so `..` segments are weighed
/// against the base rather than discarded. Containment is checked per path
/// component: `/tmp/out2/x` is not inside `/tmp/out`.
pub fn sanitize_path<P: AsRef<Path>, B: AsRef<Path>>(entry_path: P, base: B) -> Result<SanitizedPath> {
    let entry_path = entry_path.as_ref();
    let base = base.as_ref();

    if entry_path.as_os_str().is_empty() {
        return Err(Error::InvalidPath);
    }

    // Absolute paths and drive prefixes would replace the base on join.
    if entry_path.has_root()
        || entry_path
            .components()
            .any(|c| matches!(c, Component::Prefix(_)))
    {
        return Err(Error::PathTraversal {
            entry: entry_path.to_path_buf(),
            resolved: normalize_path(entry_path),
        });
    }

    let resolved = normalize_path(&base.join(entry_path));
    if !is_within(base, &resolved) {
        return Err(Error::PathTraversal {
            entry: entry_path.to_path_buf(),
            resolved,
        });
    }

    Ok(SanitizedPath {
        original: entry_path.to_path_buf(),
        resolved,
    })
}

/// Sanitize the target of a symlink located at `symlink_location`.
///
/// Relative targets are resolved from the link's parent directory and must
/// stay inside `base`. Absolute targets are always rejected.
pub fn sanitize_symlink_target<P: AsRef<Path>, L: AsRef<Path>, B: AsRef<Path>>(
    target: P,
    symlink_location: L,
    base: B,
) -> Result<PathBuf> {
    let target = target.as_ref();
    let symlink_location = symlink_location.as_ref();
    let base = base.as_ref();

    if target.has_root() || target.components().any(|c| matches!(c, Component::Prefix(_))) {
        return Err(Error::AbsoluteSymlinkTarget {
            target: target.to_path_buf(),
            symlink: symlink_location.to_path_buf(),
        });
    }

    let parent = symlink_location.parent().unwrap_or(base);
    let resolved = normalize_path(&parent.join(target));

    if !is_within(base, &resolved) {
        return Err(Error::SymlinkEscape {
            target: target.to_path_buf(),
            resolved,
        });
    }

    Ok(resolved)
}

/// Component-wise ancestor test. A path is within itself.
pub fn is_within(base: &Path, candidate: &Path) -> bool {
    candidate.starts_with(base)
}

/// Resolve `.` and `..` lexically without touching the filesystem.
///
/// `..` at the root stays at the root, matching how the OS resolves it.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(part) => result.push(part),
            Component::RootDir => result.push(component.as_os_str()),
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::CurDir => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn test_base_path() -> &'static Path {
        if cfg!(windows) {
            Path::new("C:/tmp/out")
        } else {
            Path::new("/tmp/out")
        }
    }

    #[test]
    fn basic_path_sanitization() {
        let result = sanitize_path("repeat-1/collections.db", test_base_path()).unwrap();
        assert_eq!(result.original, Path::new("repeat-1/collections.db"));
        assert_eq!(
            result.resolved,
            test_base_path().join("repeat-1").join("collections.db")
        );
    }

    #[test]
    fn current_dir_entry_resolves_to_base() {
        let result = sanitize_path("./", test_base_path()).unwrap();
        assert_eq!(result.resolved, test_base_path());
    }

    #[test]
    fn inner_parent_segments_are_allowed() {
        let result = sanitize_path("repeat-1/logs/../collections.db", test_base_path()).unwrap();
        assert_eq!(
            result.resolved,
            test_base_path().join("repeat-1").join("collections.db")
        );
    }

    #[test]
    fn parent_escape_rejected() {
        let result = sanitize_path("../outside.txt", test_base_path());
        assert!(matches!(result, Err(Error::PathTraversal { .. })));
    }

    #[test]
    fn excess_parent_segments_are_not_swallowed() {
        // "a/../../x" climbs one level above the base once joined.
        let result = sanitize_path("a/../../x", test_base_path());
        assert!(matches!(result, Err(Error::PathTraversal { .. })));
    }

    #[test]
    fn deep_escape_rejected() {
        let result = sanitize_path("../../etc/passthrough", test_base_path());
        let Err(Error::PathTraversal { resolved, .. }) = result else {
            panic!("expected traversal error");
        };
        assert!(!resolved.starts_with(test_base_path()));
    }

    #[test]
    fn sibling_with_shared_prefix_rejected() {
        let result = sanitize_path("../out2/file", test_base_path());
        assert!(matches!(result, Err(Error::PathTraversal { .. })));
    }

    #[test]
    fn sibling_prefix_is_not_within() {
        let base = Path::new("/tmp/out");
        assert!(!is_within(base, Path::new("/tmp/out2")));
        assert!(!is_within(base, Path::new("/tmp/out2/x")));
        assert!(is_within(base, Path::new("/tmp/out")));
        assert!(is_within(base, Path::new("/tmp/out/x")));
    }

    #[test]
    fn absolute_entry_rejected() {
        let malicious_path = if cfg!(windows) { "C:\\etc\\passwd" } else { "/etc/passwd" };
        let result = sanitize_path(malicious_path, test_base_path());
        assert!(matches!(result, Err(Error::PathTraversal { .. })));
    }

    #[test]
    fn empty_entry_rejected() {
        assert!(matches!(
            sanitize_path("", test_base_path()),
            Err(Error::InvalidPath)
        ));
    }

    #[test]
    fn symlink_target_sanitization() {
        let symlink_location = test_base_path().join("repeat-1/latest");
        let result =
            sanitize_symlink_target("../repeat-1/collections.db", &symlink_location, test_base_path())
                .unwrap();
        assert_eq!(
            result,
            test_base_path().join("repeat-1").join("collections.db")
        );
    }

    #[test]
    fn symlink_escape_rejected() {
        let symlink_location = test_base_path().join("repeat-1/up");
        let result = sanitize_symlink_target("../..", &symlink_location, test_base_path());
        assert!(matches!(result, Err(Error::SymlinkEscape { .. })));
    }

    #[test]
    fn symlink_absolute_path_rejected() {
        let absolute_target = if cfg!(windows) { "C:\\etc\\passwd" } else { "/etc/passwd" };
        let symlink_location = test_base_path().join("repeat-1/link");
        let result = sanitize_symlink_target(absolute_target, symlink_location, test_base_path());
        assert!(matches!(result, Err(Error::AbsoluteSymlinkTarget { .. })));
    }

    #[test]
    fn path_normalization() {
        let result = normalize_path(Path::new("foo/./bar/baz/../qux"));
        assert_eq!(result, Path::new("foo/bar/qux"));
    }

    #[cfg(unix)]
    #[test]
    fn normalization_stops_at_root() {
        assert_eq!(normalize_path(Path::new("/a/../../..")), Path::new("/"));
    }

    fn segment() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_-][A-Za-z0-9_.-]{0,11}".prop_filter("not a dot segment", |s| s != "." && s != "..")
    }

    proptest! {
        #[test]
        fn normal_segments_stay_inside(segments in prop::collection::vec(segment(), 1..6)) {
            let entry: PathBuf = segments.iter().collect();
            let result = sanitize_path(&entry, test_base_path()).unwrap();
            prop_assert!(result.resolved.starts_with(test_base_path()));
            prop_assert_eq!(result.resolved, test_base_path().join(&entry));
        }

        #[test]
        fn climbing_above_base_is_rejected(
            segments in prop::collection::vec(segment(), 0..4),
            extra in 1usize..4,
        ) {
            let mut entry: PathBuf = segments.iter().collect();
            for _ in 0..segments.len() + extra {
                entry.push("..");
            }
            entry.push("escaped");
            let is_traversal = matches!(
                sanitize_path(&entry, test_base_path()),
                Err(Error::PathTraversal { .. })
            );
            prop_assert!(is_traversal);
        }
    }
}
