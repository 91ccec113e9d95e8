//! Path helpers shared by the indexer and the CLI
//!
//! Directory exclusion is decided on the path relative to the scan root, so a
//! root that itself lives under e.g. `~/build/` is still indexed.

use std::ffi::OsStr;
use std::path::{Component, Path};
use tracing::debug;

/// Strip `root` from `path`, falling back to `path` when it is not under `root`
pub fn relative_to_root<'a>(path: &'a Path, root: &Path) -> &'a Path {
    match path.strip_prefix(root) {
        Ok(rel) => rel,
        Err(_) => {
            debug!(
                "Path {:?} is not under scan root {:?}, using as-is",
                path, root
            );
            path
        }
    }
}

/// Whether any directory between `root` and the file is on the blacklist
///
/// Only directory segments are checked; the file name itself never matches.
pub fn in_excluded_dir(path: &Path, root: &Path, excluded_dirs: &[String]) -> bool {
    let relative = relative_to_root(path, root);
    let Some(parent) = relative.parent() else {
        return false;
    };

    parent.components().any(|component| match component {
        Component::Normal(segment) => excluded_dirs
            .iter()
            .any(|excluded| OsStr::new(excluded) == segment),
        _ => false,
    })
}

/// Display form of a path relative to `root`, with forward slashes
pub fn normalize_path_relative(path: &Path, root: &Path) -> String {
    let path_str = relative_to_root(path, root).to_string_lossy();

    let normalized = if cfg!(windows) {
        path_str.replace('\\', "/")
    } else {
        path_str.to_string()
    };

    match normalized.strip_prefix("./") {
        Some(stripped) => stripped.to_string(),
        None => normalized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn excluded() -> Vec<String> {
        ["build", "node_modules", ".git", "DerivedData"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_excluded_segments() {
        let root = Path::new("/home/dev/app");

        assert!(in_excluded_dir(
            Path::new("/home/dev/app/build/gen/Api.swift"),
            root,
            &excluded()
        ));
        assert!(in_excluded_dir(
            Path::new("/home/dev/app/web/node_modules/react/index.js"),
            root,
            &excluded()
        ));
        assert!(!in_excluded_dir(
            Path::new("/home/dev/app/Sources/BuildSettings.swift"),
            root,
            &excluded()
        ));
    }

    #[test]
    fn test_root_under_excluded_name_is_still_indexed() {
        let root = Path::new("/home/dev/build/app");
        assert!(!in_excluded_dir(
            Path::new("/home/dev/build/app/src/main.rs"),
            root,
            &excluded()
        ));
    }

    #[test]
    fn test_segment_match_is_exact() {
        let root = Path::new("/repo");
        assert!(!in_excluded_dir(
            Path::new("/repo/builder/main.go"),
            root,
            &excluded()
        ));
        assert!(!in_excluded_dir(Path::new("/repo/build"), root, &excluded()));
    }

    #[test]
    fn test_normalize_path_relative() {
        let root = Path::new("/home/user/project");

        let path = Path::new("/home/user/project/src/main.rs");
        assert_eq!(normalize_path_relative(path, root), "src/main.rs");

        let path = Path::new("./src/main.rs");
        assert_eq!(normalize_path_relative(path, root), "src/main.rs");

        let path = Path::new("/elsewhere/lib.rs");
        assert_eq!(normalize_path_relative(path, root), "/elsewhere/lib.rs");
    }
}
