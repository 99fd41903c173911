//! Java source discovery under the configured roots.

use std::path::{Path, PathBuf};

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use published_core::errors::LoadError;

/// All `.java` files under `roots`, minus `exclude` globs, sorted.
///
/// A root that is a single file is taken as is. A missing root is an error:
/// silently skipping it would yield a shorter whitelist.
pub fn find_java_sources(roots: &[PathBuf], exclude: &[String]) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            if is_java(root) {
                files.push(root.clone());
            }
            continue;
        }
        if !root.is_dir() {
            return Err(LoadError::Walk {
                root: root.clone(),
                message: "source root does not exist".to_string(),
            });
        }

        let mut overrides = OverrideBuilder::new(root);
        for pattern in exclude {
            overrides
                .add(&format!("!{pattern}"))
                .map_err(|e| LoadError::Walk {
                    root: root.clone(),
                    message: format!("invalid exclude pattern '{pattern}': {e}"),
                })?;
        }
        let overrides = overrides.build().map_err(|e| LoadError::Walk {
            root: root.clone(),
            message: e.to_string(),
        })?;

        let walker = WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(true)
            .require_git(false)
            .follow_links(false)
            .overrides(overrides)
            .build();

        for entry in walker {
            let entry = entry.map_err(|e| LoadError::Walk {
                root: root.clone(),
                message: e.to_string(),
            })?;
            let path = entry.path();
            if path.is_file() && is_java(path) {
                files.push(path.to_path_buf());
            }
        }
    }
    files.sort();
    files.dedup();
    tracing::debug!(roots = roots.len(), files = files.len(), "java sources discovered");
    Ok(files)
}

fn is_java(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "java")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_java_files_sorted_and_excludes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("com/acme/internal")).unwrap();
        std::fs::write(root.join("com/acme/B.java"), "class B {}").unwrap();
        std::fs::write(root.join("com/acme/A.java"), "class A {}").unwrap();
        std::fs::write(root.join("com/acme/notes.txt"), "x").unwrap();
        std::fs::write(root.join("com/acme/internal/C.java"), "class C {}").unwrap();

        let all = find_java_sources(&[root.to_path_buf()], &[]).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0] <= w[1]));

        let kept = find_java_sources(&[root.to_path_buf()], &["**/internal/**".to_string()]).unwrap();
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|p| !p.to_string_lossy().contains("internal")));
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            find_java_sources(&[missing], &[]),
            Err(LoadError::Walk { .. })
        ));
    }
}
