//! Path validation for user-supplied names.
//!
//! Sound, group and folder names come straight from slash-command options and end up
//! as filesystem entries under a community root. [`validate`] is the single gate every
//! such name passes through before it touches the disk.

use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};
use thiserror::Error;

/// Why a name was refused by [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The name contains `/`, `\` or the platform separator.
    #[error("`{name}` cannot contain path separators.")]
    ContainsSeparator {
        /// The rejected name
        name: String,
    },

    /// The name is `.` or `..`.
    #[error("`{name}` is not a valid name.")]
    Reserved {
        /// The rejected name
        name: String,
    },

    /// The name resolves to a location that is not strictly inside the root.
    #[error("`{name}` does not resolve to a location inside the soundboard directory.")]
    EscapesRoot {
        /// The rejected name
        name: String,
    },
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\' || c == MAIN_SEPARATOR
}

/// Validates `name` as a single entry directly inside `root` and returns its absolute path.
///
/// Rejects separators, the reserved names `.` and `..`, and anything whose lexically
/// resolved location is not strictly below `root`. Performs no filesystem access.
pub fn validate(name: &str, root: &Path) -> Result<PathBuf, PathError> {
    if name.chars().any(is_separator) {
        return Err(PathError::ContainsSeparator {
            name: name.to_string(),
        });
    }

    if name == "." || name == ".." {
        return Err(PathError::Reserved {
            name: name.to_string(),
        });
    }

    let escapes = || PathError::EscapesRoot {
        name: name.to_string(),
    };

    let root = normalize(&std::path::absolute(root).map_err(|_| escapes())?);
    let candidate = normalize(&root.join(name));

    // A name made entirely of components that normalize away (e.g. "") lands on the root itself.
    if candidate == root || !candidate.starts_with(&root) {
        return Err(escapes());
    }

    // Exactly one component below the root; anything deeper means a separator slipped through.
    if candidate.parent() != Some(root.as_path()) {
        return Err(PathError::ContainsSeparator {
            name: name.to_string(),
        });
    }

    Ok(candidate)
}

/// Lexically resolves `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn root() -> PathBuf {
        PathBuf::from("/srv/sounds/1234")
    }

    #[test]
    fn test_plain_name_resolves_inside_root() {
        let path = validate("dj", &root()).unwrap();
        assert_eq!(path, PathBuf::from("/srv/sounds/1234/dj"));
    }

    #[test]
    fn test_separators_are_rejected() {
        for name in ["a/b", "../etc", "..\\windows", "/etc/passwd", "dj/", "\\"] {
            let result = validate(name, &root());
            assert!(
                matches!(result, Err(PathError::ContainsSeparator { .. })),
                "{name} should be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn test_reserved_names_are_rejected() {
        assert_eq!(
            validate(".", &root()),
            Err(PathError::Reserved {
                name: ".".to_string()
            })
        );
        assert_eq!(
            validate("..", &root()),
            Err(PathError::Reserved {
                name: "..".to_string()
            })
        );
    }

    #[test]
    fn test_empty_name_does_not_resolve_to_root() {
        assert!(matches!(
            validate("", &root()),
            Err(PathError::EscapesRoot { .. })
        ));
    }

    #[test]
    fn test_dots_inside_a_name_are_fine() {
        let path = validate("..dj..", &root()).unwrap();
        assert_eq!(path.file_name().unwrap(), "..dj..");
        let path = validate("air.horn", &root()).unwrap();
        assert_eq!(path.parent().unwrap(), root());
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let path = validate("dj", Path::new("sounds/1234")).unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("sounds/1234/dj"));
    }

    #[test]
    fn test_result_never_leaves_root() {
        let names = [
            "a", "..", ".", "", "x/..", "../..", "..\\..", "%2e%2e", "dj:theme", " ", "…",
        ];
        let root = root();
        for name in names {
            if let Ok(path) = validate(name, &root) {
                assert!(path.starts_with(&root));
                assert_ne!(path, root);
            }
        }
    }
}
