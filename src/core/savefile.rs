//! Save-to-file glue: writes an exported schematic to a directory of saved
//! schematics, guarded by an opt-in flag and a path-traversal check. Plain
//! synchronous functions; any HTTP layer maps `SaveError` onto its statuses.

use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub enum SaveError {
    /// The save API is switched off; callers should behave as if the
    /// endpoint does not exist.
    Disabled,
    BadRequest(String),
    Io(String),
}

impl SaveError {
    pub fn status_code(&self) -> u16 {
        match self {
            SaveError::Disabled => 404,
            SaveError::BadRequest(_) => 400,
            SaveError::Io(_) => 500,
        }
    }
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Disabled => write!(f, "save api is disabled"),
            SaveError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            SaveError::Io(msg) => write!(f, "io error: {}", msg),
        }
    }
}

/// True when the `WIRESIM_FILE_SAVE_API` env flag opts in to file saving.
pub fn save_api_enabled() -> bool {
    std::env::var("WIRESIM_FILE_SAVE_API").map_or(false, |v| v == "true")
}

/// Write `body` to `<base_dir>/<filename>` and return the resolved target
/// path.
///
/// The filename comes from an untrusted caller, so the resolved path must
/// stay under `base_dir`; `..` segments or an absolute filename are rejected.
pub fn handle_save_request(
    base_dir: &Path,
    enabled: bool,
    filename: &str,
    body: &str,
) -> Result<PathBuf, SaveError> {
    if !enabled {
        return Err(SaveError::Disabled);
    }
    if filename.is_empty() {
        return Err(SaveError::BadRequest("filename is required".to_string()));
    }

    let target = base_dir.join(filename);
    if !is_safe_path(base_dir, &target) {
        return Err(SaveError::BadRequest(format!("invalid path '{}'", filename)));
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| SaveError::Io(e.to_string()))?;
    }
    fs::write(&target, body).map_err(|e| SaveError::Io(e.to_string()))?;
    Ok(target)
}

fn is_safe_path(base: &Path, target: &Path) -> bool {
    normalize(target).starts_with(normalize(base))
}

/// Lexical path normalization: collapses `.` and `..` without touching the
/// filesystem, so the guard also covers paths that do not exist yet.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_base(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wiresim-save-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_disabled_is_not_found() {
        let base = temp_base("disabled");
        let err = handle_save_request(&base, false, "a.txt", "x").unwrap_err();
        assert_eq!(err, SaveError::Disabled);
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_empty_filename_rejected() {
        let base = temp_base("empty");
        let err = handle_save_request(&base, true, "", "x").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_traversal_rejected() {
        let base = temp_base("traversal");
        let err = handle_save_request(&base, true, "../escape.txt", "x").unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(!base.parent().unwrap().join("escape.txt").exists());
    }

    #[test]
    fn test_save_writes_and_returns_target() {
        let base = temp_base("ok");
        let target = handle_save_request(&base, true, "counter.txt", "#wire-schema 1\n").unwrap();
        assert!(target.starts_with(&base));
        assert_eq!(fs::read_to_string(&target).unwrap(), "#wire-schema 1\n");
    }

    #[test]
    fn test_nested_filename_stays_inside_base() {
        let base = temp_base("nested");
        let target = handle_save_request(&base, true, "sub/counter.txt", "x").unwrap();
        assert!(target.starts_with(&base));
        assert!(target.exists());
    }
}
