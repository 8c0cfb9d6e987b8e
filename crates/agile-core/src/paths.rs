use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const AGILE_DIR: &str = ".agile";
pub const EXPORTS_DIR: &str = ".agile/exports";
pub const CONFIG_FILE: &str = ".agile/config.yaml";

pub const EXPORT_EXTENSION: &str = "json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn agile_dir(root: &Path) -> PathBuf {
    root.join(AGILE_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn exports_dir(root: &Path) -> PathBuf {
    root.join(EXPORTS_DIR)
}

/// Where a session's transcript is exported when no destination is given.
pub fn default_export_path(root: &Path, session_id: &str) -> PathBuf {
    exports_dir(root).join(format!("{session_id}.{EXPORT_EXTENSION}"))
}

/// Append `.json` unless the path already ends with it.
pub fn with_export_extension(path: &Path) -> PathBuf {
    let has_ext = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(EXPORT_EXTENSION));
    if has_ext {
        return path.to_path_buf();
    }
    let mut os = path.as_os_str().to_owned();
    os.push(".");
    os.push(EXPORT_EXTENSION);
    PathBuf::from(os)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
