use crate::error::AppError;
use std::path::{Component, Path};

const FORBIDDEN_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

const PROTECTED_ROOTS: &[&str] = &[
    "/bin",
    "/sbin",
    "/usr",
    "/etc",
    "/System",
    "/Library",
    "/Applications",
    "C:\\Windows",
    "C:\\Program Files",
    "C:\\Program Files (x86)",
];

/// Checks that a remote entry name can be used as a local file name.
pub fn validate_file_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::General("file name is empty".to_string()));
    }
    if name == "." || name == ".." {
        return Err(AppError::General(format!("invalid file name: {name}")));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
        return Err(AppError::General(format!(
            "file name contains forbidden character: {c:?}"
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(AppError::General(
            "file name contains control characters".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_download_dir(dir: &Path) -> Result<(), AppError> {
    if dir.as_os_str().is_empty() {
        return Err(AppError::General("download directory is empty".to_string()));
    }
    if dir.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(AppError::General(
            "path traversal (.. component) not allowed".to_string(),
        ));
    }
    let display = dir.to_string_lossy();
    if is_protected_path(&display) {
        return Err(AppError::General(format!(
            "refusing to download into protected path: {display}"
        )));
    }
    Ok(())
}

pub fn is_protected_path(path: &str) -> bool {
    let normalized = normalize_path_for_match(path);
    PROTECTED_ROOTS.iter().any(|root| {
        let root = normalize_path_for_match(root);
        if is_windows_style_path(&root) {
            let path_lower = normalized.to_ascii_lowercase();
            let root_lower = root.to_ascii_lowercase();
            path_lower == root_lower || path_lower.starts_with(&format!("{root_lower}/"))
        } else {
            normalized == root || normalized.starts_with(&format!("{root}/"))
        }
    })
}

fn normalize_path_for_match(path: &str) -> String {
    let mut normalized = path.trim().replace('\\', "/");
    while normalized.ends_with('/') && normalized.len() > 1 {
        normalized.pop();
    }
    normalized
}

fn is_windows_style_path(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic()
}
