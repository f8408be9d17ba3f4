//! Asset name normalization.

use crate::error::StoreError;

/// Normalize an asset name.
///
/// - Replaces backslashes with forward slashes
/// - Collapses redundant separators (`a///b` → `a/b`)
/// - Drops `.` segments
/// - Rejects `..` segments (path traversal not allowed)
/// - Strips leading and trailing slashes
///
/// Returns `Err(StoreError::InvalidPath)` if the name is empty or contains `..`.
pub fn normalize(name: &str) -> Result<String, StoreError> {
    let replaced = name.replace('\\', "/");
    let mut segments = Vec::new();

    for segment in replaced.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(StoreError::InvalidPath(
                    "path traversal (..) not allowed".into(),
                ));
            }
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        return Err(StoreError::InvalidPath("empty path".into()));
    }

    Ok(segments.join("/"))
}

/// Split a normalized name into its first segment and the remainder.
pub(crate) fn split_source(path: &str) -> (&str, &str) {
    path.split_once('/').unwrap_or((path, ""))
}
