//! Filename sanitization for downloaded assets
//!
//! Book titles and cover names come straight from remote markup, so they
//! can carry characters no filesystem accepts, or dot segments that would
//! escape the destination directory.

use std::path::{Component, Path};

/// Sanitizes a filename for filesystem safety
///
/// Replaces characters that are invalid on common filesystems
/// (`/ \ : * ? " < > |`) and control characters with `_`. Bare dot
/// segments are rewritten so the result always names a file inside the
/// destination directory. Sanitizing an already-sanitized name is a
/// no-op.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_removes_invalid_chars() {
        assert_eq!(sanitize_filename("file/name.txt"), "file_name.txt");
        assert_eq!(sanitize_filename("file\\name.txt"), "file_name.txt");
        assert_eq!(sanitize_filename("file:name.txt"), "file_name.txt");
        assert_eq!(sanitize_filename("file*name.txt"), "file_name.txt");
        assert_eq!(sanitize_filename("file?name.txt"), "file_name.txt");
        assert_eq!(sanitize_filename("file\"name.txt"), "file_name.txt");
        assert_eq!(sanitize_filename("file<name>.txt"), "file_name_.txt");
        assert_eq!(sanitize_filename("file|name.txt"), "file_name.txt");
    }

    #[test]
    fn test_sanitize_filename_preserves_valid_chars() {
        assert_eq!(
            sanitize_filename("valid-file_name.txt"),
            "valid-file_name.txt"
        );
        assert_eq!(sanitize_filename("file (1).txt"), "file (1).txt");
        assert_eq!(sanitize_filename("Пёс и его тень.txt"), "Пёс и его тень.txt");
    }

    #[test]
    fn test_sanitize_filename_rewrites_dot_segments() {
        assert_eq!(sanitize_filename("."), "_");
        assert_eq!(sanitize_filename(".."), "__");
    }

    #[test]
    fn test_sanitize_filename_empty_input() {
        assert_eq!(sanitize_filename(""), "_");
    }

    #[test]
    fn test_sanitize_filename_is_idempotent() {
        for name in [
            "Алиби.txt",
            "file: with * everything?.jpg",
            "..",
            "",
            "nested/path\\name.txt",
        ] {
            let once = sanitize_filename(name);
            let twice = sanitize_filename(&once);
            assert_eq!(once, twice, "sanitization must be a no-op on {:?}", once);
        }
    }

    #[test]
    fn test_sanitized_name_stays_in_directory() {
        for name in ["../../etc/passwd", "..", "a/../b"] {
            let sanitized = sanitize_filename(name);
            assert!(!sanitized.contains('/'), "got {:?}", sanitized);
            assert!(!sanitized.contains('\\'), "got {:?}", sanitized);
        }
    }
}
