// src/db/paths.rs
//! Centralized path derivation for Potluck data directories

use std::path::{Path, PathBuf};

/// Get the directory containing the database
pub fn db_dir(db_path: &Path) -> PathBuf {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Get the directory recipe images are served from
pub fn media_dir(db_path: &Path) -> PathBuf {
    db_dir(db_path).join("media")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_dir() {
        assert_eq!(
            db_dir(Path::new("/var/lib/potluck/potluck.db")),
            PathBuf::from("/var/lib/potluck")
        );
    }

    #[test]
    fn test_db_dir_for_bare_filename() {
        assert_eq!(db_dir(Path::new("potluck.db")), PathBuf::from("."));
    }

    #[test]
    fn test_media_dir() {
        assert_eq!(
            media_dir(Path::new("/var/lib/potluck/potluck.db")),
            PathBuf::from("/var/lib/potluck/media")
        );
    }
}
