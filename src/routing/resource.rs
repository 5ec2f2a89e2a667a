use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A source file the loaded routes depend on.
///
/// Cached routes stay valid only while every tracked file is fresh.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileResource {
    path: PathBuf,
}

impl FileResource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file is unchanged since `timestamp`.
    ///
    /// A missing or unreadable file is never fresh.
    pub fn is_fresh(&self, timestamp: DateTime<Utc>) -> bool {
        match fs::metadata(&self.path).and_then(|meta| meta.modified()) {
            Ok(modified) => DateTime::<Utc>::from(modified) <= timestamp,
            Err(_) => false,
        }
    }
}

impl std::fmt::Display for FileResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_missing_file_is_stale() {
        let resource = FileResource::new("/definitely/not/here/controller.rs");
        assert!(!resource.is_fresh(Utc::now()));
    }

    #[test]
    fn test_fresh_until_modified() {
        let path = std::env::temp_dir().join(format!(
            "restroute-resource-{}.rs",
            std::process::id()
        ));
        fs::write(&path, "// controller").unwrap();

        let resource = FileResource::new(&path);
        assert!(resource.is_fresh(Utc::now() + Duration::seconds(5)));
        assert!(!resource.is_fresh(Utc::now() - Duration::days(1)));

        fs::remove_file(&path).unwrap();
    }
}
