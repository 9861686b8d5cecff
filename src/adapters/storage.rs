use crate::core::Storage;
use crate::utils::error::{Result, SyncError};
use std::io::ErrorKind;
use std::path::PathBuf;

/// Reads source files relative to a checkout of the replication repository.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        match tokio::fs::read(&full_path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SyncError::MissingSource {
                path: full_path.display().to_string(),
            }),
            Err(e) => Err(SyncError::Io(e)),
        }
    }
}

/// UTF-8 text of a required source file.
pub async fn read_text<S: Storage>(storage: &S, path: &str) -> Result<String> {
    let bytes = storage.read_file(path).await?;
    String::from_utf8(bytes).map_err(|e| {
        SyncError::Io(std::io::Error::new(
            ErrorKind::InvalidData,
            format!("{} is not valid UTF-8: {}", path, e),
        ))
    })
}

/// Like [`read_text`], but a missing file is `None`.
pub async fn read_text_optional<S: Storage>(storage: &S, path: &str) -> Result<Option<String>> {
    match read_text(storage, path).await {
        Ok(text) => Ok(Some(text)),
        Err(SyncError::MissingSource { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_text_relative_to_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("Subfiles")).unwrap();
        std::fs::write(dir.path().join("Subfiles/page.tex"), "\\title{X}").unwrap();

        let storage = LocalStorage::new(dir.path());
        let text = read_text(&storage, "Subfiles/page.tex").await.unwrap();
        assert_eq!(text, "\\title{X}");
    }

    #[tokio::test]
    async fn test_missing_file_is_missing_source() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        let err = read_text(&storage, "README.md").await.unwrap_err();
        assert!(matches!(err, SyncError::MissingSource { .. }));
        assert_eq!(read_text_optional(&storage, "README.md").await.unwrap(), None);
    }
}
