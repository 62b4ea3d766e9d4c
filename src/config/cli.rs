use crate::core::Storage;
use crate::utils::error::Result;
use std::path::Path;

/// Filesystem storage. Reads take the path as given; writes land under
/// `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = tokio::fs::read(path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full_path, data).await?;
        Ok(full_path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::SubbudError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_overwrites_and_creates_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("exports");
        let storage = LocalStorage::new(base.to_str().unwrap().to_string());

        storage.write_file("out.txt", b"first\n").await.unwrap();
        let written = storage.write_file("out.txt", b"second\n").await.unwrap();

        assert_eq!(std::fs::read_to_string(&written).unwrap(), "second\n");
        assert!(written.ends_with("out.txt"));
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let storage = LocalStorage::new(".".to_string());
        let err = storage
            .read_file("/definitely/not/here/subs.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, SubbudError::IoError(_)));
    }
}
