use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

/// Writes rendered artifacts below a base directory.
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
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&full_path, data)?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(full_path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").to_str().unwrap().to_string();
        let storage = LocalStorage::new(base);

        let written = storage.write_file("map.txt", b"M3.5").await.unwrap();

        assert!(written.ends_with("map.txt"));
        assert_eq!(fs::read(&written).unwrap(), b"M3.5");
    }

    #[test]
    fn test_write_overwrites_previous_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        tokio_test::assert_ok!(tokio_test::block_on(storage.write_file("map.txt", b"first")));
        let written =
            tokio_test::assert_ok!(tokio_test::block_on(storage.write_file("map.txt", b"second")));

        assert_eq!(fs::read_to_string(written).unwrap(), "second");
    }
}
