//! A JSON file that mirrors the last known transactions and the local
//! category list.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{Transaction, client::ClientError};

/// The contents of the cache file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheContents {
    /// The last known list of transactions, newest first.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// The user's category names.
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Reads and writes [CacheContents] at a fixed path.
#[derive(Debug, Clone)]
pub struct FallbackCache {
    path: PathBuf,
}

impl FallbackCache {
    /// Create a cache backed by the file at `path`. The file is not touched
    /// until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cache file, returning `None` if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(&self) -> Result<Option<CacheContents>, ClientError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Overwrite the cache file with `contents`.
    ///
    /// The contents are written to a sibling file first and then renamed so a
    /// crash never leaves a half-written cache.
    pub async fn save(&self, contents: &CacheContents) -> Result<(), ClientError> {
        let json = serde_json::to_vec_pretty(contents)?;
        let temp_path = self.path.with_extension("json.tmp");

        tokio::fs::write(&temp_path, json).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::{CacheContents, FallbackCache};
    use crate::{Transaction, TransactionType, client::ClientError};

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let cache = FallbackCache::new(dir.path().join("cache.json"));

        assert_eq!(cache.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn saved_contents_can_be_loaded() {
        let dir = tempdir().unwrap();
        let cache = FallbackCache::new(dir.path().join("cache.json"));
        let contents = CacheContents {
            transactions: vec![Transaction {
                id: 3,
                description: "Sueldo".to_owned(),
                amount: 1500.0,
                category: "Oficina".to_owned(),
                date: "2025-02-01".to_owned(),
                is_fixed: true,
                transaction_type: TransactionType::Ingreso,
            }],
            categories: vec!["Oficina".to_owned()],
        };

        cache.save(&contents).await.unwrap();

        assert_eq!(cache.load().await.unwrap(), Some(contents));
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "not json").unwrap();

        let result = FallbackCache::new(path).load().await;

        assert!(matches!(result, Err(ClientError::CacheFormat(_))));
    }

    #[tokio::test]
    async fn fields_default_when_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{}").unwrap();

        let contents = FallbackCache::new(path).load().await.unwrap();

        assert_eq!(contents, Some(CacheContents::default()));
    }
}
