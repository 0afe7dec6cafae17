//! Local file fetcher
//!
//! Reads a state file straight off the filesystem. No retry: a missing or
//! unreadable local file will not heal between attempts.

use async_trait::async_trait;

use crate::config::LocalBackendConfig;
use crate::document::RawState;
use crate::error::{StateError, StateResult};
use crate::fetch::StateFetcher;

/// Fetcher for state stored on the local filesystem
pub struct LocalFetcher {
    config: LocalBackendConfig,
}

impl LocalFetcher {
    pub fn new(config: LocalBackendConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl StateFetcher for LocalFetcher {
    async fn fetch(&self) -> StateResult<RawState> {
        let path = &self.config.path;

        if !path.exists() {
            return Err(StateError::NotFound(self.config.origin()));
        }

        let bytes = std::fs::read(path).map_err(|e| {
            StateError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Ok(RawState::new(bytes, self.config.origin()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_fetch_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("terraform.tfstate");
        std::fs::write(&path, br#"{"version": 4, "outputs": {}}"#).unwrap();

        let fetcher = LocalFetcher::new(LocalBackendConfig::with_path(&path).unwrap());
        let raw = fetcher.fetch().await.unwrap();

        assert_eq!(raw.bytes, br#"{"version": 4, "outputs": {}}"#);
        assert_eq!(raw.origin, path.display().to_string());
    }

    #[tokio::test]
    async fn test_fetch_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.tfstate");

        let fetcher = LocalFetcher::new(LocalBackendConfig::with_path(&path).unwrap());
        let result = fetcher.fetch().await;

        assert!(matches!(result, Err(StateError::NotFound(_))));
    }
}
