//! # Config Repository
//!
//! Fetches dashboard configs from the local filesystem or over HTTP. The
//! repository only parses JSON; everything semantic happens in verification.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::RepositoryError;
use crate::model::Config;

/// Source of dashboard configs.
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    async fn get_config_from_path(&self, path: &Path) -> Result<Config, RepositoryError>;

    async fn get_config_from_url(&self, url: &str) -> Result<Config, RepositoryError>;
}

/// Filesystem and HTTP config loader.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    client: reqwest::Client,
}

impl ConfigLoader {
    /// Create a loader whose HTTP requests give up after `fetch_timeout`.
    pub fn new(fetch_timeout: Duration) -> Result<Self, RepositoryError> {
        let client = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(RepositoryError::Client)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ConfigRepository for ConfigLoader {
    async fn get_config_from_path(&self, path: &Path) -> Result<Config, RepositoryError> {
        let location = path.display().to_string();
        let bytes = tokio::fs::read(path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                RepositoryError::NotFound {
                    location: location.clone(),
                }
            } else {
                RepositoryError::Read {
                    location: location.clone(),
                    source,
                }
            }
        })?;
        parse(&location, &bytes)
    }

    async fn get_config_from_url(&self, url: &str) -> Result<Config, RepositoryError> {
        let fetch_error = |source| RepositoryError::Fetch {
            url: url.to_string(),
            source,
        };
        let resp = self.client.get(url).send().await.map_err(fetch_error)?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RepositoryError::NotFound {
                location: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(RepositoryError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = resp.bytes().await.map_err(fetch_error)?;
        parse(url, &bytes)
    }
}

fn parse(location: &str, bytes: &[u8]) -> Result<Config, RepositoryError> {
    let config = serde_json::from_slice(bytes).map_err(|source| RepositoryError::Parse {
        location: location.to_string(),
        source,
    })?;
    tracing::info!(%location, "config loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn loader() -> ConfigLoader {
        ConfigLoader::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn loads_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"version":"1.0","columns":2,"tiles":[{{"type":"EMPTY"}}]}}"#).unwrap();

        let config = loader().get_config_from_path(file.path()).await.unwrap();
        assert_eq!(config.columns, Some(2));
        assert_eq!(config.tiles.len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = loader()
            .get_config_from_path(&dir.path().join("config.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = loader().get_config_from_path(file.path()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Parse { .. }));
    }
}
