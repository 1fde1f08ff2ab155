use std::env;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use reqwest::header::CACHE_CONTROL;
use serde_json::Value;

use crate::error::LoadError;

const DEFAULT_LOCATION: &str = "dataset.json";

/// Where the remote dataset lives: an http(s) URL or a filesystem path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetSourceConfig {
    pub location: String,
}

impl Default for DatasetSourceConfig {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION.into(),
        }
    }
}

impl DatasetSourceConfig {
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    /// `QUIZ_DATASET_URL`, falling back to `dataset.json` in the working
    /// directory.
    #[must_use]
    pub fn from_env() -> Self {
        env::var("QUIZ_DATASET_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(Self::default, Self::new)
    }

    #[must_use]
    pub fn is_http(&self) -> bool {
        self.location.starts_with("http://") || self.location.starts_with("https://")
    }

    /// Build the matching fetcher.
    #[must_use]
    pub fn fetcher(&self) -> Box<dyn DatasetFetcher> {
        if self.is_http() {
            Box::new(HttpDatasetFetcher::new(self.location.clone()))
        } else {
            Box::new(FileDatasetFetcher::new(self.location.clone()))
        }
    }
}

/// Transport that yields the raw dataset document.
#[async_trait]
pub trait DatasetFetcher: Send + Sync {
    /// Fetch and parse the dataset document.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` on transport failure, non-success status or
    /// malformed JSON.
    async fn fetch(&self) -> Result<Value, LoadError>;

    /// Human-readable location, shown when loading fails.
    fn location(&self) -> &str;
}

/// GET with caching disabled.
#[derive(Clone)]
pub struct HttpDatasetFetcher {
    client: Client,
    url: String,
}

impl HttpDatasetFetcher {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    fn cache_busted_url(&self) -> String {
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{separator}cb={}", self.url, Utc::now().timestamp_millis())
    }
}

#[async_trait]
impl DatasetFetcher for HttpDatasetFetcher {
    async fn fetch(&self) -> Result<Value, LoadError> {
        let response = self
            .client
            .get(self.cache_busted_url())
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LoadError::HttpStatus {
                status: response.status(),
                url: self.url.clone(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn location(&self) -> &str {
        &self.url
    }
}

/// Reads the dataset document from disk.
#[derive(Clone, Debug)]
pub struct FileDatasetFetcher {
    path: PathBuf,
    display: String,
}

impl FileDatasetFetcher {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display = path.display().to_string();
        Self { path, display }
    }
}

#[async_trait]
impl DatasetFetcher for FileDatasetFetcher {
    async fn fetch(&self) -> Result<Value, LoadError> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.display.clone(),
                source,
            })?;
        Ok(serde_json::from_str(&body)?)
    }

    fn location(&self) -> &str {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_transport_from_location() {
        assert!(DatasetSourceConfig::new("https://example.org/quiz/dataset.json").is_http());
        assert!(DatasetSourceConfig::new("http://localhost:8000/dataset.json").is_http());
        assert!(!DatasetSourceConfig::default().is_http());
        assert!(!DatasetSourceConfig::new("/srv/quiz/dataset.json").is_http());
    }

    #[test]
    fn cache_buster_respects_existing_query() {
        let plain = HttpDatasetFetcher::new("https://example.org/dataset.json");
        assert!(plain.cache_busted_url().starts_with("https://example.org/dataset.json?cb="));

        let with_query = HttpDatasetFetcher::new("https://example.org/dataset.json?v=2");
        assert!(with_query
            .cache_busted_url()
            .starts_with("https://example.org/dataset.json?v=2&cb="));
    }

    #[tokio::test]
    async fn reads_dataset_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "quiz-dataset-{}-{}.json",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        tokio::fs::write(&path, r#"[{"question":"Q","options":["a","b"]}]"#)
            .await
            .unwrap();

        let value = FileDatasetFetcher::new(path.clone()).fetch().await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(value.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn missing_file_is_a_load_error() {
        let fetcher = FileDatasetFetcher::new("/definitely/not/here/dataset.json");

        let err = fetcher.fetch().await.unwrap_err();

        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here/dataset.json"));
    }
}
