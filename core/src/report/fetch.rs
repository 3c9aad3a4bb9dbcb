// core/src/report/fetch.rs

use crate::error::FetchError;
use async_trait::async_trait;

/// The HTTP collaborator used for image columns. One call per row, issued serially.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
  async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Fetcher for reports without image columns, or when fetching is disabled.
/// Every request fails, so image cells stay blank and are listed in diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFetcher;

#[async_trait]
impl ImageFetcher for NoopFetcher {
  async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
    Err(FetchError::Transport {
      url: url.to_string(),
      message: "image fetching is disabled".to_string(),
    })
  }
}
