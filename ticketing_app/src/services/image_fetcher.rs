// ticketing_app/src/services/image_fetcher.rs

//! HTTP image fetching for report image columns.

use async_trait::async_trait;
use boxoffice::report::ImageFetcher;
use boxoffice::FetchError;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, instrument};

/// `reqwest` client with a per-request timeout and a fixed `User-Agent`.
/// Some image hosts refuse requests without one.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
  client: Client,
}

impl HttpImageFetcher {
  pub fn new(timeout: Duration, user_agent: &str) -> reqwest::Result<Self> {
    let client = Client::builder().timeout(timeout).user_agent(user_agent).build()?;
    Ok(Self { client })
  }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
  #[instrument(name = "HttpImageFetcher::get_bytes", skip(self))]
  async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
    let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
      return Err(FetchError::InvalidUrl(url.to_string()));
    }

    let response = self
      .client
      .get(parsed)
      .send()
      .await
      .map_err(|e| transport_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        url: url.to_string(),
        status: status.as_u16(),
      });
    }

    let bytes = response.bytes().await.map_err(|e| transport_error(url, e))?;
    debug!(len = bytes.len(), "Image fetched.");
    Ok(bytes.to_vec())
  }
}

fn transport_error(url: &str, err: reqwest::Error) -> FetchError {
  if err.is_timeout() {
    FetchError::Timeout(url.to_string())
  } else {
    FetchError::Transport {
      url: url.to_string(),
      message: err.to_string(),
    }
  }
}
