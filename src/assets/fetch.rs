//! Remote asset download.
//!
//! Downloads go through [`AssetFetcher`] so hosts can plug in their own
//! client (or a fake in tests). [`HttpFetcher`] is the blocking `reqwest`
//! implementation; [`OfflineFetcher`] refuses every request.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("remote assets are disabled")]
    Offline,
}

/// Fetches the bytes behind a URL. Implementations must bound how long a
/// single call may block.
pub trait AssetFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Fetcher used when downloads are unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineFetcher;

impl AssetFetcher for OfflineFetcher {
    fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
        Err(FetchError::Offline)
    }
}

#[cfg(feature = "remote-assets")]
pub use http::HttpFetcher;

#[cfg(feature = "remote-assets")]
mod http {
    use std::time::Duration;

    use super::{AssetFetcher, FetchError};

    /// Blocking HTTP(S) fetcher with a per-request timeout.
    #[derive(Debug, Clone)]
    pub struct HttpFetcher {
        client: reqwest::blocking::Client,
    }

    impl HttpFetcher {
        pub fn new(timeout: Duration) -> Result<Self, FetchError> {
            let client = reqwest::blocking::Client::builder()
                .user_agent(concat!("deckwright/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()
                .map_err(|e| FetchError::Request(e.to_string()))?;
            Ok(Self { client })
        }
    }

    impl AssetFetcher for HttpFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            tracing::debug!(url, "downloading asset");
            let response = self
                .client
                .get(url)
                .send()
                .map_err(|e| FetchError::Request(e.to_string()))?;

            if !response.status().is_success() {
                return Err(FetchError::Status(response.status().as_u16()));
            }

            let body = response
                .bytes()
                .map_err(|e| FetchError::Request(e.to_string()))?;
            Ok(body.to_vec())
        }
    }
}
