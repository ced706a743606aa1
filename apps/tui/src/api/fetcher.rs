use std::future::Future;

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error! status: {status} for {url}")]
    Status {
        status: StatusCode,
        url: Url,
        /// Response body text, kept for the server's `{error}` reason.
        body: String,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed JSON from {url}: {message}")]
    Decode { url: Url, message: String },

    #[error("unexpected response shape from {url}: {message}")]
    Shape { url: Url, message: String },
}

impl FetchError {
    /// HTTP status for [`FetchError::Status`], `None` otherwise.
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Reason the server gave with a non-2xx status: the `error` field of a
    /// JSON body, or the trimmed body text.
    pub fn server_message(&self) -> Option<String> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        let message = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(fields)) => match fields.get("error") {
                Some(Value::String(error)) => error.clone(),
                Some(other) => other.to_string(),
                None => body.trim().to_string(),
            },
            _ => body.trim().to_string(),
        };
        (!message.is_empty()).then_some(message)
    }
}

/// Issues a GET and hands back the parsed JSON body.
///
/// Implementations must not retry and must not impose their own timeout.
pub trait DataFetcher: Send + Sync + 'static {
    fn fetch_json(&self, url: &Url) -> impl Future<Output = Result<Value, FetchError>> + Send;
}

/// [`DataFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl DataFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError> {
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status,
                url: url.clone(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            url: url.clone(),
            message: e.to_string(),
        })
    }
}

/// Fetches `url` and deserializes the body into `T`.
///
/// A body that is valid JSON but not a `T` comes back as [`FetchError::Shape`].
pub async fn fetch_as<T, F>(fetcher: &F, url: &Url) -> Result<T, FetchError>
where
    T: DeserializeOwned,
    F: DataFetcher,
{
    let value = fetcher.fetch_json(url).await?;
    serde_json::from_value(value).map_err(|e| FetchError::Shape {
        url: url.clone(),
        message: e.to_string(),
    })
}
