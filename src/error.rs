use thiserror::Error;

/// Errors surfaced by the panel components and their API client.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("API responded with {status} for GET {url}: {body}")]
    Api {
        status: reqwest::StatusCode,
        url: String,
        body: String,
    },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("no user is bound to the quota model")]
    NoBoundUser,
}
