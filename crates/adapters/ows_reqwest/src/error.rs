//! Errors raised while talking to a remote endpoint.

use georeg_app::ports::HandlerError;

#[derive(Debug, thiserror::Error)]
pub enum OwsError {
    /// The request could not be sent or the body not read.
    #[error("http error")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("unexpected status {status}")]
    Status { status: reqwest::StatusCode },

    /// The URL could not be turned into a request URL.
    #[error("invalid url")]
    Url(#[from] url::ParseError),

    /// The body was not well-formed XML.
    #[error("invalid capabilities document")]
    Xml(#[from] roxmltree::Error),

    /// The body was not valid JSON.
    #[error("invalid json descriptor")]
    Json(#[from] serde_json::Error),

    /// The document is well-formed but belongs to another protocol.
    #[error("document is not a {expected} response")]
    Unexpected { expected: &'static str },
}

impl OwsError {
    pub(crate) fn into_handler_error(self, url: &str) -> HandlerError {
        HandlerError::Transport {
            url: url.to_string(),
            source: Box::new(self),
        }
    }
}
