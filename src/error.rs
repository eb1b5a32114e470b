use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failures talking to plex. Each one ends only the request that hit it.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("failed to proxy request: {0}")]
    Upstream(#[source] reqwest::Error),

    #[error("plex did not answer in time: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

impl ProxyError {
    pub fn from_send(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProxyError::Timeout(e)
        } else {
            ProxyError::Upstream(e)
        }
    }

    pub fn from_body(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProxyError::Timeout(e)
        } else {
            ProxyError::Body(e)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::Upstream(_) | ProxyError::Body(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        log::error!("{}", self);
        (self.status(), self.to_string()).into_response()
    }
}
