use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong talking to the chat server.
///
/// Controller operations never surface these to the user; they are logged
/// and collapsed into either "keep the previous state" or the apology reply.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server answered {status} for {url}: {body}")]
    Server {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("malformed response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
