//! Error types for the REST API client

use ms_client_api::PromptError;
use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Errors that can occur when using the REST API client
#[derive(Debug, Error)]
pub enum RestClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON decoding error for {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("API contract error: {0}")]
    ApiContract(#[from] ms_rest_api_contract::ApiContractError),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Operator input error: {0}")]
    Prompt(#[from] PromptError),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    #[error("Server returned error status {status} for {method} {path}: {body}")]
    ServerError {
        status: StatusCode,
        method: Method,
        path: String,
        body: String,
    },
}

impl RestClientError {
    /// HTTP status of a rejected request, if the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RestClientError::ServerError { status, .. } => Some(*status),
            RestClientError::Http(e) => e.status(),
            _ => None,
        }
    }
}

/// Result type alias for REST client operations
pub type RestClientResult<T> = Result<T, RestClientError>;
