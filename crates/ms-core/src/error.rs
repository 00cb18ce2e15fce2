//! Core error types for migration procedures.

use ms_client_api::{ClientApiError, PromptError};
use ms_rest_api_contract::RecordId;

/// Core error type for all migration operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Client error: {0}")]
    Client(#[from] ClientApiError),

    #[error("Aborted: {0}")]
    Prompt(#[from] PromptError),

    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    #[error("Entity type {0} cannot replace itself")]
    SameEntityType(RecordId),

    #[error("Image templates still duplicated: {}", .0.join(", "))]
    DuplicatesRemain(Vec<String>),
}
