//! Client API trait for the Mindsay back-office
//!
//! Migrations are written against [`ClientApi`] rather than the concrete
//! REST client, so they can run against an in-memory backend in tests.

pub mod prompt;

pub use prompt::*;

use async_trait::async_trait;
use ms_rest_api_contract::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientApiError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("confirmation failed: {0}")]
    Prompt(#[from] PromptError),
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("unexpected: {0}")]
    Unexpected(String),
}

pub type ClientApiResult<T> = Result<T, ClientApiError>;

/// Operations the migrations need from an authenticated session
#[async_trait]
pub trait ClientApi: Send + Sync {
    async fn get_current_environment(&self) -> ClientApiResult<CurrentEnvironment>;

    async fn list_instances(&self) -> ClientApiResult<Vec<Instance>>;
    async fn get_instance(&self, instance_id: i64) -> ClientApiResult<Instance>;

    async fn set_current_instance(&self, instance_id: i64) -> ClientApiResult<CurrentEnvironment>;
    async fn set_current_language(&self, language: &str) -> ClientApiResult<CurrentEnvironment>;
    async fn set_current_experiment(
        &self,
        experiment_id: i64,
    ) -> ClientApiResult<CurrentEnvironment>;

    async fn get_entity_type(&self, entity_type_id: RecordId) -> ClientApiResult<EntityType>;

    async fn list_user_nodes(&self) -> ClientApiResult<Vec<UserNode>>;
    async fn get_user_node(&self, user_node_id: RecordId) -> ClientApiResult<UserNode>;

    async fn get_intent(&self, intent_id: RecordId) -> ClientApiResult<Intent>;
    async fn deploy_intent(&self, intent_id: RecordId) -> ClientApiResult<serde_json::Value>;
    async fn update_entity(
        &self,
        entity_id: RecordId,
        entity: &Entity,
    ) -> ClientApiResult<serde_json::Value>;

    async fn list_answers(&self) -> ClientApiResult<Vec<Answer>>;
    async fn get_answer(&self, answer_id: RecordId) -> ClientApiResult<Answer>;

    async fn list_image_templates(&self) -> ClientApiResult<Vec<ImageTemplate>>;
    async fn update_template(
        &self,
        template_id: RecordId,
        update: &TemplateUpdate,
    ) -> ClientApiResult<serde_json::Value>;
    async fn delete_image_template(&self, image_template_id: RecordId) -> ClientApiResult<()>;
}
