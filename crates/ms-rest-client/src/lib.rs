//! REST API client for the Mindsay back-office
//!
//! This crate signs in to the back-office (password, then an emailed
//! one-time code when the account requires it) and exposes one method per
//! endpoint. Every non-2xx answer is returned as an error; nothing is
//! retried.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
mod sign_in;

pub use auth::*;
pub use client::*;
pub use config::*;
pub use error::*;

use async_trait::async_trait;
use ms_client_api::{ClientApi, ClientApiError, ClientApiResult};
use ms_rest_api_contract::*;
use reqwest::StatusCode;

impl From<RestClientError> for ClientApiError {
    fn from(err: RestClientError) -> Self {
        match err {
            RestClientError::Auth(message) => ClientApiError::Auth(message),
            RestClientError::Prompt(e) => ClientApiError::Prompt(e),
            RestClientError::UnsupportedOperation(message) => ClientApiError::Unsupported(message),
            RestClientError::ServerError {
                status,
                method,
                path,
                ..
            } if status == StatusCode::NOT_FOUND => {
                ClientApiError::NotFound(format!("{} {}", method, path))
            }
            e @ RestClientError::ServerError { .. } => ClientApiError::Server(e.to_string()),
            e => ClientApiError::Unexpected(e.to_string()),
        }
    }
}

#[async_trait]
impl ClientApi for client::RestClient {
    async fn get_current_environment(&self) -> ClientApiResult<CurrentEnvironment> {
        Ok(self.get_current_environment().await?)
    }

    async fn list_instances(&self) -> ClientApiResult<Vec<Instance>> {
        Ok(self.list_instances().await?)
    }

    async fn get_instance(&self, instance_id: i64) -> ClientApiResult<Instance> {
        Ok(self.get_instance(instance_id).await?)
    }

    async fn set_current_instance(&self, instance_id: i64) -> ClientApiResult<CurrentEnvironment> {
        Ok(self.set_current_instance(instance_id).await?)
    }

    async fn set_current_language(&self, language: &str) -> ClientApiResult<CurrentEnvironment> {
        Ok(self.set_current_language(language).await?)
    }

    async fn set_current_experiment(
        &self,
        experiment_id: i64,
    ) -> ClientApiResult<CurrentEnvironment> {
        Ok(self.set_current_experiment(experiment_id).await?)
    }

    async fn get_entity_type(&self, entity_type_id: RecordId) -> ClientApiResult<EntityType> {
        Ok(self.get_entity_type(entity_type_id).await?)
    }

    async fn list_user_nodes(&self) -> ClientApiResult<Vec<UserNode>> {
        Ok(self.list_user_nodes().await?)
    }

    async fn get_user_node(&self, user_node_id: RecordId) -> ClientApiResult<UserNode> {
        Ok(self.get_user_node(user_node_id).await?)
    }

    async fn get_intent(&self, intent_id: RecordId) -> ClientApiResult<Intent> {
        Ok(self.get_intent(intent_id).await?)
    }

    async fn deploy_intent(&self, intent_id: RecordId) -> ClientApiResult<serde_json::Value> {
        Ok(self.deploy_intent(intent_id).await?)
    }

    async fn update_entity(
        &self,
        entity_id: RecordId,
        entity: &Entity,
    ) -> ClientApiResult<serde_json::Value> {
        Ok(self.update_entity(entity_id, entity).await?)
    }

    async fn list_answers(&self) -> ClientApiResult<Vec<Answer>> {
        Ok(self.list_answers().await?)
    }

    async fn get_answer(&self, answer_id: RecordId) -> ClientApiResult<Answer> {
        Ok(self.get_answer(answer_id).await?)
    }

    async fn list_image_templates(&self) -> ClientApiResult<Vec<ImageTemplate>> {
        Ok(self.list_image_templates().await?)
    }

    async fn update_template(
        &self,
        template_id: RecordId,
        update: &TemplateUpdate,
    ) -> ClientApiResult<serde_json::Value> {
        Ok(self.update_template(template_id, update).await?)
    }

    async fn delete_image_template(&self, image_template_id: RecordId) -> ClientApiResult<()> {
        Ok(self.delete_image_template(image_template_id).await?)
    }
}
