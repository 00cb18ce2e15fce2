//! `ClientApi` implementation over a [`MockBackend`]

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use ms_client_api::{ClientApi, ClientApiError, ClientApiResult};
use ms_rest_api_contract::*;
use serde_json::json;

use crate::backend::MockBackend;

/// A call that changes back-office state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    SetCurrentInstance(i64),
    SetCurrentLanguage(String),
    SetCurrentExperiment(i64),
    UpdateTemplate {
        template_id: RecordId,
        image_template_id: RecordId,
    },
    DeleteImageTemplate(RecordId),
    UpdateEntity {
        entity_id: RecordId,
        entity_type_id: RecordId,
    },
    DeployIntent(RecordId),
}

impl MockCall {
    /// Whether the call touches bot content rather than session selection
    pub fn is_content_mutation(&self) -> bool {
        !matches!(
            self,
            MockCall::SetCurrentInstance(_)
                | MockCall::SetCurrentLanguage(_)
                | MockCall::SetCurrentExperiment(_)
        )
    }
}

/// Mock back-office client
#[derive(Debug, Default)]
pub struct MockClient {
    backend: Mutex<MockBackend>,
    calls: Mutex<Vec<MockCall>>,
    failures: Mutex<Vec<MockCall>>,
}

impl MockClient {
    pub fn new(backend: MockBackend) -> Self {
        Self {
            backend: Mutex::new(backend),
            calls: Mutex::default(),
            failures: Mutex::default(),
        }
    }

    /// Answer `call` with a server error instead of applying it
    pub fn fail_on(self, call: MockCall) -> Self {
        lock(&self.failures).push(call);
        self
    }

    /// Every state-changing call issued so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    /// Calls that changed bot content (templates, entities, deploys)
    pub fn content_mutations(&self) -> Vec<MockCall> {
        self.calls()
            .into_iter()
            .filter(MockCall::is_content_mutation)
            .collect()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    /// Current back-office state
    pub fn snapshot(&self) -> MockBackend {
        lock(&self.backend).clone()
    }

    fn record(&self, call: MockCall) -> ClientApiResult<()> {
        lock(&self.calls).push(call.clone());
        if lock(&self.failures).contains(&call) {
            return Err(ClientApiError::Server(format!(
                "500 Internal Server Error on {:?}",
                call
            )));
        }
        Ok(())
    }

    fn backend(&self) -> MutexGuard<'_, MockBackend> {
        lock(&self.backend)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn not_found(kind: &str, id: impl std::fmt::Display) -> ClientApiError {
    ClientApiError::NotFound(format!("{} {}", kind, id))
}

#[async_trait]
impl ClientApi for MockClient {
    async fn get_current_environment(&self) -> ClientApiResult<CurrentEnvironment> {
        Ok(self.backend().environment.clone())
    }

    async fn list_instances(&self) -> ClientApiResult<Vec<Instance>> {
        Ok(self.backend().instances.clone())
    }

    async fn get_instance(&self, instance_id: i64) -> ClientApiResult<Instance> {
        self.backend()
            .instances
            .iter()
            .find(|instance| instance.id == instance_id)
            .cloned()
            .ok_or_else(|| not_found("instance", instance_id))
    }

    async fn set_current_instance(&self, instance_id: i64) -> ClientApiResult<CurrentEnvironment> {
        let instance = self.get_instance(instance_id).await?;
        self.record(MockCall::SetCurrentInstance(instance_id))?;

        let mut backend = self.backend();
        backend.environment.current_instance = Some(instance);
        Ok(backend.environment.clone())
    }

    async fn set_current_language(&self, language: &str) -> ClientApiResult<CurrentEnvironment> {
        self.record(MockCall::SetCurrentLanguage(language.to_string()))?;

        let mut backend = self.backend();
        backend.environment.current_language = Some(language.to_string());
        Ok(backend.environment.clone())
    }

    async fn set_current_experiment(
        &self,
        experiment_id: i64,
    ) -> ClientApiResult<CurrentEnvironment> {
        if !self.backend().environment.bot_can_use_experiments() {
            return Err(ClientApiError::Unsupported(
                "This bot cannot use experiments".to_string(),
            ));
        }
        self.record(MockCall::SetCurrentExperiment(experiment_id))?;

        let mut backend = self.backend();
        backend.environment.current_experiment = Some(Experiment {
            id: experiment_id,
            name: String::new(),
            extra: ExtraFields::new(),
        });
        Ok(backend.environment.clone())
    }

    async fn get_entity_type(&self, entity_type_id: RecordId) -> ClientApiResult<EntityType> {
        self.backend()
            .entity_types
            .iter()
            .find(|et| et.record_id == entity_type_id)
            .cloned()
            .ok_or_else(|| not_found("entity type", entity_type_id))
    }

    async fn list_user_nodes(&self) -> ClientApiResult<Vec<UserNode>> {
        // The listing endpoint does not embed intents
        Ok(self
            .backend()
            .user_nodes
            .iter()
            .map(|node| UserNode {
                intents: Vec::new(),
                ..node.clone()
            })
            .collect())
    }

    async fn get_user_node(&self, user_node_id: RecordId) -> ClientApiResult<UserNode> {
        self.backend()
            .user_nodes
            .iter()
            .find(|node| node.record_id == user_node_id)
            .cloned()
            .ok_or_else(|| not_found("user node", user_node_id))
    }

    async fn get_intent(&self, intent_id: RecordId) -> ClientApiResult<Intent> {
        self.backend()
            .intents
            .iter()
            .find(|intent| intent.record_id == intent_id)
            .cloned()
            .ok_or_else(|| not_found("intent", intent_id))
    }

    async fn deploy_intent(&self, intent_id: RecordId) -> ClientApiResult<serde_json::Value> {
        self.get_intent(intent_id).await?;
        self.record(MockCall::DeployIntent(intent_id))?;
        Ok(json!({ "record_id": intent_id, "status": "deploying" }))
    }

    async fn update_entity(
        &self,
        entity_id: RecordId,
        entity: &Entity,
    ) -> ClientApiResult<serde_json::Value> {
        self.record(MockCall::UpdateEntity {
            entity_id,
            entity_type_id: entity.entity_type_record_id,
        })?;

        let mut backend = self.backend();
        let stored = backend
            .entity_mut(entity_id)
            .ok_or_else(|| not_found("entity", entity_id))?;
        *stored = entity.clone();
        Ok(json!({ "record_id": entity_id }))
    }

    async fn list_answers(&self) -> ClientApiResult<Vec<Answer>> {
        // The listing endpoint does not embed templates
        Ok(self
            .backend()
            .answers
            .iter()
            .map(|answer| Answer {
                templates: Vec::new(),
                ..answer.clone()
            })
            .collect())
    }

    async fn get_answer(&self, answer_id: RecordId) -> ClientApiResult<Answer> {
        self.backend()
            .answers
            .iter()
            .find(|answer| answer.record_id == answer_id)
            .cloned()
            .ok_or_else(|| not_found("answer", answer_id))
    }

    async fn list_image_templates(&self) -> ClientApiResult<Vec<ImageTemplate>> {
        Ok(self.backend().image_templates.clone())
    }

    async fn update_template(
        &self,
        template_id: RecordId,
        update: &TemplateUpdate,
    ) -> ClientApiResult<serde_json::Value> {
        self.record(MockCall::UpdateTemplate {
            template_id,
            image_template_id: update.image_template_record_id,
        })?;

        let mut backend = self.backend();
        let template = backend
            .template_mut(template_id)
            .ok_or_else(|| not_found("template", template_id))?;
        template.image_template_record_id = Some(update.image_template_record_id);
        Ok(json!({ "record_id": template_id }))
    }

    async fn delete_image_template(&self, image_template_id: RecordId) -> ClientApiResult<()> {
        self.record(MockCall::DeleteImageTemplate(image_template_id))?;

        let mut backend = self.backend();
        let before = backend.image_templates.len();
        backend
            .image_templates
            .retain(|it| it.record_id != image_template_id);
        if backend.image_templates.len() == before {
            return Err(not_found("image template", image_template_id));
        }
        Ok(())
    }
}
