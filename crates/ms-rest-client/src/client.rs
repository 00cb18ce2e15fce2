//! Main REST API client implementation

use std::fmt;
use std::sync::Arc;

use ms_client_api::{verify_prompt, ConfirmationProvider};
use ms_rest_api_contract::validation::validate_change_language_request;
use ms_rest_api_contract::*;
use reqwest::{Client as HttpClient, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::auth::{cookies_from_headers, AuthConfig};
use crate::config::{BackendEnvironment, ClientConfig};
use crate::error::{RestClientError, RestClientResult};

/// Authenticated REST client for the Mindsay back-office.
///
/// Selection state (instance, language, experiment) lives server-side; the
/// client only carries the credentials that identify the session.
#[derive(Clone)]
pub struct RestClient {
    http_client: HttpClient,
    base_url: Url,
    environment: BackendEnvironment,
    pub(crate) auth: AuthConfig,
    confirmations: Arc<dyn ConfirmationProvider>,
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .field("environment", &self.environment)
            .field("authenticated", &self.auth.method.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Create a client with existing credentials; use [`RestClient::connect`]
    /// to sign in
    pub fn new(
        config: ClientConfig,
        auth: AuthConfig,
        confirmations: Arc<dyn ConfirmationProvider>,
    ) -> RestClientResult<Self> {
        let base_url = config.resolve_base_url()?;
        let http_client = HttpClient::builder().user_agent(&config.user_agent).build()?;

        Ok(Self {
            http_client,
            base_url,
            environment: config.environment,
            auth,
            confirmations,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn environment(&self) -> BackendEnvironment {
        self.environment
    }

    /// Get the authentication config
    pub fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    // Environment selection

    /// Returns information about the current session environment
    pub async fn get_current_environment(&self) -> RestClientResult<CurrentEnvironment> {
        self.get("environment/base").await
    }

    /// Select the instance for the next operations.
    ///
    /// On production the operator must type the instance name first.
    pub async fn set_current_instance(
        &self,
        instance_id: i64,
    ) -> RestClientResult<CurrentEnvironment> {
        if self.environment.is_production() {
            let instance = self.get_instance(instance_id).await?;
            verify_prompt(
                self.confirmations.as_ref(),
                "Enter your instance name to confirm: ",
                &instance.name,
            )?;
        }

        // An unknown id yields a 200 with an HTML page, which fails to decode
        let environment: CurrentEnvironment = self
            .post("environment/set_current_instance", &SetInstanceRequest { instance_id })
            .await?;
        let instance = environment.current_instance.as_ref().ok_or_else(|| {
            RestClientError::UnexpectedResponse(format!(
                "no current_instance after switching to instance {instance_id}"
            ))
        })?;
        info!("Switched to instance {}", instance.name);
        Ok(environment)
    }

    /// Set the current environment language
    pub async fn set_current_language(
        &self,
        language: &str,
    ) -> RestClientResult<CurrentEnvironment> {
        let request = ChangeLanguageRequest {
            language: language.to_string(),
        };
        validate_change_language_request(&request)?;

        let environment = self.post("environment/change_language", &request).await?;
        info!("Current language updated: {}", language);
        Ok(environment)
    }

    /// Select an experiment, failing early when the current bot has none
    pub async fn set_current_experiment(
        &self,
        experiment_id: i64,
    ) -> RestClientResult<CurrentEnvironment> {
        let environment = self.get_current_environment().await?;
        if !environment.bot_can_use_experiments() {
            return Err(RestClientError::UnsupportedOperation(
                "This bot cannot use experiments".to_string(),
            ));
        }

        let environment = self
            .post("environment/set_current_experiment", &SetExperimentRequest { experiment_id })
            .await?;
        info!("Current experiment updated: {}", experiment_id);
        Ok(environment)
    }

    pub async fn set_current_bot(&self, bot_id: i64) -> RestClientResult<CurrentEnvironment> {
        self.post("environment/set_current_bot", &SetBotRequest { bot_id })
            .await
    }

    // Tenancy

    pub async fn list_instances(&self) -> RestClientResult<Vec<Instance>> {
        self.get("instances").await
    }

    pub async fn get_instance(&self, instance_id: i64) -> RestClientResult<Instance> {
        self.get(&format!("instances/{}", instance_id)).await
    }

    pub async fn list_bots(&self) -> RestClientResult<Vec<Bot>> {
        self.get("bots").await
    }

    pub async fn list_experiments(&self) -> RestClientResult<Vec<Experiment>> {
        self.get("experiments").await
    }

    // Conversational model

    pub async fn get_entity_type(&self, entity_type_id: RecordId) -> RestClientResult<EntityType> {
        self.get(&format!("entity_types/{}", entity_type_id)).await
    }

    pub async fn list_services(&self) -> RestClientResult<Vec<Service>> {
        self.get("services").await
    }

    pub async fn get_service(&self, service_id: RecordId) -> RestClientResult<Service> {
        self.get(&format!("services/{}", service_id)).await
    }

    /// List user nodes; entries carry no intents
    pub async fn list_user_nodes(&self) -> RestClientResult<Vec<UserNode>> {
        self.get("user_nodes").await
    }

    pub async fn get_user_node(&self, user_node_id: RecordId) -> RestClientResult<UserNode> {
        self.get(&format!("user_nodes/{}", user_node_id)).await
    }

    /// Every user node with its intents, one request per node
    pub async fn list_user_nodes_full(&self) -> RestClientResult<Vec<UserNode>> {
        let mut nodes = Vec::new();
        for node in self.list_user_nodes().await? {
            nodes.push(self.get_user_node(node.record_id).await?);
        }
        Ok(nodes)
    }

    pub async fn get_intent(&self, intent_id: RecordId) -> RestClientResult<Intent> {
        self.get(&format!("intents/{}", intent_id)).await
    }

    /// Deploy (train) the intent and the user node holding it
    pub async fn deploy_intent(&self, intent_id: RecordId) -> RestClientResult<serde_json::Value> {
        self.put_empty(&format!("intents/{}/deploy", intent_id)).await
    }

    pub async fn update_entity(
        &self,
        entity_id: RecordId,
        entity: &Entity,
    ) -> RestClientResult<serde_json::Value> {
        self.put(&format!("entities/{}", entity_id), entity).await
    }

    pub async fn list_machine_nodes(&self) -> RestClientResult<Vec<MachineNode>> {
        self.get("machine_nodes").await
    }

    pub async fn get_machine_node(&self, machine_node_id: RecordId) -> RestClientResult<MachineNode> {
        self.get(&format!("machine_nodes/{}", machine_node_id)).await
    }

    pub async fn list_case_statements(&self) -> RestClientResult<Vec<CaseStatement>> {
        self.get("case_statements").await
    }

    pub async fn get_case_statement(
        &self,
        case_statement_id: RecordId,
    ) -> RestClientResult<CaseStatement> {
        self.get(&format!("case_statements/{}", case_statement_id)).await
    }

    // Answers and templates

    /// List answers; entries carry no templates
    pub async fn list_answers(&self) -> RestClientResult<Vec<Answer>> {
        self.get("answers").await
    }

    pub async fn get_answer(&self, answer_id: RecordId) -> RestClientResult<Answer> {
        self.get(&format!("answers/{}", answer_id)).await
    }

    pub async fn list_image_templates(&self) -> RestClientResult<Vec<ImageTemplate>> {
        self.get("image_templates").await
    }

    pub async fn update_template(
        &self,
        template_id: RecordId,
        update: &TemplateUpdate,
    ) -> RestClientResult<serde_json::Value> {
        self.put(&format!("templates/{}/", template_id), update).await
    }

    pub async fn delete_image_template(&self, image_template_id: RecordId) -> RestClientResult<()> {
        self.delete(&format!("image_templates/{}", image_template_id))
            .await
    }

    // Knowledge, connectors, channels

    pub async fn list_knowledge_bases(&self) -> RestClientResult<Vec<KnowledgeBase>> {
        self.get("knowledge_bases").await
    }

    pub async fn get_knowledge_base(
        &self,
        knowledge_base_id: RecordId,
    ) -> RestClientResult<KnowledgeBase> {
        self.get(&format!("knowledge_bases/{}", knowledge_base_id)).await
    }

    pub async fn delete_knowledge_base(&self, knowledge_base_id: RecordId) -> RestClientResult<()> {
        self.delete(&format!("knowledge_bases/{}", knowledge_base_id))
            .await
    }

    pub async fn list_api_connectors(&self) -> RestClientResult<Vec<ApiConnector>> {
        self.get("api_connectors").await
    }

    pub async fn get_api_connector(
        &self,
        api_connector_id: RecordId,
    ) -> RestClientResult<ApiConnector> {
        self.get(&format!("api_connectors/{}", api_connector_id)).await
    }

    pub async fn list_channels(&self) -> RestClientResult<Vec<Channel>> {
        self.get("channels").await
    }

    pub async fn get_channel(&self, channel_uuid: Uuid) -> RestClientResult<Channel> {
        self.get(&format!("channels/{}", channel_uuid)).await
    }

    // Private helper methods

    async fn get<T: DeserializeOwned>(&self, path: &str) -> RestClientResult<T> {
        self.request(Method::GET, path, None::<&()>).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> RestClientResult<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> RestClientResult<T> {
        self.request(Method::PUT, path, Some(body)).await
    }

    async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> RestClientResult<T> {
        self.request(Method::PUT, path, None::<&()>).await
    }

    /// The back-office answers deletes with an empty body; only the status matters
    async fn delete(&self, path: &str) -> RestClientResult<()> {
        self.send(Method::DELETE, path, None::<&()>).await?;
        Ok(())
    }

    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> RestClientResult<T> {
        let response = self.send(method, path, body).await?;
        decode_json(path, response).await
    }

    /// Send a request and turn any non-2xx status into an error
    pub(crate) async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> RestClientResult<Response> {
        let url = self.base_url.join(path)?;
        debug!(%method, %url, "sending request");

        let mut request = self.http_client.request(method.clone(), url);

        // Add authentication headers
        let auth_headers = self
            .auth
            .headers()
            .map_err(|e| RestClientError::Auth(e.to_string()))?;
        request = request.headers(auth_headers);

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        self.auth
            .cookies
            .merge(cookies_from_headers(response.headers()));
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(RestClientError::ServerError {
                status,
                method,
                path: path.to_string(),
                body,
            })
        }
    }
}

pub(crate) async fn decode_json<T: DeserializeOwned>(
    path: &str,
    response: Response,
) -> RestClientResult<T> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|source| RestClientError::Decode {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ms_client_api::{PromptError, PromptResult};

    struct NeverAsked;

    impl ConfirmationProvider for NeverAsked {
        fn ask(&self, prompt: &str) -> PromptResult<String> {
            Err(PromptError::NonInteractive(prompt.to_string()))
        }
    }

    #[test]
    fn test_client_creation() {
        let client = RestClient::new(
            ClientConfig::new(false),
            AuthConfig::default(),
            Arc::new(NeverAsked),
        )
        .unwrap();

        assert_eq!(client.base_url().as_str(), "https://staging-bos.destygo.com/");
        assert_eq!(client.environment(), BackendEnvironment::Staging);
        assert!(!client.auth().method.is_authenticated());
    }

    #[test]
    fn test_paths_join_under_base_url() {
        let client = RestClient::new(
            ClientConfig::new(true).with_base_url(Url::parse("http://localhost:9000/bos/").unwrap()),
            AuthConfig::default(),
            Arc::new(NeverAsked),
        )
        .unwrap();

        assert_eq!(
            client.base_url().join("templates/10/").unwrap().as_str(),
            "http://localhost:9000/bos/templates/10/"
        );
    }

    #[test]
    fn test_debug_hides_credentials() {
        let client = RestClient::new(
            ClientConfig::new(false),
            AuthConfig::with_session_token("Bearer secret"),
            Arc::new(NeverAsked),
        )
        .unwrap();

        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("authenticated: true"));
    }
}
