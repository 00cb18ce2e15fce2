//! API contract types for the Mindsay back-office REST API

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiContractError;
use crate::validation::validate_language_code;

/// Identifier the back-office assigns to versioned records (`record_id`)
pub type RecordId = i64;

/// Fields the back-office returns that this crate does not model.
///
/// Records that are sent back on update keep them so a PUT does not drop
/// data the caller never looked at.
pub type ExtraFields = Map<String, Value>;

/// Timestamp layout used by the back-office (`2020-03-02T10:41:05.123Z`)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Parse a back-office timestamp string
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ApiContractError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| ApiContractError::Timestamp {
            value: value.to_string(),
            source,
        })
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Credentials sent to `users/sign_in`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(nested)]
    pub user: SignInUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SignInUser {
    #[validate(email(message = "Not a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

impl SignInRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: SignInUser {
                email: email.into(),
                password: password.into(),
            },
        }
    }
}

/// Body returned by `users/sign_in`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInResponse {
    #[serde(default)]
    pub otp_required_for_login: bool,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// One-time code sent to `users/code_auth`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CodeAuthRequest {
    #[validate(nested)]
    pub user: CodeAuthUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CodeAuthUser {
    #[validate(email(message = "Not a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "One-time code cannot be empty"))]
    pub otp_attempt: String,
}

impl CodeAuthRequest {
    pub fn new(email: impl Into<String>, otp_attempt: impl Into<String>) -> Self {
        Self {
            user: CodeAuthUser {
                email: email.into(),
                otp_attempt: otp_attempt.into(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Server-side selection state returned by `environment/base` and by every
/// `environment/set_*` call
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrentEnvironment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_instance: Option<Instance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_bot: Option<Bot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_experiment: Option<Experiment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_language: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl CurrentEnvironment {
    /// Whether the active bot accepts an experiment selection
    pub fn bot_can_use_experiments(&self) -> bool {
        self.current_bot
            .as_ref()
            .is_some_and(|bot| bot.can_use_experiments)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetInstanceRequest {
    pub instance_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetBotRequest {
    pub bot_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetExperimentRequest {
    pub experiment_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ChangeLanguageRequest {
    #[validate(custom(function = "validate_language_code"))]
    pub language: String,
}

// ---------------------------------------------------------------------------
// Tenancy
// ---------------------------------------------------------------------------

/// A tenant/deployment unit; addressed by `id`, not `record_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Instance {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            extra: ExtraFields::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bot {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "can_use_experiments?", default)]
    pub can_use_experiments: bool,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

// ---------------------------------------------------------------------------
// Conversational model
// ---------------------------------------------------------------------------

/// Shared type definition referenced by entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityType {
    pub record_id: RecordId,
    pub name: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl EntityType {
    pub fn new(record_id: RecordId, name: impl Into<String>) -> Self {
        Self {
            record_id,
            name: name.into(),
            extra: ExtraFields::new(),
        }
    }
}

/// A typed slot inside an intent. Sent back whole on `PUT entities/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub record_id: RecordId,
    pub name: String,
    pub intent_record_id: RecordId,
    pub entity_type_record_id: RecordId,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Entity {
    pub fn new(
        record_id: RecordId,
        name: impl Into<String>,
        intent_record_id: RecordId,
        entity_type_record_id: RecordId,
    ) -> Self {
        Self {
            record_id,
            name: name.into(),
            intent_record_id,
            entity_type_record_id,
            extra: ExtraFields::new(),
        }
    }
}

/// Intent as returned by `intents/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub record_id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Intent {
    pub fn new(record_id: RecordId, name: impl Into<String>, entities: Vec<Entity>) -> Self {
        Self {
            record_id,
            name: name.into(),
            entities,
            extra: ExtraFields::new(),
        }
    }
}

/// Intent reference embedded in a user node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentRef {
    pub record_id: RecordId,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Conversational-flow container; the unit that gets trained.
///
/// The listing endpoint omits `intents`, the detail endpoint includes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserNode {
    pub record_id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub intents: Vec<IntentRef>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl UserNode {
    pub fn new(record_id: RecordId, name: impl Into<String>, intents: &[RecordId]) -> Self {
        Self {
            record_id,
            name: name.into(),
            intents: intents
                .iter()
                .map(|&record_id| IntentRef {
                    record_id,
                    extra: ExtraFields::new(),
                })
                .collect(),
            extra: ExtraFields::new(),
        }
    }

    /// Intent used to trigger a training of the whole user node
    pub fn deploy_target(&self) -> Option<RecordId> {
        self.intents.first().map(|intent| intent.record_id)
    }
}

// ---------------------------------------------------------------------------
// Answers and templates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageTemplate {
    pub record_id: RecordId,
    pub name: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl ImageTemplate {
    pub fn new(record_id: RecordId, name: impl Into<String>) -> Self {
        Self {
            record_id,
            name: name.into(),
            extra: ExtraFields::new(),
        }
    }
}

/// Answer sub-resource. Only image templates carry
/// `image_template_record_id`; text and card templates leave it null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub record_id: RecordId,
    #[serde(default)]
    pub image_template_record_id: Option<RecordId>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Template {
    pub fn new(record_id: RecordId, image_template_record_id: Option<RecordId>) -> Self {
        Self {
            record_id,
            image_template_record_id,
            extra: ExtraFields::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateUpdate {
    pub image_template_record_id: RecordId,
}

/// Answer as returned by `answers/:id`; the listing endpoint omits templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub record_id: RecordId,
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Answer {
    pub fn new(record_id: RecordId, templates: Vec<Template>) -> Self {
        Self {
            record_id,
            templates,
            extra: ExtraFields::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pass-through resources
// ---------------------------------------------------------------------------

/// Record shape shared by resources this crate only lists and shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRecord {
    pub record_id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

pub type Service = NamedRecord;
pub type MachineNode = NamedRecord;
pub type CaseStatement = NamedRecord;
pub type KnowledgeBase = NamedRecord;
pub type ApiConnector = NamedRecord;

/// Messaging channel; the only resource addressed by UUID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub uuid: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}
