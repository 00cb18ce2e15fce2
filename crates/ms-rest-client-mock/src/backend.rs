//! Back-office state held by the mock

use ms_rest_api_contract::*;

/// Everything the mock back-office knows about
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockBackend {
    pub environment: CurrentEnvironment,
    pub instances: Vec<Instance>,
    pub entity_types: Vec<EntityType>,
    pub user_nodes: Vec<UserNode>,
    pub intents: Vec<Intent>,
    pub answers: Vec<Answer>,
    pub image_templates: Vec<ImageTemplate>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instance(mut self, id: i64, name: &str) -> Self {
        self.instances.push(Instance::new(id, name));
        self
    }

    /// Make the current bot accept (or refuse) experiment selection
    pub fn with_experiments(mut self, enabled: bool) -> Self {
        self.environment.current_bot = Some(Bot {
            id: 1,
            name: "bot".to_string(),
            can_use_experiments: enabled,
            extra: ExtraFields::new(),
        });
        self
    }

    pub fn with_entity_type(mut self, record_id: RecordId, name: &str) -> Self {
        self.entity_types.push(EntityType::new(record_id, name));
        self
    }

    /// Add a user node; its intent references follow the order of `intents`
    pub fn with_user_node(mut self, record_id: RecordId, name: &str, intents: Vec<Intent>) -> Self {
        let ids: Vec<RecordId> = intents.iter().map(|intent| intent.record_id).collect();
        self.user_nodes.push(UserNode::new(record_id, name, &ids));
        self.intents.extend(intents);
        self
    }

    pub fn with_image_template(mut self, record_id: RecordId, name: &str) -> Self {
        self.image_templates.push(ImageTemplate::new(record_id, name));
        self
    }

    pub fn with_answer(mut self, record_id: RecordId, templates: Vec<Template>) -> Self {
        self.answers.push(Answer::new(record_id, templates));
        self
    }

    pub fn image_template(&self, record_id: RecordId) -> Option<&ImageTemplate> {
        self.image_templates.iter().find(|it| it.record_id == record_id)
    }

    pub fn template(&self, record_id: RecordId) -> Option<&Template> {
        self.answers
            .iter()
            .flat_map(|answer| answer.templates.iter())
            .find(|template| template.record_id == record_id)
    }

    pub fn template_mut(&mut self, record_id: RecordId) -> Option<&mut Template> {
        self.answers
            .iter_mut()
            .flat_map(|answer| answer.templates.iter_mut())
            .find(|template| template.record_id == record_id)
    }

    pub fn entity(&self, record_id: RecordId) -> Option<&Entity> {
        self.intents
            .iter()
            .flat_map(|intent| intent.entities.iter())
            .find(|entity| entity.record_id == record_id)
    }

    pub fn entity_mut(&mut self, record_id: RecordId) -> Option<&mut Entity> {
        self.intents
            .iter_mut()
            .flat_map(|intent| intent.entities.iter_mut())
            .find(|entity| entity.record_id == record_id)
    }
}
