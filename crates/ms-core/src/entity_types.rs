//! Replace one entity type by another across every intent, then retrain
//! the user nodes that changed.

use ms_client_api::{verify_prompt, ClientApi, ConfirmationProvider};
use ms_rest_api_contract::{Entity, EntityType, RecordId, UserNode};
use serde::Serialize;
use tracing::{info, warn};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityTypeReplacement {
    pub old: RecordId,
    pub new: RecordId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatedUserNode {
    pub record_id: RecordId,
    pub name: String,
    pub updated_entities: Vec<RecordId>,
    /// Intent deployed to retrain the node; `None` when it has no intent
    pub deployed_intent: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplaceReport {
    pub old: EntityTypeRef,
    pub new: EntityTypeRef,
    pub updated: Vec<UpdatedUserNode>,
    /// User nodes without any entity of the old type
    pub skipped_user_nodes: usize,
}

impl ReplaceReport {
    pub fn updated_entity_count(&self) -> usize {
        self.updated.iter().map(|node| node.updated_entities.len()).sum()
    }

    /// User nodes for which no deploy could be issued
    pub fn deploy_skipped(&self) -> Vec<RecordId> {
        self.updated
            .iter()
            .filter(|node| node.deployed_intent.is_none())
            .map(|node| node.record_id)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityTypeRef {
    pub record_id: RecordId,
    pub name: String,
}

impl From<EntityType> for EntityTypeRef {
    fn from(entity_type: EntityType) -> Self {
        Self {
            record_id: entity_type.record_id,
            name: entity_type.name,
        }
    }
}

pub fn confirmation_prompt(old: &EntityType, new: &EntityType) -> String {
    format!(
        "Replace entity type {} ({}) with entity type {} ({})? (y/n)",
        old.name, old.record_id, new.name, new.record_id
    )
}

/// Repoint every entity of type `replacement.old` to `replacement.new`.
///
/// Nothing is mutated unless the operator answers exactly `y`. Each user
/// node holding at least one matching entity gets all its entity updates
/// followed by a single deploy of its first intent.
pub async fn replace_entity_type<C>(
    client: &C,
    confirmations: &dyn ConfirmationProvider,
    replacement: EntityTypeReplacement,
) -> Result<ReplaceReport>
where
    C: ClientApi + ?Sized,
{
    if replacement.old == replacement.new {
        return Err(Error::SameEntityType(replacement.old));
    }

    let old = client.get_entity_type(replacement.old).await?;
    let new = client.get_entity_type(replacement.new).await?;
    verify_prompt(confirmations, &confirmation_prompt(&old, &new), "y")?;

    let mut report = ReplaceReport {
        old: old.into(),
        new: new.into(),
        updated: Vec::new(),
        skipped_user_nodes: 0,
    };

    let summaries = client.list_user_nodes().await?;
    let total = summaries.len();

    for (index, summary) in summaries.into_iter().enumerate() {
        let user_node = client.get_user_node(summary.record_id).await?;
        let entities = entities_of_type(client, &user_node, replacement.old).await?;

        if entities.is_empty() {
            report.skipped_user_nodes += 1;
            continue;
        }

        info!(
            "[{}/{}] user node {} ({}) has {} matching entities",
            index + 1,
            total,
            user_node.name,
            user_node.record_id,
            entities.len()
        );
        report
            .updated
            .push(retype_and_train(client, &user_node, entities, replacement.new).await?);
    }

    info!(
        "Updated {} entities in {} user nodes, skipped {} user nodes",
        report.updated_entity_count(),
        report.updated.len(),
        report.skipped_user_nodes
    );
    Ok(report)
}

/// Entities of `entity_type` across all intents of `user_node`, in intent order
async fn entities_of_type<C>(
    client: &C,
    user_node: &UserNode,
    entity_type: RecordId,
) -> Result<Vec<Entity>>
where
    C: ClientApi + ?Sized,
{
    let mut matching = Vec::new();
    for intent_ref in &user_node.intents {
        let intent = client.get_intent(intent_ref.record_id).await?;
        matching.extend(
            intent
                .entities
                .into_iter()
                .filter(|entity| entity.entity_type_record_id == entity_type),
        );
    }
    Ok(matching)
}

async fn retype_and_train<C>(
    client: &C,
    user_node: &UserNode,
    entities: Vec<Entity>,
    new_type: RecordId,
) -> Result<UpdatedUserNode>
where
    C: ClientApi + ?Sized,
{
    let mut updated_entities = Vec::with_capacity(entities.len());
    for mut entity in entities {
        info!(
            "Update entity {} ({}) in intent {}",
            entity.name, entity.record_id, entity.intent_record_id
        );
        entity.entity_type_record_id = new_type;
        client.update_entity(entity.record_id, &entity).await?;
        updated_entities.push(entity.record_id);
    }

    let deployed_intent = match user_node.deploy_target() {
        Some(intent_id) => {
            info!("Train user node {} ({})", user_node.name, user_node.record_id);
            client.deploy_intent(intent_id).await?;
            Some(intent_id)
        }
        None => {
            warn!(
                "User node {} ({}) has no intent to deploy, not retrained",
                user_node.name, user_node.record_id
            );
            None
        }
    };

    Ok(UpdatedUserNode {
        record_id: user_node.record_id,
        name: user_node.name.clone(),
        updated_entities,
        deployed_intent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ms_rest_api_contract::Intent;
    use ms_rest_client_mock::{MockBackend, MockCall, MockClient};

    #[test]
    fn test_confirmation_prompt() {
        let old = EntityType::new(5, "city");
        let new = EntityType::new(9, "location");
        assert_eq!(
            confirmation_prompt(&old, &new),
            "Replace entity type city (5) with entity type location (9)? (y/n)"
        );
    }

    #[test]
    fn test_deploy_skipped_lists_untrained_nodes() {
        let node = |record_id, deployed_intent| UpdatedUserNode {
            record_id,
            name: format!("node {}", record_id),
            updated_entities: vec![1],
            deployed_intent,
        };
        let report = ReplaceReport {
            old: EntityTypeRef { record_id: 5, name: "a".into() },
            new: EntityTypeRef { record_id: 9, name: "b".into() },
            updated: vec![node(1, Some(100)), node(2, None)],
            skipped_user_nodes: 0,
        };
        assert_eq!(report.deploy_skipped(), vec![2]);
        assert_eq!(report.updated_entity_count(), 2);
    }

    #[tokio::test]
    async fn test_node_without_intents_is_updated_but_not_deployed() {
        let client = MockClient::new(MockBackend::new().with_user_node(
            1,
            "Book a trip",
            vec![Intent::new(30, "book_trip", vec![Entity::new(310, "origin", 30, 5)])],
        ));
        let entity = client.snapshot().entity(310).cloned().unwrap();
        let orphan = UserNode::new(7, "Orphan", &[]);

        let updated = retype_and_train(&client, &orphan, vec![entity], 9)
            .await
            .unwrap();

        assert_eq!(updated.updated_entities, vec![310]);
        assert_eq!(updated.deployed_intent, None);
        assert_eq!(
            client.content_mutations(),
            vec![MockCall::UpdateEntity {
                entity_id: 310,
                entity_type_id: 9
            }]
        );
        assert_eq!(client.snapshot().entity(310).unwrap().entity_type_record_id, 9);
    }
}
