//! Tests for entity type replacement against the mock back-office.

use ms_client_api::{ClientApiError, PromptError};
use ms_core::{replace_entity_type, EntityTypeReplacement, Error, UpdatedUserNode};
use ms_rest_api_contract::{Entity, Intent};
use ms_rest_client_mock::{MockBackend, MockCall, MockClient, ScriptedConfirmations};
use pretty_assertions::assert_eq;

const OLD: i64 = 5;
const NEW: i64 = 9;

fn replacement() -> EntityTypeReplacement {
    EntityTypeReplacement { old: OLD, new: NEW }
}

/// One user node with two intents, a single entity of the old type.
fn example_backend() -> MockBackend {
    MockBackend::new()
        .with_entity_type(OLD, "city")
        .with_entity_type(NEW, "location")
        .with_user_node(
            1,
            "Book a trip",
            vec![
                Intent::new(
                    30,
                    "book_trip",
                    vec![Entity::new(300, "destination", 30, 7)],
                ),
                Intent::new(
                    31,
                    "book_trip_from",
                    vec![
                        Entity::new(310, "origin", 31, OLD),
                        Entity::new(311, "date", 31, 8),
                    ],
                ),
            ],
        )
}

#[tokio::test]
async fn test_example_scenario() {
    let client = MockClient::new(example_backend());
    let confirmations = ScriptedConfirmations::new(["y"]);

    let report = replace_entity_type(&client, &confirmations, replacement())
        .await
        .unwrap();

    assert_eq!(
        client.content_mutations(),
        vec![
            MockCall::UpdateEntity { entity_id: 310, entity_type_id: NEW },
            MockCall::DeployIntent(30),
        ]
    );
    assert_eq!(
        report.updated,
        vec![UpdatedUserNode {
            record_id: 1,
            name: "Book a trip".to_string(),
            updated_entities: vec![310],
            deployed_intent: Some(30),
        }]
    );
    assert_eq!(
        confirmations.prompts(),
        vec!["Replace entity type city (5) with entity type location (9)? (y/n)".to_string()]
    );

    let state = client.snapshot();
    assert_eq!(state.entity(310).unwrap().entity_type_record_id, NEW);
    assert_eq!(state.entity(311).unwrap().entity_type_record_id, 8);
}

#[tokio::test]
async fn test_one_deploy_per_user_node() {
    let backend = example_backend()
        .with_user_node(
            2,
            "Weather",
            vec![
                Intent::new(40, "weather", vec![Entity::new(400, "where", 40, OLD)]),
                Intent::new(
                    41,
                    "weather_at",
                    vec![
                        Entity::new(410, "place", 41, OLD),
                        Entity::new(411, "from", 41, OLD),
                    ],
                ),
            ],
        )
        .with_user_node(
            3,
            "Greetings",
            vec![Intent::new(50, "hello", vec![Entity::new(500, "name", 50, 6)])],
        );
    let client = MockClient::new(backend);

    let report = replace_entity_type(&client, &ScriptedConfirmations::new(["y"]), replacement())
        .await
        .unwrap();

    assert_eq!(
        client.content_mutations(),
        vec![
            MockCall::UpdateEntity { entity_id: 310, entity_type_id: NEW },
            MockCall::DeployIntent(30),
            MockCall::UpdateEntity { entity_id: 400, entity_type_id: NEW },
            MockCall::UpdateEntity { entity_id: 410, entity_type_id: NEW },
            MockCall::UpdateEntity { entity_id: 411, entity_type_id: NEW },
            MockCall::DeployIntent(40),
        ]
    );
    assert_eq!(report.updated_entity_count(), 4);
    assert_eq!(report.skipped_user_nodes, 1);
    assert!(report.deploy_skipped().is_empty());
}

#[tokio::test]
async fn test_nodes_without_matches_are_untouched() {
    let backend = MockBackend::new()
        .with_entity_type(OLD, "city")
        .with_entity_type(NEW, "location")
        .with_user_node(
            3,
            "Greetings",
            vec![Intent::new(50, "hello", vec![Entity::new(500, "name", 50, 6)])],
        )
        .with_user_node(4, "Empty", vec![]);
    let client = MockClient::new(backend);

    let report = replace_entity_type(&client, &ScriptedConfirmations::new(["y"]), replacement())
        .await
        .unwrap();

    assert!(client.content_mutations().is_empty());
    assert!(report.updated.is_empty());
    assert_eq!(report.skipped_user_nodes, 2);
}

#[tokio::test]
async fn test_declined_confirmation_mutates_nothing() {
    for answer in ["n", "Y", "yes", ""] {
        let client = MockClient::new(example_backend());
        let confirmations = ScriptedConfirmations::new([answer]);

        let err = replace_entity_type(&client, &confirmations, replacement())
            .await
            .unwrap_err();

        assert!(
            matches!(err, Error::Prompt(PromptError::Mismatch { .. })),
            "answer {:?} gave {:?}",
            answer,
            err
        );
        assert!(client.calls().is_empty());
    }
}

#[tokio::test]
async fn test_unanswered_confirmation_mutates_nothing() {
    let client = MockClient::new(example_backend());

    let err = replace_entity_type(&client, &ScriptedConfirmations::default(), replacement())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Prompt(PromptError::NonInteractive(_))));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_same_entity_type_is_rejected_before_any_call() {
    let client = MockClient::new(example_backend());
    let confirmations = ScriptedConfirmations::new(["y"]);

    let err = replace_entity_type(
        &client,
        &confirmations,
        EntityTypeReplacement { old: OLD, new: OLD },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::SameEntityType(OLD)));
    assert!(confirmations.prompts().is_empty());
}

#[tokio::test]
async fn test_unknown_entity_type_fails_before_prompt() {
    let client = MockClient::new(example_backend());
    let confirmations = ScriptedConfirmations::new(["y"]);

    let err = replace_entity_type(
        &client,
        &confirmations,
        EntityTypeReplacement { old: OLD, new: 404 },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Client(ClientApiError::NotFound(_))));
    assert!(confirmations.prompts().is_empty());
}

#[tokio::test]
async fn test_failed_update_skips_deploy() {
    let client = MockClient::new(example_backend()).fail_on(MockCall::UpdateEntity {
        entity_id: 310,
        entity_type_id: NEW,
    });

    replace_entity_type(&client, &ScriptedConfirmations::new(["y"]), replacement())
        .await
        .unwrap_err();

    assert_eq!(
        client.content_mutations(),
        vec![MockCall::UpdateEntity { entity_id: 310, entity_type_id: NEW }]
    );
}

#[tokio::test]
async fn test_second_run_only_prompts() {
    let client = MockClient::new(example_backend());
    replace_entity_type(&client, &ScriptedConfirmations::new(["y"]), replacement())
        .await
        .unwrap();
    client.clear_calls();

    let report = replace_entity_type(&client, &ScriptedConfirmations::new(["y"]), replacement())
        .await
        .unwrap();

    assert!(report.updated.is_empty());
    assert!(client.calls().is_empty());
}
