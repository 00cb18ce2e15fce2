//! Tests for instance, language and experiment selection.

use ms_client_api::ClientApiError;
use ms_core::{setup_environment, EnvironmentSelection, Error, InstanceRef};
use ms_rest_client_mock::{MockBackend, MockCall, MockClient};
use pretty_assertions::assert_eq;

fn backend() -> MockBackend {
    MockBackend::new()
        .with_instance(3, "Benchmark NLP - test")
        .with_instance(4, "Benchmark NLP")
}

fn selection(instance: &str, experiment_id: Option<i64>) -> EnvironmentSelection {
    EnvironmentSelection {
        instance: instance.parse().unwrap(),
        language: "fr_FR".to_string(),
        experiment_id,
    }
}

#[tokio::test]
async fn test_instance_then_language_then_experiment() {
    let client = MockClient::new(backend().with_experiments(true));

    let environment = setup_environment(&client, &selection("Benchmark NLP", Some(15)))
        .await
        .unwrap();

    assert_eq!(
        client.calls(),
        vec![
            MockCall::SetCurrentInstance(4),
            MockCall::SetCurrentLanguage("fr_FR".to_string()),
            MockCall::SetCurrentExperiment(15),
        ]
    );
    assert_eq!(environment.current_instance.unwrap().id, 4);
    assert_eq!(environment.current_language.as_deref(), Some("fr_FR"));
    assert_eq!(environment.current_experiment.unwrap().id, 15);
}

#[tokio::test]
async fn test_without_experiment() {
    let client = MockClient::new(backend());

    setup_environment(&client, &selection("3", None)).await.unwrap();

    assert_eq!(
        client.calls(),
        vec![
            MockCall::SetCurrentInstance(3),
            MockCall::SetCurrentLanguage("fr_FR".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_unknown_instance_name() {
    let client = MockClient::new(backend());

    let err = setup_environment(&client, &selection("Benchmark", None))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InstanceNotFound(ref name) if name == "Benchmark"));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_experiment_on_incapable_bot_stops_after_language() {
    let client = MockClient::new(backend().with_experiments(false));
    let selection = EnvironmentSelection {
        instance: InstanceRef::Id(3),
        language: "en_US".to_string(),
        experiment_id: Some(15),
    };

    let err = setup_environment(&client, &selection).await.unwrap_err();

    assert!(matches!(err, Error::Client(ClientApiError::Unsupported(_))));
    assert_eq!(client.calls().len(), 2);
}
