//! Behavioral tests for the mutation dispatcher and modal state

use serde_json::{Value, json};

use super::{FakeTransport, shared};
use crate::descriptor::ResourceDescriptor;
use crate::error::Error;
use crate::fetcher::ResourceFetcher;
use crate::models::{Configuration, PlaybookUpload, Template};
use crate::mutation::{CommandRequest, ModalState, Mutation, MutationDispatcher, RefreshPolicy};

fn playbook() -> Mutation {
    Mutation::UploadPlaybook(PlaybookUpload {
        name: "Security Updates".to_string(),
        description: "Patch everything".to_string(),
        file_name: "security.yml".to_string(),
        content: "- hosts: all\n  become: true".to_string(),
    })
}

#[tokio::test]
async fn given_valid_upload_when_dispatched_then_payload_is_posted() {
    // Given
    let transport = shared(FakeTransport::new().with("/templates/upload", Ok(json!({"id": 12}))));
    let dispatcher = MutationDispatcher::new(transport.clone());

    // When
    let result = dispatcher.dispatch(&playbook()).await;

    // Then
    assert_eq!(result, Ok(json!({"id": 12})));
    assert_eq!(transport.methods(), vec!["POST"]);
    let body = transport.bodies();
    assert_eq!(
        body.first().and_then(|b| b.get("file_name")).and_then(Value::as_str),
        Some("security.yml")
    );
}

#[tokio::test]
async fn given_invalid_command_when_dispatched_then_nothing_is_sent() {
    // Given
    let transport = shared(FakeTransport::new());
    let dispatcher = MutationDispatcher::new(transport.clone());
    let mutation = Mutation::ExecuteCommand(CommandRequest {
        server_ids: Vec::new(),
        command: "uptime".to_string(),
    });

    // When
    let result = dispatcher.dispatch(&mutation).await;

    // Then
    assert!(matches!(result, Err(Error::Validation { .. })));
    assert_eq!(transport.total_calls(), 0);
}

#[tokio::test]
async fn given_delete_when_dispatched_then_delete_method_is_used() {
    // Given
    let transport = shared(FakeTransport::new().with("/configurations/delete/5", Ok(Value::Null)));
    let dispatcher = MutationDispatcher::new(transport.clone());

    // When
    let result = dispatcher.dispatch(&Mutation::DeleteConfiguration(5)).await;

    // Then
    assert!(result.is_ok());
    assert_eq!(transport.methods(), vec!["DELETE"]);
}

#[tokio::test]
async fn given_open_modal_when_submission_succeeds_then_modal_closes() {
    // Given
    let transport = shared(FakeTransport::new().with("/templates/upload", Ok(Value::Null)));
    let dispatcher = MutationDispatcher::new(transport);
    let mut modal = ModalState::default();
    modal.open();

    // When
    let result = dispatcher.submit(&mut modal, &playbook()).await;

    // Then
    assert!(result.is_ok());
    assert!(!modal.open, "2xx closes the modal without confirmation");
    assert_eq!(modal.error, None);
}

#[tokio::test]
async fn given_open_modal_when_backend_rejects_then_modal_stays_open_with_error() {
    // Given
    let transport = shared(
        FakeTransport::new().with("/templates/upload", Err(Error::status("/templates/upload", 500))),
    );
    let dispatcher = MutationDispatcher::new(transport);
    let mut modal = ModalState::default();
    modal.open();

    // When
    let result = dispatcher.submit(&mut modal, &playbook()).await;

    // Then
    assert!(result.is_err());
    assert!(modal.open);
    assert!(!modal.submitting);
    assert!(modal.error.as_deref().is_some_and(|e| e.contains("500")));
}

#[tokio::test]
async fn given_default_policy_when_mutation_succeeds_then_list_is_not_refetched() {
    // Given
    let transport = shared(
        FakeTransport::new()
            .with("/templates/upload", Ok(Value::Null))
            .with("/templates/getTemplates", Ok(json!({"templates": []}))),
    );
    let dispatcher = MutationDispatcher::new(transport.clone());
    let templates = ResourceFetcher::<Template>::new(transport.clone(), ResourceDescriptor::TEMPLATES);

    // When
    dispatcher
        .dispatch_then_refresh(&playbook(), RefreshPolicy::default(), &templates)
        .await
        .unwrap();

    // Then
    assert_eq!(transport.calls_to("/templates/getTemplates"), 0);
}

#[tokio::test]
async fn given_refetch_policy_when_mutation_succeeds_then_list_is_refetched_once() {
    // Given
    let transport = shared(
        FakeTransport::new()
            .with("/configurations/create", Ok(Value::Null))
            .with("/configurations/getConfigs", Ok(json!([
                {"id": 1, "name": "uptime", "description": "", "module": "shell", "configuration": "uptime"}
            ]))),
    );
    let dispatcher = MutationDispatcher::new(transport.clone());
    let configs =
        ResourceFetcher::<Configuration>::new(transport.clone(), ResourceDescriptor::CONFIGURATIONS);
    let mutation = Mutation::CreateConfiguration(crate::models::NewConfiguration {
        name: "uptime".to_string(),
        description: String::new(),
        module: "shell".to_string(),
        configuration: "uptime".to_string(),
    });

    // When
    dispatcher
        .dispatch_then_refresh(&mutation, RefreshPolicy::Refetch, &configs)
        .await
        .unwrap();

    // Then
    assert_eq!(transport.calls_to("/configurations/getConfigs"), 1);
    assert_eq!(configs.with_state(|s| s.items().len()), 1);
}
