mod common;

use common::*;
use dreamroom::{
    GenerationInput, GenerationOutcome, TriggerResult,
    error::GENERIC_FAILURE_MESSAGE,
    generators::RequestBody,
    models::generation::ControllerState,
    store::MemoryStore,
    ui::UiEvent,
};

#[tokio::test]
async fn sign_in_then_generate_end_to_end() {
    let server = MockServer::start().await;
    let (context, ui) = context(&server.url("/api/generate"), RequestBody::Multipart, MemoryStore::new());
    assert_eq!(context.restore().await, None);

    // Step 1: no session, no request
    let input = GenerationInput::new(Some(PNG.to_vec()), "cozy reading nook");
    assert_eq!(context.generate(&input).await, TriggerResult::SignInRequired);
    assert!(server.hits().is_empty());
    assert_eq!(ui.events(), vec![UiEvent::SignInRequired]);

    // Step 2: sign in
    let session = context.sessions.sign_in(&ada_token()).await.unwrap();
    assert_eq!(context.sessions.current().await, Some(session.clone()));
    assert_eq!(session.name, "Ada Lovelace");
    ui.clear();

    // Step 3: generate
    let result = context.generate(&input).await;

    assert_eq!(
        result,
        TriggerResult::Completed(GenerationOutcome::Success {
            image_url: IMAGE_URL.to_string()
        })
    );
    let hits = server.hits();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].prompt.as_deref(), Some("cozy reading nook"));
    assert_eq!(hits[0].image_len, PNG.len());
    assert_eq!(hits[0].image_type.as_deref(), Some("image/png"));
    assert_eq!(hits[0].style, None);
    assert_eq!(
        ui.events(),
        vec![
            UiEvent::GenerationStarted,
            UiEvent::GenerationSucceeded(IMAGE_URL.to_string()),
            UiEvent::GenerationSettled,
        ]
    );
    assert_eq!(context.generation.state(), ControllerState::Idle);
}

#[tokio::test]
async fn server_error_fails_once_and_allows_retrigger() {
    let server = MockServer::start().await;
    let (context, ui) = context(&server.url("/api/generate-fail"), RequestBody::Multipart, MemoryStore::new());
    context.sessions.sign_in(&ada_token()).await.unwrap();
    ui.clear();

    let input = GenerationInput::new(Some(PNG.to_vec()), "cozy reading nook");
    let result = context.generate(&input).await;

    assert!(matches!(
        result,
        TriggerResult::Completed(GenerationOutcome::Failure { .. })
    ));
    assert_eq!(ui.count(|e| matches!(e, UiEvent::GenerationFailed(_))), 1);
    assert_eq!(ui.count(|e| *e == UiEvent::GenerationSettled), 1);
    assert_eq!(context.generation.state(), ControllerState::Idle);

    // The controller is idle again, so the next trigger goes out.
    context.generate(&input).await;
    assert_eq!(server.hits().len(), 2);
}

#[tokio::test]
async fn whitespace_prompt_sends_nothing() {
    let server = MockServer::start().await;
    let (context, ui) = context(&server.url("/api/generate"), RequestBody::Multipart, MemoryStore::new());
    context.sessions.sign_in(&ada_token()).await.unwrap();
    ui.clear();

    let input = GenerationInput::new(Some(PNG.to_vec()), "  ");
    assert_eq!(
        context.generate(&input).await,
        TriggerResult::Rejected(dreamroom::ValidationError::MissingPrompt)
    );
    assert!(server.hits().is_empty());
}

#[tokio::test]
async fn selected_style_travels_with_the_request() {
    let server = MockServer::start().await;
    let (context, _) = context(&server.url("/api/generate"), RequestBody::Multipart, MemoryStore::new());
    context.sessions.sign_in(&ada_token()).await.unwrap();
    context.styles.select("industrial chic").await.unwrap();

    let input = GenerationInput::new(Some(PNG.to_vec()), "open-plan loft");
    assert!(matches!(context.generate(&input).await, TriggerResult::Completed(_)));

    let hits = server.hits();
    assert_eq!(hits[0].style.as_deref(), Some("Industrial Chic"));
    assert_eq!(hits[0].prompt.as_deref(), Some("open-plan loft"));
}

#[tokio::test]
async fn json_mode_posts_the_prompt() {
    let server = MockServer::start().await;
    let (context, _) = context(&server.url("/api/generate-json"), RequestBody::Json, MemoryStore::new());
    context.sessions.sign_in(&ada_token()).await.unwrap();

    let input = GenerationInput::new(Some(PNG.to_vec()), "  sunny breakfast nook  ");
    let result = context.generate(&input).await;

    assert!(matches!(
        result,
        TriggerResult::Completed(GenerationOutcome::Success { .. })
    ));
    assert_eq!(server.hits()[0].prompt.as_deref(), Some("sunny breakfast nook"));
}

#[tokio::test]
async fn response_without_image_url_is_a_failure() {
    let server = MockServer::start().await;
    let (context, ui) = context(&server.url("/api/generate-empty"), RequestBody::Multipart, MemoryStore::new());
    context.sessions.sign_in(&ada_token()).await.unwrap();

    let input = GenerationInput::new(Some(PNG.to_vec()), "attic studio");
    let result = context.generate(&input).await;

    assert!(matches!(
        result,
        TriggerResult::Completed(GenerationOutcome::Failure { .. })
    ));
    assert_eq!(ui.count(|e| matches!(e, UiEvent::GenerationFailed(_))), 1);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/api/generate", listener.local_addr().unwrap());
    drop(listener);

    let (context, ui) = context(&endpoint, RequestBody::Multipart, MemoryStore::new());
    context.sessions.sign_in(&ada_token()).await.unwrap();

    let input = GenerationInput::new(Some(PNG.to_vec()), "attic studio");
    let result = context.generate(&input).await;

    assert!(matches!(
        result,
        TriggerResult::Completed(GenerationOutcome::Failure { .. })
    ));
    // Connection details stay in the logs; the page only gets the generic text.
    assert_eq!(
        ui.count(|e| *e == UiEvent::GenerationFailed(GENERIC_FAILURE_MESSAGE.to_string())),
        1
    );
    assert_eq!(ui.count(|e| *e == UiEvent::GenerationSettled), 1);
    assert_eq!(context.generation.state(), ControllerState::Idle);
}

#[tokio::test]
async fn shutdown_cancels_new_requests() {
    let server = MockServer::start().await;
    let (context, ui) = context(&server.url("/api/generate"), RequestBody::Multipart, MemoryStore::new());
    context.sessions.sign_in(&ada_token()).await.unwrap();
    ui.clear();

    context.shutdown();
    let input = GenerationInput::new(Some(PNG.to_vec()), "attic studio");

    assert_eq!(context.generate(&input).await, TriggerResult::Cancelled);
    assert!(server.hits().is_empty());
    assert_eq!(ui.count(|e| *e == UiEvent::GenerationSettled), 1);
}
