//! Integration tests for parley-chat.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use parley_chat::{
    build_router, AppState, BpeTokenizer, ChatService, CompatibleProvider, Conversation,
    CredentialStore, Provider, Tokenizer, MISSING_API_KEY_MESSAGE,
};
use parley_common::ContextMode;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_app(
    server: &MockServer,
    key_file: &Path,
    mode: ContextMode,
) -> (axum::Router, AppState) {
    let provider: Arc<dyn Provider> = Arc::new(CompatibleProvider::new(
        "cerebras",
        &server.uri(),
        "llama3.1-70b",
        Duration::from_secs(5),
    ));
    let tokenizer = BpeTokenizer::cl100k().unwrap();
    let credentials = CredentialStore::load(key_file).unwrap();
    let state = AppState::new(ChatService::new(
        Conversation::new(mode, Arc::new(tokenizer)),
        credentials,
        provider,
    ));
    (build_router(state.clone()), state)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "choices": [{"message": {"content": content}, "finish_reason": "stop"}],
        "usage": {"prompt_tokens": 5, "completion_tokens": 3, "total_tokens": 8}
    }))
}

#[tokio::test]
async fn test_chat_page_served() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_app(&server, &dir.path().join("key.txt"), ContextMode::Chars(1000));

    let response = app
        .oneshot(Request::builder().uri("/chat").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/html; charset=utf-8"
    );
    assert!(body_text(response).await.contains("<title>Chat with API</title>"));
}

#[tokio::test]
async fn test_send_without_key_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("unused"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_app(&server, &dir.path().join("key.txt"), ContextMode::Chars(1000));

    let response = app
        .oneshot(post_json("/send_message", r#"{"prompt": "hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, MISSING_API_KEY_MESSAGE);
}

#[tokio::test]
async fn test_full_conversation_flow() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let key_file = dir.path().join("key.txt");
    let (app, state) = test_app(&server, &key_file, ContextMode::Chars(10_000));

    // 1. Save the key
    let response = app
        .clone()
        .oneshot(post_json("/save_api_key", r#"{"api_key": "csk-integration"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "API Key Saved");
    assert_eq!(std::fs::read_to_string(&key_file).unwrap(), "csk-integration");

    // 2. First message: the whole context is the single user turn
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer csk-integration"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama3.1-70b",
            "messages": [{"role": "user", "content": "User: show me code\n"}]
        })))
        .respond_with(completion("Sure:\n```python\nprint(1)\n```"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    let response = app
        .clone()
        .oneshot(post_json("/send_message", r#"{"prompt": "show me code"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        "Bot: <div class=\"bot-message\">Sure:\n<pre><code>print(1)</code></pre></div>\n"
    );

    // 3. Second message carries the previous exchange
    let expected_prompt = "User: show me code\n\
        Bot: <div class=\"bot-message\">Sure:\n<pre><code>print(1)</code></pre></div>\n\
        User: thanks\n";
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "messages": [{"role": "user", "content": expected_prompt}]
        })))
        .respond_with(completion("You're welcome."))
        .expect(1)
        .mount(&server)
        .await;

    let response = app
        .clone()
        .oneshot(post_json("/send_message", r#"{"prompt": "thanks"}"#))
        .await
        .unwrap();
    assert_eq!(
        body_text(response).await,
        "Bot: <div class=\"bot-message\">You're welcome.</div>\n"
    );
    assert_eq!(state.chat.turns().await.len(), 4);

    // 4. Clear
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/clear_chat")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_text(response).await, "Cleared");
    assert!(state.chat.turns().await.is_empty());
}

#[tokio::test]
async fn test_upstream_error_returned_as_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model overloaded"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let key_file = dir.path().join("key.txt");
    std::fs::write(&key_file, "csk-from-disk\n").unwrap();
    let (app, _) = test_app(&server, &key_file, ContextMode::Chars(1000));

    let response = app
        .oneshot(post_json("/send_message", r#"{"prompt": "hi"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        "[cerebras:llama3.1-70b] API error (500): model overloaded"
    );
}

#[tokio::test]
async fn test_char_budget_drops_old_turns() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("ok"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let key_file = dir.path().join("key.txt");
    std::fs::write(&key_file, "k").unwrap();
    let (app, state) = test_app(&server, &key_file, ContextMode::Chars(80));

    for i in 0..5 {
        let body = format!(r#"{{"prompt": "message {i}"}}"#);
        app.clone()
            .oneshot(post_json("/send_message", &body))
            .await
            .unwrap();
    }

    let turns = state.chat.turns().await;
    let total: usize = turns.iter().map(|t| t.chars().count()).sum();
    assert!(total <= 80);
    assert_eq!(
        turns.last().unwrap(),
        "Bot: <div class=\"bot-message\">ok</div>\n"
    );
    assert!(turns.iter().all(|t| !t.contains("message 0")));
}

#[tokio::test]
async fn test_token_budget_single_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("a fairly long answer with quite a few words in it"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let key_file = dir.path().join("key.txt");
    std::fs::write(&key_file, "k").unwrap();
    let (app, state) = test_app(&server, &key_file, ContextMode::Tokens(20));

    for _ in 0..3 {
        app.clone()
            .oneshot(post_json("/send_message", r#"{"prompt": "tell me more"}"#))
            .await
            .unwrap();
    }

    let turns = state.chat.turns().await;
    assert_eq!(turns.len(), 1);
    let tokenizer = BpeTokenizer::cl100k().unwrap();
    assert!(tokenizer.count_tokens(&turns[0]) <= 20);
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_app(&server, &dir.path().join("key.txt"), ContextMode::Chars(1000));

    let response = app
        .oneshot(post_json("/send_message", "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_health_answers_while_reply_pending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion("late").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let key_file = dir.path().join("key.txt");
    std::fs::write(&key_file, "k").unwrap();
    let (app, _) = test_app(&server, &key_file, ContextMode::Tokens(500));

    let pending = tokio::spawn(
        app.clone()
            .oneshot(post_json("/send_message", r#"{"prompt": "take your time"}"#)),
    );
    tokio::time::sleep(Duration::from_millis(200)).await;

    let response = tokio::time::timeout(
        Duration::from_millis(500),
        app.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()),
    )
    .await
    .expect("health blocked behind the pending send")
    .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["context_mode"]["unit"], "tokens");
    assert_eq!(json["context_mode"]["budget"], 500);

    let reply = pending.await.unwrap().unwrap();
    assert_eq!(
        body_text(reply).await,
        "Bot: <div class=\"bot-message\">late</div>\n"
    );
}
