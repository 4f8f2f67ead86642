//! Tests for the Upstash REST history adapter against a mock server.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use supportbot::{
    ChatbotConfig, ContextDocument, ContextSource, DomainError, HistoryRepository,
    MockChatClient, Role, RunChatbotUseCase, SessionId, Turn, UpstashHistoryRepository,
};

fn session() -> SessionId {
    SessionId::parse("20240307-00065").unwrap()
}

fn init_debug_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

struct EmptyContext;

#[async_trait]
impl ContextSource for EmptyContext {
    async fn load(&self) -> Result<ContextDocument, DomainError> {
        Ok(ContextDocument::default())
    }
}

#[tokio::test]
async fn test_append_sends_push_and_trim_in_one_transaction() {
    init_debug_logging();
    let server = MockServer::start().await;
    let entry = Turn::user("Hi").encode().unwrap();

    Mock::given(method("POST"))
        .and(path("/multi-exec"))
        .and(header("authorization", "Bearer secret-token"))
        .and(body_json(json!([
            ["RPUSH", "chat:20240307-00065", entry],
            ["LTRIM", "chat:20240307-00065", "-50", "-1"]
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"result": 1},
            {"result": "OK"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let repo = UpstashHistoryRepository::new(server.uri(), "secret-token", 50);
    repo.append(&session(), &Turn::user("Hi")).await.unwrap();
}

#[tokio::test]
async fn test_exchange_pushes_both_turns_in_one_transaction() {
    init_debug_logging();
    let server = MockServer::start().await;
    let user = Turn::user("Where is my order?").encode().unwrap();
    let assistant = Turn::assistant("It ships today.").encode().unwrap();

    Mock::given(method("POST"))
        .and(path("/multi-exec"))
        .and(body_json(json!([
            ["RPUSH", "chat:20240307-00065", user, assistant],
            ["LTRIM", "chat:20240307-00065", "-50", "-1"]
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"result": 2},
            {"result": "OK"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let repo = UpstashHistoryRepository::new(server.uri(), "t", 50);
    repo.append_exchange(
        &session(),
        &Turn::user("Where is my order?"),
        &Turn::assistant("It ships today."),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_chatbot_stores_an_exchange_with_a_single_write() {
    init_debug_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/multi-exec"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"result": 2},
            {"result": "OK"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let chatbot = RunChatbotUseCase::new(
        ChatbotConfig::default(),
        Arc::new(UpstashHistoryRepository::new(server.uri(), "t", 50)),
        Arc::new(EmptyContext),
        Arc::new(MockChatClient::new()),
    );
    let reply = chatbot
        .execute("Hi", Some("20240307-00065"))
        .await
        .unwrap();
    assert_eq!(reply.response(), "You said: Hi (prior turns: 0)");

    let requests = server.received_requests().await.unwrap();
    let write = requests
        .iter()
        .find(|r| r.url.path() == "/multi-exec")
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&write.body).unwrap();
    let push = body[0].as_array().unwrap();
    assert_eq!(push.len(), 4);

    let stored: Vec<String> = push[2..]
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    let turns = Turn::decode_all(&stored);
    let roles: Vec<Role> = turns.iter().map(Turn::role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant]);
    assert_eq!(turns[1].content(), "You said: Hi (prior turns: 0)");
}

#[tokio::test]
async fn test_failed_exchange_write_is_storage_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/multi-exec"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let repo = UpstashHistoryRepository::new(server.uri(), "t", 50);
    let err = repo
        .append_exchange(&session(), &Turn::user("Hi"), &Turn::assistant("Hello"))
        .await
        .unwrap_err();
    assert!(err.is_storage_error());
}

#[tokio::test]
async fn test_custom_limit_is_used_for_trim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/multi-exec"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"result": 11},
            {"result": "OK"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let repo = UpstashHistoryRepository::new(server.uri(), "t", 10);
    repo.append(&session(), &Turn::assistant("Hello")).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body[1], json!(["LTRIM", "chat:20240307-00065", "-10", "-1"]));
}

#[tokio::test]
async fn test_read_all_decodes_tagged_and_legacy_entries() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_json(json!(["LRANGE", "chat:20240307-00065", "0", "-1"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                "plain question",
                "plain answer",
                r#"{"role":"user","content":"tagged question"}"#
            ]
        })))
        .mount(&server)
        .await;

    let repo = UpstashHistoryRepository::new(server.uri(), "t", 50);
    let turns = repo.read_all(&session()).await.unwrap();

    let roles: Vec<Role> = turns.iter().map(|t| t.role()).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
    assert_eq!(turns[2].content(), "tagged question");
}

#[tokio::test]
async fn test_unknown_session_reads_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": []})))
        .mount(&server)
        .await;

    let repo = UpstashHistoryRepository::new(server.uri(), "t", 50);
    assert!(repo.read_all(&session()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_store_errors_propagate_as_storage_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Unauthorized"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/multi-exec"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"error": "WRONGTYPE Operation against a key holding the wrong kind of value"},
            {"result": "OK"}
        ])))
        .mount(&server)
        .await;

    let repo = UpstashHistoryRepository::new(server.uri(), "bad", 50);

    let err = repo.read_all(&session()).await.unwrap_err();
    assert!(err.is_storage_error());

    let err = repo.append(&session(), &Turn::user("Hi")).await.unwrap_err();
    assert!(err.is_storage_error());
}

#[tokio::test]
async fn test_unreachable_store_is_storage_error() {
    let repo = UpstashHistoryRepository::new("http://127.0.0.1:9", "t", 50);
    let err = repo.read_all(&session()).await.unwrap_err();
    assert!(err.is_storage_error());
}
