use std::time::Duration;

use serde_json::json;
use trading_core::error::LlmError;
use trading_llm::{ChatBackend, ChatMessage, LlmConfig, OpenRouterClient};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, timeout_secs: u64) -> OpenRouterClient {
    let config = LlmConfig {
        api_url: format!("{}/api/v1/chat/completions", server.uri()),
        model: "test/model".into(),
        timeout_secs,
        ..Default::default()
    };
    OpenRouterClient::new(config, "test-key").unwrap()
}

fn messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("answer LONG, SHORT or HOLD"),
        ChatMessage::user("RSI: 25.00"),
    ]
}

#[tokio::test]
async fn returns_first_choice_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({"model": "test/model", "max_tokens": 2000})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "LONG (Confidence: 0.8)"}},
                {"message": {"role": "assistant", "content": "SHORT"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server, 5).complete(&messages()).await.unwrap();
    assert_eq!(reply, "LONG (Confidence: 0.8)");
}

#[tokio::test]
async fn payment_required_is_distinguished() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(402).set_body_string("no credits"))
        .mount(&server)
        .await;

    let result = client_for(&server, 5).complete(&messages()).await;
    assert!(matches!(result, Err(LlmError::PaymentRequired)));
}

#[tokio::test]
async fn server_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    match client_for(&server, 5).complete(&messages()).await {
        Err(LlmError::Api { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream down");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_body_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = client_for(&server, 5).complete(&messages()).await;
    assert!(matches!(result, Err(LlmError::MalformedResponse(_))));
}

#[tokio::test]
async fn empty_choices_are_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let result = client_for(&server, 5).complete(&messages()).await;
    assert!(matches!(result, Err(LlmError::EmptyResponse)));
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": [{"message": {"content": "LONG"}}]}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let result = client_for(&server, 1).complete(&messages()).await;
    assert!(matches!(result, Err(LlmError::Timeout(1))));
}
