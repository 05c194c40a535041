#![allow(dead_code)]

use footballgpt::{ChatController, ClientConfig};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn user_json() -> Value {
    json!({
        "id": "u1",
        "email": "fan@example.com",
        "first_name": "Leo",
        "last_name": null,
        "profile_image_url": null
    })
}

pub fn summaries_json() -> Value {
    json!([
        {"id": "c1", "title": "World Cup 2022", "message_count": 2},
        {"id": "c2", "title": "Transfer rumours", "message_count": 4}
    ])
}

pub async fn mount_logged_in(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(server)
        .await;
}

pub async fn mount_anonymous(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Not authenticated"})),
        )
        .mount(server)
        .await;
}

/// Conversation list endpoint, expected to be hit exactly `times` times.
pub async fn mount_conversation_list(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path("/api/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summaries_json()))
        .expect(times)
        .mount(server)
        .await;
}

pub async fn connect(server: &MockServer) -> ChatController {
    ChatController::connect(&ClientConfig::new(server.uri()))
        .await
        .expect("mock server url is valid")
}
