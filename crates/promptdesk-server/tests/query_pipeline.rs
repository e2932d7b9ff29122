//! Integration tests for the query → completions API → chat history pipeline.

mod common;

use axum::http::StatusCode;
use common::{app_for, create_test_app, get, post_json, send, test_config};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn api_base(server: &MockServer) -> String {
    format!("{}/api/v1", server.base_url())
}

fn query_body(chat_id: &str, prompt: &str) -> serde_json::Value {
    json!({
        "model": "m",
        "prompt": prompt,
        "chat_id": chat_id,
        "project_id": "default"
    })
}

#[tokio::test]
async fn test_query_success_records_turn() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/chat/completions")
            .header("authorization", "Bearer test-key")
            .json_body_includes(
                json!({
                    "model": "m",
                    "messages": [{"role": "user", "content": "hi"}],
                    "top_k": 0
                })
                .to_string(),
            );
        then.status(200)
            .json_body(json!({"choices": [{"message": {"content": "hello"}}]}));
    });

    let (app, state, temp) = create_test_app(&api_base(&server));

    let (status, body) = post_json(&app, "/query", &query_body("c1", "hi")).await;
    mock.assert();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "hello"}));

    let (_, history) = get(&app, "/history/c1").await;
    assert_eq!(
        history,
        json!([{
            "prompt": "hi",
            "response": "hello",
            "model": "m",
            "temperature": 0.7,
            "top_p": 1.0,
            "top_k": 0,
            "frequency_penalty": 0.0
        }])
    );

    assert!(temp.path().join("projects/default/chat_c1.json").exists());
    assert_eq!(state.history.get("c1").len(), 1);

    let (_, chats) = get(&app, "/projects/default/chats").await;
    assert_eq!(chats["c1"][0]["response"], "hello");
    let (_, files) = get(&app, "/projects/default/chats/files").await;
    assert_eq!(files, json!(["chat_c1.json"]));
}

#[tokio::test]
async fn test_upstream_error_leaves_history_unchanged() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/v1/chat/completions");
        then.status(500).body("internal error: secret details");
    });

    let (app, state, _temp) = create_test_app(&api_base(&server));

    let (status, body) = post_json(&app, "/query", &query_body("c1", "hi")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to get response from completions API");
    assert!(!body.to_string().contains("secret details"));

    let (_, history) = get(&app, "/history/c1").await;
    assert_eq!(history, json!([]));
    assert!(state.history.is_empty());
}

#[tokio::test]
async fn test_malformed_upstream_response() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/v1/chat/completions");
        then.status(200).json_body(json!({"id": "gen-1", "choices": []}));
    });

    let (app, state, _temp) = create_test_app(&api_base(&server));

    let (status, body) = post_json(&app, "/query", &query_body("c1", "hi")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());
    assert!(state.history.get("c1").is_empty());
}

#[tokio::test]
async fn test_query_unknown_project_skips_upstream() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/v1/chat/completions");
        then.status(200)
            .json_body(json!({"choices": [{"message": {"content": "hello"}}]}));
    });

    let (app, _state, _temp) = create_test_app(&api_base(&server));

    let mut body = query_body("c1", "hi");
    body["project_id"] = json!("ghost");
    let (status, _) = post_json(&app, "/query", &body).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    mock.assert_calls(0);
}

#[tokio::test]
async fn test_query_rejects_malformed_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/v1/chat/completions");
        then.status(200)
            .json_body(json!({"choices": [{"message": {"content": "hello"}}]}));
    });
    let (app, _state, _temp) = create_test_app(&api_base(&server));

    // Missing chat_id / project_id
    let (status, body) = post_json(&app, "/query", &json!({"model": "m", "prompt": "hi"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("chat_id"));

    // Wrong type
    let mut body = query_body("c1", "hi");
    body["top_k"] = json!("many");
    let (status, body) = post_json(&app, "/query", &body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());

    // Not JSON at all
    let (status, body) = send(
        &app,
        "POST",
        "/query",
        Some("application/json"),
        "{\"model\": ",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // Wrong content type
    let (status, body) = send(&app, "POST", "/query", Some("text/plain"), "hi").await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["error"].is_string());

    mock.assert_calls(0);
}

#[tokio::test]
async fn test_history_survives_restart() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/v1/chat/completions");
        then.status(200)
            .json_body(json!({"choices": [{"message": {"content": "ok"}}]}));
    });

    let temp = TempDir::new().unwrap();
    let config = test_config(&temp, &api_base(&server));

    {
        let (app, _state) = app_for(config.clone());
        for prompt in ["one", "two", "three"] {
            let (status, _) = post_json(&app, "/query", &query_body("c1", prompt)).await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    let (app, _state) = app_for(config);
    let (_, history) = get(&app, "/history/c1").await;
    let prompts: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|turn| turn["prompt"].as_str().unwrap())
        .collect();
    assert_eq!(prompts, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn test_legacy_chat_file_migrated_on_startup() {
    let temp = TempDir::new().unwrap();
    let config = test_config(&temp, "http://127.0.0.1:9/api/v1");
    std::fs::write(
        temp.path().join("chat_old.json"),
        json!([{"prompt": "p", "response": "r", "model": "m"}]).to_string(),
    )
    .unwrap();

    let (app, _state) = app_for(config);

    let (_, history) = get(&app, "/history/old").await;
    assert_eq!(history[0]["response"], "r");
    assert!(temp.path().join("projects/default/chat_old.json").exists());
    assert!(!temp.path().join("chat_old.json").exists());
}

#[tokio::test]
async fn test_delete_project_evicts_chats() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/v1/chat/completions");
        then.status(200)
            .json_body(json!({"choices": [{"message": {"content": "ok"}}]}));
    });

    let (app, state, temp) = create_test_app(&api_base(&server));
    common::send(&app, "POST", "/projects/work", None, axum::body::Body::empty()).await;

    let mut body = query_body("w1", "hi");
    body["project_id"] = json!("work");
    post_json(&app, "/query", &body).await;
    assert_eq!(state.history.get("w1").len(), 1);

    common::delete(&app, "/projects/work").await;
    assert!(state.history.get("w1").is_empty());

    state.history.flush_all();
    assert!(!temp.path().join("projects/work").exists());
}

#[tokio::test]
async fn test_models_proxy() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/models");
        then.status(200)
            .json_body(json!({"data": [{"id": "meta-llama/llama-3.2-3b-instruct:free"}]}));
    });

    let (app, _state, _temp) = create_test_app(&api_base(&server));

    let (status, body) = get(&app, "/models").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": "meta-llama/llama-3.2-3b-instruct:free"}]));
}
