//! Integration tests for JudgesClient.
//!
//! Uses wiremock for HTTP mocking. Covers payload shapes, status mapping,
//! pinned-version caching, local validation, and retry behavior.

use martian_client::{ClientConfig, ClientError, MartianClient};
use martian_core::{ChatCompletion, CompletionRequest, JudgeSpec, RubricJudgeSpec};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> MartianClient {
    let config = ClientConfig::new(mock_server.uri(), "org-1", "test-key").with_max_retries(0);
    MartianClient::new(config).expect("failed to create client")
}

fn rubric_spec() -> JudgeSpec {
    JudgeSpec::rubric(RubricJudgeSpec::new(
        "Score helpfulness from 1 to 5.",
        "openai/openai/gpt-4o",
        1.0,
        5.0,
    ))
}

fn judge_json(id: &str, version: u32) -> serde_json::Value {
    json!({
        "name": format!("organizations/org-1/judges/{id}"),
        "version": version,
        "description": "test judge",
        "createTime": "2025-03-01T12:00:00Z",
        "judgeSpec": { "judgeSpec": { "model_type": "rubric_judge" } }
    })
}

fn completion(content: &str) -> ChatCompletion {
    serde_json::from_value(json!({
        "id": "cmpl-1",
        "model": "openai/openai/gpt-4o-mini",
        "created": 1700000000,
        "choices": [
            { "index": 0, "finish_reason": "stop",
              "message": { "role": "assistant", "content": content } }
        ]
    }))
    .unwrap()
}

#[tokio::test]
async fn test_create_judge_sends_wrapped_spec() {
    let mock_server = MockServer::start().await;

    // Pre-create existence check misses.
    Mock::given(method("GET"))
        .and(path("/v1/organizations/org-1/judges/my-judge"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/organizations/org-1/judges"))
        .and(query_param("judgeId", "my-judge"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "judgeSpec": { "judgeSpec": { "model_type": "rubric_judge", "min_score": 1.0 } },
            "description": "my judge"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(judge_json("my-judge", 1)))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let judge = client
        .judges()
        .create("my-judge", &rubric_spec(), Some("my judge"))
        .await
        .expect("create failed");

    assert_eq!(judge.id(), "my-judge");
    assert_eq!(judge.version, 1);
}

#[tokio::test]
async fn test_create_existing_judge_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/organizations/org-1/judges/taken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(judge_json("taken", 1)))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let result = client.judges().create("taken", &rubric_spec(), None).await;

    assert!(matches!(result, Err(ClientError::AlreadyExists(_))));
}

#[tokio::test]
async fn test_create_invalid_id_fails_before_any_request() {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    let result = client
        .judges()
        .create("Not A Valid Id", &rubric_spec(), None)
        .await;
    assert!(matches!(result, Err(ClientError::Id(_))));

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_invalid_spec_fails_before_any_request() {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    let bad_spec = JudgeSpec::rubric(RubricJudgeSpec::new("r", "m", 5.0, 1.0));
    let result = client.judges().create("ok-id", &bad_spec, None).await;
    assert!(matches!(result, Err(ClientError::Spec(_))));

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_judges() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/organizations/org-1/judges"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "judges": [judge_json("a", 1), judge_json("b", 3)]
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let judges = client.judges().list().await.expect("list failed");

    assert_eq!(judges.len(), 2);
    assert_eq!(judges[1].id(), "b");
    assert_eq!(judges[1].version, 3);
}

#[tokio::test]
async fn test_get_missing_judge_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/organizations/org-1/judges/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let result = client.judges().get("ghost", None).await;

    assert!(matches!(result, Err(ClientError::NotFound(_))));
}

#[tokio::test]
async fn test_pinned_version_get_hits_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/organizations/org-1/judges/cached"))
        .and(query_param("version", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(judge_json("cached", 2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let first = client.judges().get("cached", Some(2)).await.unwrap();
    let second = client.judges().get("cached", Some(2)).await.unwrap();

    assert_eq!(first, second);
    // The .expect(1) on the mock verifies the second get never hit the wire.
}

#[tokio::test]
async fn test_latest_get_always_refetches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/organizations/org-1/judges/live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(judge_json("live", 4)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    client.judges().get("live", None).await.unwrap();
    client.judges().get("live", None).await.unwrap();
}

#[tokio::test]
async fn test_update_judge_bumps_version() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/organizations/org-1/judges/my-judge"))
        .and(body_partial_json(json!({
            "judgeSpec": { "judgeSpec": { "model_type": "rubric_judge" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(judge_json("my-judge", 2)))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let judge = client
        .judges()
        .update("my-judge", &rubric_spec(), None)
        .await
        .expect("update failed");

    assert_eq!(judge.version, 2);
}

#[tokio::test]
async fn test_evaluate_spec_records_usage() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/organizations/org-1/judges:evaluate"))
        .and(body_partial_json(json!({
            "judgeSpec": { "model_type": "rubric_judge" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "score": 4.0,
            "reason": "helpful and correct",
            "cost": 0.0012
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let evaluation = client
        .judges()
        .evaluate_spec(
            &rubric_spec(),
            &CompletionRequest::user("What is the capital of France?"),
            &completion("Paris"),
        )
        .await
        .expect("evaluate failed");

    assert_eq!(evaluation.score, 4.0);
    assert!(evaluation.passes(4.0));

    let usage = client.usage();
    assert_eq!(usage.evaluations, 1);
    assert!((usage.evaluation_cost - 0.0012).abs() < 1e-12);
}

#[tokio::test]
async fn test_evaluate_saved_judge_pins_version() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/organizations/org-1/judges:evaluate"))
        .and(body_partial_json(json!({
            "judge": "organizations/org-1/judges/my-judge",
            "judgeVersion": 3
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "score": 1.0, "reason": "exact match" })),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let judge: martian_core::Judge = serde_json::from_value(judge_json("my-judge", 3)).unwrap();
    let evaluation = client
        .judges()
        .evaluate(&judge, &CompletionRequest::user("q"), &completion("Paris"))
        .await
        .expect("evaluate failed");

    assert_eq!(evaluation.score, 1.0);
    assert_eq!(evaluation.cost, None);
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/organizations/org-1/judges"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "invalid API key" }
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let result = client.judges().list().await;

    match result {
        Err(ClientError::Auth(message)) => assert_eq!(message, "invalid API key"),
        other => panic!("expected Auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_retries_transient_server_error() {
    let mock_server = MockServer::start().await;

    // First attempt fails with a 500; the retry succeeds.
    Mock::given(method("GET"))
        .and(path("/v1/organizations/org-1/judges"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/organizations/org-1/judges"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "judges": [] })))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new(mock_server.uri(), "org-1", "test-key").with_max_retries(2);
    let client = MartianClient::new(config).unwrap();

    let judges = client.judges().list().await.expect("retry should succeed");
    assert!(judges.is_empty());
}

#[tokio::test]
async fn test_rate_limit_surfaces_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/organizations/org-1/judges"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let result = client.judges().list().await;

    match result {
        Err(ClientError::RateLimited { retry_after }) => {
            assert_eq!(retry_after, Some(std::time::Duration::from_secs(7)));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}
