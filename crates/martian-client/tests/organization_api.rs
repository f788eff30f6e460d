//! Integration tests for OrganizationClient.

use martian_client::{ClientConfig, ClientError, MartianClient};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> MartianClient {
    let config = ClientConfig::new(mock_server.uri(), "org-1", "test-key").with_max_retries(0);
    MartianClient::new(config).expect("failed to create client")
}

#[tokio::test]
async fn test_credit_balance() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/organizations/org-1/credits"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "credits": 41.25 })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let balance = client
        .organization()
        .credit_balance()
        .await
        .expect("balance failed");

    assert_eq!(balance.credits, 41.25);
}

#[tokio::test]
async fn test_balance_requires_valid_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/organizations/org-1/credits"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "organization access denied"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let result = client.organization().credit_balance().await;

    match result {
        Err(ClientError::Auth(message)) => assert_eq!(message, "organization access denied"),
        other => panic!("expected Auth error, got {other:?}"),
    }
}
