use serde_json::json;
use vela_state::{BackendConfig, RemoteBackendConfig, StateError, StateReference};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WORKSPACE_ID: &str = "ws-4fKQAV3QdJmsVKNb";

fn remote_config(server: &MockServer) -> BackendConfig {
    BackendConfig::Remote(
        RemoteBackendConfig::new("acme", "networking", "tfe-test-token")
            .unwrap()
            .with_hostname(server.uri()),
    )
}

async fn mount_workspace_lookup(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/acme/workspaces/networking"))
        .and(header("authorization", "Bearer tfe-test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": WORKSPACE_ID,
                "type": "workspaces",
                "attributes": {"name": "networking"}
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_remote_backend_reads_outputs() {
    let mock_server = MockServer::start().await;
    mount_workspace_lookup(&mock_server).await;

    let download_url = format!("{}/state-archive/v4-state", mock_server.uri());
    Mock::given(method("GET"))
        .and(path(format!(
            "/api/v2/workspaces/{}/current-state-version",
            WORKSPACE_ID
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "sv-12345",
                "type": "state-versions",
                "attributes": {"hosted-state-download-url": download_url}
            }
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/state-archive/v4-state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": 4,
            "terraform_version": "1.5.0",
            "serial": 12,
            "lineage": "remote-lineage",
            "outputs": {
                "vpc_id": {"value": "vpc-remote", "type": "string"},
                "api_key": {"value": "secret-value", "type": "string", "sensitive": true}
            }
        })))
        .mount(&mock_server)
        .await;

    let reference = StateReference::open(remote_config(&mock_server)).await.unwrap();

    let output = reference.get_output("vpc_id").await.unwrap();
    assert_eq!(output.value.as_str(), Some("vpc-remote"));

    let output = reference.get_output("api_key").await.unwrap();
    assert!(output.sensitive);

    let outputs = reference.outputs().await.unwrap();
    assert_eq!(outputs.len(), 2);
}

#[tokio::test]
async fn test_rejected_token_is_auth_error_and_terminal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/acme/workspaces/networking"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{"status": "401", "title": "unauthorized"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let reference = StateReference::new(remote_config(&mock_server));

    assert!(matches!(
        reference.get_output("vpc_id").await,
        Err(StateError::Auth(_))
    ));

    // The failure is stored; later reads re-surface it without another
    // request (the mock's expect(1) verifies no second lookup happens).
    assert!(matches!(
        reference.get_output("vpc_id").await,
        Err(StateError::Auth(_))
    ));
    assert!(matches!(
        reference.outputs().await,
        Err(StateError::Auth(_))
    ));
}

#[tokio::test]
async fn test_unknown_workspace_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/acme/workspaces/networking"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"status": "404", "title": "not found"}]
        })))
        .mount(&mock_server)
        .await;

    let result = StateReference::open(remote_config(&mock_server)).await;

    match result {
        Err(StateError::NotFound(what)) => assert!(what.contains("acme/networking")),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_workspace_without_state_is_not_found() {
    let mock_server = MockServer::start().await;
    mount_workspace_lookup(&mock_server).await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/api/v2/workspaces/{}/current-state-version",
            WORKSPACE_ID
        )))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"status": "404", "title": "not found"}]
        })))
        .mount(&mock_server)
        .await;

    let result = StateReference::open(remote_config(&mock_server)).await;

    match result {
        Err(StateError::NotFound(what)) => assert!(what.contains("current state version")),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_deadline_surfaces_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/acme/workspaces/networking"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(std::time::Duration::from_secs(5))
                .set_body_json(json!({"data": {"id": WORKSPACE_ID}})),
        )
        .mount(&mock_server)
        .await;

    let reference = StateReference::new(remote_config(&mock_server))
        .with_timeout(std::time::Duration::from_millis(100));

    assert!(matches!(
        reference.load().await,
        Err(StateError::Timeout(_))
    ));
}

#[tokio::test]
async fn test_unsupported_state_version_from_remote() {
    let mock_server = MockServer::start().await;
    mount_workspace_lookup(&mock_server).await;

    let download_url = format!("{}/state-archive/v99-state", mock_server.uri());
    Mock::given(method("GET"))
        .and(path(format!(
            "/api/v2/workspaces/{}/current-state-version",
            WORKSPACE_ID
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"attributes": {"hosted-state-download-url": download_url}}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/state-archive/v99-state"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"version": 99, "outputs": {}})),
        )
        .mount(&mock_server)
        .await;

    let result = StateReference::open(remote_config(&mock_server)).await;

    match result {
        Err(StateError::UnsupportedVersion { found, supported }) => {
            assert_eq!(found, 99);
            assert!(supported.contains(&4));
        }
        other => panic!("Expected UnsupportedVersion, got {:?}", other),
    }
}
