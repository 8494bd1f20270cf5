use agentdeck::agent::domain::{AgentConfig, KNOWN_TOOLS};
use agentdeck::config::StoreConfig;
use agentdeck::error::SyncError;
use agentdeck::store::{ConfigStoreClient, HttpConfigStore, ModelCatalog};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn store_for(server: &MockServer) -> HttpConfigStore {
    let config = StoreConfig {
        base_url: format!("{}/", server.uri()),
        ..StoreConfig::default()
    };
    HttpConfigStore::new(&config).unwrap()
}

fn agent_json(id: &str, name: &str, created_at: &str) -> serde_json::Value {
    json!({
        "agent_id": id,
        "name": name,
        "created_at": created_at,
        "role": "Researcher",
        "tools": { "Wikipedia": { "enabled": true, "config": {} } }
    })
}

#[tokio::test]
async fn list_decodes_agents_with_flattened_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/management/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            agent_json("a", "Alpha", "2024-05-01T09:00:00Z"),
            {
                "agent_id": "default",
                "name": "Default Agent",
                "created_at": "2024-04-01T09:00:00Z",
                "is_default": true,
                "role": "Assistant",
                "system_prompt": "You are helpful."
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let agents = store_for(&server).await.list().await.unwrap();
    assert_eq!(agents.len(), 2);
    assert_eq!(agents[0].payload.role, "Researcher");
    assert!(agents[0].payload.tools["Wikipedia"].enabled);
    assert!(!agents[0].is_default);
    assert!(agents[1].is_default);
    assert_eq!(agents[1].payload.system_prompt.as_deref(), Some("You are helpful."));
}

#[tokio::test]
async fn create_posts_the_client_id() {
    let server = MockServer::start().await;
    let agent = AgentConfig::from_template("Scout", chrono::Utc::now());
    let mut confirmed = serde_json::to_value(&agent).unwrap();
    confirmed["name"] = json!("Scout (normalised)");

    Mock::given(method("POST"))
        .and(path("/api/management/agents"))
        .and(body_partial_json(json!({ "agent_id": agent.agent_id, "role": "Assistant" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(confirmed))
        .expect(1)
        .mount(&server)
        .await;

    let created = store_for(&server).await.create(&agent).await.unwrap();
    assert_eq!(created.agent_id, agent.agent_id);
    assert_eq!(created.name, "Scout (normalised)");
    assert_eq!(created.payload.tools.len(), KNOWN_TOOLS.len());
}

#[tokio::test]
async fn status_codes_map_onto_error_kinds() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/management/agents/a"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Role is required"))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/management/agents/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/management/agents/a"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let agent = AgentConfig::from_template("Scout", chrono::Utc::now());

    match store.update("a", &agent).await {
        Err(SyncError::Validation(msg)) => assert!(msg.contains("Role is required")),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(matches!(
        store.update("ghost", &agent).await,
        Err(SyncError::NotFound(_))
    ));
    assert!(matches!(
        store.delete("a").await,
        Err(SyncError::Transport(_))
    ));
}

#[tokio::test]
async fn malformed_body_is_a_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/management/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "agents": [] })))
        .mount(&server)
        .await;

    let err = store_for(&server).await.list().await.unwrap_err();
    assert!(matches!(err, SyncError::Validation(_)));
}

#[tokio::test]
async fn unreachable_store_is_a_transport_error() {
    let config = StoreConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 2,
        ..StoreConfig::default()
    };
    let store = HttpConfigStore::new(&config).unwrap();
    assert!(matches!(
        store.check_feature_support().await,
        Err(SyncError::Transport(_))
    ));
}

#[tokio::test]
async fn capability_and_models_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/management/agents/check_supported_model"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/management/config/models"))
        .and(query_param("provider", "ollama"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!(["llama3:8b", "nomic-embed-text"])),
        )
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    assert!(store.check_feature_support().await.unwrap());
    assert_eq!(
        store.fetch_models("ollama").await.unwrap(),
        vec!["llama3:8b".to_string(), "nomic-embed-text".to_string()]
    );
}
