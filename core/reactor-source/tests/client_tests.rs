use reactor_source::{
    PageRequest, ReactorClient, ReactorConfig, RemoteSource, SourceError, collect_all,
};
use pretty_assertions::assert_eq;
use reactor_types::Entity;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_config(server: &MockServer) -> ReactorConfig {
    ReactorConfig {
        base_url: server.uri(),
        access_token: "token_abc".to_string(),
        api_key: "client_123".to_string(),
        org_id: Some("ORG@AdobeOrg".to_string()),
        ..Default::default()
    }
}

fn entity_json(id: &str, entity_type: &str, name: &str) -> serde_json::Value {
    json!({"id": id, "type": entity_type, "attributes": {"name": name}, "relationships": {}})
}

// ── Config ──────────────────────────────────────────────────────

#[test]
fn reactor_config_default() {
    let cfg = ReactorConfig::default();
    assert_eq!(cfg.base_url, "https://reactor.adobe.io");
    assert!(cfg.access_token.is_empty());
    assert!(cfg.api_key.is_empty());
    assert_eq!(cfg.org_id, None);
    assert_eq!(cfg.timeout_secs, 60);
}

#[test]
fn client_requires_access_token() {
    let result = ReactorClient::new(ReactorConfig::default());
    assert!(matches!(result, Err(SourceError::Config(_))));
}

#[test]
fn client_requires_base_url() {
    let cfg = ReactorConfig {
        base_url: " ".to_string(),
        access_token: "t".to_string(),
        ..Default::default()
    };
    assert!(matches!(ReactorClient::new(cfg), Err(SourceError::Config(_))));
}

#[test]
fn client_source_name() {
    let cfg = ReactorConfig {
        access_token: "t".to_string(),
        ..Default::default()
    };
    let client = ReactorClient::new(cfg).unwrap();
    assert_eq!(client.source_name(), "Reactor API");
    assert_eq!(client.base_url(), "https://reactor.adobe.io");
}

// ── Single resources ────────────────────────────────────────────

#[tokio::test]
async fn get_property_sends_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/properties/PR1"))
        .and(header("authorization", "Bearer token_abc"))
        .and(header("x-api-key", "client_123"))
        .and(header("x-gw-ims-org-id", "ORG@AdobeOrg"))
        .and(header("accept", "application/vnd.api+json;revision=1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": entity_json("PR1", "properties", "Main Site")})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ReactorClient::new(mock_config(&server)).unwrap();
    let property = client.get_property("PR1").await.unwrap();
    assert_eq!(
        property,
        Entity::new("PR1", "properties").with_attribute("name", "Main Site")
    );
    assert_eq!(property.name(), Some("Main Site"));
}

#[tokio::test]
async fn get_property_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/properties/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such property"))
        .mount(&server)
        .await;

    let client = ReactorClient::new(mock_config(&server)).unwrap();
    let err = client.get_property("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn server_error_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/properties/PR1/environments"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = ReactorClient::new(mock_config(&server)).unwrap();
    let err = client
        .list_environments("PR1", PageRequest::default())
        .await
        .unwrap_err();
    match err {
        SourceError::Api { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn undecodable_body_maps_to_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/extension_packages/EP1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = ReactorClient::new(mock_config(&server)).unwrap();
    let err = client.get_extension_package("EP1").await.unwrap_err();
    assert!(matches!(err, SourceError::Decode(_)));
}

#[tokio::test]
async fn get_extension_package_decodes_descriptors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/extension_packages/EP1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "EP1",
                "type": "extension_packages",
                "attributes": {
                    "name": "core",
                    "actions": [{"id": "core::actions::custom-code",
                                 "transforms": [{"type": "customCode", "propertyPath": "source"}]}]
                }
            }
        })))
        .mount(&server)
        .await;

    let client = ReactorClient::new(mock_config(&server)).unwrap();
    let package = client.get_extension_package("EP1").await.unwrap();
    assert_eq!(package.attributes.name.as_deref(), Some("core"));
    assert_eq!(package.attributes.actions.unwrap().len(), 1);
}

// ── Paged collections ───────────────────────────────────────────

#[tokio::test]
async fn list_sends_page_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rules/RL1/rule_components"))
        .and(query_param("page[size]", "25"))
        .and(query_param("page[number]", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [entity_json("RC1", "rule_components", "Custom Code")],
            "meta": {"pagination": {"current_page": 1, "next_page": null, "total_pages": 1}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ReactorClient::new(mock_config(&server)).unwrap();
    let page = client
        .list_rule_components_for_rule("RL1", PageRequest::first(25))
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.next_request(PageRequest::first(25)), None);
}

#[tokio::test]
async fn collect_all_follows_next_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/properties/PR1/data_elements"))
        .and(query_param("page[number]", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [entity_json("DE1", "data_elements", "a"), entity_json("DE2", "data_elements", "b")],
            "meta": {"pagination": {"current_page": 1, "next_page": 2, "total_pages": 2}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/properties/PR1/data_elements"))
        .and(query_param("page[number]", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [entity_json("DE3", "data_elements", "c")],
            "meta": {"pagination": {"current_page": 2, "next_page": null, "total_pages": 2}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ReactorClient::new(mock_config(&server)).unwrap();
    let all = collect_all(2, |page| client.list_data_elements("PR1", page))
        .await
        .unwrap();
    let ids: Vec<_> = all.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["DE1", "DE2", "DE3"]);
}

#[tokio::test]
async fn list_rules_for_rule_component_route() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rule_components/RC1/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [entity_json("RL1", "rules", "Page Load"), entity_json("RL2", "rules", "Click")]
        })))
        .mount(&server)
        .await;

    let client = ReactorClient::new(mock_config(&server)).unwrap();
    let rules = collect_all(100, |page| client.list_rules_for_rule_component("RC1", page))
        .await
        .unwrap();
    assert_eq!(rules.len(), 2);
}
