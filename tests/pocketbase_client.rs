use std::time::Duration;

use serde_json::{Value, json};
use storefront_api::store::{
    CollectionStore, Filter, ListQuery, PocketBaseStore, Record, Session, Sort, StoreError,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

fn client(server: &MockServer) -> PocketBaseStore {
    PocketBaseStore::new(server.uri(), Duration::from_secs(5)).unwrap()
}

fn items(range: std::ops::Range<usize>) -> Vec<Value> {
    range.map(|i| json!({ "id": format!("p{i}") })).collect()
}

#[tokio::test]
async fn full_list_walks_every_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/collections/productos/records"))
        .and(query_param("page", "1"))
        .and(query_param("perPage", "500"))
        .and(query_param("sort", "-created"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "items": items(0..500) })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/collections/productos/records"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "items": items(500..503) })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server)
        .get_full_list(
            &Session::anonymous(),
            "productos",
            &ListQuery::sorted(Sort::newest_first()),
        )
        .await
        .unwrap();

    assert_eq!(records.len(), 503);
    assert_eq!(records[502]["id"], "p502");
}

#[tokio::test]
async fn full_list_sends_rendered_filter_and_expand() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/collections/pedidos/records"))
        .and(query_param("filter", r#"usuario = "u\"1""#))
        .and(query_param("expand", "usuario"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "items": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let query = ListQuery::default()
        .filter(Filter::eq("usuario", "u\"1"))
        .expand("usuario");
    let records = client(&server)
        .get_full_list(&Session::anonymous(), "pedidos", &query)
        .await
        .unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn session_token_goes_in_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/collections/users/records/u1"))
        .and(header("Authorization", "tok-123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "u1" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let record = client(&server)
        .get_one(&Session::with_token("tok-123"), "users", "u1", None)
        .await
        .unwrap();

    assert_eq!(record["id"], "u1");
}

#[tokio::test]
async fn update_uses_patch_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/collections/productos/records/p1"))
        .and(body_json(json!({ "stock": 3 })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "p1", "stock": 3 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut body = Record::new();
    body.insert("stock".into(), json!(3));
    let record = client(&server)
        .update(&Session::with_token("t"), "productos", "p1", body)
        .await
        .unwrap();

    assert_eq!(record["stock"], 3);
}

#[tokio::test]
async fn status_codes_map_to_store_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/collections/productos/records/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 404, "message": "The requested resource wasn't found.", "data": {}
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/collections/productos/records/p1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": 403, "message": "Only admins can perform this action.", "data": {}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/collections/users/records"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 400,
            "message": "Failed to create record.",
            "data": {
                "email": { "code": "validation_not_unique", "message": "Value must be unique." }
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/collections/categorias/records"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = client(&server);
    let session = Session::anonymous();

    let err = store.get_one(&session, "productos", "missing", None).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));

    let err = store.delete(&session, "productos", "p1").await.unwrap_err();
    assert!(matches!(err, StoreError::Forbidden));

    let err = store.create(&session, "users", Record::new()).await.unwrap_err();
    match err {
        StoreError::Rejected { message, details } => {
            assert_eq!(message, "Failed to create record.");
            assert_eq!(details["email"]["code"], "validation_not_unique");
        }
        other => panic!("expected rejection, got {other:?}"),
    }

    let err = store
        .get_full_list(&session, "categorias", &ListQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}

#[tokio::test]
async fn auth_refresh_returns_new_token_and_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/collections/users/auth-refresh"))
        .and(header("Authorization", "old-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "new-token",
            "record": { "id": "u1", "rol": "admin" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = client(&server)
        .auth_refresh(&Session::with_token("old-token"))
        .await
        .unwrap();

    assert_eq!(auth.token, "new-token");
    assert_eq!(auth.record["rol"], "admin");
}

#[tokio::test]
async fn auth_refresh_without_token_never_calls_store() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .auth_refresh(&Session::anonymous())
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Forbidden));
}

#[tokio::test]
async fn unreachable_store_is_a_transport_error() {
    let store = PocketBaseStore::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let err = store
        .get_one(&Session::anonymous(), "productos", "p1", None)
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Transport(_)));
}
