use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use storefront_api::{
    routes::create_app,
    state::AppState,
    store::{CATEGORIES, MemoryStore, ORDERS, PRODUCTS, Record, USERS},
};
use tower::ServiceExt;

struct TestApp {
    store: Arc<MemoryStore>,
    app: Router,
    admin_token: String,
    client_token: String,
    client_id: String,
    other_id: String,
}

fn record(value: Value) -> Record {
    value.as_object().cloned().unwrap_or_default()
}

fn token_for(user_id: &str, exp: i64) -> String {
    encode(
        &Header::default(),
        &json!({ "id": user_id, "type": "auth", "exp": exp }),
        &EncodingKey::from_secret(b"store-secret"),
    )
    .unwrap()
}

fn fresh_token(user_id: &str) -> String {
    token_for(user_id, chrono::Utc::now().timestamp() + 3600)
}

fn setup() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let admin_id = seed_user(&store, "admin@example.com", "Ada", "admin");
    let client_id = seed_user(&store, "cliente@example.com", "Carla", "cliente");
    let other_id = seed_user(&store, "otro@example.com", "Otto", "cliente");

    let admin_token = fresh_token(&admin_id);
    let client_token = fresh_token(&client_id);
    store.register_session(&admin_token, &admin_id);
    store.register_session(&client_token, &client_id);

    let app = create_app(AppState::new(store.clone()));
    TestApp {
        store,
        app,
        admin_token,
        client_token,
        client_id,
        other_id,
    }
}

fn seed_user(store: &MemoryStore, email: &str, name: &str, role: &str) -> String {
    let user = store.insert(
        USERS,
        record(json!({ "email": email, "nombre": name, "rol": role })),
    );
    user["id"].as_str().unwrap().to_string()
}

fn seed_product(store: &MemoryStore, name: &str, category: &str, price: i64) -> String {
    let product = store.insert(
        PRODUCTS,
        record(json!({
            "nombre": name,
            "descripcion": format!("{name} fresco"),
            "precio": price,
            "stock": 10,
            "categoria": category,
            "unidad": "kg",
            "disponible": true
        })),
    );
    product["id"].as_str().unwrap().to_string()
}

fn seed_category(store: &MemoryStore, name: &str) -> String {
    let category = store.insert(
        CATEGORIES,
        record(json!({ "nombre": name, "activa": true })),
    );
    category["id"].as_str().unwrap().to_string()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("theme=dark; pb_auth={token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, request(Method::GET, uri, token, None)).await
}

async fn delete(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, request(Method::DELETE, uri, token, None)).await
}

#[tokio::test]
async fn lists_products_newest_first_and_filters() {
    let t = setup();
    let fruit = seed_category(&t.store, "Frutas");
    let apple = seed_product(&t.store, "Manzana", &fruit, 1990);
    let banana = seed_product(&t.store, "Platano", &fruit, 1290);
    seed_product(&t.store, "Lechuga", "otra", 890);

    let (status, body) = get(&t.app, "/api/productos", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["nombre"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Lechuga", "Platano", "Manzana"]);

    let uri = format!("/api/productos?categoria={fruit}&sort_by=precio&sort_order=asc");
    let (_, body) = get(&t.app, &uri, None).await;
    let prices: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["precio"].as_i64().unwrap())
        .collect();
    assert_eq!(prices, [1290, 1990]);

    let uri = format!("/api/productos?ids={apple},missing,{banana}");
    let (_, body) = get(&t.app, &uri, None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = get(&t.app, "/api/productos?ids=", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn product_writes_require_admin() {
    let t = setup();
    let id = seed_product(&t.store, "Manzana", "c1", 1990);
    let uri = format!("/api/productos/{id}");
    let patch = json!({ "disponible": false, "stock": 3 });

    let (status, body) = send(
        &t.app,
        request(Method::PUT, &uri, None, Some(patch.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");

    let (status, _) = send(
        &t.app,
        request(
            Method::PUT,
            &uri,
            Some(&t.client_token),
            Some(patch.clone()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &t.app,
        request(Method::PUT, &uri, Some(&t.admin_token), Some(patch)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["activo"], false);
    assert_eq!(body["stock"], 3);
    assert_eq!(body["nombre"], "Manzana");

    let (status, body) = delete(&t.app, &uri, Some(&t.admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = get(&t.app, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_product_validates_and_applies_defaults() {
    let t = setup();

    let (status, body) = send(
        &t.app,
        request(
            Method::POST,
            "/api/productos",
            Some(&t.admin_token),
            Some(json!({ "nombre": "Pera", "precio": 990 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("descripcion"));

    let (status, body) = send(
        &t.app,
        request(
            Method::POST,
            "/api/productos",
            Some(&t.admin_token),
            Some(json!({
                "nombre": "Pera",
                "descripcion": "Pera de agua",
                "categoria": "c1",
                "precio": 0
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["precio"], 0);
    assert_eq!(body["stock"], 0);
    assert_eq!(body["unidad"], "kg");
    assert_eq!(body["activo"], true);
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let t = setup();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/productos")
        .header(header::COOKIE, format!("pb_auth={}", t.admin_token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"nombre\": "))
        .unwrap();

    let (status, body) = send(&t.app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn store_outage_is_an_internal_error() {
    let t = setup();
    t.store.set_offline(true);

    let (status, body) = get(&t.app, "/api/categorias", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Store unavailable");

    let (status, _) = get(&t.app, "/api/auth/me", Some(&t.admin_token)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn expired_or_unknown_sessions_are_forbidden() {
    let t = setup();
    let expired = token_for(&t.client_id, chrono::Utc::now().timestamp() - 60);
    t.store.register_session(&expired, &t.client_id);
    let unknown = fresh_token("nobody");

    for token in [expired.as_str(), unknown.as_str(), "not-a-jwt"] {
        let (status, _) = get(&t.app, "/api/auth/me", Some(token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let (status, body) = get(&t.app, "/api/auth/me", Some(&t.client_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "cliente@example.com");
    assert_eq!(body["rol"], "cliente");
}

#[tokio::test]
async fn cookie_may_carry_a_json_payload() {
    let t = setup();
    let payload = json!({ "token": t.admin_token, "model": {} }).to_string();
    let cookie = format!("pb_auth={}", urlencoding::encode(&payload));
    let req = Request::builder()
        .uri("/api/auth/me")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&t.app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rol"], "admin");
}

#[tokio::test]
async fn category_counts_include_empty_categories() {
    let t = setup();
    let fruit = seed_category(&t.store, "Frutas");
    let greens = seed_category(&t.store, "Verduras");
    seed_product(&t.store, "Manzana", &fruit, 1990);
    seed_product(&t.store, "Platano", &fruit, 1290);
    seed_product(&t.store, "Huérfano", "", 100);

    let (status, body) = get(&t.app, "/api/categorias/conteos", None).await;
    assert_eq!(status, StatusCode::OK);
    let counts: Vec<(String, u64)> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            (
                c["id"].as_str().unwrap().to_string(),
                c["productos"].as_u64().unwrap(),
            )
        })
        .collect();
    assert!(counts.contains(&(fruit, 2)));
    assert!(counts.contains(&(greens, 0)));
}

#[tokio::test]
async fn category_create_requires_name() {
    let t = setup();

    let (status, _) = send(
        &t.app,
        request(
            Method::POST,
            "/api/categorias",
            None,
            Some(json!({ "nombre": "  " })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &t.app,
        request(
            Method::POST,
            "/api/categorias",
            Some(&t.admin_token),
            Some(json!({ "nombre": "Lacteos" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["activa"], true);
}

#[tokio::test]
async fn orders_are_scoped_to_their_owner() {
    let t = setup();
    let items = json!([{ "productoId": "p1", "cantidad": 3, "precio": 1990 }]);

    let (status, order) = send(
        &t.app,
        request(
            Method::POST,
            "/api/ordenes",
            Some(&t.client_token),
            Some(json!({
                "items": items,
                "total": 5970,
                "metodoPago": "transferencia",
                "direccionEnvio": { "calle": "Los Aromos 12", "ciudad": "Talca" }
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["usuarioId"], t.client_id.as_str());
    assert_eq!(order["estado"], "pendiente");
    assert_eq!(order["subtotal"], 5970);
    assert_eq!(order["envio"], 0);
    assert_eq!(order["direccionEnvio"]["ciudad"], "Talca");
    let order_id = order["id"].as_str().unwrap().to_string();

    // Ordering on someone else's behalf.
    let (status, _) = send(
        &t.app,
        request(
            Method::POST,
            "/api/ordenes",
            Some(&t.client_token),
            Some(json!({
                "usuarioId": t.other_id,
                "items": items,
                "total": 5970,
                "metodoPago": "efectivo"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let own = format!("/api/ordenes/usuario/{}", t.client_id);
    let (status, body) = get(&t.app, &own, Some(&t.client_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let theirs = format!("/api/ordenes/usuario/{}", t.other_id);
    let (status, _) = get(&t.app, &theirs, Some(&t.client_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/api/ordenes/{order_id}");
    let (status, body) = get(&t.app, &uri, Some(&t.client_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usuario"]["email"], "cliente@example.com");

    let (status, _) = get(&t.app, "/api/ordenes", Some(&t.client_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = get(&t.app, "/api/ordenes", Some(&t.admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["usuario"]["nombre"], "Carla");
}

#[tokio::test]
async fn someone_elses_order_is_forbidden() {
    let t = setup();
    let order = t.store.insert(
        ORDERS,
        record(json!({
            "usuario": t.other_id,
            "productos": [],
            "total": 100,
            "estado": "pendiente",
            "direccion_envio": "{\"calle\":\"Sur 1\"}"
        })),
    );
    let uri = format!("/api/ordenes/{}", order["id"].as_str().unwrap());

    let (status, _) = get(&t.app, &uri, Some(&t.client_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = get(&t.app, &uri, Some(&t.admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["direccionEnvio"]["calle"], "Sur 1");
}

#[tokio::test]
async fn order_validation_and_status_updates() {
    let t = setup();

    let (status, _) = send(
        &t.app,
        request(
            Method::POST,
            "/api/ordenes",
            Some(&t.client_token),
            Some(json!({ "items": [], "total": 0, "metodoPago": "efectivo" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, order) = send(
        &t.app,
        request(
            Method::POST,
            "/api/ordenes",
            Some(&t.admin_token),
            Some(json!({
                "usuarioId": t.client_id,
                "items": [{ "productoId": "p1", "cantidad": 1 }],
                "total": 1990,
                "metodoPago": "efectivo"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/ordenes/{}", order["id"].as_str().unwrap());

    let (status, _) = send(
        &t.app,
        request(
            Method::PUT,
            &uri,
            Some(&t.client_token),
            Some(json!({ "estado": "enviado" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &t.app,
        request(
            Method::PUT,
            &uri,
            Some(&t.admin_token),
            Some(json!({ "estado": "perdido" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &t.app,
        request(
            Method::PUT,
            &uri,
            Some(&t.admin_token),
            Some(json!({ "estado": "enviado" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estado"], "enviado");

    let (status, _) = delete(&t.app, &uri, Some(&t.admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&t.app, &uri, Some(&t.admin_token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_admin_and_duplicate_emails() {
    let t = setup();

    let (status, _) = get(&t.app, "/api/usuarios", Some(&t.client_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &t.app,
        request(
            Method::POST,
            "/api/usuarios",
            Some(&t.admin_token),
            Some(json!({
                "email": "nuevo@example.com",
                "password": "secreto123",
                "passwordConfirm": "secreto123",
                "nombre": "Nora"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rol"], "cliente");
    assert!(body.get("password").is_none());

    let (status, body) = send(
        &t.app,
        request(
            Method::POST,
            "/api/usuarios",
            Some(&t.admin_token),
            Some(json!({ "email": "nuevo@example.com", "password": "otro12345" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["email"]["code"], "validation_not_unique");

    let (status, body) = get(&t.app, "/api/usuarios", Some(&t.admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn unknown_route_returns_not_found_body() {
    let t = setup();
    let (status, body) = get(&t.app, "/api/nada", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["details"]["path"], "/api/nada");
}
