use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::Product,
    response::{ErrorBody, SuccessBody},
    routes::params::{AppJson, ProductQuery},
    services::product_service,
    state::AppState,
    store::Session,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/api/productos",
    params(ProductQuery),
    responses(
        (status = 200, description = "List products", body = Vec<Product>),
        (status = 500, description = "Store unavailable", body = ErrorBody),
    ),
    tag = "Productos"
)]
pub async fn list_products(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let store = state.store.as_ref();
    let products = if let Some(ids) = query.id_list() {
        product_service::list_products_by_ids(store, &session, &ids).await?
    } else if let Some(category) = query.categoria.as_deref().filter(|c| !c.is_empty()) {
        product_service::list_products_by_category(store, &session, category, query.sort()).await?
    } else {
        product_service::list_products(store, &session, query.sort()).await?
    };
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/productos/{id}",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Get product", body = Product),
        (status = 404, description = "Product not found", body = ErrorBody),
    ),
    tag = "Productos"
)]
pub async fn get_product(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let product = product_service::get_product(state.store.as_ref(), &session, &id).await?;
    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/api/productos",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Create product", body = Product),
        (status = 400, description = "Missing required fields", body = ErrorBody),
        (status = 403, description = "Admin session required", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "Productos"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<Product>)> {
    ensure_admin(&user)?;
    let product =
        product_service::create_product(state.store.as_ref(), &user.session, payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/productos/{id}",
    params(("id" = String, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 403, description = "Admin session required", body = ErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "Productos"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    ensure_admin(&user)?;
    let product =
        product_service::update_product(state.store.as_ref(), &user.session, &id, payload)
            .await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/productos/{id}",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Deleted product", body = SuccessBody),
        (status = 403, description = "Admin session required", body = ErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "Productos"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<SuccessBody>> {
    ensure_admin(&user)?;
    product_service::delete_product(state.store.as_ref(), &user.session, &id).await?;
    Ok(Json(SuccessBody::ok()))
}
