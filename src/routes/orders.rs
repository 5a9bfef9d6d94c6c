use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::orders::{CreateOrderRequest, UpdateOrderStatusRequest},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin, ensure_self_or_admin},
    models::Order,
    response::{ErrorBody, SuccessBody},
    routes::params::AppJson,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/usuario/{usuario_id}", get(list_user_orders))
        .route(
            "/{id}",
            get(get_order)
                .put(update_order_status)
                .delete(delete_order),
        )
}

#[utoipa::path(
    get,
    path = "/api/ordenes",
    responses(
        (status = 200, description = "All orders, newest first", body = Vec<Order>),
        (status = 403, description = "Admin session required", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "Ordenes"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Order>>> {
    ensure_admin(&user)?;
    let orders = order_service::list_orders(state.store.as_ref(), &user.session).await?;
    Ok(Json(orders))
}

#[utoipa::path(
    get,
    path = "/api/ordenes/usuario/{usuario_id}",
    params(("usuario_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Orders of one user", body = Vec<Order>),
        (status = 403, description = "Not that user and not admin", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "Ordenes"
)]
pub async fn list_user_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Path(usuario_id): Path<String>,
) -> AppResult<Json<Vec<Order>>> {
    ensure_self_or_admin(&user, &usuario_id)?;
    let orders =
        order_service::list_orders_by_user(state.store.as_ref(), &user.session, &usuario_id)
            .await?;
    Ok(Json(orders))
}

#[utoipa::path(
    get,
    path = "/api/ordenes/{id}",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Get order", body = Order),
        (status = 403, description = "Not the owner and not admin", body = ErrorBody),
        (status = 404, description = "Order not found", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "Ordenes"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = order_service::get_order(state.store.as_ref(), &user.session, &id).await?;
    ensure_self_or_admin(&user, &order.user_id)?;
    Ok(Json(order))
}

#[utoipa::path(
    post,
    path = "/api/ordenes",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, description = "Missing required fields", body = ErrorBody),
        (status = 403, description = "Ordering for someone else", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "Ordenes"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(mut payload): AppJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    match payload.user_id.clone().filter(|id| !id.is_empty()) {
        Some(owner) => ensure_self_or_admin(&user, &owner)?,
        None => payload.user_id = Some(user.id().to_string()),
    }
    let order = order_service::create_order(state.store.as_ref(), &user.session, payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    put,
    path = "/api/ordenes/{id}",
    params(("id" = String, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order with its new status", body = Order),
        (status = 400, description = "Missing or unknown estado", body = ErrorBody),
        (status = 403, description = "Admin session required", body = ErrorBody),
        (status = 404, description = "Order not found", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "Ordenes"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<Order>> {
    ensure_admin(&user)?;
    let order =
        order_service::update_order_status(state.store.as_ref(), &user.session, &id, payload)
            .await?;
    Ok(Json(order))
}

#[utoipa::path(
    delete,
    path = "/api/ordenes/{id}",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Deleted order", body = SuccessBody),
        (status = 403, description = "Admin session required", body = ErrorBody),
        (status = 404, description = "Order not found", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "Ordenes"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<SuccessBody>> {
    ensure_admin(&user)?;
    order_service::delete_order(state.store.as_ref(), &user.session, &id).await?;
    Ok(Json(SuccessBody::ok()))
}
