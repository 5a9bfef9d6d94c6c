use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::users::{CreateUserRequest, UpdateUserRequest},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::User,
    response::{ErrorBody, SuccessBody},
    routes::params::AppJson,
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
}

#[utoipa::path(
    get,
    path = "/api/usuarios",
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 403, description = "Admin session required", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "Usuarios"
)]
pub async fn list_users(
    State(state): State<AppState>,
    admin: AuthUser,
) -> AppResult<Json<Vec<User>>> {
    ensure_admin(&admin)?;
    let users = user_service::list_users(state.store.as_ref(), &admin.session).await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/usuarios/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Get user", body = User),
        (status = 404, description = "User not found", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "Usuarios"
)]
pub async fn get_user(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    ensure_admin(&admin)?;
    let user = user_service::get_user(state.store.as_ref(), &admin.session, &id).await?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/usuarios",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Missing fields or email taken", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "Usuarios"
)]
pub async fn create_user(
    State(state): State<AppState>,
    admin: AuthUser,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    ensure_admin(&admin)?;
    let user = user_service::create_user(state.store.as_ref(), &admin.session, payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 404, description = "User not found", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "Usuarios"
)]
pub async fn update_user(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    ensure_admin(&admin)?;
    let user =
        user_service::update_user(state.store.as_ref(), &admin.session, &id, payload).await?;
    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/api/usuarios/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Deleted user", body = SuccessBody),
        (status = 404, description = "User not found", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "Usuarios"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<SuccessBody>> {
    ensure_admin(&admin)?;
    user_service::delete_user(state.store.as_ref(), &admin.session, &id).await?;
    Ok(Json(SuccessBody::ok()))
}
