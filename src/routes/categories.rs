use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::categories::{CreateCategoryRequest, UpdateCategoryRequest},
    error::AppResult,
    models::{Category, CategoryWithCount},
    response::{ErrorBody, SuccessBody},
    routes::params::AppJson,
    services::category_service,
    state::AppState,
    store::Session,
};

// Writes carry the caller's session; the store's collection rules decide
// who may change categories.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/conteos", get(list_category_counts))
        .route(
            "/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}

#[utoipa::path(
    get,
    path = "/api/categorias",
    responses((status = 200, description = "List categories", body = Vec<Category>)),
    tag = "Categorias"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Vec<Category>>> {
    let categories = category_service::list_categories(state.store.as_ref(), &session).await?;
    Ok(Json(categories))
}

#[utoipa::path(
    get,
    path = "/api/categorias/conteos",
    responses((
        status = 200,
        description = "Categories with their product counts",
        body = Vec<CategoryWithCount>
    )),
    tag = "Categorias"
)]
pub async fn list_category_counts(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Vec<CategoryWithCount>>> {
    let categories =
        category_service::list_categories_with_counts(state.store.as_ref(), &session).await?;
    Ok(Json(categories))
}

#[utoipa::path(
    get,
    path = "/api/categorias/{id}",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Get category", body = Category),
        (status = 404, description = "Category not found", body = ErrorBody),
    ),
    tag = "Categorias"
)]
pub async fn get_category(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let category = category_service::get_category(state.store.as_ref(), &session, &id).await?;
    Ok(Json(category))
}

#[utoipa::path(
    post,
    path = "/api/categorias",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Create category", body = Category),
        (status = 400, description = "Missing nombre", body = ErrorBody),
    ),
    tag = "Categorias"
)]
pub async fn create_category(
    State(state): State<AppState>,
    session: Session,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category =
        category_service::create_category(state.store.as_ref(), &session, payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/api/categorias/{id}",
    params(("id" = String, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Updated category", body = Category),
        (status = 404, description = "Category not found", body = ErrorBody),
    ),
    tag = "Categorias"
)]
pub async fn update_category(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateCategoryRequest>,
) -> AppResult<Json<Category>> {
    let category =
        category_service::update_category(state.store.as_ref(), &session, &id, payload).await?;
    Ok(Json(category))
}

#[utoipa::path(
    delete,
    path = "/api/categorias/{id}",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Deleted category", body = SuccessBody),
        (status = 404, description = "Category not found", body = ErrorBody),
    ),
    tag = "Categorias"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Json<SuccessBody>> {
    category_service::delete_category(state.store.as_ref(), &session, &id).await?;
    Ok(Json(SuccessBody::ok()))
}
