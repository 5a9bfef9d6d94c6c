use axum::{Json, Router, routing::get};

use crate::{middleware::auth::AuthUser, models::User, response::ErrorBody, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The signed-in user", body = User),
        (status = 403, description = "No valid session", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "Auth"
)]
pub async fn me(user: AuthUser) -> Json<User> {
    Json(user.user)
}
