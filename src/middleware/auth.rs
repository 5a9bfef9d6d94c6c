use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use chrono::Utc;
use cookie::Cookie;
use jsonwebtoken::dangerous::insecure_decode;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    mapper::user_from_record,
    models::User,
    state::AppState,
    store::{CollectionStore, Session, StoreError},
};

/// A caller whose session the store has just refreshed.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub session: Session,
}

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.user.id
    }
}

pub fn ensure_admin(user: &AuthUser) -> AppResult<()> {
    if !user.user.is_admin() {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_self_or_admin(user: &AuthUser, user_id: &str) -> AppResult<()> {
    if user.id() == user_id {
        return Ok(());
    }
    ensure_admin(user)
}

#[derive(Deserialize)]
struct CookiePayload {
    token: String,
}

/// Extracts the store token from the auth cookie value.
///
/// The value is percent-decoded when possible. A JSON payload carrying a
/// `token` field yields that field, anything else is taken as the token.
pub fn token_from_cookie(raw: &str) -> String {
    let decoded = urlencoding::decode(raw)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    match serde_json::from_str::<CookiePayload>(&decoded) {
        Ok(payload) => payload.token,
        Err(_) => decoded,
    }
}

pub fn session_from_headers(headers: &HeaderMap, cookie_name: &str) -> Session {
    let found = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == cookie_name)
        .map(|c| token_from_cookie(c.value()));

    match found {
        Some(token) => Session::with_token(token),
        None => Session::anonymous(),
    }
}

#[derive(Deserialize)]
struct TokenClaims {
    exp: Option<i64>,
}

/// Local expiry check on the token. The signature is the store's to verify,
/// so the claims are read without it. A token without `exp` is stale.
pub fn token_is_fresh(token: &str) -> bool {
    match insecure_decode::<TokenClaims>(token) {
        Ok(data) => data
            .claims
            .exp
            .is_some_and(|exp| exp >= Utc::now().timestamp()),
        Err(_) => false,
    }
}

/// Resolves a session into an [`AuthUser`] by refreshing it against the store.
pub async fn authenticate(store: &dyn CollectionStore, session: &Session) -> AppResult<AuthUser> {
    let Some(token) = session.token() else {
        return Err(AppError::Forbidden);
    };
    if !token_is_fresh(token) {
        tracing::debug!("rejecting expired or malformed session token");
        return Err(AppError::Forbidden);
    }

    match store.auth_refresh(session).await {
        Ok(auth) => Ok(AuthUser {
            user: user_from_record(&auth.record),
            session: Session::with_token(auth.token),
        }),
        Err(err @ (StoreError::Forbidden | StoreError::NotFound | StoreError::Rejected { .. })) => {
            tracing::debug!(error = %err, "store refused session refresh");
            Err(AppError::Forbidden)
        }
        Err(err) => Err(AppError::Infrastructure(err)),
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(session_from_headers(&parts.headers, &state.auth_cookie))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = session_from_headers(&parts.headers, &state.auth_cookie);
        authenticate(state.store.as_ref(), &session).await
    }
}
