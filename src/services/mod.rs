//! Resource accessors: one module per collection. Each call goes to the
//! store with the caller's session and maps the records it gets back.

use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    store::Record,
};

pub mod category_service;
pub mod order_service;
pub mod product_service;
pub mod user_service;

/// A present, non-blank string, or a validation error naming `field`.
pub(crate) fn required_text(value: Option<String>, field: &str) -> AppResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::validation(format!("{field} is required"))),
    }
}

pub(crate) fn non_negative(value: i64, field: &str) -> AppResult<i64> {
    if value < 0 {
        return Err(AppError::validation(format!(
            "{field} must not be negative"
        )));
    }
    Ok(value)
}

/// Inserts `value` under `key` only when it is present.
pub(crate) fn put_opt<T: Into<Value>>(body: &mut Record, key: &str, value: Option<T>) {
    if let Some(value) = value {
        body.insert(key.to_string(), value.into());
    }
}
