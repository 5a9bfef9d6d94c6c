use axum::extract::FromRequest;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{error::AppError, store::Sort};

/// JSON body extractor whose rejections use the API error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    Created,
    Precio,
    Nombre,
}

impl ProductSortBy {
    pub fn field(&self) -> &'static str {
        match self {
            ProductSortBy::Created => "created",
            ProductSortBy::Precio => "precio",
            ProductSortBy::Nombre => "nombre",
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct ProductQuery {
    /// Only products of this category.
    pub categoria: Option<String>,
    /// Comma separated product ids.
    pub ids: Option<String>,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortOrder>,
}

impl ProductQuery {
    /// `None` when neither sort field nor order was given.
    pub fn sort(&self) -> Option<Sort> {
        if self.sort_by.is_none() && self.sort_order.is_none() {
            return None;
        }
        let field = self.sort_by.unwrap_or(ProductSortBy::Created).field();
        Some(match self.sort_order.unwrap_or(SortOrder::Desc) {
            SortOrder::Asc => Sort::asc(field),
            SortOrder::Desc => Sort::desc(field),
        })
    }

    pub fn id_list(&self) -> Option<Vec<String>> {
        self.ids.as_ref().map(|ids| {
            ids.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}
