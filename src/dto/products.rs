use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "precio")]
    pub price: Option<i64>,
    #[serde(rename = "precioOferta")]
    pub promo_price: Option<i64>,
    pub stock: Option<i64>,
    #[serde(rename = "categoria")]
    pub category: Option<String>,
    #[serde(rename = "imagen")]
    pub image: Option<String>,
    #[serde(rename = "unidad")]
    pub unit: Option<String>,
    #[serde(rename = "destacado")]
    pub featured: Option<bool>,
    #[serde(rename = "activo")]
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "precio")]
    pub price: Option<i64>,
    #[serde(rename = "precioOferta")]
    pub promo_price: Option<i64>,
    pub stock: Option<i64>,
    #[serde(rename = "categoria")]
    pub category: Option<String>,
    #[serde(rename = "imagen")]
    pub image: Option<String>,
    #[serde(rename = "unidad")]
    pub unit: Option<String>,
    #[serde(rename = "destacado")]
    pub featured: Option<bool>,
    #[serde(rename = "activo")]
    pub active: Option<bool>,
    /// Store-side name for `activo`; wins when both are sent.
    pub disponible: Option<bool>,
}
