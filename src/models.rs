use std::{convert::Infallible, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "precio")]
    pub price: i64,
    #[serde(rename = "precioOferta", skip_serializing_if = "Option::is_none")]
    pub promo_price: Option<i64>,
    pub stock: i64,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "imagen")]
    pub image: String,
    #[serde(rename = "unidad")]
    pub unit: String,
    #[serde(rename = "destacado")]
    pub featured: bool,
    #[serde(rename = "enOferta")]
    pub on_sale: bool,
    #[serde(rename = "activo")]
    pub active: bool,
    #[serde(rename = "fechaCreacion")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Price a buyer pays right now: the promotional price when one is set.
    pub fn effective_price(&self) -> i64 {
        self.promo_price.filter(|p| *p > 0).unwrap_or(self.price)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "imagen")]
    pub image: String,
    #[serde(rename = "activa")]
    pub active: bool,
    #[serde(rename = "fechaCreacion")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    #[serde(rename = "productos")]
    pub product_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    #[serde(rename = "productoId")]
    pub product_id: String,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
    #[serde(rename = "precio", skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    /// A status this build does not know, kept verbatim.
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pendiente",
            OrderStatus::Processing => "procesando",
            OrderStatus::Shipped => "enviado",
            OrderStatus::Delivered => "entregado",
            OrderStatus::Cancelled => "cancelado",
            OrderStatus::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, OrderStatus::Other(_))
    }
}

impl FromStr for OrderStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" | "pendiente" => OrderStatus::Pending,
            "procesando" => OrderStatus::Processing,
            "enviado" => OrderStatus::Shipped,
            "entregado" => OrderStatus::Delivered,
            "cancelado" => OrderStatus::Cancelled,
            other => OrderStatus::Other(other.to_string()),
        })
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: String,
    #[serde(rename = "usuarioId")]
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub subtotal: i64,
    #[serde(rename = "envio")]
    pub shipping: i64,
    pub total: i64,
    #[serde(rename = "estado")]
    #[schema(value_type = String)]
    pub status: OrderStatus,
    #[serde(rename = "direccionEnvio")]
    #[schema(value_type = Object)]
    pub shipping_address: Value,
    #[serde(rename = "metodoPago")]
    pub payment_method: String,
    #[serde(rename = "notas")]
    pub notes: String,
    #[serde(rename = "usuario", skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(rename = "fechaCreacion")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Cliente,
    Admin,
}

impl Role {
    pub fn from_store(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            _ => Role::Cliente,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido")]
    pub surname: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "direccion")]
    pub street: String,
    #[serde(rename = "ciudad")]
    pub city: String,
    pub region: String,
    #[serde(rename = "codigoPostal")]
    pub postal_code: String,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "fechaRegistro")]
    pub registered_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
