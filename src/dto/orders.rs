use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::OrderItem;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    #[serde(rename = "usuarioId")]
    pub user_id: Option<String>,
    pub items: Option<Vec<OrderItem>>,
    pub total: Option<i64>,
    #[serde(rename = "direccionEnvio")]
    #[schema(value_type = Option<Object>)]
    pub shipping_address: Option<Value>,
    #[serde(rename = "metodoPago")]
    pub payment_method: Option<String>,
    #[serde(rename = "notas")]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    #[serde(rename = "estado")]
    pub status: Option<String>,
}
