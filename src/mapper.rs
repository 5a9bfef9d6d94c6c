//! Conversion of raw store records into application entities.
//!
//! Every function here is total: a missing or mistyped field falls back to
//! the zero value of its type instead of failing the whole record.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::{
    models::{Category, Order, OrderItem, OrderStatus, Product, Role, User},
    store::Record,
};

const STORE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S%.fZ";

pub fn product_from_record(record: &Record) -> Product {
    let promo_price = opt_int(record, "precio_oferta").map(|p| p.max(0));
    Product {
        id: text(record, "id"),
        name: text(record, "nombre"),
        description: text(record, "descripcion"),
        price: int(record, "precio").max(0),
        promo_price,
        stock: int(record, "stock").max(0),
        category: text(record, "categoria"),
        image: text(record, "imagen"),
        unit: text(record, "unidad"),
        featured: flag(record, "destacado"),
        on_sale: promo_price.is_some_and(|p| p > 0),
        active: flag(record, "disponible"),
        created_at: timestamp(record, "created"),
        updated_at: timestamp(record, "updated"),
    }
}

pub fn category_from_record(record: &Record) -> Category {
    Category {
        id: text(record, "id"),
        name: text(record, "nombre"),
        description: text(record, "descripcion"),
        image: text(record, "imagen"),
        active: flag(record, "activa"),
        created_at: timestamp(record, "created"),
        updated_at: timestamp(record, "updated"),
    }
}

pub fn order_from_record(record: &Record) -> Order {
    let total = int(record, "total");
    let user = record
        .get("expand")
        .and_then(|e| e.get("usuario"))
        .and_then(Value::as_object)
        .map(user_from_record);

    Order {
        id: text(record, "id"),
        user_id: text(record, "usuario"),
        items: order_items(record.get("productos")),
        subtotal: total,
        shipping: 0,
        total,
        status: OrderStatus::from(text(record, "estado")),
        shipping_address: shipping_address(record.get("direccion_envio")),
        payment_method: text(record, "pago"),
        notes: text(record, "notas"),
        user,
        created_at: timestamp(record, "created"),
        updated_at: timestamp(record, "updated"),
    }
}

pub fn user_from_record(record: &Record) -> User {
    User {
        id: text(record, "id"),
        email: text(record, "email"),
        name: text(record, "nombre"),
        surname: text(record, "apellido"),
        phone: text(record, "telefono"),
        street: text(record, "direccion"),
        city: text(record, "ciudad"),
        region: text(record, "region"),
        postal_code: text(record, "codigoPostal"),
        role: Role::from_store(&text(record, "rol")),
        registered_at: timestamp(record, "created"),
    }
}

/// Reads the shipping address, which older clients stored as a JSON string.
fn shipping_address(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Object(map)) => Value::Object(map.clone()),
        Some(Value::String(raw)) if raw.trim().is_empty() => empty_object(),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Value::Object(map),
            Ok(other) => {
                tracing::warn!(
                    kind = json_kind(&other),
                    "shipping address is not an object"
                );
                empty_object()
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to parse shipping address");
                empty_object()
            }
        },
        _ => empty_object(),
    }
}

fn order_items(value: Option<&Value>) -> Vec<OrderItem> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|item| OrderItem {
            product_id: text(item, "productoId"),
            quantity: int(item, "cantidad"),
            price: opt_int(item, "precio"),
        })
        .collect()
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn text(record: &Record, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn opt_int(record: &Record, key: &str) -> Option<i64> {
    match record.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    }
}

fn int(record: &Record, key: &str) -> i64 {
    opt_int(record, key).unwrap_or(0)
}

fn flag(record: &Record, key: &str) -> bool {
    record.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn timestamp(record: &Record, key: &str) -> Option<DateTime<Utc>> {
    let raw = record.get(key)?.as_str()?;
    if raw.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, STORE_TIMESTAMP)
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.to_utc()))
        .ok()
}
