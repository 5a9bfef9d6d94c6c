use serde_json::{Map, Value};

use crate::{
    dto::orders::{CreateOrderRequest, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    mapper::order_from_record,
    models::{Order, OrderStatus},
    services::{non_negative, required_text},
    store::{CollectionStore, Filter, ListQuery, ORDERS, Record, Session, Sort},
};

const USER_RELATION: &str = "usuario";

pub async fn list_orders(store: &dyn CollectionStore, session: &Session) -> AppResult<Vec<Order>> {
    let query = ListQuery::sorted(Sort::newest_first()).expand(USER_RELATION);
    let records = store.get_full_list(session, ORDERS, &query).await?;
    Ok(records.iter().map(order_from_record).collect())
}

pub async fn list_orders_by_user(
    store: &dyn CollectionStore,
    session: &Session,
    user_id: &str,
) -> AppResult<Vec<Order>> {
    let query =
        ListQuery::sorted(Sort::newest_first()).filter(Filter::eq(USER_RELATION, user_id));
    let records = store.get_full_list(session, ORDERS, &query).await?;
    tracing::debug!(user_id, count = records.len(), "fetched user orders");
    Ok(records.iter().map(order_from_record).collect())
}

pub async fn get_order(
    store: &dyn CollectionStore,
    session: &Session,
    id: &str,
) -> AppResult<Order> {
    let record = store
        .get_one(session, ORDERS, id, Some(USER_RELATION))
        .await?;
    Ok(order_from_record(&record))
}

/// Places a new order in `pendiente`. Totals are taken as given; shipping is
/// not modelled.
pub async fn create_order(
    store: &dyn CollectionStore,
    session: &Session,
    payload: CreateOrderRequest,
) -> AppResult<Order> {
    let user_id = required_text(payload.user_id, "usuarioId")?;
    let items = match payload.items {
        Some(items) if !items.is_empty() => items,
        _ => return Err(AppError::validation("items must not be empty")),
    };
    if let Some(bad) = items
        .iter()
        .find(|i| i.product_id.trim().is_empty() || i.quantity <= 0)
    {
        return Err(AppError::Validation {
            message: "every item needs a productoId and a positive cantidad".into(),
            details: serde_json::to_value(bad).ok(),
        });
    }
    let total = match payload.total {
        Some(total) => non_negative(total, "total")?,
        None => return Err(AppError::validation("total is required")),
    };
    let payment_method = required_text(payload.payment_method, "metodoPago")?;
    let shipping_address = match payload.shipping_address {
        Some(Value::Object(map)) => Value::Object(map),
        Some(Value::Null) | None => Value::Object(Map::new()),
        Some(_) => return Err(AppError::validation("direccionEnvio must be an object")),
    };

    let mut body = Record::new();
    body.insert(USER_RELATION.into(), user_id.into());
    body.insert(
        "productos".into(),
        serde_json::to_value(&items).map_err(anyhow::Error::from)?,
    );
    body.insert("total".into(), total.into());
    body.insert("estado".into(), OrderStatus::Pending.as_str().into());
    body.insert("direccion_envio".into(), shipping_address);
    body.insert("pago".into(), payment_method.into());
    body.insert("notas".into(), payload.notes.unwrap_or_default().into());

    let record = store.create(session, ORDERS, body).await?;
    let order = order_from_record(&record);
    tracing::info!(order_id = %order.id, user_id = %order.user_id, total, "order created");
    Ok(order)
}

pub async fn update_order_status(
    store: &dyn CollectionStore,
    session: &Session,
    id: &str,
    payload: UpdateOrderStatusRequest,
) -> AppResult<Order> {
    let raw = required_text(payload.status, "estado")?;
    let status = OrderStatus::from(raw);
    if !status.is_known() {
        return Err(AppError::validation(format!("unknown estado: {status}")));
    }

    let mut body = Record::new();
    body.insert("estado".into(), status.as_str().into());
    let record = store.update(session, ORDERS, id, body).await?;
    tracing::info!(order_id = %id, status = %status, "order status updated");
    Ok(order_from_record(&record))
}

pub async fn delete_order(
    store: &dyn CollectionStore,
    session: &Session,
    id: &str,
) -> AppResult<()> {
    store.delete(session, ORDERS, id).await?;
    tracing::info!(order_id = %id, "order deleted");
    Ok(())
}
