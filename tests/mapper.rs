use serde_json::{Value, json};
use storefront_api::{
    mapper::{category_from_record, order_from_record, product_from_record, user_from_record},
    models::{OrderStatus, Role},
    store::Record,
};

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => panic!("test record must be an object"),
    }
}

#[test]
fn product_with_missing_fields_gets_zero_values() {
    let product = product_from_record(&record(json!({
        "id": "p1",
        "nombre": "Manzana",
        "precio": 1990
    })));

    assert_eq!(product.id, "p1");
    assert_eq!(product.price, 1990);
    assert_eq!(product.stock, 0);
    assert_eq!(product.promo_price, None);
    assert!(!product.on_sale);
    assert!(!product.active);
    assert_eq!(product.description, "");
    assert!(product.created_at.is_none());
}

#[test]
fn product_reads_store_field_names_and_timestamps() {
    let product = product_from_record(&record(json!({
        "id": "p1",
        "nombre": "Platano",
        "precio": "1290",
        "precio_oferta": 990.4,
        "stock": -5,
        "categoria": "c1",
        "unidad": "kg",
        "destacado": true,
        "disponible": true,
        "created": "2024-03-01 10:20:30.123Z",
        "updated": "2024-03-02T08:00:00Z"
    })));

    assert_eq!(product.price, 1290);
    assert_eq!(product.promo_price, Some(990));
    assert!(product.on_sale);
    assert_eq!(product.effective_price(), 990);
    assert_eq!(product.stock, 0);
    assert_eq!(product.category, "c1");
    assert!(product.featured);
    assert!(product.active);
    assert_eq!(
        product.created_at.map(|t| t.to_rfc3339()),
        Some("2024-03-01T10:20:30.123+00:00".to_string())
    );
    assert!(product.updated_at.is_some());

    let json = serde_json::to_value(&product).unwrap();
    assert_eq!(json["precioOferta"], 990);
    assert_eq!(json["enOferta"], true);
    assert_eq!(json["activo"], true);
}

#[test]
fn category_maps_active_flag() {
    let category = category_from_record(&record(json!({
        "id": "c1",
        "nombre": "Frutas",
        "activa": true
    })));

    assert_eq!(category.name, "Frutas");
    assert!(category.active);
    assert_eq!(category.image, "");
}

#[test]
fn order_defaults_and_derived_totals() {
    let order = order_from_record(&record(json!({
        "id": "o1",
        "usuario": "u1",
        "total": 5970
    })));

    assert_eq!(order.user_id, "u1");
    assert!(order.items.is_empty());
    assert_eq!(order.subtotal, 5970);
    assert_eq!(order.shipping, 0);
    assert_eq!(order.total, 5970);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.shipping_address, json!({}));
    assert!(order.user.is_none());
}

#[test]
fn order_parses_shipping_address_stored_as_string() {
    let order = order_from_record(&record(json!({
        "id": "o1",
        "estado": "enviado",
        "direccion_envio": "{\"calle\":\"Av. Siempre Viva 742\",\"ciudad\":\"Santiago\"}",
        "productos": [
            { "productoId": "p1", "cantidad": 2, "precio": 1990 },
            "not an item"
        ]
    })));

    assert_eq!(order.status, OrderStatus::Shipped);
    assert_eq!(order.shipping_address["ciudad"], "Santiago");
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 2);
    assert_eq!(order.items[0].price, Some(1990));
}

#[test]
fn malformed_shipping_address_becomes_empty_object() {
    for raw in [json!("{calle:"), json!("[1,2]"), json!(42)] {
        let order = order_from_record(&record(json!({ "id": "o1", "direccion_envio": raw })));
        assert_eq!(order.shipping_address, json!({}));
    }
}

#[test]
fn unknown_status_is_kept_verbatim() {
    let order = order_from_record(&record(json!({ "id": "o1", "estado": "retenido" })));
    assert_eq!(order.status, OrderStatus::Other("retenido".into()));
    assert!(!order.status.is_known());
    assert_eq!(serde_json::to_value(&order).unwrap()["estado"], "retenido");
}

#[test]
fn order_includes_expanded_user() {
    let order = order_from_record(&record(json!({
        "id": "o1",
        "usuario": "u1",
        "expand": { "usuario": { "id": "u1", "email": "ana@example.com", "rol": "admin" } }
    })));

    let user = order.user.expect("expanded user");
    assert_eq!(user.email, "ana@example.com");
    assert_eq!(user.role, Role::Admin);
}

#[test]
fn user_role_defaults_to_cliente() {
    let user = user_from_record(&record(json!({
        "id": "u1",
        "email": "juan@example.com",
        "nombre": "Juan",
        "codigoPostal": "8320000",
        "rol": "superuser",
        "created": "2024-01-05 00:00:00.000Z"
    })));

    assert_eq!(user.role, Role::Cliente);
    assert!(!user.is_admin());
    assert_eq!(user.postal_code, "8320000");
    assert!(user.registered_at.is_some());
}
