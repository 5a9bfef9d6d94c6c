use crate::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    error::{AppError, AppResult},
    mapper::product_from_record,
    models::Product,
    services::{non_negative, put_opt, required_text},
    store::{CollectionStore, Filter, ListQuery, PRODUCTS, Record, Session, Sort},
};

const DEFAULT_UNIT: &str = "kg";

pub async fn list_products(
    store: &dyn CollectionStore,
    session: &Session,
    sort: Option<Sort>,
) -> AppResult<Vec<Product>> {
    let query = ListQuery::sorted(sort.unwrap_or_else(Sort::newest_first));
    fetch(store, session, &query).await
}

pub async fn list_products_by_category(
    store: &dyn CollectionStore,
    session: &Session,
    category_id: &str,
    sort: Option<Sort>,
) -> AppResult<Vec<Product>> {
    let query = ListQuery::sorted(sort.unwrap_or_else(Sort::newest_first))
        .filter(Filter::eq("categoria", category_id));
    fetch(store, session, &query).await
}

/// Products with any of the given ids. Unknown ids are skipped.
pub async fn list_products_by_ids(
    store: &dyn CollectionStore,
    session: &Session,
    ids: &[String],
) -> AppResult<Vec<Product>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let ids = ids.iter().map(String::as_str);
    let query = ListQuery::default().filter(Filter::any_of("id", ids));
    fetch(store, session, &query).await
}

pub async fn get_product(
    store: &dyn CollectionStore,
    session: &Session,
    id: &str,
) -> AppResult<Product> {
    let record = store.get_one(session, PRODUCTS, id, None).await?;
    Ok(product_from_record(&record))
}

pub async fn create_product(
    store: &dyn CollectionStore,
    session: &Session,
    payload: CreateProductRequest,
) -> AppResult<Product> {
    let name = required_text(payload.name, "nombre")?;
    let description = required_text(payload.description, "descripcion")?;
    let category = required_text(payload.category, "categoria")?;
    let price = match payload.price {
        Some(price) => non_negative(price, "precio")?,
        None => return Err(AppError::validation("precio is required")),
    };
    let stock = non_negative(payload.stock.unwrap_or(0), "stock")?;

    let mut body = Record::new();
    body.insert("nombre".into(), name.into());
    body.insert("descripcion".into(), description.into());
    body.insert("precio".into(), price.into());
    body.insert("stock".into(), stock.into());
    body.insert("categoria".into(), category.into());
    body.insert("imagen".into(), payload.image.unwrap_or_default().into());
    body.insert(
        "unidad".into(),
        payload
            .unit
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UNIT.to_string())
            .into(),
    );
    body.insert("disponible".into(), payload.active.unwrap_or(true).into());
    put_opt(&mut body, "destacado", payload.featured);
    if let Some(promo) = payload.promo_price {
        body.insert(
            "precio_oferta".into(),
            non_negative(promo, "precioOferta")?.into(),
        );
    }

    let record = store.create(session, PRODUCTS, body).await?;
    let product = product_from_record(&record);
    tracing::info!(product_id = %product.id, "product created");
    Ok(product)
}

pub async fn update_product(
    store: &dyn CollectionStore,
    session: &Session,
    id: &str,
    payload: UpdateProductRequest,
) -> AppResult<Product> {
    let mut body = Record::new();
    put_opt(&mut body, "nombre", payload.name);
    put_opt(&mut body, "descripcion", payload.description);
    if let Some(price) = payload.price {
        body.insert("precio".into(), non_negative(price, "precio")?.into());
    }
    if let Some(promo) = payload.promo_price {
        body.insert(
            "precio_oferta".into(),
            non_negative(promo, "precioOferta")?.into(),
        );
    }
    if let Some(stock) = payload.stock {
        body.insert("stock".into(), non_negative(stock, "stock")?.into());
    }
    put_opt(&mut body, "categoria", payload.category);
    put_opt(&mut body, "imagen", payload.image);
    put_opt(&mut body, "unidad", payload.unit);
    put_opt(&mut body, "destacado", payload.featured);
    put_opt(
        &mut body,
        "disponible",
        payload.disponible.or(payload.active),
    );

    let record = store.update(session, PRODUCTS, id, body).await?;
    tracing::info!(product_id = %id, "product updated");
    Ok(product_from_record(&record))
}

pub async fn delete_product(
    store: &dyn CollectionStore,
    session: &Session,
    id: &str,
) -> AppResult<()> {
    store.delete(session, PRODUCTS, id).await?;
    tracing::info!(product_id = %id, "product deleted");
    Ok(())
}

async fn fetch(
    store: &dyn CollectionStore,
    session: &Session,
    query: &ListQuery,
) -> AppResult<Vec<Product>> {
    let records = store.get_full_list(session, PRODUCTS, query).await?;
    Ok(records.iter().map(product_from_record).collect())
}
