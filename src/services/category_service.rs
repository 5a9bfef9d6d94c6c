use std::collections::HashMap;

use crate::{
    dto::categories::{CreateCategoryRequest, UpdateCategoryRequest},
    error::{AppError, AppResult},
    mapper::{category_from_record, product_from_record},
    models::{Category, CategoryWithCount},
    services::{put_opt, required_text},
    store::{CATEGORIES, CollectionStore, ListQuery, PRODUCTS, Record, Session, Sort},
};

pub async fn list_categories(
    store: &dyn CollectionStore,
    session: &Session,
) -> AppResult<Vec<Category>> {
    let query = ListQuery::sorted(Sort::newest_first());
    let records = store.get_full_list(session, CATEGORIES, &query).await?;
    Ok(records.iter().map(category_from_record).collect())
}

/// Categories with the number of products that point at each of them.
/// Both collections are fetched concurrently.
pub async fn list_categories_with_counts(
    store: &dyn CollectionStore,
    session: &Session,
) -> AppResult<Vec<CategoryWithCount>> {
    let products_query = ListQuery::default();
    let (categories, products) = tokio::try_join!(list_categories(store, session), async {
        store
            .get_full_list(session, PRODUCTS, &products_query)
            .await
            .map_err(AppError::from)
    })?;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for product in products.iter().map(product_from_record) {
        if !product.category.is_empty() {
            *counts.entry(product.category).or_default() += 1;
        }
    }

    Ok(categories
        .into_iter()
        .map(|category| {
            let product_count = counts.get(&category.id).copied().unwrap_or(0);
            CategoryWithCount {
                category,
                product_count,
            }
        })
        .collect())
}

pub async fn get_category(
    store: &dyn CollectionStore,
    session: &Session,
    id: &str,
) -> AppResult<Category> {
    let record = store.get_one(session, CATEGORIES, id, None).await?;
    Ok(category_from_record(&record))
}

pub async fn create_category(
    store: &dyn CollectionStore,
    session: &Session,
    payload: CreateCategoryRequest,
) -> AppResult<Category> {
    let mut body = Record::new();
    body.insert(
        "nombre".into(),
        required_text(payload.name, "nombre")?.into(),
    );
    body.insert(
        "descripcion".into(),
        payload.description.unwrap_or_default().into(),
    );
    body.insert("imagen".into(), payload.image.unwrap_or_default().into());
    body.insert("activa".into(), payload.active.unwrap_or(true).into());

    let record = store.create(session, CATEGORIES, body).await?;
    let category = category_from_record(&record);
    tracing::info!(category_id = %category.id, "category created");
    Ok(category)
}

pub async fn update_category(
    store: &dyn CollectionStore,
    session: &Session,
    id: &str,
    payload: UpdateCategoryRequest,
) -> AppResult<Category> {
    let mut body = Record::new();
    if let Some(name) = payload.name {
        body.insert("nombre".into(), required_text(Some(name), "nombre")?.into());
    }
    put_opt(&mut body, "descripcion", payload.description);
    put_opt(&mut body, "imagen", payload.image);
    put_opt(&mut body, "activa", payload.active);

    let record = store.update(session, CATEGORIES, id, body).await?;
    tracing::info!(category_id = %id, "category updated");
    Ok(category_from_record(&record))
}

/// Products keep pointing at a deleted category; nothing cascades.
pub async fn delete_category(
    store: &dyn CollectionStore,
    session: &Session,
    id: &str,
) -> AppResult<()> {
    store.delete(session, CATEGORIES, id).await?;
    tracing::info!(category_id = %id, "category deleted");
    Ok(())
}
