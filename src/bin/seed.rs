use std::env;

use anyhow::Context;

use storefront_api::{
    config::AppConfig,
    dto::{categories::CreateCategoryRequest, products::CreateProductRequest},
    services::{category_service, product_service},
    store::{CollectionStore, PocketBaseStore, Session},
};

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: i64,
    promo_price: Option<i64>,
    stock: i64,
    unit: &'static str,
    featured: bool,
}

const CATALOG: &[(&str, &str, &[SeedProduct])] = &[
    (
        "Frutas",
        "Fruta fresca de temporada",
        &[
            SeedProduct {
                name: "Manzana Fuji",
                description: "Manzana dulce y crujiente",
                price: 1990,
                promo_price: None,
                stock: 120,
                unit: "kg",
                featured: true,
            },
            SeedProduct {
                name: "Platano",
                description: "Platano de Ecuador",
                price: 1290,
                promo_price: Some(990),
                stock: 80,
                unit: "kg",
                featured: false,
            },
        ],
    ),
    (
        "Verduras",
        "Verduras del huerto",
        &[
            SeedProduct {
                name: "Lechuga Costina",
                description: "Lechuga hidroponica",
                price: 890,
                promo_price: None,
                stock: 40,
                unit: "unidad",
                featured: false,
            },
            SeedProduct {
                name: "Tomate",
                description: "Tomate larga vida",
                price: 1590,
                promo_price: Some(1290),
                stock: 60,
                unit: "kg",
                featured: true,
            },
        ],
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let token = env::var("SEED_ADMIN_TOKEN")
        .context("SEED_ADMIN_TOKEN must hold an admin session token")?;
    let session = Session::with_token(token);
    let store = PocketBaseStore::new(&config.store_url, config.store_timeout)?;

    let existing = category_service::list_categories(&store, &session).await?;
    let mut created = 0_usize;
    for (name, description, products) in CATALOG {
        let category_id = match existing.iter().find(|c| c.name == *name) {
            Some(category) => category.id.clone(),
            None => {
                let category = category_service::create_category(
                    &store,
                    &session,
                    CreateCategoryRequest {
                        name: Some(name.to_string()),
                        description: Some(description.to_string()),
                        ..Default::default()
                    },
                )
                .await?;
                category.id
            }
        };
        created += seed_products(&store, &session, &category_id, products).await?;
    }

    let url = &config.store_url;
    println!("Seed completed against {url}: {created} products created");
    Ok(())
}

async fn seed_products(
    store: &dyn CollectionStore,
    session: &Session,
    category_id: &str,
    products: &[SeedProduct],
) -> anyhow::Result<usize> {
    let existing =
        product_service::list_products_by_category(store, session, category_id, None).await?;
    let mut created = 0;
    for product in products {
        if existing.iter().any(|p| p.name == product.name) {
            continue;
        }
        product_service::create_product(
            store,
            session,
            CreateProductRequest {
                name: Some(product.name.to_string()),
                description: Some(product.description.to_string()),
                price: Some(product.price),
                promo_price: product.promo_price,
                stock: Some(product.stock),
                category: Some(category_id.to_string()),
                unit: Some(product.unit.to_string()),
                featured: Some(product.featured),
                ..Default::default()
            },
        )
        .await?;
        created += 1;
    }
    Ok(created)
}
