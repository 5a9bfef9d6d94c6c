use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cart::{CartLine, CartSnapshot},
    dto::{
        categories::{CreateCategoryRequest, UpdateCategoryRequest},
        orders::{CreateOrderRequest, UpdateOrderStatusRequest},
        products::{CreateProductRequest, UpdateProductRequest},
        users::{CreateUserRequest, UpdateUserRequest, UserProfile},
    },
    models::{Category, CategoryWithCount, Order, OrderItem, Product, Role, User},
    response::{ErrorBody, SuccessBody},
    routes::{auth, categories, health, orders, params, products, users},
    state::DEFAULT_AUTH_COOKIE,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "cookie_auth",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(DEFAULT_AUTH_COOKIE))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::me,
        products::list_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        categories::list_categories,
        categories::list_category_counts,
        categories::create_category,
        categories::get_category,
        categories::update_category,
        categories::delete_category,
        orders::list_orders,
        orders::list_user_orders,
        orders::create_order,
        orders::get_order,
        orders::update_order_status,
        orders::delete_order,
        users::list_users,
        users::create_user,
        users::get_user,
        users::update_user,
        users::delete_user
    ),
    components(
        schemas(
            Product,
            Category,
            CategoryWithCount,
            Order,
            OrderItem,
            User,
            Role,
            CartLine,
            CartSnapshot,
            CreateProductRequest,
            UpdateProductRequest,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CreateOrderRequest,
            UpdateOrderStatusRequest,
            CreateUserRequest,
            UpdateUserRequest,
            UserProfile,
            params::ProductQuery,
            params::ProductSortBy,
            params::SortOrder,
            health::HealthData,
            SuccessBody,
            ErrorBody
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Current session"),
        (name = "Productos", description = "Product catalog"),
        (name = "Categorias", description = "Product categories"),
        (name = "Ordenes", description = "Customer orders"),
        (name = "Usuarios", description = "User administration"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
