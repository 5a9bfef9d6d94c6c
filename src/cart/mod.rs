//! Shopping cart state for the active identity.
//!
//! [`CartManager`] owns the lines of one identity's cart at a time and writes
//! every change straight through to a [`CartStore`]. The total is derived
//! from the lines on demand.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

mod persist;

pub use persist::{CartStore, CartStoreError, FileCartStore, MemoryCartStore};

const GUEST_KEY: &str = "cart:guest";

/// Whose cart is active. All signed-out sessions share the guest cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Guest,
    User(String),
}

impl Identity {
    pub fn from_user_id(user_id: Option<&str>) -> Self {
        match user_id {
            Some(id) if !id.is_empty() => Identity::User(id.to_string()),
            _ => Identity::Guest,
        }
    }

    pub fn storage_key(&self) -> String {
        match self {
            Identity::Guest => GUEST_KEY.to_string(),
            Identity::User(id) => format!("cart:user:{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    #[serde(rename = "productoId")]
    pub product_id: String,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    /// Unit price captured when the product was first added.
    #[serde(rename = "precio")]
    pub price: i64,
}

impl CartLine {
    /// Saturates instead of overflowing on absurd prices or quantities.
    pub fn subtotal(&self) -> i64 {
        self.price.saturating_mul(i64::from(self.quantity))
    }
}

/// The persisted form of a cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartSnapshot {
    #[serde(alias = "items", default)]
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub total: i64,
}

pub fn total_of(lines: &[CartLine]) -> i64 {
    lines
        .iter()
        .map(CartLine::subtotal)
        .fold(0, i64::saturating_add)
}

pub struct CartManager<S> {
    store: S,
    identity: Identity,
    lines: Vec<CartLine>,
}

impl<S: CartStore> CartManager<S> {
    /// Starts managing the cart of `identity`, restoring whatever was
    /// persisted for it.
    pub fn activate(store: S, identity: Identity) -> Self {
        let lines = load_lines(&store, &identity);
        Self {
            store,
            identity,
            lines,
        }
    }

    /// Replaces the in-memory cart with the one persisted for `identity`.
    /// Carts are never merged; the previous identity's cart stays where it was
    /// persisted.
    pub fn switch_identity(&mut self, identity: Identity) {
        if identity == self.identity {
            return;
        }
        tracing::debug!(from = ?self.identity, to = ?identity, "switching cart identity");
        self.lines = load_lines(&self.store, &identity);
        self.identity = identity;
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn total(&self) -> i64 {
        total_of(&self.lines)
    }

    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .map(|l| l.quantity)
            .fold(0, u32::saturating_add)
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.lines.clone(),
            total: self.total(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Adds `quantity` of `product`. The caller ensures `quantity > 0`.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<(), CartStoreError> {
        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine {
                product_id: product.id.clone(),
                quantity,
                price: product.effective_price(),
            }),
        }
        self.persist()
    }

    /// Drops the line for `product_id`. Nothing is written when there is no
    /// such line.
    pub fn remove_item(&mut self, product_id: &str) -> Result<(), CartStoreError> {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        if self.lines.len() == before {
            return Ok(());
        }
        self.persist()
    }

    /// Sets the quantity of a line; zero or less removes it.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> Result<(), CartStoreError> {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }
        let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) else {
            return Ok(());
        };
        line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.persist()
    }

    /// Empties the cart and erases its persisted copy.
    pub fn clear(&mut self) -> Result<(), CartStoreError> {
        self.lines.clear();
        self.store.clear(&self.identity.storage_key())
    }

    fn persist(&self) -> Result<(), CartStoreError> {
        self.store.save(&self.identity.storage_key(), &self.snapshot())
    }
}

fn load_lines<S: CartStore>(store: &S, identity: &Identity) -> Vec<CartLine> {
    match store.load(&identity.storage_key()) {
        Ok(Some(snapshot)) => snapshot.lines,
        Ok(None) => Vec::new(),
        Err(err) => {
            tracing::warn!(error = %err, identity = ?identity, "discarding unreadable cart");
            Vec::new()
        }
    }
}
