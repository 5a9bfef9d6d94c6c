//! Access to the remote collection store that owns every record.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub mod filter;
pub mod memory;
pub mod pocketbase;

pub use filter::{Filter, FilterValue};
pub use memory::MemoryStore;
pub use pocketbase::PocketBaseStore;

/// A raw stored record, as returned by the store before mapping.
pub type Record = Map<String, Value>;

pub type StoreResult<T> = Result<T, StoreError>;

pub const PRODUCTS: &str = "productos";
pub const CATEGORIES: &str = "categorias";
pub const ORDERS: &str = "pedidos";
pub const USERS: &str = "users";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("access denied by store")]
    Forbidden,

    #[error("{message}")]
    Rejected { message: String, details: Value },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store transport error")]
    Transport(#[from] reqwest::Error),
}

/// Credentials a caller presents to the store. Passed explicitly to every
/// call; nothing in the crate keeps a shared authenticated client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.is_empty() {
            return Self::anonymous();
        }
        Self { token: Some(token) }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.token.is_none()
    }
}

/// A session the store accepted on refresh.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub record: Record,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: &'static str,
    pub direction: Direction,
}

impl Sort {
    pub fn asc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }

    /// Newest first, the default order of every listing.
    pub fn newest_first() -> Self {
        Self::desc("created")
    }

    pub fn render(&self) -> String {
        match self.direction {
            Direction::Asc => self.field.to_string(),
            Direction::Desc => format!("-{}", self.field),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub sort: Option<Sort>,
    pub filter: Option<Filter>,
    pub expand: Option<&'static str>,
}

impl ListQuery {
    pub fn sorted(sort: Sort) -> Self {
        Self {
            sort: Some(sort),
            ..Self::default()
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn expand(mut self, relation: &'static str) -> Self {
        self.expand = Some(relation);
        self
    }
}

#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Every record of `collection` matching `query`, across all pages.
    async fn get_full_list(
        &self,
        session: &Session,
        collection: &str,
        query: &ListQuery,
    ) -> StoreResult<Vec<Record>>;

    async fn get_one(
        &self,
        session: &Session,
        collection: &str,
        id: &str,
        expand: Option<&str>,
    ) -> StoreResult<Record>;

    async fn create(&self, session: &Session, collection: &str, body: Record)
    -> StoreResult<Record>;

    async fn update(
        &self,
        session: &Session,
        collection: &str,
        id: &str,
        body: Record,
    ) -> StoreResult<Record>;

    async fn delete(&self, session: &Session, collection: &str, id: &str) -> StoreResult<()>;

    /// Re-validates the session's token and returns the refreshed token with
    /// the authenticated user record.
    async fn auth_refresh(&self, session: &Session) -> StoreResult<AuthSession>;
}
