use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{
        Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering as AtomicOrdering},
    },
};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use super::{
    AuthSession, CollectionStore, Direction, ListQuery, Record, Session, StoreError, StoreResult,
    USERS,
};

/// In-process collection store.
///
/// Keeps records per collection in insertion order, assigns ids and
/// timestamps the way the remote store does, enforces unique user emails, and
/// resolves sessions from tokens registered with [`MemoryStore::register_session`].
/// It does not evaluate collection access rules.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Record>>>,
    sessions: Mutex<HashMap<String, String>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record as-is, filling in id and timestamps when missing.
    pub fn insert(&self, collection: &str, mut record: Record) -> Record {
        stamp_new(collection, &mut record);
        self.lock_collections()
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        record
    }

    /// Makes `token` resolve to the user with `user_id` on refresh.
    pub fn register_session(&self, token: impl Into<String>, user_id: impl Into<String>) {
        self.lock_sessions().insert(token.into(), user_id.into());
    }

    /// While offline every call fails as if the store were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, AtomicOrdering::SeqCst);
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }

    fn lock_collections(&self) -> MutexGuard<'_, HashMap<String, Vec<Record>>> {
        self.collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn email_taken(&self, email: &str) -> bool {
        let collections = self.lock_collections();
        let Some(users) = collections.get(USERS) else {
            return false;
        };
        users
            .iter()
            .any(|u| u.get("email").and_then(Value::as_str) == Some(email))
    }

    fn lock_sessions(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn find(&self, collection: &str, id: &str) -> Option<Record> {
        self.lock_collections()
            .get(collection)
            .and_then(|records| records.iter().find(|r| record_id(r) == Some(id)))
            .cloned()
    }

    fn expand(&self, record: &mut Record, relation: &str) {
        // Only the order -> user relation is modelled.
        let Some(Value::String(user_id)) = record.get(relation).cloned() else {
            return;
        };
        if let Some(user) = self.find(USERS, &user_id) {
            let mut expanded = Record::new();
            expanded.insert(relation.to_string(), Value::Object(user));
            record.insert("expand".into(), Value::Object(expanded));
        }
    }
}

fn record_id(record: &Record) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

fn now_stamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S%.3fZ").to_string()
}

fn stamp_new(collection: &str, record: &mut Record) {
    if record_id(record).is_none_or(str::is_empty) {
        let id: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(15)
            .collect();
        record.insert("id".into(), Value::String(id));
    }
    let now = now_stamp();
    record
        .entry("created")
        .or_insert_with(|| Value::String(now.clone()));
    record.entry("updated").or_insert(Value::String(now));
    record.insert(
        "collectionName".into(),
        Value::String(collection.to_string()),
    );
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn get_full_list(
        &self,
        _session: &Session,
        collection: &str,
        query: &ListQuery,
    ) -> StoreResult<Vec<Record>> {
        self.check_online()?;
        let mut records: Vec<Record> = self
            .lock_collections()
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| query.filter.as_ref().is_none_or(|f| f.matches(r)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(sort) = &query.sort {
            // Later inserts win ties, matching a sub-millisecond creation order.
            records.reverse();
            records.sort_by(|a, b| {
                let ord = compare(a.get(sort.field), b.get(sort.field));
                match sort.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }

        if let Some(relation) = query.expand {
            for record in &mut records {
                self.expand(record, relation);
            }
        }
        Ok(records)
    }

    async fn get_one(
        &self,
        _session: &Session,
        collection: &str,
        id: &str,
        expand: Option<&str>,
    ) -> StoreResult<Record> {
        self.check_online()?;
        let mut record = self.find(collection, id).ok_or(StoreError::NotFound)?;
        if let Some(relation) = expand {
            self.expand(&mut record, relation);
        }
        Ok(record)
    }

    async fn create(
        &self,
        _session: &Session,
        collection: &str,
        mut body: Record,
    ) -> StoreResult<Record> {
        self.check_online()?;
        body.remove("id");
        body.remove("created");
        body.remove("updated");

        if collection == USERS {
            let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
            if self.email_taken(email) {
                return Err(StoreError::Rejected {
                    message: "Failed to create record.".into(),
                    details: json!({
                        "email": {
                            "code": "validation_not_unique",
                            "message": "Value must be unique."
                        }
                    }),
                });
            }
            // Passwords never come back from the store.
            body.remove("password");
            body.remove("passwordConfirm");
        }

        Ok(self.insert(collection, body))
    }

    async fn update(
        &self,
        _session: &Session,
        collection: &str,
        id: &str,
        body: Record,
    ) -> StoreResult<Record> {
        self.check_online()?;
        let mut collections = self.lock_collections();
        let record = collections
            .get_mut(collection)
            .and_then(|rows| rows.iter_mut().find(|r| record_id(r) == Some(id)))
            .ok_or(StoreError::NotFound)?;

        for (key, value) in body {
            if matches!(key.as_str(), "id" | "created" | "updated" | "collectionName") {
                continue;
            }
            record.insert(key, value);
        }
        record.insert("updated".into(), Value::String(now_stamp()));
        Ok(record.clone())
    }

    async fn delete(&self, _session: &Session, collection: &str, id: &str) -> StoreResult<()> {
        self.check_online()?;
        let mut collections = self.lock_collections();
        let records = collections.get_mut(collection).ok_or(StoreError::NotFound)?;
        let before = records.len();
        records.retain(|r| record_id(r) != Some(id));
        if records.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn auth_refresh(&self, session: &Session) -> StoreResult<AuthSession> {
        self.check_online()?;
        let token = session.token().ok_or(StoreError::Forbidden)?;
        let user_id = self
            .lock_sessions()
            .get(token)
            .cloned()
            .ok_or(StoreError::Forbidden)?;
        let record = self.find(USERS, &user_id).ok_or(StoreError::Forbidden)?;
        Ok(AuthSession {
            token: token.to_string(),
            record,
        })
    }
}
