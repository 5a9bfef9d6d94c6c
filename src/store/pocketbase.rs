use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use super::{
    AuthSession, CollectionStore, ListQuery, Record, Session, StoreError, StoreResult, USERS,
};

/// Records fetched per page when walking a full list.
const BATCH_SIZE: usize = 500;

/// Client for a PocketBase instance.
#[derive(Debug, Clone)]
pub struct PocketBaseStore {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ListPage {
    #[serde(default)]
    items: Vec<Record>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct RefreshBody {
    token: String,
    record: Record,
}

impl PocketBaseStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> StoreResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn records_url(&self, collection: &str) -> String {
        format!(
            "{}/api/collections/{}/records",
            self.base_url,
            urlencoding::encode(collection)
        )
    }

    fn record_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/{}",
            self.records_url(collection),
            urlencoding::encode(id)
        )
    }

    fn request(&self, method: Method, url: &str, session: &Session) -> RequestBuilder {
        let req = self.client.request(method, url);
        match session.token() {
            Some(token) => req.header(reqwest::header::AUTHORIZATION, token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> StoreResult<Response> {
        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.json::<ErrorBody>().await.ok();
        Err(error_for_status(status, body))
    }
}

fn error_for_status(status: StatusCode, body: Option<ErrorBody>) -> StoreError {
    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Forbidden,
        StatusCode::BAD_REQUEST => {
            let (message, details) = match body {
                Some(body) => (body.message, body.data),
                None => (String::new(), Value::Null),
            };
            let message = if message.is_empty() {
                "request rejected by store".to_string()
            } else {
                message
            };
            StoreError::Rejected { message, details }
        }
        other => {
            let message = body
                .map(|b| b.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| other.to_string());
            StoreError::Unavailable(message)
        }
    }
}

#[async_trait]
impl CollectionStore for PocketBaseStore {
    async fn get_full_list(
        &self,
        session: &Session,
        collection: &str,
        query: &ListQuery,
    ) -> StoreResult<Vec<Record>> {
        let url = self.records_url(collection);
        let mut params: Vec<(&str, String)> = vec![
            ("perPage", BATCH_SIZE.to_string()),
            ("skipTotal", "1".to_string()),
        ];
        if let Some(sort) = &query.sort {
            params.push(("sort", sort.render()));
        }
        if let Some(filter) = &query.filter {
            params.push(("filter", filter.render()));
        }
        if let Some(expand) = query.expand {
            params.push(("expand", expand.to_string()));
        }

        let mut records = Vec::new();
        let mut page = 1_usize;
        loop {
            let req = self
                .request(Method::GET, &url, session)
                .query(&params)
                .query(&[("page", page)]);
            let batch: ListPage = self.send(req).await?.json().await?;
            let fetched = batch.items.len();
            records.extend(batch.items);
            if fetched < BATCH_SIZE {
                break;
            }
            page += 1;
        }

        tracing::debug!(collection, count = records.len(), "fetched full list");
        Ok(records)
    }

    async fn get_one(
        &self,
        session: &Session,
        collection: &str,
        id: &str,
        expand: Option<&str>,
    ) -> StoreResult<Record> {
        let mut req = self.request(Method::GET, &self.record_url(collection, id), session);
        if let Some(expand) = expand {
            req = req.query(&[("expand", expand)]);
        }
        Ok(self.send(req).await?.json().await?)
    }

    async fn create(
        &self,
        session: &Session,
        collection: &str,
        body: Record,
    ) -> StoreResult<Record> {
        let req = self
            .request(Method::POST, &self.records_url(collection), session)
            .json(&body);
        Ok(self.send(req).await?.json().await?)
    }

    async fn update(
        &self,
        session: &Session,
        collection: &str,
        id: &str,
        body: Record,
    ) -> StoreResult<Record> {
        let req = self
            .request(Method::PATCH, &self.record_url(collection, id), session)
            .json(&body);
        Ok(self.send(req).await?.json().await?)
    }

    async fn delete(&self, session: &Session, collection: &str, id: &str) -> StoreResult<()> {
        let req = self.request(Method::DELETE, &self.record_url(collection, id), session);
        self.send(req).await?;
        Ok(())
    }

    async fn auth_refresh(&self, session: &Session) -> StoreResult<AuthSession> {
        if session.is_anonymous() {
            return Err(StoreError::Forbidden);
        }
        let url = format!(
            "{}/api/collections/{}/auth-refresh",
            self.base_url, USERS
        );
        let req = self.request(Method::POST, &url, session);
        let body: RefreshBody = self.send(req).await?.json().await?;
        Ok(AuthSession {
            token: body.token,
            record: body.record,
        })
    }
}
