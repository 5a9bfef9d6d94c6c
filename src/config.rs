use std::{env, time::Duration};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_url: String,
    pub host: String,
    pub port: u16,
    pub auth_cookie: String,
    pub store_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store_url =
            env::var("POCKETBASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8090".to_string());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let auth_cookie = env::var("AUTH_COOKIE").unwrap_or_else(|_| "pb_auth".to_string());
        let timeout_secs = env::var("STORE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(30);
        Ok(Self {
            store_url,
            host,
            port,
            auth_cookie,
            store_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
