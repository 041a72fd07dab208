use anyhow::{anyhow, Result};
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub http_addr: String,
    pub data_path: String,
    pub iframely_api_key: Option<String>,
    pub iframely_endpoint: String,
    pub resolve_timeout_seconds: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let http_addr = env_or("HTTP_ADDR", "0.0.0.0:8080");
        let _parsed_http_addr = SocketAddr::from_str(&http_addr)
            .map_err(|err| anyhow!("invalid HTTP_ADDR: {}", err))?;

        Ok(Self {
            http_addr,
            data_path: env_or("DATA_PATH", "slate_posts.json"),
            iframely_api_key: std::env::var("IFRAMELY_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            iframely_endpoint: env_or("IFRAMELY_ENDPOINT", "https://iframe.ly/api/iframely"),
            resolve_timeout_seconds: env_or_parse("RESOLVE_TIMEOUT_SECONDS", "10")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    value
        .parse::<T>()
        .map_err(|err| anyhow!("invalid {}: {}", key, err))
}
