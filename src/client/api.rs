use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::media::MediaKind;
use crate::app::METADATA_PATH;
use crate::query::ApiKind;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub api: ApiKind,
    pub page: Option<u32>,
    pub id: Option<i64>,
    pub kind: Option<MediaKind>,
    pub query: Option<String>,
}

impl ApiRequest {
    pub fn new(api: ApiKind) -> Self {
        Self {
            api,
            page: None,
            id: None,
            kind: None,
            query: None,
        }
    }

    pub fn catalog(api: ApiKind, page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::new(api)
        }
    }

    pub fn search(query: &str, page: u32) -> Self {
        Self {
            page: Some(page),
            query: Some(query.to_string()),
            ..Self::new(ApiKind::Search)
        }
    }

    pub fn title(api: ApiKind, id: i64, kind: MediaKind) -> Self {
        Self {
            id: Some(id),
            kind: Some(kind),
            ..Self::new(api)
        }
    }

    pub fn query_string(&self) -> String {
        let mut parts = vec![format!("api={}", self.api)];
        if let Some(page) = self.page {
            parts.push(format!("page={page}"));
        }
        if let Some(id) = self.id {
            parts.push(format!("id={id}"));
        }
        if let Some(kind) = self.kind {
            parts.push(format!("media_type={kind}"));
        }
        if let Some(query) = &self.query {
            parts.push(format!("query={}", urlencoding::encode(query)));
        }
        parts.join("&")
    }
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn get(&self, request: &ApiRequest) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("nflix-view/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build proxy HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CatalogSource for ProxyClient {
    async fn get(&self, request: &ApiRequest) -> Result<Value> {
        let url = format!(
            "{}{}?{}",
            self.base_url,
            METADATA_PATH,
            request.query_string()
        );
        debug!("GET {}", url);
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .context("request failed")?;
        let status = res.status();
        let text = res.text().await.context("reading body failed")?;
        let value: Value = serde_json::from_str(&text).context("JSON parse failed")?;
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Err(match value.get("details").and_then(Value::as_str) {
                Some(details) => anyhow!("{} ({}): {}", message, status.as_u16(), details),
                None => anyhow!("{} ({})", message, status.as_u16()),
            });
        }
        if !status.is_success() {
            return Err(anyhow!("HTTP error! status: {}", status.as_u16()));
        }
        Ok(value)
    }
}
