use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::Config;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerBases {
    pub movie: String,
    pub series: String,
}

impl PlayerBases {
    pub fn from_config(config: &Config) -> Self {
        Self {
            movie: config.player_base_movie.clone(),
            series: config.player_base_tv.clone(),
        }
    }

    pub fn url_for(&self, media_type: &str, id: i64) -> String {
        let base = if media_type == "movie" {
            &self.movie
        } else {
            &self.series
        };
        format!("{base}{id}")
    }
}

#[async_trait]
pub trait PlayerProbe: Send + Sync {
    async fn is_available(&self, url: &str) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct PlayerClient {
    client: Client,
}

impl PlayerClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PlayerProbe for PlayerClient {
    async fn is_available(&self, url: &str) -> Result<bool> {
        let res = self
            .client
            .head(url)
            .send()
            .await
            .context("HEAD request failed")?;
        debug!("Player probe {} -> {}", url, res.status());
        Ok(res.status().is_success())
    }
}
