use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::query::{ApiKind, MetadataParams};

#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    Trending,
    PopularMovies { page: i64 },
    PopularTv { page: i64 },
    DiscoverAnime { page: i64 },
    SearchMulti { query: String, page: i64 },
    Details { media_type: String, id: i64 },
    Credits { media_type: String, id: i64 },
    Recommendations { media_type: String, id: i64 },
    Videos { media_type: String, id: i64 },
}

impl Endpoint {
    pub fn for_params(api: ApiKind, params: &MetadataParams) -> Option<Self> {
        let page = params.page;
        let id = params.id;
        let media_type = params.media_type.clone();
        let endpoint = match api {
            ApiKind::Hero => Endpoint::Trending,
            ApiKind::Movies => Endpoint::PopularMovies { page },
            ApiKind::Tv => Endpoint::PopularTv { page },
            ApiKind::Anime => Endpoint::DiscoverAnime { page },
            ApiKind::Search => Endpoint::SearchMulti {
                query: params.query.clone(),
                page,
            },
            ApiKind::Details => Endpoint::Details { media_type, id },
            ApiKind::Credits => Endpoint::Credits { media_type, id },
            ApiKind::Recommendations => Endpoint::Recommendations { media_type, id },
            ApiKind::Videos => Endpoint::Videos { media_type, id },
            ApiKind::Player => return None,
        };
        Some(endpoint)
    }

    pub fn url(&self, base: &str, api_key: &str, lang: &str) -> String {
        let auth = format!("api_key={api_key}&language={lang}");
        match self {
            Endpoint::Trending => format!("{base}/trending/all/day?{auth}"),
            Endpoint::PopularMovies { page } => {
                format!("{base}/movie/popular?{auth}&page={page}")
            }
            Endpoint::PopularTv { page } => format!("{base}/tv/popular?{auth}&page={page}"),
            Endpoint::DiscoverAnime { page } => format!(
                "{base}/discover/tv?{auth}&with_genres=16&sort_by=popularity.desc&page={page}"
            ),
            Endpoint::SearchMulti { query, page } => format!(
                "{base}/search/multi?{auth}&query={}&page={page}",
                urlencoding::encode(query)
            ),
            Endpoint::Details { media_type, id } => format!(
                "{base}/{media_type}/{id}?{auth}&append_to_response=credits,videos,recommendations"
            ),
            Endpoint::Credits { media_type, id } => {
                format!("{base}/{media_type}/{id}/credits?{auth}")
            }
            Endpoint::Recommendations { media_type, id } => {
                format!("{base}/{media_type}/{id}/recommendations?{auth}&page=1")
            }
            Endpoint::Videos { media_type, id } => {
                format!("{base}/{media_type}/{id}/videos?{auth}")
            }
        }
    }
}

#[async_trait]
pub trait MetadataApi: Send + Sync {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    lang: String,
}

impl TmdbClient {
    pub fn new(client: Client, base_url: &str, api_key: &str, lang: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            lang: lang.to_string(),
        }
    }
}

#[async_trait]
impl MetadataApi for TmdbClient {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value> {
        let url = endpoint.url(&self.base_url, &self.api_key, &self.lang);
        debug!("Fetching {:?}", endpoint);
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .context("request failed")?;
        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!("HTTP error! status: {}", status.as_u16()));
        }
        let body = res.text().await.context("reading body failed")?;
        let parsed: Value = serde_json::from_str(&body).context("JSON parse failed")?;
        Ok(parsed)
    }
}

pub fn http_client(timeout: Option<Duration>) -> Result<Client> {
    let user_agent = format!("nflix/{}", env!("CARGO_PKG_VERSION"));
    let mut builder = Client::builder().user_agent(user_agent);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("Failed to build HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.themoviedb.org/3";

    fn params(api: &str, page: i64, id: i64, media_type: &str, query: &str) -> MetadataParams {
        MetadataParams {
            api: ApiKind::parse(api),
            page,
            id,
            media_type: media_type.to_string(),
            query: query.to_string(),
        }
    }

    fn url_for(p: &MetadataParams) -> String {
        let api = p.api.expect("known api");
        Endpoint::for_params(api, p)
            .expect("upstream endpoint")
            .url(BASE, "KEY", "pt-BR")
    }

    #[test]
    fn catalog_urls() {
        assert_eq!(
            url_for(&params("hero", 3, 0, "movie", "")),
            "https://api.themoviedb.org/3/trending/all/day?api_key=KEY&language=pt-BR"
        );
        assert_eq!(
            url_for(&params("movies", 2, 0, "movie", "")),
            "https://api.themoviedb.org/3/movie/popular?api_key=KEY&language=pt-BR&page=2"
        );
        assert_eq!(
            url_for(&params("tv", 1, 0, "movie", "")),
            "https://api.themoviedb.org/3/tv/popular?api_key=KEY&language=pt-BR&page=1"
        );
        assert_eq!(
            url_for(&params("anime", 4, 0, "movie", "")),
            "https://api.themoviedb.org/3/discover/tv?api_key=KEY&language=pt-BR&with_genres=16&sort_by=popularity.desc&page=4"
        );
    }

    #[test]
    fn search_query_is_encoded() {
        assert_eq!(
            url_for(&params("search", 1, 0, "movie", "o poderoso chefão & cia")),
            "https://api.themoviedb.org/3/search/multi?api_key=KEY&language=pt-BR&query=o%20poderoso%20chef%C3%A3o%20%26%20cia&page=1"
        );
    }

    #[test]
    fn per_title_urls_use_media_type_and_id() {
        assert_eq!(
            url_for(&params("details", 1, 550, "movie", "")),
            "https://api.themoviedb.org/3/movie/550?api_key=KEY&language=pt-BR&append_to_response=credits,videos,recommendations"
        );
        assert_eq!(
            url_for(&params("credits", 1, 1399, "tv", "")),
            "https://api.themoviedb.org/3/tv/1399/credits?api_key=KEY&language=pt-BR"
        );
        assert_eq!(
            url_for(&params("recommendations", 7, 1399, "tv", "")),
            "https://api.themoviedb.org/3/tv/1399/recommendations?api_key=KEY&language=pt-BR&page=1"
        );
        assert_eq!(
            url_for(&params("videos", 1, 550, "movie", "")),
            "https://api.themoviedb.org/3/movie/550/videos?api_key=KEY&language=pt-BR"
        );
    }

    #[test]
    fn player_has_no_upstream() {
        let p = params("player", 1, 550, "movie", "");
        assert_eq!(Endpoint::for_params(ApiKind::Player, &p), None);
    }
}
