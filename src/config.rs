use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TMDB_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANG: &str = "pt-BR";
pub const DEFAULT_PLAYER_BASE_MOVIE: &str = "https://playerflixapi.com/filme/";
pub const DEFAULT_PLAYER_BASE_TV: &str = "https://playerflixapi.com/serie/";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8888";
const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb_api_key: String,
    pub tmdb_lang: String,
    pub tmdb_base_url: String,
    pub player_base_movie: String,
    pub player_base_tv: String,
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
    pub upstream_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .with_context(|| format!("BIND_ADDR is not a socket address: {bind_raw}"))?;

        let upstream_timeout = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("UPSTREAM_TIMEOUT_SECS must be an integer: {raw}"))?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            tmdb_api_key: get("TMDB_API_KEY").unwrap_or_default(),
            tmdb_lang: get("TMDB_LANG").unwrap_or_else(|| DEFAULT_LANG.to_string()),
            tmdb_base_url: get("TMDB_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_TMDB_BASE.to_string()),
            player_base_movie: get("PLAYER_BASE_MOVIE")
                .unwrap_or_else(|| DEFAULT_PLAYER_BASE_MOVIE.to_string()),
            player_base_tv: get("PLAYER_BASE_TV")
                .unwrap_or_else(|| DEFAULT_PLAYER_BASE_TV.to_string()),
            bind_addr,
            static_dir: PathBuf::from(
                get("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            ),
            upstream_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.tmdb_lang, "pt-BR");
        assert_eq!(cfg.tmdb_base_url, DEFAULT_TMDB_BASE);
        assert_eq!(cfg.player_base_movie, DEFAULT_PLAYER_BASE_MOVIE);
        assert_eq!(cfg.player_base_tv, DEFAULT_PLAYER_BASE_TV);
        assert_eq!(cfg.bind_addr.port(), 8888);
        assert!(cfg.tmdb_api_key.is_empty());
        assert!(cfg.upstream_timeout.is_none());
    }

    #[test]
    fn empty_values_count_as_unset() {
        let cfg = Config::from_lookup(lookup(&[("TMDB_LANG", ""), ("PLAYER_BASE_TV", "  ")]))
            .unwrap();
        assert_eq!(cfg.tmdb_lang, "pt-BR");
        assert_eq!(cfg.player_base_tv, DEFAULT_PLAYER_BASE_TV);
    }

    #[test]
    fn overrides_are_read() {
        let cfg = Config::from_lookup(lookup(&[
            ("TMDB_API_KEY", "k"),
            ("TMDB_LANG", "en-US"),
            ("TMDB_BASE_URL", "http://localhost:9000/3/"),
            ("PLAYER_BASE_MOVIE", "https://p.example/m/"),
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("UPSTREAM_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();
        assert_eq!(cfg.tmdb_api_key, "k");
        assert_eq!(cfg.tmdb_lang, "en-US");
        assert_eq!(cfg.tmdb_base_url, "http://localhost:9000/3");
        assert_eq!(cfg.player_base_movie, "https://p.example/m/");
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(cfg.upstream_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn rejects_bad_bind_addr() {
        assert!(Config::from_lookup(lookup(&[("BIND_ADDR", "nope")])).is_err());
        assert!(Config::from_lookup(lookup(&[("UPSTREAM_TIMEOUT_SECS", "soon")])).is_err());
    }
}
