//! Render a client view against a running proxy and print the HTML.
//! Usage:
//!   cargo run --bin nflix_view -- "page=search&q=matrix"
//!   cargo run --bin nflix_view -- --proxy http://localhost:8888 "page=details&id=550&type=movie"
//!   cargo run --bin nflix_view -- fav add 550 movie
//!   cargo run --bin nflix_view -- fav remove 550 movie
//! Favorites live in FAVORITES_DIR (default `.nflix`). NFLIX_PROXY_URL sets the
//! default proxy (.env supported).

use anyhow::{anyhow, bail, Context, Result};
use dotenvy::dotenv;
use nflix::client::{
    load_page, render_page, Favorites, FileStore, MediaKind, ProxyClient, View,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;
use tracing_subscriber::EnvFilter;

const DEFAULT_PROXY: &str = "http://localhost:8888";
const DEFAULT_FAVORITES_DIR: &str = ".nflix";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn favorites() -> Favorites<FileStore> {
    let dir = env::var("FAVORITES_DIR").unwrap_or_else(|_| DEFAULT_FAVORITES_DIR.to_string());
    Favorites::new(FileStore::new(dir))
}

fn edit_favorites(args: &[String]) -> Result<()> {
    let [action, id, kind] = args else {
        bail!("usage: nflix_view fav add|remove <id> <movie|tv>");
    };
    let id: i64 = id.parse().with_context(|| format!("invalid id: {id}"))?;
    let kind = MediaKind::parse(kind).ok_or_else(|| anyhow!("type must be 'movie' or 'tv'"))?;
    let favs = favorites();
    let changed = match action.as_str() {
        "add" => favs.add(id, kind)?,
        "remove" => favs.remove(id, kind)?,
        other => bail!("unknown favorites action: {other}"),
    };
    println!(
        "{} {} {} ({} favorites)",
        if changed { "updated" } else { "unchanged" },
        kind,
        id,
        favs.list().len()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("fav") {
        return edit_favorites(&args[1..]);
    }

    let mut proxy = env::var("NFLIX_PROXY_URL").unwrap_or_else(|_| DEFAULT_PROXY.to_string());
    let mut query = String::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--proxy" {
            proxy = iter.next().context("--proxy needs a URL")?;
        } else {
            query = arg;
        }
    }

    let view = View::from_query(&query);
    let source = ProxyClient::new(&proxy)?;
    let mut rng = StdRng::from_entropy();
    let page = load_page(&view, &source, &favorites(), &mut rng).await;
    println!("{}", render_page(&view, &page).to_html());
    Ok(())
}
