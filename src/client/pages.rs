use anyhow::{anyhow, Context, Result};
use futures::future::join_all;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;
use tracing::{error, warn};

use super::api::{ApiRequest, CatalogSource};
use super::favorites::{Favorites, KeyValueStore};
use super::media::{CastMember, MediaDetails, MediaKind, MediaSummary, Trailer};
use super::pagination::{total_pages, Pager};
use super::view::View;
use crate::query::ApiKind;

pub const CAROUSEL_LIMIT: usize = 10;
pub const CAST_LIMIT: usize = 10;
pub const RECOMMENDATION_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Popular,
    Movies,
    Tv,
    Anime,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Popular,
        Category::Movies,
        Category::Tv,
        Category::Anime,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Category::Popular => "popular",
            Category::Movies => "movies",
            Category::Tv => "tv",
            Category::Anime => "anime",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Popular => "Populares",
            Category::Movies => "Filmes Populares",
            Category::Tv => "Séries Populares",
            Category::Anime => "Animes",
        }
    }

    pub fn api(&self) -> ApiKind {
        match self {
            Category::Popular => ApiKind::Hero,
            Category::Movies => ApiKind::Movies,
            Category::Tv => ApiKind::Tv,
            Category::Anime => ApiKind::Anime,
        }
    }

    // Trending items carry their own media_type; the other lists are single-kind.
    fn kind_hint(&self) -> Option<MediaKind> {
        match self {
            Category::Popular => None,
            Category::Movies => Some(MediaKind::Movie),
            Category::Tv | Category::Anime => Some(MediaKind::Series),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryState {
    pub category: Category,
    pub items: Vec<MediaSummary>,
    pub pager: Pager,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomeState {
    pub hero: Option<MediaSummary>,
    pub categories: Vec<CategoryState>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Prompt,
    NoResults,
    Failed,
    Results {
        items: Vec<MediaSummary>,
        pager: Pager,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub outcome: SearchOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FavoritesState {
    Empty,
    Failed,
    Loaded(Vec<MediaSummary>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Ready(T),
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailsState {
    pub details: MediaDetails,
    pub is_favorite: bool,
    pub cast: Section<Vec<CastMember>>,
    pub trailer: Section<Option<Trailer>>,
    pub recommendations: Section<Vec<MediaSummary>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Home(HomeState),
    Search(SearchState),
    Favorites(FavoritesState),
    Details(Box<DetailsState>),
    DetailsUnavailable,
}

pub async fn load_page<C, S, R>(
    view: &View,
    source: &C,
    favorites: &Favorites<S>,
    rng: &mut R,
) -> Page
where
    C: CatalogSource + ?Sized,
    S: KeyValueStore,
    R: Rng + ?Sized,
{
    match view {
        View::Home => Page::Home(load_home(source, rng).await),
        View::Search { query } => Page::Search(search(source, query, 1).await),
        View::Favorites => Page::Favorites(load_favorites(source, favorites).await),
        View::Details { id, kind } => match load_details(source, favorites, *id, *kind).await {
            Ok(state) => Page::Details(Box::new(state)),
            Err(e) => {
                error!("Failed to load details for {} {}: {:#}", kind, id, e);
                Page::DetailsUnavailable
            }
        },
    }
}

pub async fn load_home<C, R>(source: &C, rng: &mut R) -> HomeState
where
    C: CatalogSource + ?Sized,
    R: Rng + ?Sized,
{
    let hero = match load_hero(source, rng).await {
        Ok(hero) => hero,
        Err(e) => {
            error!("Failed to load hero banner: {:#}", e);
            None
        }
    };
    HomeState {
        hero,
        categories: load_categories(source).await,
    }
}

pub async fn load_hero<C, R>(source: &C, rng: &mut R) -> Result<Option<MediaSummary>>
where
    C: CatalogSource + ?Sized,
    R: Rng + ?Sized,
{
    let data = source.get(&ApiRequest::new(ApiKind::Hero)).await?;
    let items = MediaSummary::list_from(&data, None);
    Ok(items.choose(rng).cloned())
}

// Categories load one after another, in display order. A failing category
// is left out.
pub async fn load_categories<C>(source: &C) -> Vec<CategoryState>
where
    C: CatalogSource + ?Sized,
{
    let mut loaded = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        match load_category(source, category, 1).await {
            Ok(state) => loaded.push(state),
            Err(e) => warn!("Skipping category {}: {:#}", category.title(), e),
        }
    }
    loaded
}

pub async fn load_category<C>(source: &C, category: Category, page: u32) -> Result<CategoryState>
where
    C: CatalogSource + ?Sized,
{
    let data = source
        .get(&ApiRequest::catalog(category.api(), page))
        .await
        .with_context(|| format!("category {}", category.id()))?;
    let mut items = MediaSummary::list_from(&data, category.kind_hint());
    items.truncate(CAROUSEL_LIMIT);
    Ok(CategoryState {
        category,
        items,
        pager: Pager::for_category(page, total_pages(&data)),
    })
}

pub async fn search<C>(source: &C, query: &str, page: u32) -> SearchState
where
    C: CatalogSource + ?Sized,
{
    let query = query.trim().to_string();
    if query.is_empty() {
        return SearchState {
            query,
            outcome: SearchOutcome::Prompt,
        };
    }

    let outcome = match source.get(&ApiRequest::search(&query, page)).await {
        Ok(data) => search_outcome(&data, page),
        Err(e) => {
            error!("Search for {:?} failed: {:#}", query, e);
            SearchOutcome::Failed
        }
    };
    SearchState { query, outcome }
}

fn search_outcome(data: &Value, page: u32) -> SearchOutcome {
    // Only movies and series survive ingestion; people and the like drop out.
    let items = MediaSummary::list_from(data, None);
    if items.is_empty() {
        return SearchOutcome::NoResults;
    }
    SearchOutcome::Results {
        items,
        pager: Pager::for_search(page, total_pages(data)),
    }
}

pub async fn load_favorites<C, S>(source: &C, favorites: &Favorites<S>) -> FavoritesState
where
    C: CatalogSource + ?Sized,
    S: KeyValueStore,
{
    let entries = favorites.list();
    if entries.is_empty() {
        return FavoritesState::Empty;
    }

    let lookups = entries.iter().map(|fav| async move {
        let request = ApiRequest::title(ApiKind::Details, fav.id, fav.kind);
        match source.get(&request).await {
            Ok(data) => MediaSummary::from_value(&data, Some(fav.kind)).map(|mut media| {
                media.kind = fav.kind;
                media
            }),
            Err(e) => {
                warn!("Failed to load favorite {} {}: {:#}", fav.kind, fav.id, e);
                None
            }
        }
    });
    let loaded: Vec<MediaSummary> = join_all(lookups).await.into_iter().flatten().collect();

    if loaded.is_empty() {
        FavoritesState::Failed
    } else {
        FavoritesState::Loaded(loaded)
    }
}

// The details lookup must succeed; cast, trailer and recommendations are
// fetched afterwards and each may fail without affecting the others.
pub async fn load_details<C, S>(
    source: &C,
    favorites: &Favorites<S>,
    id: i64,
    kind: MediaKind,
) -> Result<DetailsState>
where
    C: CatalogSource + ?Sized,
    S: KeyValueStore,
{
    let data = source
        .get(&ApiRequest::title(ApiKind::Details, id, kind))
        .await?;
    let details = MediaDetails::from_value(&data, kind)
        .ok_or_else(|| anyhow!("details body for {} {} is not a title", kind, id))?;

    let cast = match source
        .get(&ApiRequest::title(ApiKind::Credits, id, kind))
        .await
    {
        Ok(credits) => Section::Ready(CastMember::list_from(&credits, CAST_LIMIT)),
        Err(e) => {
            warn!("Cast unavailable for {} {}: {:#}", kind, id, e);
            Section::Failed
        }
    };

    let trailer = match source
        .get(&ApiRequest::title(ApiKind::Videos, id, kind))
        .await
    {
        Ok(videos) => Section::Ready(Trailer::select(&videos)),
        Err(e) => {
            warn!("Trailer unavailable for {} {}: {:#}", kind, id, e);
            Section::Failed
        }
    };

    let recommendations = match source
        .get(&ApiRequest::title(ApiKind::Recommendations, id, kind))
        .await
    {
        Ok(recs) => {
            let mut items = MediaSummary::list_from(&recs, None);
            items.truncate(RECOMMENDATION_LIMIT);
            Section::Ready(items)
        }
        Err(e) => {
            warn!("Recommendations unavailable for {} {}: {:#}", kind, id, e);
            Section::Failed
        }
    };

    Ok(DetailsState {
        is_favorite: favorites.contains(details.summary.id, kind),
        details,
        cast,
        trailer,
        recommendations,
    })
}

pub fn toggle_favorite<S: KeyValueStore>(
    favorites: &Favorites<S>,
    state: &mut DetailsState,
) -> Result<()> {
    let id = state.details.summary.id;
    let kind = state.details.summary.kind;
    if state.is_favorite {
        favorites.remove(id, kind)?;
    } else {
        favorites.add(id, kind)?;
    }
    state.is_favorite = !state.is_favorite;
    Ok(())
}

pub async fn resolve_player<C>(source: &C, id: i64, kind: MediaKind) -> Result<String>
where
    C: CatalogSource + ?Sized,
{
    let data = source
        .get(&ApiRequest::title(ApiKind::Player, id, kind))
        .await?;
    data.get("url")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("player response has no url"))
}
