pub mod api;
pub mod favorites;
pub mod media;
pub mod pages;
pub mod pagination;
pub mod render;
pub mod view;

pub use api::{ApiRequest, CatalogSource, ProxyClient};
pub use favorites::{Favorite, Favorites, FileStore, KeyValueStore, MemoryStore};
pub use media::{MediaKind, MediaSummary};
pub use pages::{load_page, Page};
pub use render::render_page;
pub use view::View;
