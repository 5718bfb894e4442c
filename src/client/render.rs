use super::media::{CastMember, MediaDetails, MediaKind, MediaSummary, Trailer};
use super::pages::{
    CategoryState, DetailsState, FavoritesState, HomeState, Page, SearchOutcome, SearchState,
    Section,
};
use super::pagination::Pager;
use super::view::{View, NAV_ITEMS};

const SITE_NAME: &str = "NFLIX";
const VOID_TAGS: [&str; 4] = ["img", "meta", "input", "br"];

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    OpenDetails { id: i64, kind: MediaKind },
    Play { id: i64, kind: MediaKind },
    CategoryPage { category: &'static str, page: u32 },
    SearchPage { query: String, page: u32 },
    AddFavorite { id: i64, kind: MediaKind },
    RemoveFavorite { id: i64, kind: MediaKind },
    Share,
}

impl Action {
    pub fn encode(&self) -> String {
        match self {
            Action::OpenDetails { id, kind } => format!("open-details:{id}:{kind}"),
            Action::Play { id, kind } => format!("play:{id}:{kind}"),
            Action::CategoryPage { category, page } => format!("category-page:{category}:{page}"),
            Action::SearchPage { query, page } => {
                format!("search-page:{page}:{}", urlencoding::encode(query))
            }
            Action::AddFavorite { id, kind } => format!("favorite-add:{id}:{kind}"),
            Action::RemoveFavorite { id, kind } => format!("favorite-remove:{id}:{kind}"),
            Action::Share => "share".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
    pub action: Option<Action>,
}

pub fn el(tag: &'static str) -> Element {
    Element {
        tag,
        attrs: Vec::new(),
        children: Vec::new(),
        action: None,
    }
}

pub fn text(content: impl Into<String>) -> Node {
    Node::Text(content.into())
}

impl Element {
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, content: impl Into<String>) -> Self {
        self.child(text(content))
    }

    pub fn on_click(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn button_for(self, action: Option<Action>) -> Self {
        match action {
            Some(action) => self.on_click(action),
            None => self.attr("disabled", "disabled"),
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(content) => out.push_str(&escape(content)),
            Node::Element(element) => {
                out.push('<');
                out.push_str(element.tag);
                for (name, value) in &element.attrs {
                    out.push_str(&format!(" {name}=\"{}\"", escape(value)));
                }
                if let Some(action) = &element.action {
                    out.push_str(&format!(" data-action=\"{}\"", escape(&action.encode())));
                }
                out.push('>');
                if VOID_TAGS.contains(&element.tag) {
                    return;
                }
                for child in &element.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(element.tag);
                out.push('>');
            }
        }
    }

    pub fn actions(&self) -> Vec<&Action> {
        let mut found = Vec::new();
        self.collect_actions(&mut found);
        found
    }

    fn collect_actions<'a>(&'a self, found: &mut Vec<&'a Action>) {
        if let Node::Element(element) = self {
            if let Some(action) = &element.action {
                found.push(action);
            }
            for child in &element.children {
                child.collect_actions(found);
            }
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        match self {
            Node::Text(_) => None,
            Node::Element(element) => {
                if element.get_attr("id") == Some(id) {
                    return Some(element);
                }
                element.children.iter().find_map(|c| c.find_by_id(id))
            }
        }
    }

    pub fn text_content(&self) -> String {
        match self {
            Node::Text(content) => content.clone(),
            Node::Element(element) => element.children.iter().map(Node::text_content).collect(),
        }
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub image: String,
}

impl PageMeta {
    pub fn render(&self) -> Node {
        el("head")
            .child(el("title").text(format!("{} - {SITE_NAME}", self.title)))
            .child(
                el("meta")
                    .attr("name", "description")
                    .attr("content", self.description.clone()),
            )
            .child(og("og:title", &self.title))
            .child(og("og:description", &self.description))
            .child(og("og:image", &self.image))
            .into()
    }
}

fn og(property: &'static str, content: &str) -> Element {
    el("meta")
        .attr("property", property)
        .attr("content", content)
}

pub fn placeholder(message: &str) -> Node {
    el("p").class("placeholder").text(message).into()
}

pub fn media_item(item: &MediaSummary) -> Node {
    el("div")
        .class("item")
        .attr("data-id", item.id.to_string())
        .attr("data-type", item.kind.as_str())
        .on_click(Action::OpenDetails {
            id: item.id,
            kind: item.kind,
        })
        .child(
            el("img")
                .class("item-poster")
                .attr("src", item.poster_url())
                .attr("alt", item.title.clone())
                .attr("loading", "lazy"),
        )
        .into()
}

pub fn grid_item(item: &MediaSummary) -> Node {
    el("div")
        .class("grid-item")
        .attr("data-id", item.id.to_string())
        .attr("data-type", item.kind.as_str())
        .on_click(Action::OpenDetails {
            id: item.id,
            kind: item.kind,
        })
        .child(
            el("img")
                .class("grid-poster")
                .attr("src", item.poster_url())
                .attr("alt", item.title.clone())
                .attr("loading", "lazy"),
        )
        .child(el("div").class("grid-title").text(item.title.clone()))
        .into()
}

pub fn hero(media: &MediaSummary) -> Node {
    el("section")
        .id("hero")
        .attr(
            "style",
            format!("background-image: url({})", media.backdrop_url()),
        )
        .child(el("h1").id("hero-title").text(media.title.clone()))
        .child(el("p").id("hero-desc").text(media.short_overview()))
        .child(
            el("button")
                .id("hero-play")
                .text("Assistir")
                .on_click(Action::Play {
                    id: media.id,
                    kind: media.kind,
                }),
        )
        .child(
            el("button")
                .id("hero-info")
                .text("Mais informações")
                .on_click(Action::OpenDetails {
                    id: media.id,
                    kind: media.kind,
                }),
        )
        .into()
}

pub fn category_pagination(state: &CategoryState) -> Node {
    let id = state.category.id();
    let pager = state.pager;
    el("div")
        .class("category-pagination")
        .id(format!("pagination-{id}"))
        .child(
            el("button")
                .class("category-pagination-btn")
                .text("‹")
                .button_for(pager.prev().map(|page| Action::CategoryPage { category: id, page })),
        )
        .child(
            el("span")
                .class("category-pagination-info")
                .text(pager.label()),
        )
        .child(
            el("button")
                .class("category-pagination-btn")
                .text("›")
                .button_for(pager.next().map(|page| Action::CategoryPage { category: id, page })),
        )
        .into()
}

pub fn category_section(state: &CategoryState) -> Node {
    let id = state.category.id();
    el("div")
        .class("category")
        .id(format!("category-{id}"))
        .child(
            el("h2")
                .class("section-title")
                .text(state.category.title())
                .child(
                    el("span")
                        .class("view-all")
                        .text("Ver Mais")
                        .button_for(state.pager.next().map(|page| Action::CategoryPage {
                            category: id,
                            page,
                        })),
                ),
        )
        .child(
            el("div")
                .class("carousel")
                .id(id)
                .children(state.items.iter().map(media_item)),
        )
        .child(category_pagination(state))
        .into()
}

pub fn search_pagination(query: &str, pager: Pager) -> Node {
    el("div")
        .id("search-pagination")
        .child(
            el("button")
                .class("pagination-btn")
                .text("Anterior")
                .button_for(pager.prev().map(|page| Action::SearchPage {
                    query: query.to_string(),
                    page,
                })),
        )
        .child(el("span").class("pagination-info").text(pager.label()))
        .child(
            el("button")
                .class("pagination-btn")
                .text("Próxima")
                .button_for(pager.next().map(|page| Action::SearchPage {
                    query: query.to_string(),
                    page,
                })),
        )
        .into()
}

pub fn render_home(state: &HomeState) -> Node {
    let mut page = el("div").class("page").attr("data-page", "home");
    if let Some(media) = &state.hero {
        page = page.child(hero(media));
    }
    page.child(
        el("div")
            .id("categories-container")
            .children(state.categories.iter().map(category_section)),
    )
    .into()
}

pub fn render_search(state: &SearchState) -> Node {
    let results = el("div").id("search-results");
    let results = match &state.outcome {
        SearchOutcome::Prompt => results.child(placeholder("Digite um termo de pesquisa")),
        SearchOutcome::NoResults => results.child(placeholder("Nenhum resultado encontrado")),
        SearchOutcome::Failed => results.child(placeholder("Erro ao pesquisar")),
        SearchOutcome::Results { items, .. } => results.children(items.iter().map(grid_item)),
    };
    let mut page = el("div")
        .class("page")
        .attr("data-page", "search")
        .child(
            el("input")
                .id("search-input")
                .attr("type", "search")
                .attr("value", state.query.clone()),
        )
        .child(results);
    if let SearchOutcome::Results { pager, .. } = &state.outcome {
        page = page.child(search_pagination(&state.query, *pager));
    }
    page.into()
}

pub fn render_favorites(state: &FavoritesState) -> Node {
    let container = el("div").id("favorites-container");
    let container = match state {
        FavoritesState::Empty => container.child(placeholder("Nenhum favorito encontrado")),
        FavoritesState::Failed => container.child(placeholder("Erro ao carregar favoritos")),
        FavoritesState::Loaded(items) => container.children(items.iter().map(grid_item)),
    };
    el("div")
        .class("page")
        .attr("data-page", "favorites")
        .child(container)
        .into()
}

pub fn favorite_button(id: i64, kind: MediaKind, is_favorite: bool) -> Node {
    let button = el("button").id("details-favorite");
    if is_favorite {
        button
            .text("✓ Na Minha Lista")
            .on_click(Action::RemoveFavorite { id, kind })
            .into()
    } else {
        button
            .text("+ Minha Lista")
            .on_click(Action::AddFavorite { id, kind })
            .into()
    }
}

pub fn details_meta(details: &MediaDetails) -> Node {
    el("div")
        .id("details-meta")
        .child(el("span").text(details.year()))
        .child(el("span").text(details.length_label()))
        .child(el("span").text(details.rating_label()))
        .into()
}

pub fn cast_list(cast: &Section<Vec<CastMember>>) -> Node {
    let container = el("div").id("cast-container");
    let node = match cast {
        Section::Failed => container.child(placeholder("Erro ao carregar elenco")),
        Section::Ready(members) if members.is_empty() => {
            container.child(placeholder("Elenco não disponível"))
        }
        Section::Ready(members) => container.children(members.iter().map(|person| {
            el("div")
                .class("cast-member")
                .child(
                    el("img")
                        .class("cast-photo")
                        .attr("src", person.photo_url())
                        .attr("alt", person.name.clone()),
                )
                .child(el("div").class("cast-name").text(person.name.clone()))
                .child(
                    el("div")
                        .class("cast-character")
                        .text(person.character.clone().unwrap_or_default()),
                )
        })),
    };
    node.into()
}

pub fn trailer(trailer: &Section<Option<Trailer>>) -> Node {
    let container = el("div").id("trailer");
    let node = match trailer {
        Section::Ready(Some(t)) => container.child(
            el("iframe")
                .id("trailer-video")
                .attr("src", t.embed_url())
                .attr("allowfullscreen", "allowfullscreen"),
        ),
        Section::Ready(None) => container.child(
            el("p")
                .id("trailer-placeholder")
                .text("Trailer não disponível"),
        ),
        Section::Failed => container.child(
            el("p")
                .id("trailer-placeholder")
                .text("Erro ao carregar trailer"),
        ),
    };
    node.into()
}

pub fn recommendations(recs: &Section<Vec<MediaSummary>>) -> Node {
    let carousel = el("div").id("recommendations-carousel").class("carousel");
    let node = match recs {
        Section::Failed => carousel.child(placeholder("Erro ao carregar recomendações")),
        Section::Ready(items) if items.is_empty() => {
            carousel.child(placeholder("Nenhuma recomendação disponível"))
        }
        Section::Ready(items) => carousel.children(items.iter().map(media_item)),
    };
    node.into()
}

pub fn render_details(state: &DetailsState) -> Node {
    let details = &state.details;
    let media = &details.summary;
    let overview = if media.overview.is_empty() {
        "Descrição não disponível.".to_string()
    } else {
        media.overview.clone()
    };
    el("div")
        .class("page")
        .attr("data-page", "details")
        .child(
            el("header")
                .id("details-header")
                .attr(
                    "style",
                    format!("background-image: url({})", media.backdrop_url()),
                )
                .child(
                    el("img")
                        .id("details-poster")
                        .attr("src", media.poster_url())
                        .attr("alt", media.title.clone()),
                )
                .child(el("h1").id("details-title").text(media.title.clone()))
                .child(details_meta(details))
                .child(el("p").id("details-overview").text(overview)),
        )
        .child(
            el("div")
                .class("details-actions")
                .child(
                    el("button")
                        .id("details-play")
                        .text("Assistir")
                        .on_click(Action::Play {
                            id: media.id,
                            kind: media.kind,
                        }),
                )
                .child(favorite_button(media.id, media.kind, state.is_favorite))
                .child(
                    el("button")
                        .id("details-share")
                        .text("Compartilhar")
                        .on_click(Action::Share),
                ),
        )
        .child(trailer(&state.trailer))
        .child(cast_list(&state.cast))
        .child(recommendations(&state.recommendations))
        .into()
}

pub fn bottom_nav(view: &View) -> Node {
    el("nav")
        .class("bottom-nav")
        .children(NAV_ITEMS.iter().map(|(page, href, label)| {
            let class = if view.is_nav_active(page) {
                "nav-item active"
            } else {
                "nav-item"
            };
            el("a").class(class).attr("href", *href).text(*label)
        }))
        .into()
}

pub fn page_meta(page: &Page) -> Option<PageMeta> {
    match page {
        Page::Home(HomeState {
            hero: Some(media), ..
        }) => Some(PageMeta {
            title: media.title.clone(),
            description: media.short_overview(),
            image: media.backdrop_url(),
        }),
        Page::Details(state) => {
            let media = &state.details.summary;
            Some(PageMeta {
                title: media.title.clone(),
                description: if media.overview.is_empty() {
                    format!("Assista agora no {SITE_NAME}")
                } else {
                    media.overview.clone()
                },
                image: media.backdrop_url(),
            })
        }
        _ => None,
    }
}

pub fn render_page(view: &View, page: &Page) -> Node {
    let body = match page {
        Page::Home(state) => render_home(state),
        Page::Search(state) => render_search(state),
        Page::Favorites(state) => render_favorites(state),
        Page::Details(state) => render_details(state),
        Page::DetailsUnavailable => el("div")
            .class("page")
            .attr("data-page", "details")
            .child(placeholder("Erro ao carregar detalhes"))
            .into(),
    };
    let mut document = el("html");
    if let Some(meta) = page_meta(page) {
        document = document.child(meta.render());
    }
    document
        .child(el("body").child(body).child(bottom_nav(view)))
        .into()
}
