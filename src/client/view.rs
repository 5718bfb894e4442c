use super::media::MediaKind;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Home,
    Search { query: String },
    Favorites,
    Details { id: i64, kind: MediaKind },
}

pub const NAV_ITEMS: [(&str, &str, &str); 3] = [
    ("home", "?page=home", "Início"),
    ("search", "?page=search", "Buscar"),
    ("favorites", "?page=favorites", "Minha Lista"),
];

impl View {
    pub fn from_query(query: &str) -> Self {
        let params = parse_pairs(query);
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        match get("page").unwrap_or("home") {
            "search" => View::Search {
                query: get("q").unwrap_or_default().trim().to_string(),
            },
            "favorites" => View::Favorites,
            "details" => {
                let id = get("id")
                    .and_then(|v| v.trim().parse::<i64>().ok())
                    .filter(|id| *id > 0);
                let kind = get("type").and_then(MediaKind::parse);
                match (id, kind) {
                    (Some(id), Some(kind)) => View::Details { id, kind },
                    _ => View::Home,
                }
            }
            _ => View::Home,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::Search { .. } => "search",
            View::Favorites => "favorites",
            View::Details { .. } => "details",
        }
    }

    pub fn href(&self) -> String {
        match self {
            View::Home => "?page=home".to_string(),
            View::Search { query } if query.is_empty() => "?page=search".to_string(),
            View::Search { query } => {
                format!("?page=search&q={}", urlencoding::encode(query))
            }
            View::Favorites => "?page=favorites".to_string(),
            View::Details { id, kind } => format!("?page=details&id={id}&type={kind}"),
        }
    }

    pub fn is_nav_active(&self, nav_page: &str) -> bool {
        self.name() == nav_page
    }
}

fn parse_pairs(query: &str) -> Vec<(String, String)> {
    serde_urlencoded::from_str(query.trim_start_matches('?')).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_home() {
        assert_eq!(View::from_query(""), View::Home);
        assert_eq!(View::from_query("?page=nowhere"), View::Home);
    }

    #[test]
    fn search_query_is_decoded() {
        assert_eq!(
            View::from_query("?page=search&q=matrix+reloaded%21"),
            View::Search {
                query: "matrix reloaded!".to_string()
            }
        );
    }

    #[test]
    fn encoded_separators_stay_in_values() {
        assert_eq!(
            View::from_query("page=search&&q=tom+%26+jerry&flag"),
            View::Search {
                query: "tom & jerry".to_string()
            }
        );
        assert_eq!(View::from_query("?q=x&page=favorites"), View::Favorites);
    }

    #[test]
    fn details_needs_id_and_type() {
        assert_eq!(
            View::from_query("page=details&id=550&type=movie"),
            View::Details {
                id: 550,
                kind: MediaKind::Movie
            }
        );
        assert_eq!(View::from_query("page=details&id=550"), View::Home);
        assert_eq!(View::from_query("page=details&id=0&type=tv"), View::Home);
        assert_eq!(View::from_query("page=details&id=5&type=person"), View::Home);
    }

    #[test]
    fn href_round_trips() {
        for view in [
            View::Home,
            View::Favorites,
            View::Search {
                query: "cidade de deus".to_string(),
            },
            View::Details {
                id: 1399,
                kind: MediaKind::Series,
            },
        ] {
            assert_eq!(View::from_query(&view.href()), view);
        }
    }

    #[test]
    fn nav_highlights_current_view() {
        let view = View::Favorites;
        let active: Vec<&str> = NAV_ITEMS
            .iter()
            .filter(|(page, _, _)| view.is_nav_active(page))
            .map(|(page, _, _)| *page)
            .collect();
        assert_eq!(active, vec!["favorites"]);
    }
}
