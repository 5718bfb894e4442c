use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKind {
    Hero,
    Movies,
    Tv,
    Anime,
    Search,
    Details,
    Credits,
    Recommendations,
    Videos,
    Player,
}

impl ApiKind {
    pub fn parse(value: &str) -> Option<Self> {
        let kind = match value {
            "hero" => ApiKind::Hero,
            "movies" => ApiKind::Movies,
            "tv" => ApiKind::Tv,
            "anime" => ApiKind::Anime,
            "search" => ApiKind::Search,
            "details" => ApiKind::Details,
            "credits" => ApiKind::Credits,
            "recommendations" => ApiKind::Recommendations,
            "videos" => ApiKind::Videos,
            "player" => ApiKind::Player,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiKind::Hero => "hero",
            ApiKind::Movies => "movies",
            ApiKind::Tv => "tv",
            ApiKind::Anime => "anime",
            ApiKind::Search => "search",
            ApiKind::Details => "details",
            ApiKind::Credits => "credits",
            ApiKind::Recommendations => "recommendations",
            ApiKind::Videos => "videos",
            ApiKind::Player => "player",
        }
    }
}

impl fmt::Display for ApiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataParams {
    pub api: Option<ApiKind>,
    pub page: i64,
    pub id: i64,
    pub media_type: String,
    pub query: String,
}

impl MetadataParams {
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        Self {
            api: params.get("api").and_then(|v| ApiKind::parse(v)),
            page: int_or(params.get("page"), 1),
            id: int_or(params.get("id"), 0),
            media_type: first_non_empty(&[params.get("media_type"), params.get("type")])
                .unwrap_or_else(|| "movie".to_string()),
            query: params.get("query").cloned().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityParams {
    pub id: i64,
    pub media_type: String,
}

impl AvailabilityParams {
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        Self {
            id: int_or(params.get("id"), 0),
            media_type: first_non_empty(&[params.get("type")])
                .unwrap_or_else(|| "movie".to_string()),
        }
    }
}

fn first_non_empty(candidates: &[Option<&String>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .find(|v| !v.is_empty())
        .map(|v| v.to_string())
}

// `parseInt(value) || default`: a missing, unparsable or zero value yields the default.
fn int_or(value: Option<&String>, default: i64) -> i64 {
    value
        .and_then(|v| parse_leading_int(v))
        .filter(|n| *n != 0)
        .unwrap_or(default)
}

pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Overflow counts as unparsable.
    let magnitude = digits[..end].bytes().try_fold(0i64, |acc, b| {
        acc.checked_mul(10)?.checked_add(i64::from(b - b'0'))
    })?;
    Some(if negative { -magnitude } else { magnitude })
}
