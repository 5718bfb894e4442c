use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
const BACKDROP_PLACEHOLDER: &str = "https://via.placeholder.com/1920x1080?text=NFLIX";
const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/500x750?text=Sem+Imagem";
const PROFILE_PLACEHOLDER: &str = "https://via.placeholder.com/200x300?text=Sem+Imagem";
pub const OVERVIEW_LIMIT: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl MediaKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(MediaKind::Movie),
            "tv" => Some(MediaKind::Series),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct RawMedia {
    id: i64,
    title: Option<String>,
    name: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f64>,
    media_type: Option<String>,
    runtime: Option<u32>,
    number_of_seasons: Option<u32>,
    release_date: Option<String>,
    first_air_date: Option<String>,
}

impl RawMedia {
    // Decides the kind once. An explicit `media_type` wins, then the caller's
    // hint, then the presence of `title`. Non-video types yield `None`.
    fn kind(&self, hint: Option<MediaKind>) -> Option<MediaKind> {
        match self.media_type.as_deref() {
            Some(t) if !t.is_empty() => MediaKind::parse(t),
            _ => Some(hint.unwrap_or(if self.title.is_some() {
                MediaKind::Movie
            } else {
                MediaKind::Series
            })),
        }
    }

    fn into_summary(self, kind: MediaKind) -> MediaSummary {
        MediaSummary {
            id: self.id,
            kind,
            title: self.title.or(self.name).unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path.filter(|p| !p.is_empty()),
            backdrop_path: self.backdrop_path.filter(|p| !p.is_empty()),
            vote_average: self.vote_average,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaSummary {
    pub id: i64,
    pub kind: MediaKind,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
}

impl MediaSummary {
    pub fn from_value(value: &Value, hint: Option<MediaKind>) -> Option<Self> {
        let raw = RawMedia::deserialize(value).ok()?;
        let kind = raw.kind(hint)?;
        Some(raw.into_summary(kind))
    }

    pub fn list_from(value: &Value, hint: Option<MediaKind>) -> Vec<Self> {
        value
            .get("results")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| Self::from_value(item, hint))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn poster_url(&self) -> String {
        image_url("w500", self.poster_path.as_deref(), POSTER_PLACEHOLDER)
    }

    pub fn backdrop_url(&self) -> String {
        image_url("original", self.backdrop_path.as_deref(), BACKDROP_PLACEHOLDER)
    }

    pub fn short_overview(&self) -> String {
        truncate_overview(&self.overview)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaDetails {
    pub summary: MediaSummary,
    pub runtime: Option<u32>,
    pub number_of_seasons: Option<u32>,
    pub release_date: Option<String>,
}

impl MediaDetails {
    pub fn from_value(value: &Value, kind: MediaKind) -> Option<Self> {
        let raw = RawMedia::deserialize(value).ok()?;
        let runtime = raw.runtime.filter(|r| *r > 0);
        let number_of_seasons = raw.number_of_seasons.filter(|n| *n > 0);
        let release_date = raw
            .release_date
            .clone()
            .filter(|d| !d.is_empty())
            .or_else(|| raw.first_air_date.clone().filter(|d| !d.is_empty()));
        Some(Self {
            summary: raw.into_summary(kind),
            runtime,
            number_of_seasons,
            release_date,
        })
    }

    pub fn year(&self) -> String {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
            .unwrap_or("N/A")
            .to_string()
    }

    pub fn length_label(&self) -> String {
        match self.summary.kind {
            MediaKind::Movie => match self.runtime {
                Some(minutes) => format!("{}h {}m", minutes / 60, minutes % 60),
                None => "N/A".to_string(),
            },
            MediaKind::Series => match self.number_of_seasons {
                Some(1) => "1 temporada".to_string(),
                Some(n) => format!("{n} temporadas"),
                None => "N/A".to_string(),
            },
        }
    }

    pub fn rating_label(&self) -> String {
        match self.summary.vote_average.filter(|v| *v != 0.0) {
            Some(v) => format!("⭐ {v:.1}"),
            None => "⭐ N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

impl CastMember {
    pub fn photo_url(&self) -> String {
        image_url("w200", self.profile_path.as_deref(), PROFILE_PLACEHOLDER)
    }

    pub fn list_from(value: &Value, max: usize) -> Vec<Self> {
        value
            .get("cast")
            .and_then(Value::as_array)
            .map(|cast| {
                cast.iter()
                    .filter_map(|c| CastMember::deserialize(c).ok())
                    .take(max)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Video {
    pub key: String,
    pub site: String,
    #[serde(rename = "type", default)]
    pub video_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trailer {
    pub key: String,
}

impl Trailer {
    pub fn select(videos: &Value) -> Option<Self> {
        let youtube: Vec<Video> = videos
            .get("results")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(|v| Video::deserialize(v).ok())
                    .filter(|v| v.site == "YouTube")
                    .collect()
            })
            .unwrap_or_default();
        youtube
            .iter()
            .find(|v| v.video_type == "Trailer" || v.video_type == "Teaser")
            .or_else(|| youtube.first())
            .map(|v| Trailer { key: v.key.clone() })
    }

    pub fn embed_url(&self) -> String {
        format!(
            "https://www.youtube.com/embed/{}?rel=0&showinfo=0&autoplay=0",
            self.key
        )
    }
}

pub fn truncate_overview(overview: &str) -> String {
    if overview.chars().count() > OVERVIEW_LIMIT {
        let cut: String = overview.chars().take(OVERVIEW_LIMIT).collect();
        format!("{cut}...")
    } else {
        overview.to_string()
    }
}

fn image_url(size: &str, path: Option<&str>, placeholder: &str) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("{IMAGE_BASE}/{size}{p}"),
        _ => placeholder.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_comes_from_media_type_first() {
        let m = MediaSummary::from_value(
            &json!({"id": 1, "name": "Show", "media_type": "tv"}),
            Some(MediaKind::Movie),
        )
        .unwrap();
        assert_eq!(m.kind, MediaKind::Series);
        assert_eq!(m.title, "Show");
    }

    #[test]
    fn kind_is_inferred_from_title_without_hint() {
        let movie = MediaSummary::from_value(&json!({"id": 1, "title": "Film"}), None).unwrap();
        let show = MediaSummary::from_value(&json!({"id": 2, "name": "Show"}), None).unwrap();
        assert_eq!(movie.kind, MediaKind::Movie);
        assert_eq!(show.kind, MediaKind::Series);
    }

    #[test]
    fn people_are_dropped() {
        let list = MediaSummary::list_from(
            &json!({"results": [
                {"id": 1, "title": "A", "media_type": "movie"},
                {"id": 2, "name": "Someone", "media_type": "person"},
                {"id": 3, "name": "B", "media_type": "tv"}
            ]}),
            None,
        );
        let ids: Vec<i64> = list.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn overview_is_capped_at_150_chars() {
        let long = "é".repeat(200);
        let short = truncate_overview(&long);
        assert_eq!(short.chars().count(), 153);
        assert!(short.ends_with("..."));
        let exact = "a".repeat(150);
        assert_eq!(truncate_overview(&exact), exact);
    }

    #[test]
    fn image_urls_fall_back_to_placeholders() {
        let m = MediaSummary::from_value(
            &json!({"id": 1, "title": "A", "poster_path": "/p.jpg", "backdrop_path": null}),
            None,
        )
        .unwrap();
        assert_eq!(m.poster_url(), "https://image.tmdb.org/t/p/w500/p.jpg");
        assert_eq!(m.backdrop_url(), BACKDROP_PLACEHOLDER);
    }

    #[test]
    fn details_labels() {
        let movie = MediaDetails::from_value(
            &json!({"id": 550, "title": "Fight Club", "runtime": 139, "release_date": "1999-10-15", "vote_average": 8.433}),
            MediaKind::Movie,
        )
        .unwrap();
        assert_eq!(movie.year(), "1999");
        assert_eq!(movie.length_label(), "2h 19m");
        assert_eq!(movie.rating_label(), "⭐ 8.4");

        let show = MediaDetails::from_value(
            &json!({"id": 1399, "name": "GoT", "number_of_seasons": 8, "first_air_date": "2011-04-17", "vote_average": 0}),
            MediaKind::Series,
        )
        .unwrap();
        assert_eq!(show.year(), "2011");
        assert_eq!(show.length_label(), "8 temporadas");
        assert_eq!(show.rating_label(), "⭐ N/A");

        let bare = MediaDetails::from_value(&json!({"id": 2, "name": "X", "number_of_seasons": 1}), MediaKind::Series)
            .unwrap();
        assert_eq!(bare.year(), "N/A");
        assert_eq!(bare.length_label(), "1 temporada");
    }

    #[test]
    fn trailer_prefers_official_youtube_videos() {
        let videos = json!({"results": [
            {"key": "vimeo1", "site": "Vimeo", "type": "Trailer"},
            {"key": "clip", "site": "YouTube", "type": "Clip"},
            {"key": "teaser", "site": "YouTube", "type": "Teaser"}
        ]});
        assert_eq!(Trailer::select(&videos).unwrap().key, "teaser");

        let only_clips = json!({"results": [{"key": "clip", "site": "YouTube", "type": "Clip"}]});
        assert_eq!(Trailer::select(&only_clips).unwrap().key, "clip");

        assert_eq!(Trailer::select(&json!({"results": []})), None);
    }
}
