use serde::{Deserialize, Deserializer, Serialize};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
    pub snippet: Snippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemId {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Snippet {
    pub title: String,
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnails {
    pub medium: Thumbnail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoDetails>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub id: String,
    pub content_details: ContentDetails,
    #[serde(default)]
    pub player: Option<Player>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentDetails {
    pub duration: String,
    #[serde(default)]
    pub definition: Option<String>,
}

/// Embed dimensions are only returned when the request sets `maxHeight` or `maxWidth`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(default, deserialize_with = "int64_field")]
    pub embed_width: Option<u64>,
    #[serde(default, deserialize_with = "int64_field")]
    pub embed_height: Option<u64>,
}

impl Player {
    pub fn orientation(&self) -> Option<Orientation> {
        let (width, height) = (self.embed_width?, self.embed_height?);
        Some(match height.cmp(&width) {
            std::cmp::Ordering::Greater => Orientation::Vertical,
            std::cmp::Ordering::Less => Orientation::Horizontal,
            std::cmp::Ordering::Equal => Orientation::Square,
        })
    }
}

// Google APIs encode int64 as JSON strings.
fn int64_field<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
    Square,
}

/// A search result before short-form filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCandidate {
    pub id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub duration_seconds: Option<u64>,
    pub orientation: Option<Orientation>,
    pub is_short: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub title: String,
    pub url: String,
    pub thumbnail_url: String,
}

impl Video {
    pub fn watch_url(video_id: &str) -> String {
        format!("{WATCH_URL}{video_id}")
    }
}

impl From<VideoCandidate> for Video {
    fn from(candidate: VideoCandidate) -> Self {
        Self {
            url: Video::watch_url(&candidate.id),
            title: candidate.title,
            thumbnail_url: candidate.thumbnail_url,
        }
    }
}
