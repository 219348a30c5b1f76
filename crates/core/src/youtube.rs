use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    config::ApiConfig,
    error::{Result, TubemarkError},
    types::{SearchItem, SearchResponse, VideoDetails, VideoListResponse},
};

/// Largest page the search and videos endpoints will return.
pub const MAX_PAGE_SIZE: u32 = 50;

// Any value works, it only makes the API include embedWidth/embedHeight.
const PLAYER_MAX_HEIGHT: &str = "8192";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchOrder {
    #[default]
    Date,
    ViewCount,
}

impl SearchOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SearchOrder::Date => "date",
            SearchOrder::ViewCount => "viewCount",
        }
    }
}

/// Thin client over the two read-only YouTube Data API endpoints we use.
#[derive(Clone, Debug)]
pub struct YoutubeClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl YoutubeClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub async fn search_channel(
        &self,
        channel_id: &str,
        order: SearchOrder,
        max_results: u32,
    ) -> Result<Vec<SearchItem>> {
        let response: SearchResponse = self
            .get(
                "search",
                &[
                    ("channelId", channel_id.to_string()),
                    ("part", "snippet,id".to_string()),
                    ("order", order.as_param().to_string()),
                    ("maxResults", max_results.clamp(1, MAX_PAGE_SIZE).to_string()),
                    ("type", "video".to_string()),
                ],
            )
            .await?;
        Ok(response.items)
    }

    /// Fetch details for many ids in one request. The response order is not
    /// guaranteed to follow `ids`, and unknown ids are silently dropped.
    pub async fn video_details(&self, ids: &[String]) -> Result<Vec<VideoDetails>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let response: VideoListResponse = self
            .get(
                "videos",
                &[
                    ("id", ids.join(",")),
                    ("part", "contentDetails,player".to_string()),
                    ("maxHeight", PLAYER_MAX_HEIGHT.to_string()),
                ],
            )
            .await?;
        Ok(response.items)
    }

    pub async fn video_detail(&self, id: &str) -> Result<VideoDetails> {
        self.video_details(&[id.to_string()])
            .await?
            .into_iter()
            .find(|details| details.id == id)
            .ok_or_else(|| TubemarkError::MissingDetails {
                video_id: id.to_string(),
            })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);
        debug!(%url, ?params, "GET");

        // The key travels in the query string; reqwest errors would echo it back.
        let response = self
            .http
            .get(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| e.without_url())?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TubemarkError::ApiStatus {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| e.without_url())?;
        Ok(serde_json::from_str(&body)?)
    }
}
