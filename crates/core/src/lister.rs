use std::collections::HashMap;

use futures::future::try_join_all;
use tracing::{info, warn};

use crate::{
    duration::{ShortsRule, parse_iso8601_duration},
    error::{Result, TubemarkError},
    types::{SearchItem, Video, VideoCandidate, VideoDetails},
    youtube::{SearchOrder, YoutubeClient},
};

pub const DEFAULT_FETCH_LIMIT: u32 = 15;
pub const DEFAULT_MAX_VIDEOS: usize = 9;

/// How per-video details are requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DetailsMode {
    /// One `videos` request with every id.
    #[default]
    Batched,
    /// One request per id, awaited together.
    Concurrent,
}

#[derive(Clone, Debug)]
pub struct ListOptions {
    pub channel_id: String,
    pub order: SearchOrder,
    pub fetch_limit: u32,
    pub max_videos: usize,
    pub rule: ShortsRule,
    pub details_mode: DetailsMode,
}

impl ListOptions {
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            order: SearchOrder::default(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            max_videos: DEFAULT_MAX_VIDEOS,
            rule: ShortsRule::default(),
            details_mode: DetailsMode::default(),
        }
    }
}

/// Search the channel, drop short-form clips and keep at most `max_videos`,
/// in the order the API returned them.
pub async fn list_videos(client: &YoutubeClient, options: &ListOptions) -> Result<Vec<Video>> {
    let items = client
        .search_channel(&options.channel_id, options.order, options.fetch_limit)
        .await?;
    let mut candidates = candidates_from_search(items);
    info!(
        channel = %options.channel_id,
        order = options.order.as_param(),
        count = candidates.len(),
        "fetched candidates"
    );

    if options.rule.needs_details() && !candidates.is_empty() {
        let ids: Vec<String> = candidates.iter().map(|c| c.id.clone()).collect();
        let details = fetch_details(client, &ids, options.details_mode).await?;
        classify(&mut candidates, &details, options.rule)?;
    }

    let videos = select_videos(candidates, options.max_videos);
    info!(rule = options.rule.name(), kept = videos.len(), "selected videos");
    Ok(videos)
}

fn candidates_from_search(items: Vec<SearchItem>) -> Vec<VideoCandidate> {
    items
        .into_iter()
        .filter_map(|item| {
            let Some(id) = item.id.video_id else {
                warn!(kind = ?item.id.kind, title = %item.snippet.title, "skipping non-video result");
                return None;
            };
            Some(VideoCandidate {
                id,
                title: item.snippet.title,
                thumbnail_url: item.snippet.thumbnails.medium.url,
                duration_seconds: None,
                orientation: None,
                is_short: false,
            })
        })
        .collect()
}

/// Details aligned with `ids`: `result[i]` always describes `ids[i]`.
async fn fetch_details(
    client: &YoutubeClient,
    ids: &[String],
    mode: DetailsMode,
) -> Result<Vec<VideoDetails>> {
    match mode {
        // try_join_all yields results in input order, not completion order.
        DetailsMode::Concurrent => try_join_all(ids.iter().map(|id| client.video_detail(id))).await,
        DetailsMode::Batched => {
            let fetched = client.video_details(ids).await?;
            let by_id: HashMap<&str, &VideoDetails> =
                fetched.iter().map(|d| (d.id.as_str(), d)).collect();
            ids.iter()
                .map(|id| {
                    by_id
                        .get(id.as_str())
                        .map(|d| (*d).clone())
                        .ok_or_else(|| TubemarkError::MissingDetails {
                            video_id: id.clone(),
                        })
                })
                .collect()
        }
    }
}

fn classify(
    candidates: &mut [VideoCandidate],
    details: &[VideoDetails],
    rule: ShortsRule,
) -> Result<()> {
    for (candidate, detail) in candidates.iter_mut().zip(details) {
        let duration = &detail.content_details.duration;
        // Rules that need the number parse it themselves and fail there.
        candidate.duration_seconds = parse_iso8601_duration(duration).ok();
        candidate.orientation = detail.player.as_ref().and_then(|p| p.orientation());
        candidate.is_short = rule.is_short(duration, candidate.orientation)?;
    }
    Ok(())
}

/// Drop short-form clips and cap the list, preserving relative order.
pub fn select_videos(candidates: Vec<VideoCandidate>, max_videos: usize) -> Vec<Video> {
    candidates
        .into_iter()
        .filter(|c| !c.is_short)
        .take(max_videos)
        .map(Video::from)
        .collect()
}
