use std::{path::Path, time::Duration};

use serde_json::{Value, json};
use tempfile::TempDir;
use tubemark_core::{
    ApiConfig, DEFAULT_TAG, DetailsMode, ListOptions, MarkerPair, MarkupStyle, SearchOrder,
    ShortsRule, TubemarkError, UpdateOutcome, Video, YoutubeClient, list_videos, update_document,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const CHANNEL: &str = "UCtest";
const README: &str = "# Hello\n\nIntro.\n\n<!-- YOUTUBE-LATEST-VIDEOS:START -->\nstale\n<!-- YOUTUBE-LATEST-VIDEOS:END -->\n\nFooter.\n";

/// Positions of the 15 search results that are sub-minute clips.
const SHORT_POSITIONS: [usize; 6] = [0, 2, 5, 6, 10, 14];

fn search_body(count: usize) -> Value {
    let items: Vec<Value> = (0..count)
        .map(|n| {
            json!({
                "kind": "youtube#searchResult",
                "id": {"kind": "youtube#video", "videoId": format!("vid{n}")},
                "snippet": {
                    "title": format!("Video {n}"),
                    "thumbnails": {
                        "default": {"url": format!("https://i.ytimg.com/vi/vid{n}/default.jpg")},
                        "medium": {"url": format!("https://i.ytimg.com/vi/vid{n}/mqdefault.jpg")}
                    }
                }
            })
        })
        .collect();
    json!({"kind": "youtube#searchListResponse", "items": items})
}

fn detail(n: usize) -> Value {
    let duration = if SHORT_POSITIONS.contains(&n) {
        "PT42S".to_string()
    } else {
        format!("PT{}M{}S", n + 1, n)
    };
    json!({
        "id": format!("vid{n}"),
        "contentDetails": {"duration": duration, "definition": "hd"},
        "player": {"embedWidth": "480", "embedHeight": "270"}
    })
}

fn client(server: &MockServer) -> YoutubeClient {
    YoutubeClient::new(ApiConfig::new("test-key").with_base_url(server.uri()))
}

async fn mount_search(server: &MockServer, count: usize) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("channelId", CHANNEL))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(count)))
        .mount(server)
        .await;
}

fn readme_in(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("README.md");
    std::fs::write(&path, README).unwrap();
    path
}

async fn run(
    client: &YoutubeClient,
    options: &ListOptions,
    path: &Path,
) -> tubemark_core::Result<UpdateOutcome> {
    let videos = list_videos(client, options).await?;
    let markers = MarkerPair::new(DEFAULT_TAG)?;
    update_document(path, &markers, &videos, MarkupStyle::Markdown, false).await
}

fn titles(videos: &[Video]) -> Vec<&str> {
    videos.iter().map(|v| v.title.as_str()).collect()
}

const EXPECTED_TITLES: [&str; 9] = [
    "Video 1", "Video 3", "Video 4", "Video 7", "Video 8", "Video 9", "Video 11", "Video 12",
    "Video 13",
];

#[tokio::test]
async fn drops_shorts_and_caps_at_nine_in_search_order() {
    let server = MockServer::start().await;
    mount_search(&server, 15).await;

    // Details come back reversed; they must be matched by id, not position.
    let reversed: Vec<Value> = (0..15).rev().map(detail).collect();
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("part", "contentDetails,player"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": reversed})))
        .expect(1)
        .mount(&server)
        .await;

    let videos = list_videos(&client(&server), &ListOptions::new(CHANNEL))
        .await
        .unwrap();

    assert_eq!(titles(&videos), EXPECTED_TITLES);
    assert_eq!(videos[0].url, "https://www.youtube.com/watch?v=vid1");
    assert_eq!(
        videos[0].thumbnail_url,
        "https://i.ytimg.com/vi/vid1/mqdefault.jpg"
    );
}

#[tokio::test]
async fn concurrent_details_keep_search_order() {
    let server = MockServer::start().await;
    mount_search(&server, 15).await;

    // Earlier ids answer slower, so completion order is the reverse of input order.
    for n in 0..15 {
        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("id", format!("vid{n}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"items": [detail(n)]}))
                    .set_delay(Duration::from_millis(10 * (15 - n as u64))),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let options = ListOptions {
        details_mode: DetailsMode::Concurrent,
        ..ListOptions::new(CHANNEL)
    };
    let videos = list_videos(&client(&server), &options).await.unwrap();

    assert_eq!(titles(&videos), EXPECTED_TITLES);
}

#[tokio::test]
async fn view_count_order_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("order", "viewCount"))
        .and(query_param("maxResults", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(3)))
        .expect(1)
        .mount(&server)
        .await;

    let options = ListOptions {
        order: SearchOrder::ViewCount,
        rule: ShortsRule::None,
        ..ListOptions::new(CHANNEL)
    };
    let videos = list_videos(&client(&server), &options).await.unwrap();
    assert_eq!(titles(&videos), ["Video 0", "Video 1", "Video 2"]);
}

#[tokio::test]
async fn no_details_request_without_a_shorts_rule() {
    let server = MockServer::start().await;
    mount_search(&server, 12).await;
    Mock::given(path("/videos"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let options = ListOptions {
        rule: ShortsRule::None,
        ..ListOptions::new(CHANNEL)
    };
    let videos = list_videos(&client(&server), &options).await.unwrap();
    assert_eq!(videos.len(), 9);
}

#[tokio::test]
async fn search_failure_aborts_before_any_write() {
    let server = MockServer::start().await;
    Mock::given(path("/search"))
        .respond_with(ResponseTemplate::new(403).set_body_string("quotaExceeded"))
        .mount(&server)
        .await;
    Mock::given(path("/videos"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let readme = readme_in(&dir);

    let err = run(&client(&server), &ListOptions::new(CHANNEL), &readme)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TubemarkError::ApiStatus { endpoint: "search", status: 403, ref body } if body == "quotaExceeded"
    ));
    assert_eq!(std::fs::read_to_string(&readme).unwrap(), README);
}

#[tokio::test]
async fn details_failure_aborts_before_any_write() {
    let server = MockServer::start().await;
    mount_search(&server, 15).await;
    Mock::given(path("/videos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let readme = readme_in(&dir);

    let err = run(&client(&server), &ListOptions::new(CHANNEL), &readme)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TubemarkError::ApiStatus { endpoint: "videos", status: 500, .. }
    ));
    assert_eq!(std::fs::read_to_string(&readme).unwrap(), README);
}

#[tokio::test]
async fn vertical_rule_drops_only_vertical_clips() {
    let server = MockServer::start().await;
    mount_search(&server, 3).await;
    let items = json!([
        {
            "id": "vid0",
            "contentDetails": {"duration": "PT30S"},
            "player": {"embedWidth": "270", "embedHeight": "480"}
        },
        {
            "id": "vid1",
            "contentDetails": {"duration": "PT30S"},
            "player": {"embedWidth": "480", "embedHeight": "270"}
        },
        {
            "id": "vid2",
            "contentDetails": {"duration": "PT10M"},
            "player": {"embedWidth": 270, "embedHeight": 480}
        }
    ]);
    Mock::given(path("/videos"))
        .and(query_param("maxHeight", "8192"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": items})))
        .expect(1)
        .mount(&server)
        .await;

    let options = ListOptions {
        rule: ShortsRule::VerticalMinDuration,
        ..ListOptions::new(CHANNEL)
    };
    let videos = list_videos(&client(&server), &options).await.unwrap();

    assert_eq!(titles(&videos), ["Video 1", "Video 2"]);
}

#[tokio::test]
async fn transport_errors_do_not_expose_the_api_key() {
    let client = YoutubeClient::new(
        ApiConfig::new("SECRET-KEY-123").with_base_url("http://127.0.0.1:1"),
    );

    let err = list_videos(&client, &ListOptions::new(CHANNEL))
        .await
        .unwrap_err();

    assert!(matches!(err, TubemarkError::Http(_)));
    let message = err.to_string();
    assert!(!message.contains("SECRET-KEY-123"), "{message}");
    assert!(!format!("{err:?}").contains("SECRET-KEY-123"));
}

#[tokio::test]
async fn missing_detail_entry_is_an_error() {
    let server = MockServer::start().await;
    mount_search(&server, 3).await;
    Mock::given(path("/videos"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"items": [detail(0), detail(2)]})),
        )
        .mount(&server)
        .await;

    let err = list_videos(&client(&server), &ListOptions::new(CHANNEL))
        .await
        .unwrap_err();
    assert!(matches!(err, TubemarkError::MissingDetails { ref video_id } if video_id == "vid1"));
}

#[tokio::test]
async fn second_run_with_same_responses_does_not_write() {
    let server = MockServer::start().await;
    mount_search(&server, 15).await;
    let details: Vec<Value> = (0..15).map(detail).collect();
    Mock::given(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": details})))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let readme = readme_in(&dir);
    let client = client(&server);
    let options = ListOptions::new(CHANNEL);

    assert_eq!(
        run(&client, &options, &readme).await.unwrap(),
        UpdateOutcome::Written
    );
    let after_first = std::fs::read(&readme).unwrap();

    assert_eq!(
        run(&client, &options, &readme).await.unwrap(),
        UpdateOutcome::Unchanged
    );
    assert_eq!(std::fs::read(&readme).unwrap(), after_first);

    let text = String::from_utf8(after_first).unwrap();
    assert!(text.starts_with("# Hello\n\nIntro.\n\n<!-- YOUTUBE-LATEST-VIDEOS:START -->\n\n[![Video 1]"));
    assert!(text.ends_with(")\n\n<!-- YOUTUBE-LATEST-VIDEOS:END -->\n\nFooter.\n"));
    assert!(!text.contains("stale"));
    assert_eq!(text.matches("](https://www.youtube.com/watch?v=").count(), 9);
}

#[tokio::test]
async fn missing_markers_leave_document_untouched() {
    let dir = TempDir::new().unwrap();
    let readme = dir.path().join("README.md");
    let original = "# No markers here\n\nJust prose.\n";
    std::fs::write(&readme, original).unwrap();

    let markers = MarkerPair::new(DEFAULT_TAG).unwrap();
    let videos = vec![Video {
        title: "A".into(),
        url: Video::watch_url("a"),
        thumbnail_url: "https://i.ytimg.com/vi/a/mqdefault.jpg".into(),
    }];

    let err = update_document(&readme, &markers, &videos, MarkupStyle::Markdown, false)
        .await
        .unwrap_err();

    assert!(matches!(err, TubemarkError::MarkersNotFound { .. }));
    assert_eq!(std::fs::read_to_string(&readme).unwrap(), original);
}

#[tokio::test]
async fn dry_run_returns_document_without_writing() {
    let dir = TempDir::new().unwrap();
    let readme = readme_in(&dir);
    let markers = MarkerPair::new(DEFAULT_TAG).unwrap();
    let videos = vec![Video {
        title: "Fresh".into(),
        url: Video::watch_url("fresh"),
        thumbnail_url: "https://i.ytimg.com/vi/fresh/mqdefault.jpg".into(),
    }];

    let outcome = update_document(&readme, &markers, &videos, MarkupStyle::Html, true)
        .await
        .unwrap();

    let UpdateOutcome::Pending(document) = outcome else {
        panic!("expected a pending document, got {outcome:?}");
    };
    assert!(document.contains(r#"<img src="https://i.ytimg.com/vi/fresh/mqdefault.jpg" alt="Fresh" width="200" />"#));
    assert_eq!(std::fs::read_to_string(&readme).unwrap(), README);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}
