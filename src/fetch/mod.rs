//! Playlist resolution.
//!
//! Turns a YouTube playlist URL into an ordered list of [`Video`]s via the
//! YouTube Data API v3. The scheduler never talks to the network; it only
//! receives the fully materialized list this module produces.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::models::Video;

/// Errors that can occur while resolving a playlist.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid playlist URL: {0}")]
    InvalidUrl(String),

    #[error("The playlist is empty or inaccessible.")]
    EmptyPlaylist,

    #[error("Missing API key: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Unexpected API response: {0}")]
    Api(String),
}

/// Validate a YouTube playlist URL and parse it.
///
/// Accepts `youtube.com/playlist?list=...` (any subdomain) and `youtu.be`
/// share links carrying a `list` parameter.
pub fn validate_playlist_url(raw: &str) -> Result<Url, FetchError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FetchError::InvalidUrl(
            "playlist URL cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(raw).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

    let host = url.host_str().unwrap_or("");
    let is_youtube = host == "youtu.be"
        || ((host == "youtube.com" || host.ends_with(".youtube.com"))
            && url.path().starts_with("/playlist"));

    if !is_youtube || playlist_id(&url).is_none() {
        return Err(FetchError::InvalidUrl(format!(
            "not a YouTube playlist URL: {}",
            raw
        )));
    }

    Ok(url)
}

/// Extract the playlist id (`list` query parameter).
pub fn playlist_id(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == "list")
        .map(|(_, v)| v.into_owned())
}

/// Parse an ISO-8601 duration as returned by the Data API (`PT1H2M3S`)
/// into seconds. Returns None for anything it doesn't recognize; callers
/// treat that as an unknown length.
pub fn parse_iso8601_duration(s: &str) -> Option<u32> {
    let rest = s.strip_prefix("P")?;
    // Date designators (e.g. "P1DT...") only show up for livestream
    // archives; days are folded into hours.
    let (days_part, time_part) = match rest.split_once('T') {
        Some((d, t)) => (d, t),
        None => (rest, ""),
    };

    let mut total: u64 = 0;
    if let Some(days) = days_part.strip_suffix('D') {
        total = days.parse::<u64>().ok()?.checked_mul(86400)?;
    } else if !days_part.is_empty() {
        return None;
    }

    let mut num = String::new();
    for c in time_part.chars() {
        if c.is_ascii_digit() {
            num.push(c);
        } else {
            let n: u64 = num.parse().ok()?;
            num.clear();
            let weight = match c {
                'H' => 3600,
                'M' => 60,
                'S' => 1,
                _ => return None,
            };
            total = total.checked_add(n.checked_mul(weight)?)?;
        }
    }
    if !num.is_empty() {
        return None;
    }

    u32::try_from(total).ok()
}

/// A service that resolves a playlist URL into its ordered videos.
#[async_trait]
pub trait PlaylistClient: Send + Sync {
    async fn resolve(&self, url: &Url) -> Result<Vec<Video>, FetchError>;
}

/// Configuration for the YouTube Data API client.
#[derive(Debug, Clone)]
pub struct YouTubeConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl YouTubeConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// YouTube Data API v3 playlist client.
pub struct YouTubeClient {
    client: Client,
    config: YouTubeConfig,
}

// ── Data API response shapes ─────────────────────────────────────

#[derive(Debug, Deserialize)]
struct PlaylistItemsPage {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: PlaylistItemSnippet,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemSnippet {
    title: String,
    #[serde(rename = "resourceId")]
    resource_id: ResourceId,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct ResourceId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct VideosPage {
    #[serde(default)]
    items: Vec<VideoResource>,
}

#[derive(Debug, Deserialize)]
struct VideoResource {
    id: String,
    #[serde(rename = "contentDetails")]
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

impl YouTubeClient {
    /// Create a client with the given configuration.
    pub fn new(config: YouTubeConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }
        Ok(response.json().await?)
    }

    /// List all items of a playlist, following pagination.
    async fn list_playlist_items(&self, playlist_id: &str) -> Result<Vec<PlaylistItem>, FetchError> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = Url::parse(&format!("{}/playlistItems", self.config.base_url))
                .map_err(|e| FetchError::Api(e.to_string()))?;
            url.query_pairs_mut()
                .append_pair("part", "snippet")
                .append_pair("maxResults", "50")
                .append_pair("playlistId", playlist_id)
                .append_pair("key", &self.config.api_key);
            if let Some(ref token) = page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }

            let page: PlaylistItemsPage = self.get_json(url).await?;
            items.extend(page.items);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(items)
    }

    /// Fetch durations for a batch of video ids (up to 50 per request).
    async fn fetch_durations(&self, ids: &[String]) -> Result<HashMap<String, u32>, FetchError> {
        let mut durations = HashMap::new();

        for chunk in ids.chunks(50) {
            let mut url = Url::parse(&format!("{}/videos", self.config.base_url))
                .map_err(|e| FetchError::Api(e.to_string()))?;
            url.query_pairs_mut()
                .append_pair("part", "contentDetails")
                .append_pair("id", &chunk.join(","))
                .append_pair("key", &self.config.api_key);

            let page: VideosPage = self.get_json(url).await?;
            for resource in page.items {
                let seconds = resource
                    .content_details
                    .duration
                    .as_deref()
                    .and_then(parse_iso8601_duration)
                    .unwrap_or_else(|| {
                        warn!(video_id = %resource.id, "no parseable duration, treating as unknown");
                        0
                    });
                durations.insert(resource.id, seconds);
            }
        }

        Ok(durations)
    }
}

#[async_trait]
impl PlaylistClient for YouTubeClient {
    async fn resolve(&self, url: &Url) -> Result<Vec<Video>, FetchError> {
        let id = playlist_id(url)
            .ok_or_else(|| FetchError::InvalidUrl("missing list parameter".to_string()))?;

        info!(playlist_id = %id, "resolving playlist");
        let items = self.list_playlist_items(&id).await?;

        let video_ids: Vec<String> = items
            .iter()
            .filter_map(|i| i.snippet.resource_id.video_id.clone())
            .collect();
        if video_ids.is_empty() {
            return Err(FetchError::EmptyPlaylist);
        }

        let durations = self.fetch_durations(&video_ids).await?;

        let videos: Vec<Video> = items
            .into_iter()
            .filter_map(|item| {
                let snippet = item.snippet;
                let video_id = snippet.resource_id.video_id?;
                // Unknown length becomes zero, never an error
                let seconds = durations.get(&video_id).copied().unwrap_or(0);
                let mut video = Video::new(
                    snippet.title,
                    seconds,
                    format!("https://www.youtube.com/watch?v={}", video_id),
                );
                if let Some(thumb) = snippet.thumbnails.and_then(|t| t.default) {
                    video = video.with_thumbnail(thumb.url);
                }
                Some(video)
            })
            .collect();

        if videos.is_empty() {
            return Err(FetchError::EmptyPlaylist);
        }

        debug!(count = videos.len(), "playlist resolved");
        Ok(videos)
    }
}

/// In-memory playlist client for tests and offline runs.
pub struct MockPlaylistClient {
    videos: Vec<Video>,
}

impl MockPlaylistClient {
    pub fn new(videos: Vec<Video>) -> Self {
        Self { videos }
    }

    /// A client whose playlist is always empty/inaccessible.
    pub fn empty() -> Self {
        Self { videos: Vec::new() }
    }
}

#[async_trait]
impl PlaylistClient for MockPlaylistClient {
    async fn resolve(&self, _url: &Url) -> Result<Vec<Video>, FetchError> {
        if self.videos.is_empty() {
            return Err(FetchError::EmptyPlaylist);
        }
        Ok(self.videos.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_playlist_url_ok() {
        let url =
            validate_playlist_url("https://www.youtube.com/playlist?list=PLabc123").unwrap();
        assert_eq!(playlist_id(&url).as_deref(), Some("PLabc123"));
    }

    #[test]
    fn test_validate_playlist_url_short_link() {
        let url = validate_playlist_url("https://youtu.be/dQw4w9WgXcQ?list=PLxyz").unwrap();
        assert_eq!(playlist_id(&url).as_deref(), Some("PLxyz"));
    }

    #[test]
    fn test_validate_playlist_url_empty() {
        assert!(matches!(
            validate_playlist_url(""),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_validate_playlist_url_not_youtube() {
        assert!(matches!(
            validate_playlist_url("https://vimeo.com/playlist?list=abc"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_validate_playlist_url_watch_page_rejected() {
        // A plain watch URL without a list parameter is not a playlist
        assert!(matches!(
            validate_playlist_url("https://www.youtube.com/watch?v=abc"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_validate_playlist_url_not_a_url() {
        assert!(matches!(
            validate_playlist_url("not a url"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_parse_iso8601_duration() {
        assert_eq!(parse_iso8601_duration("PT4M13S"), Some(253));
        assert_eq!(parse_iso8601_duration("PT1H2M3S"), Some(3723));
        assert_eq!(parse_iso8601_duration("PT45S"), Some(45));
        assert_eq!(parse_iso8601_duration("PT2H"), Some(7200));
        assert_eq!(parse_iso8601_duration("PT0S"), Some(0));
    }

    #[test]
    fn test_parse_iso8601_duration_with_days() {
        assert_eq!(parse_iso8601_duration("P1DT2H"), Some(93600));
    }

    #[test]
    fn test_parse_iso8601_duration_overflow_sized_components() {
        // Components that fit u64 but overflow once weighted
        assert_eq!(parse_iso8601_duration("P9999999999999999999DT1H"), None);
        assert_eq!(parse_iso8601_duration("PT9999999999999999999H"), None);
        // Fits u64 after weighting but exceeds u32
        assert_eq!(parse_iso8601_duration("PT4294967296S"), None);
    }

    #[test]
    fn test_parse_iso8601_duration_invalid() {
        assert_eq!(parse_iso8601_duration("4m13s"), None);
        assert_eq!(parse_iso8601_duration("PT4X"), None);
        assert_eq!(parse_iso8601_duration("PT12"), None);
        assert_eq!(parse_iso8601_duration(""), None);
    }

    #[tokio::test]
    async fn test_mock_client_resolves() {
        let client = MockPlaylistClient::new(vec![Video::new("A", 60, "https://youtu.be/a")]);
        let url = validate_playlist_url("https://www.youtube.com/playlist?list=PL1").unwrap();

        let videos = client.resolve(&url).await.unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].title, "A");
    }

    #[tokio::test]
    async fn test_mock_client_empty_playlist() {
        let client = MockPlaylistClient::empty();
        let url = validate_playlist_url("https://www.youtube.com/playlist?list=PL1").unwrap();

        let result = client.resolve(&url).await;
        assert!(matches!(result, Err(FetchError::EmptyPlaylist)));
    }

    #[test]
    fn test_playlist_items_page_deserialization() {
        let json = r#"{
            "items": [{
                "snippet": {
                    "title": "Intro",
                    "resourceId": {"videoId": "abc123"},
                    "thumbnails": {"default": {"url": "https://i.ytimg.com/vi/abc123/default.jpg"}}
                }
            }],
            "nextPageToken": "TOKEN"
        }"#;

        let page: PlaylistItemsPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].snippet.title, "Intro");
        assert_eq!(page.next_page_token.as_deref(), Some("TOKEN"));
    }

    #[test]
    fn test_videos_page_deserialization() {
        let json = r#"{"items": [{"id": "abc123", "contentDetails": {"duration": "PT4M13S"}}]}"#;
        let page: VideosPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.items[0].content_details.duration.as_deref(), Some("PT4M13S"));
    }
}
