//! Playlist video models.

use serde::{Deserialize, Serialize};

use super::format_duration;

/// Title used for the synthetic placeholder entry on a revision day.
pub const REVISION_DAY_TITLE: &str = "Revision Day";

/// One schedulable video from a playlist.
///
/// Produced by the fetch layer (or supplied directly by a caller) and
/// treated as read-only input by the scheduler. A duration of zero means
/// the upstream source didn't report a length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Video title
    pub title: String,

    /// Length in whole seconds (0 = unknown)
    pub duration_seconds: u32,

    /// Watch URL; None only for synthetic placeholders
    pub link: Option<String>,

    /// Thumbnail URL, carried through for clients but unused by the core
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl Video {
    /// Create a new Video.
    pub fn new(title: impl Into<String>, duration_seconds: u32, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            duration_seconds,
            link: Some(link.into()),
            thumbnail: None,
        }
    }

    /// Builder method to set the thumbnail URL.
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }
}

/// A video as it appears inside a built schedule.
///
/// Copies the input video and annotates it with a formatted duration and a
/// completion flag; the input `Video` itself is never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledVideo {
    pub title: String,

    /// Rendered as `H:MM:SS`; `"N/A"` for revision-day placeholders
    pub duration: String,

    /// Canonical duration in seconds, used for summaries
    pub duration_seconds: u32,

    pub link: Option<String>,

    #[serde(default)]
    pub completed: bool,
}

impl ScheduledVideo {
    /// Build a schedule entry from an input video.
    pub fn from_video(video: &Video) -> Self {
        Self {
            title: video.title.clone(),
            duration: format_duration(video.duration_seconds),
            duration_seconds: video.duration_seconds,
            link: video.link.clone(),
            completed: false,
        }
    }

    /// The synthetic entry a revision day holds.
    pub fn revision_placeholder() -> Self {
        Self {
            title: REVISION_DAY_TITLE.to_string(),
            duration: "N/A".to_string(),
            duration_seconds: 0,
            link: None,
            completed: false,
        }
    }

    /// Whether this entry is a revision-day placeholder rather than content.
    pub fn is_placeholder(&self) -> bool {
        self.link.is_none() && self.title == REVISION_DAY_TITLE
    }
}
