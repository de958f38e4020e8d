//! Study schedule models.

use serde::{Deserialize, Serialize};

use super::ScheduledVideo;

/// The scheduling policy for one build invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Policy {
    /// Pack days up to a fixed daily time budget.
    TimeBased { daily_minutes: u32 },

    /// Spread the playlist over a fixed number of days.
    DayCountBased { num_days: u32 },
}

impl Policy {
    /// Short tag used when deriving schedule ids.
    pub fn kind(&self) -> &'static str {
        match self {
            Policy::TimeBased { .. } => "daily",
            Policy::DayCountBased { .. } => "days",
        }
    }
}

/// The videos assigned to one study day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// 1-indexed day number, contiguous across the schedule
    pub day: u32,

    /// Display label, `"Day N"`
    pub label: String,

    /// Videos in playlist order
    pub videos: Vec<ScheduledVideo>,

    /// True for padded revision days holding only a placeholder
    #[serde(default)]
    pub is_revision: bool,
}

impl DayPlan {
    /// Create a content day. `videos` must be non-empty.
    pub fn new(day: u32, videos: Vec<ScheduledVideo>) -> Self {
        Self {
            day,
            label: format!("Day {}", day),
            videos,
            is_revision: false,
        }
    }

    /// Create a padded revision day.
    pub fn revision(day: u32) -> Self {
        Self {
            day,
            label: format!("Day {}", day),
            videos: vec![ScheduledVideo::revision_placeholder()],
            is_revision: true,
        }
    }

    /// Total content seconds in this day.
    pub fn total_seconds(&self) -> u64 {
        self.videos.iter().map(|v| v.duration_seconds as u64).sum()
    }
}

/// Derived counts over a schedule. Revision placeholders are not content
/// and are excluded from the video count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_videos: u32,
    pub total_days: u32,
}

impl Summary {
    /// Compute the summary for a set of day plans.
    pub fn of(days: &[DayPlan]) -> Self {
        let total_videos = days
            .iter()
            .flat_map(|d| d.videos.iter())
            .filter(|v| !v.is_placeholder())
            .count() as u32;
        Self {
            total_videos,
            total_days: days.len() as u32,
        }
    }
}

/// A built study schedule: ordered days plus derived counts.
///
/// Immutable once returned by the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub days: Vec<DayPlan>,

    pub summary: Summary,

    /// Advisory "you need about X hours/day", day-count mode only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_daily_hours: Option<f64>,
}

impl Schedule {
    /// Assemble a schedule from its days, deriving the summary.
    pub fn from_days(days: Vec<DayPlan>) -> Self {
        let summary = Summary::of(&days);
        Self {
            days,
            summary,
            average_daily_hours: None,
        }
    }

    /// Builder method to attach the advisory daily-hours figure.
    pub fn with_average_daily_hours(mut self, hours: f64) -> Self {
        self.average_daily_hours = Some(hours);
        self
    }
}
