//! Schedule endpoints: build from a playlist, preview from raw items,
//! retrieve, and mark videos completed.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::fetch::validate_playlist_url;
use crate::models::{normalize_duration, DurationValue, Policy, Schedule, ScheduleId, Video};
use crate::scheduler::{build_day_count_based, build_time_based};
use crate::storage::StoredSchedule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    /// Pack by daily study time
    Daily,
    /// Spread over a target number of days
    Days,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub playlist_url: String,

    pub schedule_type: ScheduleType,

    /// Daily study time in hours (daily mode)
    pub daily_hours: Option<f64>,

    /// Number of days to finish in (days mode)
    pub target_days: Option<u32>,

    /// Links of already-watched videos; these are filtered out before
    /// scheduling (the core itself does no deduplication)
    #[serde(default)]
    pub completed_links: Vec<String>,

    /// Last day number issued by a previous run, for contiguous numbering
    #[serde(default)]
    pub last_day_number: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleResponse {
    pub schedule_id: String,
    pub schedule: Schedule,
}

/// A raw item for preview requests. `duration` may be a number of seconds
/// or a clock string like `"12:30"`; normalization happens here at the
/// boundary.
#[derive(Debug, Deserialize)]
pub struct RawVideoItem {
    pub title: String,
    pub duration: Option<DurationValue>,
    pub link: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewScheduleRequest {
    pub videos: Vec<RawVideoItem>,
    pub schedule_type: ScheduleType,
    pub daily_hours: Option<f64>,
    pub target_days: Option<u32>,
    #[serde(default)]
    pub last_day_number: u32,
}

#[derive(Debug, Deserialize)]
pub struct CompleteVideoRequest {
    pub link: String,
}

/// Convert the request's policy parameters and run the matching builder.
fn build_schedule(
    videos: &[Video],
    schedule_type: ScheduleType,
    daily_hours: Option<f64>,
    target_days: Option<u32>,
    last_day_number: u32,
) -> Result<(Schedule, Policy), ApiError> {
    match schedule_type {
        ScheduleType::Daily => {
            let hours = daily_hours.unwrap_or(2.0);
            if !hours.is_finite() || hours < 0.0 {
                return Err(ApiError::BadRequest(format!(
                    "dailyHours must be a non-negative number, got {}",
                    hours
                )));
            }
            let daily_minutes = (hours * 60.0).trunc() as u32;
            let schedule = build_time_based(videos, daily_minutes, last_day_number)?;
            Ok((schedule, Policy::TimeBased { daily_minutes }))
        }
        ScheduleType::Days => {
            let num_days = target_days.unwrap_or(7);
            let schedule = build_day_count_based(videos, num_days, last_day_number)?;
            Ok((schedule, Policy::DayCountBased { num_days }))
        }
    }
}

/// POST /api/schedule: resolve a playlist, build a schedule, persist it.
pub async fn create_schedule(
    State(state): State<AppState>,
    Json(req): Json<CreateScheduleRequest>,
) -> Result<Json<CreateScheduleResponse>, ApiError> {
    let url = validate_playlist_url(&req.playlist_url)?;
    let videos = state.playlists.resolve(&url).await?;

    // Resume support: drop videos the caller already finished
    let completed: HashSet<&str> = req.completed_links.iter().map(String::as_str).collect();
    let remaining: Vec<Video> = videos
        .into_iter()
        .filter(|v| v.link.as_deref().map_or(true, |l| !completed.contains(l)))
        .collect();

    let (schedule, policy) = build_schedule(
        &remaining,
        req.schedule_type,
        req.daily_hours,
        req.target_days,
        req.last_day_number,
    )?;

    let stored = StoredSchedule::new(Some(url.to_string()), policy, schedule);
    state.store.save(&stored)?;

    info!(
        id = %stored.id,
        days = stored.schedule.summary.total_days,
        videos = stored.schedule.summary.total_videos,
        "created schedule"
    );

    Ok(Json(CreateScheduleResponse {
        schedule_id: stored.id.to_string(),
        schedule: stored.schedule,
    }))
}

/// POST /api/schedule/preview: build from caller-supplied items without
/// resolving a playlist or persisting anything.
pub async fn preview_schedule(
    Json(req): Json<PreviewScheduleRequest>,
) -> Result<Json<Schedule>, ApiError> {
    let mut videos = Vec::with_capacity(req.videos.len());
    for item in &req.videos {
        let duration_seconds = normalize_duration(item.duration.as_ref())?;
        videos.push(Video {
            title: item.title.clone(),
            duration_seconds,
            link: item.link.clone(),
            thumbnail: item.thumbnail.clone(),
        });
    }

    let (schedule, _) = build_schedule(
        &videos,
        req.schedule_type,
        req.daily_hours,
        req.target_days,
        req.last_day_number,
    )?;

    Ok(Json(schedule))
}

/// GET /api/schedule/:id
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredSchedule>, ApiError> {
    let stored = state.store.load(&ScheduleId::from(id))?;
    Ok(Json(stored))
}

/// POST /api/schedule/:id/complete: mark one video as watched.
pub async fn complete_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CompleteVideoRequest>,
) -> Result<Json<StoredSchedule>, ApiError> {
    let updated = state.store.mark_completed(&ScheduleId::from(id), &req.link)?;
    Ok(Json(updated))
}
