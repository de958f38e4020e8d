//! The scheduling core.
//!
//! Packs an ordered list of videos into study days with a single greedy
//! left-to-right pass. Order is significant and preserved; this is not
//! reorderable bin packing. Both builders are pure: no I/O, no mutation of
//! inputs, no state between invocations.

use thiserror::Error;
use tracing::debug;

use crate::models::{DayPlan, Schedule, ScheduledVideo, Video};

/// Fixed allowance subtracted from every daily budget to leave room for
/// breaks and review. Callers must therefore ask for strictly more than
/// this many minutes per day.
pub const BREAK_BUFFER_MINUTES: u32 = 10;

/// Validation failures raised before any day is emitted. A schedule is
/// never partially built on error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error(
        "Daily study time must be greater than {} minutes (got {0})",
        BREAK_BUFFER_MINUTES
    )]
    InvalidBudget(u32),

    #[error("Number of days must be greater than 0")]
    InvalidDayCount,
}

/// Build a schedule packed up to a daily time budget.
///
/// Each day holds as many consecutive videos as fit within the effective
/// budget (`(daily_minutes - 10) * 60` seconds). A video longer than the
/// whole budget is never split: it sits alone in a day that legitimately
/// overflows. Day numbering continues from `last_day_number`, so a caller
/// resuming a partially completed plan passes only the remaining videos
/// plus the last day number it already issued.
pub fn build_time_based(
    videos: &[Video],
    daily_minutes: u32,
    last_day_number: u32,
) -> Result<Schedule, ScheduleError> {
    let effective = (daily_minutes as i64 - BREAK_BUFFER_MINUTES as i64) * 60;
    if effective <= 0 {
        return Err(ScheduleError::InvalidBudget(daily_minutes));
    }
    let budget = effective as u64;

    let mut days: Vec<DayPlan> = Vec::new();
    let mut current: Vec<ScheduledVideo> = Vec::new();
    let mut current_seconds: u64 = 0;

    for video in videos {
        let duration = video.duration_seconds as u64;
        // An open empty day always accepts the next video, even when the
        // video alone exceeds the budget; no empty day is ever emitted.
        if current.is_empty() || current_seconds + duration <= budget {
            current.push(ScheduledVideo::from_video(video));
            current_seconds += duration;
        } else {
            let day = last_day_number + 1 + days.len() as u32;
            days.push(DayPlan::new(day, std::mem::take(&mut current)));
            current.push(ScheduledVideo::from_video(video));
            current_seconds = duration;
        }
    }

    if !current.is_empty() {
        let day = last_day_number + 1 + days.len() as u32;
        days.push(DayPlan::new(day, current));
    }

    debug!(
        days = days.len(),
        videos = videos.len(),
        budget_seconds = budget,
        "built time-based schedule"
    );
    Ok(Schedule::from_days(days))
}

/// Build a schedule spread over a fixed number of days.
///
/// The average content per day is used as a closing threshold while
/// packing; the final day absorbs everything left over so no more than
/// `num_days` content days are ever opened. If the playlist runs out
/// early, revision days pad the schedule to exactly `num_days`. The
/// returned schedule carries `average_daily_hours` as an advisory figure.
pub fn build_day_count_based(
    videos: &[Video],
    num_days: u32,
    last_day_number: u32,
) -> Result<Schedule, ScheduleError> {
    if num_days == 0 {
        return Err(ScheduleError::InvalidDayCount);
    }

    let total_seconds: u64 = videos.iter().map(|v| v.duration_seconds as u64).sum();
    // Real-valued threshold; never rounded during packing.
    let avg_per_day = total_seconds as f64 / num_days as f64;

    let mut days: Vec<DayPlan> = Vec::new();
    let mut current: Vec<ScheduledVideo> = Vec::new();
    let mut current_seconds: u64 = 0;

    for video in videos {
        let duration = video.duration_seconds as u64;
        let open_day_index = days.len() as u32 + 1;
        if open_day_index < num_days
            && !current.is_empty()
            && (current_seconds + duration) as f64 > avg_per_day
        {
            let day = last_day_number + 1 + days.len() as u32;
            days.push(DayPlan::new(day, std::mem::take(&mut current)));
            current_seconds = 0;
        }
        current.push(ScheduledVideo::from_video(video));
        current_seconds += duration;
    }

    if !current.is_empty() {
        let day = last_day_number + 1 + days.len() as u32;
        days.push(DayPlan::new(day, current));
    }

    // Pad short playlists out to the requested length.
    while (days.len() as u32) < num_days {
        let day = last_day_number + 1 + days.len() as u32;
        days.push(DayPlan::revision(day));
    }

    let average_daily_hours =
        (total_seconds as f64 / num_days as f64 / 3600.0 * 100.0).round() / 100.0;

    debug!(
        days = days.len(),
        videos = videos.len(),
        average_daily_hours,
        "built day-count schedule"
    );
    Ok(Schedule::from_days(days).with_average_daily_hours(average_daily_hours))
}
