use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{StorageConfig, StorageError};
use crate::models::{Policy, Schedule, ScheduleId};

/// A schedule as persisted, with the context it was built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSchedule {
    pub id: ScheduleId,

    /// The playlist this schedule was built from, if any
    pub playlist_url: Option<String>,

    pub policy: Policy,

    pub created_at: DateTime<Utc>,

    pub schedule: Schedule,
}

impl StoredSchedule {
    /// Wrap a freshly built schedule for persistence, deriving its id from
    /// the playlist, policy, and creation time.
    pub fn new(playlist_url: Option<String>, policy: Policy, schedule: Schedule) -> Self {
        let created_at = Utc::now();
        let id = ScheduleId::derive(playlist_url.as_deref(), &policy, &created_at);
        Self {
            id,
            playlist_url,
            policy,
            created_at,
            schedule,
        }
    }
}

/// Filesystem-backed schedule store. One JSON document per schedule.
#[derive(Debug, Clone)]
pub struct ScheduleStore {
    config: StorageConfig,
}

impl ScheduleStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    fn path_for(&self, id: &ScheduleId) -> PathBuf {
        self.config.schedules_dir().join(format!("{}.json", id))
    }

    /// Persist a schedule, overwriting any previous version.
    pub fn save(&self, stored: &StoredSchedule) -> Result<(), StorageError> {
        let dir = self.config.schedules_dir();
        fs::create_dir_all(&dir)?;

        let path = self.path_for(&stored.id);
        let json = serde_json::to_string_pretty(stored)?;
        fs::write(&path, json)?;

        info!(id = %stored.id, "saved schedule to {:?}", path);
        Ok(())
    }

    /// Load a schedule by id.
    pub fn load(&self, id: &ScheduleId) -> Result<StoredSchedule, StorageError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }

        let contents = fs::read_to_string(&path)?;
        let stored = serde_json::from_str(&contents)?;
        debug!(id = %id, "loaded schedule");
        Ok(stored)
    }

    /// List the ids of all stored schedules, sorted.
    pub fn list(&self) -> Result<Vec<ScheduleId>, StorageError> {
        let dir = self.config.schedules_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(".json")) {
                ids.push(ScheduleId::from(stem));
            }
        }

        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(ids)
    }

    /// Delete a stored schedule.
    pub fn delete(&self, id: &ScheduleId) -> Result<(), StorageError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }
        fs::remove_file(path)?;
        info!(id = %id, "deleted schedule");
        Ok(())
    }

    /// Mark the video with the given link as completed and persist the
    /// updated document. Returns the updated schedule.
    pub fn mark_completed(
        &self,
        id: &ScheduleId,
        link: &str,
    ) -> Result<StoredSchedule, StorageError> {
        let mut stored = self.load(id)?;

        let mut found = false;
        for day in &mut stored.schedule.days {
            for video in &mut day.videos {
                if video.link.as_deref() == Some(link) {
                    video.completed = true;
                    found = true;
                }
            }
        }

        if !found {
            return Err(StorageError::LinkNotFound(link.to_string()));
        }

        self.save(&stored)?;
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayPlan, ScheduledVideo, Video};
    use crate::scheduler::build_time_based;
    use tempfile::TempDir;

    fn test_store(temp_dir: &TempDir) -> ScheduleStore {
        ScheduleStore::new(StorageConfig::new(temp_dir.path().to_path_buf()))
    }

    fn sample_stored() -> StoredSchedule {
        let videos = vec![
            Video::new("Intro", 300, "https://youtu.be/a"),
            Video::new("Basics", 400, "https://youtu.be/b"),
        ];
        let schedule = build_time_based(&videos, 20, 0).unwrap();
        StoredSchedule::new(
            Some("https://www.youtube.com/playlist?list=PL1".to_string()),
            Policy::TimeBased { daily_minutes: 20 },
            schedule,
        )
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let stored = sample_stored();
        store.save(&stored).unwrap();

        let loaded = store.load(&stored.id).unwrap();
        assert_eq!(loaded.id, stored.id);
        assert_eq!(loaded.schedule, stored.schedule);
        assert_eq!(loaded.policy, stored.policy);
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let result = store.load(&ScheduleId::from("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_list_schedules() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        assert!(store.list().unwrap().is_empty());

        let a = sample_stored();
        let b = sample_stored();
        store.save(&a).unwrap();
        store.save(&b).unwrap();

        let ids = store.list().unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&a.id));
        assert!(ids.contains(&b.id));
    }

    #[test]
    fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let stored = sample_stored();
        store.save(&stored).unwrap();
        store.delete(&stored.id).unwrap();

        assert!(matches!(
            store.load(&stored.id),
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            store.delete(&stored.id),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_mark_completed() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let stored = sample_stored();
        store.save(&stored).unwrap();

        let updated = store.mark_completed(&stored.id, "https://youtu.be/a").unwrap();
        let flags: Vec<bool> = updated
            .schedule
            .days
            .iter()
            .flat_map(|d| d.videos.iter())
            .map(|v| v.completed)
            .collect();
        assert!(flags.contains(&true));

        // Persisted, not just returned
        let reloaded = store.load(&stored.id).unwrap();
        let video = reloaded
            .schedule
            .days
            .iter()
            .flat_map(|d| d.videos.iter())
            .find(|v| v.link.as_deref() == Some("https://youtu.be/a"))
            .unwrap();
        assert!(video.completed);
    }

    #[test]
    fn test_mark_completed_unknown_link() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let stored = sample_stored();
        store.save(&stored).unwrap();

        let result = store.mark_completed(&stored.id, "https://youtu.be/zzz");
        assert!(matches!(result, Err(StorageError::LinkNotFound(_))));
    }

    #[test]
    fn test_stored_schedule_ids_differ_by_creation() {
        // Same playlist and policy still get distinct ids (timestamped)
        let a = sample_stored();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = sample_stored();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_stored_schedule_with_revision_days_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let schedule = crate::models::Schedule::from_days(vec![
            DayPlan::new(
                1,
                vec![ScheduledVideo::from_video(&Video::new(
                    "A",
                    60,
                    "https://youtu.be/a",
                ))],
            ),
            DayPlan::revision(2),
        ]);
        let stored = StoredSchedule::new(None, Policy::DayCountBased { num_days: 2 }, schedule);
        store.save(&stored).unwrap();

        let loaded = store.load(&stored.id).unwrap();
        assert!(loaded.schedule.days[1].is_revision);
        assert_eq!(loaded.schedule.summary.total_videos, 1);
    }
}
