//! Schedule identifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use super::Policy;

/// Identifier for a stored schedule.
///
/// Derived from the schedule's provenance (source playlist, policy, and
/// creation instant), so rebuilding the same playlist gets a fresh id while
/// the id itself stays stable once persisted. Truncated to 16 hex
/// characters: short enough for paths and URLs, long enough that
/// collisions are not a practical concern at this scale.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleId(String);

impl ScheduleId {
    /// Derive the id for a schedule built from the given inputs.
    pub fn derive(
        playlist_url: Option<&str>,
        policy: &Policy,
        created_at: &DateTime<Utc>,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(playlist_url.unwrap_or("").as_bytes());
        hasher.update(b"|");
        hasher.update(policy.kind().as_bytes());
        hasher.update(b"|");
        hasher.update(created_at.timestamp_millis().to_string().as_bytes());

        let digest = hex::encode(hasher.finalize());
        Self(digest[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScheduleId({})", self.0)
    }
}

impl From<String> for ScheduleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ScheduleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    const PLAYLIST: &str = "https://www.youtube.com/playlist?list=PL1";

    #[test]
    fn test_derive_is_deterministic() {
        let policy = Policy::TimeBased { daily_minutes: 120 };
        let id1 = ScheduleId::derive(Some(PLAYLIST), &policy, &at(1_700_000_000_000));
        let id2 = ScheduleId::derive(Some(PLAYLIST), &policy, &at(1_700_000_000_000));
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_derive_differs_by_playlist() {
        let policy = Policy::TimeBased { daily_minutes: 120 };
        let ts = at(1_700_000_000_000);
        let id1 = ScheduleId::derive(Some(PLAYLIST), &policy, &ts);
        let id2 = ScheduleId::derive(
            Some("https://www.youtube.com/playlist?list=PL2"),
            &policy,
            &ts,
        );
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_derive_differs_by_policy_kind() {
        let ts = at(1_700_000_000_000);
        let daily = ScheduleId::derive(Some(PLAYLIST), &Policy::TimeBased { daily_minutes: 60 }, &ts);
        let days = ScheduleId::derive(Some(PLAYLIST), &Policy::DayCountBased { num_days: 7 }, &ts);
        assert_ne!(daily, days);
    }

    #[test]
    fn test_derive_differs_by_creation_time() {
        let policy = Policy::DayCountBased { num_days: 5 };
        let id1 = ScheduleId::derive(None, &policy, &at(1_700_000_000_000));
        let id2 = ScheduleId::derive(None, &policy, &at(1_700_000_000_001));
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_derive_without_playlist_url() {
        let policy = Policy::TimeBased { daily_minutes: 60 };
        let id = ScheduleId::derive(None, &policy, &at(0));
        assert_eq!(id.as_str().len(), 16);
    }

    #[test]
    fn test_id_is_short_hex() {
        let id = ScheduleId::derive(
            Some(PLAYLIST),
            &Policy::TimeBased { daily_minutes: 90 },
            &at(1_700_000_000_000),
        );
        assert_eq!(id.as_str().len(), 16);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_id_display() {
        let id = ScheduleId::from("abc123def456");
        assert_eq!(format!("{}", id), "abc123def456");
    }

    #[test]
    fn test_id_serialization_roundtrip() {
        let id = ScheduleId::derive(
            Some(PLAYLIST),
            &Policy::TimeBased { daily_minutes: 60 },
            &at(1_700_000_000_000),
        );
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: ScheduleId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
