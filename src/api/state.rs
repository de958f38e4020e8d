use std::sync::Arc;

use crate::fetch::PlaylistClient;
use crate::storage::ScheduleStore;

/// Shared request state. Collaborators are injected here rather than held
/// as process globals, so tests can swap in mocks.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ScheduleStore>,
    pub playlists: Arc<dyn PlaylistClient>,
}
