use std::sync::Arc;

use storage::Database;
use storage::services::lifecycle::FlightLifecycle;

use crate::realtime::EventHub;

/// Shared handles every handler can reach through `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub lifecycle: FlightLifecycle,
    pub hub: Arc<EventHub>,
    pub max_varietals: usize,
}
