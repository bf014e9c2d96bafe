use crate::models::CalendarData;
use crate::storage::DataSource;
use std::sync::Arc;

/// The dataset is loaded once at startup and never mutated, so it is shared
/// without a lock. `None` means the load failed and the page renders empty.
#[derive(Clone)]
pub struct AppState {
    pub source: DataSource,
    pub data: Option<Arc<CalendarData>>,
}

impl AppState {
    pub fn new(source: DataSource, data: Option<CalendarData>) -> Self {
        Self {
            source,
            data: data.map(Arc::new),
        }
    }
}
