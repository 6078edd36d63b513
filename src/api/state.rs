use std::sync::Arc;

use crate::dataset::Dataset;
use crate::models::MapCatalog;

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub maps: Arc<MapCatalog>,
    pub cors_origin: String,
    /// Log every request through `TraceLayer`
    pub access_log: bool,
}

impl AppState {
    pub fn new(dataset: Dataset, maps: MapCatalog) -> Self {
        Self {
            dataset: Arc::new(dataset),
            maps: Arc::new(maps),
            cors_origin: "*".to_string(),
            access_log: false,
        }
    }
}
