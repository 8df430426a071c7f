use std::sync::Arc;

use crate::db::Store;
use crate::services::{BookingService, CatalogService};

pub struct AppState {
    /// Direct store access for callers that inspect resource state, such as
    /// the integration tests; request handlers go through the services.
    pub store: Arc<dyn Store>,
    pub bookings: BookingService,
    pub catalog: CatalogService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            bookings: BookingService::new(store.clone()),
            catalog: CatalogService::new(store.clone()),
            store,
        }
    }
}
