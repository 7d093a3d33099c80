use std::sync::Arc;

use crate::app::{ArtistUseCase, Clock, ShowUseCase, VenueUseCase};
use crate::storage::Storage;

/// Shared handler state; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub venues: Arc<VenueUseCase>,
    pub artists: Arc<ArtistUseCase>,
    pub shows: Arc<ShowUseCase>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            venues: Arc::new(VenueUseCase::new(storage.clone(), clock.clone())),
            artists: Arc::new(ArtistUseCase::new(storage.clone(), clock)),
            shows: Arc::new(ShowUseCase::new(storage)),
        }
    }
}
