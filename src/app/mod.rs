pub mod ports;
pub mod artist_use_case;
pub mod show_use_case;
pub mod venue_use_case;

pub use artist_use_case::{ArtistDetail, ArtistListItem, ArtistUseCase};
pub use ports::{Clock, FixedClock, SystemClock};
pub use show_use_case::{ShowFormChoices, ShowUseCase};
pub use venue_use_case::{VenueDetail, VenueUseCase};

use crate::error::BookingError;
use crate::forms::ValidationErrors;
use thiserror::Error;

/// Why a create or update did not go through
#[derive(Error, Debug)]
pub enum WriteError {
    /// Rejected before touching storage
    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),

    /// Storage refused or failed; nothing was written
    #[error(transparent)]
    Failed(#[from] BookingError),
}

impl WriteError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, WriteError::Failed(e) if e.is_not_found())
    }
}
