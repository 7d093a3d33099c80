use crate::domain::{Artist, Show, ShowListing, Venue};
use crate::error::Result;
use async_trait::async_trait;

pub mod sqlite;

pub use sqlite::SqliteStorage;

/// Storage trait for the booking directory.
///
/// Every write runs in its own transaction: it either commits completely or
/// leaves nothing behind. Referential integrity and cascade delete are enforced
/// here rather than left to the caller.
#[async_trait]
pub trait Storage: Send + Sync {
    // Venue operations
    async fn create_venue(&self, venue: &mut Venue) -> Result<()>;
    async fn get_venue_by_id(&self, venue_id: i64) -> Result<Option<Venue>>;
    async fn get_all_venues(&self) -> Result<Vec<Venue>>;
    async fn search_venues(&self, term: &str) -> Result<Vec<Venue>>;
    async fn update_venue(&self, venue: &Venue) -> Result<()>;
    /// Deletes the venue together with all of its shows.
    async fn delete_venue(&self, venue_id: i64) -> Result<()>;

    // Artist operations
    async fn create_artist(&self, artist: &mut Artist) -> Result<()>;
    async fn get_artist_by_id(&self, artist_id: i64) -> Result<Option<Artist>>;
    async fn get_all_artists(&self) -> Result<Vec<Artist>>;
    async fn search_artists(&self, term: &str) -> Result<Vec<Artist>>;
    async fn update_artist(&self, artist: &Artist) -> Result<()>;
    /// Refuses with `InUse` while the artist still has shows.
    async fn delete_artist(&self, artist_id: i64) -> Result<()>;

    // Show operations
    /// Fails with `MissingReference` unless both sides exist.
    async fn create_show(&self, show: &Show) -> Result<()>;
    /// All shows, latest start time first
    async fn get_all_shows(&self) -> Result<Vec<ShowListing>>;
    async fn get_shows_by_venue_id(&self, venue_id: i64) -> Result<Vec<ShowListing>>;
    async fn get_shows_by_artist_id(&self, artist_id: i64) -> Result<Vec<ShowListing>>;
}
