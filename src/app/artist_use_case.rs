use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::aggregate::{
    partition_shows, summarize, upcoming_counts, Counterpart, SearchResults, ShowPartition,
};
use crate::app::ports::Clock;
use crate::app::WriteError;
use crate::domain::Artist;
use crate::error::{BookingError, Result};
use crate::forms::{ArtistForm, FormInput};
use crate::storage::Storage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistListItem {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ArtistDetail {
    pub artist: Artist,
    pub shows: ShowPartition,
}

/// Use case for browsing and editing artists
pub struct ArtistUseCase {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl ArtistUseCase {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    pub async fn list_artists(&self) -> Result<Vec<ArtistListItem>> {
        let artists = self.storage.get_all_artists().await?;
        Ok(artists
            .into_iter()
            .filter_map(|a| a.id.map(|id| ArtistListItem { id, name: a.name }))
            .collect())
    }

    pub async fn search_artists(&self, term: &str) -> Result<SearchResults> {
        let artists = self.storage.search_artists(term.trim()).await?;
        let shows = self.storage.get_all_shows().await?;
        let counts = upcoming_counts(&shows, self.clock.now(), |s| s.artist_id);
        let data = artists
            .iter()
            .filter_map(|a| a.id.map(|id| summarize(id, &a.name, &counts)))
            .collect();
        Ok(SearchResults::new(data))
    }

    pub async fn get_artist(&self, artist_id: i64) -> Result<Artist> {
        self.storage
            .get_artist_by_id(artist_id)
            .await?
            .ok_or(BookingError::NotFound {
                entity: "Artist",
                id: artist_id,
            })
    }

    pub async fn show_artist(&self, artist_id: i64) -> Result<ArtistDetail> {
        let artist = self.get_artist(artist_id).await?;
        let shows = self.storage.get_shows_by_artist_id(artist_id).await?;
        Ok(ArtistDetail {
            artist,
            shows: partition_shows(&shows, Counterpart::Venue, self.clock.now()),
        })
    }

    pub async fn create_artist(
        &self,
        input: &FormInput,
    ) -> std::result::Result<Artist, WriteError> {
        let mut artist = ArtistForm::parse(input).map_err(|errors| {
            warn!("Rejected artist submission: {}", errors);
            WriteError::Invalid(errors)
        })?;

        if let Err(e) = self.storage.create_artist(&mut artist).await {
            error!("Artist {} could not be listed: {}", artist.name, e);
            return Err(e.into());
        }
        info!("Artist {} was successfully listed", artist.name);
        Ok(artist)
    }

    pub async fn update_artist(
        &self,
        artist_id: i64,
        input: &FormInput,
    ) -> std::result::Result<Artist, WriteError> {
        let mut artist = ArtistForm::parse(input).map_err(|errors| {
            warn!("Rejected edit of artist {}: {}", artist_id, errors);
            WriteError::Invalid(errors)
        })?;
        artist.id = Some(artist_id);

        if let Err(e) = self.storage.update_artist(&artist).await {
            error!("Artist {} could not be edited: {}", artist_id, e);
            return Err(e.into());
        }
        Ok(artist)
    }

    /// Delete an artist with no shows on the books
    pub async fn delete_artist(&self, artist_id: i64) -> Result<()> {
        self.storage.delete_artist(artist_id).await.map_err(|e| {
            warn!("Artist {} could not be deleted: {}", artist_id, e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::FixedClock;
    use crate::constants::Genre;
    use crate::storage::SqliteStorage;
    use chrono::NaiveDate;

    fn setup() -> ArtistUseCase {
        let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());
        let now = NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        ArtistUseCase::new(storage, Arc::new(FixedClock(now)))
    }

    fn artist_form(name: &str) -> FormInput {
        FormInput::from_pairs([
            ("name", name),
            ("city", "San Francisco"),
            ("state", "CA"),
            ("phone", "326-123-5000"),
            ("genres", "Rock n Roll"),
            ("website", "https://www.gunsnpetalsband.com"),
            ("seeking_venue", "True"),
            (
                "seeking_description",
                "Looking for shows to perform at in the San Francisco Bay Area!",
            ),
        ])
    }

    #[tokio::test]
    async fn test_list_and_search_artists() {
        let artists = setup();
        for name in ["Guns N Petals", "Matt Quevedo", "The Wild Sax Band"] {
            artists.create_artist(&artist_form(name)).await.unwrap();
        }

        let names: Vec<String> = artists
            .list_artists()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Guns N Petals", "Matt Quevedo", "The Wild Sax Band"]);

        assert_eq!(artists.search_artists("A").await.unwrap().count, 3);
        let band = artists.search_artists("band").await.unwrap();
        assert_eq!(band.count, 1);
        assert_eq!(band.data[0].name, "The Wild Sax Band");
    }

    #[tokio::test]
    async fn test_update_artist_replaces_fields() {
        let artists = setup();
        let created = artists.create_artist(&artist_form("Guns N Petals")).await.unwrap();
        let id = created.id.unwrap();

        let mut edit = artist_form("Guns N Roses");
        edit.push("genres", "Punk");
        artists.update_artist(id, &edit).await.unwrap();

        let stored = artists.get_artist(id).await.unwrap();
        assert_eq!(stored.name, "Guns N Roses");
        assert_eq!(stored.genres, vec![Genre::RockNRoll, Genre::Punk]);
        assert!(stored.seeking_venue);
    }

    #[tokio::test]
    async fn test_invalid_edit_leaves_artist_untouched() {
        let artists = setup();
        let created = artists.create_artist(&artist_form("Matt Quevedo")).await.unwrap();
        let id = created.id.unwrap();

        let bad = FormInput::from_pairs([("name", "Matt Q"), ("website", "nope")]);
        assert!(matches!(
            artists.update_artist(id, &bad).await,
            Err(WriteError::Invalid(_))
        ));
        assert_eq!(artists.get_artist(id).await.unwrap().name, "Matt Quevedo");
    }
}
