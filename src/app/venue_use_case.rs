use std::sync::Arc;
use tracing::{error, info, warn};

use crate::aggregate::{
    group_by_area, partition_shows, summarize, upcoming_counts, Counterpart, SearchResults,
    ShowPartition, VenueArea,
};
use crate::app::ports::Clock;
use crate::app::WriteError;
use crate::domain::Venue;
use crate::error::{BookingError, Result};
use crate::forms::{FormInput, VenueForm};
use crate::storage::Storage;

/// A venue with its shows split into past and upcoming
#[derive(Debug, Clone)]
pub struct VenueDetail {
    pub venue: Venue,
    pub shows: ShowPartition,
}

/// Use case for browsing and editing venues
pub struct VenueUseCase {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl VenueUseCase {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// All venues grouped by city and state, with per-venue upcoming counts
    pub async fn list_venues(&self) -> Result<Vec<VenueArea>> {
        let venues = self.storage.get_all_venues().await?;
        let shows = self.storage.get_all_shows().await?;
        let counts = upcoming_counts(&shows, self.clock.now(), |s| s.venue_id);
        Ok(group_by_area(&venues, &counts))
    }

    pub async fn search_venues(&self, term: &str) -> Result<SearchResults> {
        let venues = self.storage.search_venues(term.trim()).await?;
        let shows = self.storage.get_all_shows().await?;
        let counts = upcoming_counts(&shows, self.clock.now(), |s| s.venue_id);
        let data = venues
            .iter()
            .filter_map(|v| v.id.map(|id| summarize(id, &v.name, &counts)))
            .collect();
        Ok(SearchResults::new(data))
    }

    pub async fn get_venue(&self, venue_id: i64) -> Result<Venue> {
        self.storage
            .get_venue_by_id(venue_id)
            .await?
            .ok_or(BookingError::NotFound {
                entity: "Venue",
                id: venue_id,
            })
    }

    pub async fn show_venue(&self, venue_id: i64) -> Result<VenueDetail> {
        let venue = self.get_venue(venue_id).await?;
        let shows = self.storage.get_shows_by_venue_id(venue_id).await?;
        Ok(VenueDetail {
            venue,
            shows: partition_shows(&shows, Counterpart::Artist, self.clock.now()),
        })
    }

    /// Validate and insert a venue, returning it with its new id
    pub async fn create_venue(&self, input: &FormInput) -> std::result::Result<Venue, WriteError> {
        let mut venue = VenueForm::parse(input).map_err(|errors| {
            warn!("Rejected venue submission: {}", errors);
            WriteError::Invalid(errors)
        })?;

        if let Err(e) = self.storage.create_venue(&mut venue).await {
            error!("Venue {} could not be listed: {}", venue.name, e);
            return Err(e.into());
        }
        info!("Venue {} was successfully listed", venue.name);
        Ok(venue)
    }

    /// Validate and overwrite every field of an existing venue
    pub async fn update_venue(
        &self,
        venue_id: i64,
        input: &FormInput,
    ) -> std::result::Result<Venue, WriteError> {
        let mut venue = VenueForm::parse(input).map_err(|errors| {
            warn!("Rejected edit of venue {}: {}", venue_id, errors);
            WriteError::Invalid(errors)
        })?;
        venue.id = Some(venue_id);

        if let Err(e) = self.storage.update_venue(&venue).await {
            error!("Venue {} could not be edited: {}", venue_id, e);
            return Err(e.into());
        }
        Ok(venue)
    }

    /// Delete a venue and every show booked there
    pub async fn delete_venue(&self, venue_id: i64) -> Result<()> {
        self.storage.delete_venue(venue_id).await.map_err(|e| {
            error!("Venue {} could not be deleted: {}", venue_id, e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::FixedClock;
    use crate::constants::Genre;
    use crate::domain::{Show, ShowListing};
    use crate::storage::SqliteStorage;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(21, 30, 0)
            .unwrap()
    }

    fn setup() -> (Arc<SqliteStorage>, VenueUseCase) {
        let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());
        let use_case = VenueUseCase::new(storage.clone(), Arc::new(FixedClock(at(2026, 1, 1))));
        (storage, use_case)
    }

    /// Reads go to a real database, every write fails
    struct WriteFailingStorage {
        inner: SqliteStorage,
    }

    fn refused() -> BookingError {
        BookingError::Storage {
            message: "disk I/O error".to_string(),
        }
    }

    #[async_trait::async_trait]
    impl Storage for WriteFailingStorage {
        async fn create_venue(&self, _venue: &mut Venue) -> Result<()> {
            Err(refused())
        }
        async fn get_venue_by_id(&self, venue_id: i64) -> Result<Option<Venue>> {
            self.inner.get_venue_by_id(venue_id).await
        }
        async fn get_all_venues(&self) -> Result<Vec<Venue>> {
            self.inner.get_all_venues().await
        }
        async fn search_venues(&self, term: &str) -> Result<Vec<Venue>> {
            self.inner.search_venues(term).await
        }
        async fn update_venue(&self, _venue: &Venue) -> Result<()> {
            Err(refused())
        }
        async fn delete_venue(&self, _venue_id: i64) -> Result<()> {
            Err(refused())
        }
        async fn create_artist(&self, _artist: &mut crate::domain::Artist) -> Result<()> {
            Err(refused())
        }
        async fn get_artist_by_id(&self, artist_id: i64) -> Result<Option<crate::domain::Artist>> {
            self.inner.get_artist_by_id(artist_id).await
        }
        async fn get_all_artists(&self) -> Result<Vec<crate::domain::Artist>> {
            self.inner.get_all_artists().await
        }
        async fn search_artists(&self, term: &str) -> Result<Vec<crate::domain::Artist>> {
            self.inner.search_artists(term).await
        }
        async fn update_artist(&self, _artist: &crate::domain::Artist) -> Result<()> {
            Err(refused())
        }
        async fn delete_artist(&self, _artist_id: i64) -> Result<()> {
            Err(refused())
        }
        async fn create_show(&self, _show: &Show) -> Result<()> {
            Err(refused())
        }
        async fn get_all_shows(&self) -> Result<Vec<ShowListing>> {
            self.inner.get_all_shows().await
        }
        async fn get_shows_by_venue_id(&self, venue_id: i64) -> Result<Vec<ShowListing>> {
            self.inner.get_shows_by_venue_id(venue_id).await
        }
        async fn get_shows_by_artist_id(&self, artist_id: i64) -> Result<Vec<ShowListing>> {
            self.inner.get_shows_by_artist_id(artist_id).await
        }
    }

    fn venue_form(name: &str, city: &str) -> FormInput {
        FormInput::from_pairs([
            ("name", name),
            ("city", city),
            ("state", "CA"),
            ("address", "1015 Folsom Street"),
            ("genres", "Jazz"),
            ("genres", "Folk"),
            ("seeking_talent", "False"),
        ])
    }

    #[tokio::test]
    async fn test_create_then_show_venue() {
        let (_, venues) = setup();
        let created = venues
            .create_venue(&venue_form("The Musical Hop", "San Francisco"))
            .await
            .unwrap();
        let detail = venues.show_venue(created.id.unwrap()).await.unwrap();
        assert_eq!(detail.venue.genres, vec![Genre::Jazz, Genre::Folk]);
        assert_eq!(detail.shows.upcoming_shows_count(), 0);
        assert_eq!(detail.shows.past_shows_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_venue_is_not_persisted() {
        let (storage, venues) = setup();
        let mut input = venue_form("", "San Francisco");
        input.push("genres", "Polka");

        match venues.create_venue(&input).await {
            Err(WriteError::Invalid(errors)) => {
                assert!(errors.has("name"));
                assert!(errors.has("genres"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert!(storage.get_all_venues().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_counts_upcoming_per_venue() {
        let (storage, venues) = setup();
        let hop = venues
            .create_venue(&venue_form("The Musical Hop", "San Francisco"))
            .await
            .unwrap();
        let park = venues
            .create_venue(&venue_form("Park Square Live Music & Coffee", "San Francisco"))
            .await
            .unwrap();
        let bar = venues
            .create_venue(&venue_form("The Dueling Pianos Bar", "New York"))
            .await
            .unwrap();

        let mut artist_ids = Vec::new();
        for name in ["Guns N Petals", "Matt Quevedo", "The Wild Sax Band"] {
            let mut artist = crate::domain::Artist {
                id: None,
                name: name.to_string(),
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                phone: None,
                genres: vec![Genre::RockNRoll],
                website: None,
                facebook_link: None,
                image_link: None,
                seeking_venue: true,
                seeking_description: None,
            };
            storage.create_artist(&mut artist).await.unwrap();
            artist_ids.push(artist.id.unwrap());
        }
        for (venue, artist_id, when) in [
            (&hop, artist_ids[0], at(2035, 1, 1)),
            (&hop, artist_ids[1], at(2035, 2, 1)),
            (&hop, artist_ids[2], at(2019, 5, 21)),
            (&park, artist_ids[0], at(2035, 3, 1)),
        ] {
            storage
                .create_show(&Show {
                    venue_id: venue.id.unwrap(),
                    artist_id,
                    start_time: when,
                })
                .await
                .unwrap();
        }

        let areas = venues.list_venues().await.unwrap();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].city, "San Francisco");
        let counts: Vec<(i64, usize)> = areas
            .iter()
            .flat_map(|a| a.venues.iter().map(|v| (v.id, v.num_upcoming_shows)))
            .collect();
        assert_eq!(
            counts,
            vec![
                (hop.id.unwrap(), 2),
                (park.id.unwrap(), 1),
                (bar.id.unwrap(), 0),
            ]
        );

        let results = venues.search_venues("music").await.unwrap();
        assert_eq!(results.count, 2);
        assert_eq!(results.data[0].num_upcoming_shows, 2);
        assert_eq!(results.data[1].num_upcoming_shows, 1);

        let detail = venues.show_venue(hop.id.unwrap()).await.unwrap();
        assert_eq!(detail.shows.upcoming_shows_count(), 2);
        assert_eq!(detail.shows.past_shows_count(), 1);
        assert_eq!(detail.shows.past_shows[0].name, "The Wild Sax Band");
    }

    #[tokio::test]
    async fn test_update_unknown_venue() {
        let (_, venues) = setup();
        let err = venues
            .update_venue(7, &venue_form("Nowhere", "Reno"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(venues.show_venue(7).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_failed_write_stores_nothing() {
        let storage = Arc::new(WriteFailingStorage {
            inner: SqliteStorage::open_in_memory().unwrap(),
        });
        let venues = VenueUseCase::new(storage.clone(), Arc::new(FixedClock(at(2026, 1, 1))));

        let err = venues
            .create_venue(&venue_form("The Musical Hop", "San Francisco"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WriteError::Failed(BookingError::Storage { .. })
        ));
        assert!(!err.is_not_found());
        assert!(storage.inner.get_all_venues().await.unwrap().is_empty());
        assert!(venues.list_venues().await.unwrap().is_empty());
    }
}
