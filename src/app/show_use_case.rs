use std::sync::Arc;
use tracing::{error, info, warn};

use crate::aggregate::{show_rows, ShowRow};
use crate::app::WriteError;
use crate::domain::Show;
use crate::error::Result;
use crate::forms::{FormInput, ShowForm};
use crate::storage::Storage;

/// Venues and artists offered by the show form
#[derive(Debug, Clone, Default)]
pub struct ShowFormChoices {
    pub venues: Vec<(i64, String)>,
    pub artists: Vec<(i64, String)>,
}

pub struct ShowUseCase {
    storage: Arc<dyn Storage>,
}

impl ShowUseCase {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Every show, latest first
    pub async fn list_shows(&self) -> Result<Vec<ShowRow>> {
        let shows = self.storage.get_all_shows().await?;
        Ok(show_rows(&shows))
    }

    pub async fn form_choices(&self) -> Result<ShowFormChoices> {
        let venues = self.storage.get_all_venues().await?;
        let artists = self.storage.get_all_artists().await?;
        Ok(ShowFormChoices {
            venues: venues
                .into_iter()
                .filter_map(|v| v.id.map(|id| (id, v.name)))
                .collect(),
            artists: artists
                .into_iter()
                .filter_map(|a| a.id.map(|id| (id, a.name)))
                .collect(),
        })
    }

    /// Book a show; only the venue and artist references are checked
    pub async fn create_show(&self, input: &FormInput) -> std::result::Result<Show, WriteError> {
        let show = ShowForm::parse(input).map_err(|errors| {
            warn!("Rejected show submission: {}", errors);
            WriteError::Invalid(errors)
        })?;

        if let Err(e) = self.storage.create_show(&show).await {
            error!("Show could not be listed: {}", e);
            return Err(e.into());
        }
        info!("Show was successfully listed");
        Ok(show)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Artist, Venue};
    use crate::error::BookingError;
    use crate::storage::SqliteStorage;

    async fn seeded() -> (Arc<SqliteStorage>, i64, i64) {
        let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());
        let mut venue = Venue {
            id: None,
            name: "The Musical Hop".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            address: "1015 Folsom Street".to_string(),
            phone: None,
            genres: Vec::new(),
            website: None,
            facebook_link: None,
            image_link: None,
            seeking_talent: false,
            seeking_description: None,
        };
        let mut artist = Artist {
            id: None,
            name: "Guns N Petals".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: None,
            genres: Vec::new(),
            website: None,
            facebook_link: None,
            image_link: None,
            seeking_venue: false,
            seeking_description: None,
        };
        storage.create_venue(&mut venue).await.unwrap();
        storage.create_artist(&mut artist).await.unwrap();
        (storage, venue.id.unwrap(), artist.id.unwrap())
    }

    #[tokio::test]
    async fn test_create_and_list_show() {
        let (storage, venue_id, artist_id) = seeded().await;
        let shows = ShowUseCase::new(storage);

        let input = FormInput::from_pairs([
            ("venue_id", venue_id.to_string()),
            ("artist_id", artist_id.to_string()),
            ("start_time", "2035-04-01 20:00:00".to_string()),
        ]);
        shows.create_show(&input).await.unwrap();

        let rows = shows.list_shows().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].venue_name, "The Musical Hop");
        assert_eq!(rows[0].artist_name, "Guns N Petals");
        assert_eq!(rows[0].start_time, "2035-04-01 20:00:00");

        let choices = shows.form_choices().await.unwrap();
        assert_eq!(choices.venues, vec![(venue_id, "The Musical Hop".to_string())]);
    }

    #[tokio::test]
    async fn test_unknown_venue_is_reported() {
        let (storage, _, artist_id) = seeded().await;
        let shows = ShowUseCase::new(storage);

        let input = FormInput::from_pairs([
            ("venue_id", "404".to_string()),
            ("artist_id", artist_id.to_string()),
            ("start_time", "2035-04-01 20:00".to_string()),
        ]);
        let err = shows.create_show(&input).await.unwrap_err();
        assert!(matches!(
            err,
            WriteError::Failed(BookingError::MissingReference { entity: "Venue", id: 404 })
        ));
        assert!(shows.list_shows().await.unwrap().is_empty());
    }
}
