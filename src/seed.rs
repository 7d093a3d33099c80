//! Demo directory loaded by `fyyur seed`.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::info;

use crate::constants::Genre;
use crate::domain::{Artist, Show, Venue};
use crate::error::Result;
use crate::storage::{SqliteStorage, Storage};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub venues: usize,
    pub artists: usize,
    pub shows: usize,
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn past(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .unwrap_or_default()
}

fn demo_venues() -> Vec<Venue> {
    vec![
        Venue {
            id: None,
            name: "The Musical Hop".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            address: "1015 Folsom Street".to_string(),
            phone: text("123-123-1234"),
            genres: vec![Genre::Jazz, Genre::Reggae, Genre::Classical, Genre::Folk],
            website: text("https://www.themusicalhop.com"),
            facebook_link: text("https://www.facebook.com/TheMusicalHop"),
            image_link: text("https://images.unsplash.com/photo-1543900694-133f37abaaa5?w=400"),
            seeking_talent: true,
            seeking_description: text(
                "We are on the lookout for a local artist to play every two weeks. Please call us.",
            ),
        },
        Venue {
            id: None,
            name: "The Dueling Pianos Bar".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            address: "335 Delancey Street".to_string(),
            phone: text("914-003-1132"),
            genres: vec![Genre::Classical, Genre::RhythmAndBlues, Genre::HipHop],
            website: text("https://www.theduelingpianos.com"),
            facebook_link: text("https://www.facebook.com/theduelingpianos"),
            image_link: text("https://images.unsplash.com/photo-1497032205916-ac775f0649ae?w=400"),
            seeking_talent: false,
            seeking_description: None,
        },
        Venue {
            id: None,
            name: "Park Square Live Music & Coffee".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            address: "34 Whiskey Moore Ave".to_string(),
            phone: text("415-000-1234"),
            genres: vec![Genre::RockNRoll, Genre::Jazz, Genre::Classical, Genre::Folk],
            website: text("https://www.parksquarelivemusicandcoffee.com"),
            facebook_link: text("https://www.facebook.com/ParkSquareLiveMusicAndCoffee"),
            image_link: text("https://images.unsplash.com/photo-1485686531765-ba63b07845a7?w=400"),
            seeking_talent: false,
            seeking_description: None,
        },
    ]
}

fn demo_artists() -> Vec<Artist> {
    vec![
        Artist {
            id: None,
            name: "Guns N Petals".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: text("326-123-5000"),
            genres: vec![Genre::RockNRoll],
            website: text("https://www.gunsnpetalsband.com"),
            facebook_link: text("https://www.facebook.com/GunsNPetals"),
            image_link: text("https://images.unsplash.com/photo-1549213783-8284d0336c4f?w=300"),
            seeking_venue: true,
            seeking_description: text(
                "Looking for shows to perform at in the San Francisco Bay Area!",
            ),
        },
        Artist {
            id: None,
            name: "Matt Quevedo".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            phone: text("300-400-5000"),
            genres: vec![Genre::Jazz],
            website: None,
            facebook_link: text("https://www.facebook.com/mattquevedo923251523"),
            image_link: text("https://images.unsplash.com/photo-1495223153807-b916f75de8c5?w=334"),
            seeking_venue: false,
            seeking_description: None,
        },
        Artist {
            id: None,
            name: "The Wild Sax Band".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: text("432-325-5432"),
            genres: vec![Genre::Jazz, Genre::Classical],
            website: None,
            facebook_link: None,
            image_link: text("https://images.unsplash.com/photo-1558369981-f9ca78462e61?w=794"),
            seeking_venue: false,
            seeking_description: None,
        },
    ]
}

/// Insert the demo venues, artists and shows into an empty database.
///
/// Upcoming shows are placed relative to `now`; a database that already holds
/// venues or artists is left alone.
pub async fn seed_demo_data(storage: &SqliteStorage, now: NaiveDateTime) -> Result<SeedReport> {
    if !storage.is_empty()? {
        info!("Database already has listings; skipping seed");
        return Ok(SeedReport::default());
    }

    let mut report = SeedReport::default();
    let mut venue_ids = Vec::new();
    for mut venue in demo_venues() {
        storage.create_venue(&mut venue).await?;
        venue_ids.extend(venue.id);
        report.venues += 1;
    }
    let mut artist_ids = Vec::new();
    for mut artist in demo_artists() {
        storage.create_artist(&mut artist).await?;
        artist_ids.extend(artist.id);
        report.artists += 1;
    }

    // (venue index, artist index, start time)
    let bookings = [
        (0, 0, past(2019, 5, 21, 21)),
        (2, 1, past(2019, 6, 15, 23)),
        (2, 2, now + Duration::days(30)),
        (1, 2, now + Duration::days(37)),
        (0, 1, now + Duration::days(44)),
    ];
    for (venue, artist, start_time) in bookings {
        let (Some(&venue_id), Some(&artist_id)) = (venue_ids.get(venue), artist_ids.get(artist))
        else {
            continue;
        };
        storage
            .create_show(&Show {
                venue_id,
                artist_id,
                start_time: truncate_to_minute(start_time),
            })
            .await?;
        report.shows += 1;
    }

    info!(
        "Seeded {} venues, {} artists and {} shows",
        report.venues, report.artists, report.shows
    );
    Ok(report)
}

fn truncate_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    use chrono::Timelike;
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}
