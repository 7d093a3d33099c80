use crate::domain::{
    decode_genres, encode_genres, format_timestamp, parse_timestamp, Artist, Show, ShowListing,
    Venue,
};
use crate::error::{BookingError, Result};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Params, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const MIGRATION_SQL: &str = include_str!("../../migrations/001_create_venues_artists_shows.sql");

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, genres, website, \
     facebook_link, image_link, seeking_talent, seeking_description";

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, genres, website, \
     facebook_link, image_link, seeking_venue, seeking_description";

const SHOW_LISTING_SELECT: &str = "SELECT s.venue_id, v.name, v.image_link, \
     s.artist_id, a.name, a.image_link, s.start_time \
     FROM shows s \
     JOIN venues v ON v.id = s.venue_id \
     JOIN artists a ON a.id = s.artist_id";

/// SQLite-backed storage. One connection, serialized behind a mutex.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) the database file and run migrations
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        info!("Opening SQLite database at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        debug!("Running database migrations");
        conn.execute_batch(MIGRATION_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| BookingError::Storage {
            message: "connection lock poisoned".to_string(),
        })
    }

    /// True when neither venues nor artists have been created yet
    pub fn is_empty(&self) -> Result<bool> {
        let conn = self.lock()?;
        let rows: i64 = conn.query_row(
            "SELECT (SELECT COUNT(*) FROM venues) + (SELECT COUNT(*) FROM artists)",
            [],
            |row| row.get(0),
        )?;
        Ok(rows == 0)
    }
}

fn venue_from_row(row: &Row<'_>) -> rusqlite::Result<Venue> {
    let genres: String = row.get(6)?;
    Ok(Venue {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        city: row.get(2)?,
        state: row.get(3)?,
        address: row.get(4)?,
        phone: row.get(5)?,
        genres: decode_genres(&genres),
        website: row.get(7)?,
        facebook_link: row.get(8)?,
        image_link: row.get(9)?,
        seeking_talent: row.get(10)?,
        seeking_description: row.get(11)?,
    })
}

fn artist_from_row(row: &Row<'_>) -> rusqlite::Result<Artist> {
    let genres: String = row.get(5)?;
    Ok(Artist {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        city: row.get(2)?,
        state: row.get(3)?,
        phone: row.get(4)?,
        genres: decode_genres(&genres),
        website: row.get(6)?,
        facebook_link: row.get(7)?,
        image_link: row.get(8)?,
        seeking_venue: row.get(9)?,
        seeking_description: row.get(10)?,
    })
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("invalid timestamp '{raw}'").into(),
        )
    })
}

fn show_listing_from_row(row: &Row<'_>) -> rusqlite::Result<ShowListing> {
    Ok(ShowListing {
        venue_id: row.get(0)?,
        venue_name: row.get(1)?,
        venue_image_link: row.get(2)?,
        artist_id: row.get(3)?,
        artist_name: row.get(4)?,
        artist_image_link: row.get(5)?,
        start_time: timestamp_column(row, 6)?,
    })
}

fn query_all<T, P, F>(conn: &Connection, sql: &str, params: P, map: F) -> Result<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, map)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn exists(conn: &Connection, table: &str, id: i64) -> Result<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)");
    Ok(conn.query_row(&sql, params![id], |row| row.get(0))?)
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn create_venue(&self, venue: &mut Venue) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO venues (name, city, state, address, phone, genres, website, \
             facebook_link, image_link, seeking_talent, seeking_description) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                venue.name,
                venue.city,
                venue.state,
                venue.address,
                venue.phone,
                encode_genres(&venue.genres),
                venue.website,
                venue.facebook_link,
                venue.image_link,
                venue.seeking_talent,
                venue.seeking_description,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        venue.id = Some(id);
        info!("Created venue: {} with id {}", venue.name, id);
        Ok(())
    }

    async fn get_venue_by_id(&self, venue_id: i64) -> Result<Option<Venue>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = ?1");
        let mut venues = query_all(&conn, &sql, params![venue_id], venue_from_row)?;
        Ok(venues.pop())
    }

    async fn get_all_venues(&self) -> Result<Vec<Venue>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {VENUE_COLUMNS} FROM venues ORDER BY id");
        query_all(&conn, &sql, params![], venue_from_row)
    }

    async fn search_venues(&self, term: &str) -> Result<Vec<Venue>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {VENUE_COLUMNS} FROM venues \
             WHERE instr(lower(name), lower(?1)) > 0 ORDER BY id"
        );
        query_all(&conn, &sql, params![term], venue_from_row)
    }

    async fn update_venue(&self, venue: &Venue) -> Result<()> {
        let venue_id = venue
            .id
            .ok_or_else(|| BookingError::MissingField("venue id".to_string()))?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let updated = tx.execute(
            "UPDATE venues SET name = ?1, city = ?2, state = ?3, address = ?4, phone = ?5, \
             genres = ?6, website = ?7, facebook_link = ?8, image_link = ?9, \
             seeking_talent = ?10, seeking_description = ?11 WHERE id = ?12",
            params![
                venue.name,
                venue.city,
                venue.state,
                venue.address,
                venue.phone,
                encode_genres(&venue.genres),
                venue.website,
                venue.facebook_link,
                venue.image_link,
                venue.seeking_talent,
                venue.seeking_description,
                venue_id,
            ],
        )?;
        if updated == 0 {
            return Err(BookingError::NotFound {
                entity: "Venue",
                id: venue_id,
            });
        }
        tx.commit()?;

        info!("Updated venue: {} with id {}", venue.name, venue_id);
        Ok(())
    }

    async fn delete_venue(&self, venue_id: i64) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let shows = tx.execute("DELETE FROM shows WHERE venue_id = ?1", params![venue_id])?;
        let deleted = tx.execute("DELETE FROM venues WHERE id = ?1", params![venue_id])?;
        if deleted == 0 {
            return Err(BookingError::NotFound {
                entity: "Venue",
                id: venue_id,
            });
        }
        tx.commit()?;

        info!("Deleted venue {} and {} show(s)", venue_id, shows);
        Ok(())
    }

    async fn create_artist(&self, artist: &mut Artist) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO artists (name, city, state, phone, genres, website, facebook_link, \
             image_link, seeking_venue, seeking_description) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                artist.name,
                artist.city,
                artist.state,
                artist.phone,
                encode_genres(&artist.genres),
                artist.website,
                artist.facebook_link,
                artist.image_link,
                artist.seeking_venue,
                artist.seeking_description,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        artist.id = Some(id);
        info!("Created artist: {} with id {}", artist.name, id);
        Ok(())
    }

    async fn get_artist_by_id(&self, artist_id: i64) -> Result<Option<Artist>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE id = ?1");
        let mut artists = query_all(&conn, &sql, params![artist_id], artist_from_row)?;
        Ok(artists.pop())
    }

    async fn get_all_artists(&self) -> Result<Vec<Artist>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {ARTIST_COLUMNS} FROM artists ORDER BY id");
        query_all(&conn, &sql, params![], artist_from_row)
    }

    async fn search_artists(&self, term: &str) -> Result<Vec<Artist>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {ARTIST_COLUMNS} FROM artists \
             WHERE instr(lower(name), lower(?1)) > 0 ORDER BY id"
        );
        query_all(&conn, &sql, params![term], artist_from_row)
    }

    async fn update_artist(&self, artist: &Artist) -> Result<()> {
        let artist_id = artist
            .id
            .ok_or_else(|| BookingError::MissingField("artist id".to_string()))?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let updated = tx.execute(
            "UPDATE artists SET name = ?1, city = ?2, state = ?3, phone = ?4, genres = ?5, \
             website = ?6, facebook_link = ?7, image_link = ?8, seeking_venue = ?9, \
             seeking_description = ?10 WHERE id = ?11",
            params![
                artist.name,
                artist.city,
                artist.state,
                artist.phone,
                encode_genres(&artist.genres),
                artist.website,
                artist.facebook_link,
                artist.image_link,
                artist.seeking_venue,
                artist.seeking_description,
                artist_id,
            ],
        )?;
        if updated == 0 {
            return Err(BookingError::NotFound {
                entity: "Artist",
                id: artist_id,
            });
        }
        tx.commit()?;

        info!("Updated artist: {} with id {}", artist.name, artist_id);
        Ok(())
    }

    async fn delete_artist(&self, artist_id: i64) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let booked: i64 = tx.query_row(
            "SELECT COUNT(*) FROM shows WHERE artist_id = ?1",
            params![artist_id],
            |row| row.get(0),
        )?;
        if booked > 0 {
            return Err(BookingError::InUse {
                entity: "Artist",
                id: artist_id,
                shows: booked as usize,
            });
        }
        let deleted = tx.execute("DELETE FROM artists WHERE id = ?1", params![artist_id])?;
        if deleted == 0 {
            return Err(BookingError::NotFound {
                entity: "Artist",
                id: artist_id,
            });
        }
        tx.commit()?;

        info!("Deleted artist {}", artist_id);
        Ok(())
    }

    async fn create_show(&self, show: &Show) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        if !exists(&tx, "venues", show.venue_id)? {
            return Err(BookingError::MissingReference {
                entity: "Venue",
                id: show.venue_id,
            });
        }
        if !exists(&tx, "artists", show.artist_id)? {
            return Err(BookingError::MissingReference {
                entity: "Artist",
                id: show.artist_id,
            });
        }
        tx.execute(
            "INSERT INTO shows (venue_id, artist_id, start_time) VALUES (?1, ?2, ?3)",
            params![show.venue_id, show.artist_id, format_timestamp(&show.start_time)],
        )?;
        tx.commit()?;

        info!(
            "Created show: artist {} at venue {} on {}",
            show.artist_id, show.venue_id, show.start_time
        );
        Ok(())
    }

    async fn get_all_shows(&self) -> Result<Vec<ShowListing>> {
        let conn = self.lock()?;
        let sql =
            format!("{SHOW_LISTING_SELECT} ORDER BY s.start_time DESC, s.venue_id, s.artist_id");
        query_all(&conn, &sql, params![], show_listing_from_row)
    }

    async fn get_shows_by_venue_id(&self, venue_id: i64) -> Result<Vec<ShowListing>> {
        let conn = self.lock()?;
        let sql = format!("{SHOW_LISTING_SELECT} WHERE s.venue_id = ?1 ORDER BY s.start_time");
        query_all(&conn, &sql, params![venue_id], show_listing_from_row)
    }

    async fn get_shows_by_artist_id(&self, artist_id: i64) -> Result<Vec<ShowListing>> {
        let conn = self.lock()?;
        let sql = format!("{SHOW_LISTING_SELECT} WHERE s.artist_id = ?1 ORDER BY s.start_time");
        query_all(&conn, &sql, params![artist_id], show_listing_from_row)
    }
}
