use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::Genre;

/// Text form of a show start time, both in storage and on screen
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: Option<i64>,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub genres: Vec<Genre>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: Option<i64>,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<Genre>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

/// A booking of one artist at one venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: NaiveDateTime,
}

/// A show joined with the names and images of both sides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

impl ShowListing {
    pub fn is_upcoming(&self, now: NaiveDateTime) -> bool {
        self.start_time >= now
    }
}

/// Serialize a genre list into its stored, comma-delimited form
pub fn encode_genres(genres: &[Genre]) -> String {
    genres
        .iter()
        .map(Genre::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a stored genre list.
///
/// Accepts the `{Jazz,Reggae}` array-literal form as well as the plain
/// delimited form. Unknown labels are dropped with a warning.
pub fn decode_genres(stored: &str) -> Vec<Genre> {
    let trimmed = stored.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(trimmed);

    inner
        .split(',')
        .map(|label| label.trim().trim_matches('"'))
        .filter(|label| !label.is_empty())
        .filter_map(|label| match label.parse::<Genre>() {
            Ok(genre) => Some(genre),
            Err(e) => {
                warn!("Ignoring stored genre: {}", e);
                None
            }
        })
        .collect()
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp as typed into a form or read back from storage
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    const ACCEPTED: [&str; 5] = [
        TIMESTAMP_FORMAT,
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
    ];
    let raw = raw.trim();
    ACCEPTED
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_genres_round_trip_preserves_order() {
        let genres = vec![Genre::RockNRoll, Genre::Jazz, Genre::RhythmAndBlues];
        let stored = encode_genres(&genres);
        assert_eq!(stored, "Rock n Roll,Jazz,R&B");
        assert_eq!(decode_genres(&stored), genres);
    }

    #[test]
    fn test_decode_array_literal() {
        assert_eq!(
            decode_genres("{Jazz,Reggae,Swing,Folk}"),
            vec![Genre::Jazz, Genre::Reggae, Genre::Folk]
        );
        assert_eq!(
            decode_genres(r#"{"Hip-Hop","Heavy Metal"}"#),
            vec![Genre::HipHop, Genre::HeavyMetal]
        );
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode_genres("").is_empty());
        assert!(decode_genres("{}").is_empty());
        assert!(encode_genres(&[]).is_empty());
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2035, 4, 1)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2035-04-01 20:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2035-04-01T20:00"), Some(expected));
        assert_eq!(parse_timestamp(" 2035-04-01 20:00 "), Some(expected));
        assert_eq!(format_timestamp(&expected), "2035-04-01 20:00:00");
        assert_eq!(parse_timestamp("next tuesday"), None);
    }
}
