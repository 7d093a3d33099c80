//! Derived views built from stored records: venue areas, per-entity
//! upcoming-show counts, search results and past/upcoming show splits.
//!
//! Nothing here is persisted. "Upcoming" is always decided against the `now`
//! passed in by the caller.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::{format_timestamp, ShowListing, Venue};

/// Id, name and upcoming-show count of one venue or artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Venues sharing a (city, state) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<EntitySummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<EntitySummary>,
}

impl SearchResults {
    pub fn new(data: Vec<EntitySummary>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// One show as seen from a detail page: the other side of the booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowEntry {
    pub id: i64,
    pub name: String,
    pub image_link: String,
    pub start_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShowPartition {
    pub past_shows: Vec<ShowEntry>,
    pub upcoming_shows: Vec<ShowEntry>,
}

impl ShowPartition {
    pub fn past_shows_count(&self) -> usize {
        self.past_shows.len()
    }

    pub fn upcoming_shows_count(&self) -> usize {
        self.upcoming_shows.len()
    }
}

/// Which side of a show a detail page wants to display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counterpart {
    Venue,
    Artist,
}

/// Row of the `/shows` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowRow {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
}

/// Count upcoming shows per key. Every key starts from its own zero.
pub fn upcoming_counts<F>(shows: &[ShowListing], now: NaiveDateTime, key: F) -> HashMap<i64, usize>
where
    F: Fn(&ShowListing) -> i64,
{
    let mut counts = HashMap::new();
    for show in shows.iter().filter(|s| s.is_upcoming(now)) {
        *counts.entry(key(show)).or_insert(0) += 1;
    }
    counts
}

pub fn summarize(id: i64, name: &str, counts: &HashMap<i64, usize>) -> EntitySummary {
    EntitySummary {
        id,
        name: name.to_string(),
        num_upcoming_shows: counts.get(&id).copied().unwrap_or(0),
    }
}

/// Group venues by (city, state).
///
/// Areas appear in the order their first venue appears in `venues`; venues
/// keep their input order inside an area.
pub fn group_by_area(venues: &[Venue], counts: &HashMap<i64, usize>) -> Vec<VenueArea> {
    let mut areas: Vec<VenueArea> = Vec::new();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();

    for venue in venues {
        let Some(id) = venue.id else { continue };
        let summary = summarize(id, &venue.name, counts);
        let key = (venue.city.as_str(), venue.state.as_str());
        match index.get(&key) {
            Some(&i) => areas[i].venues.push(summary),
            None => {
                index.insert(key, areas.len());
                areas.push(VenueArea {
                    city: venue.city.clone(),
                    state: venue.state.clone(),
                    venues: vec![summary],
                });
            }
        }
    }
    areas
}

/// Split shows into past and upcoming, keeping their input order
pub fn partition_shows(
    shows: &[ShowListing],
    counterpart: Counterpart,
    now: NaiveDateTime,
) -> ShowPartition {
    let mut partition = ShowPartition::default();
    for show in shows {
        let entry = match counterpart {
            Counterpart::Venue => ShowEntry {
                id: show.venue_id,
                name: show.venue_name.clone(),
                image_link: show.venue_image_link.clone().unwrap_or_default(),
                start_time: format_timestamp(&show.start_time),
            },
            Counterpart::Artist => ShowEntry {
                id: show.artist_id,
                name: show.artist_name.clone(),
                image_link: show.artist_image_link.clone().unwrap_or_default(),
                start_time: format_timestamp(&show.start_time),
            },
        };
        if show.is_upcoming(now) {
            partition.upcoming_shows.push(entry);
        } else {
            partition.past_shows.push(entry);
        }
    }
    partition
}

pub fn show_rows(shows: &[ShowListing]) -> Vec<ShowRow> {
    shows
        .iter()
        .map(|show| ShowRow {
            venue_id: show.venue_id,
            venue_name: show.venue_name.clone(),
            artist_id: show.artist_id,
            artist_name: show.artist_name.clone(),
            artist_image_link: show.artist_image_link.clone().unwrap_or_default(),
            start_time: format_timestamp(&show.start_time),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap()
    }

    fn now() -> NaiveDateTime {
        at(2026, 1, 1)
    }

    fn venue(id: i64, name: &str, city: &str, state: &str) -> Venue {
        Venue {
            id: Some(id),
            name: name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            address: String::new(),
            phone: None,
            genres: Vec::new(),
            website: None,
            facebook_link: None,
            image_link: None,
            seeking_talent: false,
            seeking_description: None,
        }
    }

    fn show(venue_id: i64, artist_id: i64, start_time: NaiveDateTime) -> ShowListing {
        ShowListing {
            venue_id,
            venue_name: format!("venue {venue_id}"),
            venue_image_link: None,
            artist_id,
            artist_name: format!("artist {artist_id}"),
            artist_image_link: Some(format!("https://img/{artist_id}.jpg")),
            start_time,
        }
    }

    #[test]
    fn test_upcoming_counts_are_per_venue() {
        let shows = vec![
            show(1, 10, at(2030, 1, 1)),
            show(1, 11, at(2031, 1, 1)),
            show(1, 12, at(2019, 1, 1)),
            show(2, 10, at(2032, 1, 1)),
        ];
        let counts = upcoming_counts(&shows, now(), |s| s.venue_id);
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), Some(&1));
        assert_eq!(counts.get(&3), None);

        let by_artist = upcoming_counts(&shows, now(), |s| s.artist_id);
        assert_eq!(by_artist.get(&10), Some(&2));
        assert_eq!(by_artist.get(&12), None);
    }

    #[test]
    fn test_group_by_area_partitions_venues() {
        let venues = vec![
            venue(1, "The Musical Hop", "San Francisco", "CA"),
            venue(2, "The Dueling Pianos Bar", "New York", "NY"),
            venue(3, "Park Square Live Music & Coffee", "San Francisco", "CA"),
            venue(4, "Springfield Hall", "Springfield", "IL"),
            venue(5, "Springfield Barn", "Springfield", "MA"),
        ];
        let counts = HashMap::from([(1, 1), (3, 0)]);
        let areas = group_by_area(&venues, &counts);

        let keys: Vec<(&str, &str)> = areas
            .iter()
            .map(|a| (a.city.as_str(), a.state.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("San Francisco", "CA"),
                ("New York", "NY"),
                ("Springfield", "IL"),
                ("Springfield", "MA"),
            ]
        );

        let mut ids: Vec<i64> = areas
            .iter()
            .flat_map(|a| a.venues.iter().map(|v| v.id))
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        assert_eq!(areas[0].venues[0].num_upcoming_shows, 1);
        assert_eq!(areas[0].venues[1].num_upcoming_shows, 0);
        assert_eq!(areas[1].venues[0].num_upcoming_shows, 0);
    }

    #[test]
    fn test_partition_shows_boundary_is_upcoming() {
        let shows = vec![
            show(1, 10, at(2019, 5, 21)),
            show(1, 11, now()),
            show(1, 12, at(2035, 4, 1)),
        ];
        let partition = partition_shows(&shows, Counterpart::Artist, now());
        assert_eq!(partition.past_shows_count(), 1);
        assert_eq!(partition.upcoming_shows_count(), 2);
        assert_eq!(partition.past_shows[0].id, 10);
        assert_eq!(partition.past_shows[0].start_time, "2019-05-21 20:00:00");
        assert_eq!(partition.upcoming_shows[0].image_link, "https://img/11.jpg");

        let by_venue = partition_shows(&shows, Counterpart::Venue, now());
        assert_eq!(by_venue.upcoming_shows[1].name, "venue 1");
        assert_eq!(by_venue.upcoming_shows[1].image_link, "");
    }

    #[test]
    fn test_search_results_count() {
        let results = SearchResults::new(vec![summarize(1, "The Musical Hop", &HashMap::new())]);
        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].num_upcoming_shows, 0);
    }
}
