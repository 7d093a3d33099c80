//! Form input parsing and validation.
//!
//! A submitted form is read into a [`FormInput`], an ordered multi-map of the
//! raw key/value pairs. Each form declares its checks as a table of
//! [`FieldRule`]s; [`validate`] runs every rule and collects the failures as
//! [`FieldError`]s instead of stopping at the first one.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use url::Url;

use crate::constants::{genre_labels, is_us_state, Genre};
use crate::domain::{parse_timestamp, Artist, Show, Venue};

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9(][0-9 ().-]{5,}[0-9]$").expect("phone pattern is valid")
});

/// Raw submitted form fields, in submission order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    pairs: Vec<(String, String)>,
}

impl FormInput {
    /// Parse an `application/x-www-form-urlencoded` body
    pub fn parse(body: &[u8]) -> Self {
        let pairs = form_urlencoded::parse(body)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value for `key`, trimmed; empty values count as absent
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Every non-empty value submitted for `key` (multi-selects)
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .collect()
    }

    pub fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    pub fn optional_text(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(parse_flag).unwrap_or(false)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// A single check applied to one field
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Required,
    /// Absolute http(s) URL, when present
    Url,
    /// Loose phone number shape, when present
    Phone,
    /// Value must be a two-letter US state code
    UsState,
    /// Every submitted value must be a known genre
    Genres,
    /// True/False radio choice, when present
    Boolean,
    Integer,
    Timestamp,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub rule: Rule,
}

const fn rule(field: &'static str, rule: Rule) -> FieldRule {
    FieldRule { field, rule }
}

pub const VENUE_RULES: &[FieldRule] = &[
    rule("name", Rule::Required),
    rule("city", Rule::Required),
    rule("state", Rule::Required),
    rule("state", Rule::UsState),
    rule("address", Rule::Required),
    rule("phone", Rule::Phone),
    rule("genres", Rule::Genres),
    rule("website", Rule::Url),
    rule("facebook_link", Rule::Url),
    rule("image_link", Rule::Url),
    rule("seeking_talent", Rule::Boolean),
];

pub const ARTIST_RULES: &[FieldRule] = &[
    rule("name", Rule::Required),
    rule("city", Rule::Required),
    rule("state", Rule::Required),
    rule("state", Rule::UsState),
    rule("phone", Rule::Phone),
    rule("genres", Rule::Genres),
    rule("website", Rule::Url),
    rule("facebook_link", Rule::Url),
    rule("image_link", Rule::Url),
    rule("seeking_venue", Rule::Boolean),
];

pub const SHOW_RULES: &[FieldRule] = &[
    rule("venue_id", Rule::Required),
    rule("venue_id", Rule::Integer),
    rule("artist_id", Rule::Required),
    rule("artist_id", Rule::Integer),
    rule("start_time", Rule::Required),
    rule("start_time", Rule::Timestamp),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.errors.iter().map(|e| e.field).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// Run every rule against `input`, collecting all failures
pub fn validate(input: &FormInput, rules: &[FieldRule]) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    for FieldRule { field, rule } in rules.iter().copied() {
        if let Some(message) = check(input, field, rule) {
            errors.push(field, message);
        }
    }
    errors
}

fn check(input: &FormInput, field: &'static str, rule: Rule) -> Option<String> {
    if let Rule::Required = rule {
        return input
            .get(field)
            .is_none()
            .then(|| "This field is required.".to_string());
    }
    if let Rule::Genres = rule {
        let has_unknown = input
            .get_all(field)
            .into_iter()
            .any(|label| label.parse::<Genre>().is_err());
        return has_unknown.then(|| {
            format!(
                "Invalid value, must be one of: {}.",
                genre_labels().join(",")
            )
        });
    }

    // Remaining rules only apply to values that were actually submitted
    let value = input.get(field)?;
    let (ok, message) = match rule {
        Rule::Url => (is_web_url(value), url_message(field)),
        Rule::Phone => (PHONE_RE.is_match(value), "Please enter a valid phone number."),
        Rule::UsState => (is_us_state(value), "Not a valid choice."),
        Rule::Boolean => (parse_flag(value).is_some(), "Not a valid choice."),
        Rule::Integer => (value.parse::<i64>().is_ok(), "Please enter a whole number."),
        Rule::Timestamp => (parse_timestamp(value).is_some(), "Not a valid datetime value."),
        Rule::Required | Rule::Genres => (true, ""),
    };
    (!ok).then(|| message.to_string())
}

fn url_message(field: &str) -> &'static str {
    match field {
        "website" => "Please enter a valid website URL.",
        "facebook_link" => "Please enter a valid facebook URL Link.",
        _ => "Please enter a valid URL.",
    }
}

fn is_web_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().map_or(false, |h| !h.is_empty())
        }
        Err(_) => false,
    }
}

fn parse_genres(input: &FormInput) -> Vec<Genre> {
    input
        .get_all("genres")
        .into_iter()
        .filter_map(|label| label.parse().ok())
        .collect()
}

/// Venue submitted through the create or edit form
pub struct VenueForm;

impl VenueForm {
    /// Validate and build a venue without an id
    pub fn parse(input: &FormInput) -> Result<Venue, ValidationErrors> {
        let errors = validate(input, VENUE_RULES);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Venue {
            id: None,
            name: input.text("name"),
            city: input.text("city"),
            state: input.text("state"),
            address: input.text("address"),
            phone: input.optional_text("phone"),
            genres: parse_genres(input),
            website: input.optional_text("website"),
            facebook_link: input.optional_text("facebook_link"),
            image_link: input.optional_text("image_link"),
            seeking_talent: input.flag("seeking_talent"),
            seeking_description: input.optional_text("seeking_description"),
        })
    }

    /// Form fields prefilled from a stored venue
    pub fn prefill(venue: &Venue) -> FormInput {
        let mut input = FormInput::from_pairs([
            ("name", venue.name.as_str()),
            ("city", venue.city.as_str()),
            ("state", venue.state.as_str()),
            ("address", venue.address.as_str()),
            ("phone", venue.phone.as_deref().unwrap_or_default()),
            ("website", venue.website.as_deref().unwrap_or_default()),
            ("facebook_link", venue.facebook_link.as_deref().unwrap_or_default()),
            ("image_link", venue.image_link.as_deref().unwrap_or_default()),
            (
                "seeking_description",
                venue.seeking_description.as_deref().unwrap_or_default(),
            ),
        ]);
        input.push("seeking_talent", if venue.seeking_talent { "True" } else { "False" });
        for genre in &venue.genres {
            input.push("genres", genre.as_str());
        }
        input
    }
}

/// Artist submitted through the create or edit form
pub struct ArtistForm;

impl ArtistForm {
    pub fn parse(input: &FormInput) -> Result<Artist, ValidationErrors> {
        let errors = validate(input, ARTIST_RULES);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Artist {
            id: None,
            name: input.text("name"),
            city: input.text("city"),
            state: input.text("state"),
            phone: input.optional_text("phone"),
            genres: parse_genres(input),
            website: input.optional_text("website"),
            facebook_link: input.optional_text("facebook_link"),
            image_link: input.optional_text("image_link"),
            seeking_venue: input.flag("seeking_venue"),
            seeking_description: input.optional_text("seeking_description"),
        })
    }

    pub fn prefill(artist: &Artist) -> FormInput {
        let mut input = FormInput::from_pairs([
            ("name", artist.name.as_str()),
            ("city", artist.city.as_str()),
            ("state", artist.state.as_str()),
            ("phone", artist.phone.as_deref().unwrap_or_default()),
            ("website", artist.website.as_deref().unwrap_or_default()),
            ("facebook_link", artist.facebook_link.as_deref().unwrap_or_default()),
            ("image_link", artist.image_link.as_deref().unwrap_or_default()),
            (
                "seeking_description",
                artist.seeking_description.as_deref().unwrap_or_default(),
            ),
        ]);
        input.push("seeking_venue", if artist.seeking_venue { "True" } else { "False" });
        for genre in &artist.genres {
            input.push("genres", genre.as_str());
        }
        input
    }
}

pub struct ShowForm;

impl ShowForm {
    pub fn parse(input: &FormInput) -> Result<Show, ValidationErrors> {
        let errors = validate(input, SHOW_RULES);
        if !errors.is_empty() {
            return Err(errors);
        }
        let (venue_id, artist_id, start_time) = match (
            input.get("venue_id").and_then(|v| v.parse::<i64>().ok()),
            input.get("artist_id").and_then(|v| v.parse::<i64>().ok()),
            input.get("start_time").and_then(parse_timestamp),
        ) {
            (Some(v), Some(a), Some(t)) => (v, a, t),
            // validate() has already rejected anything that fails to parse
            _ => return Err(errors),
        };
        Ok(Show {
            venue_id,
            artist_id,
            start_time: truncate_subseconds(start_time),
        })
    }
}

fn truncate_subseconds(ts: NaiveDateTime) -> NaiveDateTime {
    use chrono::Timelike;
    ts.with_nanosecond(0).unwrap_or(ts)
}
