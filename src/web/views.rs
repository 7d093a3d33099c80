// Web-specific shapes handed to the templates. Everything here is already
// flattened to strings and bools so the templates never unwrap an Option.
use serde::Deserialize;

use crate::app::ShowFormChoices;
use crate::constants::{Genre, US_STATES};
use crate::domain::{Artist, Venue};
use crate::forms::{FormInput, ValidationErrors};

/// `?notice=` query parameter appended by post-write redirects
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

/// Outcome of a write, carried across a redirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Listed,
    Updated,
    UpdateFailed,
    Deleted,
}

impl Notice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Notice::Listed => "listed",
            Notice::Updated => "updated",
            Notice::UpdateFailed => "update_failed",
            Notice::Deleted => "deleted",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "listed" => Some(Notice::Listed),
            "updated" => Some(Notice::Updated),
            "update_failed" => Some(Notice::UpdateFailed),
            "deleted" => Some(Notice::Deleted),
            _ => None,
        }
    }

    /// Message shown at the top of the page for `subject` (e.g. "Venue The Musical Hop")
    pub fn message(&self, subject: &str) -> String {
        match self {
            Notice::Listed => format!("{subject} was successfully listed!"),
            Notice::Updated => format!("{subject} was successfully updated!"),
            Notice::UpdateFailed => format!("An error occurred. {subject} could not be updated."),
            Notice::Deleted => format!("{subject} was successfully deleted!"),
        }
    }
}

impl NoticeQuery {
    /// Rendered message, or an empty string when there is nothing to say
    pub fn message(&self, subject: &str) -> String {
        self.notice
            .as_deref()
            .and_then(Notice::parse)
            .map(|n| n.message(subject))
            .unwrap_or_default()
    }
}

/// An `<option>` in a select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Current values and errors of an entity form
#[derive(Debug, Clone, Default)]
pub struct FormView {
    values: FormInput,
    errors: ValidationErrors,
    pub failure: String,
}

impl FormView {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn filled(values: FormInput) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    pub fn rejected(values: FormInput, errors: ValidationErrors) -> Self {
        Self {
            values,
            errors,
            failure: String::new(),
        }
    }

    pub fn failed(values: FormInput, failure: impl Into<String>) -> Self {
        Self {
            values,
            errors: ValidationErrors::default(),
            failure: failure.into(),
        }
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).unwrap_or_default()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.has(field)
    }

    pub fn errors_for(&self, field: &str) -> Vec<&str> {
        self.errors.messages_for(field)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Radio state of a True/False field; unset reads as "False"
    pub fn flag(&self, field: &str) -> bool {
        self.values.flag(field)
    }

    pub fn state_choices(&self) -> Vec<Choice> {
        let current = self.value("state");
        US_STATES
            .iter()
            .map(|code| Choice {
                value: code.to_string(),
                label: code.to_string(),
                selected: *code == current,
            })
            .collect()
    }

    pub fn genre_choices(&self) -> Vec<Choice> {
        let picked = self.values.get_all("genres");
        Genre::ALL
            .iter()
            .map(|genre| Choice {
                value: genre.as_str().to_string(),
                label: genre.as_str().to_string(),
                selected: picked.contains(&genre.as_str()),
            })
            .collect()
    }
}

/// Venue and artist selects of the show form
pub fn entity_choices(options: &[(i64, String)], current: &str) -> Vec<Choice> {
    options
        .iter()
        .map(|(id, name)| {
            let value = id.to_string();
            Choice {
                selected: value == current,
                label: format!("{name} (#{id})"),
                value,
            }
        })
        .collect()
}

pub struct ShowFormView {
    pub form: FormView,
    pub venues: Vec<Choice>,
    pub artists: Vec<Choice>,
}

impl ShowFormView {
    pub fn new(form: FormView, choices: &ShowFormChoices) -> Self {
        let venues = entity_choices(&choices.venues, form.value("venue_id"));
        let artists = entity_choices(&choices.artists, form.value("artist_id"));
        Self {
            form,
            venues,
            artists,
        }
    }
}

/// Profile fields shared by the venue and artist detail pages
#[derive(Debug, Clone, Default)]
pub struct ProfileView {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub facebook_link: String,
    pub image_link: String,
    pub seeking: bool,
    pub seeking_description: String,
}

impl From<&Venue> for ProfileView {
    fn from(venue: &Venue) -> Self {
        Self {
            id: venue.id.unwrap_or_default(),
            name: venue.name.clone(),
            genres: venue.genres.iter().map(|g| g.as_str().to_string()).collect(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: venue.phone.clone().unwrap_or_default(),
            website: venue.website.clone().unwrap_or_default(),
            facebook_link: venue.facebook_link.clone().unwrap_or_default(),
            image_link: venue.image_link.clone().unwrap_or_default(),
            seeking: venue.seeking_talent,
            seeking_description: venue.seeking_description.clone().unwrap_or_default(),
        }
    }
}

impl From<&Artist> for ProfileView {
    fn from(artist: &Artist) -> Self {
        Self {
            id: artist.id.unwrap_or_default(),
            name: artist.name.clone(),
            genres: artist.genres.iter().map(|g| g.as_str().to_string()).collect(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            address: String::new(),
            phone: artist.phone.clone().unwrap_or_default(),
            website: artist.website.clone().unwrap_or_default(),
            facebook_link: artist.facebook_link.clone().unwrap_or_default(),
            image_link: artist.image_link.clone().unwrap_or_default(),
            seeking: artist.seeking_venue,
            seeking_description: artist.seeking_description.clone().unwrap_or_default(),
        }
    }
}
