/// Fixed enumerations shared by the forms, the validation rules and storage.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Music genres a venue or artist can be tagged with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Alternative,
    Blues,
    Classical,
    Country,
    Electronic,
    Folk,
    Funk,
    HipHop,
    HeavyMetal,
    Instrumental,
    Jazz,
    MusicalTheatre,
    Pop,
    Punk,
    RhythmAndBlues,
    Reggae,
    RockNRoll,
    Soul,
    Other,
}

impl Genre {
    pub const ALL: [Genre; 19] = [
        Genre::Alternative,
        Genre::Blues,
        Genre::Classical,
        Genre::Country,
        Genre::Electronic,
        Genre::Folk,
        Genre::Funk,
        Genre::HipHop,
        Genre::HeavyMetal,
        Genre::Instrumental,
        Genre::Jazz,
        Genre::MusicalTheatre,
        Genre::Pop,
        Genre::Punk,
        Genre::RhythmAndBlues,
        Genre::Reggae,
        Genre::RockNRoll,
        Genre::Soul,
        Genre::Other,
    ];

    /// Label used in forms and in the stored genre list
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Alternative => "Alternative",
            Genre::Blues => "Blues",
            Genre::Classical => "Classical",
            Genre::Country => "Country",
            Genre::Electronic => "Electronic",
            Genre::Folk => "Folk",
            Genre::Funk => "Funk",
            Genre::HipHop => "Hip-Hop",
            Genre::HeavyMetal => "Heavy Metal",
            Genre::Instrumental => "Instrumental",
            Genre::Jazz => "Jazz",
            Genre::MusicalTheatre => "Musical Theatre",
            Genre::Pop => "Pop",
            Genre::Punk => "Punk",
            Genre::RhythmAndBlues => "R&B",
            Genre::Reggae => "Reggae",
            Genre::RockNRoll => "Rock n Roll",
            Genre::Soul => "Soul",
            Genre::Other => "Other",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGenre(pub String);

impl fmt::Display for UnknownGenre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown genre '{}'", self.0)
    }
}

impl std::error::Error for UnknownGenre {}

impl FromStr for Genre {
    type Err = UnknownGenre;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Genre::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| UnknownGenre(s.to_string()))
    }
}

/// Two-letter codes accepted in the `state` field
pub const US_STATES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Labels of every genre, in form order
pub fn genre_labels() -> Vec<&'static str> {
    Genre::ALL.iter().map(Genre::as_str).collect()
}

pub fn is_us_state(code: &str) -> bool {
    US_STATES.contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_labels_parse_back() {
        for genre in Genre::ALL {
            assert_eq!(genre.as_str().parse::<Genre>(), Ok(genre));
        }
    }

    #[test]
    fn test_unknown_genre_is_rejected() {
        assert_eq!(
            "Polka".parse::<Genre>(),
            Err(UnknownGenre("Polka".to_string()))
        );
        // Labels are matched exactly, not case-folded
        assert!("jazz".parse::<Genre>().is_err());
    }

    #[test]
    fn test_state_codes() {
        assert!(is_us_state("CA"));
        assert!(is_us_state("DC"));
        assert!(!is_us_state("ca"));
        assert!(!is_us_state("XX"));
    }
}
