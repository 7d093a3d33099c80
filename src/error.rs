use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{entity} {id} does not exist")]
    MissingReference { entity: &'static str, id: i64 },

    #[error("{entity} {id} is still booked for {shows} show(s)")]
    InUse {
        entity: &'static str,
        id: i64,
        shows: usize,
    },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl BookingError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BookingError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
