//! Implements a struct that holds the state of the server.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use rusqlite::Connection;

use crate::{Error, db::initialize, extraction::VisionExtractor};

/// The state of the server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The directory that uploaded bill images are written to.
    pub uploads_dir: PathBuf,

    /// The local timezone as a canonical timezone name, e.g.
    /// "Pacific/Auckland". "This month" and default dates follow this zone.
    pub local_timezone: String,

    /// The vision model client used to read uploaded bills.
    ///
    /// `None` when the server was started without an API key; every upload
    /// then falls back to manual entry.
    pub extractor: Option<VisionExtractor>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the table for the
    /// bill model. `local_timezone` should be a valid, canonical timezone
    /// name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        uploads_dir: PathBuf,
        local_timezone: &str,
        extractor: Option<VisionExtractor>,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            uploads_dir,
            local_timezone: local_timezone.to_owned(),
            extractor,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use rusqlite::Connection;

    use super::AppState;

    /// An [AppState] over an in-memory database with no extractor, for
    /// handler tests.
    pub(crate) fn test_state() -> AppState {
        AppState::new(
            Connection::open_in_memory().unwrap(),
            std::env::temp_dir(),
            "Etc/UTC",
            None,
        )
        .unwrap()
    }
}
