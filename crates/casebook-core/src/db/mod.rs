//! SQLite persistence for test cases, fixtures, steps and versions.
//!
//! [`Database`] owns one connection. Queries are grouped by table in the
//! submodules, and [`store`] wires them into the
//! [`ParentStore`](crate::store::ParentStore) and
//! [`FixtureLookup`](crate::store::FixtureLookup) collaborator traits.

use std::{path::Path, time::Duration};

use rusqlite::Connection;

use crate::error::{Result, StorageResultExt};

pub mod migrations;
pub mod parent_queries;
pub mod step_queries;
pub mod store;
pub mod utils;
pub mod version_queries;

/// How long a writer waits for another connection's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens (or creates) the database file and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        Self::from_connection(connection)
    }

    /// Opens a private in-memory database, mostly useful in tests.
    pub fn open_in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().db_context("Failed to open in-memory database")?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self> {
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
