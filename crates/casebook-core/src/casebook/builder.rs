//! Builder for creating and configuring Casebook instances.

use std::path::{Path, PathBuf};

use log::info;
use tokio::task;

use super::Casebook;
use crate::{
    db::Database,
    error::{CasebookError, Result},
};

/// Builder for creating and configuring Casebook instances.
#[derive(Debug, Clone, Default)]
pub struct CasebookBuilder {
    database_path: Option<PathBuf>,
}

impl CasebookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses the XDG Base Directory specification:
    /// `$XDG_DATA_HOME/casebook/casebook.db` or
    /// `~/.local/share/casebook/casebook.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Creates the database directory and schema, then returns the casebook.
    ///
    /// # Errors
    ///
    /// - `XdgDirectory` if no default location can be determined
    /// - `FileSystem` if the database directory cannot be created
    /// - `StorageUnavailable` if the schema cannot be initialized
    pub async fn build(self) -> Result<Casebook> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| CasebookError::FileSystem {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), CasebookError>(())
        })
        .await
        .map_err(|e| CasebookError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        info!("Using database at {}", db_path.display());
        Ok(Casebook::new(db_path))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("casebook")
            .place_data_file("casebook.db")
            .map_err(|e| CasebookError::XdgDirectory(e.to_string()))
    }
}
