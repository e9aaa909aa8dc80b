//! Async API for managing test cases, fixtures, steps and versions.
//!
//! [`Casebook`] is the entry point for every front end. Each call opens its
//! own SQLite connection on a blocking thread and runs one
//! [`ParentController`] operation there. Writes to the same parent are
//! serialized through [`ParentLocks`]; writes to different parents run in
//! parallel.
//!
//! # Examples
//!
//! ```rust,no_run
//! use casebook_core::{
//!     params::{AddStep, CreateTestCase},
//!     CasebookBuilder, ReferencePolicy, StepDraft,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let casebook = CasebookBuilder::new()
//!     .with_database_path(Some("casebook.db"))
//!     .build()
//!     .await?;
//!
//! let login = casebook
//!     .create_test_case(&CreateTestCase {
//!         name: "Login".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let outcome = casebook
//!     .add_step(&AddStep {
//!         parent: login.parent_ref(),
//!         step: StepDraft::with_action("Open the login page"),
//!         position: None,
//!         policy: ReferencePolicy::Reject,
//!     })
//!     .await?;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

use std::{path::PathBuf, sync::Arc};

use tokio::task;

pub mod builder;
pub mod locks;
pub mod parent_ops;
pub mod step_ops;
pub mod version_ops;

#[cfg(test)]
mod tests;

pub use builder::CasebookBuilder;
pub use locks::{ParentGuard, ParentLocks};

use crate::{
    controller::ParentController,
    db::Database,
    error::{CasebookError, Result},
    models::ParentRef,
    store::ParentStore,
};

/// Main interface for managing test cases, fixtures and their steps.
#[derive(Debug, Clone)]
pub struct Casebook {
    pub(crate) db_path: PathBuf,
    locks: Arc<ParentLocks>,
}

impl Casebook {
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            locks: Arc::new(ParentLocks::new()),
        }
    }

    /// Path of the SQLite database this casebook works on.
    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Runs one controller operation on a blocking thread with a fresh
    /// connection.
    async fn run<T, F>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(&mut ParentController<Database>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut controller = ParentController::new(Database::new(&db_path)?);
            operation(&mut controller)
        })
        .await
        .map_err(|e| CasebookError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Like [`run`](Self::run), holding the parent's write lock throughout.
    ///
    /// The guard lives inside the blocking closure, so the lock stays held
    /// until the operation returns even if the awaiting future is dropped.
    async fn write<T, F>(&self, parent: ParentRef, operation: F) -> Result<T>
    where
        F: FnOnce(&mut ParentController<Database>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let guard = self.locks.acquire(parent).await;
        self.run(move |controller| {
            let _guard = guard;
            operation(controller)
        })
        .await
    }

    /// Resolves the parent of a step so its lock can be taken.
    async fn parent_of_step(&self, step_id: u64) -> Result<ParentRef> {
        self.run(move |controller| controller.store().parent_of_step(step_id))
            .await
    }
}
