//! Version ledger operations.

use super::Casebook;
use crate::{
    controller::MutationOutcome,
    display::{Steps, Versions},
    error::Result,
    models::{ParentRef, Version},
    params::VersionRef,
};

impl Casebook {
    /// Lists every version of a parent, oldest first.
    pub async fn list_versions(&self, parent: ParentRef) -> Result<Versions> {
        self.run(move |controller| controller.list_versions(parent))
            .await
            .map(Versions)
    }

    pub async fn get_version(&self, params: &VersionRef) -> Result<Version> {
        let VersionRef {
            parent,
            version_number,
        } = *params;
        self.run(move |controller| controller.get_version(parent, version_number))
            .await
    }

    /// Steps exactly as a version captured them.
    pub async fn get_version_steps(&self, params: &VersionRef) -> Result<Steps> {
        let VersionRef {
            parent,
            version_number,
        } = *params;
        self.run(move |controller| controller.get_version_steps(parent, version_number))
            .await
            .map(Steps)
    }

    /// Restores a parent to a previous version. The restore itself is
    /// recorded as a new version.
    pub async fn restore_version(&self, params: &VersionRef) -> Result<MutationOutcome> {
        let VersionRef {
            parent,
            version_number,
        } = *params;
        self.write(parent, move |controller| {
            controller.restore_version(parent, version_number)
        })
        .await
    }
}
