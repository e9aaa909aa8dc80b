//! Append-only version history of a parent.

use jiff::Timestamp;

use crate::{
    error::{CasebookError, Result},
    models::{ParentFields, ParentRef, Version},
    sequence::OrderedStepSet,
};

/// State reconstructed from a version, together with the version that
/// records the restore itself.
#[derive(Debug, Clone)]
pub struct Restored {
    pub fields: ParentFields,
    pub steps: OrderedStepSet,
    pub version: Version,
}

/// Numbered snapshots of one parent, oldest first.
///
/// There is deliberately no way to remove or edit an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionLedger {
    parent: ParentRef,
    versions: Vec<Version>,
}

impl VersionLedger {
    pub fn new(parent: ParentRef) -> Self {
        Self {
            parent,
            versions: Vec::new(),
        }
    }

    /// Rebuilds a ledger from stored versions.
    pub fn from_versions(parent: ParentRef, versions: Vec<Version>) -> Self {
        let mut versions = versions;
        versions.sort_by_key(|version| version.version_number);
        Self { parent, versions }
    }

    pub fn parent(&self) -> ParentRef {
        self.parent
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn list(&self) -> &[Version] {
        &self.versions
    }

    pub fn latest(&self) -> Option<&Version> {
        self.versions.last()
    }

    /// Number the next snapshot will receive.
    pub fn next_number(&self) -> u32 {
        self.latest().map_or(1, |version| version.version_number + 1)
    }

    pub fn get(&self, version_number: u32) -> Result<&Version> {
        self.versions
            .iter()
            .find(|version| version.version_number == version_number)
            .ok_or_else(|| CasebookError::VersionNotFound {
                parent: self.parent.to_string(),
                version_number,
            })
    }

    /// Appends a deep copy of `fields` and `steps`.
    pub fn snapshot(
        &mut self,
        fields: &ParentFields,
        steps: &OrderedStepSet,
        reason: impl Into<String>,
        now: Timestamp,
    ) -> &Version {
        let version = Version {
            parent: self.parent,
            version_number: self.next_number(),
            reason: reason.into(),
            created_at: now,
            fields: fields.clone(),
            steps: steps.as_slice().to_vec(),
        };
        self.versions.push(version);
        &self.versions[self.versions.len() - 1]
    }

    /// Reconstructs the state captured by `version_number` and records the
    /// restore as a new version.
    pub fn restore(&mut self, version_number: u32, now: Timestamp) -> Result<Restored> {
        let source = self.get(version_number)?;
        let fields = source.fields.clone();
        let steps = OrderedStepSet::from_steps(source.steps.clone())?;
        let reason = format!("Restored version {}", source.label());

        let version = self.snapshot(&fields, &steps, reason, now).clone();
        Ok(Restored {
            fields,
            steps,
            version,
        })
    }
}
