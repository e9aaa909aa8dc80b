//! Immutable version snapshots.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{ParentFields, ParentRef, Step};

/// A frozen copy of a parent's scalar fields and full step sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Version {
    /// Owner of the ledger this version belongs to
    pub parent: ParentRef,

    /// Monotonic per parent, starting at 1
    pub version_number: u32,

    /// What triggered the snapshot
    pub reason: String,

    /// Timestamp when the snapshot was taken (UTC)
    pub created_at: Timestamp,

    /// Scalar fields at snapshot time
    pub fields: ParentFields,

    /// Value copies of the steps in order
    pub steps: Vec<Step>,
}

impl Version {
    /// Semantic-style label, `1.0.0` for the first version.
    ///
    /// ```rust
    /// # use casebook_core::models::{ParentFields, ParentRef, Version};
    /// # let version = Version {
    /// #     parent: ParentRef::test_case(1),
    /// #     version_number: 3,
    /// #     reason: "Added step: Open login page".to_string(),
    /// #     created_at: jiff::Timestamp::now(),
    /// #     fields: ParentFields::new("Login"),
    /// #     steps: vec![],
    /// # };
    /// assert_eq!(version.label(), "1.2.0");
    /// ```
    pub fn label(&self) -> String {
        format!("1.{}.0", self.version_number.saturating_sub(1))
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}
