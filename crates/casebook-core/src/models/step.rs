//! Step model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::ParentRef;

/// Represents an individual step within a test case or fixture.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    /// Unique identifier for the step, never reused
    pub id: u64,

    /// The test case or fixture that owns the step
    pub parent: ParentRef,

    /// Position within the parent's sequence (1-indexed, dense)
    pub order: u32,

    /// What the step does. Defaults to the referenced fixture's name when a
    /// fixture reference is set without an explicit action.
    pub action: String,

    /// Input data for the step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    /// Expected outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,

    /// Generated automation code for this step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,

    /// Disabled steps keep their position but are skipped on execution
    #[serde(default)]
    pub disabled: bool,

    /// Fixture invoked by this step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_fixture_id: Option<u64>,

    /// Timestamp when the step was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the step was last updated (UTC)
    pub updated_at: Timestamp,
}

impl Step {
    /// Whether the step invokes a fixture.
    pub fn has_reference(&self) -> bool {
        self.referenced_fixture_id.is_some()
    }

    /// Whether the step carries an explicit, non-blank action.
    pub fn has_action(&self) -> bool {
        !self.action.trim().is_empty()
    }

    /// Compares everything a user can edit, ignoring position and timestamps.
    pub fn same_content(&self, other: &Step) -> bool {
        self.action == other.action
            && self.data == other.data
            && self.expected == other.expected
            && self.script == other.script
            && self.disabled == other.disabled
            && self.referenced_fixture_id == other.referenced_fixture_id
    }
}
