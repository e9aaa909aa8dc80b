//! Parameter structures for casebook operations.
//!
//! These structures are shared by every front end (the `cb` CLI today)
//! without framework-specific derives. Interface layers define their own
//! argument types and convert them into these with `From` impls:
//!
//! ```ignore
//! #[derive(Args)]
//! pub struct MoveStepArgs {
//!     pub id: u64,
//!     pub position: u32,
//! }
//!
//! impl From<MoveStepArgs> for MoveStep {
//!     fn from(args: MoveStepArgs) -> Self {
//!         MoveStep { step_id: args.id, position: args.position, policy: Default::default() }
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    fixture_rules::ReferencePolicy,
    models::{FieldsPatch, FixtureType, ParentRef, StepDraft, StepPatch},
};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for creating a test case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTestCase {
    /// Name of the test case (required)
    pub name: String,
    pub description: Option<String>,
    /// Generated automation script
    pub script: Option<String>,
    /// Defaults to `pending`
    pub status: Option<String>,
    #[serde(default)]
    pub is_manual: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Parameters for creating a fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateFixture {
    /// Name of the fixture (required)
    pub name: String,
    pub description: Option<String>,
    pub script: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub is_manual: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Fixed for the lifetime of the fixture
    #[serde(default)]
    pub fixture_type: FixtureType,
    /// Defaults to the camel-cased name
    pub export_name: Option<String>,
}

/// Parameters for adding a step to a test case or fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddStep {
    pub parent: ParentRef,
    #[serde(flatten)]
    pub step: StepDraft,
    /// 1-indexed position; appends when omitted
    pub position: Option<u32>,
    #[serde(default)]
    pub policy: ReferencePolicy,
}

/// Parameters for editing a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditStep {
    pub step_id: u64,
    #[serde(flatten)]
    pub patch: StepPatch,
    #[serde(default)]
    pub policy: ReferencePolicy,
}

/// Parameters for deleting a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteStep {
    pub step_id: u64,
    #[serde(default)]
    pub policy: ReferencePolicy,
}

/// Parameters for moving a step to a new position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveStep {
    pub step_id: u64,
    /// 1-indexed target position
    pub position: u32,
    #[serde(default)]
    pub policy: ReferencePolicy,
}

/// Parameters for renumbering every step of a parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoReorder {
    pub parent: ParentRef,
    #[serde(default)]
    pub policy: ReferencePolicy,
}

/// Parameters for renaming a test case or fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameParent {
    pub parent: ParentRef,
    pub name: String,
}

/// Parameters for editing the scalar fields of a test case or fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateParent {
    pub parent: ParentRef,
    #[serde(flatten)]
    pub patch: FieldsPatch,
}

/// Identifies one version of a parent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VersionRef {
    pub parent: ParentRef,
    pub version_number: u32,
}
