//! Request types for creating and editing steps and parent fields.

use serde::{Deserialize, Serialize};

use super::{
    normalize_tags,
    parent::{validate_name, validate_status},
    ParentFields, Step,
};
use crate::error::{CasebookError, Result};

/// Content of a step that has not been placed in a sequence yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepDraft {
    /// Required unless `referenced_fixture_id` is set
    #[serde(default)]
    pub action: String,
    pub data: Option<String>,
    pub expected: Option<String>,
    pub script: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    pub referenced_fixture_id: Option<u64>,
}

impl StepDraft {
    pub fn with_action(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Default::default()
        }
    }

    pub fn with_fixture(fixture_id: u64) -> Self {
        Self {
            referenced_fixture_id: Some(fixture_id),
            ..Default::default()
        }
    }

    /// Rejects a draft with neither an action nor a fixture reference.
    pub fn validate(&self) -> Result<()> {
        validate_action(&self.action, self.referenced_fixture_id)
    }
}

/// Partial update of a step.
///
/// `None` leaves a field untouched. For the optional text fields a blank
/// string clears the value. `referenced_fixture_id: Some(None)` removes the
/// reference. `order` relocates the step within its parent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepPatch {
    pub action: Option<String>,
    pub data: Option<String>,
    pub expected: Option<String>,
    pub script: Option<String>,
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_fixture_id: Option<Option<u64>>,
    pub order: Option<u32>,
}

impl StepPatch {
    /// True when the patch names no field at all.
    pub fn is_empty(&self) -> bool {
        self.action.is_none()
            && self.data.is_none()
            && self.expected.is_none()
            && self.script.is_none()
            && self.disabled.is_none()
            && self.referenced_fixture_id.is_none()
            && self.order.is_none()
    }

    /// Whether the patch changes which fixture the step references.
    pub fn touches_reference(&self, step: &Step) -> bool {
        matches!(self.referenced_fixture_id, Some(reference) if reference != step.referenced_fixture_id)
    }

    /// Applies the content fields to a copy of `step`. Position is left to
    /// the caller.
    pub fn apply_content(&self, step: &Step) -> Step {
        let mut updated = step.clone();
        if let Some(action) = &self.action {
            updated.action = action.trim().to_string();
        }
        if let Some(data) = &self.data {
            updated.data = non_blank(data);
        }
        if let Some(expected) = &self.expected {
            updated.expected = non_blank(expected);
        }
        if let Some(script) = &self.script {
            updated.script = non_blank(script);
        }
        if let Some(disabled) = self.disabled {
            updated.disabled = disabled;
        }
        if let Some(reference) = self.referenced_fixture_id {
            updated.referenced_fixture_id = reference;
        }
        updated
    }
}

/// Partial update of the scalar fields of a test case or fixture.
///
/// `None` leaves a field untouched. A blank description or script clears
/// it. Tags replace the whole list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldsPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub script: Option<String>,
    pub status: Option<String>,
    pub is_manual: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl FieldsPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.script.is_none()
            && self.status.is_none()
            && self.is_manual.is_none()
            && self.tags.is_none()
    }

    /// Applies the patch to a copy of `fields`, rejecting a blank name or
    /// status.
    pub fn apply(&self, fields: &ParentFields) -> Result<ParentFields> {
        let mut updated = fields.clone();
        if let Some(name) = &self.name {
            validate_name(name)?;
            updated.name = name.trim().to_string();
        }
        if let Some(description) = &self.description {
            updated.description = non_blank(description);
        }
        if let Some(script) = &self.script {
            updated.script = non_blank(script);
        }
        if let Some(status) = &self.status {
            validate_status(status)?;
            updated.status = status.trim().to_string();
        }
        if let Some(is_manual) = self.is_manual {
            updated.is_manual = is_manual;
        }
        if let Some(tags) = &self.tags {
            updated.tags = normalize_tags(tags.iter().cloned());
        }
        Ok(updated)
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub(crate) fn validate_action(action: &str, referenced_fixture_id: Option<u64>) -> Result<()> {
    if action.trim().is_empty() && referenced_fixture_id.is_none() {
        return Err(CasebookError::invalid_input("action")
            .with_reason("An action is required unless the step references a fixture"));
    }
    Ok(())
}
