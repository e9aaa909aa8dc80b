//! Parent entity identity and versioned scalar fields.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{CasebookError, Result};

/// The two kinds of entity that own an ordered step sequence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ParentKind {
    /// A test case
    TestCase,

    /// A reusable fixture
    Fixture,
}

impl ParentKind {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ParentKind::TestCase => "test_case",
            ParentKind::Fixture => "fixture",
        }
    }

    /// Human readable name used in messages and snapshot reasons.
    pub fn display_name(&self) -> &'static str {
        match self {
            ParentKind::TestCase => "test case",
            ParentKind::Fixture => "fixture",
        }
    }
}

impl FromStr for ParentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "test_case" | "testcase" | "case" => Ok(ParentKind::TestCase),
            "fixture" => Ok(ParentKind::Fixture),
            _ => Err(format!("Invalid parent kind: {s}")),
        }
    }
}

/// Identifies the test case or fixture that owns a step sequence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ParentRef {
    pub kind: ParentKind,
    pub id: u64,
}

impl ParentRef {
    pub fn test_case(id: u64) -> Self {
        Self {
            kind: ParentKind::TestCase,
            id,
        }
    }

    pub fn fixture(id: u64) -> Self {
        Self {
            kind: ParentKind::Fixture,
            id,
        }
    }

    /// The not-found error matching this parent's kind.
    pub fn not_found(&self) -> CasebookError {
        match self.kind {
            ParentKind::TestCase => CasebookError::TestCaseNotFound { id: self.id },
            ParentKind::Fixture => CasebookError::FixtureNotFound { id: self.id },
        }
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.display_name(), self.id)
    }
}

/// Status a parent starts with until someone sets another one.
pub const DEFAULT_STATUS: &str = "pending";

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

/// Scalar fields of a parent entity captured by every version snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParentFields {
    /// Display name (required)
    pub name: String,

    /// Optional multi-line description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Generated automation script for the whole parent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,

    /// Free-form workflow status such as `pending` or `ready`
    #[serde(default = "default_status")]
    pub status: String,

    /// Executed by hand rather than by a generated script
    #[serde(default)]
    pub is_manual: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Default for ParentFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            script: None,
            status: default_status(),
            is_manual: false,
            tags: Vec::new(),
        }
    }
}

impl ParentFields {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Rejects a blank name or status.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_status(&self.status)
    }

    /// Names of the fields that differ between `self` and `other`, in
    /// declaration order.
    pub fn changed_fields(&self, other: &ParentFields) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.name != other.name {
            changed.push("name");
        }
        if self.description != other.description {
            changed.push("description");
        }
        if self.script != other.script {
            changed.push("script");
        }
        if self.status != other.status {
            changed.push("status");
        }
        if self.is_manual != other.is_manual {
            changed.push("manual flag");
        }
        if self.tags != other.tags {
            changed.push("tags");
        }
        changed
    }
}

pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CasebookError::invalid_input("name").with_reason("Name cannot be empty"));
    }
    Ok(())
}

pub(crate) fn validate_status(status: &str) -> Result<()> {
    if status.trim().is_empty() {
        return Err(CasebookError::invalid_input("status").with_reason("Status cannot be empty"));
    }
    Ok(())
}

/// Trims every tag and drops the ones left empty.
///
/// ```rust
/// use casebook_core::models::normalize_tags;
///
/// let tags = vec![" smoke ".to_string(), "".to_string(), "login".to_string()];
/// assert_eq!(normalize_tags(tags), vec!["smoke", "login"]);
/// ```
pub fn normalize_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}
