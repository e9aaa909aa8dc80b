//! Fixture and test case models.

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{ParentFields, ParentRef, Step};

/// How a fixture is wired into a generated test.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FixtureType {
    /// Extends the test's fixture set; only usable from the first step
    #[default]
    Extend,

    /// Called inline as a function from any later step
    Inline,
}

impl FromStr for FixtureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "extend" => Ok(FixtureType::Extend),
            "inline" => Ok(FixtureType::Inline),
            _ => Err(format!("Invalid fixture type: {s}. Must be 'extend' or 'inline'")),
        }
    }
}

impl FixtureType {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FixtureType::Extend => "extend",
            FixtureType::Inline => "inline",
        }
    }
}

/// A test case with its scalar fields and steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestCase {
    pub id: u64,

    #[serde(flatten)]
    pub fields: ParentFields,

    pub created_at: Timestamp,

    pub updated_at: Timestamp,

    /// Associated steps in order (lazy-loaded by default)
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl TestCase {
    pub fn parent_ref(&self) -> ParentRef {
        ParentRef::test_case(self.id)
    }
}

/// A reusable fixture. Fixtures own steps of their own and can be referenced
/// from the steps of test cases and other fixtures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fixture {
    pub id: u64,

    #[serde(flatten)]
    pub fields: ParentFields,

    /// Fixed at creation
    pub fixture_type: FixtureType,

    /// Identifier generated scripts use for the fixture
    pub export_name: String,

    pub created_at: Timestamp,

    pub updated_at: Timestamp,

    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Fixture {
    pub fn parent_ref(&self) -> ParentRef {
        ParentRef::fixture(self.id)
    }
}

/// What the reference validator needs to know about a fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureInfo {
    pub id: u64,
    pub name: String,
    pub fixture_type: FixtureType,
}

/// Derives a lowerCamelCase export name from a fixture name.
///
/// ```rust
/// use casebook_core::models::default_export_name;
///
/// assert_eq!(default_export_name("Login As Admin"), "loginAsAdmin");
/// assert_eq!(default_export_name("check-user status"), "checkUserStatus");
/// ```
pub fn default_export_name(name: &str) -> String {
    let mut export = String::with_capacity(name.len());
    for (index, word) in name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if index == 0 {
                export.extend(first.to_lowercase());
            } else {
                export.extend(first.to_uppercase());
            }
            export.push_str(chars.as_str());
        }
    }
    export
}
