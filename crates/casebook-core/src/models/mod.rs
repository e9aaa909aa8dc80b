//! Data models for test cases, fixtures, steps and versions.
//!
//! This module contains the core domain models of the casebook. Display
//! implementations for these models live in [`crate::display::models`] so
//! that data structures and presentation stay separate.
//!
//! # Ownership
//!
//! - A [`Step`] belongs to exactly one parent, identified by a [`ParentRef`]
//!   (either a [`TestCase`] or a [`Fixture`]).
//! - A [`Version`] owns value copies of the steps it captured; later edits to
//!   live steps never reach back into history.
//! - [`ParentFields`] are the scalar fields every version records.
//!
//! # Examples
//!
//! ```rust
//! use casebook_core::models::{FixtureType, ParentRef, StepDraft};
//!
//! let parent = ParentRef::test_case(7);
//! assert_eq!(parent.to_string(), "test case 7");
//!
//! let draft = StepDraft::with_fixture(3);
//! assert!(draft.validate().is_ok());
//! assert!(StepDraft::default().validate().is_err());
//!
//! assert_eq!("Inline".parse::<FixtureType>(), Ok(FixtureType::Inline));
//! ```

pub mod fixture;
pub mod parent;
pub mod requests;
pub mod step;
pub mod version;

#[cfg(test)]
mod tests;

pub use fixture::{default_export_name, Fixture, FixtureInfo, FixtureType, TestCase};
pub use parent::{normalize_tags, ParentFields, ParentKind, ParentRef, DEFAULT_STATUS};
pub use requests::{FieldsPatch, StepDraft, StepPatch};
pub use step::Step;
pub use version::Version;
