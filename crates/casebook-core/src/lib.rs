//! Core library for casebook: test cases and fixtures with ordered steps and
//! an append-only version history.
//!
//! - [`sequence`] keeps a parent's steps densely ordered and computes moves.
//! - [`fixture_rules`] enforces which fixture type a step may reference at
//!   its position.
//! - [`ledger`] records an immutable snapshot for every accepted change and
//!   restores any of them.
//! - [`controller`] sequences load, validation, mutation and snapshot against
//!   the collaborator traits in [`store`], which [`db`] implements on SQLite.
//! - [`casebook`] is the async facade front ends talk to.
//!
//! # Quick Start
//!
//! ```rust
//! use casebook_core::{
//!     params::{AddStep, CreateFixture, CreateTestCase, MoveStep},
//!     CasebookBuilder, FixtureType, ReferencePolicy, StepDraft,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let casebook = CasebookBuilder::new()
//!     .with_database_path(Some("test.db"))
//!     .build()
//!     .await?;
//!
//! let login = casebook
//!     .create_fixture(&CreateFixture {
//!         name: "Logged in user".to_string(),
//!         fixture_type: FixtureType::Extend,
//!         ..Default::default()
//!     })
//!     .await?;
//! let checkout = casebook
//!     .create_test_case(&CreateTestCase {
//!         name: "Checkout".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! // Only the first step may use an `extend` fixture.
//! casebook
//!     .add_step(&AddStep {
//!         parent: checkout.parent_ref(),
//!         step: StepDraft::with_fixture(login.id),
//!         position: None,
//!         policy: ReferencePolicy::Reject,
//!     })
//!     .await?;
//! let pay = casebook
//!     .add_step(&AddStep {
//!         parent: checkout.parent_ref(),
//!         step: StepDraft::with_action("Pay"),
//!         position: None,
//!         policy: ReferencePolicy::Reject,
//!     })
//!     .await?;
//!
//! // Moving "Pay" first would push the fixture step to position 2; with
//! // `Clear` the now-invalid reference is dropped instead of failing.
//! let outcome = casebook
//!     .move_step(&MoveStep {
//!         step_id: pay.step.map(|s| s.id).unwrap_or_default(),
//!         position: 1,
//!         policy: ReferencePolicy::Clear,
//!     })
//!     .await?;
//! assert_eq!(outcome.cleared.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod casebook;
pub mod controller;
pub mod db;
pub mod display;
pub mod error;
pub mod fixture_rules;
pub mod ledger;
pub mod models;
pub mod params;
pub mod sequence;
pub mod store;

pub use casebook::{Casebook, CasebookBuilder};
pub use controller::{MutationOutcome, ParentController};
pub use db::Database;
pub use display::{CreateResult, Fixtures, LocalDateTime, Steps, TestCases, Versions};
pub use error::{CasebookError, Result};
pub use fixture_rules::{ClearedReference, FixtureReferenceValidator, ReferencePolicy};
pub use ledger::VersionLedger;
pub use models::{
    FieldsPatch, Fixture, FixtureType, ParentFields, ParentKind, ParentRef, Step, StepDraft,
    StepPatch, TestCase, Version,
};
pub use sequence::OrderedStepSet;
