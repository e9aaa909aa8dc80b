//! Display formatting and result types.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! the newtypes in [`collections`] and the wrappers in [`results`] add
//! formatting for lists and operation outcomes. Everything renders as
//! markdown.
//!
//! ```rust
//! use casebook_core::{display::CreateResult, models::{ParentFields, TestCase}};
//! use jiff::Timestamp;
//!
//! let test_case = TestCase {
//!     id: 1,
//!     fields: ParentFields::new("Login"),
//!     created_at: Timestamp::now(),
//!     updated_at: Timestamp::now(),
//!     steps: vec![],
//! };
//!
//! let output = CreateResult::new(test_case).to_string();
//! assert!(output.contains("Created test case with ID: 1"));
//! assert!(output.contains("No steps in this test case."));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;

pub use collections::{Fixtures, Steps, TestCases, Versions};
pub use datetime::LocalDateTime;
pub use results::CreateResult;
