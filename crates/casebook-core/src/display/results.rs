//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::{
    controller::MutationOutcome,
    models::{Fixture, TestCase},
};

/// Wrapper type for displaying the result of create operations.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<TestCase> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created test case with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<Fixture> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Created {} fixture with ID: {}",
            self.resource.fixture_type, self.resource.id
        )?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Summarizes a mutation: the recorded version, any cleared references and
/// the affected step (or the whole sequence when no single step applies).
impl fmt::Display for MutationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => writeln!(
                f,
                "Recorded version {} of {}: {}",
                version.label(),
                self.parent,
                version.reason
            )?,
            None => writeln!(f, "No changes to {}.", self.parent)?,
        }

        if !self.cleared.is_empty() {
            writeln!(f)?;
            for cleared in &self.cleared {
                writeln!(f, "- {cleared}")?;
            }
        }

        writeln!(f)?;
        match &self.step {
            Some(step) => write!(f, "{step}"),
            None if self.steps.is_empty() => writeln!(f, "No steps in this {}.", self.parent.kind),
            None => {
                for step in &self.steps {
                    write!(f, "{step}")?;
                }
                Ok(())
            }
        }
    }
}
