//! Collaborator interfaces the controller depends on.
//!
//! [`ParentStore`] persists parents, their step sets and their version
//! ledgers. [`FixtureLookup`] answers the questions the reference validator
//! asks about fixtures. [`crate::db::Database`] implements both on SQLite.

use jiff::Timestamp;

use crate::{
    error::Result,
    ledger::VersionLedger,
    models::{
        Fixture, FixtureInfo, FixtureType, ParentFields, ParentRef, TestCase, Version,
    },
    sequence::OrderedStepSet,
};

/// Everything the controller needs to mutate one parent.
#[derive(Debug, Clone)]
pub struct LoadedParent {
    pub parent: ParentRef,
    pub fields: ParentFields,
    /// Steps as stored; not guaranteed dense for legacy data
    pub steps: OrderedStepSet,
    pub ledger: VersionLedger,
}

/// Read access to fixture metadata.
pub trait FixtureLookup {
    /// Returns `FixtureNotFound` for an unknown id.
    fn fixture_info(&self, fixture_id: u64) -> Result<FixtureInfo>;

    fn fixture_type(&self, fixture_id: u64) -> Result<FixtureType> {
        Ok(self.fixture_info(fixture_id)?.fixture_type)
    }
}

/// Persistence for parents, steps and versions.
pub trait ParentStore {
    /// Loads a parent with its steps and full ledger. Returns the parent's
    /// not-found error when it does not exist.
    fn load(&self, parent: ParentRef) -> Result<LoadedParent>;

    /// Replaces the stored fields and step set of a parent. Steps absent
    /// from `steps` are deleted.
    fn save(
        &mut self,
        parent: ParentRef,
        fields: &ParentFields,
        steps: &OrderedStepSet,
        now: Timestamp,
    ) -> Result<()>;

    /// Appends a version to the parent's ledger.
    fn append_version(&mut self, version: &Version) -> Result<()>;

    /// Saves the new state and appends its version as one unit of work.
    ///
    /// The default runs [`save`](Self::save) then
    /// [`append_version`](Self::append_version); stores with transactions
    /// should override it so that both succeed or neither does.
    fn commit(
        &mut self,
        parent: ParentRef,
        fields: &ParentFields,
        steps: &OrderedStepSet,
        version: &Version,
        now: Timestamp,
    ) -> Result<()> {
        self.save(parent, fields, steps, now)?;
        self.append_version(version)
    }

    /// Hands out a step id that has never been used before.
    fn allocate_step_id(&mut self) -> Result<u64>;

    /// Resolves the owner of a step, or `StepNotFound`.
    fn parent_of_step(&self, step_id: u64) -> Result<ParentRef>;

    fn create_test_case(&mut self, fields: &ParentFields, now: Timestamp) -> Result<TestCase>;

    fn create_fixture(
        &mut self,
        fields: &ParentFields,
        fixture_type: FixtureType,
        export_name: &str,
        now: Timestamp,
    ) -> Result<Fixture>;

    /// Loads a test case with its steps.
    fn load_test_case(&self, id: u64) -> Result<TestCase>;

    /// Loads a fixture with its steps.
    fn load_fixture(&self, id: u64) -> Result<Fixture>;

    /// All test cases without their steps, ordered by id.
    fn list_test_cases(&self) -> Result<Vec<TestCase>>;

    /// All fixtures without their steps, ordered by id.
    fn list_fixtures(&self) -> Result<Vec<Fixture>>;
}
