//! [`ParentStore`] and [`FixtureLookup`] on SQLite.

use jiff::Timestamp;

use super::{
    parent_queries::update_parent_fields, step_queries::write_steps,
    version_queries::insert_version, Database,
};
use crate::{
    error::{CasebookError, Result, StorageResultExt},
    ledger::VersionLedger,
    models::{Fixture, FixtureInfo, FixtureType, ParentFields, ParentRef, TestCase, Version},
    sequence::OrderedStepSet,
    store::{FixtureLookup, LoadedParent, ParentStore},
};

impl FixtureLookup for Database {
    fn fixture_info(&self, fixture_id: u64) -> Result<FixtureInfo> {
        self.get_fixture_info(fixture_id)?
            .ok_or(CasebookError::FixtureNotFound { id: fixture_id })
    }
}

impl ParentStore for Database {
    fn load(&self, parent: ParentRef) -> Result<LoadedParent> {
        let fields = self
            .get_parent_fields(parent)?
            .ok_or_else(|| parent.not_found())?;
        let steps = OrderedStepSet::from_stored(self.get_steps(parent)?);
        let ledger = VersionLedger::from_versions(parent, self.get_versions(parent)?);

        Ok(LoadedParent {
            parent,
            fields,
            steps,
            ledger,
        })
    }

    fn save(
        &mut self,
        parent: ParentRef,
        fields: &ParentFields,
        steps: &OrderedStepSet,
        now: Timestamp,
    ) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        update_parent_fields(&tx, parent, fields, now)?;
        write_steps(&tx, parent, steps)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    fn append_version(&mut self, version: &Version) -> Result<()> {
        insert_version(&self.connection, version)
    }

    fn commit(
        &mut self,
        parent: ParentRef,
        fields: &ParentFields,
        steps: &OrderedStepSet,
        version: &Version,
        now: Timestamp,
    ) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        update_parent_fields(&tx, parent, fields, now)?;
        write_steps(&tx, parent, steps)?;
        insert_version(&tx, version)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    fn allocate_step_id(&mut self) -> Result<u64> {
        self.next_step_id()
    }

    fn parent_of_step(&self, step_id: u64) -> Result<ParentRef> {
        self.step_parent(step_id)
    }

    fn create_test_case(&mut self, fields: &ParentFields, now: Timestamp) -> Result<TestCase> {
        self.insert_test_case(fields, now)
    }

    fn create_fixture(
        &mut self,
        fields: &ParentFields,
        fixture_type: FixtureType,
        export_name: &str,
        now: Timestamp,
    ) -> Result<Fixture> {
        self.insert_fixture(fields, fixture_type, export_name, now)
    }

    fn load_test_case(&self, id: u64) -> Result<TestCase> {
        let mut test_case = self
            .get_test_case(id)?
            .ok_or(CasebookError::TestCaseNotFound { id })?;
        test_case.steps = self.get_steps(test_case.parent_ref())?;
        Ok(test_case)
    }

    fn load_fixture(&self, id: u64) -> Result<Fixture> {
        let mut fixture = self
            .get_fixture(id)?
            .ok_or(CasebookError::FixtureNotFound { id })?;
        fixture.steps = self.get_steps(fixture.parent_ref())?;
        Ok(fixture)
    }

    fn list_test_cases(&self) -> Result<Vec<TestCase>> {
        self.get_test_cases()
    }

    fn list_fixtures(&self) -> Result<Vec<Fixture>> {
        self.get_fixtures()
    }
}
