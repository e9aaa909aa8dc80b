//! Test case and fixture queries.

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension};

use super::utils::{parent_fields_columns, parsed_column, tags_json, timestamp_column};
use crate::{
    error::{Result, StorageResultExt},
    models::{Fixture, FixtureInfo, FixtureType, ParentFields, ParentKind, ParentRef, TestCase},
};

const INSERT_TEST_CASE_SQL: &str = "INSERT INTO test_cases (name, description, script, status, is_manual, tags, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const INSERT_FIXTURE_SQL: &str = "INSERT INTO fixtures (name, description, script, status, is_manual, tags, fixture_type, export_name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";
const SELECT_TEST_CASE_SQL: &str = "SELECT id, name, description, script, status, is_manual, tags, created_at, updated_at FROM test_cases WHERE id = ?1";
const SELECT_TEST_CASES_SQL: &str = "SELECT id, name, description, script, status, is_manual, tags, created_at, updated_at FROM test_cases ORDER BY id";
const SELECT_FIXTURE_SQL: &str = "SELECT id, name, description, script, status, is_manual, tags, fixture_type, export_name, created_at, updated_at FROM fixtures WHERE id = ?1";
const SELECT_FIXTURES_SQL: &str = "SELECT id, name, description, script, status, is_manual, tags, fixture_type, export_name, created_at, updated_at FROM fixtures ORDER BY id";
const SELECT_FIXTURE_INFO_SQL: &str = "SELECT id, name, fixture_type FROM fixtures WHERE id = ?1";
const UPDATE_TEST_CASE_FIELDS_SQL: &str = "UPDATE test_cases SET name = ?1, description = ?2, script = ?3, status = ?4, is_manual = ?5, tags = ?6, updated_at = ?7 WHERE id = ?8";
const UPDATE_FIXTURE_FIELDS_SQL: &str = "UPDATE fixtures SET name = ?1, description = ?2, script = ?3, status = ?4, is_manual = ?5, tags = ?6, updated_at = ?7 WHERE id = ?8";

impl super::Database {
    fn build_test_case_from_row(row: &rusqlite::Row) -> rusqlite::Result<TestCase> {
        Ok(TestCase {
            id: row.get::<_, i64>(0)? as u64,
            fields: parent_fields_columns(row, 1)?,
            created_at: timestamp_column(row, 7)?,
            updated_at: timestamp_column(row, 8)?,
            steps: Vec::new(),
        })
    }

    fn build_fixture_from_row(row: &rusqlite::Row) -> rusqlite::Result<Fixture> {
        Ok(Fixture {
            id: row.get::<_, i64>(0)? as u64,
            fields: parent_fields_columns(row, 1)?,
            fixture_type: parsed_column::<FixtureType>(row, 7)?,
            export_name: row.get(8)?,
            created_at: timestamp_column(row, 9)?,
            updated_at: timestamp_column(row, 10)?,
            steps: Vec::new(),
        })
    }

    /// Inserts a new test case with no steps.
    pub fn insert_test_case(&self, fields: &ParentFields, now: Timestamp) -> Result<TestCase> {
        let now_str = now.to_string();
        self.connection
            .execute(
                INSERT_TEST_CASE_SQL,
                params![
                    &fields.name,
                    &fields.description,
                    &fields.script,
                    &fields.status,
                    fields.is_manual,
                    tags_json(&fields.tags)?,
                    &now_str,
                    &now_str
                ],
            )
            .db_context("Failed to insert test case")?;

        Ok(TestCase {
            id: self.connection.last_insert_rowid() as u64,
            fields: fields.clone(),
            created_at: now,
            updated_at: now,
            steps: Vec::new(),
        })
    }

    /// Inserts a new fixture with no steps.
    pub fn insert_fixture(
        &self,
        fields: &ParentFields,
        fixture_type: FixtureType,
        export_name: &str,
        now: Timestamp,
    ) -> Result<Fixture> {
        let now_str = now.to_string();
        self.connection
            .execute(
                INSERT_FIXTURE_SQL,
                params![
                    &fields.name,
                    &fields.description,
                    &fields.script,
                    &fields.status,
                    fields.is_manual,
                    tags_json(&fields.tags)?,
                    fixture_type.as_str(),
                    export_name,
                    &now_str,
                    &now_str
                ],
            )
            .db_context("Failed to insert fixture")?;

        Ok(Fixture {
            id: self.connection.last_insert_rowid() as u64,
            fields: fields.clone(),
            fixture_type,
            export_name: export_name.to_string(),
            created_at: now,
            updated_at: now,
            steps: Vec::new(),
        })
    }

    /// Retrieves a test case without its steps.
    pub fn get_test_case(&self, id: u64) -> Result<Option<TestCase>> {
        self.connection
            .query_row(
                SELECT_TEST_CASE_SQL,
                params![id as i64],
                Self::build_test_case_from_row,
            )
            .optional()
            .db_context("Failed to get test case")
    }

    /// Retrieves a fixture without its steps.
    pub fn get_fixture(&self, id: u64) -> Result<Option<Fixture>> {
        self.connection
            .query_row(
                SELECT_FIXTURE_SQL,
                params![id as i64],
                Self::build_fixture_from_row,
            )
            .optional()
            .db_context("Failed to get fixture")
    }

    pub fn get_test_cases(&self) -> Result<Vec<TestCase>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_TEST_CASES_SQL)
            .db_context("Failed to prepare query")?;

        let test_cases = stmt
            .query_map([], Self::build_test_case_from_row)
            .db_context("Failed to query test cases")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch test cases")?;

        Ok(test_cases)
    }

    pub fn get_fixtures(&self) -> Result<Vec<Fixture>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_FIXTURES_SQL)
            .db_context("Failed to prepare query")?;

        let fixtures = stmt
            .query_map([], Self::build_fixture_from_row)
            .db_context("Failed to query fixtures")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch fixtures")?;

        Ok(fixtures)
    }

    /// Name and type of a fixture, if it exists.
    pub fn get_fixture_info(&self, id: u64) -> Result<Option<FixtureInfo>> {
        self.connection
            .query_row(SELECT_FIXTURE_INFO_SQL, params![id as i64], |row| {
                Ok(FixtureInfo {
                    id: row.get::<_, i64>(0)? as u64,
                    name: row.get(1)?,
                    fixture_type: parsed_column::<FixtureType>(row, 2)?,
                })
            })
            .optional()
            .db_context("Failed to get fixture")
    }

    /// Scalar fields of a parent, if it exists.
    pub fn get_parent_fields(&self, parent: ParentRef) -> Result<Option<ParentFields>> {
        let fields = match parent.kind {
            ParentKind::TestCase => self.get_test_case(parent.id)?.map(|t| t.fields),
            ParentKind::Fixture => self.get_fixture(parent.id)?.map(|f| f.fields),
        };
        Ok(fields)
    }
}

/// Overwrites a parent's scalar fields. Returns the parent's not-found error
/// when no row was updated.
pub(crate) fn update_parent_fields(
    conn: &Connection,
    parent: ParentRef,
    fields: &ParentFields,
    now: Timestamp,
) -> Result<()> {
    let sql = match parent.kind {
        ParentKind::TestCase => UPDATE_TEST_CASE_FIELDS_SQL,
        ParentKind::Fixture => UPDATE_FIXTURE_FIELDS_SQL,
    };

    let rows_affected = conn
        .execute(
            sql,
            params![
                &fields.name,
                &fields.description,
                &fields.script,
                &fields.status,
                fields.is_manual,
                tags_json(&fields.tags)?,
                now.to_string(),
                parent.id as i64
            ],
        )
        .db_context("Failed to update parent fields")?;

    if rows_affected == 0 {
        return Err(parent.not_found());
    }
    Ok(())
}
