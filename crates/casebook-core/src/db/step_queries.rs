//! Step queries and the step id sequence.

use std::collections::HashSet;

use rusqlite::{params, types::Type, Connection, OptionalExtension};

use super::utils::{owner_params, timestamp_column};
use crate::{
    error::{CasebookError, Result, StorageResultExt},
    models::{ParentRef, Step},
    sequence::OrderedStepSet,
};

const NEXT_STEP_ID_SQL: &str =
    "UPDATE id_sequences SET value = value + 1 WHERE name = 'steps' RETURNING value";
const SELECT_STEPS_BY_PARENT_SQL: &str = "SELECT id, test_case_id, fixture_id, step_order, action, data, expected, script, disabled, referenced_fixture_id, created_at, updated_at FROM steps WHERE test_case_id IS ?1 AND fixture_id IS ?2 ORDER BY step_order, id";
const SELECT_STEP_BY_ID_SQL: &str = "SELECT id, test_case_id, fixture_id, step_order, action, data, expected, script, disabled, referenced_fixture_id, created_at, updated_at FROM steps WHERE id = ?1";
const SELECT_STEP_IDS_BY_PARENT_SQL: &str =
    "SELECT id FROM steps WHERE test_case_id IS ?1 AND fixture_id IS ?2";
// Negated orders are all distinct and never collide with the positive
// orders written afterwards, so the unique order indexes hold throughout.
const NEGATE_STEP_ORDERS_SQL: &str =
    "UPDATE steps SET step_order = -step_order WHERE test_case_id IS ?1 AND fixture_id IS ?2";
const DELETE_STEP_SQL: &str = "DELETE FROM steps WHERE id = ?1";
const UPSERT_STEP_SQL: &str = "INSERT INTO steps (id, test_case_id, fixture_id, step_order, action, data, expected, script, disabled, referenced_fixture_id, created_at, updated_at) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12) \
     ON CONFLICT(id) DO UPDATE SET step_order = excluded.step_order, action = excluded.action, \
     data = excluded.data, expected = excluded.expected, script = excluded.script, \
     disabled = excluded.disabled, referenced_fixture_id = excluded.referenced_fixture_id, \
     updated_at = excluded.updated_at";

impl super::Database {
    /// Helper function to construct a Step from a database row
    fn build_step_from_row(row: &rusqlite::Row) -> rusqlite::Result<Step> {
        let test_case_id: Option<i64> = row.get(1)?;
        let fixture_id: Option<i64> = row.get(2)?;
        let parent = match (test_case_id, fixture_id) {
            (Some(id), None) => ParentRef::test_case(id as u64),
            (None, Some(id)) => ParentRef::fixture(id as u64),
            _ => {
                return Err(rusqlite::Error::FromSqlConversionFailure(
                    1,
                    Type::Integer,
                    "step must belong to exactly one parent".into(),
                ))
            }
        };

        Ok(Step {
            id: row.get::<_, i64>(0)? as u64,
            parent,
            order: row.get::<_, i64>(3)? as u32,
            action: row.get(4)?,
            data: row.get(5)?,
            expected: row.get(6)?,
            script: row.get(7)?,
            disabled: row.get(8)?,
            referenced_fixture_id: row.get::<_, Option<i64>>(9)?.map(|id| id as u64),
            created_at: timestamp_column(row, 10)?,
            updated_at: timestamp_column(row, 11)?,
        })
    }

    /// Retrieves all steps of a parent ordered by position.
    pub fn get_steps(&self, parent: ParentRef) -> Result<Vec<Step>> {
        let (test_case_id, fixture_id) = owner_params(parent);
        let mut stmt = self
            .connection
            .prepare(SELECT_STEPS_BY_PARENT_SQL)
            .db_context("Failed to prepare query")?;

        let steps = stmt
            .query_map(params![test_case_id, fixture_id], Self::build_step_from_row)
            .db_context("Failed to query steps")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch steps")?;

        Ok(steps)
    }

    /// Retrieves a single step by its ID.
    pub fn get_step(&self, step_id: u64) -> Result<Option<Step>> {
        self.connection
            .query_row(
                SELECT_STEP_BY_ID_SQL,
                params![step_id as i64],
                Self::build_step_from_row,
            )
            .optional()
            .db_context("Failed to get step")
    }

    /// Takes the next value of the step id sequence.
    pub fn next_step_id(&self) -> Result<u64> {
        let id: i64 = self
            .connection
            .query_row(NEXT_STEP_ID_SQL, [], |row| row.get(0))
            .db_context("Failed to allocate step id")?;
        Ok(id as u64)
    }

    pub fn step_parent(&self, step_id: u64) -> Result<ParentRef> {
        self.get_step(step_id)?
            .map(|step| step.parent)
            .ok_or(CasebookError::StepNotFound { id: step_id })
    }
}

/// Replaces the stored step rows of `parent` with `steps`.
pub(crate) fn write_steps(
    conn: &Connection,
    parent: ParentRef,
    steps: &OrderedStepSet,
) -> Result<()> {
    let (test_case_id, fixture_id) = owner_params(parent);

    conn.execute(NEGATE_STEP_ORDERS_SQL, params![test_case_id, fixture_id])
        .db_context("Failed to release step orders")?;

    let existing: Vec<i64> = {
        let mut stmt = conn
            .prepare(SELECT_STEP_IDS_BY_PARENT_SQL)
            .db_context("Failed to prepare query")?;
        let ids = stmt
            .query_map(params![test_case_id, fixture_id], |row| row.get(0))
            .db_context("Failed to query step ids")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch step ids")?;
        ids
    };

    let kept: HashSet<i64> = steps.iter().map(|step| step.id as i64).collect();
    for id in existing.into_iter().filter(|id| !kept.contains(id)) {
        conn.execute(DELETE_STEP_SQL, params![id])
            .db_context("Failed to delete step")?;
    }

    for step in steps {
        conn.execute(
            UPSERT_STEP_SQL,
            params![
                step.id as i64,
                test_case_id,
                fixture_id,
                step.order as i64,
                &step.action,
                &step.data,
                &step.expected,
                &step.script,
                step.disabled,
                step.referenced_fixture_id.map(|id| id as i64),
                step.created_at.to_string(),
                step.updated_at.to_string()
            ],
        )
        .db_context("Failed to write step")?;
    }

    Ok(())
}
