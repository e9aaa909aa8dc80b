//! Version ledger rows.

use rusqlite::{params, Connection};

use super::utils::{parent_fields_columns, tags_json, timestamp_column};
use crate::{
    error::{Result, StorageResultExt},
    models::{ParentFields, ParentRef, Step, Version},
};

const INSERT_VERSION_SQL: &str = "INSERT INTO versions (parent_kind, parent_id, version_number, reason, name, description, script, status, is_manual, tags, steps_json, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)";
const SELECT_VERSIONS_SQL: &str = "SELECT version_number, reason, name, description, script, status, is_manual, tags, steps_json, created_at FROM versions WHERE parent_kind = ?1 AND parent_id = ?2 ORDER BY version_number";

/// Stored row before the step snapshot has been decoded.
struct VersionRow {
    version_number: u32,
    reason: String,
    fields: ParentFields,
    steps_json: String,
    created_at: jiff::Timestamp,
}

impl super::Database {
    /// Retrieves every version of a parent, oldest first.
    pub fn get_versions(&self, parent: ParentRef) -> Result<Vec<Version>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_VERSIONS_SQL)
            .db_context("Failed to prepare query")?;

        let rows = stmt
            .query_map(
                params![parent.kind.as_str(), parent.id as i64],
                |row| {
                    Ok(VersionRow {
                        version_number: row.get::<_, i64>(0)? as u32,
                        reason: row.get(1)?,
                        fields: parent_fields_columns(row, 2)?,
                        steps_json: row.get(8)?,
                        created_at: timestamp_column(row, 9)?,
                    })
                },
            )
            .db_context("Failed to query versions")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch versions")?;

        rows.into_iter()
            .map(|row| {
                let steps: Vec<Step> = serde_json::from_str(&row.steps_json)?;
                Ok(Version {
                    parent,
                    version_number: row.version_number,
                    reason: row.reason,
                    created_at: row.created_at,
                    fields: row.fields,
                    steps,
                })
            })
            .collect()
    }
}

/// Appends one version row.
pub(crate) fn insert_version(conn: &Connection, version: &Version) -> Result<()> {
    let steps_json = serde_json::to_string(&version.steps)?;
    conn.execute(
        INSERT_VERSION_SQL,
        params![
            version.parent.kind.as_str(),
            version.parent.id as i64,
            version.version_number as i64,
            &version.reason,
            &version.fields.name,
            &version.fields.description,
            &version.fields.script,
            &version.fields.status,
            version.fields.is_manual,
            tags_json(&version.fields.tags)?,
            steps_json,
            version.created_at.to_string()
        ],
    )
    .db_context("Failed to append version")?;
    Ok(())
}
