//! Row conversion helpers shared by the query modules.

use jiff::Timestamp;
use rusqlite::types::Type;

use crate::{
    error::Result,
    models::{ParentFields, ParentKind, ParentRef},
};

/// Binds a parent to the `(test_case_id, fixture_id)` column pair of the
/// steps table. Exactly one of the two is set.
pub(crate) fn owner_params(parent: ParentRef) -> (Option<i64>, Option<i64>) {
    match parent.kind {
        ParentKind::TestCase => (Some(parent.id as i64), None),
        ParentKind::Fixture => (None, Some(parent.id as i64)),
    }
}

/// Reads an RFC 3339 timestamp column.
pub(crate) fn timestamp_column(row: &rusqlite::Row, index: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(index)?
        .parse::<Timestamp>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

/// Reads a text column holding one of the values accepted by `T::from_str`.
pub(crate) fn parsed_column<T>(row: &rusqlite::Row, index: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    let raw: String = row.get(index)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, e.into()))
}

/// Reads the six parent field columns `name, description, script, status,
/// is_manual, tags` starting at `start`.
pub(crate) fn parent_fields_columns(
    row: &rusqlite::Row,
    start: usize,
) -> rusqlite::Result<ParentFields> {
    let tags_index = start + 5;
    let tags_json: String = row.get(tags_index)?;
    let tags = serde_json::from_str(&tags_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(tags_index, Type::Text, Box::new(e))
    })?;

    Ok(ParentFields {
        name: row.get(start)?,
        description: row.get(start + 1)?,
        script: row.get(start + 2)?,
        status: row.get(start + 3)?,
        is_manual: row.get(start + 4)?,
        tags,
    })
}

/// Tags are stored as a JSON array of strings.
pub(crate) fn tags_json(tags: &[String]) -> Result<String> {
    Ok(serde_json::to_string(tags)?)
}
