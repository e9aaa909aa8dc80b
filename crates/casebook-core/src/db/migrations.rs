//! Database schema initialization and migrations.

use crate::error::{Result, StorageResultExt};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()?;

        Ok(())
    }

    /// Adds the status, manual flag and tag columns to databases created
    /// before parents carried them.
    fn apply_migrations(&self) -> Result<()> {
        for table in PARENT_FIELD_TABLES {
            for (column, definition) in ADDED_PARENT_COLUMNS {
                if !self.has_column(table, column)? {
                    log::info!("Adding column {column} to table {table}");
                    self.connection
                        .execute(&format!("ALTER TABLE {table} ADD COLUMN {definition}"), [])
                        .db_context(&format!("Failed to add {column} column to {table} table"))?;
                }
            }
        }

        Ok(())
    }

    fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        self.connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
                [table, column],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .db_context(&format!("Failed to inspect {table} table"))
    }
}

/// Tables that store a full set of parent fields.
const PARENT_FIELD_TABLES: [&str; 3] = ["test_cases", "fixtures", "versions"];

const ADDED_PARENT_COLUMNS: [(&str, &str); 3] = [
    ("status", "status TEXT NOT NULL DEFAULT 'pending'"),
    ("is_manual", "is_manual INTEGER NOT NULL DEFAULT 0"),
    ("tags", "tags TEXT NOT NULL DEFAULT '[]'"),
];
