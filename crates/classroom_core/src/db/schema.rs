//! Classroom schema steps and post-migration checks.
//!
//! # Invariants
//! - Step versions are contiguous from 1; the applied step is mirrored to
//!   `PRAGMA user_version`.
//! - All pending steps commit together or not at all.
//! - After migrating, every roster table carries the primary key listed in
//!   `TABLE_KEYS`. A link table without its `(teacher_id, student_id)` key
//!   would let concurrent registrations duplicate a link.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, Transaction};

struct SchemaStep {
    version: u32,
    name: &'static str,
    tables: &'static [&'static str],
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "people",
        tables: &["teachers", "students"],
        sql: include_str!("migrations/0001_init.sql"),
    },
    SchemaStep {
        version: 2,
        name: "roster_links",
        tables: &["teacher_students"],
        sql: include_str!("migrations/0002_teacher_students.sql"),
    },
];

/// Primary key columns, in key order, for every table repositories touch.
const TABLE_KEYS: &[(&str, &[&str])] = &[
    ("teachers", &["id"]),
    ("students", &["id"]),
    ("teacher_students", &["teacher_id", "student_id"]),
];

/// Highest schema step this build can apply.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings `conn` to [`latest_version`] and checks the roster tables.
///
/// # Errors
/// - `DbError::SchemaTooNew` when the file is past [`latest_version`].
/// - `DbError::SchemaMismatch` when a table lacks its expected key.
pub fn migrate(conn: &mut Connection) -> DbResult<()> {
    let found = stored_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    if found < supported {
        let tx = conn.transaction()?;
        let applied = apply_pending(&tx, found)?;
        tx.commit()?;

        for step in applied {
            info!(
                "event=db_migrate module=db status=ok version={} step={} tables={}",
                step.version,
                step.name,
                step.tables.join(",")
            );
        }
    }

    verify_table_keys(conn)
}

fn apply_pending(tx: &Transaction<'_>, found: u32) -> DbResult<Vec<&'static SchemaStep>> {
    let mut applied = Vec::new();
    for step in SCHEMA_STEPS.iter().skip_while(|step| step.version <= found) {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        applied.push(step);
    }
    Ok(applied)
}

fn verify_table_keys(conn: &Connection) -> DbResult<()> {
    let mut stmt =
        conn.prepare("SELECT name FROM pragma_table_info(?1) WHERE pk > 0 ORDER BY pk;")?;
    for (table, expected) in TABLE_KEYS {
        let columns = stmt
            .query_map([table], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        if columns != *expected {
            return Err(DbError::SchemaMismatch(format!(
                "table `{table}` is keyed by ({}) instead of ({})",
                columns.join(", "),
                expected.join(", ")
            )));
        }
    }
    Ok(())
}

fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
