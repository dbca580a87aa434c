//! Notes table definition and idempotent initializer.
//!
//! There is no migration registry: the schema only grows through
//! `CREATE ... IF NOT EXISTS` statements.

use super::DbResult;
use log::debug;
use rusqlite::Connection;

/// DDL for the single `notes` table.
///
/// `completed` stores the boolean flag as `0`/`1`.
pub const NOTES_DDL: &str = "CREATE TABLE IF NOT EXISTS notes (
    uuid TEXT PRIMARY KEY NOT NULL,
    completed INT,
    description TEXT
);";

const TABLES_DDL: &[&str] = &[NOTES_DDL];

/// Ensures every table required by core exists.
///
/// Runs all DDL inside one transaction. Safe to call on every start; existing
/// rows are never touched.
pub fn ensure_tables_exist(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction()?;
    for ddl in TABLES_DDL {
        tx.execute_batch(ddl)?;
    }
    tx.commit()?;

    debug!(
        "event=schema_ensure module=db status=ok tables={}",
        TABLES_DDL.len()
    );
    Ok(())
}
