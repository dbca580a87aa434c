//! Storage context lifecycle.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection settings required by core behavior.
//! - Run the schema initializer before returning a usable handle.
//!
//! # Invariants
//! - A returned `Storage` always has the `notes` table in place.
//! - Opening the same path twice yields two handles on the same file.

use super::schema::ensure_tables_exist;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Explicitly constructed handle to the notes database.
///
/// Owns one SQLite connection. Repositories and feeds borrow it; the
/// application opens it at start and closes it at stop.
#[derive(Debug)]
pub struct Storage {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Storage {
    /// Opens (creating if needed) the database file at `path`.
    ///
    /// # Side effects
    /// - Creates the `notes` table when missing.
    /// - Emits `db_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = open_logged("file", || Connection::open(&path))?;
        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    /// Opens a private in-memory database, mainly for tests and previews.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = open_logged("memory", Connection::open_in_memory)?;
        Ok(Self { conn, path: None })
    }

    /// Re-runs the schema initializer on this handle.
    pub fn ensure_tables_exist(&mut self) -> DbResult<()> {
        ensure_tables_exist(&mut self.conn)
    }

    /// Backing file path, `None` for in-memory storage.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Closes the handle and reports a failed close instead of swallowing it.
    pub fn close(self) -> DbResult<()> {
        let mode = if self.path.is_some() { "file" } else { "memory" };
        match self.conn.close() {
            Ok(()) => {
                info!("event=db_close module=db status=ok mode={mode}");
                Ok(())
            }
            Err((_conn, err)) => {
                error!(
                    "event=db_close module=db status=error mode={mode} error_code=db_close_failed error={err}"
                );
                Err(DbError::Close(err))
            }
        }
    }
}

fn open_logged(
    mode: &'static str,
    opener: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match opener() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(err.into());
        }
    };

    if let Err(err) = bootstrap_connection(&mut conn) {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={err}",
            started_at.elapsed().as_millis()
        );
        return Err(err);
    }

    info!(
        "event=db_open module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    ensure_tables_exist(conn)?;
    Ok(())
}
