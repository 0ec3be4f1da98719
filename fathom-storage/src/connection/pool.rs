//! Read-only connection pool.
//!
//! Reads are short-lived, so the pool hands out whichever connection is
//! idle: selection starts at a rotating index and skips busy
//! connections, blocking only when every connection is in use.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use fathom_core::errors::StorageError;
use rusqlite::Connection;

use super::pragmas::apply_read_pragmas;

const DEFAULT_POOL_SIZE: usize = 4;
const MAX_POOL_SIZE: usize = 8;

/// A fixed-size pool of read-only SQLite connections.
pub struct ReadPool {
    connections: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl ReadPool {
    /// Open `pool_size` read-only connections to the database at `path`,
    /// clamped to 1..=8. The database file must already exist.
    pub fn open(path: &Path, pool_size: usize) -> Result<Self, StorageError> {
        let size = pool_size.clamp(1, MAX_POOL_SIZE);
        let mut connections = Vec::with_capacity(size);
        for _ in 0..size {
            let conn = Connection::open_with_flags(
                path,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(|e| StorageError::SqliteError {
                message: e.to_string(),
            })?;
            apply_read_pragmas(&conn)?;
            connections.push(Mutex::new(conn));
        }
        Ok(Self {
            connections,
            next: AtomicUsize::new(0),
        })
    }

    /// Execute a closure with a read connection. Prefers an idle
    /// connection over blocking behind a busy one.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let start = self.next.fetch_add(1, Ordering::Relaxed);
        for offset in 0..self.connections.len() {
            let idx = (start + offset) % self.connections.len();
            if let Ok(guard) = self.connections[idx].try_lock() {
                return f(&guard);
            }
        }

        // All busy (or poisoned): wait on the rotation's first pick.
        let guard = self.connections[start % self.connections.len()]
            .lock()
            .map_err(|_| StorageError::PoolPoisoned)?;
        f(&guard)
    }

    /// Number of connections in the pool.
    pub fn size(&self) -> usize {
        self.connections.len()
    }

    /// Default pool size.
    pub fn default_size() -> usize {
        DEFAULT_POOL_SIZE
    }
}
