//! Database access shared across AdLens crates

pub mod init;
pub mod models;

use crate::Error;

/// Map a sqlx error onto the common taxonomy
///
/// SQLite reports a query against an absent table as "no such table"; that
/// condition is distinguishable from an empty result so callers can fall
/// back to a zero-filled report on fresh deployments.
pub fn classify_query_error(err: sqlx::Error, table: &str) -> Error {
    if let Some(db_err) = err.as_database_error() {
        if db_err.message().contains("no such table") {
            return Error::SchemaMissing(format!("table '{}' does not exist yet", table));
        }
    }
    Error::Database(err)
}
