//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. The pool is built
//! lazily so the process can start before the database is reachable; each
//! operation acquires and releases its own connection.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::{pg_connect_options, ConfigError};

/// Maximum connections for the pool. Kept low for a single-table service.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Create a lazy PostgreSQL connection pool from a raw database target.
///
/// Accepts either a `postgres://` URL or a keyword/value DSN; see
/// [`pg_connect_options`]. No connection is attempted until first use.
pub fn create_pool(database_url: &str) -> Result<PgPool, ConfigError> {
    let options = pg_connect_options(database_url)?;
    Ok(PgPoolOptions::new()
        .max_connections(DEFAULT_MAX_CONNECTIONS)
        .connect_lazy_with(options))
}
