//! Entry repository: CRUD over the `test` table
//!
//! Every operation acquires one pooled connection, pins the session's
//! search path to `public` (restricted roles may start with an empty
//! search path), and runs a single identifier-quoted, parameter-bound
//! statement.
//!
//! A missing table (SQLSTATE 42P01) is an expected state, mapped per
//! operation: list yields an empty set, get/update/delete yield not-found,
//! create yields schema-missing. Every other database error propagates
//! unchanged so the pipeline guard sees it.

use serde::Serialize;
use sqlx::pool::PoolConnection;
use sqlx::{FromRow, PgPool, Postgres};

/// SQLSTATE for `undefined_table`.
const UNDEFINED_TABLE: &str = "42P01";

/// Row in the `test` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Entry {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("table \"{table}\" does not exist yet")]
    SchemaMissing { table: &'static str },
}

/// Entry repository
pub struct EntryRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> EntryRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Check out a connection with the search path pinned to `public`.
    async fn conn(&self) -> Result<PoolConnection<Postgres>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("SET search_path TO public")
            .execute(&mut *conn)
            .await?;
        Ok(conn)
    }

    /// List all entries, ordered by id ascending.
    ///
    /// A missing table reads as "not yet initialized" and yields an empty
    /// list rather than an error.
    pub async fn list(&self) -> Result<Vec<Entry>, DbError> {
        let mut conn = self.conn().await?;
        let result = sqlx::query_as::<_, Entry>(
            r#"SELECT "id", "name" FROM "public"."test" ORDER BY "id""#,
        )
        .fetch_all(&mut *conn)
        .await;

        match result {
            Ok(entries) => Ok(entries),
            Err(e) if is_undefined_table(&e) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a single entry by id. Table-missing also reads as not-found.
    pub async fn get(&self, id: i32) -> Result<Entry, DbError> {
        let mut conn = self.conn().await?;
        let result = sqlx::query_as::<_, Entry>(
            r#"SELECT "id", "name" FROM "public"."test" WHERE "id" = $1"#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await;

        match result {
            Ok(Some(entry)) => Ok(entry),
            Ok(None) => Err(not_found(id)),
            Err(e) if is_undefined_table(&e) => Err(not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert an entry, returning the newly assigned row.
    ///
    /// Table-missing is surfaced as [`DbError::SchemaMissing`] so the caller
    /// can signal "schema not ready" distinctly from not-found.
    pub async fn create(&self, name: &str) -> Result<Entry, DbError> {
        let mut conn = self.conn().await?;
        let result = sqlx::query_as::<_, Entry>(
            r#"INSERT INTO "public"."test" ("name") VALUES ($1) RETURNING "id", "name""#,
        )
        .bind(name)
        .fetch_one(&mut *conn)
        .await;

        match result {
            Ok(entry) => Ok(entry),
            Err(e) if is_undefined_table(&e) => Err(DbError::SchemaMissing { table: "test" }),
            Err(e) => Err(e.into()),
        }
    }

    /// Update an entry's name. Zero rows affected yields not-found.
    pub async fn update(&self, id: i32, name: &str) -> Result<(), DbError> {
        let mut conn = self.conn().await?;
        let result = sqlx::query(r#"UPDATE "public"."test" SET "name" = $2 WHERE "id" = $1"#)
            .bind(id)
            .bind(name)
            .execute(&mut *conn)
            .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => Ok(()),
            Ok(_) => Err(not_found(id)),
            Err(e) if is_undefined_table(&e) => Err(not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete an entry. Zero rows affected yields not-found.
    pub async fn delete(&self, id: i32) -> Result<(), DbError> {
        let mut conn = self.conn().await?;
        let result = sqlx::query(r#"DELETE FROM "public"."test" WHERE "id" = $1"#)
            .bind(id)
            .execute(&mut *conn)
            .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => Ok(()),
            Ok(_) => Err(not_found(id)),
            Err(e) if is_undefined_table(&e) => Err(not_found(id)),
            Err(e) => Err(e.into()),
        }
    }
}

fn not_found(id: i32) -> DbError {
    DbError::NotFound {
        resource: "entry",
        id: id.to_string(),
    }
}

fn is_undefined_table(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNDEFINED_TABLE)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;

    // Integration tests - run with DATABASE_URL set:
    // cargo test -- --ignored

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        create_pool(&url).expect("pool creation failed")
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn created_entry_is_immediately_gettable() {
        let pool = pool().await;
        let repo = EntryRepo::new(&pool);

        let created = repo.create("Alpha").await.expect("create failed");
        let fetched = repo.get(created.id).await.expect("get failed");
        assert_eq!(fetched.name, "Alpha");

        repo.delete(created.id).await.expect("delete failed");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn deleted_entry_is_not_found() {
        let pool = pool().await;
        let repo = EntryRepo::new(&pool);

        let created = repo.create("ephemeral").await.expect("create failed");
        repo.delete(created.id).await.expect("delete failed");

        assert!(matches!(
            repo.get(created.id).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            repo.update(created.id, "ghost").await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            repo.delete(created.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    #[ignore = "requires database without the test table"]
    async fn missing_table_is_soft() {
        // Point DATABASE_URL at a database where "test" was never created.
        let pool = pool().await;
        let repo = EntryRepo::new(&pool);

        assert!(repo.list().await.expect("list failed").is_empty());
        assert!(matches!(repo.get(1).await, Err(DbError::NotFound { .. })));
        assert!(matches!(
            repo.create("Alpha").await,
            Err(DbError::SchemaMissing { .. })
        ));
        assert!(matches!(
            repo.update(1, "Alpha").await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(repo.delete(1).await, Err(DbError::NotFound { .. })));
    }
}
