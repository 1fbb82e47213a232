//! Database access layer for the LightBnB PostgreSQL schema
//!
//! Assumes the `users`, `properties`, `reservations` and `property_reviews`
//! tables already exist. No migrations live here.

pub mod client;
pub mod filter;
pub mod queries;
pub mod schema;

pub use client::*;
pub use filter::PropertyFilter;
pub use queries::DEFAULT_LIMIT;
pub use schema::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(#[source] sqlx::Error),

    #[error("Malformed input: {0}")]
    MalformedInput(#[source] sqlx::Error),

    #[error("Query error: {0}")]
    Query(#[source] sqlx::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[source] sqlx::Error),
}

/// Coarse failure category, for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorKind {
    Connection,
    ConstraintViolation,
    MalformedInput,
    Query,
    Config,
}

impl DbError {
    pub fn kind(&self) -> DbErrorKind {
        match self {
            DbError::Connection(_) => DbErrorKind::Connection,
            DbError::ConstraintViolation(_) => DbErrorKind::ConstraintViolation,
            DbError::MalformedInput(_) => DbErrorKind::MalformedInput,
            DbError::Query(_) => DbErrorKind::Query,
            DbError::Config(_) => DbErrorKind::Config,
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match classify(&err) {
            DbErrorKind::Connection => DbError::Connection(err),
            DbErrorKind::ConstraintViolation => DbError::ConstraintViolation(err),
            DbErrorKind::MalformedInput => DbError::MalformedInput(err),
            DbErrorKind::Config => DbError::Config(err),
            DbErrorKind::Query => DbError::Query(err),
        }
    }
}

/// Map a sqlx error onto a category, using the SQLSTATE class for errors
/// reported by the server.
fn classify(err: &sqlx::Error) -> DbErrorKind {
    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_) => DbErrorKind::Connection,
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => DbErrorKind::MalformedInput,
        sqlx::Error::Configuration(_) => DbErrorKind::Config,
        sqlx::Error::Database(db_err) => match db_err.code().as_deref().map(|c| c.get(..2)) {
            Some(Some("08")) => DbErrorKind::Connection,
            Some(Some("22")) => DbErrorKind::MalformedInput,
            Some(Some("23")) => DbErrorKind::ConstraintViolation,
            _ => DbErrorKind::Query,
        },
        _ => DbErrorKind::Query,
    }
}

pub type DbResult<T> = Result<T, DbError>;
