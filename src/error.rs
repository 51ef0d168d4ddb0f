use thiserror::Error;

/// Errors raised by the item datastore.
#[derive(Debug, Error)]
pub enum DbError {
    /// The database file could not be opened.
    #[error("failed to connect to database at {path}: {source}")]
    Connection {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// An operation was attempted before `connect` or after `close`.
    #[error("database not connected")]
    NotConnected,

    /// A statement failed to prepare or execute.
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;
