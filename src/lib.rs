//! Terminal CRUD manager for items kept in a local SQLite database.
//!
//! # Layout
//!
//! - [`sqlite`]: connection lifecycle and the SQL behind every operation.
//! - [`repository`]: the async trait the menu talks to.
//! - [`session`]: the line-oriented menu loop.
//!
//! # Architectural Boundaries
//!
//! - Only the SQLite service touches the connection.
//! - The session never sees SQL or driver errors beyond their display text.

pub mod error;
pub mod item;
pub mod repository;
pub mod schema;
pub mod session;
pub mod sqlite;

pub use error::{DbError, Result};
pub use item::{Item, ItemUpdate, NewItem};
pub use repository::ItemRepository;
pub use session::{Session, SessionEnd};
pub use sqlite::{SqliteConfig, SqliteItemService};
