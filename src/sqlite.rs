use async_trait::async_trait;
use futures::lock::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::error::{DbError, Result};
use crate::item::{Item, NewItem};
use crate::repository::ItemRepository;
use crate::schema::Schema;

const SELECT_ITEM: &str = "SELECT id, name, description FROM items";

/// SQLite Service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SqliteConfig {
    /// Path to the SQLite database file, or `:memory:`
    pub db_path: String,
    /// Schema definition for the database
    pub schema: Schema,
}

impl SqliteConfig {
    /// Create a config for the items schema at the given path
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            schema: Schema::items(),
        }
    }

    /// Create a config for a private in-memory database
    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }
}

/// Item store over a single SQLite connection.
///
/// The connection only exists between [`connect`](Self::connect) and
/// [`close`](Self::close); every operation outside that window fails with
/// [`DbError::NotConnected`].
pub struct SqliteItemService {
    config: SqliteConfig,
    connection: Mutex<Option<Connection>>,
}

impl SqliteItemService {
    pub fn new(config: SqliteConfig) -> Self {
        Self {
            config,
            connection: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &str {
        &self.config.db_path
    }

    /// Opens (or creates) the database file and ensures the schema exists.
    /// Calling it on an open service is a no-op.
    pub async fn connect(&self) -> Result<()> {
        let mut guard = self.connection.lock().await;
        if guard.is_some() {
            debug!(path = %self.path(), "already connected");
            return Ok(());
        }

        info!(path = %self.path(), "opening sqlite database");
        let conn = Connection::open(&self.config.db_path).map_err(|source| {
            DbError::Connection {
                path: self.config.db_path.clone(),
                source,
            }
        })?;
        initialize_schema(&conn, &self.config.schema)?;
        *guard = Some(conn);
        Ok(())
    }

    /// Releases the connection. Safe to call repeatedly.
    pub async fn close(&self) -> Result<()> {
        let mut guard = self.connection.lock().await;
        match guard.take() {
            Some(conn) => {
                info!(path = %self.path(), "closing sqlite database");
                conn.close().map_err(|(_, err)| DbError::Query(err))
            }
            None => Ok(()),
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_some()
    }

    /// Runs a raw statement and returns the number of rows affected.
    pub async fn execute(&self, sql: &str) -> Result<usize> {
        self.with_connection(|conn| {
            debug!(sql, "execute");
            Ok(conn.execute(sql, [])?)
        })
        .await
    }

    pub async fn count_items(&self) -> Result<i64> {
        self.with_connection(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?)
        })
        .await
    }

    async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send,
        T: Send,
    {
        let guard = self.connection.lock().await;
        let conn = guard.as_ref().ok_or(DbError::NotConnected)?;
        f(conn)
    }
}

fn initialize_schema(conn: &Connection, schema: &Schema) -> Result<()> {
    for sql in schema.create_statements() {
        debug!(%sql, "ensuring table");
        conn.execute(&sql, [])?;
    }
    Ok(())
}

fn map_item(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
    })
}

#[async_trait]
impl ItemRepository for SqliteItemService {
    async fn get_all_items(&self) -> Result<Vec<Item>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_ITEM} ORDER BY id"))?;
            let rows = stmt.query_map([], map_item)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    async fn get_item_by_id(&self, id: i64) -> Result<Option<Item>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(&format!("{SELECT_ITEM} WHERE id = ?1"), [id], map_item)
                .optional()?)
        })
        .await
    }

    async fn get_item_by_name(&self, name: &str) -> Result<Option<Item>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    &format!("{SELECT_ITEM} WHERE name = ?1 ORDER BY id LIMIT 1"),
                    [name],
                    map_item,
                )
                .optional()?)
        })
        .await
    }

    async fn insert_item(&self, item: NewItem) -> Result<Item> {
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO items (name, description) VALUES (?1, ?2)",
                params![item.name, item.description],
            )?;
            let id = conn.last_insert_rowid();
            debug!(id, "inserted item");
            Ok(Item::with_id(id, item))
        })
        .await
    }

    async fn update_item(&self, id: i64, item: NewItem) -> Result<Item> {
        self.with_connection(|conn| {
            let changed = conn.execute(
                "UPDATE items SET name = ?1, description = ?2 WHERE id = ?3",
                params![item.name, item.description, id],
            )?;
            debug!(id, changed, "updated item");
            Ok(Item::with_id(id, item))
        })
        .await
    }

    async fn delete_item(&self, id: i64) -> Result<()> {
        self.with_connection(|conn| {
            let changed = conn.execute("DELETE FROM items WHERE id = ?1", [id])?;
            debug!(id, changed, "deleted item");
            Ok(())
        })
        .await
    }
}
