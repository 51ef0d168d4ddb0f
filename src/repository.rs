use async_trait::async_trait;

use crate::error::Result;
use crate::item::{Item, NewItem};

/// Read and write access to stored items.
///
/// The session talks to the datastore only through this trait, so any
/// backend (or a recording double in tests) can drive the menu.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// All items in insertion order. Empty when the table is empty.
    async fn get_all_items(&self) -> Result<Vec<Item>>;

    async fn get_item_by_id(&self, id: i64) -> Result<Option<Item>>;

    async fn get_item_by_name(&self, name: &str) -> Result<Option<Item>>;

    /// Persists a new row and returns it with its assigned id.
    async fn insert_item(&self, item: NewItem) -> Result<Item>;

    /// Overwrites name and description. A missing id is not an error.
    async fn update_item(&self, id: i64, item: NewItem) -> Result<Item>;

    /// Removes the row. A missing id is not an error.
    async fn delete_item(&self, id: i64) -> Result<()>;
}
