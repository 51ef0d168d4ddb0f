// Drives the menu loop with scripted input against a recording repository
// and against a real in-memory SQLite service.

use async_trait::async_trait;
use futures::lock::Mutex;
use item_manager::{
    DbError, Item, ItemRepository, NewItem, Result, Session, SessionEnd, SqliteConfig,
    SqliteItemService,
};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    GetAll,
    Insert(NewItem),
    Update(i64, NewItem),
    Delete(i64),
}

#[derive(Default)]
struct RecordingRepository {
    items: Vec<Item>,
    calls: Mutex<Vec<Call>>,
    fail: bool,
}

impl RecordingRepository {
    fn with_items(items: Vec<Item>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().await.push(call);
        if self.fail {
            return Err(DbError::NotConnected);
        }
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for RecordingRepository {
    async fn get_all_items(&self) -> Result<Vec<Item>> {
        self.record(Call::GetAll).await?;
        Ok(self.items.clone())
    }

    async fn get_item_by_id(&self, id: i64) -> Result<Option<Item>> {
        Ok(self.items.iter().find(|i| i.id == id).cloned())
    }

    async fn get_item_by_name(&self, name: &str) -> Result<Option<Item>> {
        Ok(self.items.iter().find(|i| i.name == name).cloned())
    }

    async fn insert_item(&self, item: NewItem) -> Result<Item> {
        self.record(Call::Insert(item.clone())).await?;
        Ok(Item::with_id(1, item))
    }

    async fn update_item(&self, id: i64, item: NewItem) -> Result<Item> {
        self.record(Call::Update(id, item.clone())).await?;
        Ok(Item::with_id(id, item))
    }

    async fn delete_item(&self, id: i64) -> Result<()> {
        self.record(Call::Delete(id)).await
    }
}

fn item(id: i64, name: &str, description: &str) -> Item {
    Item {
        id,
        name: name.to_string(),
        description: description.to_string(),
    }
}

async fn run_script<R: ItemRepository>(repo: Arc<R>, script: &str) -> (SessionEnd, String) {
    let mut session = Session::new(repo, script.as_bytes(), Vec::new());
    let end = session.run().await.unwrap();
    let output = String::from_utf8(session.output().clone()).unwrap();
    (end, output)
}

#[tokio::test]
async fn test_start_renders_banner_and_menu() {
    let repo = Arc::new(RecordingRepository::default());
    let (end, output) = run_script(repo, "5\n").await;

    assert_eq!(end, SessionEnd::Exit);
    assert!(output.starts_with("===== Item Management Terminal UI =====\n"));
    assert!(output.contains("\nMain Menu:\n1. List all items\n"));
    assert!(output.contains("5. Exit\nSelect an option (1-5): "));
    assert!(output.ends_with("Goodbye!\n"));
}

#[tokio::test]
async fn test_list_prints_each_item() {
    let repo = Arc::new(RecordingRepository::with_items(vec![
        item(1, "Item 1", "Description 1"),
        item(2, "Item 2", "Description 2"),
    ]));
    let (_, output) = run_script(repo.clone(), "1\n5\n").await;

    assert_eq!(repo.calls().await, vec![Call::GetAll]);
    assert!(output.contains("\n===== All Items =====\n"));
    assert!(output.contains("ID: 1 | Name: Item 1 | Description: Description 1\n"));
    assert!(output.contains("ID: 2 | Name: Item 2 | Description: Description 2\n"));
}

#[tokio::test]
async fn test_list_reports_empty_table() {
    let repo = Arc::new(RecordingRepository::default());
    let (_, output) = run_script(repo, "1\n5\n").await;
    assert!(output.contains("No items found.\n"));
}

#[tokio::test]
async fn test_add_inserts_typed_fields() {
    let repo = Arc::new(RecordingRepository::default());
    let (_, output) = run_script(repo.clone(), "2\nNew Item\nNew Description\n5\n").await;

    assert_eq!(
        repo.calls().await,
        vec![Call::Insert(NewItem::new("New Item", "New Description"))]
    );
    assert!(output.contains("Enter item name: Enter item description: "));
    assert!(output.contains("Item added successfully with ID: 1\n"));
}

#[tokio::test]
async fn test_update_with_blank_input_keeps_current_values() {
    let repo = Arc::new(RecordingRepository::with_items(vec![item(
        1,
        "Original",
        "Orig desc",
    )]));
    let (_, output) = run_script(repo.clone(), "3\n1\n\n\n5\n").await;

    assert_eq!(
        repo.calls().await,
        vec![
            Call::GetAll,
            Call::Update(1, NewItem::new("Original", "Orig desc")),
        ]
    );
    assert!(output.contains("Current values - Name: Original | Description: Orig desc\n"));
    assert!(output.contains("Item updated successfully!\n"));
}

#[tokio::test]
async fn test_update_replaces_given_fields() {
    let repo = Arc::new(RecordingRepository::with_items(vec![item(
        1,
        "Original",
        "Orig desc",
    )]));
    run_script(repo.clone(), "3\n1\nRenamed\n\n5\n").await;

    assert_eq!(
        repo.calls().await.last(),
        Some(&Call::Update(1, NewItem::new("Renamed", "Orig desc")))
    );
}

#[tokio::test]
async fn test_update_unknown_id_skips_prompts() {
    let repo = Arc::new(RecordingRepository::with_items(vec![item(1, "a", "b")]));
    let (end, output) = run_script(repo.clone(), "3\n42\n5\n").await;

    assert_eq!(end, SessionEnd::Exit);
    assert_eq!(repo.calls().await, vec![Call::GetAll]);
    assert!(output.contains("No item found with ID: 42\n"));
    assert!(!output.contains("Enter new name"));
}

#[tokio::test]
async fn test_delete_confirms() {
    let repo = Arc::new(RecordingRepository::default());
    let (_, output) = run_script(repo.clone(), "4\n7\n5\n").await;

    assert_eq!(repo.calls().await, vec![Call::Delete(7)]);
    assert!(output.contains("Item with ID 7 deleted successfully\n"));
}

#[tokio::test]
async fn test_delete_rejects_non_numeric_id() {
    let repo = Arc::new(RecordingRepository::default());
    let (_, output) = run_script(repo.clone(), "4\nabc\n5\n").await;

    assert!(repo.calls().await.is_empty());
    assert!(output.contains("Invalid item ID: abc\n"));
}

#[tokio::test]
async fn test_invalid_option_reprompts() {
    let repo = Arc::new(RecordingRepository::default());
    let (end, output) = run_script(repo.clone(), "9\n5\n").await;

    assert_eq!(end, SessionEnd::Exit);
    assert!(repo.calls().await.is_empty());
    assert!(output.contains("Invalid option. Please try again.\n"));
    assert_eq!(output.matches("Main Menu:").count(), 2);
}

#[tokio::test]
async fn test_repository_errors_do_not_end_session() {
    let repo = Arc::new(RecordingRepository::failing());
    let (end, output) = run_script(repo, "1\n2\nx\ny\n3\n1\n4\n1\n5\n").await;

    assert_eq!(end, SessionEnd::Exit);
    assert!(output.contains("Error listing items: database not connected\n"));
    assert!(output.contains("Error adding item: database not connected\n"));
    assert!(output.contains("Error retrieving item: database not connected\n"));
    assert!(output.contains("Error deleting item: database not connected\n"));
    assert!(output.ends_with("Goodbye!\n"));
}

#[tokio::test]
async fn test_end_of_input_ends_session() {
    let repo = Arc::new(RecordingRepository::default());
    let (end, output) = run_script(repo.clone(), "2\nhalf typed").await;
    // The partial last line still counts as an answer.
    assert_eq!(end, SessionEnd::EndOfInput);
    assert!(repo.calls().await.is_empty());
    assert!(!output.contains("Goodbye!"));
}

#[tokio::test]
async fn test_full_cycle_against_sqlite() {
    let service = Arc::new(SqliteItemService::new(SqliteConfig::in_memory()));
    service.connect().await.unwrap();

    let script = "2\nLaptop\nmacbook pro\n3\n1\n\nM2 Air\n1\n4\n1\n1\n5\n";
    let (end, output) = run_script(service.clone(), script).await;

    assert_eq!(end, SessionEnd::Exit);
    assert!(output.contains("Item added successfully with ID: 1\n"));
    assert!(output.contains("ID: 1 | Name: Laptop | Description: M2 Air\n"));
    assert!(output.contains("Item with ID 1 deleted successfully\n"));
    assert!(output.contains("No items found.\n"));
    assert!(service.get_all_items().await.unwrap().is_empty());

    service.close().await.unwrap();
}
