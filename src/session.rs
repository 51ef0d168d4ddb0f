//! Interactive menu loop over an [`ItemRepository`].
//!
//! The session reads one line at a time from any async buffered reader and
//! writes prompts and results to any writer, so the binary runs it over
//! stdin/stdout while tests drive it with scripted bytes.

use std::io::{self, Write};
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::item::{ItemUpdate, NewItem};
use crate::repository::ItemRepository;

pub const BANNER: &str = "===== Item Management Terminal UI =====";

const MENU: &str = "\nMain Menu:\n\
1. List all items\n\
2. Add a new item\n\
3. Update an item\n\
4. Delete an item\n\
5. Exit";

/// What the loop does after a menu transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
    Closed,
}

/// Why [`Session::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user picked the exit option.
    Exit,
    /// Input closed before the user picked exit.
    EndOfInput,
}

pub struct Session<R: ?Sized, I, W> {
    repo: Arc<R>,
    input: I,
    output: W,
}

impl<R, I, W> Session<R, I, W>
where
    R: ItemRepository + ?Sized,
    I: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(repo: Arc<R>, input: I, output: W) -> Self {
        Self {
            repo,
            input,
            output,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Prints the banner and serves menu selections until exit or end of
    /// input. Repository failures are reported and never end the loop; only
    /// terminal I/O errors are returned.
    pub async fn run(&mut self) -> io::Result<SessionEnd> {
        writeln!(self.output, "{BANNER}")?;
        let end = loop {
            writeln!(self.output, "{MENU}")?;
            let Some(choice) = self.prompt("Select an option (1-5): ").await? else {
                break SessionEnd::EndOfInput;
            };
            debug!(choice = %choice, "menu selection");

            let flow = match choice.as_str() {
                "1" => self.list_items().await?,
                "2" => self.add_item().await?,
                "3" => self.update_item().await?,
                "4" => self.delete_item().await?,
                "5" => {
                    writeln!(self.output, "Goodbye!")?;
                    Flow::Exit
                }
                _ => {
                    writeln!(self.output, "Invalid option. Please try again.")?;
                    Flow::Continue
                }
            };
            match flow {
                Flow::Continue => {}
                Flow::Exit => break SessionEnd::Exit,
                Flow::Closed => break SessionEnd::EndOfInput,
            }
        };
        self.output.flush()?;
        Ok(end)
    }

    async fn list_items(&mut self) -> io::Result<Flow> {
        match self.repo.get_all_items().await {
            Ok(items) => {
                writeln!(self.output, "\n===== All Items =====")?;
                if items.is_empty() {
                    writeln!(self.output, "No items found.")?;
                }
                for item in &items {
                    writeln!(self.output, "{item}")?;
                }
            }
            Err(err) => {
                warn!(error = %err, "listing items failed");
                writeln!(self.output, "Error listing items: {err}")?;
            }
        }
        Ok(Flow::Continue)
    }

    async fn add_item(&mut self) -> io::Result<Flow> {
        let Some(name) = self.prompt("Enter item name: ").await? else {
            return Ok(Flow::Closed);
        };
        let Some(description) = self.prompt("Enter item description: ").await? else {
            return Ok(Flow::Closed);
        };

        match self.repo.insert_item(NewItem::new(name, description)).await {
            Ok(item) => writeln!(self.output, "Item added successfully with ID: {}", item.id)?,
            Err(err) => {
                warn!(error = %err, "adding item failed");
                writeln!(self.output, "Error adding item: {err}")?;
            }
        }
        Ok(Flow::Continue)
    }

    async fn update_item(&mut self) -> io::Result<Flow> {
        let Some(raw_id) = self.prompt("Enter item ID to update: ").await? else {
            return Ok(Flow::Closed);
        };

        let items = match self.repo.get_all_items().await {
            Ok(items) => items,
            Err(err) => {
                warn!(error = %err, "retrieving item failed");
                writeln!(self.output, "Error retrieving item: {err}")?;
                return Ok(Flow::Continue);
            }
        };
        let found = parse_id(&raw_id).and_then(|id| items.into_iter().find(|i| i.id == id));
        let Some(current) = found else {
            writeln!(self.output, "No item found with ID: {raw_id}")?;
            return Ok(Flow::Continue);
        };

        writeln!(
            self.output,
            "Current values - Name: {} | Description: {}",
            current.name, current.description
        )?;
        let Some(name) = self
            .prompt("Enter new name (leave blank to keep current): ")
            .await?
        else {
            return Ok(Flow::Closed);
        };
        let Some(description) = self
            .prompt("Enter new description (leave blank to keep current): ")
            .await?
        else {
            return Ok(Flow::Closed);
        };

        let changes = ItemUpdate::from_input(&name, &description).apply_to(&current);
        match self.repo.update_item(current.id, changes).await {
            Ok(_) => writeln!(self.output, "Item updated successfully!")?,
            Err(err) => {
                warn!(error = %err, "updating item failed");
                writeln!(self.output, "Error updating item: {err}")?;
            }
        }
        Ok(Flow::Continue)
    }

    async fn delete_item(&mut self) -> io::Result<Flow> {
        let Some(raw_id) = self.prompt("Enter item ID to delete: ").await? else {
            return Ok(Flow::Closed);
        };
        let Some(id) = parse_id(&raw_id) else {
            writeln!(self.output, "Invalid item ID: {raw_id}")?;
            return Ok(Flow::Continue);
        };

        match self.repo.delete_item(id).await {
            Ok(()) => writeln!(self.output, "Item with ID {id} deleted successfully")?,
            Err(err) => {
                warn!(error = %err, "deleting item failed");
                writeln!(self.output, "Error deleting item: {err}")?;
            }
        }
        Ok(Flow::Continue)
    }

    /// Writes `question` and reads one answer. `None` means input is closed.
    async fn prompt(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        let answer = line.trim_end_matches(['\r', '\n']);
        Ok(Some(answer.to_string()))
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}
