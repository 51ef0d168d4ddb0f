use serde::{Deserialize, Serialize};
use std::fmt;

/// A persisted item. `id` is assigned by the datastore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
}

impl Item {
    pub fn with_id(id: i64, item: NewItem) -> Self {
        Self {
            id,
            name: item.name,
            description: item.description,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | Name: {} | Description: {}",
            self.id, self.name, self.description
        )
    }
}

/// Field values for an insert or a full overwrite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub description: String,
}

impl NewItem {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A partial edit; `None` keeps the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ItemUpdate {
    /// Builds an update from raw prompt answers, treating empty input as "keep".
    pub fn from_input(name: &str, description: &str) -> Self {
        let keep_if_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            name: keep_if_empty(name),
            description: keep_if_empty(description),
        }
    }

    pub fn apply_to(self, current: &Item) -> NewItem {
        NewItem {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
        }
    }
}
