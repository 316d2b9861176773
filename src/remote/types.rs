//! Wire types shared by the backend, its HTTP surface and the client adapters.

use serde::{Deserialize, Serialize};

/// Backend row shape: a JSON object keyed by column name.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Backend tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Item,
    ShoppingList,
    ListItem,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Item, Table::ShoppingList, Table::ListItem];

    pub fn as_str(self) -> &'static str {
        match self {
            Table::Item => "item",
            Table::ShoppingList => "shopping_list",
            Table::ListItem => "list_item",
        }
    }

    pub fn parse(s: &str) -> Option<Table> {
        Table::ALL.into_iter().find(|t| t.as_str() == s)
    }

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Item => &["id", "name", "category", "unit", "created_at", "owner_id"],
            Table::ShoppingList => &["id", "name", "description", "created_at", "owner_id"],
            Table::ListItem => &[
                "id",
                "list_id",
                "item_id",
                "quantity",
                "price",
                "completed",
                "created_at",
            ],
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row together with the commit sequence number of its last write.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VersionedRow {
    pub seq: u64,
    pub row: Row,
}

impl VersionedRow {
    pub fn id(&self) -> Option<&str> {
        self.row.get("id").and_then(|v| v.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectResponse {
    pub rows: Vec<VersionedRow>,
    /// Backend head at the time of the read.
    pub seq: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeletedRows {
    pub rows: Vec<VersionedRow>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// One row-level change, as published on the change-feed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub seq: u64,
    pub table: Table,
    pub kind: ChangeKind,

    /// Full new row for inserts and updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<Row>,

    /// Full old row for updates and deletes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<Row>,
}

impl ChangeEvent {
    pub fn row_id(&self) -> Option<&str> {
        self.new
            .as_ref()
            .or(self.old.as_ref())
            .and_then(|r| r.get("id"))
            .and_then(|v| v.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeBatch {
    pub events: Vec<ChangeEvent>,

    /// Cursor to pass as `since` on the next poll.
    pub cursor: u64,

    /// The requested cursor fell behind the retained change log; the
    /// subscriber must reload the table before continuing.
    #[serde(default)]
    pub resync: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadResponse {
    pub seq: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
