//! Translation between domain records and backend rows.
//!
//! Rows use snake_case column names and RFC 3339 text timestamps; the
//! domain uses typed ids and [`time::OffsetDateTime`]. Every persisted field
//! has a mapping in both directions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::{Row, Table};
use crate::model::{
    CatalogItem, ItemId, ItemPatch, ListId, ListMembership, ListPatch, MembershipId,
    MembershipPatch, ShoppingList, Unit, UserId, format_ts,
};

#[derive(Debug, Error)]
pub enum RowError {
    #[error("row does not match {table}: {source}")]
    Shape {
        table: Table,
        source: serde_json::Error,
    },

    #[error("{table}.created_at is not RFC 3339: {value}")]
    Timestamp { table: Table, value: String },

    #[error("{table}.created_at has no RFC 3339 form: {source}")]
    Format {
        table: Table,
        source: time::error::Format,
    },

    #[error("{table} record did not encode as a row object")]
    NotAnObject { table: Table },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemRow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub unit: Unit,
    pub created_at: String,
    #[serde(default)]
    pub owner_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListRow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub owner_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListItemRow {
    pub id: String,
    pub list_id: String,
    pub item_id: String,
    pub quantity: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub completed: bool,
    pub created_at: String,
}

/// A domain record with a backend row form.
pub trait RowRecord: Sized {
    const TABLE: Table;

    fn to_row(&self) -> Result<Row, RowError>;

    fn from_row(row: &Row) -> Result<Self, RowError>;
}

fn encode<T: Serialize>(table: Table, value: &T) -> Result<Row, RowError> {
    match serde_json::to_value(value).map_err(|source| RowError::Shape { table, source })? {
        Value::Object(map) => Ok(map),
        _ => Err(RowError::NotAnObject { table }),
    }
}

fn write_ts(table: Table, ts: OffsetDateTime) -> Result<String, RowError> {
    format_ts(ts).map_err(|source| RowError::Format { table, source })
}

fn decode<T: for<'de> Deserialize<'de>>(table: Table, row: &Row) -> Result<T, RowError> {
    serde_json::from_value(Value::Object(row.clone()))
        .map_err(|source| RowError::Shape { table, source })
}

fn parse_ts(table: Table, value: &str) -> Result<OffsetDateTime, RowError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|_| RowError::Timestamp {
        table,
        value: value.to_string(),
    })
}

impl RowRecord for CatalogItem {
    const TABLE: Table = Table::Item;

    fn to_row(&self) -> Result<Row, RowError> {
        encode(
            Self::TABLE,
            &ItemRow {
                id: self.id.0.clone(),
                name: self.name.clone(),
                category: self.category.clone(),
                unit: self.unit,
                created_at: write_ts(Self::TABLE, self.created_at)?,
                owner_id: self.owner.as_ref().map(|o| o.0.clone()),
            },
        )
    }

    fn from_row(row: &Row) -> Result<Self, RowError> {
        let r: ItemRow = decode(Self::TABLE, row)?;
        Ok(CatalogItem {
            id: ItemId(r.id),
            name: r.name,
            category: r.category,
            unit: r.unit,
            created_at: parse_ts(Self::TABLE, &r.created_at)?,
            owner: r.owner_id.map(UserId),
        })
    }
}

impl RowRecord for ShoppingList {
    const TABLE: Table = Table::ShoppingList;

    fn to_row(&self) -> Result<Row, RowError> {
        encode(
            Self::TABLE,
            &ListRow {
                id: self.id.0.clone(),
                name: self.name.clone(),
                description: Some(self.description.clone().unwrap_or_default()),
                created_at: write_ts(Self::TABLE, self.created_at)?,
                owner_id: self.owner.as_ref().map(|o| o.0.clone()),
            },
        )
    }

    fn from_row(row: &Row) -> Result<Self, RowError> {
        let r: ListRow = decode(Self::TABLE, row)?;
        Ok(ShoppingList {
            id: ListId(r.id),
            name: r.name,
            description: r.description.filter(|d| !d.is_empty()),
            created_at: parse_ts(Self::TABLE, &r.created_at)?,
            owner: r.owner_id.map(UserId),
        })
    }
}

impl RowRecord for ListMembership {
    const TABLE: Table = Table::ListItem;

    fn to_row(&self) -> Result<Row, RowError> {
        encode(
            Self::TABLE,
            &ListItemRow {
                id: self.id.0.clone(),
                list_id: self.list_id.0.clone(),
                item_id: self.item_id.0.clone(),
                quantity: self.quantity,
                price: self.price,
                completed: self.completed,
                created_at: write_ts(Self::TABLE, self.created_at)?,
            },
        )
    }

    fn from_row(row: &Row) -> Result<Self, RowError> {
        let r: ListItemRow = decode(Self::TABLE, row)?;
        Ok(ListMembership {
            id: MembershipId(r.id),
            list_id: ListId(r.list_id),
            item_id: ItemId(r.item_id),
            quantity: r.quantity,
            price: r.price,
            completed: r.completed,
            created_at: parse_ts(Self::TABLE, &r.created_at)?,
        })
    }
}

pub(crate) fn item_patch_row(patch: &ItemPatch) -> Row {
    let mut row = Row::new();
    if let Some(name) = &patch.name {
        row.insert("name".into(), Value::from(name.as_str()));
    }
    if let Some(category) = &patch.category {
        row.insert("category".into(), Value::from(category.as_str()));
    }
    if let Some(unit) = patch.unit {
        row.insert("unit".into(), Value::from(unit.as_str()));
    }
    row
}

pub(crate) fn list_patch_row(patch: &ListPatch) -> Row {
    let mut row = Row::new();
    if let Some(name) = &patch.name {
        row.insert("name".into(), Value::from(name.as_str()));
    }
    if let Some(description) = &patch.description {
        let text = description.clone().unwrap_or_default();
        row.insert("description".into(), Value::from(text));
    }
    row
}

pub(crate) fn membership_patch_row(patch: &MembershipPatch) -> Row {
    let mut row = Row::new();
    if let Some(q) = patch.quantity {
        row.insert("quantity".into(), Value::from(q));
    }
    if let Some(p) = patch.price {
        row.insert("price".into(), Value::from(p));
    }
    if let Some(c) = patch.completed {
        row.insert("completed".into(), Value::from(c));
    }
    row
}

#[cfg(test)]
#[path = "../tests/remote/rows_tests.rs"]
mod tests;
