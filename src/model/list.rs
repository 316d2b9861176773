use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::catalog::now_utc;
use super::ids::{ItemId, ListId, MembershipId, UserId};

/// A named collection of catalog items.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: ListId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserId>,
}

impl ShoppingList {
    pub fn new(name: &str, description: Option<String>, owner: Option<UserId>) -> Self {
        Self {
            id: ListId::generate(),
            name: name.to_string(),
            description: description.filter(|d| !d.trim().is_empty()),
            created_at: now_utc(),
            owner,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListPatch {
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
}

impl ListPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    pub fn apply(&self, list: &mut ShoppingList) {
        if let Some(name) = &self.name {
            list.name = name.clone();
        }
        if let Some(description) = &self.description {
            list.description = description.clone();
        }
    }
}

/// Binding of one catalog item to one list.
///
/// Memberships carry no unit of their own; the unit always comes from the
/// referenced catalog item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListMembership {
    pub id: MembershipId,
    pub list_id: ListId,
    pub item_id: ItemId,
    pub quantity: f64,
    /// Unit price.
    pub price: f64,
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl ListMembership {
    pub fn new(list_id: ListId, item_id: ItemId, quantity: f64, price: f64) -> Self {
        Self {
            id: MembershipId::generate(),
            list_id,
            item_id,
            quantity,
            price,
            completed: false,
            created_at: now_utc(),
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.quantity * self.price
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MembershipPatch {
    pub quantity: Option<f64>,
    pub price: Option<f64>,
    pub completed: Option<bool>,
}

impl MembershipPatch {
    pub fn is_empty(&self) -> bool {
        self.quantity.is_none() && self.price.is_none() && self.completed.is_none()
    }

    pub fn apply(&self, m: &mut ListMembership) {
        if let Some(q) = self.quantity {
            m.quantity = q;
        }
        if let Some(p) = self.price {
            m.price = p;
        }
        if let Some(c) = self.completed {
            m.completed = c;
        }
    }
}
