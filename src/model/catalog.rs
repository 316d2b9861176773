use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::ids::{ItemId, UserId};

pub const DEFAULT_CATEGORY: &str = "Geral";

/// Unit of measure of a catalog item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Unidade,
    Kg,
    Litro,
}

impl Unit {
    pub const ALL: [Unit; 3] = [Unit::Unidade, Unit::Kg, Unit::Litro];

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Unidade => "unidade",
            Unit::Kg => "kg",
            Unit::Litro => "litro",
        }
    }

    pub fn parse(s: &str) -> Option<Unit> {
        Unit::ALL
            .into_iter()
            .find(|u| u.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reusable product definition, independent of any list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub unit: Unit,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserId>,
}

impl CatalogItem {
    pub fn new(name: &str, category: &str, unit: Unit, owner: Option<UserId>) -> Self {
        Self {
            id: ItemId::generate(),
            name: name.to_string(),
            category: category.to_string(),
            unit,
            created_at: now_utc(),
            owner,
        }
    }
}

/// Partial update of a catalog item; `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<Unit>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.unit.is_none()
    }

    pub fn apply(&self, item: &mut CatalogItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(category) = &self.category {
            item.category = category.clone();
        }
        if let Some(unit) = self.unit {
            item.unit = unit;
        }
    }
}

/// Current time truncated to milliseconds, the precision stored by the backend.
pub fn now_utc() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(now.millisecond() as u32 * 1_000_000)
        .unwrap_or(now)
}
