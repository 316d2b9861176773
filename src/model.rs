mod catalog;
mod config;
mod ids;
mod list;

pub use self::catalog::{CatalogItem, DEFAULT_CATEGORY, ItemPatch, Unit, now_utc};
pub use self::config::{ClientConfig, ClientSession, DEFAULT_POLL_WAIT_MS, Identity, RemoteConfig};
pub use self::ids::{ItemId, ListId, MembershipId, UserId, new_uuid};
pub use self::list::{ListMembership, ListPatch, MembershipPatch, ShoppingList};

/// Formats a timestamp the way rows store it (RFC 3339). Years outside
/// 0..=9999 have no RFC 3339 form.
pub fn format_ts(ts: time::OffsetDateTime) -> Result<String, time::error::Format> {
    ts.format(&time::format_description::well_known::Rfc3339)
}

pub fn now_ts() -> Result<String, time::error::Format> {
    format_ts(now_utc())
}
