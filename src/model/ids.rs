use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generates a fresh client-side identifier.
            pub fn generate() -> Self {
                Self(new_uuid())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

record_id!(
    /// Identifier of a catalog item.
    ItemId
);
record_id!(
    /// Identifier of a shopping list.
    ListId
);
record_id!(
    /// Identifier of a list membership row.
    MembershipId
);
record_id!(
    /// Identifier of an authenticated user (the owner reference on created rows).
    UserId
);

/// Random (v4) UUID rendered in the usual hyphenated lowercase form.
pub fn new_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
#[path = "../tests/model/ids_tests.rs"]
mod tests;
