use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key of the "all customers" query.
pub const CUSTOMERS_KEY: &str = "customers";

/// Key of the signed-in user query.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Identifier of a logical read. Maps 1:1 to a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryKey(Cow<'static, str>);

impl QueryKey {
    /// Creates a key from a static name without allocating.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Creates a key from a dynamic name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// The "all customers" key.
    pub const fn customers() -> Self {
        Self::from_static(CUSTOMERS_KEY)
    }

    /// The signed-in user key.
    pub const fn current_user() -> Self {
        Self::from_static(CURRENT_USER_KEY)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for QueryKey {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for QueryKey {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customers_key() {
        assert_eq!(QueryKey::customers().as_str(), "customers");
        assert_eq!(QueryKey::customers().to_string(), "customers");
    }

    #[test]
    fn test_static_and_owned_keys_are_equal() {
        assert_eq!(QueryKey::from("customers"), QueryKey::new("customers"));
        assert_ne!(QueryKey::customers(), QueryKey::current_user());
    }

    #[test]
    fn test_key_serializes_as_plain_string() {
        let json = serde_json::to_string(&QueryKey::customers()).unwrap();
        assert_eq!(json, "\"customers\"");
    }
}
