use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical service name drawn from the configured allow-list
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ServiceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ServiceId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ServiceId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_id_orders_alphabetically() {
        let mut ids = vec![ServiceId::from("svc-b"), ServiceId::from("svc-a")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "svc-a");
    }

    #[test]
    fn test_service_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&ServiceId::from("api-service-1")).unwrap();
        assert_eq!(json, "\"api-service-1\"");
    }
}
