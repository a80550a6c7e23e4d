//! Fields shared by every entity

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Active flag, sent by the server as the strings `"1"` and `"0"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "1")]
    Active,
    #[serde(rename = "0")]
    Inactive,
}

impl Default for Status {
    fn default() -> Self {
        Self::Active
    }
}

impl Status {
    pub fn is_active(&self) -> bool {
        matches!(self, Status::Active)
    }

    /// Wire value, for use as a filter query
    pub fn code(&self) -> &'static str {
        match self {
            Status::Active => "1",
            Status::Inactive => "0",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Active => f.write_str("active"),
            Status::Inactive => f.write_str("inactive"),
        }
    }
}

/// Audit trail; the `updated*` pair stays null until the first update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub updated_time: Option<DateTime<Utc>>,
}

impl Audit {
    pub fn was_updated(&self) -> bool {
        self.updated_time.is_some()
    }

    /// Most recent change, if we know of one
    pub fn last_changed(&self) -> Option<DateTime<Utc>> {
        self.updated_time.or(self.created_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_is_string_flag() {
        assert_eq!(serde_json::to_value(Status::Active).unwrap(), json!("1"));
        assert_eq!(serde_json::to_value(Status::Inactive).unwrap(), json!("0"));
        assert_eq!(serde_json::from_value::<Status>(json!("0")).unwrap(), Status::Inactive);
        // booleans are not accepted
        assert!(serde_json::from_value::<Status>(json!(true)).is_err());
    }

    #[test]
    fn test_audit_nullable_until_update() {
        let audit: Audit = serde_json::from_value(json!({
            "createdBy": "admin",
            "createdTime": "2026-01-05T08:00:00Z",
            "updatedBy": null,
            "updatedTime": null
        }))
        .unwrap();

        assert!(!audit.was_updated());
        assert_eq!(audit.created_by.as_deref(), Some("admin"));
        assert_eq!(audit.last_changed(), audit.created_time);
    }
}
