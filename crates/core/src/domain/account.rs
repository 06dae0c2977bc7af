// Account Domain Model

use serde::{Deserialize, Serialize};

use super::shadow::ShadowTimestamp;

/// Directory attribute holding the account identifier
pub const ATTR_UID: &str = "uid";
/// Directory attribute holding the day-granularity expiration
pub const ATTR_SHADOW_EXPIRE: &str = "shadowExpire";
/// Directory attribute holding the contact address
pub const ATTR_MAIL: &str = "mail";

/// Standard projection for listing queries
pub const STANDARD_ATTRS: [&str; 3] = [ATTR_UID, ATTR_SHADOW_EXPIRE, ATTR_MAIL];

/// Read-only snapshot of a directory account entry.
///
/// Identified by distinguished name; the directory owns the record and this
/// system never mutates it. An absent `expires_at` means no expiration set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub dn: String,
    pub uid: Option<String>,
    pub expires_at: Option<ShadowTimestamp>,
    pub mail: Option<String>,
}

/// Expiration status of a single account, computed fresh per call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Expired,
    NotExpired,
    NotFound,
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Expired => write!(f, "EXPIRED"),
            AccountStatus::NotExpired => write!(f, "NOT_EXPIRED"),
            AccountStatus::NotFound => write!(f, "NOT_FOUND"),
        }
    }
}

/// A time predicate over account expirations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpirationQuery {
    /// Accounts expiring exactly "today + offset days"
    OnDay { offset_days: i64 },
    /// Accounts expiring within the inclusive bounds derived from the two
    /// offsets; `begin_offset_days` must be strictly less than
    /// `end_offset_days`
    InRange {
        begin_offset_days: i64,
        end_offset_days: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(AccountStatus::Expired.to_string(), "EXPIRED");
        assert_eq!(AccountStatus::NotExpired.to_string(), "NOT_EXPIRED");
        assert_eq!(AccountStatus::NotFound.to_string(), "NOT_FOUND");
    }

    #[test]
    fn test_record_serialization() {
        let record = AccountRecord {
            dn: "uid=kami,cn=members,dc=example,dc=edu".to_string(),
            uid: Some("kami".to_string()),
            expires_at: None,
            mail: Some("kami@example.edu".to_string()),
        };

        let json = serde_json::to_string(&record).expect("serialize");
        let back: AccountRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(record, back);
    }
}
