// Directory Filter Construction
// Structured constructors replace raw string concatenation: user-supplied
// identifiers are escaped per RFC 4515 before they reach the filter text.

use super::account::{ATTR_SHADOW_EXPIRE, ATTR_UID};
use super::error::DomainError;
use super::shadow::to_shadow;

/// A rendered directory search filter.
///
/// Only the constructors below can produce one, so any value reaching the
/// gateway is well-formed and injection-safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpression(String);

impl FilterExpression {
    /// Filter matching accounts whose expiration equals "today + offset_days"
    pub fn exact_day(now_seconds: i64, offset_days: i64) -> Self {
        let shadow = to_shadow(now_seconds, offset_days);
        Self(format!("({}={})", ATTR_SHADOW_EXPIRE, shadow))
    }

    /// Filter matching accounts whose expiration falls within the inclusive
    /// shadow bounds derived from the two offsets.
    ///
    /// # Errors
    /// - `DomainError::InvalidRange` when `begin_offset_days >= end_offset_days`
    pub fn day_range(
        now_seconds: i64,
        begin_offset_days: i64,
        end_offset_days: i64,
    ) -> Result<Self, DomainError> {
        if begin_offset_days >= end_offset_days {
            return Err(DomainError::InvalidRange {
                begin: begin_offset_days,
                end: end_offset_days,
            });
        }

        let lo = to_shadow(now_seconds, begin_offset_days);
        let hi = to_shadow(now_seconds, end_offset_days);
        Ok(Self(format!(
            "(&({attr}>={lo})({attr}<={hi}))",
            attr = ATTR_SHADOW_EXPIRE,
        )))
    }

    /// Filter matching the account whose `uid` equals `account_id`.
    ///
    /// # Errors
    /// - `DomainError::InvalidIdentifier` on empty input or ASCII control
    ///   characters; filter metacharacters are escaped, not rejected
    pub fn identity(account_id: &str) -> Result<Self, DomainError> {
        if account_id.is_empty() {
            return Err(DomainError::InvalidIdentifier(
                "identifier is empty".to_string(),
            ));
        }
        if account_id.chars().any(|c| c.is_ascii_control()) {
            return Err(DomainError::InvalidIdentifier(format!(
                "identifier {:?} contains control characters",
                account_id
            )));
        }

        Ok(Self(format!(
            "({}={})",
            ATTR_UID,
            escape_filter_value(account_id)
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Escape RFC 4515 filter metacharacters in an attribute value
fn escape_filter_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\5c"),
            '*' => escaped.push_str("\\2a"),
            '(' => escaped.push_str("\\28"),
            ')' => escaped.push_str("\\29"),
            '\0' => escaped.push_str("\\00"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shadow::POSIX_DAY;

    const NOW: i64 = 1_709_251_800;

    #[test]
    fn test_exact_day_filter() {
        let shadow = to_shadow(NOW, 30);
        let filter = FilterExpression::exact_day(NOW, 30);

        assert_eq!(filter.as_str(), format!("(shadowExpire={})", shadow));
    }

    #[test]
    fn test_range_filter_is_bound_inclusive() {
        let filter = FilterExpression::day_range(NOW, 0, 10).unwrap();
        let lo = to_shadow(NOW, 0);
        let hi = to_shadow(NOW, 10);

        assert_eq!(
            filter.as_str(),
            format!("(&(shadowExpire>={})(shadowExpire<={}))", lo, hi)
        );
        // >= / <= bounds: an account expiring exactly on either offset matches
        assert!(filter.as_str().contains(&format!(">={}", lo)));
        assert!(filter.as_str().contains(&format!("<={}", hi)));
    }

    #[test]
    fn test_range_filter_rejects_inverted_bounds() {
        assert!(matches!(
            FilterExpression::day_range(NOW, 10, 0),
            Err(DomainError::InvalidRange { begin: 10, end: 0 })
        ));
        assert!(matches!(
            FilterExpression::day_range(NOW, 5, 5),
            Err(DomainError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_range_filter_spans_midnight_consistently() {
        let midnight = (NOW / POSIX_DAY) * POSIX_DAY;
        assert_eq!(
            FilterExpression::day_range(midnight, 0, 10).unwrap(),
            FilterExpression::day_range(midnight + POSIX_DAY - 1, 0, 10).unwrap()
        );
    }

    #[test]
    fn test_identity_filter() {
        let filter = FilterExpression::identity("kami").unwrap();
        assert_eq!(filter.as_str(), "(uid=kami)");
    }

    #[test]
    fn test_identity_filter_escapes_metacharacters() {
        let filter = FilterExpression::identity("a*(b)\\c").unwrap();
        assert_eq!(filter.as_str(), "(uid=a\\2a\\28b\\29\\5cc)");
    }

    #[test]
    fn test_identity_filter_rejects_empty() {
        assert!(matches!(
            FilterExpression::identity(""),
            Err(DomainError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_identity_filter_rejects_control_characters() {
        assert!(FilterExpression::identity("ka\nmi").is_err());
        assert!(FilterExpression::identity("ka\x07mi").is_err());
    }
}
