// Shadow Timestamp Codec
// The directory stores expiration as whole days since the Unix epoch
// (shadowExpire). Every query predicate is built in shadow units, never in
// raw seconds, so comparisons can never disagree by a fractional day.

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Seconds per day in the shadow encoding
pub const POSIX_DAY: i64 = 86_400;

/// Day count since the Unix epoch, as stored by the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShadowTimestamp(i64);

/// Seconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AbsoluteInstant(i64);

impl ShadowTimestamp {
    /// Parse the directory's string representation.
    ///
    /// # Errors
    /// - `DomainError::InvalidShadowValue` on non-integer or negative input
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let days: i64 = raw
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidShadowValue(raw.to_string()))?;
        if days < 0 {
            return Err(DomainError::InvalidShadowValue(raw.to_string()));
        }
        Ok(Self(days))
    }

    pub fn days(&self) -> i64 {
        self.0
    }

    /// Expand to an absolute instant (start of the shadow day)
    pub fn instant(&self) -> AbsoluteInstant {
        AbsoluteInstant(self.0 * POSIX_DAY)
    }
}

impl AbsoluteInstant {
    pub fn seconds(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ShadowTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for AbsoluteInstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Convert an absolute time plus a day offset into shadow units.
///
/// `offset_days` may be negative (past), zero (today), or positive (future).
/// Euclidean division keeps pre-epoch instants in the correct day bucket.
pub fn to_shadow(now_seconds: i64, offset_days: i64) -> ShadowTimestamp {
    ShadowTimestamp((now_seconds + offset_days * POSIX_DAY).div_euclid(POSIX_DAY))
}
