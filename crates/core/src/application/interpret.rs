// Result Interpretation
// Maps raw directory entries into domain answers. Multi-valued scalar
// attributes (shadowExpire, mail) take the first value; RawEntry keeps the
// full list for callers that need more.

use crate::domain::error::{DomainError, Result};
use crate::domain::{
    to_shadow, AbsoluteInstant, AccountRecord, AccountStatus, ShadowTimestamp, ATTR_MAIL,
    ATTR_SHADOW_EXPIRE, ATTR_UID,
};
use crate::port::RawEntry;

/// First value of a scalar-valued attribute
fn first_value<'a>(entry: &'a RawEntry, attr: &str) -> Option<&'a str> {
    entry
        .attrs
        .get(attr)
        .and_then(|values| values.first())
        .map(String::as_str)
}

fn parse_expiration(entry: &RawEntry) -> Result<Option<ShadowTimestamp>> {
    first_value(entry, ATTR_SHADOW_EXPIRE)
        .map(ShadowTimestamp::parse)
        .transpose()
}

/// Map a listing query's entries into account records.
///
/// Entries missing the expiration attribute are kept with "no expiration
/// set", never dropped. An empty input maps to an empty vector.
///
/// # Errors
/// - `DomainError::InvalidShadowValue` on an unparseable expiration value
pub fn expiration_list(entries: &[RawEntry]) -> Result<Vec<AccountRecord>> {
    entries
        .iter()
        .map(|entry| {
            Ok(AccountRecord {
                dn: entry.dn.clone(),
                uid: first_value(entry, ATTR_UID).map(str::to_string),
                expires_at: parse_expiration(entry)?,
                mail: first_value(entry, ATTR_MAIL).map(str::to_string),
            })
        })
        .collect()
}

/// Decide the expiration status from an identity query's entries.
///
/// Zero entries is `NotFound`; a single entry without the expiration
/// attribute never expires. Otherwise the shadow value is compared against
/// today's shadow bucket: strictly less is `Expired`.
///
/// # Errors
/// - `DomainError::AmbiguousResult` when more than one entry matched
/// - `DomainError::InvalidShadowValue` on an unparseable expiration value
pub fn status(entries: &[RawEntry], now_seconds: i64) -> Result<AccountStatus> {
    let entry = match single_entry(entries)? {
        Some(entry) => entry,
        None => return Ok(AccountStatus::NotFound),
    };

    match parse_expiration(entry)? {
        None => Ok(AccountStatus::NotExpired),
        Some(shadow) if shadow < to_shadow(now_seconds, 0) => Ok(AccountStatus::Expired),
        Some(_) => Ok(AccountStatus::NotExpired),
    }
}

/// Extract the contact address from an identity query's entries.
///
/// `None` covers both "no such account" and "account has no address";
/// callers that need to distinguish check existence first.
///
/// # Errors
/// - `DomainError::AmbiguousResult` when more than one entry matched
pub fn contact(entries: &[RawEntry]) -> Result<Option<String>> {
    Ok(single_entry(entries)?
        .and_then(|entry| first_value(entry, ATTR_MAIL))
        .map(str::to_string))
}

/// Extract the expiration instant from an identity query's entries.
///
/// # Errors
/// - `DomainError::NotFound` when no entry matched
/// - `DomainError::AmbiguousResult` when more than one entry matched
/// - `DomainError::NoExpirationSet` when the entry lacks the attribute
/// - `DomainError::InvalidShadowValue` on an unparseable expiration value
pub fn expiration_instant(entries: &[RawEntry], account_id: &str) -> Result<AbsoluteInstant> {
    let entry = single_entry(entries)?
        .ok_or_else(|| DomainError::NotFound(account_id.to_string()))?;

    match parse_expiration(entry)? {
        Some(shadow) => Ok(shadow.instant()),
        None => Err(DomainError::NoExpirationSet(account_id.to_string())),
    }
}

/// An identity filter matches at most one account; more is a directory
/// data-integrity violation.
fn single_entry(entries: &[RawEntry]) -> Result<Option<&RawEntry>> {
    match entries {
        [] => Ok(None),
        [entry] => Ok(Some(entry)),
        _ => Err(DomainError::AmbiguousResult(entries.len())),
    }
}
