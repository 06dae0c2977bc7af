// Expiry Use Cases
// Facade binding filter construction, the directory gateway, and result
// interpretation. Every answer is computed fresh from a directory snapshot.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::application::interpret;
use crate::domain::{
    AbsoluteInstant, AccountRecord, AccountStatus, ExpirationQuery, FilterExpression,
    ATTR_MAIL, ATTR_SHADOW_EXPIRE, STANDARD_ATTRS,
};
use crate::error::{AppError, Result};
use crate::port::{DirectoryGateway, TimeProvider};

/// Day offsets checked by the notification batch
pub const KEY_DATES: [i64; 6] = [30, 15, 10, 5, 2, 1];

/// Accounts matched by one key-date query
#[derive(Debug, Serialize)]
pub struct DateMatches {
    pub offset_days: i64,
    pub accounts: Vec<AccountRecord>,
}

/// A key-date query that failed; the rest of the batch is unaffected
#[derive(Debug)]
pub struct DateFailure {
    pub offset_days: i64,
    pub error: AppError,
}

/// Aggregate of the key-date batch. Dates matching no accounts are omitted
/// from `matches` rather than represented as empty placeholders.
#[derive(Debug, Default)]
pub struct ExpiryReport {
    pub matches: Vec<DateMatches>,
    pub failures: Vec<DateFailure>,
}

impl ExpiryReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Expiry query service
pub struct ExpiryService {
    directory: Arc<dyn DirectoryGateway>,
    time: Arc<dyn TimeProvider>,
}

impl ExpiryService {
    pub fn new(directory: Arc<dyn DirectoryGateway>, time: Arc<dyn TimeProvider>) -> Self {
        Self { directory, time }
    }

    /// Accounts matching a time predicate, with the standard projection.
    ///
    /// # Errors
    /// - `DomainError::InvalidRange` for an inverted range predicate
    /// - `AppError::Directory` on search failure
    pub async fn find_expiring(&self, query: ExpirationQuery) -> Result<Vec<AccountRecord>> {
        let now = self.time.now_seconds();
        let filter = match query {
            ExpirationQuery::OnDay { offset_days } => {
                FilterExpression::exact_day(now, offset_days)
            }
            ExpirationQuery::InRange {
                begin_offset_days,
                end_offset_days,
            } => FilterExpression::day_range(now, begin_offset_days, end_offset_days)?,
        };

        let entries = self.directory.search(&filter, &STANDARD_ATTRS).await?;
        let records = interpret::expiration_list(&entries)?;

        info!(filter = %filter, matches = records.len(), "expiry query completed");
        Ok(records)
    }

    /// Accounts expiring exactly "today + offset_days"
    pub async fn accounts_expiring_on(&self, offset_days: i64) -> Result<Vec<AccountRecord>> {
        self.find_expiring(ExpirationQuery::OnDay { offset_days })
            .await
    }

    /// Accounts expiring within the inclusive day-offset range
    pub async fn accounts_expiring_in_range(
        &self,
        begin_offset_days: i64,
        end_offset_days: i64,
    ) -> Result<Vec<AccountRecord>> {
        self.find_expiring(ExpirationQuery::InRange {
            begin_offset_days,
            end_offset_days,
        })
        .await
    }

    /// Expiration status of a single account
    pub async fn account_status(&self, account_id: &str) -> Result<AccountStatus> {
        let filter = FilterExpression::identity(account_id)?;
        let entries = self.directory.search(&filter, &[ATTR_SHADOW_EXPIRE]).await?;
        Ok(interpret::status(&entries, self.time.now_seconds())?)
    }

    /// Contact address of a single account; `None` when the account does not
    /// exist or has no address on record
    pub async fn contact_address(&self, account_id: &str) -> Result<Option<String>> {
        let filter = FilterExpression::identity(account_id)?;
        let entries = self.directory.search(&filter, &[ATTR_MAIL]).await?;
        Ok(interpret::contact(&entries)?)
    }

    /// Expiration instant of a single account
    pub async fn expiration_instant(&self, account_id: &str) -> Result<AbsoluteInstant> {
        let filter = FilterExpression::identity(account_id)?;
        let entries = self.directory.search(&filter, &[ATTR_SHADOW_EXPIRE]).await?;
        Ok(interpret::expiration_instant(&entries, account_id)?)
    }

    /// Run one exact-day query per offset and aggregate the results.
    ///
    /// Each date query is independent: a failure is recorded per-date and
    /// the remaining dates still run. Dates matching nothing are omitted.
    pub async fn key_date_report(&self, offsets: &[i64]) -> ExpiryReport {
        let mut report = ExpiryReport::default();

        for &offset_days in offsets {
            match self.accounts_expiring_on(offset_days).await {
                Ok(accounts) if accounts.is_empty() => {}
                Ok(accounts) => report.matches.push(DateMatches {
                    offset_days,
                    accounts,
                }),
                Err(error) => {
                    warn!(offset_days, error = %error, "key date query failed");
                    report.failures.push(DateFailure { offset_days, error });
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::to_shadow;
    use crate::port::directory_gateway::mocks::{MockBehavior, MockDirectoryGateway};
    use crate::port::time_provider::FixedTimeProvider;
    use crate::port::RawEntry;
    use std::collections::HashMap;

    const NOW: i64 = 1_709_251_800;

    fn service(gateway: MockDirectoryGateway) -> ExpiryService {
        ExpiryService::new(Arc::new(gateway), Arc::new(FixedTimeProvider(NOW)))
    }

    fn member(uid: &str, shadow: Option<String>) -> RawEntry {
        let mut entry = RawEntry::new(format!("uid={},cn=members,dc=example,dc=edu", uid))
            .with_attr("uid", &[uid])
            .with_attr("mail", &[&format!("{}@example.edu", uid)]);
        if let Some(shadow) = shadow {
            entry = entry.with_attr("shadowExpire", &[&shadow]);
        }
        entry
    }

    fn exact_day_filter(offset_days: i64) -> String {
        format!("(shadowExpire={})", to_shadow(NOW, offset_days))
    }

    #[tokio::test]
    async fn test_accounts_expiring_on_projects_standard_attrs() {
        let shadow = to_shadow(NOW, 5).to_string();
        let gateway = MockDirectoryGateway::new_entries(vec![member("kami", Some(shadow))]);
        let svc = service(gateway);

        let records = svc.accounts_expiring_on(5).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].uid.as_deref(), Some("kami"));
        assert_eq!(records[0].mail.as_deref(), Some("kami@example.edu"));
    }

    #[tokio::test]
    async fn test_range_query_rejects_inverted_bounds_before_searching() {
        let gateway = MockDirectoryGateway::new_empty();
        let svc = service(gateway);

        let result = svc.accounts_expiring_in_range(10, 0).await;
        assert!(matches!(
            result,
            Err(AppError::Domain(
                crate::domain::DomainError::InvalidRange { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_key_date_report_omits_empty_dates() {
        let mut responses = HashMap::new();
        responses.insert(
            exact_day_filter(15),
            vec![member("kami", Some(to_shadow(NOW, 15).to_string()))],
        );
        responses.insert(
            exact_day_filter(1),
            vec![member("flay", Some(to_shadow(NOW, 1).to_string()))],
        );
        let gateway = MockDirectoryGateway::new(MockBehavior::PerFilter(responses));
        let svc = service(gateway);

        let report = svc.key_date_report(&KEY_DATES).await;

        assert!(report.is_clean());
        let offsets: Vec<i64> = report.matches.iter().map(|m| m.offset_days).collect();
        assert_eq!(offsets, vec![15, 1]);
    }

    #[tokio::test]
    async fn test_key_date_report_collects_failures_without_aborting() {
        let gateway = MockDirectoryGateway::new_fail("connection refused");
        let svc = service(gateway);

        let report = svc.key_date_report(&KEY_DATES).await;

        assert!(!report.is_clean());
        assert_eq!(report.failures.len(), KEY_DATES.len());
        assert!(report.matches.is_empty());
        assert!(matches!(report.failures[0].error, AppError::Directory(_)));
    }

    #[tokio::test]
    async fn test_status_propagates_directory_errors() {
        let gateway = MockDirectoryGateway::new_fail("bind failed");
        let svc = service(gateway);

        assert!(matches!(
            svc.account_status("kami").await,
            Err(AppError::Directory(_))
        ));
    }

    #[tokio::test]
    async fn test_identity_query_rejects_bad_identifier_before_searching() {
        let gateway = Arc::new(MockDirectoryGateway::new_empty());
        let svc = ExpiryService::new(gateway.clone(), Arc::new(FixedTimeProvider(NOW)));

        assert!(svc.account_status("").await.is_err());
        assert!(gateway.searches().is_empty());

        assert_eq!(
            svc.account_status("kami").await.unwrap(),
            AccountStatus::NotFound
        );
        assert_eq!(gateway.searches(), vec!["(uid=kami)".to_string()]);
    }
}
