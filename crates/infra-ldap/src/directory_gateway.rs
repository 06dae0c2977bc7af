// LDAP Directory Gateway
// One connection per search: connect, bind, search subtree, unbind. Session
// objects are not reentrant, so nothing is shared across calls.

use async_trait::async_trait;
use ldap3::{drive, LdapConnAsync, Scope, SearchEntry};
use tracing::debug;

use memberwatch_core::domain::FilterExpression;
use memberwatch_core::error::{AppError, Result};
use memberwatch_core::port::{DirectoryGateway, RawEntry};

/// Directory connection settings
#[derive(Debug, Clone)]
pub struct LdapConfig {
    /// Directory URI, e.g. `ldap://localhost:389`
    pub uri: String,
    /// Search base for member entries,
    /// e.g. `cn=members,dc=example,dc=edu`
    pub base_dn: String,
    /// Bind DN; empty pair means anonymous simple bind
    pub bind_dn: Option<String>,
    pub bind_password: Option<String>,
}

/// DirectoryGateway implementation over the ldap3 async client
pub struct LdapDirectoryGateway {
    config: LdapConfig,
}

impl LdapDirectoryGateway {
    pub fn new(config: LdapConfig) -> Self {
        Self { config }
    }

    fn directory_err(context: &str, err: impl std::fmt::Display) -> AppError {
        AppError::Directory(format!("{}: {}", context, err))
    }
}

#[async_trait]
impl DirectoryGateway for LdapDirectoryGateway {
    async fn search(
        &self,
        filter: &FilterExpression,
        attributes: &[&str],
    ) -> Result<Vec<RawEntry>> {
        let (conn, mut ldap) = LdapConnAsync::new(&self.config.uri)
            .await
            .map_err(|e| Self::directory_err("connect failed", e))?;
        drive!(conn);

        let bind_dn = self.config.bind_dn.as_deref().unwrap_or("");
        let bind_password = self.config.bind_password.as_deref().unwrap_or("");
        ldap.simple_bind(bind_dn, bind_password)
            .await
            .map_err(|e| Self::directory_err("bind failed", e))?
            .success()
            .map_err(|e| Self::directory_err("bind rejected", e))?;

        debug!(filter = %filter, base = %self.config.base_dn, "directory search");

        let (results, _res) = ldap
            .search(
                &self.config.base_dn,
                Scope::Subtree,
                filter.as_str(),
                attributes.to_vec(),
            )
            .await
            .map_err(|e| Self::directory_err("search failed", e))?
            .success()
            .map_err(|e| Self::directory_err("search rejected", e))?;

        let entries = results
            .into_iter()
            .map(SearchEntry::construct)
            .map(|entry| RawEntry {
                dn: entry.dn,
                attrs: entry.attrs,
            })
            .collect();

        let _ = ldap.unbind().await;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_directory_surfaces_as_directory_error() {
        // nothing listens on this port
        let gateway = LdapDirectoryGateway::new(LdapConfig {
            uri: "ldap://127.0.0.1:1".to_string(),
            base_dn: "cn=members,dc=example,dc=edu".to_string(),
            bind_dn: None,
            bind_password: None,
        });

        let filter = FilterExpression::identity("kami").unwrap();
        let result = gateway.search(&filter, &["uid"]).await;

        assert!(matches!(result, Err(AppError::Directory(_))));
    }
}
