// Directory Gateway Port (Interface)
// Abstraction over the external directory service (LDAP)

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::FilterExpression;
use crate::error::Result;

/// Raw directory entry as returned by a search: distinguished name plus the
/// projected attributes. Attribute values keep their full multi-valued form;
/// interpretation decides what to do with extra values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub dn: String,
    pub attrs: HashMap<String, Vec<String>>,
}

impl RawEntry {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attrs: HashMap::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, values: &[&str]) -> Self {
        self.attrs.insert(
            name.to_string(),
            values.iter().map(|v| v.to_string()).collect(),
        );
        self
    }
}

/// Directory gateway trait
///
/// The adapter owns connection setup, protocol negotiation, and bind; a
/// connection or bind failure surfaces as `AppError::Directory` and must be
/// propagated by callers, never swallowed.
#[async_trait]
pub trait DirectoryGateway: Send + Sync {
    /// Execute a filter + attribute-projection search over the member base.
    ///
    /// # Errors
    /// - `AppError::Directory` on connection, bind, or search failure
    async fn search(
        &self,
        filter: &FilterExpression,
        attributes: &[&str],
    ) -> Result<Vec<RawEntry>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Mock gateway behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Return the same entries for every search
        Entries(Vec<RawEntry>),
        /// Map rendered filter text to entries; unknown filters match nothing
        PerFilter(HashMap<String, Vec<RawEntry>>),
        /// Always fail with a directory error
        Fail(String),
    }

    /// Mock Directory Gateway for testing
    pub struct MockDirectoryGateway {
        behavior: MockBehavior,
        searches: Mutex<Vec<String>>,
    }

    impl MockDirectoryGateway {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                searches: Mutex::new(Vec::new()),
            }
        }

        pub fn new_empty() -> Self {
            Self::new(MockBehavior::Entries(Vec::new()))
        }

        pub fn new_entries(entries: Vec<RawEntry>) -> Self {
            Self::new(MockBehavior::Entries(entries))
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(message.into()))
        }

        /// Filters seen so far, in call order
        pub fn searches(&self) -> Vec<String> {
            self.searches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DirectoryGateway for MockDirectoryGateway {
        async fn search(
            &self,
            filter: &FilterExpression,
            _attributes: &[&str],
        ) -> Result<Vec<RawEntry>> {
            self.searches.lock().unwrap().push(filter.to_string());

            match &self.behavior {
                MockBehavior::Entries(entries) => Ok(entries.clone()),
                MockBehavior::PerFilter(map) => {
                    Ok(map.get(filter.as_str()).cloned().unwrap_or_default())
                }
                MockBehavior::Fail(msg) => Err(crate::error::AppError::Directory(msg.clone())),
            }
        }
    }
}
