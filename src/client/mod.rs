mod http;
mod wire;

pub(crate) use http::HttpLedgerClient;
pub(crate) use wire::classify_status;

use crate::config::ApiConfig;
use crate::models::{LedgerEntry, NewEntry};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ClientError {
    /// The service rejected the credential (HTTP 403).
    #[error("Authentication failed: check your API key in settings")]
    Auth,
    #[error("Network error: {0}")]
    Network(String),
    /// Message reported by the service, shown verbatim.
    #[error("{0}")]
    Validation(String),
}

impl ClientError {
    pub(crate) fn is_auth(&self) -> bool {
        matches!(self, Self::Auth)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    pub(crate) fn is_write(&self) -> bool {
        !matches!(self, Self::List)
    }

    /// Message used when the service gives no detail.
    pub(crate) fn fallback_message(&self) -> &'static str {
        match self {
            Self::List => "Failed to load",
            Self::Create => "Failed to add",
            Self::Update => "Failed to update",
            Self::Delete => "Failed to delete",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The four remote ledger operations. Each call is a single attempt.
pub(crate) trait LedgerApi {
    fn list(&self, config: &ApiConfig) -> Result<Vec<LedgerEntry>, ClientError>;
    fn create(&self, config: &ApiConfig, entry: &NewEntry) -> Result<LedgerEntry, ClientError>;
    fn update(
        &self,
        config: &ApiConfig,
        id: i64,
        entry: &NewEntry,
    ) -> Result<LedgerEntry, ClientError>;
    fn delete(&self, config: &ApiConfig, id: i64) -> Result<(), ClientError>;
}
