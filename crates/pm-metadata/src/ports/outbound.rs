//! # Outbound Ports (Driven Ports / SPI)
//!
//! Collaborators the metadata core consumes. None of them is implemented by
//! the core; `adapters/` ships in-memory versions.

use crate::domain::authz_cache::Authorization;
use shared_types::AccountAddress;
use thiserror::Error;

/// Error from the key-value store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backend failed to read or write.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Error from the authorization provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthzProviderError {
    /// The provider could not be reached or failed internally.
    #[error("authorization provider unavailable: {0}")]
    Unavailable(String),

    /// The stored grant could not be interpreted.
    #[error("malformed authorization: {0}")]
    Malformed(String),
}

/// Error from the account inspector.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountInspectorError {
    #[error("account lookup failed: {0}")]
    Lookup(String),
}

/// Key-value persistence keyed by metadata address bytes.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait MetadataStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    fn set(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError>;

    fn delete(&self, key: &[u8]) -> Result<(), StoreError>;

    /// Delete every key in `keys` as one unit: either all are removed or, on
    /// error, none are.
    fn batch_delete(&self, keys: Vec<Vec<u8>>) -> Result<(), StoreError>;

    /// All `(key, value)` pairs whose key starts with `prefix`, in key order.
    fn iterate_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;
}

/// Answers "may `grantee` act as `granter` for this message type".
pub trait AuthorizationProvider: Send + Sync {
    /// `Ok(None)` means no grant exists.
    fn get_authorization(
        &self,
        grantee: &AccountAddress,
        granter: &AccountAddress,
        msg_type_url: &str,
    ) -> Result<Option<Authorization>, AuthzProviderError>;
}

/// Reports whether an account is a smart contract.
pub trait AccountInspector: Send + Sync {
    fn is_smart_contract(&self, account: &AccountAddress) -> Result<bool, AccountInspectorError>;
}
