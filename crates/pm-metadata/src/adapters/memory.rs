//! In-memory implementations of the outbound ports.

use crate::domain::authz_cache::Authorization;
use crate::ports::outbound::{
    AccountInspector, AccountInspectorError, AuthorizationProvider, AuthzProviderError,
    MetadataStore, StoreError,
};
use parking_lot::RwLock;
use shared_types::AccountAddress;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Ordered in-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryMetadataStore {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl MetadataStore for MemoryMetadataStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.write().insert(key.to_vec(), value);
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn batch_delete(&self, keys: Vec<Vec<u8>>) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        for key in &keys {
            entries.remove(key);
        }
        Ok(())
    }

    fn iterate_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let entries = self.entries.read();
        Ok(entries
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

/// Grant table with a lookup counter.
#[derive(Debug, Default)]
pub struct MemoryAuthorizationProvider {
    grants: RwLock<Vec<Authorization>>,
    lookups: AtomicUsize,
}

impl MemoryAuthorizationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, authorization: Authorization) {
        self.grants.write().push(authorization);
    }

    pub fn revoke(&self, grantee: &AccountAddress, granter: &AccountAddress, msg_type_url: &str) {
        self.grants.write().retain(|a| {
            !(a.grantee == *grantee && a.granter == *granter && a.msg_type_url == msg_type_url)
        });
    }

    /// Number of `get_authorization` calls served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl AuthorizationProvider for MemoryAuthorizationProvider {
    fn get_authorization(
        &self,
        grantee: &AccountAddress,
        granter: &AccountAddress,
        msg_type_url: &str,
    ) -> Result<Option<Authorization>, AuthzProviderError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .grants
            .read()
            .iter()
            .find(|a| a.grantee == *grantee && a.granter == *granter && a.accepts(msg_type_url))
            .cloned())
    }
}

/// Set of accounts known to be smart contracts.
#[derive(Debug, Default)]
pub struct MemoryAccountInspector {
    contracts: RwLock<HashSet<AccountAddress>>,
}

impl MemoryAccountInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_contract(&self, account: AccountAddress) {
        self.contracts.write().insert(account);
    }
}

impl AccountInspector for MemoryAccountInspector {
    fn is_smart_contract(&self, account: &AccountAddress) -> Result<bool, AccountInspectorError> {
        Ok(self.contracts.read().contains(account))
    }
}
