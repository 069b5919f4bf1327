//! # Authorization Cache
//!
//! Request-scoped memo of delegation lookups and smart-contract checks.
//!
//! One instance belongs to exactly one in-flight request. A holder that is
//! reused across logically distinct requests calls [`AuthzCache::clear`]
//! instead of building a new cache.

use serde::{Deserialize, Serialize};
use shared_types::AccountAddress;
use std::collections::HashMap;

/// A delegation letting `grantee` act for `granter` on one message type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Authorization {
    pub grantee: AccountAddress,
    pub granter: AccountAddress,
    pub msg_type_url: String,
}

impl Authorization {
    pub fn new(
        grantee: AccountAddress,
        granter: AccountAddress,
        msg_type_url: impl Into<String>,
    ) -> Self {
        Self {
            grantee,
            granter,
            msg_type_url: msg_type_url.into(),
        }
    }

    /// True if this grant covers `msg_type_url`.
    pub fn accepts(&self, msg_type_url: &str) -> bool {
        self.msg_type_url == msg_type_url
    }
}

/// Memoized outcome of one provider lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthzDecision {
    Accepted(Authorization),
    /// The provider reported no matching grant.
    Rejected,
}

impl AuthzDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AuthzDecision::Accepted(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AuthzKey {
    grantee: AccountAddress,
    granter: AccountAddress,
    msg_type_url: String,
}

/// Cache of `(grantee, granter, msg type) -> decision` and `account -> is contract`.
#[derive(Debug, Clone, Default)]
pub struct AuthzCache {
    acceptable: HashMap<AuthzKey, AuthzDecision>,
    is_wasm: HashMap<AccountAddress, bool>,
}

impl AuthzCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty both maps in place.
    pub fn clear(&mut self) {
        self.acceptable.clear();
        self.is_wasm.clear();
    }

    /// Cached decision for the triple, if one was recorded.
    pub fn get_acceptable(
        &self,
        grantee: &AccountAddress,
        granter: &AccountAddress,
        msg_type_url: &str,
    ) -> Option<&AuthzDecision> {
        self.acceptable
            .get(&Self::key(grantee, granter, msg_type_url))
    }

    pub fn set_acceptable(
        &mut self,
        grantee: &AccountAddress,
        granter: &AccountAddress,
        msg_type_url: &str,
        decision: AuthzDecision,
    ) {
        self.acceptable
            .insert(Self::key(grantee, granter, msg_type_url), decision);
    }

    /// Recorded contract flag; `false` when never checked.
    pub fn get_is_wasm(&self, account: &AccountAddress) -> bool {
        self.is_wasm.get(account).copied().unwrap_or(false)
    }

    pub fn set_is_wasm(&mut self, account: &AccountAddress, is_wasm: bool) {
        self.is_wasm.insert(account.clone(), is_wasm);
    }

    /// Distinguishes "recorded false" from "never checked".
    pub fn has_is_wasm(&self, account: &AccountAddress) -> bool {
        self.is_wasm.contains_key(account)
    }

    /// Number of memoized authorization decisions.
    pub fn acceptable_len(&self) -> usize {
        self.acceptable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acceptable.is_empty() && self.is_wasm.is_empty()
    }

    fn key(grantee: &AccountAddress, granter: &AccountAddress, msg_type_url: &str) -> AuthzKey {
        AuthzKey {
            grantee: grantee.clone(),
            granter: granter.clone(),
            msg_type_url: msg_type_url.to_string(),
        }
    }
}
