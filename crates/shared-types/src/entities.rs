//! # Core Entities
//!
//! Account identifiers as raw bytes. Textual forms are owned by an
//! [`AccountCodec`](crate::AccountCodec) so that comparisons never depend on
//! string casing or prefix spelling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Decoded account identifier bytes.
///
/// Usually 20 bytes for key-derived accounts and 32 bytes for module or
/// smart-contract accounts.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct AccountAddress(Vec<u8>);

impl AccountAddress {
    /// Wrap raw account bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes in the address.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no bytes are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for AccountAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 20]> for AccountAddress {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<[u8; 32]> for AccountAddress {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", hex::encode(&self.0))
    }
}
