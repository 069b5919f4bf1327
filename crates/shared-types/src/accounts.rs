//! # Account Codec
//!
//! Decodes and encodes the account identifier strings carried in party and
//! signer fields.
//!
//! The metadata core never parses account strings itself; it goes through an
//! [`AccountCodec`] so that the chain's address scheme stays a collaborator.
//! [`Bech32AccountCodec`] is the standard implementation.

use crate::entities::AccountAddress;
use crate::errors::AccountError;
use bech32::{FromBase32, ToBase32, Variant};

/// Largest decoded account payload accepted by [`Bech32AccountCodec`].
pub const MAX_ACCOUNT_ADDRESS_LENGTH: usize = 255;

/// Account-address codec collaborator.
///
/// Implementations must be pure and thread-safe (`Send + Sync`).
pub trait AccountCodec: Send + Sync {
    /// Decode and validate an account identifier string.
    fn decode(&self, address: &str) -> Result<AccountAddress, AccountError>;

    /// Render raw account bytes in their textual form.
    fn encode(&self, account: &AccountAddress) -> Result<String, AccountError>;

    /// True when `address` decodes cleanly.
    fn is_valid(&self, address: &str) -> bool {
        self.decode(address).is_ok()
    }
}

/// Bech32 account codec bound to a single human-readable prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bech32AccountCodec {
    hrp: String,
}

impl Bech32AccountCodec {
    /// Create a codec for the given prefix (e.g. `"pb"`).
    pub fn new(hrp: impl Into<String>) -> Self {
        Self { hrp: hrp.into() }
    }

    /// The human-readable prefix this codec accepts.
    pub fn hrp(&self) -> &str {
        &self.hrp
    }
}

impl AccountCodec for Bech32AccountCodec {
    fn decode(&self, address: &str) -> Result<AccountAddress, AccountError> {
        if address.trim().is_empty() {
            return Err(AccountError::Empty);
        }

        let (hrp, data, variant) =
            bech32::decode(address).map_err(|e| AccountError::Bech32(e.to_string()))?;
        if variant != Variant::Bech32 {
            return Err(AccountError::Bech32(
                "bech32m checksums are not accepted".to_string(),
            ));
        }
        if hrp != self.hrp {
            return Err(AccountError::WrongPrefix {
                expected: self.hrp.clone(),
                actual: hrp,
            });
        }

        let bytes =
            Vec::<u8>::from_base32(&data).map_err(|e| AccountError::Bech32(e.to_string()))?;
        if bytes.is_empty() || bytes.len() > MAX_ACCOUNT_ADDRESS_LENGTH {
            return Err(AccountError::InvalidLength {
                actual: bytes.len(),
                max: MAX_ACCOUNT_ADDRESS_LENGTH,
            });
        }

        Ok(AccountAddress::from_bytes(bytes))
    }

    fn encode(&self, account: &AccountAddress) -> Result<String, AccountError> {
        if account.is_empty() || account.len() > MAX_ACCOUNT_ADDRESS_LENGTH {
            return Err(AccountError::InvalidLength {
                actual: account.len(),
                max: MAX_ACCOUNT_ADDRESS_LENGTH,
            });
        }
        bech32::encode(&self.hrp, account.as_bytes().to_base32(), Variant::Bech32)
            .map_err(|e| AccountError::Bech32(e.to_string()))
    }
}
