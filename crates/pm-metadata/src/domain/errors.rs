//! # Metadata Errors
//!
//! Two layers:
//! - [`AddressError`]: faults raised by the address codec itself.
//! - [`MetadataError`]: the taxonomy surfaced to callers. The whole enclosing
//!   request is rejected on the first one encountered.

use super::address::AddressType;
use thiserror::Error;

/// Errors raised while encoding, decoding or inspecting a metadata address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    /// Zero-length address where a value was required.
    #[error("address is empty")]
    Empty,

    /// Blank text given to a text decoder.
    #[error("empty address string is not allowed")]
    EmptyString,

    /// Byte 0 is not one of the six known type tags.
    #[error("invalid metadata address type: {0}")]
    UnknownType(u8),

    /// Length does not match the exact length required by the tag.
    #[error("incorrect {address_type} address length (expected: {expected}, actual: {actual})")]
    InvalidLength {
        address_type: AddressType,
        expected: usize,
        actual: usize,
    },

    /// A UUID region could not be read as a UUID.
    #[error("invalid address bytes of uuid, expected uuid compliant: {0}")]
    InvalidUuid(String),

    /// Bech32 prefix disagrees with the decoded type tag.
    #[error("invalid metadata address type (must be {expected}, got {actual})")]
    PrefixMismatch {
        expected: &'static str,
        actual: String,
    },

    /// Text is not valid bech32.
    #[error("invalid bech32 metadata address: {0}")]
    Bech32(String),

    /// Text is not valid hex.
    #[error("invalid hex metadata address: {0}")]
    Hex(String),

    /// Accessor or conversion called on a type that does not carry the component.
    #[error("this metadata address ({address}) does not contain a {component}")]
    NotApplicable {
        address: String,
        component: &'static str,
    },

    /// Components supplied to the encoder do not fit the requested type.
    #[error("invalid components for {address_type} address")]
    InvalidComponents { address_type: AddressType },
}

/// Errors surfaced by validation, signer resolution and the metadata service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetadataError {
    /// An address-typed field has bad length, tag or UUID bytes.
    #[error("invalid {field}: {source}")]
    MalformedAddress { field: String, source: AddressError },

    /// An address decoded fine but is of the wrong type for its field or prefix.
    #[error("invalid {field} type (expected: {expected}, got: {actual})")]
    PrefixMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    /// Undecodable party address or unspecified role.
    #[error("invalid party: {0}")]
    InvalidParty(String),

    /// A role or entry listed twice, or a disallowed self-reference.
    #[error("duplicate party: {0}")]
    DuplicateParty(String),

    /// No signer or delegation satisfies a required party.
    #[error("unauthorized signer: {0}")]
    UnauthorizedSigner(String),

    /// The authorization collaborator failed; resolution is aborted.
    #[error("authorization lookup failed: {0}")]
    AuthorizationLookupFailure(String),

    /// A non-address field rule was violated.
    #[error("invalid {entity}: {reason}")]
    InvalidField { entity: &'static str, reason: String },

    /// A referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The key-value collaborator failed.
    #[error("storage failure: {0}")]
    Storage(String),

    /// A stored value could not be encoded or decoded.
    #[error("codec failure: {0}")]
    Codec(String),

    /// Configuration values are out of bounds.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MetadataError {
    /// Wrap an address fault with the name of the field it came from.
    pub fn address(field: impl Into<String>, err: AddressError) -> Self {
        let field = field.into();
        match err {
            AddressError::PrefixMismatch { expected, actual } => Self::PrefixMismatch {
                field,
                expected: expected.to_string(),
                actual,
            },
            source => Self::MalformedAddress { field, source },
        }
    }

    /// Shorthand for [`MetadataError::InvalidField`].
    pub fn invalid(entity: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            entity,
            reason: reason.into(),
        }
    }
}

impl From<AddressError> for MetadataError {
    fn from(err: AddressError) -> Self {
        Self::address("metadata address", err)
    }
}
