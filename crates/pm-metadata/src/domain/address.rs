//! # Metadata Addresses
//!
//! Compact typed identifiers for scopes, sessions, records and their
//! specifications.
//!
//! ## Byte Layout
//!
//! ```text
//! byte[0]     : type tag  0x00 scope, 0x01 session, 0x02 record,
//!                         0x03 contract spec, 0x04 scope spec, 0x05 record spec
//! byte[1:17]  : primary UUID
//! byte[17:33] : session    -> session UUID
//!               record     -> sha256(lower(trim(name)))[0:16]
//!               record spec-> sha256(lower(trim(name)))[0:16]
//! ```
//!
//! Single-component types are exactly 17 bytes, two-component types exactly
//! 33 bytes. A zero-length address is the null value: it is representable and
//! renders as `""`, but it never validates.
//!
//! ## Text Form
//!
//! Bech32 with a prefix fixed by the type tag. Decoding rejects text whose
//! prefix disagrees with the tag in its payload.

use super::errors::AddressError;
use bech32::{FromBase32, ToBase32, Variant};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Bytes in one UUID component.
pub const UUID_LENGTH: usize = 16;

/// Bytes of the truncated name hash.
pub const NAME_HASH_LENGTH: usize = 16;

/// Length of tag + primary UUID.
pub const SINGLE_COMPONENT_LENGTH: usize = 1 + UUID_LENGTH;

/// Length of tag + primary UUID + secondary component.
pub const DOUBLE_COMPONENT_LENGTH: usize = 1 + UUID_LENGTH + UUID_LENGTH;

/// Bech32 prefix for scope addresses.
pub const PREFIX_SCOPE: &str = "scope";
/// Bech32 prefix for session addresses.
pub const PREFIX_SESSION: &str = "session";
/// Bech32 prefix for record addresses.
pub const PREFIX_RECORD: &str = "record";
/// Bech32 prefix for scope specification addresses.
pub const PREFIX_SCOPE_SPECIFICATION: &str = "scopespec";
/// Bech32 prefix for contract specification addresses.
pub const PREFIX_CONTRACT_SPECIFICATION: &str = "contractspec";
/// Bech32 prefix for record specification addresses.
pub const PREFIX_RECORD_SPECIFICATION: &str = "recspec";

// =============================================================================
// ADDRESS TYPE
// =============================================================================

/// The six entity kinds a metadata address can identify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AddressType {
    Scope,
    Session,
    Record,
    ContractSpecification,
    ScopeSpecification,
    RecordSpecification,
}

impl AddressType {
    /// Every address type, in tag order.
    pub const ALL: [AddressType; 6] = [
        AddressType::Scope,
        AddressType::Session,
        AddressType::Record,
        AddressType::ContractSpecification,
        AddressType::ScopeSpecification,
        AddressType::RecordSpecification,
    ];

    /// Wire tag stored in byte 0.
    pub const fn tag(self) -> u8 {
        match self {
            AddressType::Scope => 0x00,
            AddressType::Session => 0x01,
            AddressType::Record => 0x02,
            AddressType::ContractSpecification => 0x03,
            AddressType::ScopeSpecification => 0x04,
            AddressType::RecordSpecification => 0x05,
        }
    }

    /// Look up a type by its wire tag.
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x00 => Some(AddressType::Scope),
            0x01 => Some(AddressType::Session),
            0x02 => Some(AddressType::Record),
            0x03 => Some(AddressType::ContractSpecification),
            0x04 => Some(AddressType::ScopeSpecification),
            0x05 => Some(AddressType::RecordSpecification),
            _ => None,
        }
    }

    /// Bech32 human-readable prefix.
    pub const fn hrp(self) -> &'static str {
        match self {
            AddressType::Scope => PREFIX_SCOPE,
            AddressType::Session => PREFIX_SESSION,
            AddressType::Record => PREFIX_RECORD,
            AddressType::ContractSpecification => PREFIX_CONTRACT_SPECIFICATION,
            AddressType::ScopeSpecification => PREFIX_SCOPE_SPECIFICATION,
            AddressType::RecordSpecification => PREFIX_RECORD_SPECIFICATION,
        }
    }

    /// Look up a type by its bech32 prefix.
    pub fn from_hrp(hrp: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.hrp() == hrp)
    }

    /// Exact byte length required for this type.
    pub const fn expected_len(self) -> usize {
        if self.has_secondary_uuid() || self.has_name_hash() {
            DOUBLE_COMPONENT_LENGTH
        } else {
            SINGLE_COMPONENT_LENGTH
        }
    }

    /// Only sessions carry a second UUID.
    pub const fn has_secondary_uuid(self) -> bool {
        matches!(self, AddressType::Session)
    }

    /// Records and record specifications carry a name hash.
    pub const fn has_name_hash(self) -> bool {
        matches!(
            self,
            AddressType::Record | AddressType::RecordSpecification
        )
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hrp())
    }
}

// =============================================================================
// FORMAT VALIDATION
// =============================================================================

/// Check tag, exact length and UUID regions of raw address bytes.
///
/// Returns the address type on success.
pub fn validate_address_bytes(bytes: &[u8]) -> Result<AddressType, AddressError> {
    let Some(&tag) = bytes.first() else {
        return Err(AddressError::Empty);
    };
    let address_type = AddressType::from_tag(tag).ok_or(AddressError::UnknownType(tag))?;

    let expected = address_type.expected_len();
    if bytes.len() != expected {
        return Err(AddressError::InvalidLength {
            address_type,
            expected,
            actual: bytes.len(),
        });
    }

    Uuid::from_slice(&bytes[1..SINGLE_COMPONENT_LENGTH])
        .map_err(|e| AddressError::InvalidUuid(e.to_string()))?;
    if address_type.has_secondary_uuid() {
        Uuid::from_slice(&bytes[SINGLE_COMPONENT_LENGTH..DOUBLE_COMPONENT_LENGTH])
            .map_err(|e| AddressError::InvalidUuid(e.to_string()))?;
    }

    Ok(address_type)
}

// =============================================================================
// METADATA ADDRESS
// =============================================================================

/// Typed, hierarchical identifier of a metadata entity.
///
/// Holds raw bytes; use [`MetadataAddress::validate`] (or any accessor, which
/// validates first) before trusting externally supplied values.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetadataAddress(Vec<u8>);

impl MetadataAddress {
    /// The null address.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Concatenate tag and components. Callers guarantee the component count
    /// fits the type.
    pub(crate) fn assemble(
        address_type: AddressType,
        primary: &[u8; UUID_LENGTH],
        secondary: Option<&[u8; UUID_LENGTH]>,
    ) -> Self {
        let mut bytes = Vec::with_capacity(address_type.expected_len());
        bytes.push(address_type.tag());
        bytes.extend_from_slice(primary);
        if let Some(secondary) = secondary {
            bytes.extend_from_slice(secondary);
        }
        Self(bytes)
    }

    /// Encode an address from its components.
    ///
    /// `secondary` is the session UUID bytes for sessions and the name hash for
    /// records and record specifications; it must be `None` for every other
    /// type.
    pub fn encode(
        address_type: AddressType,
        primary: &Uuid,
        secondary: Option<[u8; UUID_LENGTH]>,
    ) -> Result<Self, AddressError> {
        let needs_secondary = address_type.expected_len() == DOUBLE_COMPONENT_LENGTH;
        if needs_secondary != secondary.is_some() {
            return Err(AddressError::InvalidComponents { address_type });
        }
        Ok(Self::assemble(
            address_type,
            primary.as_bytes(),
            secondary.as_ref(),
        ))
    }

    /// Validate and copy raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        validate_address_bytes(bytes)?;
        Ok(Self(bytes.to_vec()))
    }

    /// Wrap raw bytes without validating them.
    ///
    /// Used for values read back from storage or received over the wire that
    /// are validated later by the entity that carries them.
    pub fn from_raw(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Decode the bech32 text form.
    pub fn from_bech32(text: &str) -> Result<Self, AddressError> {
        if text.trim().is_empty() {
            return Err(AddressError::EmptyString);
        }

        let (hrp, data, variant) =
            bech32::decode(text).map_err(|e| AddressError::Bech32(e.to_string()))?;
        if variant != Variant::Bech32 {
            return Err(AddressError::Bech32(
                "bech32m checksums are not accepted".to_string(),
            ));
        }
        let bytes =
            Vec::<u8>::from_base32(&data).map_err(|e| AddressError::Bech32(e.to_string()))?;

        let address_type = validate_address_bytes(&bytes)?;
        if address_type.hrp() != hrp {
            return Err(AddressError::PrefixMismatch {
                expected: address_type.hrp(),
                actual: hrp,
            });
        }

        Ok(Self(bytes))
    }

    /// Decode a hex string (with or without `0x`).
    pub fn from_hex(text: &str) -> Result<Self, AddressError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AddressError::EmptyString);
        }
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(digits).map_err(|e| AddressError::Hex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Byte length.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the null address.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Full format check; returns the type on success.
    ///
    /// The empty address is the null value, not corrupt data, yet it has no
    /// type and so yields [`AddressError::Empty`]. Check
    /// [`is_empty`](Self::is_empty) first wherever the null address is an
    /// accepted value.
    pub fn validate(&self) -> Result<AddressType, AddressError> {
        validate_address_bytes(&self.0)
    }

    /// Bech32 prefix for this address, after validating it.
    pub fn prefix(&self) -> Result<&'static str, AddressError> {
        self.validate().map(AddressType::hrp)
    }

    /// Type named by the tag byte alone, without a length check.
    pub fn address_type(&self) -> Option<AddressType> {
        self.0.first().and_then(|tag| AddressType::from_tag(*tag))
    }

    /// Tag check only.
    pub fn is_type(&self, address_type: AddressType) -> bool {
        self.address_type() == Some(address_type)
    }

    pub fn is_scope_address(&self) -> bool {
        self.is_type(AddressType::Scope)
    }

    pub fn is_session_address(&self) -> bool {
        self.is_type(AddressType::Session)
    }

    pub fn is_record_address(&self) -> bool {
        self.is_type(AddressType::Record)
    }

    pub fn is_contract_specification_address(&self) -> bool {
        self.is_type(AddressType::ContractSpecification)
    }

    pub fn is_scope_specification_address(&self) -> bool {
        self.is_type(AddressType::ScopeSpecification)
    }

    pub fn is_record_specification_address(&self) -> bool {
        self.is_type(AddressType::RecordSpecification)
    }

    /// The UUID in bytes 1..17. Valid for all six types.
    pub fn primary_uuid(&self) -> Result<Uuid, AddressError> {
        self.validate()?;
        Ok(uuid_at(&self.0, 1))
    }

    /// The session UUID in bytes 17..33. Sessions only.
    pub fn secondary_uuid(&self) -> Result<Uuid, AddressError> {
        let address_type = self.validate()?;
        if !address_type.has_secondary_uuid() {
            return Err(self.not_applicable("secondary uuid"));
        }
        Ok(uuid_at(&self.0, SINGLE_COMPONENT_LENGTH))
    }

    /// The truncated name hash in bytes 17..33. Records and record specs only.
    pub fn name_hash(&self) -> Result<[u8; NAME_HASH_LENGTH], AddressError> {
        let address_type = self.validate()?;
        if !address_type.has_name_hash() {
            return Err(self.not_applicable("name hash"));
        }
        let mut hash = [0u8; NAME_HASH_LENGTH];
        hash.copy_from_slice(&self.0[SINGLE_COMPONENT_LENGTH..DOUBLE_COMPONENT_LENGTH]);
        Ok(hash)
    }

    /// Bech32 text form. The null address renders as an empty string.
    pub fn to_bech32(&self) -> Result<String, AddressError> {
        if self.is_empty() {
            return Ok(String::new());
        }
        let address_type = self.validate()?;
        bech32::encode(address_type.hrp(), self.0.to_base32(), Variant::Bech32)
            .map_err(|e| AddressError::Bech32(e.to_string()))
    }

    /// Decompose the address into all of its parts.
    pub fn details(&self) -> Result<AddressDetails, AddressError> {
        let address_type = self.validate()?;
        let parent = match address_type {
            AddressType::Session | AddressType::Record => Some(self.as_scope_address()?),
            AddressType::RecordSpecification => Some(self.as_contract_spec_address()?),
            _ => None,
        };
        Ok(AddressDetails {
            address: self.clone(),
            address_type,
            prefix: address_type.hrp(),
            primary_uuid: self.primary_uuid()?,
            secondary_uuid: self.secondary_uuid().ok(),
            name_hash: self.name_hash().ok(),
            bech32: self.to_bech32()?,
            parent,
        })
    }

    pub(crate) fn not_applicable(&self, component: &'static str) -> AddressError {
        AddressError::NotApplicable {
            address: self.to_string(),
            component,
        }
    }
}

fn uuid_at(bytes: &[u8], offset: usize) -> Uuid {
    let mut raw = [0u8; UUID_LENGTH];
    raw.copy_from_slice(&bytes[offset..offset + UUID_LENGTH]);
    Uuid::from_bytes(raw)
}

impl fmt::Display for MetadataAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_bech32() {
            Ok(text) => f.write_str(&text),
            // Unvalidated bytes still need a printable form for error messages.
            Err(_) => write!(f, "0x{}", hex::encode(&self.0)),
        }
    }
}

impl fmt::Debug for MetadataAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MetadataAddress({self})")
    }
}

impl FromStr for MetadataAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s)
    }
}

impl AsRef<[u8]> for MetadataAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Every component of a metadata address, resolved at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressDetails {
    pub address: MetadataAddress,
    pub address_type: AddressType,
    pub prefix: &'static str,
    pub primary_uuid: Uuid,
    pub secondary_uuid: Option<Uuid>,
    pub name_hash: Option<[u8; NAME_HASH_LENGTH]>,
    pub bech32: String,
    /// Scope of a session/record, contract spec of a record spec.
    pub parent: Option<MetadataAddress>,
}

// =============================================================================
// SERDE
// =============================================================================

impl Serialize for MetadataAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            let text = self.to_bech32().map_err(serde::ser::Error::custom)?;
            serializer.serialize_str(&text)
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for MetadataAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(AddressVisitor)
        } else {
            deserializer.deserialize_byte_buf(AddressVisitor)
        }
    }
}

struct AddressVisitor;

impl<'de> Visitor<'de> for AddressVisitor {
    type Value = MetadataAddress;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a bech32 metadata address string or raw address bytes")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if v.is_empty() {
            return Ok(MetadataAddress::empty());
        }
        MetadataAddress::from_bech32(v).map_err(E::custom)
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(MetadataAddress::from_raw(v.to_vec()))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(MetadataAddress::from_raw(v))
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(DOUBLE_COMPONENT_LENGTH));
        while let Some(byte) = seq.next_element::<u8>()? {
            bytes.push(byte);
        }
        Ok(MetadataAddress::from_raw(bytes))
    }
}
