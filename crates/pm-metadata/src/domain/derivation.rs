//! # Address Derivation
//!
//! Builds addresses from UUIDs and names, and converts between related
//! address types.
//!
//! Constructors take already-valid inputs and cannot fail. Conversions take an
//! arbitrary address and return [`AddressError::NotApplicable`] when the
//! source type does not carry the UUID the target needs (a scope
//! specification address has no scope UUID, for example).

use super::address::{AddressType, MetadataAddress, NAME_HASH_LENGTH, UUID_LENGTH};
use super::errors::AddressError;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// First 16 bytes of `sha256(lower(trim(name)))`.
pub fn name_hash(name: &str) -> [u8; NAME_HASH_LENGTH] {
    let digest = Sha256::digest(name.trim().to_lowercase().as_bytes());
    let mut hash = [0u8; NAME_HASH_LENGTH];
    hash.copy_from_slice(&digest[..NAME_HASH_LENGTH]);
    hash
}

/// Address of the scope with the given UUID.
pub fn scope_address(scope_uuid: &Uuid) -> MetadataAddress {
    MetadataAddress::assemble(AddressType::Scope, scope_uuid.as_bytes(), None)
}

/// Address of a session within a scope.
pub fn session_address(scope_uuid: &Uuid, session_uuid: &Uuid) -> MetadataAddress {
    MetadataAddress::assemble(
        AddressType::Session,
        scope_uuid.as_bytes(),
        Some(session_uuid.as_bytes()),
    )
}

/// Address of a named record within a scope.
pub fn record_address(scope_uuid: &Uuid, name: &str) -> MetadataAddress {
    MetadataAddress::assemble(
        AddressType::Record,
        scope_uuid.as_bytes(),
        Some(&name_hash(name)),
    )
}

/// Address of a scope specification.
pub fn scope_spec_address(spec_uuid: &Uuid) -> MetadataAddress {
    MetadataAddress::assemble(AddressType::ScopeSpecification, spec_uuid.as_bytes(), None)
}

/// Address of a contract specification.
pub fn contract_spec_address(spec_uuid: &Uuid) -> MetadataAddress {
    MetadataAddress::assemble(
        AddressType::ContractSpecification,
        spec_uuid.as_bytes(),
        None,
    )
}

/// Address of a named record specification within a contract specification.
pub fn record_spec_address(contract_spec_uuid: &Uuid, name: &str) -> MetadataAddress {
    MetadataAddress::assemble(
        AddressType::RecordSpecification,
        contract_spec_uuid.as_bytes(),
        Some(&name_hash(name)),
    )
}

// =============================================================================
// CONVERSIONS
// =============================================================================

impl MetadataAddress {
    /// Scope UUID of a scope, session or record address.
    pub fn scope_uuid(&self) -> Result<Uuid, AddressError> {
        match self.validate()? {
            AddressType::Scope | AddressType::Session | AddressType::Record => {
                self.primary_uuid()
            }
            _ => Err(self.not_applicable("scope uuid")),
        }
    }

    /// Session UUID of a session address.
    pub fn session_uuid(&self) -> Result<Uuid, AddressError> {
        match self.validate()? {
            AddressType::Session => self.secondary_uuid(),
            _ => Err(self.not_applicable("session uuid")),
        }
    }

    /// Scope specification UUID of a scope specification address.
    pub fn scope_spec_uuid(&self) -> Result<Uuid, AddressError> {
        match self.validate()? {
            AddressType::ScopeSpecification => self.primary_uuid(),
            _ => Err(self.not_applicable("scope specification uuid")),
        }
    }

    /// Contract specification UUID of a contract spec or record spec address.
    pub fn contract_spec_uuid(&self) -> Result<Uuid, AddressError> {
        match self.validate()? {
            AddressType::ContractSpecification | AddressType::RecordSpecification => {
                self.primary_uuid()
            }
            _ => Err(self.not_applicable("contract specification uuid")),
        }
    }

    /// The scope address that owns this scope, session or record.
    pub fn as_scope_address(&self) -> Result<MetadataAddress, AddressError> {
        Ok(scope_address(&self.scope_uuid()?))
    }

    /// A session address in the same scope.
    pub fn as_session_address(&self, session_uuid: &Uuid) -> Result<MetadataAddress, AddressError> {
        Ok(session_address(&self.scope_uuid()?, session_uuid))
    }

    /// A record address in the same scope.
    pub fn as_record_address(&self, name: &str) -> Result<MetadataAddress, AddressError> {
        Ok(record_address(&self.scope_uuid()?, name))
    }

    /// The contract specification address that owns this contract/record spec.
    pub fn as_contract_spec_address(&self) -> Result<MetadataAddress, AddressError> {
        Ok(contract_spec_address(&self.contract_spec_uuid()?))
    }

    /// A record specification address under the same contract specification.
    pub fn as_record_spec_address(&self, name: &str) -> Result<MetadataAddress, AddressError> {
        Ok(record_spec_address(&self.contract_spec_uuid()?, name))
    }

    /// Store prefix covering every session of this address's scope.
    pub fn scope_session_iterator_prefix(&self) -> Result<Vec<u8>, AddressError> {
        Ok(child_prefix(AddressType::Session, &self.scope_uuid()?))
    }

    /// Store prefix covering every record of this address's scope.
    pub fn scope_record_iterator_prefix(&self) -> Result<Vec<u8>, AddressError> {
        Ok(child_prefix(AddressType::Record, &self.scope_uuid()?))
    }

    /// Store prefix covering every record spec of this address's contract spec.
    pub fn contract_spec_record_spec_iterator_prefix(&self) -> Result<Vec<u8>, AddressError> {
        Ok(child_prefix(
            AddressType::RecordSpecification,
            &self.contract_spec_uuid()?,
        ))
    }
}

fn child_prefix(child: AddressType, parent_uuid: &Uuid) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(1 + UUID_LENGTH);
    prefix.push(child.tag());
    prefix.extend_from_slice(parent_uuid.as_bytes());
    prefix
}
