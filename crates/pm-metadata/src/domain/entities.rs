//! # Metadata Entities
//!
//! Instances (scope, session, record) and the specifications that govern them.
//!
//! ```text
//! ScopeSpecification ──lists──▶ ContractSpecification ──owns──▶ RecordSpecification
//!        ▲                               ▲                              ▲
//!        │ specification_id              │ specification_id             │ specification_id
//!      Scope ─────────owns─────────▶ Session ────────owns────────▶ Record
//! ```
//!
//! Oneof-style sources are enums; every variant carries its payload.

use super::address::MetadataAddress;
use super::party::{Party, PartyType};
use serde::{Deserialize, Serialize};

// =============================================================================
// SCOPE
// =============================================================================

/// Root container of custody metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scope {
    pub scope_id: MetadataAddress,
    /// Scope specification governing this scope.
    pub specification_id: MetadataAddress,
    pub owners: Vec<Party>,
    /// Accounts allowed to read off-chain data.
    pub data_access: Vec<String>,
    /// Account holding the scope's value; empty when unset.
    pub value_owner_address: String,
    /// When set, sessions and records resolve signers against the specification roles
    /// using scope owners as the required-party set.
    pub require_party_rollup: bool,
}

impl Scope {
    pub fn new(
        scope_id: MetadataAddress,
        specification_id: MetadataAddress,
        owners: Vec<Party>,
    ) -> Self {
        Self {
            scope_id,
            specification_id,
            owners,
            ..Self::default()
        }
    }

    pub fn with_data_access(mut self, data_access: Vec<String>) -> Self {
        self.data_access = data_access;
        self
    }

    pub fn with_value_owner(mut self, value_owner_address: impl Into<String>) -> Self {
        self.value_owner_address = value_owner_address.into();
        self
    }

    pub fn with_party_rollup(mut self, require_party_rollup: bool) -> Self {
        self.require_party_rollup = require_party_rollup;
        self
    }

    /// Owner account strings in declared order.
    pub fn owner_addresses(&self) -> Vec<String> {
        self.owners.iter().map(|p| p.address.clone()).collect()
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Bookkeeping maintained by the service on every session write.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditFields {
    pub created_by: String,
    pub updated_by: String,
    pub version: u32,
    pub message: String,
}

/// One execution of a contract specification inside a scope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    pub session_id: MetadataAddress,
    /// Contract specification this session executes.
    pub specification_id: MetadataAddress,
    pub parties: Vec<Party>,
    pub name: String,
    /// Opaque caller context.
    pub context: Vec<u8>,
    pub audit: Option<AuditFields>,
}

impl Session {
    pub fn new(
        session_id: MetadataAddress,
        specification_id: MetadataAddress,
        parties: Vec<Party>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            session_id,
            specification_id,
            parties,
            name: name.into(),
            context: Vec::new(),
            audit: None,
        }
    }
}

// =============================================================================
// RECORD
// =============================================================================

/// Identifies the process that produced a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessId {
    /// Account address of an on-chain process.
    Address(String),
    /// Hash of an off-chain process.
    Hash(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub process_id: ProcessId,
    pub name: String,
    pub method: String,
}

impl Process {
    pub fn new(process_id: ProcessId, name: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            process_id,
            name: name.into(),
            method: method.into(),
        }
    }
}

/// Where a record input's value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordInputSource {
    /// Another record already on chain.
    RecordId(MetadataAddress),
    /// Hash of an off-chain value.
    Hash(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecordInputStatus {
    #[default]
    Unspecified,
    /// Value supplied with the request (hash sources).
    Proposed,
    /// Value references an existing record.
    Record,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordInput {
    pub name: String,
    pub source: RecordInputSource,
    pub type_name: String,
    pub status: RecordInputStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResultStatus {
    #[default]
    Unspecified,
    Pass,
    Skip,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordOutput {
    pub hash: String,
    pub status: ResultStatus,
}

/// Named output of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub session_id: MetadataAddress,
    pub process: Process,
    pub inputs: Vec<RecordInput>,
    pub outputs: Vec<RecordOutput>,
    /// Record specification; empty means "derive from the session".
    pub specification_id: MetadataAddress,
}

impl Record {
    /// Address of this record, derived from its session's scope and its name.
    pub fn record_address(&self) -> Result<MetadataAddress, super::errors::AddressError> {
        self.session_id.as_record_address(&self.name)
    }
}

// =============================================================================
// SPECIFICATIONS
// =============================================================================

/// Human-facing description attached to scope and contract specifications.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Description {
    pub name: String,
    pub description: String,
    pub website_url: String,
    pub icon_url: String,
}

impl Description {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScopeSpecification {
    pub specification_id: MetadataAddress,
    pub description: Option<Description>,
    pub owner_addresses: Vec<String>,
    pub parties_involved: Vec<PartyType>,
    /// Contract specifications sessions in governed scopes may use.
    pub contract_spec_ids: Vec<MetadataAddress>,
}

/// Where a contract specification's code lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractSpecSource {
    /// A metadata address of any type.
    ResourceId(MetadataAddress),
    Hash(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSpecification {
    pub specification_id: MetadataAddress,
    pub description: Option<Description>,
    pub owner_addresses: Vec<String>,
    pub parties_involved: Vec<PartyType>,
    pub source: ContractSpecSource,
    pub class_name: String,
}

/// Shape of a record specification's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DefinitionType {
    #[default]
    Unspecified,
    Proposed,
    Record,
    RecordList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputSpecSource {
    RecordId(MetadataAddress),
    Hash(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSpecification {
    pub name: String,
    pub type_name: String,
    pub source: InputSpecSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSpecification {
    pub specification_id: MetadataAddress,
    pub name: String,
    pub inputs: Vec<InputSpecification>,
    pub type_name: String,
    pub result_type: DefinitionType,
    /// Roles that must sign records of this spec.
    pub responsible_parties: Vec<PartyType>,
}
