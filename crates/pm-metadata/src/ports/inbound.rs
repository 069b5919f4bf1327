//! # Inbound Ports (Driving Ports / API)
//!
//! The public API of the metadata subsystem.

use crate::domain::address::MetadataAddress;
use crate::domain::entities::{
    ContractSpecification, Record, RecordSpecification, Scope, ScopeSpecification, Session,
};
use crate::domain::errors::MetadataError;
use crate::domain::party::Party;
use crate::signers::RequestContext;

/// Primary metadata API.
///
/// Every mutation validates the request fully and resolves its signers before
/// anything is written; an error means nothing changed. Implementations must
/// be thread-safe (`Send + Sync`); a [`RequestContext`] is never shared.
pub trait MetadataApi: Send + Sync {
    // =========================================================================
    // Scopes
    // =========================================================================

    /// Create or replace a scope.
    fn write_scope(&self, ctx: &mut RequestContext, scope: Scope) -> Result<(), MetadataError>;

    /// Remove a scope with all of its sessions and records.
    fn delete_scope(
        &self,
        ctx: &mut RequestContext,
        scope_id: &MetadataAddress,
    ) -> Result<(), MetadataError>;

    fn add_scope_data_access(
        &self,
        ctx: &mut RequestContext,
        scope_id: &MetadataAddress,
        data_access: Vec<String>,
    ) -> Result<(), MetadataError>;

    fn delete_scope_data_access(
        &self,
        ctx: &mut RequestContext,
        scope_id: &MetadataAddress,
        data_access: Vec<String>,
    ) -> Result<(), MetadataError>;

    fn add_scope_owners(
        &self,
        ctx: &mut RequestContext,
        scope_id: &MetadataAddress,
        owners: Vec<Party>,
    ) -> Result<(), MetadataError>;

    fn delete_scope_owners(
        &self,
        ctx: &mut RequestContext,
        scope_id: &MetadataAddress,
        owner_addresses: Vec<String>,
    ) -> Result<(), MetadataError>;

    // =========================================================================
    // Sessions and records
    // =========================================================================

    /// Create or update a session. `session.audit` is maintained by the service;
    /// only its `message` is taken from the request.
    fn write_session(
        &self,
        ctx: &mut RequestContext,
        session: Session,
    ) -> Result<(), MetadataError>;

    fn write_record(&self, ctx: &mut RequestContext, record: Record) -> Result<(), MetadataError>;

    fn delete_record(
        &self,
        ctx: &mut RequestContext,
        record_id: &MetadataAddress,
    ) -> Result<(), MetadataError>;

    // =========================================================================
    // Specifications
    // =========================================================================

    fn write_scope_specification(
        &self,
        ctx: &mut RequestContext,
        spec: ScopeSpecification,
    ) -> Result<(), MetadataError>;

    fn delete_scope_specification(
        &self,
        ctx: &mut RequestContext,
        spec_id: &MetadataAddress,
    ) -> Result<(), MetadataError>;

    fn write_contract_specification(
        &self,
        ctx: &mut RequestContext,
        spec: ContractSpecification,
    ) -> Result<(), MetadataError>;

    /// Remove a contract specification and its record specifications.
    fn delete_contract_specification(
        &self,
        ctx: &mut RequestContext,
        spec_id: &MetadataAddress,
    ) -> Result<(), MetadataError>;

    fn write_record_specification(
        &self,
        ctx: &mut RequestContext,
        spec: RecordSpecification,
    ) -> Result<(), MetadataError>;

    fn delete_record_specification(
        &self,
        ctx: &mut RequestContext,
        spec_id: &MetadataAddress,
    ) -> Result<(), MetadataError>;

    // =========================================================================
    // Reads
    // =========================================================================

    fn get_scope(&self, scope_id: &MetadataAddress) -> Result<Option<Scope>, MetadataError>;

    fn get_session(&self, session_id: &MetadataAddress) -> Result<Option<Session>, MetadataError>;

    fn get_record(&self, record_id: &MetadataAddress) -> Result<Option<Record>, MetadataError>;

    fn get_scope_specification(
        &self,
        spec_id: &MetadataAddress,
    ) -> Result<Option<ScopeSpecification>, MetadataError>;

    fn get_contract_specification(
        &self,
        spec_id: &MetadataAddress,
    ) -> Result<Option<ContractSpecification>, MetadataError>;

    fn get_record_specification(
        &self,
        spec_id: &MetadataAddress,
    ) -> Result<Option<RecordSpecification>, MetadataError>;

    /// Sessions of the scope that owns `address`.
    fn sessions_in_scope(&self, address: &MetadataAddress) -> Result<Vec<Session>, MetadataError>;

    /// Records of the scope that owns `address`.
    fn records_in_scope(&self, address: &MetadataAddress) -> Result<Vec<Record>, MetadataError>;

    /// Record specifications under the contract spec that owns `address`.
    fn record_specs_for_contract_spec(
        &self,
        address: &MetadataAddress,
    ) -> Result<Vec<RecordSpecification>, MetadataError>;
}
