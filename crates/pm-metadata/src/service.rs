//! # Metadata Service
//!
//! Application service implementing [`MetadataApi`].
//!
//! ## Architecture
//!
//! - Implements the inbound port (`MetadataApi`)
//! - Persists entities through the outbound `MetadataStore` as bincode values
//!   keyed by their metadata address bytes
//! - Resolves signers through [`SignerResolver`] over the outbound
//!   `AuthorizationProvider` and `AccountInspector`
//!
//! Each mutation runs validation, then lookups of related entities, then
//! signer resolution, and writes only after all of them pass.

use crate::config::MetadataConfig;
use crate::domain::address::{AddressType, MetadataAddress};
use crate::domain::entities::{
    AuditFields, ContractSpecification, Record, RecordInputSource, RecordSpecification, Scope,
    ScopeSpecification, Session,
};
use crate::domain::errors::MetadataError;
use crate::domain::messages::MsgType;
use crate::domain::party::{validate_parties_involved, Party, PartyType};
use crate::domain::validation::{
    check_address_type, validate_record_against, validate_record_spec_against,
    validate_session_against, ValidateBasic,
};
use crate::ports::inbound::MetadataApi;
use crate::ports::outbound::{AccountInspector, AuthorizationProvider, MetadataStore, StoreError};
use crate::signers::{RequestContext, SignerResolver};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{AccountCodec, Bech32AccountCodec};
use tracing::{debug, info};

/// Metadata service over a store, an authorization provider and an account
/// inspector.
pub struct MetadataService<S: MetadataStore, A: AuthorizationProvider, I: AccountInspector> {
    store: S,
    authz: A,
    inspector: I,
    codec: Box<dyn AccountCodec>,
    config: MetadataConfig,
}

impl<S: MetadataStore, A: AuthorizationProvider, I: AccountInspector> MetadataService<S, A, I> {
    /// Create a service using a bech32 account codec for `config.account_hrp`.
    pub fn new(store: S, authz: A, inspector: I, config: MetadataConfig) -> Result<Self, MetadataError> {
        config.validate()?;
        let codec = Box::new(Bech32AccountCodec::new(config.account_hrp.clone()));
        Ok(Self {
            store,
            authz,
            inspector,
            codec,
            config,
        })
    }

    /// Replace the account codec.
    pub fn with_codec(mut self, codec: impl AccountCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn authz(&self) -> &A {
        &self.authz
    }

    pub fn inspector(&self) -> &I {
        &self.inspector
    }

    pub fn codec(&self) -> &dyn AccountCodec {
        self.codec.as_ref()
    }

    pub fn config(&self) -> &MetadataConfig {
        &self.config
    }

    fn resolver(&self) -> SignerResolver<'_> {
        SignerResolver::new(&self.authz, &self.inspector, self.codec.as_ref())
    }

    // =========================================================================
    // STORAGE HELPERS
    // =========================================================================

    fn load<T: DeserializeOwned>(&self, key: &MetadataAddress) -> Result<Option<T>, MetadataError> {
        match self.store.get(key.as_bytes()).map_err(storage)? {
            Some(bytes) => bincode::deserialize(&bytes)
                .map(Some)
                .map_err(|e| MetadataError::Codec(e.to_string())),
            None => Ok(None),
        }
    }

    fn require<T: DeserializeOwned>(
        &self,
        key: &MetadataAddress,
        what: &str,
    ) -> Result<T, MetadataError> {
        self.load(key)?
            .ok_or_else(|| MetadataError::NotFound(format!("{what} {key}")))
    }

    fn save<T: Serialize>(&self, key: &MetadataAddress, value: &T) -> Result<(), MetadataError> {
        let bytes = bincode::serialize(value).map_err(|e| MetadataError::Codec(e.to_string()))?;
        self.store.set(key.as_bytes(), bytes).map_err(storage)
    }

    fn remove(&self, key: &[u8]) -> Result<(), MetadataError> {
        self.store.delete(key).map_err(storage)
    }

    fn children<T: DeserializeOwned>(&self, prefix: &[u8]) -> Result<Vec<T>, MetadataError> {
        self.store
            .iterate_prefix(prefix)
            .map_err(storage)?
            .into_iter()
            .map(|(_, v)| bincode::deserialize(&v).map_err(|e| MetadataError::Codec(e.to_string())))
            .collect()
    }

    /// Keys of every entry under `prefix`.
    fn child_keys(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>, MetadataError> {
        Ok(self
            .store
            .iterate_prefix(prefix)
            .map_err(storage)?
            .into_iter()
            .map(|(k, _)| k)
            .collect())
    }

    /// Remove `parent` and `children` in one store batch.
    fn remove_with_children(
        &self,
        parent: &MetadataAddress,
        mut children: Vec<Vec<u8>>,
    ) -> Result<(), MetadataError> {
        children.push(parent.as_bytes().to_vec());
        self.store.batch_delete(children).map_err(storage)
    }

    // =========================================================================
    // REQUEST CHECKS
    // =========================================================================

    fn check_signers(&self, ctx: &RequestContext) -> Result<(), MetadataError> {
        let count = ctx.signers().len();
        if count == 0 {
            return Err(MetadataError::UnauthorizedSigner(
                "at least one signer is required".to_string(),
            ));
        }
        if count > self.config.max_signers_per_request {
            return Err(MetadataError::invalid(
                "request",
                format!(
                    "{count} signers exceeds the maximum of {}",
                    self.config.max_signers_per_request
                ),
            ));
        }
        Ok(())
    }

    fn check_party_count(&self, entity: &'static str, count: usize) -> Result<(), MetadataError> {
        if count > self.config.max_parties_per_entity {
            return Err(MetadataError::invalid(
                entity,
                format!(
                    "{count} parties exceeds the maximum of {}",
                    self.config.max_parties_per_entity
                ),
            ));
        }
        Ok(())
    }

    fn check_data_access_count(&self, count: usize) -> Result<(), MetadataError> {
        if count > self.config.max_data_access_entries {
            return Err(MetadataError::invalid(
                "scope",
                format!(
                    "{count} data access entries exceeds the maximum of {}",
                    self.config.max_data_access_entries
                ),
            ));
        }
        Ok(())
    }

    /// Limit-check an already validated scope, and enforce specification
    /// roles unless rolled up.
    fn check_scope(&self, scope: &Scope, spec: &ScopeSpecification) -> Result<(), MetadataError> {
        self.check_party_count("scope", scope.owners.len())?;
        self.check_data_access_count(scope.data_access.len())?;
        if !scope.require_party_rollup {
            validate_parties_involved(&scope.owners, &spec.parties_involved, self.codec())?;
        }
        Ok(())
    }

    /// Owners of `scope` approve the request.
    ///
    /// With party rollup the owners also have to cover `roles`.
    fn authorize_scope_owners(
        &self,
        ctx: &mut RequestContext,
        scope: &Scope,
        roles: &[PartyType],
        msg: MsgType,
    ) -> Result<(), MetadataError> {
        if scope.require_party_rollup {
            self.resolver()
                .validate_signers_with_parties(ctx, &scope.owners, &scope.owners, roles, msg)?;
        } else {
            self.resolver()
                .validate_signers_without_parties(ctx, &scope.owner_addresses(), msg)?;
        }
        Ok(())
    }

    /// Signer rules shared by sessions and records of `scope`.
    fn authorize_scope_child(
        &self,
        ctx: &mut RequestContext,
        scope: &Scope,
        parties: &[Party],
        roles: &[PartyType],
        msg: MsgType,
    ) -> Result<(), MetadataError> {
        if scope.require_party_rollup {
            self.resolver()
                .validate_signers_with_parties(ctx, &scope.owners, parties, roles, msg)?;
        } else {
            validate_parties_involved(parties, roles, self.codec())?;
            self.resolver()
                .validate_signers_without_parties(ctx, &scope.owner_addresses(), msg)?;
        }
        Ok(())
    }

    fn scope_spec_roles(&self, scope: &Scope) -> Result<Vec<PartyType>, MetadataError> {
        Ok(self
            .load::<ScopeSpecification>(&scope.specification_id)?
            .map(|spec| spec.parties_involved)
            .unwrap_or_default())
    }

    /// Store an updated scope after its owners approved `msg`.
    fn update_scope(
        &self,
        ctx: &mut RequestContext,
        existing: &Scope,
        updated: Scope,
        msg: MsgType,
    ) -> Result<(), MetadataError> {
        updated.validate_basic(self.codec())?;
        let spec: ScopeSpecification =
            self.require(&updated.specification_id, "scope specification")?;
        self.check_scope(&updated, &spec)?;
        self.authorize_scope_owners(ctx, existing, &spec.parties_involved, msg)?;
        self.save(&updated.scope_id, &updated)?;
        info!(
            scope_id = %updated.scope_id,
            owners = updated.owners.len(),
            data_access = updated.data_access.len(),
            msg = %msg,
            "scope updated"
        );
        Ok(())
    }
}

fn storage(err: StoreError) -> MetadataError {
    MetadataError::Storage(err.to_string())
}

impl<S: MetadataStore, A: AuthorizationProvider, I: AccountInspector> MetadataApi
    for MetadataService<S, A, I>
{
    // =========================================================================
    // SCOPES
    // =========================================================================

    fn write_scope(&self, ctx: &mut RequestContext, scope: Scope) -> Result<(), MetadataError> {
        self.check_signers(ctx)?;
        scope.validate_basic(self.codec())?;
        let spec: ScopeSpecification =
            self.require(&scope.specification_id, "scope specification")?;
        self.check_scope(&scope, &spec)?;

        let existing: Option<Scope> = self.load(&scope.scope_id)?;
        let approving = existing.as_ref().unwrap_or(&scope);
        self.authorize_scope_owners(ctx, approving, &spec.parties_involved, MsgType::WriteScope)?;

        if let Some(previous) = &existing {
            if !previous.value_owner_address.is_empty()
                && previous.value_owner_address != scope.value_owner_address
            {
                self.resolver().validate_signers_without_parties(
                    ctx,
                    std::slice::from_ref(&previous.value_owner_address),
                    MsgType::WriteScope,
                )?;
            }
        }

        self.save(&scope.scope_id, &scope)?;
        info!(
            scope_id = %scope.scope_id,
            owners = scope.owners.len(),
            created = existing.is_none(),
            "scope written"
        );
        Ok(())
    }

    fn delete_scope(
        &self,
        ctx: &mut RequestContext,
        scope_id: &MetadataAddress,
    ) -> Result<(), MetadataError> {
        check_address_type("scope id", scope_id, AddressType::Scope)?;
        self.check_signers(ctx)?;
        let scope: Scope = self.require(scope_id, "scope")?;
        let roles = self.scope_spec_roles(&scope)?;
        self.authorize_scope_owners(ctx, &scope, &roles, MsgType::DeleteScope)?;
        if !scope.value_owner_address.is_empty() {
            self.resolver().validate_signers_without_parties(
                ctx,
                std::slice::from_ref(&scope.value_owner_address),
                MsgType::DeleteScope,
            )?;
        }

        let mut children = self.child_keys(&scope_id.scope_record_iterator_prefix()?)?;
        let records = children.len();
        children.extend(self.child_keys(&scope_id.scope_session_iterator_prefix()?)?);
        let sessions = children.len() - records;
        self.remove_with_children(scope_id, children)?;
        debug!(records, sessions, "removed scope children");
        info!(scope_id = %scope_id, "scope deleted");
        Ok(())
    }

    fn add_scope_data_access(
        &self,
        ctx: &mut RequestContext,
        scope_id: &MetadataAddress,
        data_access: Vec<String>,
    ) -> Result<(), MetadataError> {
        check_address_type("scope id", scope_id, AddressType::Scope)?;
        self.check_signers(ctx)?;
        if data_access.is_empty() {
            return Err(MetadataError::invalid(
                "scope",
                "at least one data access address is required",
            ));
        }
        let existing: Scope = self.require(scope_id, "scope")?;
        let mut updated = existing.clone();
        for address in data_access {
            self.codec.decode(&address).map_err(|e| {
                MetadataError::invalid("scope", format!("invalid data access address [{address}]: {e}"))
            })?;
            if updated.data_access.contains(&address) {
                return Err(MetadataError::invalid(
                    "scope",
                    format!("data access address [{address}] already exists on scope"),
                ));
            }
            updated.data_access.push(address);
        }
        self.update_scope(ctx, &existing, updated, MsgType::AddScopeDataAccess)
    }

    fn delete_scope_data_access(
        &self,
        ctx: &mut RequestContext,
        scope_id: &MetadataAddress,
        data_access: Vec<String>,
    ) -> Result<(), MetadataError> {
        check_address_type("scope id", scope_id, AddressType::Scope)?;
        self.check_signers(ctx)?;
        if data_access.is_empty() {
            return Err(MetadataError::invalid(
                "scope",
                "at least one data access address is required",
            ));
        }
        let existing: Scope = self.require(scope_id, "scope")?;
        let mut updated = existing.clone();
        for address in &data_access {
            let before = updated.data_access.len();
            updated.data_access.retain(|a| a != address);
            if updated.data_access.len() == before {
                return Err(MetadataError::invalid(
                    "scope",
                    format!("data access address [{address}] does not exist on scope"),
                ));
            }
        }
        self.update_scope(ctx, &existing, updated, MsgType::DeleteScopeDataAccess)
    }

    fn add_scope_owners(
        &self,
        ctx: &mut RequestContext,
        scope_id: &MetadataAddress,
        owners: Vec<Party>,
    ) -> Result<(), MetadataError> {
        check_address_type("scope id", scope_id, AddressType::Scope)?;
        self.check_signers(ctx)?;
        if owners.is_empty() {
            return Err(MetadataError::invalid("scope", "at least one owner is required"));
        }
        let existing: Scope = self.require(scope_id, "scope")?;
        let mut updated = existing.clone();
        for owner in owners {
            owner.validate_basic(self.codec())?;
            if updated.owners.contains(&owner) {
                return Err(MetadataError::DuplicateParty(format!(
                    "party [{}] with role {} is already an owner",
                    owner.address, owner.role
                )));
            }
            updated.owners.push(owner);
        }
        self.update_scope(ctx, &existing, updated, MsgType::AddScopeOwner)
    }

    fn delete_scope_owners(
        &self,
        ctx: &mut RequestContext,
        scope_id: &MetadataAddress,
        owner_addresses: Vec<String>,
    ) -> Result<(), MetadataError> {
        check_address_type("scope id", scope_id, AddressType::Scope)?;
        self.check_signers(ctx)?;
        if owner_addresses.is_empty() {
            return Err(MetadataError::invalid(
                "scope",
                "at least one owner address is required",
            ));
        }
        let existing: Scope = self.require(scope_id, "scope")?;
        let mut updated = existing.clone();
        let codec = self.codec();
        for address in &owner_addresses {
            let target = codec.decode(address).map_err(|e| {
                MetadataError::InvalidParty(format!("invalid owner address [{address}]: {e}"))
            })?;
            let before = updated.owners.len();
            updated
                .owners
                .retain(|p| codec.decode(&p.address).map_or(true, |acc| acc != target));
            if updated.owners.len() == before {
                return Err(MetadataError::invalid(
                    "scope",
                    format!("address [{address}] is not an owner of the scope"),
                ));
            }
        }
        self.update_scope(ctx, &existing, updated, MsgType::DeleteScopeOwner)
    }

    // =========================================================================
    // SESSIONS AND RECORDS
    // =========================================================================

    fn write_session(
        &self,
        ctx: &mut RequestContext,
        mut session: Session,
    ) -> Result<(), MetadataError> {
        self.check_signers(ctx)?;
        session.validate_basic(self.codec())?;
        self.check_party_count("session", session.parties.len())?;

        let message = session
            .audit
            .take()
            .map(|audit| audit.message)
            .unwrap_or_default();
        if message.len() > self.config.max_audit_message_length {
            return Err(MetadataError::invalid(
                "session",
                format!(
                    "audit message length {} exceeds maximum length of {}",
                    message.len(),
                    self.config.max_audit_message_length
                ),
            ));
        }

        let scope: Scope = self.require(&session.session_id.as_scope_address()?, "scope")?;
        let scope_spec: ScopeSpecification =
            self.require(&scope.specification_id, "scope specification")?;
        let contract_spec: ContractSpecification =
            self.require(&session.specification_id, "contract specification")?;
        validate_session_against(&session, &scope, &scope_spec)?;

        self.authorize_scope_child(
            ctx,
            &scope,
            &session.parties,
            &contract_spec.parties_involved,
            MsgType::WriteSession,
        )?;

        let existing: Option<Session> = self.load(&session.session_id)?;
        let signer = ctx.primary_signer().unwrap_or_default().to_string();
        session.audit = Some(match existing.and_then(|s| s.audit) {
            Some(previous) => AuditFields {
                created_by: previous.created_by,
                updated_by: signer,
                version: previous.version.saturating_add(1),
                message,
            },
            None => AuditFields {
                created_by: signer.clone(),
                updated_by: signer,
                version: 0,
                message,
            },
        });

        self.save(&session.session_id, &session)?;
        info!(
            session_id = %session.session_id,
            parties = session.parties.len(),
            version = session.audit.as_ref().map(|a| a.version).unwrap_or_default(),
            "session written"
        );
        Ok(())
    }

    fn write_record(
        &self,
        ctx: &mut RequestContext,
        mut record: Record,
    ) -> Result<(), MetadataError> {
        self.check_signers(ctx)?;
        record.validate_basic(self.codec())?;

        let session: Session = self.require(&record.session_id, "session")?;
        let scope: Scope = self.require(&session.session_id.as_scope_address()?, "scope")?;
        let spec_id = session
            .specification_id
            .as_record_spec_address(&record.name)?;
        let record_spec: RecordSpecification = self.require(&spec_id, "record specification")?;
        if record.specification_id.is_empty() {
            record.specification_id = spec_id;
        }
        validate_record_against(&record, &session, &record_spec)?;

        for input in &record.inputs {
            if let RecordInputSource::RecordId(id) = &input.source {
                if self.store.get(id.as_bytes()).map_err(storage)?.is_none() {
                    return Err(MetadataError::NotFound(format!("input record {id}")));
                }
            }
        }

        self.authorize_scope_child(
            ctx,
            &scope,
            &session.parties,
            &record_spec.responsible_parties,
            MsgType::WriteRecord,
        )?;

        let record_id = record.record_address()?;
        self.save(&record_id, &record)?;
        info!(
            record_id = %record_id,
            inputs = record.inputs.len(),
            outputs = record.outputs.len(),
            "record written"
        );
        Ok(())
    }

    fn delete_record(
        &self,
        ctx: &mut RequestContext,
        record_id: &MetadataAddress,
    ) -> Result<(), MetadataError> {
        check_address_type("record id", record_id, AddressType::Record)?;
        self.check_signers(ctx)?;
        let record: Record = self.require(record_id, "record")?;
        let scope: Scope = self.require(&record_id.as_scope_address()?, "scope")?;

        let parties = self
            .load::<Session>(&record.session_id)?
            .map(|s| s.parties)
            .unwrap_or_default();
        let roles = if record.specification_id.is_empty() {
            Vec::new()
        } else {
            self.load::<RecordSpecification>(&record.specification_id)?
                .map(|s| s.responsible_parties)
                .unwrap_or_default()
        };
        if scope.require_party_rollup {
            self.resolver().validate_signers_with_parties(
                ctx,
                &scope.owners,
                &parties,
                &roles,
                MsgType::DeleteRecord,
            )?;
        } else {
            self.resolver().validate_signers_without_parties(
                ctx,
                &scope.owner_addresses(),
                MsgType::DeleteRecord,
            )?;
        }

        self.remove(record_id.as_bytes())?;
        info!(record_id = %record_id, "record deleted");
        Ok(())
    }

    // =========================================================================
    // SPECIFICATIONS
    // =========================================================================

    fn write_scope_specification(
        &self,
        ctx: &mut RequestContext,
        spec: ScopeSpecification,
    ) -> Result<(), MetadataError> {
        self.check_signers(ctx)?;
        spec.validate_basic(self.codec())?;
        self.check_party_count("scope specification", spec.owner_addresses.len())?;

        let existing: Option<ScopeSpecification> = self.load(&spec.specification_id)?;
        let owners = existing
            .as_ref()
            .map_or(&spec.owner_addresses, |e| &e.owner_addresses);
        self.resolver()
            .validate_signers_without_parties(ctx, owners, MsgType::WriteScopeSpecification)?;

        self.save(&spec.specification_id, &spec)?;
        info!(
            specification_id = %spec.specification_id,
            contract_specs = spec.contract_spec_ids.len(),
            "scope specification written"
        );
        Ok(())
    }

    fn delete_scope_specification(
        &self,
        ctx: &mut RequestContext,
        spec_id: &MetadataAddress,
    ) -> Result<(), MetadataError> {
        check_address_type("scope specification id", spec_id, AddressType::ScopeSpecification)?;
        self.check_signers(ctx)?;
        let existing: ScopeSpecification = self.require(spec_id, "scope specification")?;
        self.resolver().validate_signers_without_parties(
            ctx,
            &existing.owner_addresses,
            MsgType::DeleteScopeSpecification,
        )?;
        self.remove(spec_id.as_bytes())?;
        info!(specification_id = %spec_id, "scope specification deleted");
        Ok(())
    }

    fn write_contract_specification(
        &self,
        ctx: &mut RequestContext,
        spec: ContractSpecification,
    ) -> Result<(), MetadataError> {
        self.check_signers(ctx)?;
        spec.validate_basic(self.codec())?;
        self.check_party_count("contract specification", spec.owner_addresses.len())?;

        let existing: Option<ContractSpecification> = self.load(&spec.specification_id)?;
        let owners = existing
            .as_ref()
            .map_or(&spec.owner_addresses, |e| &e.owner_addresses);
        self.resolver().validate_signers_without_parties(
            ctx,
            owners,
            MsgType::WriteContractSpecification,
        )?;

        self.save(&spec.specification_id, &spec)?;
        info!(
            specification_id = %spec.specification_id,
            class_name = %spec.class_name,
            "contract specification written"
        );
        Ok(())
    }

    fn delete_contract_specification(
        &self,
        ctx: &mut RequestContext,
        spec_id: &MetadataAddress,
    ) -> Result<(), MetadataError> {
        check_address_type(
            "contract specification id",
            spec_id,
            AddressType::ContractSpecification,
        )?;
        self.check_signers(ctx)?;
        let existing: ContractSpecification = self.require(spec_id, "contract specification")?;
        self.resolver().validate_signers_without_parties(
            ctx,
            &existing.owner_addresses,
            MsgType::DeleteContractSpecification,
        )?;

        let record_specs =
            self.child_keys(&spec_id.contract_spec_record_spec_iterator_prefix()?)?;
        let count = record_specs.len();
        self.remove_with_children(spec_id, record_specs)?;
        debug!(record_specs = count, "removed contract specification children");
        info!(specification_id = %spec_id, "contract specification deleted");
        Ok(())
    }

    fn write_record_specification(
        &self,
        ctx: &mut RequestContext,
        spec: RecordSpecification,
    ) -> Result<(), MetadataError> {
        self.check_signers(ctx)?;
        spec.validate_basic(self.codec())?;

        let contract_spec: ContractSpecification = self.require(
            &spec.specification_id.as_contract_spec_address()?,
            "contract specification",
        )?;
        validate_record_spec_against(&spec, &contract_spec)?;
        self.resolver().validate_signers_without_parties(
            ctx,
            &contract_spec.owner_addresses,
            MsgType::WriteRecordSpecification,
        )?;

        self.save(&spec.specification_id, &spec)?;
        info!(
            specification_id = %spec.specification_id,
            name = %spec.name,
            "record specification written"
        );
        Ok(())
    }

    fn delete_record_specification(
        &self,
        ctx: &mut RequestContext,
        spec_id: &MetadataAddress,
    ) -> Result<(), MetadataError> {
        check_address_type(
            "record specification id",
            spec_id,
            AddressType::RecordSpecification,
        )?;
        self.check_signers(ctx)?;
        let _existing: RecordSpecification = self.require(spec_id, "record specification")?;
        let contract_spec: ContractSpecification =
            self.require(&spec_id.as_contract_spec_address()?, "contract specification")?;
        self.resolver().validate_signers_without_parties(
            ctx,
            &contract_spec.owner_addresses,
            MsgType::DeleteRecordSpecification,
        )?;
        self.remove(spec_id.as_bytes())?;
        info!(specification_id = %spec_id, "record specification deleted");
        Ok(())
    }

    // =========================================================================
    // READS
    // =========================================================================

    fn get_scope(&self, scope_id: &MetadataAddress) -> Result<Option<Scope>, MetadataError> {
        check_address_type("scope id", scope_id, AddressType::Scope)?;
        self.load(scope_id)
    }

    fn get_session(&self, session_id: &MetadataAddress) -> Result<Option<Session>, MetadataError> {
        check_address_type("session id", session_id, AddressType::Session)?;
        self.load(session_id)
    }

    fn get_record(&self, record_id: &MetadataAddress) -> Result<Option<Record>, MetadataError> {
        check_address_type("record id", record_id, AddressType::Record)?;
        self.load(record_id)
    }

    fn get_scope_specification(
        &self,
        spec_id: &MetadataAddress,
    ) -> Result<Option<ScopeSpecification>, MetadataError> {
        check_address_type("scope specification id", spec_id, AddressType::ScopeSpecification)?;
        self.load(spec_id)
    }

    fn get_contract_specification(
        &self,
        spec_id: &MetadataAddress,
    ) -> Result<Option<ContractSpecification>, MetadataError> {
        check_address_type(
            "contract specification id",
            spec_id,
            AddressType::ContractSpecification,
        )?;
        self.load(spec_id)
    }

    fn get_record_specification(
        &self,
        spec_id: &MetadataAddress,
    ) -> Result<Option<RecordSpecification>, MetadataError> {
        check_address_type(
            "record specification id",
            spec_id,
            AddressType::RecordSpecification,
        )?;
        self.load(spec_id)
    }

    fn sessions_in_scope(&self, address: &MetadataAddress) -> Result<Vec<Session>, MetadataError> {
        self.children(&address.scope_session_iterator_prefix()?)
    }

    fn records_in_scope(&self, address: &MetadataAddress) -> Result<Vec<Record>, MetadataError> {
        self.children(&address.scope_record_iterator_prefix()?)
    }

    fn record_specs_for_contract_spec(
        &self,
        address: &MetadataAddress,
    ) -> Result<Vec<RecordSpecification>, MetadataError> {
        self.children(&address.contract_spec_record_spec_iterator_prefix()?)
    }
}
