//! End-to-end flows through `MetadataService` over the in-memory adapters.

use anyhow::Result;
use pm_metadata::adapters::{MemoryAccountInspector, MemoryAuthorizationProvider, MemoryMetadataStore};
use pm_metadata::{
    contract_spec_address, record_address, record_spec_address, scope_address,
    scope_spec_address, session_address, AccountAddress, AccountCodec, Authorization,
    Bech32AccountCodec, ContractSpecSource, ContractSpecification, DefinitionType, Description,
    InMemoryMetadataService, InputSpecSource, InputSpecification, MetadataApi, MetadataConfig,
    MetadataError, MetadataService, MsgType, Party, PartyType, Process, ProcessId, Record,
    RecordInput, RecordInputSource, RecordInputStatus, RecordOutput, RecordSpecification,
    RequestContext, ResultStatus, Scope, ScopeSpecification, Session,
};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// =============================================================================
// FIXTURES
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn acc(n: u8) -> AccountAddress {
    AccountAddress::from([n; 20])
}

fn addr(n: u8) -> String {
    Bech32AccountCodec::new("pb").encode(&acc(n)).unwrap()
}

fn signed_by(signers: &[u8]) -> RequestContext {
    RequestContext::new(signers.iter().map(|n| addr(*n)).collect())
}

/// Ids of one complete spec/instance tree.
struct World {
    svc: InMemoryMetadataService,
    contract_uuid: Uuid,
    scope_spec_id: pm_metadata::MetadataAddress,
    scope_uuid: Uuid,
    session_uuid: Uuid,
}

impl World {
    fn new() -> Self {
        init_tracing();
        let svc = MetadataService::new(
            MemoryMetadataStore::new(),
            MemoryAuthorizationProvider::new(),
            MemoryAccountInspector::new(),
            MetadataConfig::default(),
        )
        .unwrap();
        Self {
            svc,
            contract_uuid: Uuid::new_v4(),
            scope_spec_id: scope_spec_address(&Uuid::new_v4()),
            scope_uuid: Uuid::new_v4(),
            session_uuid: Uuid::new_v4(),
        }
    }

    fn contract_spec(&self, roles: Vec<PartyType>) -> ContractSpecification {
        ContractSpecification {
            specification_id: contract_spec_address(&self.contract_uuid),
            description: Some(Description {
                name: "loan contract".into(),
                description: "originates loans".into(),
                website_url: "https://example.com".into(),
                icon_url: String::new(),
            }),
            owner_addresses: vec![addr(1)],
            parties_involved: roles,
            source: ContractSpecSource::Hash("c0ffee".into()),
            class_name: "io.example.Loan".into(),
        }
    }

    fn scope_spec(&self) -> ScopeSpecification {
        ScopeSpecification {
            specification_id: self.scope_spec_id.clone(),
            description: Some(Description::new("loan pool")),
            owner_addresses: vec![addr(1)],
            parties_involved: vec![PartyType::Owner],
            contract_spec_ids: vec![contract_spec_address(&self.contract_uuid)],
        }
    }

    fn record_spec(&self, name: &str, responsible: Vec<PartyType>) -> RecordSpecification {
        RecordSpecification {
            specification_id: record_spec_address(&self.contract_uuid, name),
            name: name.into(),
            inputs: vec![InputSpecification {
                name: "application".into(),
                type_name: "io.example.Application".into(),
                source: InputSpecSource::Hash("app-hash".into()),
            }],
            type_name: "io.example.Loan".into(),
            result_type: DefinitionType::Record,
            responsible_parties: responsible,
        }
    }

    fn scope(&self, owners: Vec<Party>) -> Scope {
        Scope::new(scope_address(&self.scope_uuid), self.scope_spec_id.clone(), owners)
    }

    fn session(&self, parties: Vec<Party>) -> Session {
        Session::new(
            session_address(&self.scope_uuid, &self.session_uuid),
            contract_spec_address(&self.contract_uuid),
            parties,
            "origination",
        )
    }

    fn record(&self, name: &str) -> Record {
        Record {
            name: name.into(),
            session_id: session_address(&self.scope_uuid, &self.session_uuid),
            process: Process::new(ProcessId::Hash("proc-hash".into()), "originate", "run"),
            inputs: vec![RecordInput {
                name: "application".into(),
                source: RecordInputSource::Hash("app-hash".into()),
                type_name: "io.example.Application".into(),
                status: RecordInputStatus::Proposed,
            }],
            outputs: vec![RecordOutput {
                hash: "loan-hash".into(),
                status: ResultStatus::Pass,
            }],
            specification_id: pm_metadata::MetadataAddress::empty(),
        }
    }

    /// Write the three specifications, signed by account 1.
    fn write_specs(&self, contract_roles: Vec<PartyType>, record_roles: Vec<PartyType>) -> Result<()> {
        let mut ctx = signed_by(&[1]);
        self.svc
            .write_contract_specification(&mut ctx, self.contract_spec(contract_roles))?;
        self.svc.write_scope_specification(&mut ctx, self.scope_spec())?;
        self.svc
            .write_record_specification(&mut ctx, self.record_spec("loan", record_roles))?;
        Ok(())
    }
}

fn owner(n: u8) -> Party {
    Party::new(addr(n), PartyType::Owner)
}

// =============================================================================
// FULL LIFECYCLE
// =============================================================================

/// Test: specs, scope, session and record round-trip and cascade on delete.
#[test]
fn test_full_lifecycle() -> Result<()> {
    let w = World::new();
    w.write_specs(vec![PartyType::Owner], vec![PartyType::Owner])?;

    let mut ctx = signed_by(&[1]);
    w.svc.write_scope(&mut ctx, w.scope(vec![owner(1)]))?;
    w.svc.write_session(&mut ctx, w.session(vec![owner(1)]))?;
    w.svc.write_record(&mut ctx, w.record("loan"))?;

    let scope_id = scope_address(&w.scope_uuid);
    assert!(w.svc.get_scope(&scope_id)?.is_some());
    assert_eq!(w.svc.sessions_in_scope(&scope_id)?.len(), 1);

    let records = w.svc.records_in_scope(&scope_id)?;
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].specification_id,
        record_spec_address(&w.contract_uuid, "loan")
    );
    let record_id = record_address(&w.scope_uuid, "loan");
    assert_eq!(w.svc.get_record(&record_id)?, Some(records[0].clone()));

    w.svc.delete_scope(&mut ctx, &scope_id)?;
    assert!(w.svc.get_scope(&scope_id)?.is_none());
    assert!(w.svc.get_record(&record_id)?.is_none());
    assert!(w.svc.sessions_in_scope(&scope_id)?.is_empty());
    Ok(())
}

/// Test: session audit fields track creator, updater and version.
#[test]
fn test_session_audit_fields() -> Result<()> {
    let w = World::new();
    w.write_specs(vec![PartyType::Owner], vec![PartyType::Owner])?;
    let mut ctx = signed_by(&[1, 2]);
    w.svc.write_scope(&mut ctx, w.scope(vec![owner(1), owner(2)]))?;
    w.svc.write_session(&mut ctx, w.session(vec![owner(1)]))?;
    let id = session_address(&w.scope_uuid, &w.session_uuid);
    let audit = w.svc.get_session(&id)?.and_then(|s| s.audit).unwrap();
    assert_eq!(audit.created_by, addr(1));
    assert_eq!(audit.version, 0);

    let mut update = w.session(vec![owner(1)]);
    update.audit = Some(pm_metadata::AuditFields {
        message: "second pass".into(),
        ..Default::default()
    });
    let mut ctx = signed_by(&[2, 1]);
    w.svc.write_session(&mut ctx, update)?;
    let audit = w.svc.get_session(&id)?.and_then(|s| s.audit).unwrap();
    assert_eq!(audit.created_by, addr(1));
    assert_eq!(audit.updated_by, addr(2));
    assert_eq!(audit.version, 1);
    assert_eq!(audit.message, "second pass");
    Ok(())
}

/// Test: an over-long audit message is rejected.
#[test]
fn test_session_audit_message_limit() -> Result<()> {
    let w = World::new();
    w.write_specs(vec![PartyType::Owner], vec![PartyType::Owner])?;
    let mut ctx = signed_by(&[1]);
    w.svc.write_scope(&mut ctx, w.scope(vec![owner(1)]))?;

    let mut session = w.session(vec![owner(1)]);
    session.audit = Some(pm_metadata::AuditFields {
        message: "m".repeat(201),
        ..Default::default()
    });
    assert!(matches!(
        w.svc.write_session(&mut ctx, session),
        Err(MetadataError::InvalidField { entity: "session", .. })
    ));
    Ok(())
}

// =============================================================================
// SIGNERS AND DELEGATION
// =============================================================================

/// Test: scope updates need the existing owners, not the proposed ones.
#[test]
fn test_scope_update_requires_existing_owners() -> Result<()> {
    let w = World::new();
    w.write_specs(vec![PartyType::Owner], vec![PartyType::Owner])?;
    w.svc.write_scope(&mut signed_by(&[1]), w.scope(vec![owner(1)]))?;

    let takeover = w.scope(vec![owner(2)]);
    assert!(matches!(
        w.svc.write_scope(&mut signed_by(&[2]), takeover.clone()),
        Err(MetadataError::UnauthorizedSigner(_))
    ));
    w.svc.write_scope(&mut signed_by(&[1]), takeover)?;
    let stored = w.svc.get_scope(&scope_address(&w.scope_uuid))?.unwrap();
    assert_eq!(stored.owner_addresses(), vec![addr(2)]);
    Ok(())
}

/// Test: changing the value owner needs the previous value owner to sign.
#[test]
fn test_value_owner_change_needs_previous_value_owner() -> Result<()> {
    let w = World::new();
    w.write_specs(vec![PartyType::Owner], vec![PartyType::Owner])?;
    w.svc.write_scope(
        &mut signed_by(&[1]),
        w.scope(vec![owner(1)]).with_value_owner(addr(5)),
    )?;

    let moved = w.scope(vec![owner(1)]).with_value_owner(addr(6));
    assert!(matches!(
        w.svc.write_scope(&mut signed_by(&[1]), moved.clone()),
        Err(MetadataError::UnauthorizedSigner(_))
    ));
    w.svc.write_scope(&mut signed_by(&[1, 5]), moved)?;
    Ok(())
}

/// Test: a delegated write succeeds and the parent-type grant covers records.
#[test]
fn test_delegated_session_and_record_writes() -> Result<()> {
    let w = World::new();
    w.write_specs(vec![PartyType::Owner], vec![PartyType::Owner])?;
    w.svc.write_scope(&mut signed_by(&[1, 2]), w.scope(vec![owner(1), owner(2)]))?;

    // Account 2 lets account 1 write sessions (and therefore records) for it.
    w.svc.authz().grant(Authorization::new(
        acc(1),
        acc(2),
        MsgType::WriteSession.type_url(),
    ));

    let mut ctx = signed_by(&[1]);
    w.svc.write_session(&mut ctx, w.session(vec![owner(1)]))?;
    w.svc.write_record(&mut ctx, w.record("loan"))?;

    // DeleteRecord falls back to DeleteScope, which was never granted.
    assert!(matches!(
        w.svc
            .delete_record(&mut ctx, &record_address(&w.scope_uuid, "loan")),
        Err(MetadataError::UnauthorizedSigner(_))
    ));
    Ok(())
}

/// Test: reusing a context across requests after reset re-queries the provider.
#[test]
fn test_context_reset_between_requests() -> Result<()> {
    let w = World::new();
    w.write_specs(vec![PartyType::Owner], vec![PartyType::Owner])?;
    w.svc.write_scope(&mut signed_by(&[1, 2]), w.scope(vec![owner(1), owner(2)]))?;
    w.svc.authz().grant(Authorization::new(
        acc(1),
        acc(2),
        MsgType::WriteSession.type_url(),
    ));

    let mut ctx = signed_by(&[1]);
    w.svc.write_session(&mut ctx, w.session(vec![owner(1)]))?;
    let lookups = w.svc.authz().lookups();
    w.svc.write_session(&mut ctx, w.session(vec![owner(1)]))?;
    assert_eq!(w.svc.authz().lookups(), lookups);

    ctx.reset(vec![addr(1)]);
    w.svc
        .authz()
        .revoke(&acc(1), &acc(2), &MsgType::WriteSession.type_url());
    assert!(w.svc.write_session(&mut ctx, w.session(vec![owner(1)])).is_err());
    Ok(())
}

/// Test: with party rollup, claimed session parties must sign.
#[test]
fn test_party_rollup_session() -> Result<()> {
    let w = World::new();
    w.write_specs(
        vec![PartyType::Owner, PartyType::Servicer],
        vec![PartyType::Servicer],
    )?;
    w.svc.write_scope(
        &mut signed_by(&[1]),
        w.scope(vec![owner(1)]).with_party_rollup(true),
    )?;

    let parties = vec![owner(1), Party::optional(addr(3), PartyType::Servicer)];
    assert!(matches!(
        w.svc.write_session(&mut signed_by(&[1]), w.session(parties.clone())),
        Err(MetadataError::UnauthorizedSigner(_))
    ));

    let mut ctx = signed_by(&[1, 3]);
    w.svc.write_session(&mut ctx, w.session(parties))?;
    w.svc.write_record(&mut ctx, w.record("loan"))?;

    // Without anyone able to fill SERVICER the role pass fails.
    assert!(matches!(
        w.svc.write_session(&mut signed_by(&[1]), w.session(vec![owner(1)])),
        Err(MetadataError::InvalidParty(_))
    ));
    Ok(())
}

/// Test: without rollup, contract specification roles must be present among the parties.
#[test]
fn test_roles_required_without_rollup() -> Result<()> {
    let w = World::new();
    w.write_specs(
        vec![PartyType::Owner, PartyType::Servicer],
        vec![PartyType::Owner],
    )?;
    let mut ctx = signed_by(&[1]);
    w.svc.write_scope(&mut ctx, w.scope(vec![owner(1)]))?;
    assert!(matches!(
        w.svc.write_session(&mut ctx, w.session(vec![owner(1)])),
        Err(MetadataError::InvalidParty(_))
    ));
    w.svc.write_session(
        &mut ctx,
        w.session(vec![owner(1), Party::new(addr(3), PartyType::Servicer)]),
    )?;
    Ok(())
}

// =============================================================================
// CROSS-ENTITY RULES
// =============================================================================

/// Test: sessions must use a contract spec the scope spec allows.
#[test]
fn test_session_contract_spec_must_be_allowed() -> Result<()> {
    let w = World::new();
    w.write_specs(vec![PartyType::Owner], vec![PartyType::Owner])?;
    let mut ctx = signed_by(&[1]);
    w.svc.write_scope(&mut ctx, w.scope(vec![owner(1)]))?;

    let other = Uuid::new_v4();
    let mut spec = w.contract_spec(vec![PartyType::Owner]);
    spec.specification_id = contract_spec_address(&other);
    w.svc.write_contract_specification(&mut ctx, spec)?;

    let mut session = w.session(vec![owner(1)]);
    session.specification_id = contract_spec_address(&other);
    assert!(matches!(
        w.svc.write_session(&mut ctx, session),
        Err(MetadataError::InvalidField { entity: "session", .. })
    ));
    Ok(())
}

/// Test: records referencing themselves or missing inputs are rejected.
#[test]
fn test_record_input_references() -> Result<()> {
    let w = World::new();
    w.write_specs(vec![PartyType::Owner], vec![PartyType::Owner])?;
    let mut ctx = signed_by(&[1]);

    let mut spec = w.record_spec("loan", vec![PartyType::Owner]);
    let self_id = record_address(&w.scope_uuid, "loan");
    spec.inputs[0].source = InputSpecSource::RecordId(self_id.clone());
    w.svc.write_record_specification(&mut ctx, spec)?;
    w.svc.write_scope(&mut ctx, w.scope(vec![owner(1)]))?;
    w.svc.write_session(&mut ctx, w.session(vec![owner(1)]))?;

    let mut record = w.record("loan");
    record.inputs[0].source = RecordInputSource::RecordId(self_id);
    record.inputs[0].status = RecordInputStatus::Record;
    assert!(matches!(
        w.svc.write_record(&mut ctx, record),
        Err(MetadataError::DuplicateParty(_))
    ));

    let mut spec = w.record_spec("summary", vec![PartyType::Owner]);
    let missing = record_address(&w.scope_uuid, "never-written");
    spec.inputs[0].source = InputSpecSource::RecordId(missing.clone());
    w.svc.write_record_specification(&mut ctx, spec)?;
    let mut record = w.record("summary");
    record.inputs[0].source = RecordInputSource::RecordId(missing);
    record.inputs[0].status = RecordInputStatus::Record;
    assert!(matches!(
        w.svc.write_record(&mut ctx, record),
        Err(MetadataError::NotFound(_))
    ));
    Ok(())
}

/// Test: record specs need their contract spec and its owners.
#[test]
fn test_record_spec_governed_by_contract_spec() -> Result<()> {
    let w = World::new();
    let mut ctx = signed_by(&[1]);
    assert!(matches!(
        w.svc
            .write_record_specification(&mut ctx, w.record_spec("loan", vec![PartyType::Owner])),
        Err(MetadataError::NotFound(_))
    ));

    w.svc
        .write_contract_specification(&mut ctx, w.contract_spec(vec![PartyType::Owner]))?;
    assert!(matches!(
        w.svc.write_record_specification(
            &mut signed_by(&[2]),
            w.record_spec("loan", vec![PartyType::Owner])
        ),
        Err(MetadataError::UnauthorizedSigner(_))
    ));
    w.svc
        .write_record_specification(&mut ctx, w.record_spec("loan", vec![PartyType::Owner]))?;
    w.svc
        .write_record_specification(&mut ctx, w.record_spec("fee", vec![PartyType::Owner]))?;

    let cs_id = contract_spec_address(&w.contract_uuid);
    assert_eq!(w.svc.record_specs_for_contract_spec(&cs_id)?.len(), 2);

    w.svc.delete_contract_specification(&mut ctx, &cs_id)?;
    assert!(w.svc.record_specs_for_contract_spec(&cs_id)?.is_empty());
    assert!(w.svc.get_contract_specification(&cs_id)?.is_none());
    Ok(())
}

// =============================================================================
// SCOPE CHANGES
// =============================================================================

/// Test: data access entries can be added once and removed once.
#[test]
fn test_scope_data_access() -> Result<()> {
    let w = World::new();
    w.write_specs(vec![PartyType::Owner], vec![PartyType::Owner])?;
    let mut ctx = signed_by(&[1]);
    let scope_id = scope_address(&w.scope_uuid);
    w.svc.write_scope(&mut ctx, w.scope(vec![owner(1)]))?;

    w.svc.add_scope_data_access(&mut ctx, &scope_id, vec![addr(7), addr(8)])?;
    assert!(w
        .svc
        .add_scope_data_access(&mut ctx, &scope_id, vec![addr(7)])
        .is_err());
    assert!(w
        .svc
        .add_scope_data_access(&mut ctx, &scope_id, vec!["nope".into()])
        .is_err());

    w.svc.delete_scope_data_access(&mut ctx, &scope_id, vec![addr(7)])?;
    assert!(w
        .svc
        .delete_scope_data_access(&mut ctx, &scope_id, vec![addr(7)])
        .is_err());
    assert_eq!(w.svc.get_scope(&scope_id)?.unwrap().data_access, vec![addr(8)]);

    // Non-owners cannot change data access.
    assert!(matches!(
        w.svc
            .add_scope_data_access(&mut signed_by(&[2]), &scope_id, vec![addr(9)]),
        Err(MetadataError::UnauthorizedSigner(_))
    ));
    Ok(())
}

/// Test: owners can be added and removed, keeping the scope specification roles satisfied.
#[test]
fn test_scope_owner_changes() -> Result<()> {
    let w = World::new();
    w.write_specs(vec![PartyType::Owner], vec![PartyType::Owner])?;
    let mut ctx = signed_by(&[1]);
    let scope_id = scope_address(&w.scope_uuid);
    w.svc.write_scope(&mut ctx, w.scope(vec![owner(1)]))?;

    w.svc.add_scope_owners(&mut ctx, &scope_id, vec![owner(2)])?;
    assert!(matches!(
        w.svc.add_scope_owners(&mut signed_by(&[1, 2]), &scope_id, vec![owner(2)]),
        Err(MetadataError::DuplicateParty(_))
    ));

    // Both owners must now approve.
    assert!(w
        .svc
        .delete_scope_owners(&mut ctx, &scope_id, vec![addr(2)])
        .is_err());
    let mut both = signed_by(&[1, 2]);
    w.svc.delete_scope_owners(&mut both, &scope_id, vec![addr(2)])?;

    // Removing the last owner leaves no owners.
    assert!(matches!(
        w.svc.delete_scope_owners(&mut ctx, &scope_id, vec![addr(1)]),
        Err(MetadataError::InvalidField { .. })
    ));
    Ok(())
}

/// Test: deleting a scope needs the value owner when one is set.
#[test]
fn test_delete_scope_needs_value_owner() -> Result<()> {
    let w = World::new();
    w.write_specs(vec![PartyType::Owner], vec![PartyType::Owner])?;
    let scope_id = scope_address(&w.scope_uuid);
    w.svc.write_scope(
        &mut signed_by(&[1]),
        w.scope(vec![owner(1)]).with_value_owner(addr(5)),
    )?;
    assert!(w.svc.delete_scope(&mut signed_by(&[1]), &scope_id).is_err());
    w.svc.delete_scope(&mut signed_by(&[1, 5]), &scope_id)?;
    assert!(w.svc.get_scope(&scope_id)?.is_none());
    Ok(())
}

/// Test: smart-contract owners need the PROVENANCE role under rollup.
#[test]
fn test_smart_contract_owner_needs_provenance_role() -> Result<()> {
    let w = World::new();
    let mut spec_ctx = signed_by(&[1]);
    let mut scope_spec = w.scope_spec();
    scope_spec.parties_involved = vec![PartyType::Provenance];
    w.svc.write_scope_specification(&mut spec_ctx, scope_spec)?;
    w.svc.inspector().add_contract(acc(9));

    let wrong_role = w
        .scope(vec![Party::new(addr(9), PartyType::Owner)])
        .with_party_rollup(true);
    assert!(matches!(
        w.svc.write_scope(&mut signed_by(&[9]), wrong_role),
        Err(MetadataError::InvalidParty(_))
    ));

    let provenance = w
        .scope(vec![Party::new(addr(9), PartyType::Provenance)])
        .with_party_rollup(true);
    w.svc.write_scope(&mut signed_by(&[9]), provenance)?;
    Ok(())
}

/// Test: a malformed id on a delete is a typed error, not a panic.
#[test]
fn test_malformed_ids_are_rejected() {
    let w = World::new();
    let mut ctx = signed_by(&[1]);
    let bad = pm_metadata::MetadataAddress::from_raw(vec![0x00, 0xAA]);
    assert!(matches!(
        w.svc.delete_scope(&mut ctx, &bad),
        Err(MetadataError::MalformedAddress { .. })
    ));
    assert!(matches!(
        w.svc
            .delete_record(&mut ctx, &scope_address(&Uuid::new_v4())),
        Err(MetadataError::PrefixMismatch { .. })
    ));
}

/// Test: scope addresses are checked before any related entity is loaded.
#[test]
fn test_write_scope_checks_addresses_first() -> Result<()> {
    let w = World::new();
    w.write_specs(vec![PartyType::Owner], vec![PartyType::Owner])?;
    let mut ctx = signed_by(&[1]);

    // An existing contract spec id in the scope spec slot is a type error.
    let mut scope = w.scope(vec![owner(1)]);
    scope.specification_id = contract_spec_address(&w.contract_uuid);
    assert!(matches!(
        w.svc.write_scope(&mut ctx, scope),
        Err(MetadataError::PrefixMismatch { .. })
    ));

    let mut scope = w.scope(vec![owner(1)]);
    scope.specification_id = pm_metadata::MetadataAddress::from_raw(vec![0x09, 1, 2]);
    assert!(matches!(
        w.svc.write_scope(&mut ctx, scope),
        Err(MetadataError::MalformedAddress { .. })
    ));

    let mut scope = w.scope(vec![owner(1)]);
    scope.scope_id = pm_metadata::MetadataAddress::from_raw(vec![0x00, 1]);
    assert!(matches!(
        w.svc.write_scope(&mut ctx, scope),
        Err(MetadataError::MalformedAddress { .. })
    ));
    assert!(w.svc.get_scope(&scope_address(&w.scope_uuid))?.is_none());
    Ok(())
}

/// Test: owners are removed by account, whatever the address casing.
#[test]
fn test_delete_scope_owner_by_account() -> Result<()> {
    let w = World::new();
    w.write_specs(vec![PartyType::Owner], vec![PartyType::Owner])?;
    let scope_id = scope_address(&w.scope_uuid);
    let mut both = signed_by(&[1, 2]);
    w.svc.write_scope(&mut both, w.scope(vec![owner(1), owner(2)]))?;

    w.svc
        .delete_scope_owners(&mut both, &scope_id, vec![addr(2).to_uppercase()])?;
    let stored = w.svc.get_scope(&scope_id)?.unwrap();
    assert_eq!(stored.owner_addresses(), vec![addr(1)]);

    assert!(matches!(
        w.svc
            .delete_scope_owners(&mut signed_by(&[1]), &scope_id, vec!["pb1nope".into()]),
        Err(MetadataError::InvalidParty(_))
    ));
    Ok(())
}
