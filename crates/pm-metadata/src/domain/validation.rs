//! # Entity Validation
//!
//! Stateless checks run, in order:
//! 1. Address format and type tag on every address-typed field.
//! 2. UUID / name-hash extraction where a rule needs it.
//! 3. Non-address field rules (owners, descriptions, names, statuses).
//! 4. Cross-entity consistency, in the `validate_*_against` functions.
//!
//! Every check returns the first error it hits.

use super::address::{AddressType, MetadataAddress};
use super::derivation::record_spec_address;
use super::entities::{
    ContractSpecSource, ContractSpecification, DefinitionType, Description, InputSpecSource,
    InputSpecification, ProcessId, Record, RecordInput, RecordInputSource, RecordInputStatus,
    RecordOutput, RecordSpecification, ResultStatus, Scope, ScopeSpecification, Session,
};
use super::errors::MetadataError;
use super::party::{same_partiers, validate_parties_basic, validate_role_list, Party};
use shared_types::AccountCodec;
use std::collections::BTreeSet;

// =============================================================================
// LIMITS
// =============================================================================

pub const MAX_DESCRIPTION_NAME_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_TEXT_LENGTH: usize = 5000;
pub const MAX_URL_LENGTH: usize = 2048;
pub const MAX_CLASS_NAME_LENGTH: usize = 1000;
pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_TYPE_NAME_LENGTH: usize = 1000;

const WEBSITE_PROTOCOLS: &[&str] = &["http://", "https://"];
const ICON_PROTOCOLS: &[&str] = &["http://", "https://", "data:"];

/// Field-level validation that needs nothing beyond the entity itself.
pub trait ValidateBasic {
    fn validate_basic(&self, codec: &dyn AccountCodec) -> Result<(), MetadataError>;
}

// =============================================================================
// SHARED RULES
// =============================================================================

/// `address` must be well-formed and of `expected` type.
pub fn check_address_type(
    field: &str,
    address: &MetadataAddress,
    expected: AddressType,
) -> Result<(), MetadataError> {
    let actual = address
        .validate()
        .map_err(|e| MetadataError::address(field, e))?;
    if actual != expected {
        return Err(MetadataError::PrefixMismatch {
            field: field.to_string(),
            expected: expected.hrp().to_string(),
            actual: actual.hrp().to_string(),
        });
    }
    Ok(())
}

fn check_length(
    entity: &'static str,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), MetadataError> {
    let len = value.len();
    if len < min {
        return Err(MetadataError::invalid(
            entity,
            format!("{field} cannot be empty"),
        ));
    }
    if len > max {
        return Err(MetadataError::invalid(
            entity,
            format!("{field} length {len} exceeds maximum length of {max}"),
        ));
    }
    Ok(())
}

fn check_url(
    entity: &'static str,
    field: &str,
    url: &str,
    protocols: &[&str],
) -> Result<(), MetadataError> {
    if url.is_empty() {
        return Ok(());
    }
    check_length(entity, field, url, 0, MAX_URL_LENGTH)?;
    let lower = url.to_ascii_lowercase();
    if !protocols.iter().any(|p| lower.starts_with(p)) {
        return Err(MetadataError::invalid(
            entity,
            format!("{field} must use one of the protocols {}", protocols.join(" ")),
        ));
    }
    Ok(())
}

/// Owners: at least one, each decodable, no address listed twice.
fn check_owner_addresses(
    entity: &'static str,
    owners: &[String],
    codec: &dyn AccountCodec,
) -> Result<(), MetadataError> {
    if owners.is_empty() {
        return Err(MetadataError::invalid(
            entity,
            "at least one owner address is required",
        ));
    }
    let mut seen = BTreeSet::new();
    for owner in owners {
        let acc = codec.decode(owner).map_err(|e| {
            MetadataError::InvalidParty(format!("invalid owner address [{owner}] on {entity}: {e}"))
        })?;
        if !seen.insert(acc) {
            return Err(MetadataError::DuplicateParty(format!(
                "owner address [{owner}] is listed more than once on {entity}"
            )));
        }
    }
    Ok(())
}

/// Parties: at least one, basic rules, no (address, role) pair twice.
fn check_parties(
    entity: &'static str,
    parties: &[Party],
    codec: &dyn AccountCodec,
) -> Result<(), MetadataError> {
    if parties.is_empty() {
        return Err(MetadataError::invalid(entity, "at least one party is required"));
    }
    validate_parties_basic(parties, codec)?;
    for (i, party) in parties.iter().enumerate() {
        if parties[..i].iter().any(|p| same_partiers(p, party, codec)) {
            return Err(MetadataError::DuplicateParty(format!(
                "party [{}] with role {} is listed more than once on {entity}",
                party.address, party.role
            )));
        }
    }
    Ok(())
}

fn check_account(
    entity: &'static str,
    field: &str,
    address: &str,
    codec: &dyn AccountCodec,
) -> Result<(), MetadataError> {
    codec
        .decode(address)
        .map(|_| ())
        .map_err(|e| MetadataError::invalid(entity, format!("invalid {field} [{address}]: {e}")))
}

// =============================================================================
// INSTANCES
// =============================================================================

impl ValidateBasic for Scope {
    fn validate_basic(&self, codec: &dyn AccountCodec) -> Result<(), MetadataError> {
        check_address_type("scope id", &self.scope_id, AddressType::Scope)?;
        check_address_type(
            "scope specification id",
            &self.specification_id,
            AddressType::ScopeSpecification,
        )?;
        check_parties("scope", &self.owners, codec)?;
        for reader in &self.data_access {
            check_account("scope", "data access address", reader, codec)?;
        }
        if !self.value_owner_address.is_empty() {
            check_account("scope", "value owner address", &self.value_owner_address, codec)?;
        }
        Ok(())
    }
}

impl ValidateBasic for Session {
    fn validate_basic(&self, codec: &dyn AccountCodec) -> Result<(), MetadataError> {
        check_address_type("session id", &self.session_id, AddressType::Session)?;
        check_address_type(
            "contract specification id",
            &self.specification_id,
            AddressType::ContractSpecification,
        )?;
        check_parties("session", &self.parties, codec)?;
        check_length("session", "name", &self.name, 1, MAX_NAME_LENGTH)
    }
}

fn check_record_input(input: &RecordInput) -> Result<(), MetadataError> {
    check_length("record input", "name", &input.name, 1, MAX_NAME_LENGTH)?;
    check_length(
        "record input",
        "type name",
        &input.type_name,
        1,
        MAX_TYPE_NAME_LENGTH,
    )?;
    match &input.source {
        RecordInputSource::RecordId(id) => {
            check_address_type("record input record id", id, AddressType::Record)?;
            if input.status != RecordInputStatus::Record {
                return Err(MetadataError::invalid(
                    "record input",
                    format!("input {} has a record id source but status {:?}", input.name, input.status),
                ));
            }
        }
        RecordInputSource::Hash(hash) => {
            if hash.is_empty() {
                return Err(MetadataError::invalid(
                    "record input",
                    format!("input {} has an empty hash source", input.name),
                ));
            }
            if input.status != RecordInputStatus::Proposed {
                return Err(MetadataError::invalid(
                    "record input",
                    format!("input {} has a hash source but status {:?}", input.name, input.status),
                ));
            }
        }
    }
    Ok(())
}

fn check_record_output(index: usize, output: &RecordOutput) -> Result<(), MetadataError> {
    match output.status {
        ResultStatus::Unspecified => Err(MetadataError::invalid(
            "record output",
            format!("output {index} has an unspecified status"),
        )),
        ResultStatus::Skip => Ok(()),
        ResultStatus::Pass | ResultStatus::Fail if output.hash.is_empty() => {
            Err(MetadataError::invalid(
                "record output",
                format!("output {index} requires a hash"),
            ))
        }
        ResultStatus::Pass | ResultStatus::Fail => Ok(()),
    }
}

impl ValidateBasic for Record {
    fn validate_basic(&self, codec: &dyn AccountCodec) -> Result<(), MetadataError> {
        check_address_type("record session id", &self.session_id, AddressType::Session)?;
        if !self.specification_id.is_empty() {
            check_address_type(
                "record specification id",
                &self.specification_id,
                AddressType::RecordSpecification,
            )?;
        }
        check_length("record", "name", &self.name, 1, MAX_NAME_LENGTH)?;

        match &self.process.process_id {
            ProcessId::Address(addr) => check_account("record", "process address", addr, codec)?,
            ProcessId::Hash(hash) if hash.is_empty() => {
                return Err(MetadataError::invalid("record", "process hash cannot be empty"));
            }
            ProcessId::Hash(_) => {}
        }
        check_length("record", "process name", &self.process.name, 1, MAX_NAME_LENGTH)?;
        check_length("record", "process method", &self.process.method, 1, MAX_NAME_LENGTH)?;

        self.inputs.iter().try_for_each(check_record_input)?;
        self.outputs
            .iter()
            .enumerate()
            .try_for_each(|(i, o)| check_record_output(i, o))
    }
}

// =============================================================================
// SPECIFICATIONS
// =============================================================================

impl ValidateBasic for Description {
    fn validate_basic(&self, _codec: &dyn AccountCodec) -> Result<(), MetadataError> {
        check_length(
            "description",
            "name",
            &self.name,
            1,
            MAX_DESCRIPTION_NAME_LENGTH,
        )?;
        check_length(
            "description",
            "description",
            &self.description,
            0,
            MAX_DESCRIPTION_TEXT_LENGTH,
        )?;
        check_url("description", "website url", &self.website_url, WEBSITE_PROTOCOLS)?;
        check_url("description", "icon url", &self.icon_url, ICON_PROTOCOLS)
    }
}

impl ValidateBasic for ScopeSpecification {
    fn validate_basic(&self, codec: &dyn AccountCodec) -> Result<(), MetadataError> {
        check_address_type(
            "scope specification id",
            &self.specification_id,
            AddressType::ScopeSpecification,
        )?;
        for id in &self.contract_spec_ids {
            check_address_type(
                "contract specification id",
                id,
                AddressType::ContractSpecification,
            )?;
        }
        if let Some(description) = &self.description {
            description.validate_basic(codec)?;
        }
        check_owner_addresses("scope specification", &self.owner_addresses, codec)?;
        validate_role_list("scope specification", &self.parties_involved)
    }
}

impl ValidateBasic for ContractSpecification {
    fn validate_basic(&self, codec: &dyn AccountCodec) -> Result<(), MetadataError> {
        check_address_type(
            "contract specification id",
            &self.specification_id,
            AddressType::ContractSpecification,
        )?;
        match &self.source {
            ContractSpecSource::ResourceId(id) => {
                id.validate()
                    .map_err(|e| MetadataError::address("contract specification source", e))?;
            }
            ContractSpecSource::Hash(hash) if hash.is_empty() => {
                return Err(MetadataError::invalid(
                    "contract specification",
                    "source hash cannot be empty",
                ));
            }
            ContractSpecSource::Hash(_) => {}
        }
        if let Some(description) = &self.description {
            description.validate_basic(codec)?;
        }
        check_owner_addresses("contract specification", &self.owner_addresses, codec)?;
        validate_role_list("contract specification", &self.parties_involved)?;
        check_length(
            "contract specification",
            "class name",
            &self.class_name,
            1,
            MAX_CLASS_NAME_LENGTH,
        )
    }
}

fn check_input_specification(input: &InputSpecification) -> Result<(), MetadataError> {
    check_length("input specification", "name", &input.name, 1, MAX_NAME_LENGTH)?;
    check_length(
        "input specification",
        "type name",
        &input.type_name,
        1,
        MAX_TYPE_NAME_LENGTH,
    )?;
    match &input.source {
        InputSpecSource::RecordId(id) => {
            check_address_type("input specification record id", id, AddressType::Record)
        }
        InputSpecSource::Hash(hash) if hash.is_empty() => Err(MetadataError::invalid(
            "input specification",
            format!("input {} has an empty hash source", input.name),
        )),
        InputSpecSource::Hash(_) => Ok(()),
    }
}

impl ValidateBasic for RecordSpecification {
    fn validate_basic(&self, _codec: &dyn AccountCodec) -> Result<(), MetadataError> {
        check_address_type(
            "record specification id",
            &self.specification_id,
            AddressType::RecordSpecification,
        )?;
        check_length("record specification", "name", &self.name, 1, MAX_NAME_LENGTH)?;

        let contract_spec_uuid = self.specification_id.contract_spec_uuid()?;
        let expected = record_spec_address(&contract_spec_uuid, &self.name);
        if expected != self.specification_id {
            return Err(MetadataError::invalid(
                "record specification",
                format!(
                    "id {} does not match name {:?} (expected {expected})",
                    self.specification_id, self.name
                ),
            ));
        }

        let mut names = BTreeSet::new();
        for input in &self.inputs {
            check_input_specification(input)?;
            if !names.insert(input.name.as_str()) {
                return Err(MetadataError::invalid(
                    "record specification",
                    format!("input name {:?} is listed more than once", input.name),
                ));
            }
        }
        check_length(
            "record specification",
            "type name",
            &self.type_name,
            1,
            MAX_TYPE_NAME_LENGTH,
        )?;
        if self.result_type == DefinitionType::Unspecified {
            return Err(MetadataError::invalid(
                "record specification",
                "result type cannot be unspecified",
            ));
        }
        validate_role_list("record specification", &self.responsible_parties)
    }
}

// =============================================================================
// CROSS-ENTITY RULES
// =============================================================================

/// The record spec must live under `contract_spec`.
pub fn validate_record_spec_against(
    record_spec: &RecordSpecification,
    contract_spec: &ContractSpecification,
) -> Result<(), MetadataError> {
    let own = record_spec.specification_id.contract_spec_uuid()?;
    let parent = contract_spec.specification_id.contract_spec_uuid()?;
    if own != parent {
        return Err(MetadataError::invalid(
            "record specification",
            format!(
                "contract specification uuid {own} does not match parent {}",
                contract_spec.specification_id
            ),
        ));
    }
    Ok(())
}

/// The session must sit in `scope` and use a contract spec its scope spec allows.
pub fn validate_session_against(
    session: &Session,
    scope: &Scope,
    scope_spec: &ScopeSpecification,
) -> Result<(), MetadataError> {
    if session.session_id.scope_uuid()? != scope.scope_id.scope_uuid()? {
        return Err(MetadataError::invalid(
            "session",
            format!("session {} is not in scope {}", session.session_id, scope.scope_id),
        ));
    }
    if !scope_spec.contract_spec_ids.contains(&session.specification_id) {
        return Err(MetadataError::invalid(
            "session",
            format!(
                "contract specification {} is not allowed by scope specification {}",
                session.specification_id, scope_spec.specification_id
            ),
        ));
    }
    Ok(())
}

fn input_matches_spec(input: &RecordInput, spec: &InputSpecification) -> Result<(), MetadataError> {
    if input.type_name != spec.type_name {
        return Err(MetadataError::invalid(
            "record",
            format!(
                "input {} has type {:?}, specification expects {:?}",
                input.name, input.type_name, spec.type_name
            ),
        ));
    }
    let matches = match (&input.source, &spec.source) {
        (RecordInputSource::RecordId(a), InputSpecSource::RecordId(b)) => a == b,
        (RecordInputSource::Hash(a), InputSpecSource::Hash(b)) => a == b,
        _ => false,
    };
    if !matches {
        return Err(MetadataError::invalid(
            "record",
            format!("input {} source does not match its specification", input.name),
        ));
    }
    Ok(())
}

/// The record must fit its session and satisfy its record specification.
pub fn validate_record_against(
    record: &Record,
    session: &Session,
    record_spec: &RecordSpecification,
) -> Result<(), MetadataError> {
    if record.session_id != session.session_id {
        return Err(MetadataError::invalid(
            "record",
            format!("record session {} does not match {}", record.session_id, session.session_id),
        ));
    }

    let expected_spec = session.specification_id.as_record_spec_address(&record.name)?;
    if record_spec.specification_id != expected_spec {
        return Err(MetadataError::invalid(
            "record",
            format!(
                "record specification {} does not match expected {expected_spec}",
                record_spec.specification_id
            ),
        ));
    }
    if !record.specification_id.is_empty() && record.specification_id != expected_spec {
        return Err(MetadataError::invalid(
            "record",
            format!(
                "record specification id {} does not match expected {expected_spec}",
                record.specification_id
            ),
        ));
    }

    let own_address = record.record_address()?;
    for input in &record.inputs {
        if matches!(&input.source, RecordInputSource::RecordId(id) if *id == own_address) {
            return Err(MetadataError::DuplicateParty(format!(
                "record {own_address} cannot reference itself as input {}",
                input.name
            )));
        }
    }

    if record.inputs.len() != record_spec.inputs.len() {
        return Err(MetadataError::invalid(
            "record",
            format!(
                "expected {} inputs, got {}",
                record_spec.inputs.len(),
                record.inputs.len()
            ),
        ));
    }
    for input in &record.inputs {
        let spec = record_spec
            .inputs
            .iter()
            .find(|s| s.name == input.name)
            .ok_or_else(|| {
                MetadataError::invalid(
                    "record",
                    format!("input {} is not in the record specification", input.name),
                )
            })?;
        input_matches_spec(input, spec)?;
    }

    let outputs = record.outputs.len();
    let ok = match record_spec.result_type {
        DefinitionType::RecordList => outputs >= 1,
        _ => outputs == 1,
    };
    if !ok {
        return Err(MetadataError::invalid(
            "record",
            format!(
                "result type {:?} does not allow {outputs} outputs",
                record_spec.result_type
            ),
        ));
    }
    Ok(())
}
