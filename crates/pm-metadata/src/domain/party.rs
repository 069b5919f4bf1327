//! # Parties
//!
//! Participants on scopes and sessions, and the per-request resolution state
//! used to reconcile a specification's required roles with the parties a
//! request actually supplies.
//!
//! ## Resolution Pass
//!
//! 1. [`build_party_details`] merges available and required parties into one
//!    deduplicated list (available first, then required-only entries).
//! 2. [`find_missing_roles`] walks the list left to right per required role and
//!    claims the first still-usable match.
//! 3. The signer resolver checks every required or claimed entry for a
//!    signature.
//!
//! `PartyDetails` values live for exactly one pass and are then discarded.

use super::errors::MetadataError;
use serde::{Deserialize, Serialize};
use shared_types::{AccountAddress, AccountCodec};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// PARTY TYPE
// =============================================================================

/// Role a party plays on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum PartyType {
    #[default]
    Unspecified = 0,
    Originator = 1,
    Servicer = 2,
    Investor = 3,
    Custodian = 4,
    Owner = 5,
    Affiliate = 6,
    Omnibus = 7,
    /// Reserved for smart-contract accounts.
    Provenance = 8,
    Controller = 10,
    Validator = 11,
}

impl PartyType {
    /// Every role, including `Unspecified`.
    pub const ALL: [PartyType; 11] = [
        PartyType::Unspecified,
        PartyType::Originator,
        PartyType::Servicer,
        PartyType::Investor,
        PartyType::Custodian,
        PartyType::Owner,
        PartyType::Affiliate,
        PartyType::Omnibus,
        PartyType::Provenance,
        PartyType::Controller,
        PartyType::Validator,
    ];

    /// Numeric wire value.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Look up a role by numeric value.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.code() == code)
    }

    /// Upper-case short name, e.g. `OWNER`.
    pub const fn name(self) -> &'static str {
        match self {
            PartyType::Unspecified => "UNSPECIFIED",
            PartyType::Originator => "ORIGINATOR",
            PartyType::Servicer => "SERVICER",
            PartyType::Investor => "INVESTOR",
            PartyType::Custodian => "CUSTODIAN",
            PartyType::Owner => "OWNER",
            PartyType::Affiliate => "AFFILIATE",
            PartyType::Omnibus => "OMNIBUS",
            PartyType::Provenance => "PROVENANCE",
            PartyType::Controller => "CONTROLLER",
            PartyType::Validator => "VALIDATOR",
        }
    }
}

impl fmt::Display for PartyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PartyType {
    type Err = MetadataError;

    /// Accepts `OWNER`, `owner` or `PARTY_TYPE_OWNER`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let short = upper.strip_prefix("PARTY_TYPE_").unwrap_or(&upper);
        Self::ALL
            .into_iter()
            .find(|role| role.name() == short)
            .ok_or_else(|| MetadataError::InvalidParty(format!("unknown party type {s:?}")))
    }
}

// =============================================================================
// PARTY
// =============================================================================

/// A participant's claim on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Party {
    /// Account identifier string.
    pub address: String,
    pub role: PartyType,
    /// Optional parties may fill a role but are not required to sign.
    pub optional: bool,
}

impl Party {
    /// A required party.
    pub fn new(address: impl Into<String>, role: PartyType) -> Self {
        Self {
            address: address.into(),
            role,
            optional: false,
        }
    }

    /// An optional party.
    pub fn optional(address: impl Into<String>, role: PartyType) -> Self {
        Self {
            optional: true,
            ..Self::new(address, role)
        }
    }

    /// Address must decode and the role must be specified.
    pub fn validate_basic(&self, codec: &dyn AccountCodec) -> Result<(), MetadataError> {
        codec.decode(&self.address).map_err(|e| {
            MetadataError::InvalidParty(format!("invalid party address [{}]: {e}", self.address))
        })?;
        if self.role == PartyType::Unspecified {
            return Err(MetadataError::InvalidParty(
                "invalid party type; party type not specified".to_string(),
            ));
        }
        Ok(())
    }
}

/// Address/role accessors shared by [`Party`] and [`PartyDetails`].
pub trait Partier {
    fn address(&self) -> &str;
    fn role(&self) -> PartyType;
    fn is_optional(&self) -> bool;

    /// Already-decoded account bytes, when the implementor has them.
    fn decoded_account(&self) -> Option<&AccountAddress> {
        None
    }
}

impl Partier for Party {
    fn address(&self) -> &str {
        &self.address
    }

    fn role(&self) -> PartyType {
        self.role
    }

    fn is_optional(&self) -> bool {
        self.optional
    }
}

/// True when both partiers have the same role and the same address.
///
/// Addresses are compared as decoded account bytes when both decode, and as
/// raw strings otherwise.
pub fn same_partiers<A, B>(a: &A, b: &B, codec: &dyn AccountCodec) -> bool
where
    A: Partier + ?Sized,
    B: Partier + ?Sized,
{
    a.role() == b.role() && same_address(a, b, codec)
}

fn same_address<A, B>(a: &A, b: &B, codec: &dyn AccountCodec) -> bool
where
    A: Partier + ?Sized,
    B: Partier + ?Sized,
{
    let acc_a = a
        .decoded_account()
        .cloned()
        .or_else(|| codec.decode(a.address()).ok());
    let acc_b = b
        .decoded_account()
        .cloned()
        .or_else(|| codec.decode(b.address()).ok());
    match (acc_a, acc_b) {
        (Some(x), Some(y)) => x == y,
        _ => a.address() == b.address(),
    }
}

// =============================================================================
// PARTY DETAILS
// =============================================================================

/// Mutable view of one party during a single resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyDetails {
    address: String,
    role: PartyType,
    optional: bool,
    acc: Option<AccountAddress>,

    signer: Option<String>,
    signer_acc: Option<AccountAddress>,

    can_be_used_by_spec: bool,
    used_by_spec: bool,
}

impl PartyDetails {
    fn new(
        party: &dyn Partier,
        optional: bool,
        can_be_used_by_spec: bool,
        codec: &dyn AccountCodec,
    ) -> Self {
        Self {
            address: party.address().to_string(),
            role: party.role(),
            optional,
            acc: codec.decode(party.address()).ok(),
            signer: None,
            signer_acc: None,
            can_be_used_by_spec,
            used_by_spec: false,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Decoded account, if the address decodes.
    pub fn acc(&self) -> Option<&AccountAddress> {
        self.acc.as_ref()
    }

    pub fn role(&self) -> PartyType {
        self.role
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Flip to required. There is no way back.
    pub fn make_required(&mut self) {
        self.optional = false;
    }

    /// Required parties must sign: non-optional ones, and any claimed for a role.
    pub fn is_required(&self) -> bool {
        !self.optional || self.used_by_spec
    }

    pub fn signer(&self) -> Option<&str> {
        self.signer.as_deref()
    }

    pub fn signer_acc(&self) -> Option<&AccountAddress> {
        self.signer_acc.as_ref()
    }

    pub fn has_signer(&self) -> bool {
        self.signer.is_some()
    }

    /// Record the account credited with signing for this party.
    pub fn set_signer(&mut self, signer: impl Into<String>, signer_acc: Option<AccountAddress>) {
        self.signer = Some(signer.into());
        self.signer_acc = signer_acc;
    }

    /// True if this entry came from the available parties and may fill a role.
    pub fn can_be_used_by_spec(&self) -> bool {
        self.can_be_used_by_spec
    }

    /// Claim this entry for a role. One-directional.
    pub fn mark_as_used(&mut self) {
        self.used_by_spec = true;
    }

    pub fn is_used(&self) -> bool {
        self.used_by_spec
    }

    /// Still available to fill `role`.
    pub fn is_still_usable_as(&self, role: PartyType) -> bool {
        self.can_be_used_by_spec && !self.used_by_spec && self.role == role
    }
}

impl Partier for PartyDetails {
    fn address(&self) -> &str {
        &self.address
    }

    fn role(&self) -> PartyType {
        self.role
    }

    fn is_optional(&self) -> bool {
        self.optional
    }

    fn decoded_account(&self) -> Option<&AccountAddress> {
        self.acc.as_ref()
    }
}

/// Merge required and available parties into one deduplicated list.
///
/// Available parties come first in their original order, each optional and
/// usable by the specification. Non-optional required parties then either flip a
/// matching entry to required or are appended as required-only entries that
/// cannot fill a role. No two entries share an (address, role) pair.
pub fn build_party_details(
    required: &[Party],
    available: &[Party],
    codec: &dyn AccountCodec,
) -> Vec<PartyDetails> {
    let mut details: Vec<PartyDetails> = Vec::with_capacity(available.len() + required.len());

    for party in available {
        if !details.iter().any(|d| same_partiers(d, party, codec)) {
            details.push(PartyDetails::new(party, true, true, codec));
        }
    }

    for party in required.iter().filter(|p| !p.optional) {
        match details.iter_mut().find(|d| same_partiers(*d, party, codec)) {
            Some(existing) => existing.make_required(),
            None => details.push(PartyDetails::new(party, false, false, codec)),
        }
    }

    details
}

/// Claim one party per required role, left to right; returns unfilled roles.
pub fn find_missing_roles(
    required_roles: &[PartyType],
    parties: &mut [PartyDetails],
) -> Vec<PartyType> {
    let mut missing = Vec::new();
    for &role in required_roles {
        match parties.iter_mut().find(|p| p.is_still_usable_as(role)) {
            Some(party) => party.mark_as_used(),
            None => missing.push(role),
        }
    }
    missing
}

/// Human-readable list of roles, pluralized for messages.
pub(crate) fn describe_roles(roles: &[PartyType]) -> String {
    let names: Vec<&str> = roles.iter().map(|r| r.name()).collect();
    format!(
        "party type{} {}",
        if roles.len() == 1 { "" } else { "s" },
        names.join(", ")
    )
}

// =============================================================================
// BASIC PARTY RULES
// =============================================================================

/// Every party must pass [`Party::validate_basic`].
pub fn validate_parties_basic(
    parties: &[Party],
    codec: &dyn AccountCodec,
) -> Result<(), MetadataError> {
    parties.iter().try_for_each(|p| p.validate_basic(codec))
}

/// Each required role must be filled by a distinct party in `parties`.
pub fn validate_parties_involved(
    parties: &[Party],
    required_roles: &[PartyType],
    codec: &dyn AccountCodec,
) -> Result<(), MetadataError> {
    let mut details = build_party_details(&[], parties, codec);
    let missing = find_missing_roles(required_roles, &mut details);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MetadataError::InvalidParty(format!(
            "missing required {} from parties",
            describe_roles(&missing)
        )))
    }
}

/// A specification's role list: non-empty, specified, no role twice.
pub fn validate_role_list(
    entity: &'static str,
    roles: &[PartyType],
) -> Result<(), MetadataError> {
    if roles.is_empty() {
        return Err(MetadataError::invalid(
            entity,
            "at least one party type is required",
        ));
    }
    let mut seen = BTreeSet::new();
    for &role in roles {
        if role == PartyType::Unspecified {
            return Err(MetadataError::InvalidParty(format!(
                "{entity} lists an unspecified party type"
            )));
        }
        if !seen.insert(role) {
            return Err(MetadataError::DuplicateParty(format!(
                "{entity} lists party type {role} more than once"
            )));
        }
    }
    Ok(())
}

// =============================================================================
// USED SIGNERS
// =============================================================================

/// Accounts already credited with a signature during one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedSignersMap {
    used: BTreeSet<String>,
}

impl UsedSignersMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit the given signers.
    pub fn use_signers<I, S>(&mut self, addrs: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.used.extend(addrs.into_iter().map(Into::into));
        self
    }

    pub fn is_used(&self, addr: &str) -> bool {
        self.used.contains(addr)
    }

    /// Union with another map.
    pub fn also_use(&mut self, other: &UsedSignersMap) -> &mut Self {
        self.used.extend(other.used.iter().cloned());
        self
    }

    /// Signers recorded on the given party details.
    pub fn from_parties(parties: &[PartyDetails]) -> Self {
        let mut map = Self::new();
        map.use_signers(parties.iter().filter_map(|p| p.signer().map(str::to_string)));
        map
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.used.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Bech32AccountCodec;

    fn codec() -> Bech32AccountCodec {
        Bech32AccountCodec::new("pb")
    }

    fn account(n: u8) -> String {
        codec().encode(&AccountAddress::from([n; 20])).unwrap()
    }

    fn summary(details: &[PartyDetails]) -> Vec<(String, PartyType, bool, bool)> {
        details
            .iter()
            .map(|d| {
                (
                    d.address().to_string(),
                    d.role(),
                    d.is_optional(),
                    d.can_be_used_by_spec(),
                )
            })
            .collect()
    }

    #[test]
    fn test_party_type_codes_and_names() {
        assert_eq!(PartyType::ALL.len(), 11);
        assert_eq!(PartyType::from_code(10), Some(PartyType::Controller));
        assert_eq!(PartyType::from_code(9), None);
        assert_eq!("owner".parse::<PartyType>().unwrap(), PartyType::Owner);
        assert_eq!(
            "PARTY_TYPE_PROVENANCE".parse::<PartyType>().unwrap(),
            PartyType::Provenance
        );
        assert!("banker".parse::<PartyType>().is_err());
    }

    #[test]
    fn test_party_validate_basic() {
        let c = codec();
        assert!(Party::new(account(1), PartyType::Owner).validate_basic(&c).is_ok());
        assert!(matches!(
            Party::new("nope", PartyType::Owner).validate_basic(&c),
            Err(MetadataError::InvalidParty(_))
        ));
        assert!(matches!(
            Party::new(account(1), PartyType::Unspecified).validate_basic(&c),
            Err(MetadataError::InvalidParty(_))
        ));
    }

    #[test]
    fn test_available_first_then_required_only() {
        let c = codec();
        let available = vec![
            Party::optional(account(1), PartyType::Owner),
            Party::optional(account(2), PartyType::Servicer),
        ];
        let required = vec![
            Party::new(account(3), PartyType::Owner),
            Party::new(account(1), PartyType::Owner),
        ];
        let details = build_party_details(&required, &available, &c);
        assert_eq!(
            summary(&details),
            vec![
                (account(1), PartyType::Owner, false, true),
                (account(2), PartyType::Servicer, true, true),
                (account(3), PartyType::Owner, false, false),
            ]
        );
    }

    #[test]
    fn test_deduplicates_pairs() {
        let c = codec();
        let available = vec![
            Party::optional(account(1), PartyType::Owner),
            Party::new(account(1), PartyType::Owner),
            Party::optional(account(1), PartyType::Affiliate),
        ];
        let required = vec![
            Party::new(account(4), PartyType::Owner),
            Party::new(account(4), PartyType::Owner),
        ];
        let details = build_party_details(&required, &available, &c);
        assert_eq!(details.len(), 3);
        assert_eq!(details[0].role(), PartyType::Owner);
        assert_eq!(details[1].role(), PartyType::Affiliate);
        assert_eq!(details[2].address(), account(4));
    }

    #[test]
    fn test_optional_required_parties_are_ignored() {
        let c = codec();
        let required = vec![Party::optional(account(5), PartyType::Owner)];
        assert!(build_party_details(&required, &[], &c).is_empty());
    }

    #[test]
    fn test_required_overrides_optional_availability() {
        let c = codec();
        let available = vec![Party::optional(account(1), PartyType::Owner)];
        let required = vec![Party::new(account(1), PartyType::Owner)];
        let details = build_party_details(&required, &available, &c);
        assert_eq!(details.len(), 1);
        assert!(!details[0].is_optional());
        assert!(details[0].can_be_used_by_spec());
    }

    #[test]
    fn test_compares_decoded_accounts() {
        let c = codec();
        let lower = account(1);
        let upper = lower.to_uppercase();
        let available = vec![Party::optional(lower.clone(), PartyType::Owner)];
        let required = vec![Party::new(upper, PartyType::Owner)];
        let details = build_party_details(&required, &available, &c);
        assert_eq!(details.len(), 1);
        assert!(!details[0].is_optional());
    }

    #[test]
    fn test_undecodable_addresses_compare_as_strings() {
        let c = codec();
        let available = vec![
            Party::optional("raw-a", PartyType::Owner),
            Party::optional("raw-a", PartyType::Owner),
            Party::optional("raw-b", PartyType::Owner),
        ];
        let details = build_party_details(&[], &available, &c);
        assert_eq!(details.len(), 2);
        assert!(details[0].acc().is_none());
    }

    #[test]
    fn test_build_is_deterministic() {
        let c = codec();
        let available = vec![
            Party::optional(account(2), PartyType::Investor),
            Party::optional(account(1), PartyType::Owner),
        ];
        let required = vec![Party::new(account(3), PartyType::Custodian)];
        let first = build_party_details(&required, &available, &c);
        let second = build_party_details(&required, &available, &c);
        assert_eq!(first, second);
    }

    #[test]
    fn test_still_usable_and_mark_as_used() {
        let c = codec();
        let mut details =
            build_party_details(&[], &[Party::optional(account(1), PartyType::Owner)], &c);
        let party = &mut details[0];
        assert!(party.is_still_usable_as(PartyType::Owner));
        assert!(!party.is_still_usable_as(PartyType::Servicer));
        assert!(!party.is_required());
        party.mark_as_used();
        assert!(party.is_used());
        assert!(party.is_required());
        assert!(!party.is_still_usable_as(PartyType::Owner));
    }

    #[test]
    fn test_required_only_entries_cannot_fill_roles() {
        let c = codec();
        let mut details =
            build_party_details(&[Party::new(account(1), PartyType::Owner)], &[], &c);
        assert_eq!(
            find_missing_roles(&[PartyType::Owner], &mut details),
            vec![PartyType::Owner]
        );
    }

    #[test]
    fn test_role_claims_favor_earlier_entries() {
        let c = codec();
        let available = vec![
            Party::optional(account(1), PartyType::Owner),
            Party::optional(account(2), PartyType::Owner),
        ];
        let mut details = build_party_details(&[], &available, &c);
        let missing = find_missing_roles(&[PartyType::Owner], &mut details);
        assert!(missing.is_empty());
        assert!(details[0].is_used());
        assert!(!details[1].is_used());

        let missing = find_missing_roles(
            &[PartyType::Owner, PartyType::Owner, PartyType::Servicer],
            &mut details,
        );
        assert_eq!(missing, vec![PartyType::Owner, PartyType::Servicer]);
        assert!(details[1].is_used());
    }

    #[test]
    fn test_validate_parties_involved() {
        let c = codec();
        let parties = vec![
            Party::new(account(1), PartyType::Owner),
            Party::new(account(2), PartyType::Servicer),
        ];
        assert!(validate_parties_involved(&parties, &[PartyType::Owner], &c).is_ok());
        let err = validate_parties_involved(
            &parties,
            &[PartyType::Owner, PartyType::Investor, PartyType::Custodian],
            &c,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid party: missing required party types INVESTOR, CUSTODIAN from parties"
        );
    }

    #[test]
    fn test_validate_role_list() {
        assert!(validate_role_list("scope specification", &[PartyType::Owner]).is_ok());
        assert!(matches!(
            validate_role_list("scope specification", &[]),
            Err(MetadataError::InvalidField { .. })
        ));
        assert!(matches!(
            validate_role_list("scope specification", &[PartyType::Owner, PartyType::Owner]),
            Err(MetadataError::DuplicateParty(_))
        ));
        assert!(matches!(
            validate_role_list("scope specification", &[PartyType::Unspecified]),
            Err(MetadataError::InvalidParty(_))
        ));
    }

    #[test]
    fn test_used_signers_map() {
        let mut used = UsedSignersMap::new();
        used.use_signers(["a", "b"]);
        assert!(used.is_used("a"));
        assert!(!used.is_used("c"));

        let mut other = UsedSignersMap::new();
        other.use_signers(vec!["c".to_string(), "a".to_string()]);
        used.also_use(&other);
        assert_eq!(used.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(used.len(), 3);
    }

    #[test]
    fn test_used_signers_from_parties() {
        let c = codec();
        let mut details = build_party_details(
            &[],
            &[
                Party::optional(account(1), PartyType::Owner),
                Party::optional(account(2), PartyType::Owner),
            ],
            &c,
        );
        details[1].set_signer(account(9), None);
        let used = UsedSignersMap::from_parties(&details);
        assert!(used.is_used(&account(9)));
        assert_eq!(used.len(), 1);
    }
}
