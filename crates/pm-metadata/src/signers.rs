//! # Signer Resolution
//!
//! Decides whether the accounts that signed a request satisfy the parties
//! that must approve it, either directly or through a delegation.
//!
//! ## Order of checks (with parties)
//!
//! 1. Merge required and available parties ([`build_party_details`]).
//! 2. Credit parties whose address is a declared signer.
//! 3. Claim one available party per required role, left to right.
//! 4. Every required or claimed party without a signer needs a delegation
//!    from some declared signer for the message type (or its parent type).
//! 5. Smart-contract accounts must hold the `PROVENANCE` role and only they may.
//! 6. A contract signer that is not first needs grants from every earlier
//!    credited signer.
//!
//! Lookups go through the request's [`AuthzCache`]; a provider failure aborts
//! the whole resolution.

use crate::domain::authz_cache::{AuthzCache, AuthzDecision};
use crate::domain::errors::MetadataError;
use crate::domain::messages::MsgType;
use crate::domain::party::{
    build_party_details, describe_roles, find_missing_roles, Party, PartyDetails, PartyType,
    UsedSignersMap,
};
use crate::ports::outbound::{AccountInspector, AuthorizationProvider};
use shared_types::{AccountAddress, AccountCodec};
use tracing::{debug, warn};

// =============================================================================
// REQUEST CONTEXT
// =============================================================================

/// Request-scoped state: the declared signers and the authorization cache.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    signers: Vec<String>,
    authz_cache: AuthzCache,
}

impl RequestContext {
    pub fn new(signers: Vec<String>) -> Self {
        Self {
            signers,
            authz_cache: AuthzCache::new(),
        }
    }

    /// Start a new request on this holder; the cache is cleared in place.
    pub fn reset(&mut self, signers: Vec<String>) {
        self.signers = signers;
        self.authz_cache.clear();
    }

    pub fn signers(&self) -> &[String] {
        &self.signers
    }

    /// First declared signer, used for audit fields.
    pub fn primary_signer(&self) -> Option<&str> {
        self.signers.first().map(String::as_str)
    }

    pub fn authz_cache(&self) -> &AuthzCache {
        &self.authz_cache
    }
}

type Signer = (String, AccountAddress);

// =============================================================================
// RESOLVER
// =============================================================================

/// Borrowing view over the collaborators needed to resolve signers.
pub struct SignerResolver<'a> {
    authz: &'a dyn AuthorizationProvider,
    inspector: &'a dyn AccountInspector,
    codec: &'a dyn AccountCodec,
}

impl<'a> SignerResolver<'a> {
    pub fn new(
        authz: &'a dyn AuthorizationProvider,
        inspector: &'a dyn AccountInspector,
        codec: &'a dyn AccountCodec,
    ) -> Self {
        Self {
            authz,
            inspector,
            codec,
        }
    }

    /// Resolve signers against parties and the role list of a specification.
    ///
    /// Returns the resolved party details on success.
    pub fn validate_signers_with_parties(
        &self,
        ctx: &mut RequestContext,
        required: &[Party],
        available: &[Party],
        required_roles: &[PartyType],
        msg: MsgType,
    ) -> Result<Vec<PartyDetails>, MetadataError> {
        let signers = self.decode_signers(ctx)?;
        let mut parties = build_party_details(required, available, self.codec);

        for party in parties.iter_mut() {
            if let Some((signer, acc)) = signers.iter().find(|s| same_account(party, s)) {
                party.set_signer(signer.clone(), Some(acc.clone()));
            }
        }

        let missing_roles = find_missing_roles(required_roles, &mut parties);
        if !missing_roles.is_empty() {
            return Err(MetadataError::InvalidParty(format!(
                "missing roles required by specification: {}",
                describe_roles(&missing_roles)
            )));
        }

        let mut unsigned = Vec::new();
        for party in parties.iter_mut() {
            if !party.is_required() || party.has_signer() {
                continue;
            }
            let delegate = match party.acc() {
                Some(granter) => self.find_delegate(ctx, granter, &signers, msg)?,
                None => None,
            };
            match delegate {
                Some((signer, acc)) => {
                    debug!(party = %party.address(), signer = %signer, "party satisfied by delegation");
                    party.set_signer(signer, Some(acc));
                }
                None => unsigned.push(party.address().to_string()),
            }
        }
        if !unsigned.is_empty() {
            return Err(missing_signatures(&unsigned));
        }

        self.validate_provenance_role(ctx, &parties)?;
        let used = UsedSignersMap::from_parties(&parties);
        self.validate_smart_contract_signers(ctx, &signers, &used, msg)?;

        debug!(
            parties = parties.len(),
            signers = signers.len(),
            msg = %msg,
            "signers resolved with parties"
        );
        Ok(parties)
    }

    /// Every address must sign directly or through a delegation.
    pub fn validate_signers_without_parties(
        &self,
        ctx: &mut RequestContext,
        required: &[String],
        msg: MsgType,
    ) -> Result<UsedSignersMap, MetadataError> {
        let signers = self.decode_signers(ctx)?;
        let mut used = UsedSignersMap::new();
        let mut unsigned = Vec::new();

        for address in required {
            let granter = self.codec.decode(address).map_err(|e| {
                MetadataError::InvalidParty(format!("invalid required address [{address}]: {e}"))
            })?;
            if let Some((signer, _)) = signers.iter().find(|(_, acc)| *acc == granter) {
                used.use_signers([signer.clone()]);
                continue;
            }
            match self.find_delegate(ctx, &granter, &signers, msg)? {
                Some((signer, _)) => {
                    used.use_signers([signer]);
                }
                None => unsigned.push(address.clone()),
            }
        }
        if !unsigned.is_empty() {
            return Err(missing_signatures(&unsigned));
        }

        self.validate_smart_contract_signers(ctx, &signers, &used, msg)?;
        Ok(used)
    }

    /// A party is a smart contract exactly when its role is `PROVENANCE`.
    pub fn validate_provenance_role(
        &self,
        ctx: &mut RequestContext,
        parties: &[PartyDetails],
    ) -> Result<(), MetadataError> {
        for party in parties {
            let acc = party.acc().ok_or_else(|| {
                MetadataError::InvalidParty(format!("invalid party address [{}]", party.address()))
            })?;
            let is_wasm = self.is_wasm(ctx, acc)?;
            match (is_wasm, party.role() == PartyType::Provenance) {
                (true, false) => {
                    return Err(MetadataError::InvalidParty(format!(
                        "account {} is a smart contract but does not have the PROVENANCE role",
                        party.address()
                    )))
                }
                (false, true) => {
                    return Err(MetadataError::InvalidParty(format!(
                        "account {} has role PROVENANCE but is not a smart contract",
                        party.address()
                    )))
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn validate_smart_contract_signers(
        &self,
        ctx: &mut RequestContext,
        signers: &[Signer],
        used: &UsedSignersMap,
        msg: MsgType,
    ) -> Result<(), MetadataError> {
        let mut earlier: Vec<&Signer> = Vec::new();
        for (index, signer) in signers.iter().enumerate() {
            if !self.is_wasm(ctx, &signer.1)? {
                if used.is_used(&signer.0) {
                    earlier.push(signer);
                }
                continue;
            }
            if index == 0 {
                continue;
            }
            for (granter_str, granter) in earlier.iter().map(|s| (&s.0, &s.1)) {
                if !self.is_granted(ctx, &signer.1, granter, msg)? {
                    return Err(MetadataError::UnauthorizedSigner(format!(
                        "smart contract signer {} is not authorized by {granter_str}",
                        signer.0
                    )));
                }
            }
        }
        Ok(())
    }

    fn decode_signers(&self, ctx: &RequestContext) -> Result<Vec<Signer>, MetadataError> {
        ctx.signers
            .iter()
            .map(|s| {
                self.codec
                    .decode(s)
                    .map(|acc| (s.clone(), acc))
                    .map_err(|e| MetadataError::InvalidParty(format!("invalid signer [{s}]: {e}")))
            })
            .collect()
    }

    /// First signer (in declared order) holding a delegation from `granter`.
    fn find_delegate(
        &self,
        ctx: &mut RequestContext,
        granter: &AccountAddress,
        signers: &[Signer],
        msg: MsgType,
    ) -> Result<Option<Signer>, MetadataError> {
        for (signer, grantee) in signers {
            if grantee == granter {
                continue;
            }
            if self.is_granted(ctx, grantee, granter, msg)? {
                return Ok(Some((signer.clone(), grantee.clone())));
            }
        }
        Ok(None)
    }

    /// Delegation lookup for the message type, then its parent type.
    fn is_granted(
        &self,
        ctx: &mut RequestContext,
        grantee: &AccountAddress,
        granter: &AccountAddress,
        msg: MsgType,
    ) -> Result<bool, MetadataError> {
        for url in msg.authz_type_urls() {
            if self.lookup(ctx, grantee, granter, &url)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn lookup(
        &self,
        ctx: &mut RequestContext,
        grantee: &AccountAddress,
        granter: &AccountAddress,
        msg_type_url: &str,
    ) -> Result<bool, MetadataError> {
        if let Some(decision) = ctx.authz_cache.get_acceptable(grantee, granter, msg_type_url) {
            debug!(?grantee, ?granter, msg_type_url, "authorization cache hit");
            return Ok(decision.is_accepted());
        }

        debug!(?grantee, ?granter, msg_type_url, "querying authorization provider");
        let decision = match self.authz.get_authorization(grantee, granter, msg_type_url) {
            Ok(Some(authorization)) => AuthzDecision::Accepted(authorization),
            Ok(None) => AuthzDecision::Rejected,
            Err(e) => {
                warn!(error = %e, msg_type_url, "authorization lookup failed");
                return Err(MetadataError::AuthorizationLookupFailure(e.to_string()));
            }
        };
        let accepted = decision.is_accepted();
        ctx.authz_cache
            .set_acceptable(grantee, granter, msg_type_url, decision);
        Ok(accepted)
    }

    fn is_wasm(&self, ctx: &mut RequestContext, acc: &AccountAddress) -> Result<bool, MetadataError> {
        if ctx.authz_cache.has_is_wasm(acc) {
            return Ok(ctx.authz_cache.get_is_wasm(acc));
        }
        let is_wasm = self.inspector.is_smart_contract(acc).map_err(|e| {
            warn!(error = %e, account = ?acc, "account inspection failed");
            MetadataError::AuthorizationLookupFailure(e.to_string())
        })?;
        ctx.authz_cache.set_is_wasm(acc, is_wasm);
        Ok(is_wasm)
    }
}

fn same_account(party: &PartyDetails, signer: &Signer) -> bool {
    match party.acc() {
        Some(acc) => *acc == signer.1,
        None => party.address() == signer.0,
    }
}

fn missing_signatures(addresses: &[String]) -> MetadataError {
    MetadataError::UnauthorizedSigner(format!(
        "missing signature{} from {}",
        if addresses.len() == 1 { "" } else { "s" },
        addresses.join(", ")
    ))
}
