//! # Provenance Metadata
//!
//! Hierarchical custody metadata (scopes containing sessions containing
//! records) and the specifications governing them, together with the access
//! rules deciding which accounts may change them.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): the typed address codec, party resolution,
//!   the authorization cache and entity validation. Pure, no I/O.
//! - **Ports Layer** (`ports/`): the inbound `MetadataApi` and the outbound
//!   store, authorization and account-inspection collaborators
//! - **Signers** (`signers.rs`): signer resolution against the collaborators
//! - **Service Layer** (`service.rs`): wires domain logic to ports
//! - **Adapters** (`adapters/`): in-memory collaborators
//!
//! ## Address Layout
//!
//! ```text
//! byte[0]     : type tag  0x00 scope, 0x01 session, 0x02 record,
//!                         0x03 contractspec, 0x04 scopespec, 0x05 recspec
//! byte[1:17]  : primary UUID
//! byte[17:33] : session UUID (sessions) or name hash (records, record specs)
//! ```
//!
//! ## Usage
//!
//! ```
//! use pm_metadata::{scope_address, MetadataAddress};
//! use uuid::Uuid;
//!
//! let uuid = Uuid::parse_str("91978ba2-5f35-459a-86a7-feca1b0512e0").unwrap();
//! let scope = scope_address(&uuid);
//! assert_eq!(scope.to_string(), "scope1qzge0zaztu65tx5x5llv5xc9ztsqxlkwel");
//! assert_eq!(scope.to_string().parse::<MetadataAddress>().unwrap(), scope);
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;
pub mod signers;

// Re-export public API
pub use config::MetadataConfig;
pub use domain::address::{validate_address_bytes, AddressDetails, AddressType, MetadataAddress};
pub use domain::authz_cache::{Authorization, AuthzCache, AuthzDecision};
pub use domain::derivation::{
    contract_spec_address, name_hash, record_address, record_spec_address, scope_address,
    scope_spec_address, session_address,
};
pub use domain::entities::*;
pub use domain::errors::{AddressError, MetadataError};
pub use domain::grants::{validate_access_grants, AccessGrant, Permission};
pub use domain::messages::MsgType;
pub use domain::party::{
    build_party_details, find_missing_roles, validate_parties_basic, validate_parties_involved,
    Party, PartyDetails, PartyType, Partier, UsedSignersMap,
};
pub use domain::validation::ValidateBasic;
pub use ports::inbound::MetadataApi;
pub use ports::outbound::{
    AccountInspector, AccountInspectorError, AuthorizationProvider, AuthzProviderError,
    MetadataStore, StoreError,
};
pub use service::MetadataService;
pub use signers::{RequestContext, SignerResolver};
pub use shared_types::{AccountAddress, AccountCodec, Bech32AccountCodec};

/// Service over the bundled in-memory collaborators.
pub type InMemoryMetadataService = MetadataService<
    adapters::MemoryMetadataStore,
    adapters::MemoryAuthorizationProvider,
    adapters::MemoryAccountInspector,
>;
