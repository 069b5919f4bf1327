//! # Domain Layer
//!
//! Pure metadata logic with no I/O dependencies: the address codec, party
//! resolution, the request-scoped authorization cache and entity validation.

pub mod address;
pub mod authz_cache;
pub mod derivation;
pub mod entities;
pub mod errors;
pub mod grants;
pub mod messages;
pub mod party;
pub mod validation;

pub use address::{AddressDetails, AddressType, MetadataAddress};
pub use authz_cache::{Authorization, AuthzCache, AuthzDecision};
pub use entities::*;
pub use errors::{AddressError, MetadataError};
pub use grants::{validate_access_grants, AccessGrant, Permission};
pub use messages::MsgType;
pub use party::{Party, PartyDetails, PartyType, Partier, UsedSignersMap};
pub use validation::ValidateBasic;
