//! # Shared Types Crate
//!
//! Cross-cutting value types for the provenance metadata workspace.
//!
//! ## Contents
//!
//! - **Entities**: [`AccountAddress`] raw account bytes.
//! - **Accounts**: the [`AccountCodec`] collaborator trait that turns account
//!   identifier strings into [`AccountAddress`] values, plus the bundled
//!   [`Bech32AccountCodec`].
//! - **Errors**: [`AccountError`].

pub mod accounts;
pub mod entities;
pub mod errors;

pub use accounts::{AccountCodec, Bech32AccountCodec, MAX_ACCOUNT_ADDRESS_LENGTH};
pub use entities::*;
pub use errors::*;
