//! # Ports Layer
//!
//! - **Inbound (Driving)**: the metadata API callers use
//! - **Outbound (Driven)**: storage, authorization and account lookups

pub mod inbound;
pub mod outbound;

pub use inbound::MetadataApi;
pub use outbound::{
    AccountInspector, AccountInspectorError, AuthorizationProvider, AuthzProviderError,
    MetadataStore, StoreError,
};
