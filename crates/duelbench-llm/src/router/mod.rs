//! Router - model identifier to provider dispatch
//!
//! # Module Structure
//!
//! - `profile`: the static ordered profile table and request shaping
//! - `config`: credentials and endpoint overrides
//! - `router_impl`: `ProviderRouter`, pairing profiles with backends
//! - `mock`: scripted backend for testing

mod config;
mod mock;
mod profile;
mod router_impl;


pub use config::{EndpointOverrides, ProviderCredentials, RouterConfig};
pub use mock::{MockBackend, RecordedCall};
pub use profile::{
    profile_for, ProfileKind, ProviderProfile, OPEN_ORCA_MODEL, PROFILES, USAGE_FIELDS,
};
pub use router_impl::{ProviderRouter, Route};
