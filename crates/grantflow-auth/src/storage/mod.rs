//! Collaborator store traits consumed by the grant engine.
//!
//! The engine depends only on these interfaces:
//!
//! - [`ClientRegistry`] - client registration lookup
//! - [`CodeStore`] - authorization code issuance and single-use consumption
//! - [`ContextStore`] - request state carried from authorization to token exchange
//!
//! # Implementations
//!
//! In-memory implementations live in the `grantflow-auth-memory` crate.

pub mod client;
pub mod code;
pub mod context;

pub use client::ClientRegistry;
pub use code::CodeStore;
pub use context::ContextStore;
