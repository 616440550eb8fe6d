//! Core types for the Photon binding engine.
//!
//! This crate provides the foundational types shared by every other photon crate:
//! - State values and the state map
//! - The marker/binding vocabulary written into documents
//! - The `Host` trait that a document environment implements
//! - Error types

pub mod errors;
pub mod host;
pub mod state;
pub mod value;
pub mod vocab;

pub use errors::*;
pub use host::*;
pub use state::*;
pub use value::*;
pub use vocab::*;
