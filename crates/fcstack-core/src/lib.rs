//! Core types and errors for fcstack.
//!
//! This crate provides the foundational building blocks shared across the
//! fcstack helper crates: the workspace error type, the credential record
//! exchanged between the credential provider and the client factory, and
//! the convenience result alias.

mod error;
mod types;

pub use error::{FcStackError, FcStackResult};
pub use types::Credentials;
