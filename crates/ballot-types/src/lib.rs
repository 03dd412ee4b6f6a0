//! Foundation types for the Ballot Ledger.
//!
//! This crate provides the identity and value types shared by every other
//! ballot crate.
//!
//! # Key Types
//!
//! - [`AccountId`]: Opaque 32-byte identity derived from [`IdentityMaterial`]
//! - [`ProposalName`]: Proposal label validated to 1..=99 UTF-8 bytes

pub mod error;
pub mod identity;
pub mod proposal;

pub use error::{NameError, TypeError};
pub use identity::{AccountId, IdentityMaterial};
pub use proposal::{ProposalName, MAX_NAME_BYTES, MIN_NAME_BYTES};
