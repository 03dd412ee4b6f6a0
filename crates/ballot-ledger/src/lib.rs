//! Voting ledger for the Ballot Ledger.
//!
//! This crate is the heart of the system. It provides:
//! - `VotingLedger`: owner-gated, append-only proposals with one vote per account
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - Winner selection with lowest-index tie-breaking
//! - `ProposalAdded` / `Voted` event publication to filtered subscribers
//! - Standings projection and invariant verification

pub mod error;
pub mod event;
pub mod ledger;
pub mod projection;
pub mod records;
pub mod traits;

pub use error::LedgerError;
pub use event::{EventBus, EventFilter, EventId, EventKind, EventPayload, EventStream, LedgerEvent};
pub use ledger::VotingLedger;
pub use projection::{ProjectionBuilder, Standing, StandingsProjection};
pub use records::{Proposal, ProposalView, Winner, NO_PROPOSALS};
pub use traits::{LedgerReader, LedgerWriter};
