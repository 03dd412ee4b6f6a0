use ballot_types::AccountId;

use crate::error::LedgerError;
use crate::records::{Proposal, ProposalView, Winner};

/// Write boundary for ledger mutations.
///
/// Each call is applied atomically: it either fully succeeds or returns an
/// error having changed nothing.
pub trait LedgerWriter: Send + Sync {
    /// Append a proposal. Only the owner may call this. Returns the new index.
    fn add_proposal(&self, name: &str, caller: &AccountId) -> Result<u64, LedgerError>;

    /// Record `caller`'s single vote for the proposal at `index`.
    fn vote(&self, index: u64, caller: &AccountId) -> Result<(), LedgerError>;
}

/// Read boundary for ledger queries.
pub trait LedgerReader: Send + Sync {
    fn owner(&self) -> &AccountId;

    fn count(&self) -> Result<u64, LedgerError>;

    fn get_proposal(&self, index: u64) -> Result<Proposal, LedgerError>;

    fn has_voted(&self, account: &AccountId) -> Result<bool, LedgerError>;

    fn winner(&self) -> Result<Winner, LedgerError>;

    /// All proposals in index order, read from a single consistent state.
    fn proposals(&self) -> Result<Vec<ProposalView>, LedgerError>;
}
