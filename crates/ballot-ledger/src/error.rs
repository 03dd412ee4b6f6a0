use ballot_types::{AccountId, NameError};

/// Errors produced by ledger operations.
///
/// The first four variants are caller-correctable precondition failures; a
/// call that returns one of them has changed nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("caller {caller} is not the ledger owner")]
    Unauthorized { caller: AccountId },

    #[error("invalid proposal: {0}")]
    InvalidProposal(#[from] NameError),

    #[error("proposal index {index} out of range (count {count})")]
    InvalidIndex { index: u64, count: u64 },

    #[error("{voter} has already voted")]
    AlreadyVoted { voter: AccountId },

    #[error("ledger lock poisoned")]
    LockPoisoned,

    #[error("integrity violation: {reason}")]
    IntegrityViolation { reason: String },
}

impl LedgerError {
    /// Stable kind name reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "Unauthorized",
            Self::InvalidProposal(_) => "InvalidProposal",
            Self::InvalidIndex { .. } => "InvalidIndex",
            Self::AlreadyVoted { .. } => "AlreadyVoted",
            Self::LockPoisoned => "LockPoisoned",
            Self::IntegrityViolation { .. } => "IntegrityViolation",
        }
    }

    /// `true` for rejections the caller can fix, `false` for internal faults.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. }
                | Self::InvalidProposal(_)
                | Self::InvalidIndex { .. }
                | Self::AlreadyVoted { .. }
        )
    }
}
