use std::fmt;

use serde::{Deserialize, Serialize};

use ballot_types::ProposalName;

/// Text reported by [`Winner::NoProposals`].
pub const NO_PROPOSALS: &str = "No proposals available";

/// A stored proposal. The name never changes; the count only grows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub name: ProposalName,
    pub vote_count: u64,
}

impl Proposal {
    pub fn new(name: ProposalName) -> Self {
        Self {
            name,
            vote_count: 0,
        }
    }
}

/// A proposal together with its index, as shown in a client's list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalView {
    pub index: u64,
    pub name: ProposalName,
    pub vote_count: u64,
}

impl ProposalView {
    pub fn new(index: u64, proposal: &Proposal) -> Self {
        Self {
            index,
            name: proposal.name.clone(),
            vote_count: proposal.vote_count,
        }
    }
}

/// Result of winner selection.
///
/// Only the winning name is reported. An empty ledger is a defined state,
/// not an error, and renders as [`NO_PROPOSALS`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    NoProposals,
    Proposal(ProposalName),
}

impl Winner {
    pub fn name(&self) -> Option<&ProposalName> {
        match self {
            Self::NoProposals => None,
            Self::Proposal(name) => Some(name),
        }
    }

    /// The name of the winner, or the sentinel text.
    pub fn text(&self) -> &str {
        match self {
            Self::NoProposals => NO_PROPOSALS,
            Self::Proposal(name) => name.as_str(),
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
