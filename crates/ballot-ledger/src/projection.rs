use serde::{Deserialize, Serialize};

use ballot_types::ProposalName;

use crate::error::LedgerError;
use crate::traits::LedgerReader;

/// One row of the standings table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// Dense rank, starting at 1. Proposals with equal votes share a rank.
    pub rank: u32,
    pub index: u64,
    pub name: ProposalName,
    pub vote_count: u64,
}

/// Proposals ordered by votes (descending), then by index (ascending).
///
/// This exposes index and tie information that `winner()` deliberately
/// leaves out. The first row always names the same proposal as `winner()`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsProjection {
    pub total_votes: u64,
    pub standings: Vec<Standing>,
}

impl StandingsProjection {
    pub fn leader(&self) -> Option<&Standing> {
        self.standings.first()
    }

    /// All proposals sharing the top rank.
    pub fn tied_leaders(&self) -> Vec<&Standing> {
        self.standings.iter().take_while(|s| s.rank == 1).collect()
    }
}

/// Deterministic projection builders.
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    pub fn standings<R: LedgerReader>(reader: &R) -> Result<StandingsProjection, LedgerError> {
        let mut views = reader.proposals()?;
        let total_votes = views.iter().map(|v| v.vote_count).sum();

        // Stable sort keeps index order within equal counts.
        views.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));

        let mut standings = Vec::with_capacity(views.len());
        let mut rank = 0u32;
        let mut previous = None;
        for view in views {
            if previous != Some(view.vote_count) {
                rank += 1;
                previous = Some(view.vote_count);
            }
            standings.push(Standing {
                rank,
                index: view.index,
                name: view.name,
                vote_count: view.vote_count,
            });
        }

        Ok(StandingsProjection {
            total_votes,
            standings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::VotingLedger;
    use crate::traits::LedgerWriter;
    use ballot_types::AccountId;

    fn account(seed: u8) -> AccountId {
        AccountId::from_raw([seed; 32])
    }

    #[test]
    fn empty_ledger_has_no_standings() {
        let ledger = VotingLedger::new(account(0));
        let projection = ProjectionBuilder::standings(&ledger).unwrap();
        assert_eq!(projection, StandingsProjection::default());
        assert!(projection.leader().is_none());
    }

    #[test]
    fn standings_rank_by_votes_then_index() {
        let ledger =
            VotingLedger::with_proposals(account(0), ["Alpha", "Beta", "Gamma", "Delta"]).unwrap();
        ledger.vote(2, &account(1)).unwrap();
        ledger.vote(2, &account(2)).unwrap();
        ledger.vote(1, &account(3)).unwrap();
        ledger.vote(3, &account(4)).unwrap();

        let projection = ProjectionBuilder::standings(&ledger).unwrap();
        assert_eq!(projection.total_votes, 4);

        let order: Vec<(u32, u64)> = projection
            .standings
            .iter()
            .map(|s| (s.rank, s.index))
            .collect();
        assert_eq!(order, vec![(1, 2), (2, 1), (2, 3), (3, 0)]);
    }

    #[test]
    fn leader_agrees_with_winner() {
        let ledger = VotingLedger::with_proposals(account(0), ["Alpha", "Beta", "Gamma"]).unwrap();
        ledger.vote(1, &account(1)).unwrap();
        ledger.vote(2, &account(2)).unwrap();

        let projection = ProjectionBuilder::standings(&ledger).unwrap();
        let winner = crate::traits::LedgerReader::winner(&ledger).unwrap();
        assert_eq!(projection.leader().unwrap().name.as_str(), winner.text());

        let tied: Vec<u64> = projection.tied_leaders().iter().map(|s| s.index).collect();
        assert_eq!(tied, vec![1, 2]);
    }
}
