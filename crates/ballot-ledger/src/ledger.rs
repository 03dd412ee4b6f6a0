use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use ballot_types::{AccountId, ProposalName, MAX_NAME_BYTES, MIN_NAME_BYTES};

use crate::error::LedgerError;
use crate::event::{EventBus, EventFilter, EventPayload, EventStream, LedgerEvent};
use crate::records::{Proposal, ProposalView, Winner};
use crate::traits::{LedgerReader, LedgerWriter};

/// Owner-gated proposal ledger with one vote per account.
///
/// All state sits behind one `RwLock`. Mutations hold the write lock across
/// their checks, the state change, and event publication, so they are
/// totally ordered and readers never see a half-applied call.
pub struct VotingLedger {
    owner: AccountId,
    inner: RwLock<LedgerState>,
    events: EventBus,
}

#[derive(Default)]
struct LedgerState {
    proposals: Vec<Proposal>,
    voters: HashSet<AccountId>,
    journal: Vec<LedgerEvent>,
}

impl LedgerState {
    fn count(&self) -> u64 {
        self.proposals.len() as u64
    }

    fn check_index(&self, index: u64) -> Result<usize, LedgerError> {
        let count = self.count();
        if index >= count {
            return Err(LedgerError::InvalidIndex { index, count });
        }
        Ok(index as usize)
    }
}

impl VotingLedger {
    /// Create an empty ledger owned by `owner`.
    pub fn new(owner: AccountId) -> Self {
        Self {
            owner,
            inner: RwLock::new(LedgerState::default()),
            events: EventBus::default(),
        }
    }

    /// Create a ledger pre-populated with seed proposals, in order.
    ///
    /// Seeds are validated like any other name; seeding publishes no events.
    pub fn with_proposals<I, S>(owner: AccountId, seeds: I) -> Result<Self, LedgerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let proposals = seeds
            .into_iter()
            .map(|name| ProposalName::new(name).map(Proposal::new))
            .collect::<Result<Vec<_>, _>>()?;

        info!(owner = %owner, seeds = proposals.len(), "ledger created");

        Ok(Self {
            owner,
            inner: RwLock::new(LedgerState {
                proposals,
                ..Default::default()
            }),
            events: EventBus::default(),
        })
    }

    /// Replace the event bus with one using the given per-subscriber capacity.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.events = EventBus::new(capacity);
        self
    }

    /// Subscribe to events published after this call.
    pub fn subscribe(&self, filter: EventFilter) -> EventStream {
        self.events.subscribe(filter)
    }

    /// Events with `seq > since`, in commit order.
    pub fn events_since(&self, since: u64) -> Result<Vec<LedgerEvent>, LedgerError> {
        let state = self.read_state()?;
        Ok(state
            .journal
            .iter()
            .filter(|event| event.seq > since)
            .cloned()
            .collect())
    }

    /// Number of accounts that have voted.
    pub fn voter_count(&self) -> Result<u64, LedgerError> {
        Ok(self.read_state()?.voters.len() as u64)
    }

    /// Check the ledger invariants against the current state.
    pub fn verify(&self) -> Result<(), LedgerError> {
        let state = self.read_state()?;

        for (index, proposal) in state.proposals.iter().enumerate() {
            let len = proposal.name.byte_len();
            if !(MIN_NAME_BYTES..=MAX_NAME_BYTES).contains(&len) {
                return Err(LedgerError::IntegrityViolation {
                    reason: format!("proposal {index} name is {len} bytes"),
                });
            }
        }

        let tallied: u64 = state.proposals.iter().map(|p| p.vote_count).sum();
        let voters = state.voters.len() as u64;
        if tallied != voters {
            return Err(LedgerError::IntegrityViolation {
                reason: format!("{tallied} votes tallied but {voters} accounts have voted"),
            });
        }

        for (position, event) in state.journal.iter().enumerate() {
            if event.seq != position as u64 + 1 || !event.verify_integrity() {
                return Err(LedgerError::IntegrityViolation {
                    reason: format!("event journal broken at seq {}", event.seq),
                });
            }
        }

        Ok(())
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.inner.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.inner.write().map_err(|_| LedgerError::LockPoisoned)
    }

    /// Record and publish an event. Called with the write lock held, after
    /// the mutation has been applied.
    fn commit_event(&self, state: &mut LedgerState, payload: EventPayload) {
        let seq = state.journal.len() as u64 + 1;
        let event = LedgerEvent::new(seq, payload);
        self.events.publish(&event);
        state.journal.push(event);
    }
}

impl LedgerWriter for VotingLedger {
    fn add_proposal(&self, name: &str, caller: &AccountId) -> Result<u64, LedgerError> {
        if *caller != self.owner {
            warn!(caller = %caller, "add_proposal rejected: caller is not the owner");
            return Err(LedgerError::Unauthorized {
                caller: caller.clone(),
            });
        }

        let name = ProposalName::new(name).map_err(|e| {
            warn!(error = %e, "add_proposal rejected: invalid name");
            LedgerError::InvalidProposal(e)
        })?;

        let mut state = self.write_state()?;
        let index = state.count();
        state.proposals.push(Proposal::new(name.clone()));

        info!(index, name = %name, "proposal added");
        self.commit_event(&mut state, EventPayload::ProposalAdded { index, name });

        Ok(index)
    }

    fn vote(&self, index: u64, caller: &AccountId) -> Result<(), LedgerError> {
        let mut state = self.write_state()?;

        let slot = state.check_index(index).inspect_err(|_| {
            warn!(voter = %caller, index, "vote rejected: index out of range");
        })?;

        if state.voters.contains(caller) {
            warn!(voter = %caller, index, "vote rejected: already voted");
            return Err(LedgerError::AlreadyVoted {
                voter: caller.clone(),
            });
        }

        state.voters.insert(caller.clone());
        state.proposals[slot].vote_count += 1;

        info!(voter = %caller, index, "vote recorded");
        self.commit_event(
            &mut state,
            EventPayload::Voted {
                voter: caller.clone(),
                index,
            },
        );

        Ok(())
    }
}

impl LedgerReader for VotingLedger {
    fn owner(&self) -> &AccountId {
        &self.owner
    }

    fn count(&self) -> Result<u64, LedgerError> {
        Ok(self.read_state()?.count())
    }

    fn get_proposal(&self, index: u64) -> Result<Proposal, LedgerError> {
        let state = self.read_state()?;
        let slot = state.check_index(index)?;
        Ok(state.proposals[slot].clone())
    }

    fn has_voted(&self, account: &AccountId) -> Result<bool, LedgerError> {
        Ok(self.read_state()?.voters.contains(account))
    }

    fn winner(&self) -> Result<Winner, LedgerError> {
        let state = self.read_state()?;
        if state.proposals.is_empty() {
            return Ok(Winner::NoProposals);
        }

        // Strict `>` keeps the earliest leader on ties; index 0 wins when
        // nothing has been voted on.
        let mut best_index = 0;
        let mut best_votes = 0;
        for (index, proposal) in state.proposals.iter().enumerate() {
            if proposal.vote_count > best_votes {
                best_index = index;
                best_votes = proposal.vote_count;
            }
        }

        Ok(Winner::Proposal(state.proposals[best_index].name.clone()))
    }

    fn proposals(&self) -> Result<Vec<ProposalView>, LedgerError> {
        let state = self.read_state()?;
        Ok(state
            .proposals
            .iter()
            .enumerate()
            .map(|(index, proposal)| ProposalView::new(index as u64, proposal))
            .collect())
    }
}
