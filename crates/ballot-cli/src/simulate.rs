use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use ballot_ledger::{
    LedgerReader, LedgerWriter, ProjectionBuilder, StandingsProjection, VotingLedger,
};
use ballot_types::{AccountId, IdentityMaterial};

/// A scripted voting session. Accounts are named; each name maps to a
/// stable account derived from it.
#[derive(Clone, Debug, Deserialize)]
pub struct Script {
    pub owner: String,
    #[serde(default)]
    pub seeds: Vec<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Step {
    /// Add a proposal; the caller defaults to the owner.
    Add { name: String, caller: Option<String> },
    Vote { caller: String, index: u64 },
}

#[derive(Clone, Debug, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub description: String,
    /// Error kind when the ledger rejected the step.
    pub rejected: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SimulationReport {
    pub owner: AccountId,
    pub outcomes: Vec<StepOutcome>,
    pub standings: StandingsProjection,
    pub winner: String,
    pub events: usize,
}

impl Script {
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        toml::from_str(source).context("invalid simulation script")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&source)
    }
}

/// Stable account for a script participant name.
pub fn named_account(name: &str) -> AccountId {
    AccountId::derive(&IdentityMaterial::Address(name.as_bytes().to_vec()))
}

/// Run `script` against a fresh ledger. Rejected steps are recorded, not
/// fatal; the ledger invariants are checked once all steps have run.
pub fn run(script: &Script) -> anyhow::Result<SimulationReport> {
    let owner = named_account(&script.owner);
    let ledger = VotingLedger::with_proposals(owner.clone(), script.seeds.iter().cloned())
        .context("invalid seed proposal")?;

    let mut outcomes = Vec::with_capacity(script.steps.len());
    for (step, action) in script.steps.iter().enumerate() {
        let (description, result) = match action {
            Step::Add { name, caller } => {
                let who = caller.as_deref().unwrap_or(script.owner.as_str());
                let result = ledger.add_proposal(name, &named_account(who));
                let description = match &result {
                    Ok(index) => format!("{who} added {name:?} as #{index}"),
                    Err(_) => format!("{who} add {name:?}"),
                };
                (description, result.map(drop))
            }
            Step::Vote { caller, index } => {
                let result = ledger.vote(*index, &named_account(caller));
                (format!("{caller} voted for #{index}"), result)
            }
        };
        outcomes.push(StepOutcome {
            step: step + 1,
            description,
            rejected: result.err().map(|e| e.kind().to_string()),
        });
    }

    ledger.verify().context("ledger invariants violated")?;

    Ok(SimulationReport {
        owner,
        outcomes,
        standings: ProjectionBuilder::standings(&ledger)?,
        winner: ledger.winner()?.text().to_string(),
        events: ledger.events_since(0)?.len(),
    })
}
