use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use ballot_types::AccountId;

use crate::abi::{ledger_abi, AbiEntry, AbiEntryKind};
use crate::error::{ProtocolError, ProtocolResult};

/// The record a client reads to locate and bind to a hosted ledger.
///
/// Written once, when the ledger is brought up: the ledger's address plus
/// its ordered operation schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentDescriptor {
    pub address: AccountId,
    pub abi: Vec<AbiEntry>,
}

impl DeploymentDescriptor {
    pub fn new(address: AccountId) -> Self {
        Self {
            address,
            abi: ledger_abi(),
        }
    }

    /// Descriptor for a ledger deployed by `owner` under `label`.
    ///
    /// The address is derived from both, so the same owner can host several
    /// ledgers under different labels.
    pub fn for_owner(owner: &AccountId, label: &str) -> Self {
        Self::new(ledger_address(owner, label))
    }

    /// Look up a function by name.
    pub fn function(&self, name: &str) -> ProtocolResult<&AbiEntry> {
        self.abi
            .iter()
            .find(|e| e.kind == AbiEntryKind::Function && e.name == name)
            .ok_or_else(|| ProtocolError::MissingOperation(name.to_string()))
    }

    pub fn to_json(&self) -> ProtocolResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ProtocolError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> ProtocolResult<Self> {
        serde_json::from_str(json).map_err(|e| ProtocolError::Deserialization(e.to_string()))
    }

    pub fn write_to(&self, path: &Path) -> ProtocolResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), address = %self.address, "deployment descriptor written");
        Ok(())
    }

    pub fn read_from(path: &Path) -> ProtocolResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Address of the ledger `owner` deploys under `label`.
pub fn ledger_address(owner: &AccountId, label: &str) -> AccountId {
    owner.child(&format!("ledger:{label}"))
}
