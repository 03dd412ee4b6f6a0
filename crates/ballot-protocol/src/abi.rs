use serde::{Deserialize, Serialize};

/// What an ABI entry describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbiEntryKind {
    Function,
    Event,
    Error,
}

/// Whether a function changes ledger state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    View,
    Nonpayable,
}

/// A named, typed parameter of an operation, event, or error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub indexed: bool,
}

impl AbiParam {
    pub fn new(name: &str, ty: &str) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            indexed: false,
        }
    }

    pub fn indexed(name: &str, ty: &str) -> Self {
        Self {
            indexed: true,
            ..Self::new(name, ty)
        }
    }
}

/// One entry of the ledger's operation schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiEntry {
    #[serde(rename = "type")]
    pub kind: AbiEntryKind,
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<AbiParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<StateMutability>,
}

impl AbiEntry {
    fn function(
        name: &str,
        inputs: Vec<AbiParam>,
        outputs: Vec<AbiParam>,
        mutability: StateMutability,
    ) -> Self {
        Self {
            kind: AbiEntryKind::Function,
            name: name.into(),
            inputs,
            outputs,
            state_mutability: Some(mutability),
        }
    }

    fn event(name: &str, inputs: Vec<AbiParam>) -> Self {
        Self {
            kind: AbiEntryKind::Event,
            name: name.into(),
            inputs,
            outputs: vec![],
            state_mutability: None,
        }
    }

    fn error(name: &str, inputs: Vec<AbiParam>) -> Self {
        Self {
            kind: AbiEntryKind::Error,
            name: name.into(),
            inputs,
            outputs: vec![],
            state_mutability: None,
        }
    }

    /// Canonical signature, e.g. `vote(uint256)`.
    pub fn signature(&self) -> String {
        let types: Vec<&str> = self.inputs.iter().map(|p| p.ty.as_str()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    pub fn is_mutating(&self) -> bool {
        self.state_mutability == Some(StateMutability::Nonpayable)
    }
}

/// The ordered operation schema of a voting ledger: six functions, then
/// the two events, then the four error kinds.
pub fn ledger_abi() -> Vec<AbiEntry> {
    use StateMutability::{Nonpayable, View};

    vec![
        AbiEntry::function(
            "addProposal",
            vec![AbiParam::new("name", "string")],
            vec![AbiParam::new("index", "uint256")],
            Nonpayable,
        ),
        AbiEntry::function(
            "vote",
            vec![AbiParam::new("index", "uint256")],
            vec![],
            Nonpayable,
        ),
        AbiEntry::function("count", vec![], vec![AbiParam::new("", "uint256")], View),
        AbiEntry::function(
            "getProposal",
            vec![AbiParam::new("index", "uint256")],
            vec![
                AbiParam::new("name", "string"),
                AbiParam::new("voteCount", "uint256"),
            ],
            View,
        ),
        AbiEntry::function(
            "hasVoted",
            vec![AbiParam::new("voter", "address")],
            vec![AbiParam::new("", "bool")],
            View,
        ),
        AbiEntry::function("getWinner", vec![], vec![AbiParam::new("", "string")], View),
        AbiEntry::event(
            "ProposalAdded",
            vec![
                AbiParam::indexed("index", "uint256"),
                AbiParam::new("name", "string"),
            ],
        ),
        AbiEntry::event(
            "Voted",
            vec![
                AbiParam::indexed("voter", "address"),
                AbiParam::indexed("index", "uint256"),
            ],
        ),
        AbiEntry::error("Unauthorized", vec![AbiParam::new("caller", "address")]),
        AbiEntry::error("InvalidProposal", vec![]),
        AbiEntry::error(
            "InvalidIndex",
            vec![
                AbiParam::new("index", "uint256"),
                AbiParam::new("count", "uint256"),
            ],
        ),
        AbiEntry::error("AlreadyVoted", vec![AbiParam::new("voter", "address")]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abi_lists_operations_in_order() {
        let abi = ledger_abi();
        let functions: Vec<&str> = abi
            .iter()
            .filter(|e| e.kind == AbiEntryKind::Function)
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(
            functions,
            ["addProposal", "vote", "count", "getProposal", "hasVoted", "getWinner"]
        );
        assert_eq!(abi.iter().filter(|e| e.kind == AbiEntryKind::Event).count(), 2);
        assert_eq!(abi.iter().filter(|e| e.kind == AbiEntryKind::Error).count(), 4);
    }

    #[test]
    fn only_add_and_vote_mutate() {
        let mutating: Vec<String> = ledger_abi()
            .iter()
            .filter(|e| e.is_mutating())
            .map(AbiEntry::signature)
            .collect();
        assert_eq!(mutating, ["addProposal(string)", "vote(uint256)"]);
    }

    #[test]
    fn json_shape_matches_abi_conventions() {
        let abi = ledger_abi();
        let vote = serde_json::to_value(&abi[1]).unwrap();
        assert_eq!(vote["type"], "function");
        assert_eq!(vote["stateMutability"], "nonpayable");
        assert!(vote.get("outputs").is_none());

        let voted = serde_json::to_value(&abi[7]).unwrap();
        assert_eq!(voted["type"], "event");
        assert_eq!(voted["inputs"][0]["indexed"], true);

        let count = serde_json::to_value(&abi[2]).unwrap();
        assert!(count["inputs"][0].is_null());
        assert!(count["outputs"][0].get("indexed").is_none());
    }
}
