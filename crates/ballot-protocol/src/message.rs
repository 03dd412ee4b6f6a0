use serde::{Deserialize, Serialize};
use serde_json::Number;

use ballot_ledger::{LedgerEvent, ProposalView};
use ballot_types::AccountId;

pub const PROTOCOL_VERSION: u32 = 1;

/// Body of `POST /v1/proposals`. The name is validated by the ledger so
/// that a bad name is reported as `InvalidProposal`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddProposalRequest {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddProposalResponse {
    pub index: u64,
}

/// Body of `POST /v1/votes`. Any JSON number is accepted so that negative
/// or oversized indices are reported as `InvalidIndex` instead of a decoding
/// failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    pub index: Number,
}

impl VoteRequest {
    pub fn new(index: u64) -> Self {
        Self {
            index: Number::from(index),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResponse {
    pub voter: AccountId,
    pub index: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalListResponse {
    pub count: u64,
    pub proposals: Vec<ProposalView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HasVotedResponse {
    pub account: AccountId,
    pub has_voted: bool,
}

/// `winner` is either the winning name or the "no proposals" sentinel;
/// `has_proposals` tells the two apart without string comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerResponse {
    pub winner: String,
    pub has_proposals: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<LedgerEvent>,
    /// Highest `seq` returned, or the `since` cursor if nothing is new.
    pub cursor: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
    pub protocol_version: u32,
    pub address: AccountId,
    pub owner: AccountId,
}

/// Error body returned for every failed request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error kind, e.g. `AlreadyVoted`.
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_request_accepts_negative_index() {
        let req: VoteRequest = serde_json::from_str(r#"{"index": -1}"#).unwrap();
        assert_eq!(req.index.as_i64(), Some(-1));
    }

    #[test]
    fn vote_request_accepts_index_past_u64() {
        let req: VoteRequest =
            serde_json::from_str(r#"{"index": 18446744073709551616}"#).unwrap();
        assert!(req.index.as_u64().is_none());
    }

    #[test]
    fn vote_request_serializes_plain_index() {
        let json = serde_json::to_string(&VoteRequest::new(4)).unwrap();
        assert_eq!(json, r#"{"index":4}"#);
    }

    #[test]
    fn proposal_list_shape() {
        let body = ProposalListResponse {
            count: 1,
            proposals: vec![ProposalView {
                index: 0,
                name: ballot_types::ProposalName::new("Alpha").unwrap(),
                vote_count: 2,
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["proposals"][0]["name"], "Alpha");
        assert_eq!(json["proposals"][0]["vote_count"], 2);
    }
}
