/// HTTP endpoint paths served by a ballot host.
pub mod endpoints {
    pub const HEALTH: &str = "/v1/health";
    pub const INFO: &str = "/v1/info";
    pub const DESCRIPTOR: &str = "/v1/descriptor";
    pub const PROPOSALS: &str = "/v1/proposals";
    pub const PROPOSAL_COUNT: &str = "/v1/count";
    pub const PROPOSAL: &str = "/v1/proposals/:index";
    pub const VOTES: &str = "/v1/votes";
    pub const VOTER: &str = "/v1/voters/:account";
    pub const WINNER: &str = "/v1/winner";
    pub const EVENTS: &str = "/v1/events";

    /// Concrete path for one proposal.
    pub fn proposal(index: i64) -> String {
        format!("{PROPOSALS}/{index}")
    }

    /// Concrete path for one voter lookup.
    pub fn voter(account: &str) -> String {
        format!("/v1/voters/{account}")
    }
}

/// Health check response.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub protocol_version: u32,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            protocol_version: super::message::PROTOCOL_VERSION,
        }
    }
}
