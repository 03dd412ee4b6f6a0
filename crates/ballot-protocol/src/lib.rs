//! Client contract for the Ballot Ledger.
//!
//! Everything a client needs to locate and talk to a hosted ledger: the
//! ordered operation schema, the deployment descriptor that pairs it with a
//! ledger address, the HTTP endpoint paths, and the request/response bodies.

pub mod abi;
pub mod descriptor;
pub mod endpoint;
pub mod error;
pub mod message;

pub use abi::{ledger_abi, AbiEntry, AbiEntryKind, AbiParam, StateMutability};
pub use descriptor::{ledger_address, DeploymentDescriptor};
pub use endpoint::{endpoints, HealthResponse};
pub use error::{ProtocolError, ProtocolResult};
pub use message::{
    AddProposalRequest, AddProposalResponse, CountResponse, ErrorResponse, EventsResponse,
    HasVotedResponse, InfoResponse, ProposalListResponse, VoteRequest, VoteResponse,
    WinnerResponse, PROTOCOL_VERSION,
};
