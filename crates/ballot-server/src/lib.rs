//! HTTP host for a Ballot Ledger.
//!
//! Serves one voting ledger as a JSON API with bearer-token caller
//! authentication, CORS for browser clients, and a deployment descriptor.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use auth::{AccountTokenAuth, AuthProvider, Caller, Credentials, TokenAuth};
pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::BallotServer;
pub use state::AppState;
