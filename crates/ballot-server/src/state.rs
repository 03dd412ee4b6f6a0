use std::sync::Arc;

use ballot_ledger::VotingLedger;
use ballot_protocol::DeploymentDescriptor;

use crate::auth::AuthProvider;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<VotingLedger>,
    pub descriptor: Arc<DeploymentDescriptor>,
    pub auth: Arc<dyn AuthProvider>,
}

impl AppState {
    pub fn new(
        ledger: Arc<VotingLedger>,
        descriptor: Arc<DeploymentDescriptor>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            ledger,
            descriptor,
            auth,
        }
    }
}
