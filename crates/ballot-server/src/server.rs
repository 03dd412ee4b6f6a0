use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use ballot_ledger::{EventFilter, VotingLedger};
use ballot_protocol::DeploymentDescriptor;
use ballot_types::AccountId;

use crate::auth::{AccountTokenAuth, AuthProvider, TokenAuth};
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// HTTP host for a single voting ledger.
pub struct BallotServer {
    config: ServerConfig,
    state: AppState,
}

impl BallotServer {
    /// Bring up the ledger described by `config` and write its deployment
    /// descriptor if a path is configured.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;

        let owner = match &config.owner {
            Some(owner) => owner.clone(),
            None => {
                let owner = AccountId::ephemeral();
                warn!(owner = %owner.to_hex(), "no owner configured, generated one");
                owner
            }
        };

        let ledger =
            VotingLedger::with_proposals(owner.clone(), config.seed_proposals.iter().cloned())?
                .with_event_capacity(config.event_capacity);

        let descriptor = DeploymentDescriptor::for_owner(&owner, &config.deployment_label);
        if let Some(path) = &config.descriptor_path {
            descriptor.write_to(path)?;
        }

        let auth: Arc<dyn AuthProvider> = if config.dev_account_tokens {
            warn!("dev_account_tokens is set: any bearer account id is trusted, owner included");
            Arc::new(AccountTokenAuth)
        } else {
            if config.tokens.is_empty() {
                warn!("no bearer tokens configured, proposals and votes will be refused");
            }
            Arc::new(TokenAuth::new(config.tokens.clone()))
        };

        let state = AppState::new(Arc::new(ledger), Arc::new(descriptor), auth);
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<VotingLedger> {
        &self.state.ledger
    }

    pub fn descriptor(&self) -> &DeploymentDescriptor {
        &self.state.descriptor
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Serve requests until ctrl-c.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        info!(
            addr = %self.config.bind_addr,
            address = %self.state.descriptor.address,
            "ballot server listening"
        );

        let mut events = self.state.ledger.subscribe(EventFilter::default());
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => debug!(seq = event.seq, kind = %event.kind(), "ledger event"),
                    Err(RecvError::Lagged(skipped)) => warn!(skipped, "event log fell behind"),
                    Err(RecvError::Closed) => break,
                }
            }
        });

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(ServerError::Io)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
