use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use ballot_types::{AccountId, ProposalName};

use crate::error::{ServerError, ServerResult};

/// Settings for hosting one voting ledger.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Account allowed to add proposals. A random one is generated when unset.
    pub owner: Option<AccountId>,
    /// Proposals present from the start, in index order.
    pub seed_proposals: Vec<String>,
    /// Label the ledger address is derived from, together with the owner.
    pub deployment_label: String,
    /// Where to write the deployment descriptor on startup.
    pub descriptor_path: Option<PathBuf>,
    /// Buffered events per subscriber before it starts lagging.
    pub event_capacity: usize,
    pub request_timeout_secs: u64,
    /// Origins allowed by CORS. Empty means any origin.
    pub allow_origins: Vec<String>,
    /// Bearer token to account map. Only listed tokens are accepted.
    pub tokens: BTreeMap<String, AccountId>,
    /// Accept any hex account id as a bearer token instead of `tokens`.
    /// Anyone can then act as any account, the owner included; for local
    /// development only.
    pub dev_account_tokens: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            owner: None,
            seed_proposals: Vec::new(),
            deployment_label: "default".into(),
            descriptor_path: None,
            event_capacity: 1024,
            request_timeout_secs: 30,
            allow_origins: Vec::new(),
            tokens: BTreeMap::new(),
            dev_account_tokens: false,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(source: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> ServerResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> ServerResult<()> {
        for (index, seed) in self.seed_proposals.iter().enumerate() {
            ProposalName::new(seed.as_str()).map_err(|e| {
                ServerError::Config(format!("seed proposal {index} is invalid: {e}"))
            })?;
        }
        if self.deployment_label.is_empty() {
            return Err(ServerError::Config("deployment_label must not be empty".into()));
        }
        if self.event_capacity == 0 {
            return Err(ServerError::Config("event_capacity must be positive".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ServerError::Config("request_timeout_secs must be positive".into()));
        }
        if self.dev_account_tokens && !self.tokens.is_empty() {
            return Err(ServerError::Config(
                "dev_account_tokens and tokens are mutually exclusive".into(),
            ));
        }
        for origin in &self.allow_origins {
            origin
                .parse::<axum::http::HeaderValue>()
                .map_err(|_| ServerError::Config(format!("invalid origin: {origin}")))?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert!(c.owner.is_none());
        assert!(c.seed_proposals.is_empty());
        assert_eq!(c.request_timeout(), Duration::from_secs(30));
        assert!(c.tokens.is_empty());
        assert!(!c.dev_account_tokens);
        c.validate().unwrap();
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let owner = AccountId::from_raw([4; 32]);
        let source = format!(
            r#"
            bind_addr = "0.0.0.0:9000"
            owner = "{}"
            seed_proposals = ["Alpha", "Beta"]

            [tokens]
            alice = "{}"
            "#,
            owner.to_hex(),
            AccountId::from_raw([5; 32]).to_hex(),
        );
        let c = ServerConfig::from_toml_str(&source).unwrap();
        assert_eq!(c.bind_addr.port(), 9000);
        assert_eq!(c.owner, Some(owner));
        assert_eq!(c.seed_proposals, ["Alpha", "Beta"]);
        assert_eq!(c.tokens["alice"], AccountId::from_raw([5; 32]));
        assert_eq!(c.event_capacity, 1024);
    }

    #[test]
    fn invalid_seed_is_rejected_at_load() {
        let err = ServerConfig::from_toml_str(r#"seed_proposals = ["ok", ""]"#).unwrap_err();
        assert!(matches!(err, ServerError::Config(msg) if msg.contains("seed proposal 1")));
    }

    #[test]
    fn dev_account_tokens_excludes_token_table() {
        let source = format!(
            r#"
            dev_account_tokens = true

            [tokens]
            alice = "{}"
            "#,
            AccountId::from_raw([5; 32]).to_hex(),
        );
        let err = ServerConfig::from_toml_str(&source).unwrap_err();
        assert!(matches!(err, ServerError::Config(msg) if msg.contains("mutually exclusive")));

        let c = ServerConfig::from_toml_str("dev_account_tokens = true").unwrap();
        assert!(c.dev_account_tokens);
    }

    #[test]
    fn unparsable_owner_is_rejected() {
        let err = ServerConfig::from_toml_str(r#"owner = "not-hex""#).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = ServerConfig::from_toml_str("event_capacity = 0").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ballot.toml");
        std::fs::write(&path, "deployment_label = \"test\"\n").unwrap();
        assert_eq!(ServerConfig::load(&path).unwrap().deployment_label, "test");
    }
}
