use std::collections::BTreeMap;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use ballot_types::AccountId;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    Anonymous,
}

impl Credentials {
    /// Read credentials from an `Authorization: Bearer <token>` header.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| Self::Bearer(token.trim().to_string()))
            .filter(|creds| !matches!(creds, Self::Bearer(t) if t.is_empty()))
            .unwrap_or(Self::Anonymous)
    }
}

/// Resolves request credentials to the calling account.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<AccountId>;
}

/// Treats the bearer token itself as a hex account id, so any client can act
/// as any account. Only enabled by `dev_account_tokens`.
pub struct AccountTokenAuth;

#[async_trait]
impl AuthProvider for AccountTokenAuth {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<AccountId> {
        match credentials {
            Credentials::Bearer(token) => AccountId::from_hex(token).map_err(|e| {
                ServerError::AuthFailed(format!("bearer token is not an account: {e}"))
            }),
            Credentials::Anonymous => Err(ServerError::AuthFailed("credentials required".into())),
        }
    }
}

/// Maps issued bearer tokens to accounts. With no tokens issued every
/// authenticated request is refused.
pub struct TokenAuth {
    tokens: BTreeMap<String, AccountId>,
}

impl TokenAuth {
    pub fn new(tokens: BTreeMap<String, AccountId>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl AuthProvider for TokenAuth {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<AccountId> {
        match credentials {
            Credentials::Bearer(token) => self
                .tokens
                .get(token)
                .cloned()
                .ok_or_else(|| ServerError::AuthFailed("unknown token".into())),
            Credentials::Anonymous => Err(ServerError::AuthFailed("credentials required".into())),
        }
    }
}

/// The authenticated account a request acts as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller(pub AccountId);

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let credentials = Credentials::from_headers(&parts.headers);
        state.auth.authenticate(&credentials).await.map(Caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn credentials_from_headers() {
        assert_eq!(
            Credentials::from_headers(&headers("Bearer abc")),
            Credentials::Bearer("abc".into())
        );
        assert_eq!(Credentials::from_headers(&headers("Basic abc")), Credentials::Anonymous);
        assert_eq!(Credentials::from_headers(&headers("Bearer ")), Credentials::Anonymous);
        assert_eq!(Credentials::from_headers(&HeaderMap::new()), Credentials::Anonymous);
    }

    #[tokio::test]
    async fn account_token_auth() {
        let who = AccountId::from_raw([6; 32]);
        let auth = AccountTokenAuth;
        let id = auth.authenticate(&Credentials::Bearer(who.to_hex())).await.unwrap();
        assert_eq!(id, who);

        assert!(auth.authenticate(&Credentials::Bearer("xyz".into())).await.is_err());
        assert!(auth.authenticate(&Credentials::Anonymous).await.is_err());
    }

    #[tokio::test]
    async fn token_auth_uses_issued_tokens() {
        let who = AccountId::from_raw([7; 32]);
        let auth = TokenAuth::new(BTreeMap::from([("alice-token".to_string(), who.clone())]));

        let id = auth.authenticate(&Credentials::Bearer("alice-token".into())).await.unwrap();
        assert_eq!(id, who);

        let err = auth.authenticate(&Credentials::Bearer(who.to_hex())).await.unwrap_err();
        assert!(matches!(err, ServerError::AuthFailed(_)));
    }

    #[tokio::test]
    async fn empty_token_table_refuses_everyone() {
        let auth = TokenAuth::new(BTreeMap::new());
        let owner = AccountId::from_raw([1; 32]);
        let err = auth.authenticate(&Credentials::Bearer(owner.to_hex())).await.unwrap_err();
        assert!(matches!(err, ServerError::AuthFailed(_)));
    }
}
