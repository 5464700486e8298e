//! Credential exchange against the Annotatron server

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

use super::error::TransportError;
use super::role::Identity;

const TOKEN_ENDPOINT: &str = "v1/auth/token";
const IDENTITY_ENDPOINT: &str = "v1/control/user";

/// Username and password for one login attempt.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Result of a token request. `token` is only meaningful for status 200.
#[derive(Debug, Clone)]
pub struct TokenResponse {
    pub status: u16,
    pub token: Option<SessionToken>,
}

impl TokenResponse {
    pub fn is_success(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }
}

/// Remote capability that trades credentials for a token and reports who a
/// token belongs to.
#[async_trait]
pub trait CredentialExchange: Send + Sync {
    async fn request_token(
        &self,
        credentials: &Credentials,
    ) -> Result<TokenResponse, TransportError>;

    async fn check_identity(&self, token: &SessionToken) -> Result<Identity, TransportError>;
}

#[derive(Deserialize)]
struct TokenBody {
    #[serde(alias = "key")]
    token: Option<String>,
}

/// `CredentialExchange` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCredentialExchange {
    base: Url,
    client: reqwest::Client,
}

impl HttpCredentialExchange {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let base = parse_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("annotatron-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { base, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base
            .join(path)
            .map_err(|e| TransportError::Unavailable(format!("invalid endpoint {}: {}", path, e)))
    }
}

/// Parse a server URL, making sure relative joins land under its path.
fn parse_base_url(base_url: &str) -> Result<Url, TransportError> {
    let mut base = Url::parse(base_url).map_err(|e| {
        TransportError::Unavailable(format!("invalid server URL '{}': {}", base_url, e))
    })?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

#[async_trait]
impl CredentialExchange for HttpCredentialExchange {
    async fn request_token(
        &self,
        credentials: &Credentials,
    ) -> Result<TokenResponse, TransportError> {
        let url = self.endpoint(TOKEN_ENDPOINT)?;
        tracing::debug!(%url, username = %credentials.username, "requesting token");

        let resp = self.client.post(url).json(credentials).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Ok(TokenResponse {
                status: status.as_u16(),
                token: None,
            });
        }

        let body: TokenBody = resp.json().await?;
        Ok(TokenResponse {
            status: status.as_u16(),
            token: body.token.map(SessionToken),
        })
    }

    async fn check_identity(&self, token: &SessionToken) -> Result<Identity, TransportError> {
        let url = self.endpoint(IDENTITY_ENDPOINT)?;
        tracing::debug!(%url, "checking identity");

        let resp = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Token {}", token.as_str()))
            .send()
            .await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(TransportError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: IDENTITY_ENDPOINT.to_string(),
            });
        }

        Ok(resp.json().await?)
    }
}
