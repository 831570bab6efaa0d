// ===========================================================================
// auth - OAuth Token Loading & Refresh
// ===========================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

pub type Result<T> = std::result::Result<T, Error>;

/// Overrides the token file when set
pub const ACCESS_TOKEN_ENV: &str = "MLCTL_ACCESS_TOKEN";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to access token file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "not authorized: no token at {}; save an OAuth token there or set {ACCESS_TOKEN_ENV}",
        .0.display()
    )]
    Unauthorized(PathBuf),

    #[error("token at {} expired and cannot be refreshed", .0.display())]
    Expired(PathBuf),

    #[error("no OAuth client id/secret in {}", .0.display())]
    NoClient(PathBuf),

    #[error("token refresh failed: {0}")]
    Refresh(String),
}

/// Token file contents, in the layout Google's Python client writes.
///
/// Keys this tool does not use (`scopes`, `universe_domain`, ...) are kept
/// so a rewritten file stays readable by that client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    #[serde(rename = "token", alias = "access_token")]
    pub access_token: String,

    #[serde(default)]
    pub refresh_token: Option<String>,

    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl StoredToken {
    /// Usable now, with a safety margin before expiry
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            None => true,
            Some(expiry) => expiry - TimeDelta::seconds(EXPIRY_MARGIN_SECS) > now,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// OAuth client registration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct OAuthClient {
    pub client_id: String,
    pub client_secret: String,

    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Deserialize)]
struct ClientSecrets {
    installed: Option<OAuthClient>,
    web: Option<OAuthClient>,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: Option<i64>,
    refresh_token: Option<String>,
}

/// Parse a client secrets file (`installed` or `web` application)
pub fn load_client(path: &Path) -> Result<OAuthClient> {
    let content = std::fs::read_to_string(path)?;
    let secrets: ClientSecrets = serde_json::from_str(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    secrets
        .installed
        .or(secrets.web)
        .ok_or_else(|| Error::NoClient(path.to_path_buf()))
}

/// Return a usable access token: env override, then the token file,
/// refreshing and persisting it when expired.
pub fn access_token(config: &AuthConfig) -> Result<String> {
    if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
        if !token.trim().is_empty() {
            tracing::debug!("using access token from {ACCESS_TOKEN_ENV}");
            return Ok(token.trim().to_string());
        }
    }

    let path = &config.token_file;
    if !path.exists() {
        return Err(Error::Unauthorized(path.clone()));
    }

    let token = StoredToken::load(path)?;
    if token.is_fresh(Utc::now()) {
        return Ok(token.access_token);
    }

    let Some(refresh_token) = token.refresh_token.clone() else {
        return Err(Error::Expired(path.clone()));
    };

    let client = client_for(&token, &config.credentials_file)?;
    tracing::debug!(token_uri = %client.token_uri, "refreshing access token");

    let refreshed = refresh(&client, &refresh_token, token, Utc::now())?;
    refreshed.save(path)?;
    Ok(refreshed.access_token)
}

/// Client credentials embedded in the token file win over the secrets file
fn client_for(token: &StoredToken, credentials_file: &Path) -> Result<OAuthClient> {
    match (&token.client_id, &token.client_secret) {
        (Some(id), Some(secret)) => Ok(OAuthClient {
            client_id: id.clone(),
            client_secret: secret.clone(),
            token_uri: token.token_uri.clone().unwrap_or_else(default_token_uri),
        }),
        _ if credentials_file.exists() => load_client(credentials_file),
        _ => Err(Error::NoClient(credentials_file.to_path_buf())),
    }
}

fn refresh(
    client: &OAuthClient,
    refresh_token: &str,
    previous: StoredToken,
    now: DateTime<Utc>,
) -> Result<StoredToken> {
    let agent = ureq::Agent::new_with_config(
        ureq::config::Config::builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .build(),
    );

    let form = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", client.client_id.as_str()),
        ("client_secret", client.client_secret.as_str()),
    ];

    let mut response = agent
        .post(&client.token_uri)
        .send_form(form)
        .map_err(|e| Error::Refresh(e.to_string()))?;

    // The endpoint explains rejections (invalid_grant, invalid_client) in the body
    let status = response.status();
    if !status.is_success() {
        let body = response.body_mut().read_to_string().unwrap_or_default();
        return Err(Error::Refresh(format!(
            "HTTP {}: {}",
            status.as_u16(),
            body.trim()
        )));
    }

    let refreshed: RefreshResponse = response
        .body_mut()
        .read_json()
        .map_err(|e| Error::Refresh(e.to_string()))?;

    Ok(apply_refresh(previous, refreshed, now))
}

fn apply_refresh(previous: StoredToken, response: RefreshResponse, now: DateTime<Utc>) -> StoredToken {
    StoredToken {
        access_token: response.access_token,
        refresh_token: response.refresh_token.or(previous.refresh_token),
        expiry: response
            .expires_in
            .map(|secs| now + TimeDelta::seconds(secs)),
        ..previous
    }
}
