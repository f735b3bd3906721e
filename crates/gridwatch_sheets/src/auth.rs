//! OAuth2 installed-app flow for the Sheets API
//!
//! Loads the Google client credentials, keeps an access token cached on disk
//! (`token.json`), refreshes it when it nears expiry, and falls back to the
//! interactive authorization-code flow on first run: the operator opens a
//! printed URL in a browser and types the code back on stdin.

use crate::error::{Result, SheetsError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Read-only scope; widening it invalidates cached tokens.
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

/// Out-of-band redirect: Google shows the code for the operator to copy.
const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Refresh this many seconds before the token actually expires.
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// The client section of a Google `credentials.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct InstalledCredentials {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

/// Top-level `credentials.json` shape. Google nests the client under
/// `installed` for desktop apps (or `web` for web apps).
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(alias = "web")]
    installed: InstalledCredentials,
}

/// On-disk token cache (`token.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix seconds at which the access token expires.
    pub expires_at: u64,
}

impl CachedToken {
    /// Expired (or close enough that a fetch might race the expiry).
    pub fn is_expired(&self, now_unix: u64) -> bool {
        now_unix + TOKEN_EXPIRY_MARGIN_SECS >= self.expires_at
    }
}

/// Token endpoint success payload.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Token endpoint error payload.
#[derive(Debug, Deserialize)]
struct TokenErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Supplies a ready-to-use bearer token to the Sheets client.
pub struct Authenticator {
    credentials: InstalledCredentials,
    cache_path: PathBuf,
    http_client: reqwest::Client,
    token: Option<CachedToken>,
}

impl Authenticator {
    /// Load credentials (fatal if missing or malformed) and any cached token
    /// (absence is fine; the interactive flow covers first runs).
    pub fn from_files(credentials_path: &Path, cache_path: &Path) -> Result<Self> {
        let credentials = load_credentials(credentials_path)?;
        let token = load_cached_token(cache_path);
        if token.is_some() {
            debug!(cache = %cache_path.display(), "Loaded cached token");
        }
        Ok(Self {
            credentials,
            cache_path: cache_path.to_path_buf(),
            http_client: reqwest::Client::new(),
            token,
        })
    }

    /// A bearer token valid for at least the expiry margin.
    ///
    /// Order: cached token if still fresh, refresh grant if we hold a
    /// refresh token, otherwise the interactive authorization-code flow.
    pub async fn access_token(&mut self) -> Result<String> {
        let now = now_unix();
        if let Some(token) = &self.token {
            if !token.is_expired(now) {
                return Ok(token.access_token.clone());
            }
            if let Some(refresh_token) = token.refresh_token.clone() {
                info!("Access token expired, refreshing");
                let refreshed = self.refresh(&refresh_token).await?;
                return Ok(refreshed);
            }
        }

        info!("No usable cached token, starting interactive authorization");
        self.authorize_interactively().await
    }

    /// The URL the operator opens to grant read access.
    pub fn authorize_url(&self) -> Result<String> {
        let url = reqwest::Url::parse_with_params(
            &self.credentials.auth_uri,
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("redirect_uri", OOB_REDIRECT_URI),
                ("response_type", "code"),
                ("scope", SHEETS_READONLY_SCOPE),
                ("access_type", "offline"),
            ],
        )
        .map_err(|e| SheetsError::Credentials(format!("Invalid auth_uri: {e}")))?;
        Ok(url.into())
    }

    async fn authorize_interactively(&mut self) -> Result<String> {
        let url = self.authorize_url()?;
        println!("Go to the following link in your browser then type the authorization code:");
        println!("{url}");
        print!("> ");
        std::io::stdout().flush()?;

        let mut code = String::new();
        std::io::stdin().lock().read_line(&mut code)?;
        let code = code.trim();
        if code.is_empty() {
            return Err(SheetsError::TokenExchange(
                "No authorization code entered".to_string(),
            ));
        }

        let form = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("redirect_uri", OOB_REDIRECT_URI),
            ("code", code),
        ];
        let token = self.request_token(&form).await?;
        self.store(token)
    }

    async fn refresh(&mut self, refresh_token: &str) -> Result<String> {
        let form = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];
        let mut token = self.request_token(&form).await?;
        // Refresh responses usually omit the refresh token; keep the old one.
        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token.to_string());
        }
        self.store(token)
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = self
            .http_client
            .post(&self.credentials.token_uri)
            .form(form)
            .send()
            .await?;

        if response.status().is_success() {
            let token: TokenResponse = response.json().await?;
            info!("Obtained access token");
            return Ok(token);
        }

        let status = response.status().as_u16();
        match response.json::<TokenErrorBody>().await {
            Ok(body) => Err(SheetsError::TokenExchange(format!(
                "{} - {}",
                body.error,
                body.error_description.unwrap_or_default()
            ))),
            Err(_) => Err(SheetsError::TokenExchange(format!(
                "token endpoint returned status {status}"
            ))),
        }
    }

    /// Cache the token in memory and on disk, then hand back the bearer.
    fn store(&mut self, response: TokenResponse) -> Result<String> {
        let cached = CachedToken {
            access_token: response.access_token.clone(),
            refresh_token: response.refresh_token,
            expires_at: now_unix() + response.expires_in.unwrap_or(3600),
        };
        save_cached_token(&self.cache_path, &cached)?;
        info!(cache = %self.cache_path.display(), "Saved credential cache");
        self.token = Some(cached);
        Ok(response.access_token)
    }
}

fn load_credentials(path: &Path) -> Result<InstalledCredentials> {
    let content = fs::read_to_string(path).map_err(|e| {
        SheetsError::Credentials(format!("Unable to read {}: {e}", path.display()))
    })?;
    let file: CredentialsFile = serde_json::from_str(&content).map_err(|e| {
        SheetsError::Credentials(format!("Unable to parse {}: {e}", path.display()))
    })?;
    Ok(file.installed)
}

fn load_cached_token(path: &Path) -> Option<CachedToken> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

fn save_cached_token(path: &Path, token: &CachedToken) -> Result<()> {
    let content = serde_json::to_string_pretty(token)?;
    fs::write(path, content)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
