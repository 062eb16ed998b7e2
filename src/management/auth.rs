use chrono::Utc;
use reqwest::Client;

use crate::{
    config::SpotifyConfig,
    error::{Error, Result},
    types::Token,
};

/// Seconds before the reported expiry at which a token counts as expired.
const EXPIRY_BUFFER_SECS: u64 = 240;

/// Caches the client-credentials token and requests a new one when the
/// current token is missing or about to expire.
#[derive(Debug, Default)]
pub struct TokenManager {
    token: Option<Token>,
}

impl TokenManager {
    pub fn new() -> Self {
        Self { token: None }
    }

    pub fn with_token(token: Token) -> Self {
        Self { token: Some(token) }
    }

    pub async fn get_valid_token(&mut self, client: &Client, config: &SpotifyConfig) -> Result<String> {
        if self.is_expired() {
            let token = Self::request_token(client, config).await?;
            self.token = Some(token);
        }

        match &self.token {
            Some(token) => Ok(token.access_token.clone()),
            None => Err(Error::Auth("no Spotify token available".to_string())),
        }
    }

    pub fn is_expired(&self) -> bool {
        match &self.token {
            Some(token) => {
                let now = Utc::now().timestamp() as u64;
                now >= token.obtained_at + token.expires_in.saturating_sub(EXPIRY_BUFFER_SECS)
            }
            None => true,
        }
    }

    async fn request_token(client: &Client, config: &SpotifyConfig) -> Result<Token> {
        let res = client
            .post(&config.token_url)
            .basic_auth(&config.client_id, Some(&config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| Error::Auth(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Auth(e.to_string()))?;

        let mut token: Token = res.json().await.map_err(|e| Error::Auth(e.to_string()))?;
        token.obtained_at = Utc::now().timestamp() as u64;
        Ok(token)
    }
}
