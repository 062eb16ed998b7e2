use super::SpotifyClient;
use crate::error::Result;

impl SpotifyClient {
    /// Returns a bearer token, requesting a fresh one when the cached token
    /// is missing or within the expiry buffer.
    pub(crate) async fn access_token(&self) -> Result<String> {
        let mut tokens = self.tokens.lock().await;
        tokens.get_valid_token(&self.http, &self.config).await
    }
}
