use crate::error::ServiceError;
use crate::models::{PlaylistObject, TrackPage};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Tokens this close to expiry are refreshed before use
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// The slice of a playlist Web API needed to export a playlist.
#[async_trait]
pub trait PlaylistApi: Send + Sync {
    /// Playlist metadata together with its first page of items.
    async fn fetch_playlist(&self, playlist_id: &str) -> Result<PlaylistObject, ServiceError>;

    /// Follows a page's `next` link.
    async fn fetch_next_page(&self, next_url: &str) -> Result<TrackPage, ServiceError>;
}

/// Spotify Web API client using the client-credentials grant.
#[derive(Debug)]
pub struct SpotifyApiClient {
    api_url: String,
    accounts_url: String,
    client_id: String,
    client_secret: String,
    client: Client,
    token: Mutex<Option<AccessToken>>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

impl SpotifyApiClient {
    pub fn new(
        api_url: String,
        accounts_url: String,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            accounts_url,
            client_id,
            client_secret,
            client: Client::new(),
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> Result<String, ServiceError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() + TOKEN_REFRESH_MARGIN {
                return Ok(token.value.clone());
            }
        }

        tracing::debug!("Requesting Spotify access token from {}", self.accounts_url);

        let response = self
            .client
            .post(&self.accounts_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| ServiceError::Api(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Spotify token error: {} - {}", status, body);
            return Err(ServiceError::Authentication(format!(
                "token endpoint returned status: {} - {}",
                status,
                excerpt(&body, 200)
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Decode(format!("Failed to parse token response: {}", e)))?;

        let value = token.access_token.clone();
        *cached = Some(AccessToken {
            value: token.access_token,
            expires_at: token_expiry(Instant::now(), token.expires_in),
        });

        Ok(value)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ServiceError> {
        let token = self.access_token().await?;

        tracing::debug!("Requesting Spotify resource: {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| ServiceError::Api(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Spotify API error: {} - {}", status, body);
            return Err(ServiceError::Api(format!(
                "API returned status: {} - {}",
                status,
                excerpt(&body, 200)
            )));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ServiceError::Api(format!("Failed to read response: {}", e)))?;

        tracing::debug!("Spotify response: {}", excerpt(&response_text, 500));

        serde_json::from_str(&response_text).map_err(|e| {
            ServiceError::Decode(format!(
                "Failed to parse response: {} - Response: {}",
                e,
                excerpt(&response_text, 200)
            ))
        })
    }
}

#[async_trait]
impl PlaylistApi for SpotifyApiClient {
    async fn fetch_playlist(&self, playlist_id: &str) -> Result<PlaylistObject, ServiceError> {
        let url = format!("{}/playlists/{}", self.api_url, playlist_id);
        self.get_json(&url).await
    }

    async fn fetch_next_page(&self, next_url: &str) -> Result<TrackPage, ServiceError> {
        self.get_json(next_url).await
    }
}

/// An `expires_in` too large to represent counts as already expired.
fn token_expiry(now: Instant, expires_in: u64) -> Instant {
    now.checked_add(Duration::from_secs(expires_in))
        .unwrap_or(now)
}

/// Cuts `text` to at most `max` bytes without splitting a character.
fn excerpt(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
