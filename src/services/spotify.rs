use crate::config::{Config, DEFAULT_SPOTIFY_ACCOUNTS_URL, DEFAULT_SPOTIFY_API_URL};
use crate::error::ServiceError;
use crate::models::PlaylistExport;
use crate::services::playlist_url::extract_playlist_id;
use crate::services::rows::build_track_rows;
use crate::services::spotify_api::{PlaylistApi, SpotifyApiClient};
use crate::services::ServicePlugin;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

const FALLBACK_PLAYLIST_NAME: &str = "playlist";

#[derive(Debug, Clone)]
struct Credentials {
    client_id: String,
    client_secret: String,
}

pub struct SpotifyPlugin {
    credentials: Option<Credentials>,
    api_url: String,
    accounts_url: String,
    /// Built on first export and reused afterwards
    api: OnceCell<Arc<dyn PlaylistApi>>,
}

impl SpotifyPlugin {
    pub fn new(config: &Config) -> Self {
        Self {
            api_url: config.spotify_api_url.clone(),
            accounts_url: config.spotify_accounts_url.clone(),
            ..Self::from_credentials(
                config.spotify_client_id.clone(),
                config.spotify_client_secret.clone(),
            )
        }
    }

    pub fn from_credentials(client_id: Option<String>, client_secret: Option<String>) -> Self {
        Self {
            credentials: Self::credentials(client_id, client_secret),
            api_url: DEFAULT_SPOTIFY_API_URL.to_string(),
            accounts_url: DEFAULT_SPOTIFY_ACCOUNTS_URL.to_string(),
            api: OnceCell::new(),
        }
    }

    /// Uses `api` instead of building a Web API client on first use.
    #[cfg(test)]
    pub fn with_api(mut self, api: Arc<dyn PlaylistApi>) -> Self {
        self.api = OnceCell::new_with(Some(api));
        self
    }

    fn credentials(client_id: Option<String>, client_secret: Option<String>) -> Option<Credentials> {
        match (client_id, client_secret) {
            (Some(client_id), Some(client_secret))
                if !client_id.is_empty() && !client_secret.is_empty() =>
            {
                Some(Credentials { client_id, client_secret })
            }
            _ => None,
        }
    }

    async fn api(&self) -> Result<&Arc<dyn PlaylistApi>, ServiceError> {
        self.api
            .get_or_try_init(|| async {
                let credentials = self.credentials.as_ref().ok_or_else(|| {
                    ServiceError::Authentication("Spotify credentials are missing.".to_string())
                })?;

                tracing::info!("Creating Spotify Web API client");
                let client: Arc<dyn PlaylistApi> = Arc::new(SpotifyApiClient::new(
                    self.api_url.clone(),
                    self.accounts_url.clone(),
                    credentials.client_id.clone(),
                    credentials.client_secret.clone(),
                ));
                Ok::<_, ServiceError>(client)
            })
            .await
    }
}

#[async_trait]
impl ServicePlugin for SpotifyPlugin {
    fn key(&self) -> &str {
        "spotify"
    }

    fn name(&self) -> &str {
        "Spotify"
    }

    fn description(&self) -> &str {
        "Playlist ingestion and export via Spotify Web API."
    }

    fn is_available(&self) -> (bool, String) {
        if self.credentials.is_some() {
            (true, "Ready".to_string())
        } else {
            (
                false,
                "Add SPOTIFY_CLIENT_ID + SPOTIFY_CLIENT_SECRET or set them in EXPORTER_CONFIG_FILE."
                    .to_string(),
            )
        }
    }

    fn extract_playlist_id(&self, raw: &str) -> Option<String> {
        extract_playlist_id(raw)
    }

    async fn export_playlist(&self, playlist_id: &str) -> Result<PlaylistExport, ServiceError> {
        let api = self.api().await?;

        let playlist = api.fetch_playlist(playlist_id).await?;
        let playlist_name = playlist
            .name
            .unwrap_or_else(|| FALLBACK_PLAYLIST_NAME.to_string());

        let mut page = playlist.tracks;
        let mut rows = Vec::new();
        let mut pages = 1;
        loop {
            let next_index = rows.len() as u32 + 1;
            rows.extend(build_track_rows(&page.items, next_index));

            match page.next.take() {
                Some(next_url) => {
                    page = api.fetch_next_page(&next_url).await?;
                    pages += 1;
                }
                None => break,
            }
        }

        tracing::info!(
            "Exported Spotify playlist {} ({} pages, {} rows)",
            playlist_id,
            pages,
            rows.len()
        );

        Ok(PlaylistExport { playlist_name, rows })
    }
}
