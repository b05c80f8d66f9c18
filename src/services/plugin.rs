use crate::error::ServiceError;
use crate::models::{PlaylistExport, ServiceStatus};
use async_trait::async_trait;
use std::sync::Arc;

/// A streaming backend that can export one of its playlists.
#[async_trait]
pub trait ServicePlugin: Send + Sync {
    /// Short unique identifier used to select the plugin ("spotify")
    fn key(&self) -> &str;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Reports whether the plugin is configured well enough to export.
    /// Must not touch the network.
    fn is_available(&self) -> (bool, String);

    /// Pulls the playlist id out of a user supplied link, if it is one of ours.
    fn extract_playlist_id(&self, raw: &str) -> Option<String>;

    /// Fetches the playlist name and every track row, following pagination.
    async fn export_playlist(&self, playlist_id: &str) -> Result<PlaylistExport, ServiceError>;
}

/// Plugins keyed by `ServicePlugin::key`, in registration order.
#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn ServicePlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plugin. A plugin with the same key is replaced in place.
    pub fn register(&mut self, plugin: Arc<dyn ServicePlugin>) {
        match self.plugins.iter_mut().find(|p| p.key() == plugin.key()) {
            Some(existing) => {
                tracing::debug!("Replacing plugin registered as '{}'", plugin.key());
                *existing = plugin;
            }
            None => {
                tracing::debug!("Registered plugin '{}'", plugin.key());
                self.plugins.push(plugin);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn ServicePlugin>> {
        self.plugins.iter().find(|p| p.key() == key).cloned()
    }

    pub fn list_status(&self) -> Vec<ServiceStatus> {
        self.plugins
            .iter()
            .map(|plugin| {
                let (is_available, detail) = plugin.is_available();
                ServiceStatus {
                    key: plugin.key().to_string(),
                    name: plugin.name().to_string(),
                    description: plugin.description().to_string(),
                    is_available,
                    detail,
                }
            })
            .collect()
    }
}
