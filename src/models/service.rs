use crate::models::TrackRow;
use serde::{Deserialize, Serialize};

/// Health of one registered plugin, computed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub key: String,
    pub name: String,
    pub description: String,
    pub is_available: bool,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistExport {
    pub playlist_name: String,
    pub rows: Vec<TrackRow>,
}
