//! Raw playlist payloads as returned by the upstream Web API.
//!
//! Every field is optional: playlists routinely contain removed tracks, local files
//! and podcast episodes that omit parts of the track object.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistObject {
    pub name: Option<String>,
    #[serde(default)]
    pub tracks: TrackPage,
}

/// One page of playlist items plus the continuation link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<Option<PlaylistItem>>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistItem {
    pub added_at: Option<String>,
    pub track: Option<TrackObject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackObject {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artists: Vec<ArtistObject>,
    pub album: Option<AlbumObject>,
    pub duration_ms: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtistObject {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlbumObject {
    pub name: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
