use serde::{Deserialize, Serialize};

/// One exported line of a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRow {
    /// 1-based position among the exported rows
    pub track_number: u32,
    pub name: String,
    /// Artist names joined with ", "
    pub artists: String,
    pub album: String,
    pub duration_ms: Option<i64>,
    /// Clock form of `duration_ms`, empty when the duration is unknown
    pub duration: String,
    pub added_at: String,
}
