use crate::models::{PlaylistItem, TrackRow};
use crate::services::duration::format_duration;

/// Flattens raw playlist items into numbered rows, starting at `start_index`.
///
/// Items without a track are dropped and do not consume a number.
pub fn build_track_rows<'a, I>(items: I, start_index: u32) -> Vec<TrackRow>
where
    I: IntoIterator<Item = &'a Option<PlaylistItem>>,
{
    let mut track_number = start_index;

    items
        .into_iter()
        .filter_map(|item| {
            let item = item.as_ref()?;
            let track = item.track.as_ref()?;

            let artists = track
                .artists
                .iter()
                .filter_map(|artist| artist.name.as_deref())
                .filter(|name| !name.is_empty())
                .collect::<Vec<_>>()
                .join(", ");

            let row = TrackRow {
                track_number,
                name: track.name.clone().unwrap_or_default(),
                artists,
                album: track
                    .album
                    .as_ref()
                    .and_then(|album| album.name.clone())
                    .unwrap_or_default(),
                duration_ms: track.duration_ms,
                duration: format_duration(track.duration_ms),
                added_at: item.added_at.clone().unwrap_or_default(),
            };
            track_number += 1;
            Some(row)
        })
        .collect()
}
