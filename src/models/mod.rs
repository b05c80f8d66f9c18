pub mod playlist;
pub mod service;
pub mod track;

pub use playlist::{PlaylistItem, PlaylistObject, TrackPage};
pub use service::{PlaylistExport, ServiceStatus};
pub use track::TrackRow;
