pub mod csv_export;
pub mod duration;
pub mod filename;
pub mod playlist_url;
pub mod plugin;
pub mod rows;
pub mod spotify;
pub mod spotify_api;

pub use csv_export::{generate_csv, CSV_FIELDS};
pub use filename::sanitize_filename;
pub use plugin::{PluginRegistry, ServicePlugin};
pub use spotify::SpotifyPlugin;
