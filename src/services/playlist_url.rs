use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static ID_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap());

pub static SPOTIFY_PLAYLIST_URL: LazyLock<PlaylistUrlPattern> =
    LazyLock::new(|| PlaylistUrlPattern::new("spotify", "open.spotify.com", "spotify.com"));

/// Recognizes the playlist links and URIs of one streaming service.
///
/// Accepted forms, for the Spotify pattern:
/// - `https://open.spotify.com/playlist/{id}`
/// - `https://open.spotify.com/user/{user}/playlist/{id}`
/// - `spotify:playlist:{id}`
#[derive(Debug)]
pub struct PlaylistUrlPattern {
    web_host: String,
    domain_suffix: String,
    uri_regex: Regex,
}

impl PlaylistUrlPattern {
    pub fn new(uri_scheme: &str, web_host: &str, domain: &str) -> Self {
        let uri_regex = Regex::new(&format!(
            r"{}:playlist:([A-Za-z0-9]+)",
            regex::escape(uri_scheme)
        ))
        .expect("escaped scheme always forms a valid pattern");

        Self {
            web_host: web_host.to_string(),
            domain_suffix: format!(".{}", domain),
            uri_regex,
        }
    }

    /// Returns the playlist id, or `None` when the input is not a link to one of
    /// this service's playlists. Never fails.
    pub fn extract(&self, raw: &str) -> Option<String> {
        let cleaned = raw.trim();
        if cleaned.is_empty() {
            return None;
        }

        // The URI form wins over URL parsing and may appear anywhere in the input
        if let Some(captures) = self.uri_regex.captures(cleaned) {
            return captures.get(1).map(|m| m.as_str().to_string());
        }

        let url = Url::parse(cleaned).ok()?;
        let host = url.host_str()?;
        if host != self.web_host && !host.ends_with(&self.domain_suffix) {
            return None;
        }

        let segments: Vec<&str> = url
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .collect();
        let position = segments.iter().position(|segment| *segment == "playlist")?;
        let candidate = segments.get(position + 1)?;

        ID_REGEX
            .is_match(candidate)
            .then(|| candidate.to_string())
    }
}

/// Extracts a Spotify playlist id from a share link or `spotify:playlist:` URI.
pub fn extract_playlist_id(raw: &str) -> Option<String> {
    SPOTIFY_PLAYLIST_URL.extract(raw)
}
