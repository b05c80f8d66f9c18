const MAX_STEM_CHARS: usize = 150;
const DEFAULT_FILENAME: &str = "playlist.csv";
const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Turns a playlist name into a download filename ending in `.csv`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .filter(|c| !FORBIDDEN.contains(c))
        .map(|c| if c == ' ' { '_' } else { c })
        .take(MAX_STEM_CHARS)
        .collect();

    if cleaned.is_empty() {
        return DEFAULT_FILENAME.to_string();
    }
    if cleaned.to_lowercase().ends_with(".csv") {
        cleaned
    } else {
        format!("{}.csv", cleaned)
    }
}
