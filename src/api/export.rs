use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::services::{generate_csv, sanitize_filename};
use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::post,
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Service used when the form does not name one
pub const DEFAULT_SERVICE: &str = "spotify";

#[derive(Debug, Deserialize)]
pub struct ExportForm {
    pub service: Option<String>,
    #[serde(default)]
    pub playlist_url: String,
}

pub fn export_routes() -> Router<Arc<AppState>> {
    Router::new().route("/export", post(export_playlist))
}

async fn export_playlist(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ExportForm>,
) -> Result<Response> {
    let key = form
        .service
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or(DEFAULT_SERVICE);

    let plugin = state
        .registry
        .get(key)
        .ok_or_else(|| AppError::UnknownService(key.to_string()))?;

    if form.playlist_url.trim().is_empty() {
        return Err(AppError::InvalidInput(format!(
            "Please enter a {} playlist URL.",
            plugin.name()
        )));
    }

    let (available, detail) = plugin.is_available();
    if !available {
        return Err(AppError::ServiceUnavailable(format!(
            "{} is not available. {}",
            plugin.name(),
            detail
        )));
    }

    let playlist_id = plugin
        .extract_playlist_id(&form.playlist_url)
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid {} playlist URL.", plugin.name())))?;

    tracing::info!("Exporting {} playlist {}", plugin.key(), playlist_id);

    let export = plugin
        .export_playlist(&playlist_id)
        .await
        .map_err(|e| AppError::from_service(plugin.name(), e))?;

    let filename = sanitize_filename(&export.playlist_name);
    let body = generate_csv(&export.rows);

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, content_disposition(&filename)),
        ],
        body,
    )
        .into_response())
}

/// Attachment header for `filename`. Control characters cannot appear in a header,
/// so they are dropped from the quoted form and percent-encoded in `filename*`.
fn content_disposition(filename: &str) -> HeaderValue {
    let plain: String = filename.chars().filter(|c| !c.is_control()).collect();
    let encoded: String = url::form_urlencoded::byte_serialize(filename.as_bytes()).collect();

    HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        plain, encoded
    ))
    .unwrap_or_else(|e| {
        tracing::warn!("Falling back to default filename for {:?}: {}", filename, e);
        HeaderValue::from_static("attachment; filename=\"playlist.csv\"")
    })
}
