pub mod export;
pub mod status;

pub use export::export_routes;
pub use status::status_routes;

use crate::frontend;
use crate::services::PluginRegistry;
use axum::{routing::get, Router};
use std::sync::Arc;

pub struct AppState {
    pub registry: Arc<PluginRegistry>,
}

/// All routes, without the middleware stack added in `main`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/v1", status_routes())
        .merge(export_routes())
        .route("/health", get(status::health))
        .with_state(state)
        // Frontend - catch-all route (must be last)
        .fallback(get(frontend::serve_frontend))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::spotify::tests::{track_item, FakeApi};
    use crate::services::SpotifyPlugin;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    fn app_with(plugin: SpotifyPlugin) -> Router {
        let mut registry = PluginRegistry::new();
        registry.register(Arc::new(plugin));
        router(Arc::new(AppState {
            registry: Arc::new(registry),
        }))
    }

    fn configured(api: Arc<FakeApi>) -> SpotifyPlugin {
        SpotifyPlugin::from_credentials(Some("test_client_id".into()), Some("test_client_secret".into()))
            .with_api(api)
    }

    fn two_song_api() -> Arc<FakeApi> {
        Arc::new(FakeApi::new(
            serde_json::json!({
                "name": "Test Playlist",
                "tracks": {
                    "items": [
                        track_item("Song 1", "Artist A", "Album X", 180_000),
                        track_item("Song 2", "Artist B", "Album Y", 240_000),
                    ],
                    "next": null,
                }
            }),
            vec![],
        ))
    }

    async fn post_export(app: Router, form: &str) -> Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/export")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn error_of(response: Response) -> (String, String) {
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        (
            body["kind"].as_str().unwrap().to_string(),
            body["error"].as_str().unwrap().to_string(),
        )
    }

    #[tokio::test]
    async fn test_post_valid_playlist() {
        let api = two_song_api();
        let response = post_export(
            app_with(configured(api.clone())),
            "playlist_url=https%3A%2F%2Fopen.spotify.com%2Fplaylist%2Fvalidid123",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Test_Playlist.csv\"; filename*=UTF-8''Test_Playlist.csv"
        );

        let csv = body_text(response).await;
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Track #,Name,Artists,Album,Duration (ms),Duration,Added At",
                "1,Song 1,Artist A,Album X,180000,3:00,2024-01-01T00:00:00Z",
                "2,Song 2,Artist B,Album Y,240000,4:00,2024-01-01T00:00:00Z",
            ]
        );
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_post_invalid_playlist_url() {
        let api = two_song_api();
        let response = post_export(
            app_with(configured(api.clone())),
            "service=spotify&playlist_url=https%3A%2F%2Fnot-spotify.com%2Fplaylist%2Finvalid",
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let (kind, message) = error_of(response).await;
        assert_eq!(kind, "invalid_input");
        assert_eq!(message, "Invalid Spotify playlist URL.");
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_post_empty_url() {
        let response = post_export(app_with(configured(two_song_api())), "playlist_url=++").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let (_, message) = error_of(response).await;
        assert_eq!(message, "Please enter a Spotify playlist URL.");
    }

    #[tokio::test]
    async fn test_post_unknown_service() {
        let response = post_export(
            app_with(configured(two_song_api())),
            "service=tidal&playlist_url=https%3A%2F%2Ftidal.com%2Fplaylist%2Fabc",
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let (kind, message) = error_of(response).await;
        assert_eq!(kind, "unknown_service");
        assert_eq!(message, "Unknown service: tidal");
    }

    #[tokio::test]
    async fn test_post_unconfigured_service() {
        let plugin = SpotifyPlugin::from_credentials(None, None);
        let response = post_export(
            app_with(plugin),
            "playlist_url=spotify%3Aplaylist%3Aabc123",
        )
        .await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let (kind, message) = error_of(response).await;
        assert_eq!(kind, "service_unavailable");
        assert!(message.contains("SPOTIFY_CLIENT_ID"));
    }

    #[tokio::test]
    async fn test_post_spotify_api_error() {
        let response = post_export(
            app_with(configured(Arc::new(FakeApi::failing()))),
            "playlist_url=https%3A%2F%2Fopen.spotify.com%2Fplaylist%2Fnotfoundid",
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let (kind, message) = error_of(response).await;
        assert_eq!(kind, "upstream_api");
        assert!(message.starts_with("An error occurred with the Spotify API."));
    }

    #[tokio::test]
    async fn test_control_characters_in_playlist_name() {
        for (name, disposition) in [
            ("Road\nTrip", "attachment; filename=\"RoadTrip.csv\"; filename*=UTF-8''Road%0ATrip.csv"),
            ("Mix\u{7f}", "attachment; filename=\"Mix.csv\"; filename*=UTF-8''Mix%7F.csv"),
        ] {
            let api = Arc::new(FakeApi::new(
                serde_json::json!({
                    "name": name,
                    "tracks": {
                        "items": [track_item("Song 1", "Artist A", "Album X", 180_000)],
                        "next": null,
                    }
                }),
                vec![],
            ));
            let response = post_export(
                app_with(configured(api)),
                "playlist_url=spotify%3Aplaylist%3Aabc",
            )
            .await;

            assert_eq!(response.status(), StatusCode::OK, "name: {:?}", name);
            assert_eq!(response.headers()[header::CONTENT_DISPOSITION], disposition);
            assert!(body_text(response).await.contains("1,Song 1,Artist A,Album X,180000,3:00,"));
        }
    }

    #[tokio::test]
    async fn test_malformed_upstream_payload_is_unexpected() {
        let api = Arc::new(FakeApi::new(
            serde_json::json!({"name": "Broken", "tracks": {"items": "not a list"}}),
            vec![],
        ));
        let response = post_export(
            app_with(configured(api)),
            "playlist_url=spotify%3Aplaylist%3Aabc",
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let (kind, message) = error_of(response).await;
        assert_eq!(kind, "unexpected");
        assert_eq!(message, "An unexpected error occurred.");
    }

    #[tokio::test]
    async fn test_list_services() {
        let plugin = configured(two_song_api());
        let response = app_with(plugin)
            .oneshot(Request::builder().uri("/api/v1/services").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let statuses: Vec<crate::models::ServiceStatus> =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].key, "spotify");
        assert!(statuses[0].is_available);
    }

    #[tokio::test]
    async fn test_csv_fields_and_health() {
        let app = app_with(configured(two_song_api()));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/v1/csv-fields").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let fields: Vec<String> = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(fields[0], "Track #");
        assert_eq!(fields.len(), 7);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_page_is_served() {
        let response = app_with(configured(two_song_api()))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Playlist Exporter"));
    }
}
