use std::collections::HashMap;
use std::env;
use std::path::Path;

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com/api/token";

#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment environment name ("production", "development", ...)
    pub environment: String,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_api_url: String,
    pub spotify_accounts_url: String,
    /// Optional JSON file whose values fill in credentials missing from the environment
    pub config_file: Option<String>,
    pub server_host: String,
    pub server_port: u16,
    /// Allowed CORS origins (comma-separated). Use "*" for any origin (development only).
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let config_file = non_empty_var("EXPORTER_CONFIG_FILE");
        let overrides = config_file
            .as_deref()
            .map(load_overrides)
            .unwrap_or_default();

        let from_env_or_file = |key: &str| {
            non_empty_var(key).or_else(|| overrides.get(key).cloned())
        };

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Config {
            environment: environment_from_env(),
            spotify_client_id: from_env_or_file("SPOTIFY_CLIENT_ID"),
            spotify_client_secret: from_env_or_file("SPOTIFY_CLIENT_SECRET"),
            spotify_api_url: env::var("SPOTIFY_API_URL")
                .unwrap_or_else(|_| DEFAULT_SPOTIFY_API_URL.to_string()),
            spotify_accounts_url: env::var("SPOTIFY_ACCOUNTS_URL")
                .unwrap_or_else(|_| DEFAULT_SPOTIFY_ACCOUNTS_URL.to_string()),
            config_file,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            cors_origins,
        })
    }

    pub fn has_spotify_credentials(&self) -> bool {
        self.spotify_client_id.is_some() && self.spotify_client_secret.is_some()
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

/// Deployment environment from `APP_ENV`, then `ENV`, defaulting to "production".
pub fn environment_from_env() -> String {
    non_empty_var("APP_ENV")
        .or_else(|| non_empty_var("ENV"))
        .unwrap_or_else(|| "production".to_string())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

/// Reads the override file. Anything other than a readable JSON object yields no overrides.
pub(crate) fn load_overrides(path: &str) -> HashMap<String, String> {
    let path = Path::new(path);
    if !path.exists() {
        return HashMap::new();
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!("Could not read config file {}: {}", path.display(), e);
            return HashMap::new();
        }
    };

    match serde_json::from_str::<serde_json::Value>(&contents) {
        Ok(serde_json::Value::Object(map)) => map
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::String(s) if !s.is_empty() => Some((key, s)),
                _ => None,
            })
            .collect(),
        Ok(_) => {
            tracing::warn!("Config file {} is not a JSON object, ignoring", path.display());
            HashMap::new()
        }
        Err(e) => {
            tracing::warn!("Config file {} is not valid JSON: {}", path.display(), e);
            HashMap::new()
        }
    }
}
