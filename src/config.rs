// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Strava credentials are read once here and handed to the Strava client at
//! construction; nothing reads them at module load time.

use std::env;
use std::path::PathBuf;

use crate::analytics::training_load::DEFAULT_FTP_WATTS;

/// Default number of consecutive stream failures before a sync gives up.
pub const DEFAULT_MAX_STREAM_ERRORS: usize = 3;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Server ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,

    // --- Storage ---
    /// Directory holding the activity snapshot
    pub data_dir: PathBuf,
    /// GeoJSON file with region boundaries
    pub regions_file: PathBuf,

    // --- Analytics ---
    /// Athlete's functional threshold power in watts
    pub ftp_watts: f64,

    // --- Sync ---
    /// Run a Strava sync before serving
    pub sync_on_start: bool,
    /// Consecutive stream failures tolerated before aborting a sync
    pub max_stream_errors: usize,

    // --- Secrets ---
    /// Strava OAuth client ID
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Long-lived refresh token for the athlete
    pub strava_refresh_token: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            data_dir: PathBuf::from("data"),
            regions_file: PathBuf::from("data/municipalities.geojson"),
            ftp_watts: DEFAULT_FTP_WATTS,
            sync_on_start: false,
            max_stream_errors: DEFAULT_MAX_STREAM_ERRORS,
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            strava_refresh_token: "test_refresh_token".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));
        let regions_file = env::var("REGIONS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("municipalities.geojson"));

        let ftp_watts = parse_var("FTP_WATTS", DEFAULT_FTP_WATTS)?;
        if !ftp_watts.is_finite() || ftp_watts <= 0.0 {
            return Err(ConfigError::Invalid("FTP_WATTS", ftp_watts.to_string()));
        }

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            data_dir,
            regions_file,
            ftp_watts,
            sync_on_start: parse_var("SYNC_ON_START", false)?,
            max_stream_errors: parse_var("MAX_STREAM_ERRORS", DEFAULT_MAX_STREAM_ERRORS)?,
            strava_client_id: required_var("STRAVA_CLIENT_ID")?,
            strava_client_secret: required_var("STRAVA_CLIENT_SECRET")?,
            strava_refresh_token: required_var("STRAVA_REFRESH_TOKEN")?,
        })
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .map_err(|_| ConfigError::Missing(name))
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
