// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for fetching activities and GPS streams.
//!
//! Handles:
//! - Activity listing with page-until-empty pagination
//! - `latlng` stream fetching for route maps
//! - Access token refresh from a long-lived refresh token
//! - Rate limit / not-found detection

use crate::error::AppError;
use serde::Deserialize;

/// Strava's maximum page size for the activity list.
pub const ACTIVITIES_PER_PAGE: u32 = 200;

const DEFAULT_BASE_URL: &str = "https://www.strava.com";

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, client_id, client_secret)
    }

    /// Create a client against a different host (used by tests).
    pub fn with_base_url(base_url: &str, client_id: String, client_secret: String) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            http: reqwest::Client::new(),
            api_url: format!("{}/api/v3", base),
            oauth_url: format!("{}/oauth", base),
            client_id,
            client_secret,
        }
    }

    /// List one page of the athlete's activities (newest first).
    pub async fn list_activities(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivitySummary>, AppError> {
        let url = format!("{}/athlete/activities", self.api_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("page", page.to_string()), ("per_page", per_page.to_string())])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Fetch the `latlng` stream of an activity.
    ///
    /// Returns `None` when the activity has no GPS data (e.g. indoor rides).
    pub async fn get_latlng_stream(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<Option<Vec<[f64; 2]>>, AppError> {
        let url = format!("{}/activities/{}/streams", self.api_url, activity_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("keys", "latlng"), ("key_by_type", "true")])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        let streams: StravaStreamSet = self.check_response_json(response).await?;
        Ok(streams.latlng.map(|s| s.data).filter(|d| !d.is_empty()))
    }

    /// Exchange a refresh token for a fresh access token.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenRefreshResponse, AppError> {
        let response = self
            .http
            .post(format!("{}/token", self.oauth_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token refresh request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                429 => {
                    tracing::warn!("Strava rate limit hit (429)");
                    AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string())
                }
                401 => AppError::StravaApi(AppError::STRAVA_TOKEN_ERROR.to_string()),
                404 => AppError::StravaApi(AppError::STRAVA_NOT_FOUND.to_string()),
                _ => AppError::StravaApi(format!("HTTP {}: {}", status, body)),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// Summary activity for list endpoints.
///
/// Units are Strava's: meters, seconds and m/s.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaActivitySummary {
    pub id: u64,
    pub name: String,
    pub sport_type: String,
    pub start_date_local: String,
    pub distance: f64,
    pub moving_time: f64,
    #[serde(default)]
    pub average_speed: f64,
    #[serde(default)]
    pub max_speed: f64,
    #[serde(default)]
    pub total_elevation_gain: f64,
    pub average_watts: Option<f64>,
    pub kilojoules: Option<f64>,
    #[serde(default)]
    pub map: Option<StravaMap>,
}

/// Activity map data with polylines.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaMap {
    pub summary_polyline: Option<String>,
}

/// Streams keyed by type (`key_by_type=true`).
#[derive(Debug, Deserialize)]
struct StravaStreamSet {
    latlng: Option<StravaStream>,
}

#[derive(Debug, Deserialize)]
struct StravaStream {
    data: Vec<[f64; 2]>,
}

// ─────────────────────────────────────────────────────────────────────────────
// StravaService - High-level service with token management
// ─────────────────────────────────────────────────────────────────────────────

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Margin before token expiration when we proactively refresh (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Token state for the single configured athlete.
struct TokenState {
    refresh_token: String,
    access: Option<CachedToken>,
}

/// Cached access token with expiry information.
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// High-level Strava service that manages the token lifecycle.
///
/// Created once per process from explicit credentials. The access token is
/// cached in memory and refreshed 5 minutes before it expires; Strava may
/// rotate the refresh token, so the latest one is kept too.
#[derive(Clone)]
pub struct StravaService {
    client: StravaClient,
    tokens: Arc<Mutex<TokenState>>,
}

impl StravaService {
    /// Create a new Strava service for one athlete.
    pub fn new(client: StravaClient, refresh_token: String) -> Self {
        Self {
            client,
            tokens: Arc::new(Mutex::new(TokenState {
                refresh_token,
                access: None,
            })),
        }
    }

    /// Get a valid (non-expired) access token, refreshing if needed.
    ///
    /// The lock is held across the refresh so concurrent callers wait for a
    /// single refresh instead of racing.
    pub async fn get_valid_access_token(&self) -> Result<String, AppError> {
        let mut state = self.tokens.lock().await;
        let margin = Duration::seconds(TOKEN_REFRESH_MARGIN_SECS);

        if let Some(cached) = &state.access {
            if Utc::now() + margin < cached.expires_at {
                return Ok(cached.access_token.clone());
            }
        }

        tracing::info!("Refreshing Strava access token");
        let refreshed = self.client.refresh_token(&state.refresh_token).await?;

        let expires_at = DateTime::from_timestamp(refreshed.expires_at, 0).unwrap_or_default();
        state.refresh_token = refreshed.refresh_token;
        state.access = Some(CachedToken {
            access_token: refreshed.access_token.clone(),
            expires_at,
        });

        tracing::info!(expires_at = %expires_at, "Strava access token refreshed");
        Ok(refreshed.access_token)
    }

    /// List every activity by paging until Strava returns an empty page.
    pub async fn list_all_activities(&self) -> Result<Vec<StravaActivitySummary>, AppError> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let access_token = self.get_valid_access_token().await?;
            let batch = match self
                .client
                .list_activities(&access_token, page, ACTIVITIES_PER_PAGE)
                .await
            {
                Err(e) if e.is_strava_token_error() => {
                    let access_token = self.replace_rejected_token(&access_token).await?;
                    self.client
                        .list_activities(&access_token, page, ACTIVITIES_PER_PAGE)
                        .await?
                }
                other => other?,
            };

            if batch.is_empty() {
                break;
            }

            tracing::debug!(page, count = batch.len(), "Fetched activity page");
            all.extend(batch);
            page += 1;
        }

        tracing::info!(count = all.len(), pages = page - 1, "Fetched all activities");
        Ok(all)
    }

    /// Fetch the GPS track of an activity.
    pub async fn get_latlng_stream(
        &self,
        activity_id: u64,
    ) -> Result<Option<Vec<[f64; 2]>>, AppError> {
        let access_token = self.get_valid_access_token().await?;
        match self.client.get_latlng_stream(&access_token, activity_id).await {
            Err(e) if e.is_strava_token_error() => {
                let access_token = self.replace_rejected_token(&access_token).await?;
                self.client
                    .get_latlng_stream(&access_token, activity_id)
                    .await
            }
            other => other,
        }
    }

    /// Forget an access token Strava rejected and fetch a fresh one.
    ///
    /// A token refreshed by another caller in the meantime is kept.
    async fn replace_rejected_token(&self, rejected: &str) -> Result<String, AppError> {
        {
            let mut state = self.tokens.lock().await;
            if state
                .access
                .as_ref()
                .is_some_and(|t| t.access_token == rejected)
            {
                tracing::warn!("Strava rejected the cached access token");
                state.access = None;
            }
        }
        self.get_valid_access_token().await
    }
}
