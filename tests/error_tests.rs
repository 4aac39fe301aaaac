// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use strava_atlas::analytics::AnalyticsError;
use strava_atlas::error::AppError;

#[test]
fn test_is_strava_token_error_matches() {
    let err = AppError::StravaApi("Token expired".to_string());
    assert!(err.is_strava_token_error());

    let err = AppError::StravaApi("Invalid access token".to_string());
    assert!(err.is_strava_token_error());

    let err = AppError::StravaApi("Some other invalid thing".to_string());
    assert!(err.is_strava_token_error());

    let err = AppError::StravaApi(AppError::STRAVA_TOKEN_ERROR.to_string());
    assert!(err.is_strava_token_error());
}

#[test]
fn test_is_strava_token_error_no_match() {
    let err = AppError::StravaApi("Rate limit exceeded".to_string());
    assert!(!err.is_strava_token_error());

    let err = AppError::StravaApi("Internal Server Error".to_string());
    assert!(!err.is_strava_token_error());

    let err = AppError::BadRequest("Bad Request".to_string());
    assert!(!err.is_strava_token_error());
}

#[test]
fn test_strava_markers() {
    assert!(AppError::StravaApi(AppError::STRAVA_NOT_FOUND.to_string()).is_strava_not_found());
    assert!(AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string()).is_strava_rate_limit());
    assert!(!AppError::NotFound(AppError::STRAVA_NOT_FOUND.to_string()).is_strava_not_found());
}

#[test]
fn test_status_codes() {
    let cases = [
        (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
        (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
        (AppError::Conflict("x".into()), StatusCode::CONFLICT),
        (AppError::StravaApi("x".into()), StatusCode::BAD_GATEWAY),
        (AppError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        (
            AppError::Analytics(AnalyticsError::NoActivities),
            StatusCode::NOT_FOUND,
        ),
        (
            AppError::Analytics(AnalyticsError::NoDistances),
            StatusCode::NOT_FOUND,
        ),
        (
            AppError::Analytics(AnalyticsError::InvalidFtp(0.0)),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (
            AppError::Analytics(AnalyticsError::ReferenceBeforeActivities {
                reference: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                earliest: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            }),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
    ];

    for (err, status) in cases {
        let message = err.to_string();
        assert_eq!(err.into_response().status(), status, "{}", message);
    }
}
