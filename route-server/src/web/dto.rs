//! JSON response shapes for the route endpoint.
//!
//! The three caller-visible message classes: "check your station
//! names" (malformed input / station not found), "showing a recent
//! result, may be outdated" (stale fallback), and "search failed,
//! try again" (upstream unavailable with no fallback).

use axum::http::StatusCode;
use serde::Serialize;

use crate::resolver::{Resolved, ResolveError, RouteSource};
use crate::domain::RouteRecord;

/// Successful search response body.
#[derive(Debug, Serialize)]
pub struct RouteSearchResponse {
    /// Normalized routes; empty when nothing was found
    pub routes: Vec<RouteRecord>,
    /// Where the answer came from; absent for an empty answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<RouteSource>,
    /// Human-readable status message
    pub message: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Stable machine-readable code
    pub error: &'static str,
    /// Human-readable message
    pub message: String,
}

/// Map a successful resolution to a status and body.
pub fn success_response(resolved: Resolved) -> (StatusCode, RouteSearchResponse) {
    match resolved {
        Resolved::Routes { routes, source } => {
            let message = match source {
                RouteSource::Live => "検索が完了しました",
                RouteSource::Cache => "検索が完了しました（キャッシュから取得）",
                RouteSource::StaleFallback => {
                    "最近の検索結果を表示しています。最新ではない可能性があります"
                }
            };
            (
                StatusCode::OK,
                RouteSearchResponse {
                    routes,
                    source: Some(source),
                    message: message.to_string(),
                },
            )
        }
        Resolved::NoRoutes => (
            StatusCode::OK,
            RouteSearchResponse {
                routes: Vec::new(),
                source: None,
                message: "経路が見つかりませんでした".to_string(),
            },
        ),
    }
}

/// Map a resolution error to a status and body.
///
/// Internal diagnostic detail stays in the logs; the body carries
/// only what the end user should see.
pub fn error_response(err: &ResolveError) -> (StatusCode, ErrorResponse) {
    match err {
        ResolveError::MalformedInput(validation) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse {
                error: "INVALID_PARAMS",
                message: validation.to_string(),
            },
        ),
        ResolveError::StationNotFound { message } => (
            StatusCode::NOT_FOUND,
            ErrorResponse {
                error: "STATION_NOT_FOUND",
                message: message.clone(),
            },
        ),
        ResolveError::UpstreamUnavailable { .. } => (
            StatusCode::BAD_GATEWAY,
            ErrorResponse {
                error: "API_ERROR",
                message: "経路検索に失敗しました。しばらくしてからもう一度お試しください".to_string(),
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationError;
    use crate::ekispert::FailureKind;

    #[test]
    fn stale_fallback_is_ok_with_advisory_message() {
        let (status, body) = success_response(Resolved::Routes {
            routes: Vec::new(),
            source: RouteSource::StaleFallback,
        });
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.source, Some(RouteSource::StaleFallback));
        assert!(body.message.contains("最新ではない可能性"));
    }

    #[test]
    fn no_routes_is_ok_with_empty_list() {
        let (status, body) = success_response(Resolved::NoRoutes);
        assert_eq!(status, StatusCode::OK);
        assert!(body.routes.is_empty());
        assert!(body.source.is_none());
    }

    #[test]
    fn error_mapping() {
        let (status, body) = error_response(&ResolveError::MalformedInput(
            ValidationError::MalformedTime("14:00".into()),
        ));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "INVALID_PARAMS");

        let (status, body) = error_response(&ResolveError::StationNotFound {
            message: "駅名が見つかりません(登別)".into(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "STATION_NOT_FOUND");
        assert_eq!(body.message, "駅名が見つかりません(登別)");

        let (status, body) = error_response(&ResolveError::UpstreamUnavailable {
            kind: FailureKind::Transient,
        });
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.error, "API_ERROR");
    }
}
