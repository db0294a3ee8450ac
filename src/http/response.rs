//! API error responses.
//!
//! # Design Decisions
//! - Every error body is `{ "error": <kind>, "message": <text for the user> }`
//! - Resolution failures are client-visible retry prompts (422), except when
//!   the geocoder itself is unreachable (502)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::model::Field;
use crate::resolve::ResolveError;
use crate::share::ShareError;
use crate::widget::{SessionError, WidgetError};

#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    SessionNotFound(Uuid),
    SuggestionNotFound { field: Field, index: usize },
    Session(SessionError),
    Widget(WidgetError),
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        ApiError::Session(e)
    }
}

impl From<WidgetError> for ApiError {
    fn from(e: WidgetError) -> Self {
        ApiError::Widget(e)
    }
}

impl From<ShareError> for ApiError {
    fn from(e: ShareError) -> Self {
        ApiError::Widget(WidgetError::Share(e))
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "session_not_found",
                format!("No widget session {}", id),
            ),
            ApiError::SuggestionNotFound { field, index } => (
                StatusCode::NOT_FOUND,
                "suggestion_not_found",
                format!("No suggestion {} for {} location", index, field),
            ),
            ApiError::Session(e @ SessionError::Full(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "session_limit", e.to_string())
            }
            ApiError::Session(SessionError::Config(e)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "config", e.to_string())
            }
            ApiError::Widget(WidgetError::Resolve(e)) => {
                let (status, kind) = match e {
                    ResolveError::NoMatch(_) => (StatusCode::UNPROCESSABLE_ENTITY, "no_match"),
                    ResolveError::EmptyQuery(_) => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "empty_query")
                    }
                    ResolveError::Unavailable { .. } => (StatusCode::BAD_GATEWAY, "geocoder_unavailable"),
                };
                (status, kind, e.user_message().to_string())
            }
            ApiError::Widget(WidgetError::Share(e)) => match e {
                ShareError::NothingToShare => {
                    (StatusCode::NOT_FOUND, "nothing_to_share", e.to_string())
                }
                ShareError::InvalidLink => (StatusCode::BAD_REQUEST, "invalid_link", e.to_string()),
                ShareError::InvalidBaseUrl(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "config", e.to_string())
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = self.parts();
        if status.is_server_error() {
            tracing::warn!(status = %status, error, %message, "Request failed");
        } else {
            tracing::debug!(status = %status, error, %message, "Request rejected");
        }
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::from(WidgetError::Resolve(ResolveError::NoMatch(Field::Start))), 422),
            (
                ApiError::from(WidgetError::Resolve(ResolveError::Unavailable {
                    field: Field::End,
                    reason: "timeout".into(),
                })),
                502,
            ),
            (ApiError::from(ShareError::NothingToShare), 404),
            (ApiError::from(ShareError::InvalidLink), 400),
            (ApiError::from(SessionError::Full(1)), 503),
            (ApiError::SessionNotFound(Uuid::nil()), 404),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status().as_u16(), status);
        }
    }

    #[test]
    fn test_no_match_message_is_user_facing() {
        let err = ApiError::from(WidgetError::Resolve(ResolveError::NoMatch(Field::Start)));
        let (_, kind, message) = err.parts();
        assert_eq!(kind, "no_match");
        assert_eq!(message, "One or both locations not found. Please try different queries.");
    }
}
