/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - 認証失敗は理由を問わず Unauthorized に畳み込む (理由はログのみ)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::middleware::auth::gate::GateError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "unauthorized".into(),
            ),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found."),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<GateError> for AppError {
    fn from(_: GateError) -> Self {
        // The kind stays in the gate's log line; clients only see 401.
        AppError::Unauthorized
    }
}

#[cfg(test)]
mod tests {
    use crate::services::auth::TokenError;

    use super::*;

    #[test]
    fn every_gate_error_is_unauthorized() {
        let errors = [
            GateError::MissingHeader,
            GateError::Token(TokenError::Malformed),
            GateError::Token(TokenError::InvalidSignature),
            GateError::Token(TokenError::Expired),
        ];

        for err in errors {
            let resp = AppError::from(err).into_response();
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            AppError::not_found("route").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
