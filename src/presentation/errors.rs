// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::application::usecases::UseCaseError;
use crate::domain::errors::DomainError;
use crate::domain::repositories::RepositoryError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，按错误类型映射 HTTP 状态码
#[derive(Debug)]
pub struct AppError(anyhow::Error);

fn domain_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::ValidationError(_) | DomainError::InvalidSignature(_) => {
            StatusCode::BAD_REQUEST
        }
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Forbidden | DomainError::FeatureNotAvailable(_, _) => StatusCode::FORBIDDEN,
        DomainError::QuotaExceeded { .. } => StatusCode::PAYMENT_REQUIRED,
        DomainError::InvalidStateTransition { .. } => StatusCode::CONFLICT,
    }
}

fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Database(_) | RepositoryError::Corrupt(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        if let Some(err) = self.0.downcast_ref::<UseCaseError>() {
            return match err {
                UseCaseError::Domain(e) => domain_status(e),
                UseCaseError::Repository(e) => repository_status(e),
                UseCaseError::Service(_) => StatusCode::BAD_GATEWAY,
            };
        }
        if let Some(err) = self.0.downcast_ref::<DomainError>() {
            return domain_status(err);
        }
        if let Some(err) = self.0.downcast_ref::<RepositoryError>() {
            return repository_status(err);
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 内部错误不向调用方暴露细节
        let error_message = if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
            error!(error = %self.0, "Request failed");
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
