use actix_web::{HttpResponse, ResponseError};
use log::error;
use mongodb::error::Error as MongoError;
use serde::Serialize;
use std::io;
use thiserror::Error;

/// HTTP 错误响应结构
#[derive(Serialize)]
struct ErrorResponse {
    code: u16,
    message: String,
}

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    // ==== 常规业务错误 ====
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("resource not found")]
    NotFound,

    #[error("policy violation: {0}")]
    PolicyViolation(String),

    #[error("patch rejected: {0}")]
    PatchRejected(String),

    #[error("concurrency conflict")]
    ConcurrencyConflict,

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    // ==== 令牌校验 ====
    #[error("token malformed")]
    TokenMalformed,

    #[error("token signature invalid")]
    TokenInvalidSignature,

    #[error("token expired")]
    TokenExpired,

    // ==== 系统错误 ====
    #[error("MongoDB error: {0}")]
    Mongo(#[from] MongoError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl AppError {
    /// 业务级错误：由引擎捕获并写入统一响应信封，不向上传播
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            AppError::UnknownField(_)
                | AppError::InvalidArgument(_)
                | AppError::NotFound
                | AppError::PolicyViolation(_)
                | AppError::PatchRejected(_)
                | AppError::ConcurrencyConflict
                | AppError::Unauthorized(_)
        )
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, msg) = match self {
            AppError::NotFound => (actix_web::http::StatusCode::NOT_FOUND, self.to_string()),
            AppError::UnknownField(_) | AppError::InvalidArgument(_) | AppError::PatchRejected(_) => {
                (actix_web::http::StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::PolicyViolation(_) => (actix_web::http::StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            AppError::ConcurrencyConflict => (actix_web::http::StatusCode::CONFLICT, self.to_string()),
            AppError::Unauthorized(msg) => (actix_web::http::StatusCode::UNAUTHORIZED, msg.to_string()),
            AppError::TokenMalformed | AppError::TokenInvalidSignature | AppError::TokenExpired => {
                (actix_web::http::StatusCode::UNAUTHORIZED, self.to_string())
            }
            AppError::Mongo(e) => {
                error!("{:?}", e);
                (actix_web::http::StatusCode::INTERNAL_SERVER_ERROR, "Service error".to_string())
            }
            AppError::Json(e) => {
                error!("{:?}", e);
                (actix_web::http::StatusCode::INTERNAL_SERVER_ERROR, "Service error".to_string())
            }
            AppError::Io(e) => {
                error!("{:?}", e);
                (actix_web::http::StatusCode::INTERNAL_SERVER_ERROR, "Service error".to_string())
            }
            AppError::Internal(e) => {
                error!("{:?}", e);
                (actix_web::http::StatusCode::INTERNAL_SERVER_ERROR, "Service error".to_string())
            }
        };

        HttpResponse::build(status).json(ErrorResponse { code: status.as_u16(), message: msg })
    }
}
