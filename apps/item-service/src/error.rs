//! # Item Service エラー定義
//!
//! サービスで発生するエラーと、HTTP レスポンスへの変換を定義する。
//!
//! ## ステータスコードへのマッピング
//!
//! | エラー種別 | HTTP ステータス |
//! |-----------|----------------|
//! | `Validation` | 400 Bad Request |
//! | `BadRequest` | 400 Bad Request |
//! | `NotFound` | 404 Not Found |
//! | `Storage` | 500 Internal Server Error |
//!
//! ストレージ障害の詳細はクライアントには返さず、固定メッセージに
//! 差し替えた上でサーバー側ログにのみ記録する。

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use itemflow_domain::DomainError;
use itemflow_infra::InfraError;
use itemflow_shared::ErrorResponse;
use thiserror::Error;

/// リクエストログ用のエラー詳細
///
/// `IntoResponse` 変換時にレスポンス extensions に格納され、
/// リクエストサマリログのミドルウェアが拾って記録する。
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

/// Item Service で発生するエラー
#[derive(Debug, Error)]
pub enum AppError {
   /// ビジネスルール検証エラー
   #[error(transparent)]
   Validation(#[from] DomainError),

   /// 不正なリクエスト（パスパラメータの形式違反など）
   #[error("不正なリクエスト: {0}")]
   BadRequest(String),

   /// リソースが見つからない
   #[error("リソースが見つかりません: {0}")]
   NotFound(String),

   /// ストレージエラー
   #[error("ストレージエラー: {0}")]
   Storage(#[from] InfraError),
}

impl IntoResponse for AppError {
   fn into_response(self) -> Response {
      let (status, body) = match &self {
         AppError::Validation(err) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::validation_error(err.to_string()),
         ),
         AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg)),
         AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::not_found(msg)),
         AppError::Storage(err) => {
            tracing::error!(
               error = %err,
               span_trace = %err.span_trace(),
               "ストレージエラーが発生しました"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal_error())
         }
      };

      let detail = self.to_string();
      let mut response = (status, Json(body)).into_response();
      response.extensions_mut().insert(ErrorDetail(detail));
      response
   }
}
