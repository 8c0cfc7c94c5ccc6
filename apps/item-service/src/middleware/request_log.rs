//! # リクエストサマリログミドルウェア
//!
//! リクエスト完了時に、そのリクエストの重要情報を 1 行に集約した
//! サマリログを出力する。
//!
//! ## 記録内容
//!
//! メソッド・パス・クエリ・リモートアドレス・ステータス・所要時間・
//! レスポンスサイズ・レスポンスボディ・エラー詳細（ハンドラがレスポンス
//! extensions に [`ErrorDetail`] を添付した場合）。
//!
//! 相関 ID は `TraceLayer` のリクエストスパンに載っているため、
//! このイベントにも自動的に含まれる。
//!
//! ## レスポンスボディの捕捉
//!
//! ボディを一度バッファに集めてからログに載せ、同じバイト列で
//! レスポンスを組み立て直す。ログ行の肥大化を防ぐため、記録するのは
//! 先頭 2048 バイトまで。
//!
//! `/health` と `/ping` は監視系のノイズになるため出力対象外。

use std::{net::SocketAddr, time::Instant};

use axum::{
   body::Body,
   extract::{ConnectInfo, Request},
   http::Response,
   middleware::Next,
};

use crate::error::ErrorDetail;

/// ログに記録するレスポンスボディの最大バイト数
const MAX_LOGGED_BODY_BYTES: usize = 2048;

/// 監視系のプローブパスかどうかを判定する
fn is_probe_path(path: &str) -> bool {
   path == "/health" || path == "/ping"
}

/// リクエストサマリログを出力するミドルウェア
///
/// `axum::middleware::from_fn` でルーターに適用する。
/// `TraceLayer` のスパン内（レイヤー順で内側）に配置すること。
pub async fn request_log(request: Request, next: Next) -> Response<Body> {
   let path = request.uri().path().to_owned();
   if is_probe_path(&path) {
      return next.run(request).await;
   }

   let method = request.method().clone();
   let query = request.uri().query().map(str::to_string);
   let remote_addr = request
      .extensions()
      .get::<ConnectInfo<SocketAddr>>()
      .map(|ConnectInfo(addr)| addr.to_string());

   let start = Instant::now();
   let response = next.run(request).await;
   let latency_ms = start.elapsed().as_millis() as u64;

   let status = response.status().as_u16();
   let error_detail = response.extensions().get::<ErrorDetail>().cloned();

   // ボディをバッファし、ログ出力後に同じ内容でレスポンスを再構築する
   let (parts, body) = response.into_parts();
   let bytes = match axum::body::to_bytes(body, usize::MAX).await {
      Ok(bytes) => bytes,
      Err(err) => {
         tracing::error!(error = %err, "レスポンスボディの読み取りに失敗しました");
         return Response::from_parts(parts, Body::empty());
      }
   };

   let body_preview = String::from_utf8_lossy(&bytes[..bytes.len().min(MAX_LOGGED_BODY_BYTES)])
      .into_owned();

   match error_detail {
      Some(ErrorDetail(detail)) => {
         tracing::info!(
            http.method = %method,
            http.path = %path,
            http.query = query.as_deref().unwrap_or(""),
            remote_addr = remote_addr.as_deref().unwrap_or("-"),
            http.status_code = status,
            http.latency_ms = latency_ms,
            http.response_size = bytes.len(),
            http.response_body = %body_preview,
            error.detail = %detail,
            "リクエスト完了"
         );
      }
      None => {
         tracing::info!(
            http.method = %method,
            http.path = %path,
            http.query = query.as_deref().unwrap_or(""),
            remote_addr = remote_addr.as_deref().unwrap_or("-"),
            http.status_code = status,
            http.latency_ms = latency_ms,
            http.response_size = bytes.len(),
            http.response_body = %body_preview,
            "リクエスト完了"
         );
      }
   }

   Response::from_parts(parts, Body::from(bytes))
}
