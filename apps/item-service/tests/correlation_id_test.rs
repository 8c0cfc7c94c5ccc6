//! # 相関 ID レイヤーのテスト
//!
//! 相関 ID レイヤー（SetRequestIdLayer + PropagateRequestIdLayer +
//! カスタム make_span_with）が正しく動作することを検証する。
//!
//! - レスポンスに `X-Correlation-Id` ヘッダーが含まれる
//! - クライアント提供の `X-Correlation-Id` がそのまま返される
//! - 自動生成の `X-Correlation-Id` が UUID v7 形式である

use std::sync::Arc;

use axum::Router;
use http::{Request, StatusCode};
use itemflow_domain::clock::SystemClock;
use itemflow_infra::mock::MockItemRepository;
use itemflow_item_service::app_builder::build_app;
use tower::ServiceExt;

/// テスト用のルーターを構築する
///
/// 本番と同じレイヤー構成で、ストレージのみモックに差し替える。
fn test_app() -> Router {
   build_app(
      &[],
      Arc::new(MockItemRepository::new()),
      Arc::new(SystemClock),
   )
}

#[tokio::test]
async fn test_レスポンスにx_correlation_idヘッダーが含まれる() {
   let app = test_app();

   let response = app
      .oneshot(
         Request::builder()
            .uri("/items")
            .body(axum::body::Body::empty())
            .unwrap(),
      )
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::OK);
   assert!(
      response.headers().contains_key("x-correlation-id"),
      "レスポンスに x-correlation-id ヘッダーが含まれること"
   );
}

#[tokio::test]
async fn test_クライアント提供のx_correlation_idがそのまま返される() {
   let app = test_app();
   let custom_id = "abc123";

   let response = app
      .oneshot(
         Request::builder()
            .uri("/items")
            .header("x-correlation-id", custom_id)
            .body(axum::body::Body::empty())
            .unwrap(),
      )
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::OK);
   assert_eq!(
      response
         .headers()
         .get("x-correlation-id")
         .unwrap()
         .to_str()
         .unwrap(),
      custom_id,
      "クライアント提供の相関 ID がそのまま返されること"
   );
}

#[tokio::test]
async fn test_自動生成のx_correlation_idがuuid_v7形式である() {
   let app = test_app();

   let response = app
      .oneshot(
         Request::builder()
            .uri("/items")
            .body(axum::body::Body::empty())
            .unwrap(),
      )
      .await
      .unwrap();

   let correlation_id = response
      .headers()
      .get("x-correlation-id")
      .unwrap()
      .to_str()
      .unwrap();

   assert!(!correlation_id.is_empty(), "相関 ID が空でないこと");
   let uuid = uuid::Uuid::parse_str(correlation_id)
      .unwrap_or_else(|_| panic!("有効な UUID であること: {correlation_id}"));
   assert_eq!(
      uuid.get_version(),
      Some(uuid::Version::SortRand),
      "UUID v7（SortRand）であること"
   );
}
