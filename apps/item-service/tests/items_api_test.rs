//! # Item API の統合テスト
//!
//! モックリポジトリを注入したルーターに対して、HTTP レベルで
//! CRUD の一連のシナリオを検証する。

use std::sync::Arc;

use axum::{Router, body::Body};
use http::{Request, StatusCode, header};
use itemflow_domain::clock::SystemClock;
use itemflow_infra::mock::MockItemRepository;
use itemflow_item_service::app_builder::build_app;
use serde_json::{Value, json};
use tower::ServiceExt;

/// テスト用のルーターを構築する
fn test_app() -> Router {
   build_app(
      &[],
      Arc::new(MockItemRepository::new()),
      Arc::new(SystemClock),
   )
}

/// JSON ボディ付きのリクエストを構築する
fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
   Request::builder()
      .method(method)
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap()
}

/// ボディなしのリクエストを構築する
fn request(method: &str, uri: &str) -> Request<Body> {
   Request::builder()
      .method(method)
      .uri(uri)
      .body(Body::empty())
      .unwrap()
}

/// レスポンスボディを JSON として読み取る
async fn read_json(response: axum::response::Response) -> Value {
   let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
   serde_json::from_slice(&bytes).unwrap()
}

// ===== 作成 =====

#[tokio::test]
async fn test_post_itemsで201と採番済みidが返る() {
   let app = test_app();

   let response = app
      .oneshot(json_request(
         "POST",
         "/items",
         json!({"title": "t", "description": "d", "user_id": "u1"}),
      ))
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::CREATED);

   let body = read_json(response).await;
   assert!(body["id"].as_i64().unwrap() > 0, "識別子が採番されていること");
   assert_eq!(body["title"], "t");
   assert_eq!(body["description"], "d");
   assert_eq!(body["user_id"], "u1");
}

#[tokio::test]
async fn test_post_itemsタイトルなしは400() {
   let app = test_app();

   let response = app
      .oneshot(json_request(
         "POST",
         "/items",
         json!({"description": "d", "user_id": "u1"}),
      ))
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::BAD_REQUEST);

   let body = read_json(response).await;
   assert_eq!(body["status"], 400);
   assert!(
      body["type"].as_str().unwrap().ends_with("validation-error"),
      "バリデーションエラーとして返ること: {body}"
   );
}

#[tokio::test]
async fn test_post_items不正なボディは400() {
   let app = test_app();

   let response = app
      .oneshot(
         Request::builder()
            .method("POST")
            .uri("/items")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
      )
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ===== 取得 =====

#[tokio::test]
async fn test_get_itemsで全件が配列で返る() {
   let app = test_app();

   app.clone()
      .oneshot(json_request(
         "POST",
         "/items",
         json!({"title": "a", "user_id": "u1"}),
      ))
      .await
      .unwrap();
   app.clone()
      .oneshot(json_request(
         "POST",
         "/items",
         json!({"title": "b", "user_id": "u2"}),
      ))
      .await
      .unwrap();

   let response = app.oneshot(request("GET", "/items")).await.unwrap();

   assert_eq!(response.status(), StatusCode::OK);
   let body = read_json(response).await;
   assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_items_idゼロはストレージに触れる前に400() {
   let app = test_app();

   let response = app.oneshot(request("GET", "/items/0")).await.unwrap();

   assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_items_id非数値は400() {
   let app = test_app();

   let response = app.oneshot(request("GET", "/items/abc")).await.unwrap();

   assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_items_不在のidは404() {
   let app = test_app();

   let response = app.oneshot(request("GET", "/items/999999")).await.unwrap();

   assert_eq!(response.status(), StatusCode::NOT_FOUND);

   let body = read_json(response).await;
   assert_eq!(body["status"], 404);
   assert!(body["type"].as_str().unwrap().ends_with("not-found"));
}

#[tokio::test]
async fn test_作成した行がget_items_idで取得できる() {
   let app = test_app();

   let created = read_json(
      app.clone()
         .oneshot(json_request(
            "POST",
            "/items",
            json!({"title": "往復", "description": "d", "user_id": "u1"}),
         ))
         .await
         .unwrap(),
   )
   .await;
   let id = created["id"].as_i64().unwrap();

   let response = app
      .oneshot(request("GET", &format!("/items/{id}")))
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::OK);
   let fetched = read_json(response).await;
   assert_eq!(fetched, created, "作成時と取得時で内容が一致すること");
}

// ===== 更新 =====

#[tokio::test]
async fn test_put_itemsで200と更新後の内容が返る() {
   let app = test_app();

   let created = read_json(
      app.clone()
         .oneshot(json_request(
            "POST",
            "/items",
            json!({"title": "元", "user_id": "u1"}),
         ))
         .await
         .unwrap(),
   )
   .await;
   let id = created["id"].as_i64().unwrap();

   let response = app
      .clone()
      .oneshot(json_request(
         "PUT",
         &format!("/items/{id}"),
         json!({"title": "更新後", "description": "新しい説明", "user_id": "u1"}),
      ))
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::OK);
   let body = read_json(response).await;
   assert_eq!(body["title"], "更新後");
   assert_eq!(body["description"], "新しい説明");

   let fetched = read_json(
      app.oneshot(request("GET", &format!("/items/{id}")))
         .await
         .unwrap(),
   )
   .await;
   assert_eq!(fetched["title"], "更新後");
}

#[tokio::test]
async fn test_put_不在の行は存在確認で404() {
   let app = test_app();

   let response = app
      .oneshot(json_request(
         "PUT",
         "/items/999999",
         json!({"title": "t", "user_id": "u1"}),
      ))
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_put_idゼロは400() {
   let app = test_app();

   let response = app
      .oneshot(json_request(
         "PUT",
         "/items/0",
         json!({"title": "t", "user_id": "u1"}),
      ))
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ===== 削除 =====

#[tokio::test]
async fn test_delete_itemsで204が返りボディは空() {
   let app = test_app();

   let created = read_json(
      app.clone()
         .oneshot(json_request(
            "POST",
            "/items",
            json!({"title": "削除対象", "user_id": "u1"}),
         ))
         .await
         .unwrap(),
   )
   .await;
   let id = created["id"].as_i64().unwrap();

   let response = app
      .clone()
      .oneshot(request("DELETE", &format!("/items/{id}")))
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::NO_CONTENT);
   let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
   assert!(bytes.is_empty(), "204 のボディは空であること");

   let response = app
      .oneshot(request("GET", &format!("/items/{id}")))
      .await
      .unwrap();
   assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_不在の行は404() {
   let app = test_app();

   let response = app
      .oneshot(request("DELETE", "/items/999999"))
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ===== 所有者別一覧 =====

#[tokio::test]
async fn test_get_items_userで所有者の行だけが返る() {
   let app = test_app();

   app.clone()
      .oneshot(json_request(
         "POST",
         "/items",
         json!({"title": "a", "user_id": "u1"}),
      ))
      .await
      .unwrap();
   app.clone()
      .oneshot(json_request(
         "POST",
         "/items",
         json!({"title": "b", "user_id": "u2"}),
      ))
      .await
      .unwrap();

   let response = app.oneshot(request("GET", "/items/user/u1")).await.unwrap();

   assert_eq!(response.status(), StatusCode::OK);
   let body = read_json(response).await;
   let items = body.as_array().unwrap();
   assert_eq!(items.len(), 1);
   assert_eq!(items[0]["title"], "a");
}

#[tokio::test]
async fn test_get_items_user一致なしは空配列で200() {
   let app = test_app();

   let response = app
      .oneshot(request("GET", "/items/user/unknown"))
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::OK);
   let body = read_json(response).await;
   assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_get_items_user空白のみの所有者idは400() {
   let app = test_app();

   let response = app
      .oneshot(request("GET", "/items/user/%20%20"))
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ===== プローブ =====

#[tokio::test]
async fn test_pingがpongを返す() {
   let app = test_app();

   let response = app.oneshot(request("GET", "/ping")).await.unwrap();

   assert_eq!(response.status(), StatusCode::OK);
   let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
   assert_eq!(&bytes[..], b"pong");
}

#[tokio::test]
async fn test_healthがhealthyを返す() {
   let app = test_app();

   let response = app.oneshot(request("GET", "/health")).await.unwrap();

   assert_eq!(response.status(), StatusCode::OK);
   let body = read_json(response).await;
   assert_eq!(body["status"], "healthy");
}
