//! # アプリケーション構築
//!
//! DI（リポジトリ・ユースケース・State）の初期化とルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。
//!
//! リポジトリはトレイトオブジェクトで受け取るため、ルーター構築は
//! どのストレージ実装が選択されたかを知らない。統合テストはここに
//! モックリポジトリを注入する。

use std::sync::Arc;

use axum::{
   Router,
   http::{HeaderName, HeaderValue, Method, header},
   middleware::from_fn,
   routing::get,
};
use itemflow_domain::clock::Clock;
use itemflow_infra::repository::ItemRepository;
use itemflow_shared::observability::{
   MakeRequestUuidV7,
   correlation_id_header,
   make_request_span,
};
use tower_http::{
   cors::{AllowOrigin, CorsLayer},
   request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
   trace::TraceLayer,
};

use crate::{
   handler::{
      ItemState,
      create_item,
      delete_item,
      get_item,
      health_check,
      list_items,
      list_items_by_user,
      ping,
      update_item,
   },
   middleware::request_log,
   usecase::ItemUseCaseImpl,
};

/// DI コンテナの構築とルーター定義を行う
///
/// インフラ初期化済みの依存（リポジトリ・Clock）を受け取り、
/// ユースケース → State → Router の順に組み立てる。
pub fn build_app(
   allowed_origins: &[String],
   item_repository: Arc<dyn ItemRepository>,
   clock: Arc<dyn Clock>,
) -> Router {
   let usecase = ItemUseCaseImpl::new(item_repository, clock);
   let item_state = Arc::new(ItemState { usecase });

   Router::new()
      .route("/health", get(health_check))
      .route("/ping", get(ping))
      .route("/items", get(list_items).post(create_item))
      .route(
         "/items/{id}",
         get(get_item).put(update_item).delete(delete_item),
      )
      .route("/items/user/{user_id}", get(list_items_by_user))
      .with_state(item_state)
      // レイヤー順序が重要: 下に書いたものが外側
      // 1. CorsLayer（最外）: プリフライトを本体に通さず応答する
      // 2. SetRequestIdLayer: 相関 ID を採番（クライアント提供値があれば再利用）
      // 3. TraceLayer: リクエストスパンに相関 ID・メソッド・パスを載せ、全ログに自動注入
      // 4. PropagateRequestIdLayer: レスポンスヘッダーに X-Correlation-Id をコピー
      // 5. request_log: リクエスト完了時に 1 行サマリログを出力（スパン内）
      .layer(from_fn(request_log))
      .layer(PropagateRequestIdLayer::new(correlation_id_header()))
      .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
      .layer(SetRequestIdLayer::new(
         correlation_id_header(),
         MakeRequestUuidV7,
      ))
      .layer(cors_layer(allowed_origins))
}

/// CORS レイヤーを構築する
///
/// オリジンが未設定の場合はワイルドカードにフォールバックする。
/// 資格情報の許可はワイルドカードと併用できないため、明示的な
/// オリジン指定時のみ有効にする。
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
   let layer = CorsLayer::new()
      .allow_methods([
         Method::GET,
         Method::POST,
         Method::PUT,
         Method::PATCH,
         Method::DELETE,
         Method::OPTIONS,
      ])
      .allow_headers([
         header::ACCEPT,
         header::CONTENT_TYPE,
         header::AUTHORIZATION,
         HeaderName::from_static("x-requested-with"),
         correlation_id_header(),
         HeaderName::from_static("x-user-id"),
      ]);

   if allowed_origins.is_empty() {
      return layer.allow_origin(AllowOrigin::any());
   }

   let origins: Vec<HeaderValue> = allowed_origins
      .iter()
      .filter_map(|origin| origin.parse().ok())
      .collect();
   layer
      .allow_origin(AllowOrigin::list(origins))
      .allow_credentials(true)
}
