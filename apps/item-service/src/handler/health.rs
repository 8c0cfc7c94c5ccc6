//! # ヘルスチェックハンドラ
//!
//! サービスの稼働状態を確認するためのエンドポイント。
//!
//! ## 用途
//!
//! - **ロードバランサー**: ターゲットグループのヘルスチェック
//! - **コンテナオーケストレーター**: liveness probe
//! - **疎通確認**: `/ping` はボディ `pong` のみを返す最小プローブ
//!
//! どちらのパスもリクエストサマリログの出力対象外。

use axum::Json;
use itemflow_shared::HealthResponse;

/// ヘルスチェックエンドポイント
///
/// サーバーが正常に稼働していることを確認するためのエンドポイント。
pub async fn health_check() -> Json<HealthResponse> {
   Json(HealthResponse {
      status:  "healthy".to_string(),
      version: env!("CARGO_PKG_VERSION").to_string(),
   })
}

/// 疎通確認エンドポイント
///
/// 固定文字列 `pong` をプレーンテキストで返す。
pub async fn ping() -> &'static str {
   "pong"
}
