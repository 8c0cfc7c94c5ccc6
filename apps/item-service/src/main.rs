//! # Item Service サーバー
//!
//! Item リソースの CRUD を提供する HTTP マイクロサービス。
//!
//! ## 構成
//!
//! ```text
//! handler → usecase → repository（Postgres または REST テーブル API）
//! ```
//!
//! リポジトリ実装は起動時に `STORAGE_BACKEND` で選択され、以降の
//! コード経路はどちらが選ばれたかを知らない。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `ITEM_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `ITEM_PORT` | **Yes** | ポート番号 |
//! | `STORAGE_BACKEND` | No | `postgres`（デフォルト）または `rest` |
//! | `DATABASE_URL` | backend=postgres | PostgreSQL 接続 URL |
//! | `REST_BASE_URL` | backend=rest | REST テーブル API のベース URL |
//! | `REST_API_KEY` | backend=rest | REST テーブル API の API キー |
//! | `ALLOWED_ORIGINS` | No | CORS 許可オリジン（カンマ区切り、未設定はワイルドカード） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: pretty） |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! ITEM_PORT=3000 DATABASE_URL=postgres://... cargo run -p itemflow-item-service
//!
//! # REST テーブル API バックエンド
//! ITEM_PORT=3000 STORAGE_BACKEND=rest \
//!   REST_BASE_URL=https://xyz.supabase.co/rest/v1 REST_API_KEY=... \
//!   cargo run -p itemflow-item-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use itemflow_domain::clock::SystemClock;
use itemflow_item_service::{app_builder, config::ItemServiceConfig};
use itemflow_infra::{
   db,
   repository::{ItemRepository, PostgresItemRepository, RestItemRepository},
};
use itemflow_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// Item Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   // トレーシング初期化
   init_tracing(TracingConfig::from_env("item-service"));

   // 設定読み込み
   let config = ItemServiceConfig::from_env();

   tracing::info!(
      "Item Service サーバーを起動します: {}:{}",
      config.host,
      config.port
   );

   // ストレージバックエンドの選択
   let item_repository: Arc<dyn ItemRepository> = match config.storage.backend.as_str() {
      "postgres" => {
         let database_url = config
            .storage
            .database_url
            .as_deref()
            .expect("DATABASE_URL が設定されていません");

         let pool = db::create_pool(database_url)
            .await
            .expect("データベース接続に失敗しました");
         tracing::info!("データベースに接続しました");

         db::run_migrations(&pool)
            .await
            .expect("マイグレーションの適用に失敗しました");
         tracing::info!("マイグレーションを適用しました");

         Arc::new(PostgresItemRepository::new(pool))
      }
      "rest" => {
         let base_url = config
            .storage
            .rest_base_url
            .as_deref()
            .expect("REST_BASE_URL が設定されていません");
         let api_key = config
            .storage
            .rest_api_key
            .as_deref()
            .expect("REST_API_KEY が設定されていません");

         tracing::info!("REST テーブル API をストレージとして使用します: {base_url}");
         Arc::new(RestItemRepository::new(base_url, api_key))
      }
      other => anyhow::bail!("未知の STORAGE_BACKEND です: {other}"),
   };

   // ルーター構築
   let app = app_builder::build_app(
      &config.allowed_origins,
      item_repository,
      Arc::new(SystemClock),
   );

   // サーバー起動
   let addr: SocketAddr = format!("{}:{}", config.host, config.port)
      .parse()
      .expect("アドレスのパースに失敗しました");

   let listener = TcpListener::bind(addr).await?;
   tracing::info!("Item Service サーバーが起動しました: {}", addr);

   // リモートアドレスをサマリログに載せるため ConnectInfo 付きで起動する
   axum::serve(
      listener,
      app.into_make_service_with_connect_info::<SocketAddr>(),
   )
   .await?;

   Ok(())
}
