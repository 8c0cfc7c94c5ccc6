//! # Item Service 設定
//!
//! 環境変数から Item Service サーバーの設定を読み込む。

use std::env;

/// Item Service サーバーの設定
#[derive(Debug, Clone)]
pub struct ItemServiceConfig {
   /// バインドアドレス
   pub host: String,
   /// ポート番号
   pub port: u16,
   /// CORS で許可するオリジン（空の場合はワイルドカード）
   pub allowed_origins: Vec<String>,
   /// ストレージ設定
   pub storage: StorageConfig,
}

/// ストレージバックエンドの設定
///
/// `STORAGE_BACKEND` 環境変数でリポジトリ実装を切り替える:
/// - `postgres`: PostgreSQL に sqlx で直結（デフォルト）
/// - `rest`: PostgREST 互換の REST テーブル API 経由
#[derive(Debug, Clone)]
pub struct StorageConfig {
   /// バックエンド（"postgres" | "rest"）
   pub backend:       String,
   /// PostgreSQL 接続 URL（backend=postgres の場合に必須）
   pub database_url:  Option<String>,
   /// REST テーブル API のベース URL（backend=rest の場合に必須）
   pub rest_base_url: Option<String>,
   /// REST テーブル API の API キー（backend=rest の場合に必須）
   pub rest_api_key:  Option<String>,
}

impl ItemServiceConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Self {
      Self {
         host: env::var("ITEM_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
         port: env::var("ITEM_PORT")
            .expect("ITEM_PORT が設定されていません")
            .parse()
            .expect("ITEM_PORT は有効なポート番号である必要があります"),
         allowed_origins: env::var("ALLOWED_ORIGINS")
            .map(|v| {
               v.split(',')
                  .map(str::trim)
                  .filter(|s| !s.is_empty())
                  .map(str::to_string)
                  .collect()
            })
            .unwrap_or_default(),
         storage: StorageConfig::from_env(),
      }
   }
}

impl StorageConfig {
   /// 環境変数からストレージ設定を読み込む
   ///
   /// バックエンドごとの必須変数の検証は、どちらの実装を使うか確定する
   /// 起動処理側（`main`）で行う。
   fn from_env() -> Self {
      Self {
         backend:       env::var("STORAGE_BACKEND").unwrap_or_else(|_| "postgres".to_string()),
         database_url:  env::var("DATABASE_URL").ok(),
         rest_base_url: env::var("REST_BASE_URL").ok(),
         rest_api_key:  env::var("REST_API_KEY").ok(),
      }
   }
}
