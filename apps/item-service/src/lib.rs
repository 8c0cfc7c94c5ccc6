//! # Item Service ライブラリ
//!
//! Item Service のルーター構築・ハンドラ・ユースケースを公開する。
//! 統合テストはここから [`app_builder::build_app`] を使用してルーターを
//! 組み立て、モックリポジトリを注入する。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod usecase;
