//! # リポジトリ実装
//!
//! Item の永続化契約（[`ItemRepository`]）とその具体的な実装を提供する。
//!
//! ## 設計方針
//!
//! - **依存性逆転**: 上位層はトレイトにのみ依存し、実装は起動時に選択される
//! - **ストレージ抽象化**: PostgreSQL 直結（sqlx）と REST テーブル API
//!   （PostgREST 互換）の 2 実装を同一契約で提供
//! - **テスタビリティ**: トレイト経由でモック可能な設計

pub mod item_repository;
pub mod rest_item_repository;

pub use item_repository::{ItemRepository, PostgresItemRepository};
pub use rest_item_repository::RestItemRepository;
