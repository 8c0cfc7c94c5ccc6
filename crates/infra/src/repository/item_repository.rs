//! # ItemRepository
//!
//! Item の永続化契約と PostgreSQL 実装。
//!
//! ## 設計方針
//!
//! - **契約の最小化**: 単一行の CRUD と所有者別検索のみ。ページングや
//!   論理削除フィルタは提供しない
//! - **不在は `Option`**: `find_by_id` は不在を `Ok(None)` で表現し、
//!   エラーにはしない。不在をどう扱うかはサービス層の判断
//! - **採番はストレージ側**: `insert` は `RETURNING` で採番済みの行を返す

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use itemflow_domain::item::{Item, ItemId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::InfraError;

/// Item リポジトリトレイト
///
/// ストレージ技術から独立した Item の永続化契約。
/// PostgreSQL 直結（[`PostgresItemRepository`]）と REST テーブル API
/// （[`RestItemRepository`](crate::repository::RestItemRepository)）が
/// この契約を実装し、起動時の設定でどちらかが選択される。
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Item を挿入し、採番済みの行を返す
    ///
    /// 渡された Item の識別子は無視され、ストレージが新しい識別子を採番する。
    async fn insert(&self, item: &Item) -> Result<Item, InfraError>;

    /// 識別子が一致する行の可変フィールドを全置換する
    ///
    /// `title` / `description` / `user_id` / `updated_at` を上書きする。
    /// 一致する行が無い場合は何もしない（存在確認はサービス層の責務）。
    async fn update(&self, item: &Item) -> Result<(), InfraError>;

    /// 識別子が一致する行を削除する
    async fn delete(&self, id: ItemId) -> Result<(), InfraError>;

    /// 全行を取得する（挿入順）
    async fn find_all(&self) -> Result<Vec<Item>, InfraError>;

    /// 識別子で検索する
    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, InfraError>;

    /// 所有者で検索する
    ///
    /// 一致する行が無い場合は空のリストを返す（エラーにはしない）。
    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Vec<Item>, InfraError>;
}

/// items テーブルの行
///
/// sqlx の行マッピングと REST テーブル API の JSON 表現を兼ねる
/// （両ストレージのワイヤ形状は同一のカラム名）。
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub(crate) struct ItemRecord {
    pub id:          i64,
    pub title:       Option<String>,
    pub description: Option<String>,
    pub user_id:     String,
    pub created_at:  DateTime<Utc>,
    pub updated_at:  DateTime<Utc>,
    pub deleted_at:  Option<DateTime<Utc>>,
}

impl ItemRecord {
    pub(crate) fn into_domain(self) -> Item {
        // ストレージの NOT NULL 制約により user_id は常に有効
        let user_id = UserId::new(self.user_id).expect("ストレージに格納された UserId は常に有効");
        Item::from_db(
            ItemId::from_i64(self.id),
            self.title,
            self.description,
            user_id,
            self.created_at,
            self.updated_at,
            self.deleted_at,
        )
    }
}

/// PostgreSQL 実装の ItemRepository
#[derive(Debug, Clone)]
pub struct PostgresItemRepository {
    pool: PgPool,
}

impl PostgresItemRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepository for PostgresItemRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(user_id = %item.user_id()))]
    async fn insert(&self, item: &Item) -> Result<Item, InfraError> {
        let record = sqlx::query_as::<_, ItemRecord>(
            r#"
            INSERT INTO items (title, description, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, user_id, created_at, updated_at, deleted_at
            "#,
        )
        .bind(item.title())
        .bind(item.description())
        .bind(item.user_id().as_str())
        .bind(item.created_at())
        .bind(item.updated_at())
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into_domain())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(item_id = %item.id()))]
    async fn update(&self, item: &Item) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            UPDATE items
            SET title = $2, description = $3, user_id = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(item.id().value())
        .bind(item.title())
        .bind(item.description())
        .bind(item.user_id().as_str())
        .bind(item.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(item_id = %id))]
    async fn delete(&self, id: ItemId) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            DELETE FROM items
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Item>, InfraError> {
        let records = sqlx::query_as::<_, ItemRecord>(
            r#"
            SELECT id, title, description, user_id, created_at, updated_at, deleted_at
            FROM items
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(ItemRecord::into_domain).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(item_id = %id))]
    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, InfraError> {
        let record = sqlx::query_as::<_, ItemRecord>(
            r#"
            SELECT id, title, description, user_id, created_at, updated_at, deleted_at
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(ItemRecord::into_domain))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(user_id = %user_id))]
    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Vec<Item>, InfraError> {
        let records = sqlx::query_as::<_, ItemRecord>(
            r#"
            SELECT id, title, description, user_id, created_at, updated_at, deleted_at
            FROM items
            WHERE user_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(ItemRecord::into_domain).collect())
    }
}
