//! # Item ユースケース
//!
//! Item の CRUD 操作を提供する。
//!
//! ## 設計方針
//!
//! - **検証が先、ストレージは後**: バリデーション違反はストレージに
//!   触れる前に返す
//! - **更新・削除は存在確認付き**: `find_by_id` で行の存在を確認してから
//!   変更を発行する。不在は 404 に対応する `NotFound` として明示的に返し、
//!   ストレージ障害と区別する
//! - **操作スパン**: 各操作は `#[tracing::instrument]` で操作名のスパンを
//!   張り、識別子・所有者をフィールドとして全ログに注入する

use std::sync::Arc;

use itemflow_domain::{
   DomainError,
   clock::Clock,
   item::{Item, ItemId, UserId},
};
use itemflow_infra::repository::ItemRepository;

use crate::error::AppError;

/// Item 作成の入力
pub struct CreateItemInput {
   pub title:       Option<String>,
   pub description: Option<String>,
   pub user_id:     UserId,
}

/// Item 更新の入力
///
/// 更新は全置換（タイトル・説明・所有者をまとめて上書き）。
pub struct UpdateItemInput {
   pub id:          ItemId,
   pub title:       Option<String>,
   pub description: Option<String>,
   pub user_id:     UserId,
}

/// Item ユースケース
pub struct ItemUseCaseImpl {
   item_repository: Arc<dyn ItemRepository>,
   clock:           Arc<dyn Clock>,
}

impl ItemUseCaseImpl {
   pub fn new(item_repository: Arc<dyn ItemRepository>, clock: Arc<dyn Clock>) -> Self {
      Self {
         item_repository,
         clock,
      }
   }

   /// Item を作成する
   ///
   /// 1. バリデーション（タイトル必須）
   /// 2. ストレージに挿入し、採番された識別子を回収
   #[tracing::instrument(name = "create_item", skip_all, fields(user_id = %input.user_id))]
   pub async fn create(&self, input: CreateItemInput) -> Result<Item, AppError> {
      let item = Item::new(
         ItemId::UNPERSISTED,
         input.title,
         input.description,
         input.user_id,
         self.clock.now(),
      );
      item.validate()?;

      tracing::info!("Item を作成します");
      let created = self.item_repository.insert(&item).await?;

      tracing::info!(item_id = %created.id(), "Item を作成しました");
      Ok(created)
   }

   /// Item を更新する（全置換）
   ///
   /// 1. バリデーション（タイトル必須）
   /// 2. 未永続化（識別子 0）の拒否
   /// 3. `find_by_id` による存在確認（不在なら `NotFound`、ストレージの
   ///    update は発行しない）
   /// 4. 可変フィールドの全置換
   #[tracing::instrument(
      name = "update_item",
      skip_all,
      fields(item_id = %input.id, user_id = %input.user_id)
   )]
   pub async fn update(&self, input: UpdateItemInput) -> Result<Item, AppError> {
      let now = self.clock.now();
      let draft = Item::new(input.id, input.title, input.description, input.user_id, now);
      draft.validate()?;

      if !input.id.is_persisted() {
         tracing::warn!("識別子 0 の Item は更新できません");
         return Err(DomainError::Validation(
            "未永続化の Item は更新できません".to_string(),
         )
         .into());
      }

      let existing = self
         .item_repository
         .find_by_id(input.id)
         .await?
         .ok_or_else(|| AppError::NotFound(format!("Item が見つかりません: {}", input.id)))?;

      // 作成時刻と論理削除時刻は既存の値を引き継ぐ
      let item = Item::from_db(
         input.id,
         draft.title().map(str::to_string),
         draft.description().map(str::to_string),
         draft.user_id().clone(),
         existing.created_at(),
         now,
         existing.deleted_at(),
      );

      tracing::info!("Item を更新します");
      self.item_repository.update(&item).await?;

      tracing::info!("Item を更新しました");
      Ok(item)
   }

   /// Item を削除する
   ///
   /// 1. 未永続化（識別子 0）の拒否
   /// 2. `find_by_id` による存在確認（不在なら `NotFound`、ストレージの
   ///    delete は発行しない）
   /// 3. 削除
   #[tracing::instrument(name = "delete_item", skip_all, fields(item_id = %id))]
   pub async fn delete(&self, id: ItemId) -> Result<(), AppError> {
      if !id.is_persisted() {
         tracing::warn!("識別子 0 の Item は削除できません");
         return Err(DomainError::Validation(
            "未永続化の Item は削除できません".to_string(),
         )
         .into());
      }

      if self.item_repository.find_by_id(id).await?.is_none() {
         tracing::warn!("削除対象の Item が見つかりません");
         return Err(AppError::NotFound(format!("Item が見つかりません: {id}")));
      }

      tracing::info!("Item を削除します");
      self.item_repository.delete(id).await?;

      tracing::info!("Item を削除しました");
      Ok(())
   }

   /// 全 Item を取得する
   #[tracing::instrument(name = "get_all_items", skip_all)]
   pub async fn get_all(&self) -> Result<Vec<Item>, AppError> {
      tracing::debug!("全 Item を取得します");
      let items = self.item_repository.find_all().await?;

      tracing::debug!(count = items.len(), "全 Item を取得しました");
      Ok(items)
   }

   /// 識別子で Item を取得する
   #[tracing::instrument(name = "get_item_by_id", skip_all, fields(item_id = %id))]
   pub async fn get_by_id(&self, id: ItemId) -> Result<Item, AppError> {
      tracing::debug!("Item を取得します");
      let item = self
         .item_repository
         .find_by_id(id)
         .await?
         .ok_or_else(|| AppError::NotFound(format!("Item が見つかりません: {id}")))?;

      tracing::debug!("Item を取得しました");
      Ok(item)
   }

   /// 所有者で Item を取得する
   ///
   /// 一致する行が無い場合は空のリストを返す（`NotFound` にはしない）。
   #[tracing::instrument(name = "get_items_by_user_id", skip_all, fields(user_id = %user_id))]
   pub async fn get_by_user_id(&self, user_id: &UserId) -> Result<Vec<Item>, AppError> {
      tracing::debug!("所有者の Item を取得します");
      let items = self.item_repository.find_by_user_id(user_id).await?;

      tracing::debug!(count = items.len(), "所有者の Item を取得しました");
      Ok(items)
   }
}
