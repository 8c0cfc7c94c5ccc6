//! # RestItemRepository
//!
//! REST テーブル API（PostgREST 互換）に対する
//! [`ItemRepository`](super::ItemRepository) 実装。
//!
//! ## 設計方針
//!
//! - **等価述語フィルタ**: 識別子・所有者による絞り込みは
//!   `?id=eq.{id}` / `?user_id=eq.{value}` のクエリパラメータで表現する
//! - **採番の回収**: 挿入は `Prefer: return=representation` を付与し、
//!   バックエンドが採番した行をレスポンスから回収する
//! - **全件取得**: `Prefer: count=exact` を付与し、正確な件数の算出を指示する
//! - **エラーのラップ**: 2xx 以外のレスポンスは [`InfraError`] の Api 種別に
//!   変換し、バックエンド固有のエラーをそのまま上位層へ漏らさない

use async_trait::async_trait;
use itemflow_domain::item::{Item, ItemId, UserId};

use super::item_repository::{ItemRecord, ItemRepository};
use crate::error::InfraError;

/// REST テーブル API 実装の ItemRepository
///
/// Supabase 等の PostgREST 互換エンドポイントを想定する。
/// `api_key` は `apikey` ヘッダーと `Authorization: Bearer` の両方に設定される。
#[derive(Clone)]
pub struct RestItemRepository {
    base_url: String,
    api_key:  String,
    client:   reqwest::Client,
}

impl RestItemRepository {
    /// 新しいリポジトリインスタンスを作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: テーブル API のベース URL（例: `https://xyz.supabase.co/rest/v1`）
    /// - `api_key`: テーブル API の API キー
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key:  api_key.to_string(),
            client:   reqwest::Client::new(),
        }
    }

    fn items_url(&self) -> String {
        format!("{}/items", self.base_url)
    }

    /// 共通ヘッダーを付与したリクエストビルダーを返す
    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// レスポンスのステータスを検査し、2xx 以外をエラーに変換する
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, InfraError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(InfraError::api(status, body))
    }

    /// 挿入・更新リクエストのボディ（可変フィールドのみ）
    fn write_payload(item: &Item) -> serde_json::Value {
        serde_json::json!({
            "title":       item.title(),
            "description": item.description(),
            "user_id":     item.user_id().as_str(),
            "created_at":  item.created_at(),
            "updated_at":  item.updated_at(),
        })
    }
}

#[async_trait]
impl ItemRepository for RestItemRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(user_id = %item.user_id()))]
    async fn insert(&self, item: &Item) -> Result<Item, InfraError> {
        let response = self
            .request(self.client.post(self.items_url()))
            .header("Prefer", "return=representation")
            .json(&Self::write_payload(item))
            .send()
            .await?;
        let response = Self::check(response).await?;

        // return=representation は挿入した行を配列で返す
        let mut records: Vec<ItemRecord> = response.json().await?;
        let record = records.pop().ok_or_else(|| {
            InfraError::unexpected("挿入レスポンスに行が含まれていません")
        })?;

        Ok(record.into_domain())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(item_id = %item.id()))]
    async fn update(&self, item: &Item) -> Result<(), InfraError> {
        let url = format!("{}?id=eq.{}", self.items_url(), item.id().value());
        let response = self
            .request(self.client.patch(url))
            .json(&serde_json::json!({
                "title":       item.title(),
                "description": item.description(),
                "user_id":     item.user_id().as_str(),
                "updated_at":  item.updated_at(),
            }))
            .send()
            .await?;
        Self::check(response).await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(item_id = %id))]
    async fn delete(&self, id: ItemId) -> Result<(), InfraError> {
        let url = format!("{}?id=eq.{}", self.items_url(), id.value());
        let response = self.request(self.client.delete(url)).send().await?;
        Self::check(response).await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Item>, InfraError> {
        let url = format!("{}?select=*", self.items_url());
        let response = self
            .request(self.client.get(url))
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = Self::check(response).await?;

        let records: Vec<ItemRecord> = response.json().await?;
        Ok(records.into_iter().map(ItemRecord::into_domain).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(item_id = %id))]
    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, InfraError> {
        let url = format!("{}?select=*&id=eq.{}", self.items_url(), id.value());
        let response = self.request(self.client.get(url)).send().await?;
        let response = Self::check(response).await?;

        let mut records: Vec<ItemRecord> = response.json().await?;
        Ok(records.pop().map(ItemRecord::into_domain))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(user_id = %user_id))]
    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Vec<Item>, InfraError> {
        let url = format!(
            "{}?select=*&user_id=eq.{}",
            self.items_url(),
            urlencoding::encode(user_id.as_str())
        );
        let response = self.request(self.client.get(url)).send().await?;
        let response = Self::check(response).await?;

        let records: Vec<ItemRecord> = response.json().await?;
        Ok(records.into_iter().map(ItemRecord::into_domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_base_urlの末尾スラッシュが除去される() {
        let repo = RestItemRepository::new("https://example.supabase.co/rest/v1/", "key");
        assert_eq!(repo.items_url(), "https://example.supabase.co/rest/v1/items");
    }

    #[test]
    fn test_write_payloadが可変フィールドを含む() {
        let item = Item::new(
            ItemId::UNPERSISTED,
            Some("タイトル".to_string()),
            Some("説明".to_string()),
            UserId::new("user-1").unwrap(),
            Utc::now(),
        );

        let payload = RestItemRepository::write_payload(&item);

        assert_eq!(payload["title"], "タイトル");
        assert_eq!(payload["description"], "説明");
        assert_eq!(payload["user_id"], "user-1");
        assert!(payload.get("id").is_none(), "採番はバックエンドに委ねる");
    }
}
