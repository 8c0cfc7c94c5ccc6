//! # テスト用モックリポジトリ
//!
//! ユースケーステストで使用するインメモリモックリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! itemflow-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use itemflow_domain::item::{Item, ItemId, UserId};

use crate::{error::InfraError, repository::ItemRepository};

/// インメモリ実装の ItemRepository
///
/// 挿入時に連番の識別子を採番する。`delete_calls` / `update_calls` で
/// ストレージ操作が実際に呼ばれた回数を検証できる（「存在確認で弾かれた
/// 操作はストレージに到達しない」のテスト用）。
#[derive(Clone, Default)]
pub struct MockItemRepository {
    items:        Arc<Mutex<Vec<Item>>>,
    update_calls: Arc<AtomicUsize>,
    delete_calls: Arc<AtomicUsize>,
}

impl MockItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// ストレージの update が呼ばれた回数
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// ストレージの delete が呼ばれた回数
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn next_id(items: &[Item]) -> i64 {
        items.iter().map(|i| i.id().value()).max().unwrap_or(0) + 1
    }
}

#[async_trait]
impl ItemRepository for MockItemRepository {
    async fn insert(&self, item: &Item) -> Result<Item, InfraError> {
        let mut items = self.items.lock().unwrap();
        let persisted = Item::from_db(
            ItemId::from_i64(Self::next_id(&items)),
            item.title().map(str::to_string),
            item.description().map(str::to_string),
            item.user_id().clone(),
            item.created_at(),
            item.updated_at(),
            item.deleted_at(),
        );
        items.push(persisted.clone());
        Ok(persisted)
    }

    async fn update(&self, item: &Item) -> Result<(), InfraError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let mut items = self.items.lock().unwrap();
        if let Some(pos) = items.iter().position(|i| i.id() == item.id()) {
            items[pos] = item.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: ItemId) -> Result<(), InfraError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.items.lock().unwrap().retain(|i| i.id() != id);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Item>, InfraError> {
        Ok(self.items.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, InfraError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id() == id)
            .cloned())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Vec<Item>, InfraError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.user_id() == user_id)
            .cloned()
            .collect())
    }
}
