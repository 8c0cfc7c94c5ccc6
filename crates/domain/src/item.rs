//! # Item エンティティ
//!
//! 本サービスが扱う唯一の永続化エンティティ。
//!
//! ## 不変条件
//!
//! - Item が「有効」であるのは、タイトルが存在しかつ空でない場合のみ
//! - 識別子 0 は「未永続化」を意味し、更新・削除の対象にできない
//! - 識別子はサーバー側（ストレージ）で採番される正の整数
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use itemflow_domain::item::{Item, ItemId, UserId};
//!
//! let user_id = UserId::new("user-1")?;
//! let item = Item::new(
//!     ItemId::UNPERSISTED,
//!     Some("買い物リスト".to_string()),
//!     None,
//!     user_id,
//!     chrono::Utc::now(),
//! );
//!
//! item.validate()?;
//! assert!(!item.id().is_persisted());
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DomainError;

// =========================================================================
// ItemId（識別子）
// =========================================================================

/// Item の一意識別子
///
/// ストレージが採番する正の整数。値 0 は「未永続化」を表す予約値で、
/// 更新・削除操作はサービス層で拒否される。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[display("{_0}")]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    /// 未永続化を表す識別子（値 0）
    pub const UNPERSISTED: Self = Self(0);

    /// 既存の値から識別子を作成する
    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    /// 内部値を取得する
    pub fn value(&self) -> i64 {
        self.0
    }

    /// ストレージで採番済みかどうか
    pub fn is_persisted(&self) -> bool {
        self.0 > 0
    }
}

// =========================================================================
// UserId（所有者識別子）
// =========================================================================

/// Item の所有者識別子（値オブジェクト）
///
/// 外部の認証基盤が発行する文字列をそのまま保持する。
///
/// # 不変条件
///
/// - 空文字列ではない（前後の空白は除去される）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "所有者 ID は必須です".to_string(),
            ));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 所有権を持つ文字列に変換する
    pub fn into_string(self) -> String {
        self.0
    }
}

// =========================================================================
// Item（エンティティ）
// =========================================================================

/// Item エンティティ
///
/// タイトル・説明・所有者とタイムスタンプを持つ。
///
/// # deleted_at について
///
/// 論理削除用のタイムスタンプはスキーマ上存在するが、現行のどの操作も
/// 設定・参照しない。論理削除のセマンティクスが要件として定義されるまで
/// 未使用のまま保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id:          ItemId,
    title:       Option<String>,
    description: Option<String>,
    user_id:     UserId,
    created_at:  DateTime<Utc>,
    updated_at:  DateTime<Utc>,
    deleted_at:  Option<DateTime<Utc>>,
}

impl Item {
    /// 新しい Item を作成する
    ///
    /// 作成・更新時刻はともに `now` が設定される。バリデーションは行わない
    /// （サービス層が [`validate`](Self::validate) を呼ぶ）。
    pub fn new(
        id: ItemId,
        title: Option<String>,
        description: Option<String>,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// ストレージから取得した行を復元する
    #[allow(clippy::too_many_arguments)]
    pub fn from_db(
        id: ItemId,
        title: Option<String>,
        description: Option<String>,
        user_id: UserId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            user_id,
            created_at,
            updated_at,
            deleted_at,
        }
    }

    /// Item が有効かどうかを検証する
    ///
    /// タイトルが存在しかつ空でない場合のみ有効。説明・所有者 ID・
    /// タイムスタンプはここでは検証しない。
    pub fn validate(&self) -> Result<(), DomainError> {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => Ok(()),
            _ => Err(DomainError::Validation(
                "タイトルは必須です".to_string(),
            )),
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn item_with_title(title: Option<&str>) -> Item {
        Item::new(
            ItemId::UNPERSISTED,
            title.map(str::to_string),
            Some("説明".to_string()),
            UserId::new("user-1").unwrap(),
            Utc::now(),
        )
    }

    // ===== validate テスト =====

    #[test]
    fn test_validate_タイトルありで成功する() {
        let item = item_with_title(Some("買い物リスト"));
        assert!(item.validate().is_ok());
    }

    #[rstest]
    #[case::タイトルなし(None)]
    #[case::空文字列(Some(""))]
    fn test_validate_タイトル不在で失敗する(#[case] title: Option<&str>) {
        let item = item_with_title(title);

        let err = item.validate().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    // ===== ItemId テスト =====

    #[test]
    fn test_item_id_正の値は永続化済み() {
        assert!(ItemId::from_i64(1).is_persisted());
        assert!(ItemId::from_i64(999_999).is_persisted());
    }

    #[rstest]
    #[case::ゼロ(0)]
    #[case::負数(-1)]
    fn test_item_id_ゼロ以下は未永続化(#[case] value: i64) {
        assert!(!ItemId::from_i64(value).is_persisted());
    }

    #[test]
    fn test_item_id_unpersistedはゼロ() {
        assert_eq!(ItemId::UNPERSISTED.value(), 0);
    }

    // ===== UserId テスト =====

    #[test]
    fn test_user_id_空文字列で失敗する() {
        assert!(matches!(
            UserId::new(""),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            UserId::new("   "),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_user_id_前後の空白が除去される() {
        let user_id = UserId::new("  user-1  ").unwrap();
        assert_eq!(user_id.as_str(), "user-1");
    }

    // ===== コンストラクタ テスト =====

    #[test]
    fn test_new_はタイムスタンプを揃えて設定する() {
        let now = Utc::now();
        let item = Item::new(
            ItemId::UNPERSISTED,
            Some("t".to_string()),
            None,
            UserId::new("u").unwrap(),
            now,
        );

        assert_eq!(item.created_at(), now);
        assert_eq!(item.updated_at(), now);
        assert_eq!(item.deleted_at(), None);
    }
}
