//! # ドメイン層エラー定義
//!
//! ビジネスルール違反を表現するエラー型。
//!
//! ## 設計方針
//!
//! - **型による分類**: エラーの種類を列挙型で明示し、パターンマッチで処理可能に
//! - **thiserror 活用**: `#[error(...)]` マクロでエラーメッセージを自動生成
//! - **HTTP ステータスへのマッピング**: アプリケーション層で 400 Bad Request に変換される
//!
//! ## 使用例
//!
//! ```rust
//! use itemflow_domain::DomainError;
//!
//! fn validate_title(title: Option<&str>) -> Result<(), DomainError> {
//!     match title {
//!         Some(t) if !t.is_empty() => Ok(()),
//!         _ => Err(DomainError::Validation("タイトルは必須です".to_string())),
//!     }
//! }
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// ビジネスルールの検証中に発生する例外状態を表現する。
/// アプリケーション層でこのエラーを受け取り、適切な HTTP レスポンスに変換する。
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 入力値がビジネスルールに違反している場合に使用する。
    ///
    /// # 例
    ///
    /// - タイトルが未設定または空文字列
    /// - 未永続化（id = 0）の Item に対する更新・削除
    /// - 所有者 ID が空文字列
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
