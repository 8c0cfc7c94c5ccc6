//! # ユースケース層
//!
//! ビジネスルールの検証・存在確認・リポジトリ呼び出しをオーケストレーション
//! する。ハンドラは薄く保ち、操作のロジックはこの層に集約する。

pub mod item;

pub use item::{CreateItemInput, ItemUseCaseImpl, UpdateItemInput};
