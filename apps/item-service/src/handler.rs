//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ビジネスロジックはユースケース層に委譲

pub mod health;
pub mod item;

pub use health::{health_check, ping};
pub use item::{
   ItemState,
   create_item,
   delete_item,
   get_item,
   list_items,
   list_items_by_user,
   update_item,
};
