//! # ミドルウェア
//!
//! axum の `from_fn` ベースのミドルウェアを定義する。
//! 相関 ID の採番・伝播は tower-http の `SetRequestIdLayer` /
//! `PropagateRequestIdLayer` が担い、ここにはアプリケーション固有の
//! ミドルウェアのみを置く。

pub mod request_log;

pub use request_log::request_log;
