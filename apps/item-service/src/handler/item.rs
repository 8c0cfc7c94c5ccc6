//! # Item ハンドラ
//!
//! Item CRUD の HTTP API を提供する。
//!
//! ## エンドポイント
//!
//! - `POST   /items` - Item 作成
//! - `GET    /items` - Item 一覧
//! - `GET    /items/{id}` - Item 取得
//! - `PUT    /items/{id}` - Item 更新（全置換）
//! - `DELETE /items/{id}` - Item 削除
//! - `GET    /items/user/{user_id}` - 所有者別の Item 一覧
//!
//! ## 識別子の規則
//!
//! パスパラメータの識別子は 10 進整数としてパースでき、かつ正の値で
//! なければならない。違反はストレージに触れる前に 400 で弾く。

use std::sync::Arc;

use axum::{
   Json,
   extract::{Path, State},
   http::StatusCode,
   response::IntoResponse,
};
use chrono::{DateTime, Utc};
use itemflow_domain::item::{Item, ItemId, UserId};
use serde::{Deserialize, Serialize};

use crate::{
   error::AppError,
   usecase::{CreateItemInput, ItemUseCaseImpl, UpdateItemInput},
};

/// Item API の共有状態
pub struct ItemState {
   pub usecase: ItemUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// Item 作成リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
   pub title:       Option<String>,
   pub description: Option<String>,
   pub user_id:     String,
}

/// Item 更新リクエスト
///
/// 識別子はパスパラメータで受け取るため、ボディには含めない。
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
   pub title:       Option<String>,
   pub description: Option<String>,
   pub user_id:     String,
}

/// Item DTO
#[derive(Debug, Serialize)]
pub struct ItemDto {
   pub id:          i64,
   pub title:       Option<String>,
   pub description: Option<String>,
   pub user_id:     String,
   pub created_at:  DateTime<Utc>,
   pub updated_at:  DateTime<Utc>,
   pub deleted_at:  Option<DateTime<Utc>>,
}

impl From<Item> for ItemDto {
   fn from(item: Item) -> Self {
      Self {
         id:          item.id().value(),
         title:       item.title().map(str::to_string),
         description: item.description().map(str::to_string),
         user_id:     item.user_id().as_str().to_string(),
         created_at:  item.created_at(),
         updated_at:  item.updated_at(),
         deleted_at:  item.deleted_at(),
      }
   }
}

/// パスパラメータの識別子を検証する
///
/// 正の整数のみ許可。0 以下はストレージに触れる前に 400 で弾く。
fn parse_item_id(raw: i64) -> Result<ItemId, AppError> {
   if raw <= 0 {
      return Err(AppError::BadRequest(
         "識別子は正の整数である必要があります".to_string(),
      ));
   }
   Ok(ItemId::from_i64(raw))
}

// --- ハンドラ ---

/// POST /items
///
/// Item を作成する。
///
/// ## レスポンス
///
/// - `201 Created`: 作成された Item（採番済みの識別子付き）
/// - `400 Bad Request`: ボディ不正、タイトル未設定、所有者 ID 空
pub async fn create_item(
   State(state): State<Arc<ItemState>>,
   Json(req): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, AppError> {
   let input = CreateItemInput {
      title:       req.title,
      description: req.description,
      user_id:     UserId::new(req.user_id)?,
   };

   let item = state.usecase.create(input).await?;

   Ok((StatusCode::CREATED, Json(ItemDto::from(item))))
}

/// GET /items
///
/// 全 Item を取得する。
pub async fn list_items(
   State(state): State<Arc<ItemState>>,
) -> Result<impl IntoResponse, AppError> {
   let items = state.usecase.get_all().await?;

   let dtos: Vec<ItemDto> = items.into_iter().map(ItemDto::from).collect();
   Ok((StatusCode::OK, Json(dtos)))
}

/// GET /items/{id}
///
/// 識別子で Item を取得する。
///
/// ## レスポンス
///
/// - `200 OK`: Item
/// - `400 Bad Request`: 識別子が正の整数でない
/// - `404 Not Found`: Item が存在しない
pub async fn get_item(
   State(state): State<Arc<ItemState>>,
   Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
   let id = parse_item_id(id)?;

   let item = state.usecase.get_by_id(id).await?;

   Ok((StatusCode::OK, Json(ItemDto::from(item))))
}

/// PUT /items/{id}
///
/// Item を更新する（全置換）。
///
/// ## レスポンス
///
/// - `200 OK`: 更新後の Item
/// - `400 Bad Request`: 識別子不正、ボディ不正、タイトル未設定
/// - `404 Not Found`: Item が存在しない（存在確認で検出）
pub async fn update_item(
   State(state): State<Arc<ItemState>>,
   Path(id): Path<i64>,
   Json(req): Json<UpdateItemRequest>,
) -> Result<impl IntoResponse, AppError> {
   let input = UpdateItemInput {
      id:          parse_item_id(id)?,
      title:       req.title,
      description: req.description,
      user_id:     UserId::new(req.user_id)?,
   };

   let item = state.usecase.update(input).await?;

   Ok((StatusCode::OK, Json(ItemDto::from(item))))
}

/// DELETE /items/{id}
///
/// Item を削除する。
///
/// ## レスポンス
///
/// - `204 No Content`: 削除成功（ボディなし）
/// - `400 Bad Request`: 識別子が正の整数でない
/// - `404 Not Found`: Item が存在しない
pub async fn delete_item(
   State(state): State<Arc<ItemState>>,
   Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
   let id = parse_item_id(id)?;

   state.usecase.delete(id).await?;

   Ok(StatusCode::NO_CONTENT)
}

/// GET /items/user/{user_id}
///
/// 所有者別の Item 一覧を取得する。
///
/// ## レスポンス
///
/// - `200 OK`: Item の配列（一致なしは空配列）
/// - `400 Bad Request`: 所有者 ID が空
pub async fn list_items_by_user(
   State(state): State<Arc<ItemState>>,
   Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
   let user_id = UserId::new(user_id)?;

   let items = state.usecase.get_by_user_id(&user_id).await?;

   let dtos: Vec<ItemDto> = items.into_iter().map(ItemDto::from).collect();
   Ok((StatusCode::OK, Json(dtos)))
}
