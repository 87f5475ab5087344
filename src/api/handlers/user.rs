/*
 * Responsibility
 * - /user 系 handler
 * - /user/shop/status は gate の除外対象 (AuthCtx を要求しない)
 */
use axum::Json;
use serde::Serialize;

use crate::api::extractors::AuthCtxExtractor;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct ShopStatusResponse {
    // 1: open, 0: closed
    pub status: u8,
}

pub async fn current_user(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse { user_id: ctx.id })
}

pub async fn shop_status() -> Json<ShopStatusResponse> {
    Json(ShopStatusResponse { status: 1 })
}
