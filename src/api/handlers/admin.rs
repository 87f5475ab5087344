/*
 * Responsibility
 * - /admin 系 handler
 * - 認証済みの employee id は AuthCtxExtractor 経由でのみ受け取る
 */
use axum::Json;
use serde::Serialize;

use crate::api::extractors::AuthCtxExtractor;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentEmployeeResponse {
    pub emp_id: i64,
}

#[derive(Debug, Serialize)]
pub struct OrderPageResponse {
    pub operator: i64,
    pub total: u64,
    pub records: Vec<serde_json::Value>,
}

pub async fn current_employee(
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Json<CurrentEmployeeResponse> {
    Json(CurrentEmployeeResponse { emp_id: ctx.id })
}

// Order storage is not wired in yet; the page is always empty.
pub async fn list_orders(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<OrderPageResponse> {
    Json(OrderPageResponse {
        operator: ctx.id,
        total: 0,
        records: Vec::new(),
    })
}
