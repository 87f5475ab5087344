/*
 * Responsibility
 * - URL 構造を定義
 * - /admin 系と /user 系に、それぞれの realm の gate を route_layer で適用する
 */
use axum::{Router, routing::get};

use crate::api::handlers::{
    admin::{current_employee, list_orders},
    health::health,
    user::{current_user, shop_status},
};
use crate::middleware::auth::gate;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/admin/employee/current", get(current_employee))
        .route("/admin/orders", get(list_orders));

    let user = Router::new()
        .route("/user/user/current", get(current_user))
        .route("/user/shop/status", get(shop_status));

    Router::new()
        .route("/health", get(health))
        .merge(gate::apply(admin, state.admin.clone()))
        .merge(gate::apply(user, state.user.clone()))
}
