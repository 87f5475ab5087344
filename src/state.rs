/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - admin / user それぞれの AuthPolicy (secret, header 名, 除外パス)
 * - 起動後は read-only。Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::AuthPolicy;

#[derive(Clone, Debug)]
pub struct AppState {
    pub admin: Arc<AuthPolicy>,
    pub user: Arc<AuthPolicy>,
}

impl AppState {
    pub fn new(admin: Arc<AuthPolicy>, user: Arc<AuthPolicy>) -> Self {
        Self { admin, user }
    }

    pub fn from_config(config: &Config) -> Self {
        let leeway = config.jwt_leeway_seconds;
        Self::new(
            Arc::new(AuthPolicy::admin(&config.admin_jwt, leeway)),
            Arc::new(AuthPolicy::user(&config.user_jwt, leeway)),
        )
    }
}
