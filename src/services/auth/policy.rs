//! Per-realm authentication settings consumed by the gate.

use axum::http::HeaderName;

use crate::api::extractors::Realm;
use crate::config::JwtGroup;
use crate::middleware::auth::route_policy::RoutePolicy;
use crate::services::auth::jwt::JwtCodec;

/// Immutable after startup; shared behind `Arc` in `AppState`.
#[derive(Debug, Clone)]
pub struct AuthPolicy {
    pub realm: Realm,
    pub token_header: HeaderName,
    pub routes: RoutePolicy,
    pub codec: JwtCodec,
}

impl AuthPolicy {
    pub fn new(realm: Realm, group: &JwtGroup, leeway_seconds: u64, routes: RoutePolicy) -> Self {
        Self {
            realm,
            token_header: group.token_name.clone(),
            routes,
            codec: JwtCodec::new(&group.secret_key, leeway_seconds),
        }
    }

    /// `/admin/**` minus the login endpoint.
    pub fn admin(group: &JwtGroup, leeway_seconds: u64) -> Self {
        let routes = RoutePolicy::new()
            .include("/admin/**")
            .exclude("/admin/employee/login");
        Self::new(Realm::Admin, group, leeway_seconds, routes)
    }

    /// `/user/**` minus login and the public shop status.
    pub fn user(group: &JwtGroup, leeway_seconds: u64) -> Self {
        let routes = RoutePolicy::new()
            .include("/user/**")
            .exclude("/user/user/login")
            .exclude("/user/shop/status");
        Self::new(Realm::User, group, leeway_seconds, routes)
    }

    pub fn identity_claim(&self) -> &'static str {
        self.realm.identity_claim()
    }
}
