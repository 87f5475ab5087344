//! Authentication gate: token header → JwtCodec → IdentityStore in extensions.
//!
//! One gate implementation serves both realms; the `AuthPolicy` it is
//! installed with decides the header, secret, identity claim and exemptions.
//!
//! Every request gets its own `IdentityStore`. It travels inside the request
//! and is dropped with it, including when a timeout cancels the handler.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::{HeaderMap, Request},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::{AuthCtx, IdentityStore};
use crate::error::AppError;
use crate::services::auth::{AuthPolicy, TokenError, jwt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("missing token header")]
    MissingHeader,
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Terminal state of one gate check.
#[derive(Debug)]
pub enum GateDecision {
    /// Forward to the handler. The store is empty for exempt paths.
    Passed(IdentityStore),
    Rejected(GateError),
}

/// Guard every route of `router` with `policy`.
///
/// Installed as a route layer: requests that match no route are not
/// intercepted and fall through to the fallback.
pub fn apply<S>(router: Router<S>, policy: Arc<AuthPolicy>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(policy, gate_middleware))
}

/// Run the gate state machine for a single request.
pub fn authenticate(policy: &AuthPolicy, path: &str, headers: &HeaderMap) -> GateDecision {
    if !policy.routes.requires_auth(path) {
        tracing::debug!(realm = %policy.realm, path, "exempt path");
        return GateDecision::Passed(IdentityStore::new());
    }

    match verify(policy, headers) {
        Ok(ctx) => {
            tracing::info!(realm = %ctx.realm, id = ctx.id, path, "token accepted");
            let mut store = IdentityStore::new();
            store.set(ctx);
            GateDecision::Passed(store)
        }
        Err(err) => {
            tracing::warn!(realm = %policy.realm, path, error = %err, "token rejected");
            GateDecision::Rejected(err)
        }
    }
}

fn verify(policy: &AuthPolicy, headers: &HeaderMap) -> Result<AuthCtx, GateError> {
    let value = headers
        .get(&policy.token_header)
        .ok_or(GateError::MissingHeader)?;

    // Non-visible-ASCII bytes cannot be part of a compact JWT.
    let token = value.to_str().map_err(|_| TokenError::Malformed)?.trim();
    if token.is_empty() {
        return Err(GateError::MissingHeader);
    }

    tracing::debug!(realm = %policy.realm, "verifying token");
    let claims = policy.codec.decode(token)?;
    let id = jwt::identity_claim(&claims, policy.identity_claim())?;

    Ok(AuthCtx::new(policy.realm, id))
}

async fn gate_middleware(
    State(policy): State<Arc<AuthPolicy>>,
    OriginalUri(original_uri): OriginalUri,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    match authenticate(&policy, original_uri.path(), req.headers()) {
        GateDecision::Passed(store) => {
            let authenticated = store.is_set();

            // gate → extractor への受け渡し
            req.extensions_mut().insert(store);
            let resp = next.run(req).await;

            // The handler consumed the request, and the store went with it.
            tracing::debug!(realm = %policy.realm, authenticated, "request finished");
            Ok(resp)
        }
        GateDecision::Rejected(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderName, HeaderValue};
    use serde_json::json;

    use crate::api::extractors::Realm;
    use crate::api::extractors::auth_ctx::NotAuthenticated;
    use crate::config::JwtGroup;
    use crate::services::auth::jwt::Claims;

    use super::*;

    fn group(secret: &str, header: &'static str) -> JwtGroup {
        JwtGroup {
            secret_key: secret.to_string(),
            token_name: HeaderName::from_static(header),
            ttl_seconds: 7200,
        }
    }

    fn admin_policy() -> AuthPolicy {
        AuthPolicy::admin(&group("itcast", "token"), 0)
    }

    fn user_policy() -> AuthPolicy {
        AuthPolicy::user(&group("itheima", "authentication"), 0)
    }

    fn sign(policy: &AuthPolicy, payload: serde_json::Value) -> String {
        let claims: Claims = serde_json::from_value(payload).unwrap();
        policy.codec.encode(claims).unwrap()
    }

    fn headers(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn passed(decision: GateDecision) -> IdentityStore {
        match decision {
            GateDecision::Passed(store) => store,
            GateDecision::Rejected(err) => panic!("expected Passed, got Rejected({err})"),
        }
    }

    fn rejected(decision: GateDecision) -> GateError {
        match decision {
            GateDecision::Rejected(err) => err,
            GateDecision::Passed(_) => panic!("expected Rejected"),
        }
    }

    #[test]
    fn valid_admin_token_passes_with_identity() {
        let policy = admin_policy();
        let token = sign(&policy, json!({ "empId": 1 }));

        let store = passed(authenticate(&policy, "/admin/orders", &headers("token", &token)));
        assert_eq!(store.get(), Ok(AuthCtx::new(Realm::Admin, 1)));
    }

    #[test]
    fn missing_header_is_rejected() {
        let policy = admin_policy();
        let err = rejected(authenticate(&policy, "/admin/orders", &HeaderMap::new()));
        assert_eq!(err, GateError::MissingHeader);
    }

    #[test]
    fn empty_header_is_missing() {
        let policy = admin_policy();
        let err = rejected(authenticate(&policy, "/admin/orders", &headers("token", "  ")));
        assert_eq!(err, GateError::MissingHeader);
    }

    #[test]
    fn login_path_passes_without_identity() {
        let policy = admin_policy();
        let store = passed(authenticate(&policy, "/admin/employee/login", &HeaderMap::new()));
        assert_eq!(store.get(), Err(NotAuthenticated));
    }

    #[test]
    fn shop_status_is_public_for_users() {
        let policy = user_policy();
        let store = passed(authenticate(&policy, "/user/shop/status", &HeaderMap::new()));
        assert!(!store.is_set());
    }

    #[test]
    fn token_failures_are_rejected_with_kind() {
        let policy = admin_policy();
        let other = AuthPolicy::admin(&group("not-itcast", "token"), 0);

        let foreign = sign(&other, json!({ "empId": 1 }));
        let err = rejected(authenticate(&policy, "/admin/orders", &headers("token", &foreign)));
        assert_eq!(err, GateError::Token(TokenError::InvalidSignature));

        let expired = sign(
            &policy,
            json!({ "empId": 1, "exp": chrono::Utc::now().timestamp() - 60 }),
        );
        let err = rejected(authenticate(&policy, "/admin/orders", &headers("token", &expired)));
        assert_eq!(err, GateError::Token(TokenError::Expired));

        let err = rejected(authenticate(&policy, "/admin/orders", &headers("token", "garbage")));
        assert_eq!(err, GateError::Token(TokenError::Malformed));
    }

    #[test]
    fn token_without_identity_claim_is_malformed() {
        let policy = admin_policy();
        // A user-realm claim name does not satisfy the admin gate.
        let token = sign(&policy, json!({ "userId": 1 }));
        let err = rejected(authenticate(&policy, "/admin/orders", &headers("token", &token)));
        assert_eq!(err, GateError::Token(TokenError::Malformed));
    }

    #[test]
    fn token_under_wrong_header_is_missing() {
        let policy = user_policy();
        let token = sign(&policy, json!({ "userId": 5 }));
        let err = rejected(authenticate(&policy, "/user/user/current", &headers("token", &token)));
        assert_eq!(err, GateError::MissingHeader);

        let store = passed(authenticate(
            &policy,
            "/user/user/current",
            &headers("authentication", &token),
        ));
        assert_eq!(store.get(), Ok(AuthCtx::new(Realm::User, 5)));
    }

    #[test]
    fn string_identity_claim_is_accepted() {
        let policy = admin_policy();
        let token = sign(&policy, json!({ "empId": "12" }));
        let store = passed(authenticate(&policy, "/admin/orders", &headers("token", &token)));
        assert_eq!(store.get().map(|c| c.id), Ok(12));
    }

    #[test]
    fn back_to_back_checks_do_not_share_identity() {
        let policy = admin_policy();
        let token = sign(&policy, json!({ "empId": 1 }));

        let first = passed(authenticate(&policy, "/admin/orders", &headers("token", &token)));
        assert!(first.is_set());
        drop(first);

        let second = passed(authenticate(&policy, "/admin/employee/login", &HeaderMap::new()));
        assert_eq!(second.get(), Err(NotAuthenticated));
    }
}
