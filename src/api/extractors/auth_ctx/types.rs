/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - gate が検証して request extensions に IdentityStore を格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは middleware/services 側の責務
 * - IdentityStore は 1 request に 1 つ。request と一緒に drop される
 */

use std::fmt;

/// Which side of the platform authenticated the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Realm {
    Admin,
    User,
}

impl Realm {
    /// Claim that carries the principal id in this realm's tokens.
    pub fn identity_claim(self) -> &'static str {
        match self {
            Self::Admin => "empId",
            Self::User => "userId",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `id` は employee id (admin) または user id (user)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthCtx {
    pub realm: Realm,
    pub id: i64,
}

impl AuthCtx {
    pub fn new(realm: Realm, id: i64) -> Self {
        Self { realm, id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no identity was set for this request")]
pub struct NotAuthenticated;

/// Identity holder for exactly one request.
///
/// Created empty by the gate, filled on successful verification, and dropped
/// with the request, so nothing survives into the next request on the same worker.
#[derive(Debug, Clone, Default)]
pub struct IdentityStore {
    identity: Option<AuthCtx>,
}

impl IdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, identity: AuthCtx) {
        self.identity = Some(identity);
    }

    /// Missing identity is an error, never an anonymous guest.
    pub fn get(&self) -> Result<AuthCtx, NotAuthenticated> {
        self.identity.ok_or(NotAuthenticated)
    }

    // No-op when already empty. Requests never call this: the store is released
    // by dropping the request that owns it.
    #[allow(dead_code)]
    pub fn clear(&mut self) {
        self.identity = None;
    }

    pub fn is_set(&self) -> bool {
        self.identity.is_some()
    }
}
