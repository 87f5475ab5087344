use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use super::{AuthCtx, IdentityStore};

/// Handler で、 AuthCtx を受け取るための extractor
/// gate が IdentityStore を request.extensions() に insert 済みである前提
/// 見つからない場合は gate を通っていない (ルート設定ミス) ので 500 を返す
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let store = parts.extensions.get::<IdentityStore>();

        match store.map(IdentityStore::get) {
            Some(Ok(ctx)) => Ok(AuthCtxExtractor(ctx)),
            Some(Err(err)) => {
                tracing::error!(error = %err, path = %parts.uri.path(), "handler requires identity on an exempt route");
                Err(AppError::Internal)
            }
            None => {
                tracing::error!(path = %parts.uri.path(), "handler reached without authentication gate");
                Err(AppError::Internal)
            }
        }
    }
}
