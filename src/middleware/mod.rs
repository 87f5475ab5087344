/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: realm ごとの認証 gate
 * - http: request id / trace / body limit / timeout
 */
pub mod auth;
pub mod http;
