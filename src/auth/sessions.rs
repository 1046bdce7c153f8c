// src/auth/sessions.rs
use crate::errors::ServerError;
use base64::Engine;
use rand::{rngs::OsRng, RngCore};
use rusqlite::{params, Connection};
use sha2::{Digest, Sha256};

/// Session lifetime. Tokens are issued per login and expire; the client
/// holds the raw token, the database only ever sees its hash.
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7; // 7 days

pub fn create_session(conn: &Connection, now: i64) -> Result<String, ServerError> {
    // Logins are rare, so this is a cheap moment to drop dead rows and
    // keep the table from growing without bound.
    prune_expired_sessions(conn, now)?;

    let mut raw = [0u8; 32];
    OsRng.fill_bytes(&mut raw);

    let raw_token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(raw);

    let hash = Sha256::digest(raw_token.as_bytes());
    let expires_at = now + SESSION_TTL_SECS;

    conn.execute(
        r#"
        insert into sessions (token_hash, created_at, expires_at)
        values (?, ?, ?)
        "#,
        params![hash.as_slice(), now, expires_at],
    )
    .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;

    Ok(raw_token)
}

/// True when the token maps to a live (unexpired, unrevoked) session.
pub fn session_is_active(
    conn: &Connection,
    raw_token: &str,
    now: i64,
) -> Result<bool, ServerError> {
    let hash = Sha256::digest(raw_token.as_bytes());

    let count: i64 = conn
        .query_row(
            r#"
            select count(*)
            from sessions
            where token_hash = ?
              and expires_at > ?
              and revoked_at is null
            "#,
            params![hash.as_slice(), now],
            |row| row.get(0),
        )
        .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))?;

    Ok(count > 0)
}

/// Deletes sessions past their expiry, revoked or not. Called on every
/// login.
pub fn prune_expired_sessions(conn: &Connection, now: i64) -> Result<usize, ServerError> {
    conn.execute(
        "delete from sessions where expires_at <= ?",
        params![now],
    )
    .map_err(|e| ServerError::DbError(format!("prune sessions failed: {e}")))
}

/// Revokes the session behind a raw token. Revoking an unknown token is
/// a no-op, not an error.
pub fn revoke_session(conn: &Connection, raw_token: &str, now: i64) -> Result<(), ServerError> {
    let hash = Sha256::digest(raw_token.as_bytes());

    conn.execute(
        "update sessions set revoked_at = ? where token_hash = ? and revoked_at is null",
        params![now, hash.as_slice()],
    )
    .map_err(|e| ServerError::DbError(format!("revoke session failed: {e}")))?;

    Ok(())
}
