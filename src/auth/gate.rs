// src/auth/gate.rs
//
// The admin gate: one fixed credential pair, sessions issued per login.
// Session state lives in the same SQLite file as the listings but in its
// own table; the two stores are logically independent.

use crate::auth::sessions;
use crate::db::connection::Database;
use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "VnRealEstate2024!".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AdminGate {
    credentials: AdminCredentials,
}

impl AdminGate {
    pub fn new(credentials: AdminCredentials) -> Self {
        Self { credentials }
    }

    /// Checks the credential pair and, on match, issues a fresh session
    /// token. `None` means the credentials didn't match.
    pub fn login(
        &self,
        db: &Database,
        username: &str,
        password: &str,
        now: i64,
    ) -> Result<Option<String>, ServerError> {
        if username != self.credentials.username || password != self.credentials.password {
            log::info!("rejected login attempt for username {username:?}");
            return Ok(None);
        }

        let token = db.with_conn(|conn| sessions::create_session(conn, now))?;
        log::info!("admin logged in");
        Ok(Some(token))
    }

    /// Queried before every mutating repository operation.
    pub fn is_authenticated(
        &self,
        db: &Database,
        token: Option<&str>,
        now: i64,
    ) -> Result<bool, ServerError> {
        match token {
            Some(token) => db.with_conn(|conn| sessions::session_is_active(conn, token, now)),
            None => Ok(false),
        }
    }

    pub fn logout(&self, db: &Database, token: &str, now: i64) -> Result<(), ServerError> {
        db.with_conn(|conn| sessions::revoke_session(conn, token, now))
    }
}
