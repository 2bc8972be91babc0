//! Bearer-token authentication.
//!
//! `POST /auth/login` verifies a username/password pair against an argon2
//! PHC hash and issues an opaque token held in an in-memory session table
//! with a fixed TTL. Every other route extracts [`Identity`] from the
//! `Authorization: Bearer` header; a missing, unknown, or expired token is
//! rejected with 401 before the handler runs.

use std::{
  collections::HashMap,
  sync::Mutex,
};

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{HeaderMap, request::Parts},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use chrono::{DateTime, Duration, Utc};
use fml_core::store::LeadStore;
use rand_core::{OsRng, RngCore as _};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  /// How long an issued token stays valid.
  pub token_ttl:     Duration,
}

// ─── Session table ────────────────────────────────────────────────────────────

/// A live bearer session.
#[derive(Clone)]
pub struct Session {
  pub username:   String,
  pub expires_at: DateTime<Utc>,
}

/// In-memory token table. Tokens are opaque 32-byte values; they are not
/// persisted, so a server restart invalidates every session.
#[derive(Default)]
pub struct SessionStore {
  sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
  /// Issue a fresh token for `username`, valid for `ttl` from now.
  pub fn issue(&self, username: &str, ttl: Duration) -> (String, DateTime<Utc>) {
    let mut raw = [0u8; 32];
    OsRng.fill_bytes(&mut raw);
    let token = B64.encode(raw);

    let expires_at = Utc::now() + ttl;
    self.sessions.lock().unwrap().insert(
      token.clone(),
      Session { username: username.to_owned(), expires_at },
    );
    (token, expires_at)
  }

  /// Resolve a token to its session. Expired tokens are dropped from the
  /// table on the way out.
  pub fn resolve(&self, token: &str) -> Option<Session> {
    let mut sessions = self.sessions.lock().unwrap();
    match sessions.get(token).cloned() {
      Some(s) if s.expires_at > Utc::now() => Some(s),
      Some(_) => {
        sessions.remove(token);
        None
      }
      None => None,
    }
  }

  /// Insert a session directly. Test hook for expiry behaviour.
  #[cfg(test)]
  pub fn insert_raw(&self, token: &str, session: Session) {
    self
      .sessions
      .lock()
      .unwrap()
      .insert(token.to_owned(), session);
  }
}

// ─── Extractor ────────────────────────────────────────────────────────────────

/// The authenticated acting identity, extracted from the bearer token.
pub struct Identity {
  pub username: String,
}

impl Identity {
  /// Author label for note creation. Deliberately permissive: a session
  /// with no resolvable username still gets to write, as "Unknown".
  pub fn author_label(&self) -> String {
    if self.username.trim().is_empty() {
      "Unknown".to_owned()
    } else {
      self.username.clone()
    }
  }
}

/// Verify the bearer header directly. Used by the extractor and by tests.
pub fn verify_bearer(
  headers:  &HeaderMap,
  sessions: &SessionStore,
) -> Result<Identity, ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Auth)?;

  let token = header_val.strip_prefix("Bearer ").ok_or(ApiError::Auth)?;

  let session = sessions.resolve(token).ok_or(ApiError::Auth)?;
  Ok(Identity { username: session.username })
}

impl<S> FromRequestParts<AppState<S>> for Identity
where
  S: LeadStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_bearer(&parts.headers, &state.sessions)
  }
}

// ─── Login handler ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub token:      String,
  pub expires_at: DateTime<Utc>,
}

/// `POST /auth/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: LeadStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.username != state.auth.username {
    return Err(ApiError::Auth);
  }

  let parsed_hash =
    PasswordHash::new(&state.auth.password_hash).map_err(|_| ApiError::Auth)?;

  Argon2::default()
    .verify_password(body.password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Auth)?;

  let (token, expires_at) =
    state.sessions.issue(&body.username, state.auth.token_ttl);

  tracing::info!(username = %body.username, "session issued");
  Ok(Json(LoginResponse { token, expires_at }))
}
