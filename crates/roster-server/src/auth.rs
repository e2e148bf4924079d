//! HTTP Basic-auth extractor, standalone verifier, and the admin middleware.
//!
//! The Basic-auth username is the operator's email. A request passes when the
//! password matches the configured argon2 hash *and* the email is on the
//! admin allowlist held by the store.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  body::Body,
  extract::{FromRequestParts, Request, State},
  http::{HeaderMap, request::Parts},
  middleware::Next,
  response::{IntoResponse, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use roster_core::store::RosterStore;

use crate::{AppState, error::Error};

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  /// Operator email.
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Present in a handler means the request was authenticated and the caller
/// is an administrator.
#[derive(Debug, Clone)]
pub struct Authenticated {
  pub email: String,
}

/// Verify credentials directly from headers, returning the email on success.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<String, Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;
  let username = username.trim();

  if !username.eq_ignore_ascii_case(config.username.trim()) {
    return Err(Error::Unauthorized);
  }

  let parsed_hash = PasswordHash::new(&config.password_hash)
    .map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)?;

  Ok(username.to_owned())
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: RosterStore + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let email = verify_auth(&parts.headers, &state.auth)?;
    let allowed = state
      .store
      .is_admin(&email)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    if !allowed {
      tracing::warn!(%email, "rejected sign-in: not on the admin allowlist");
      return Err(Error::Forbidden(email));
    }
    Ok(Authenticated { email })
  }
}

/// Reject any request that does not carry administrator credentials.
///
/// The authenticated identity is stored in the request extensions.
pub async fn require_admin<S>(
  State(state): State<AppState<S>>,
  req: Request<Body>,
  next: Next,
) -> Response
where
  S: RosterStore + 'static,
{
  let (mut parts, body) = req.into_parts();
  let who = match Authenticated::from_request_parts(&mut parts, &state).await {
    Ok(who) => who,
    Err(e) => return e.into_response(),
  };
  tracing::debug!(email = %who.email, "authenticated");

  let mut req = Request::from_parts(parts, body);
  req.extensions_mut().insert(who);
  next.run(req).await
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use argon2::{PasswordHasher, password_hash::SaltString};
  use axum::http::header;
  use rand_core::OsRng;
  use roster_store_sqlite::SqliteStore;

  use super::*;

  async fn make_state(password: &str) -> AppState<SqliteStore> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    let store = SqliteStore::open_in_memory().await.unwrap();
    store.add_admin("admin@example.org").await.unwrap();

    AppState {
      store: Arc::new(store),
      auth:  Arc::new(AuthConfig {
        username:      "admin@example.org".to_string(),
        password_hash: hash,
      }),
    }
  }

  async fn extract(
    req: axum::http::Request<Body>,
    state: &AppState<SqliteStore>,
  ) -> Result<Authenticated, Error> {
    let (mut parts, _) = req.into_parts();
    Authenticated::from_request_parts(&mut parts, state).await
  }

  fn basic(user: &str, pass: &str) -> String {
    let encoded = B64.encode(format!("{user}:{pass}"));
    format!("Basic {encoded}")
  }

  fn request(authorization: Option<&str>) -> axum::http::Request<Body> {
    let mut builder = axum::http::Request::builder();
    if let Some(value) = authorization {
      builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
  }

  #[tokio::test]
  async fn correct_credentials() {
    let state = make_state("secret").await;
    let who = extract(request(Some(&basic("admin@example.org", "secret"))), &state)
      .await
      .unwrap();
    assert_eq!(who.email, "admin@example.org");
  }

  #[tokio::test]
  async fn email_case_does_not_matter() {
    let state = make_state("secret").await;
    let req = request(Some(&basic("Admin@Example.org", "secret")));
    assert!(extract(req, &state).await.is_ok());
  }

  #[tokio::test]
  async fn wrong_password() {
    let state = make_state("secret").await;
    let req = request(Some(&basic("admin@example.org", "wrong")));
    assert!(matches!(extract(req, &state).await, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn missing_header() {
    let state = make_state("secret").await;
    assert!(matches!(extract(request(None), &state).await, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn invalid_base64() {
    let state = make_state("secret").await;
    let req = request(Some("Basic !!!not-base64!!!"));
    assert!(matches!(extract(req, &state).await, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn valid_password_but_not_allowlisted_is_forbidden() {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(b"secret", &salt)
      .unwrap()
      .to_string();
    let state = make_state("unused").await;
    let state = AppState {
      auth: Arc::new(AuthConfig {
        username:      "helper@example.org".to_string(),
        password_hash: hash,
      }),
      ..state
    };

    let req = request(Some(&basic("helper@example.org", "secret")));
    assert!(matches!(
      extract(req, &state).await,
      Err(Error::Forbidden(email)) if email == "helper@example.org"
    ));
  }
}
