//! JSON REST boundary for FollowMyLead.
//!
//! Exposes an axum [`Router`] backed by any [`LeadStore`]. The service owns
//! input validation, the closed status vocabulary check, bearer-token auth,
//! and the mapping of every failure onto the four client-visible error
//! kinds; storage errors never reach the wire verbatim.

pub mod auth;
pub mod error;
pub mod insights;
pub mod leads;
pub mod upload;

pub use error::ApiError;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use fml_core::store::LeadStore;

use auth::{AuthConfig, SessionStore};
use insights::EngagementConfig;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: LeadStore> {
  pub store:      Arc<S>,
  pub auth:       Arc<AuthConfig>,
  pub sessions:   Arc<SessionStore>,
  pub engagement: Arc<EngagementConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router. All routes live under `/api`; everything except
/// `/api/auth/login` requires a bearer token.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: LeadStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let api = Router::new()
    .route("/auth/login", post(auth::login::<S>))
    .route("/leads", get(leads::list::<S>).post(leads::create::<S>))
    .route("/leads/upload-csv", post(upload::handler::<S>))
    .route("/leads/{id}", get(leads::get_one::<S>))
    .route(
      "/leads/{id}/status",
      put(leads::set_status::<S>).patch(leads::set_status::<S>),
    )
    .route("/leads/{id}/notes", post(leads::add_note::<S>))
    .route("/insights", get(insights::handler::<S>))
    .with_state(state);

  Router::new().nest("/api", api)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::Duration;
  use fml_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  const PASSWORD: &str = "secret";

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let salt  = SaltString::generate(&mut OsRng);
    let hash  = Argon2::default()
      .hash_password(PASSWORD.as_bytes(), &salt)
      .unwrap()
      .to_string();

    AppState {
      store:    Arc::new(store),
      auth:     Arc::new(AuthConfig {
        username:      "sales".to_string(),
        password_hash: hash,
        token_ttl:     Duration::hours(24),
      }),
      sessions: Arc::new(SessionStore::default()),
      engagement: Arc::new(EngagementConfig {
        average_time_spent: 300.0,
        average_page_views: 4.5,
        monthly_visits:     1500,
      }),
    }
  }

  async fn oneshot_json(
    state:  AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    token:  Option<&str>,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = if let Some(v) = body {
      builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap()
    } else {
      builder.body(Body::empty()).unwrap()
    };

    let resp   = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes  = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn login(state: &AppState<SqliteStore>) -> String {
    let (status, body) = oneshot_json(
      state.clone(),
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "username": "sales", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
  }

  async fn seed_lead(
    state: &AppState<SqliteStore>,
    token: &str,
    name:  &str,
    score: f64,
  ) -> String {
    let (status, body) = oneshot_json(
      state.clone(),
      "POST",
      "/api/leads",
      Some(token),
      Some(json!({
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "company": "Acme Inc.",
        "source": "Website",
        "score": score,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["lead_id"].as_str().unwrap().to_string()
  }

  // ── Auth ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn login_with_wrong_password_returns_401() {
    let state = make_state().await;
    let (status, body) = oneshot_json(
      state,
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "username": "sales", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
  }

  #[tokio::test]
  async fn requests_without_bearer_return_401() {
    let state = make_state().await;
    let (status, _) =
      oneshot_json(state.clone(), "GET", "/api/leads", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = oneshot_json(
      state,
      "POST",
      "/api/leads",
      Some("not-a-real-token"),
      Some(json!({ "name": "X", "email": "x@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn expired_token_returns_401() {
    let state = make_state().await;
    state.sessions.insert_raw(
      "stale",
      auth::Session {
        username:   "sales".into(),
        expires_at: chrono::Utc::now() - Duration::minutes(1),
      },
    );

    let (status, _) =
      oneshot_json(state, "GET", "/api/leads", Some("stale"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  // ── Leads CRUD ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_and_list_leads() {
    let state = make_state().await;
    let token = login(&state).await;

    seed_lead(&state, &token, "Alice", 85.0).await;
    seed_lead(&state, &token, "Bob", 65.0).await;

    let (status, body) =
      oneshot_json(state, "GET", "/api/leads", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let leads = body.as_array().unwrap();
    assert_eq!(leads.len(), 2);
    assert!(leads.iter().all(|l| l["status"] == "new"));
  }

  #[tokio::test]
  async fn get_missing_lead_returns_404() {
    let state = make_state().await;
    let token = login(&state).await;

    let (status, body) = oneshot_json(
      state,
      "GET",
      &format!("/api/leads/{}", uuid::Uuid::new_v4()),
      Some(&token),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
  }

  #[tokio::test]
  async fn create_rejects_blank_name_and_negative_value() {
    let state = make_state().await;
    let token = login(&state).await;

    let (status, _) = oneshot_json(
      state.clone(),
      "POST",
      "/api/leads",
      Some(&token),
      Some(json!({ "name": "  ", "email": "x@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = oneshot_json(
      state,
      "POST",
      "/api/leads",
      Some(&token),
      Some(json!({
        "name": "X", "email": "x@example.com", "estimated_value": -10.0
      })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── Status transitions ───────────────────────────────────────────────────

  #[tokio::test]
  async fn patch_status_updates_and_returns_lead() {
    let state = make_state().await;
    let token = login(&state).await;
    let id    = seed_lead(&state, &token, "Alice", 85.0).await;

    let (status, body) = oneshot_json(
      state.clone(),
      "PATCH",
      &format!("/api/leads/{id}/status"),
      Some(&token),
      Some(json!({ "status": "qualified" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "qualified");

    // PUT is accepted as an alias.
    let (status, body) = oneshot_json(
      state,
      "PUT",
      &format!("/api/leads/{id}/status"),
      Some(&token),
      Some(json!({ "status": "contacted" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "contacted");
    assert!(!body["last_contact"].is_null());
  }

  #[tokio::test]
  async fn bogus_status_returns_400_and_leaves_status_unchanged() {
    let state = make_state().await;
    let token = login(&state).await;
    let id    = seed_lead(&state, &token, "Alice", 85.0).await;

    let (status, body) = oneshot_json(
      state.clone(),
      "PATCH",
      &format!("/api/leads/{id}/status"),
      Some(&token),
      Some(json!({ "status": "bogus" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("bogus"));

    let (status, body) = oneshot_json(
      state,
      "GET",
      &format!("/api/leads/{id}"),
      Some(&token),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "new");
  }

  #[tokio::test]
  async fn status_on_missing_lead_returns_404() {
    let state = make_state().await;
    let token = login(&state).await;

    let (status, _) = oneshot_json(
      state,
      "PATCH",
      &format!("/api/leads/{}/status", uuid::Uuid::new_v4()),
      Some(&token),
      Some(json!({ "status": "qualified" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Notes ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn posted_note_gets_server_identity_and_leads_subsequent_get() {
    let state = make_state().await;
    let token = login(&state).await;
    let id    = seed_lead(&state, &token, "Alice", 85.0).await;

    let (status, note) = oneshot_json(
      state.clone(),
      "POST",
      &format!("/api/leads/{id}/notes"),
      Some(&token),
      Some(json!({ "content": "Follow-up scheduled" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(note["content"], "Follow-up scheduled");
    assert_eq!(note["author"], "sales");
    assert!(note["note_id"].as_str().is_some());
    assert!(note["created_at"].as_str().is_some());

    let (status, detail) = oneshot_json(
      state,
      "GET",
      &format!("/api/leads/{id}"),
      Some(&token),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let notes = detail["notes"].as_array().unwrap();
    assert_eq!(notes[0]["note_id"], note["note_id"]);
  }

  #[tokio::test]
  async fn empty_note_returns_400_and_adds_nothing() {
    let state = make_state().await;
    let token = login(&state).await;
    let id    = seed_lead(&state, &token, "Alice", 85.0).await;

    let (status, _) = oneshot_json(
      state.clone(),
      "POST",
      &format!("/api/leads/{id}/notes"),
      Some(&token),
      Some(json!({ "content": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, detail) = oneshot_json(
      state,
      "GET",
      &format!("/api/leads/{id}"),
      Some(&token),
      None,
    )
    .await;
    assert_eq!(detail["notes"].as_array().unwrap().len(), 0);
  }

  // ── CSV upload ───────────────────────────────────────────────────────────

  const BOUNDARY: &str = "fml-test-boundary";

  fn multipart_csv(csv: &str) -> Body {
    Body::from(format!(
      "--{BOUNDARY}\r\n\
       Content-Disposition: form-data; name=\"file\"; filename=\"leads.csv\"\r\n\
       Content-Type: text/csv\r\n\r\n\
       {csv}\r\n\
       --{BOUNDARY}--\r\n"
    ))
  }

  async fn oneshot_upload(
    state: AppState<SqliteStore>,
    token: &str,
    csv:   &str,
  ) -> (StatusCode, Value) {
    let req = Request::builder()
      .method("POST")
      .uri("/api/leads/upload-csv")
      .header(header::AUTHORIZATION, format!("Bearer {token}"))
      .header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
      )
      .body(multipart_csv(csv))
      .unwrap();

    let resp   = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes  = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[tokio::test]
  async fn csv_upload_ingests_rows() {
    let state = make_state().await;
    let token = login(&state).await;

    let csv = "name,email,company\n\
               Alice,alice@example.com,Acme Tech\n\
               Bob,bob@example.com,Globex\n";
    let (status, body) = oneshot_upload(state.clone(), &token, csv).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imported"], 2);

    let (_, leads) =
      oneshot_json(state, "GET", "/api/leads", Some(&token), None).await;
    let leads = leads.as_array().unwrap();
    assert_eq!(leads.len(), 2);
    assert!(leads.iter().all(|l| l["source"] == "csv-import"));
  }

  #[tokio::test]
  async fn csv_upload_rejects_bad_header_and_bad_rows() {
    let state = make_state().await;
    let token = login(&state).await;

    // Header missing `email`.
    let (status, _) =
      oneshot_upload(state.clone(), &token, "name,phone\nAlice,555\n").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Malformed row rejects the whole file: nothing is ingested.
    let csv = "name,email\nAlice,alice@example.com\nBob,\n";
    let (status, _) = oneshot_upload(state.clone(), &token, csv).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, leads) =
      oneshot_json(state, "GET", "/api/leads", Some(&token), None).await;
    assert_eq!(leads.as_array().unwrap().len(), 0);
  }

  // ── Insights ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn insights_aggregates_sources_bands_and_conversions() {
    let state = make_state().await;
    let token = login(&state).await;

    let high = seed_lead(&state, &token, "Alice", 85.0).await;
    seed_lead(&state, &token, "Bob", 65.0).await;
    seed_lead(&state, &token, "Carol", 40.0).await;

    // Convert one of the three.
    oneshot_json(
      state.clone(),
      "PATCH",
      &format!("/api/leads/{high}/status"),
      Some(&token),
      Some(json!({ "status": "closed" })),
    )
    .await;

    let (status, report) =
      oneshot_json(state, "GET", "/api/insights", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(report["leadSourceDistribution"]["Website"], 3);
    let rate = report["conversionRates"]["Website"].as_f64().unwrap();
    assert!((rate - 1.0 / 3.0).abs() < 1e-9);

    let quality = &report["qualityMetrics"]["leadQualityDistribution"];
    assert_eq!(quality["High"], 1);
    assert_eq!(quality["Medium"], 1);
    assert_eq!(quality["Low"], 1);

    assert_eq!(report["engagementMetrics"]["averagePageViews"], 4.5);
    assert_eq!(
      report["engagementMetrics"]["totalVisits"]["Last 30 days"],
      1500
    );
  }
}
