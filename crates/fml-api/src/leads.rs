//! Handlers for `/leads` endpoints.
//!
//! | Method      | Path                 | Notes |
//! |-------------|----------------------|-------|
//! | `GET`       | `/leads`             | Full collection, bare array |
//! | `POST`      | `/leads`             | Body: `NewLead` fields |
//! | `GET`       | `/leads/:id`         | Lead with notes, 404 if not found |
//! | `PUT\|PATCH`| `/leads/:id/status`  | Body: `{"status":"qualified"}` |
//! | `POST`      | `/leads/:id/notes`   | Body: `{"content":"…"}` |

use std::str::FromStr;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use fml_core::{
  lead::{Lead, LeadDetail, NewLead},
  status::LeadStatus,
  store::LeadStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Identity, error::ApiError};

fn store_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> ApiError {
  ApiError::Store(Box::new(e))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /leads`
pub async fn list<S>(
  _identity: Identity,
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Lead>>, ApiError>
where
  S: LeadStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let leads = state.store.list_leads().await.map_err(store_err)?;
  Ok(Json(leads))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /leads/:id`
pub async fn get_one<S>(
  _identity: Identity,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<LeadDetail>, ApiError>
where
  S: LeadStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let detail = state
    .store
    .get_detail(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("lead {id} not found")))?;
  Ok(Json(detail))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /leads`
pub async fn create<S>(
  _identity: Identity,
  State(state): State<AppState<S>>,
  Json(body): Json<NewLead>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeadStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.name.trim().is_empty() {
    return Err(ApiError::Validation("name must not be empty".into()));
  }
  if body.email.trim().is_empty() {
    return Err(ApiError::Validation("email must not be empty".into()));
  }
  if let Some(v) = body.estimated_value
    && v < 0.0
  {
    return Err(ApiError::Validation(format!(
      "estimated_value must be non-negative, got {v}"
    )));
  }

  let lead = state.store.add_lead(body).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(lead)))
}

// ─── Status ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: String,
}

/// `PUT|PATCH /leads/:id/status` — body: `{"status":"qualified"}`
///
/// The status string is parsed against the closed vocabulary here, before
/// the store is touched, so an unknown status can never reach a row.
pub async fn set_status<S>(
  _identity: Identity,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Lead>, ApiError>
where
  S: LeadStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let status = LeadStatus::from_str(&body.status).map_err(|_| {
    ApiError::Validation(format!("unknown status: {:?}", body.status))
  })?;

  // Existence first, so a missing lead is a 404 rather than an opaque
  // store error.
  state
    .store
    .get_lead(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("lead {id} not found")))?;

  let updated = state.store.set_status(id, status).await.map_err(store_err)?;
  tracing::debug!(lead = %id, status = %status, "status updated");
  Ok(Json(updated))
}

// ─── Notes ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NoteBody {
  pub content: String,
}

/// `POST /leads/:id/notes` — body: `{"content":"…"}`
pub async fn add_note<S>(
  identity: Identity,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NoteBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeadStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.content.trim().is_empty() {
    return Err(ApiError::Validation("note content must not be empty".into()));
  }

  state
    .store
    .get_lead(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("lead {id} not found")))?;

  let note = state
    .store
    .append_note(id, body.content, identity.author_label())
    .await
    .map_err(store_err)?;

  Ok((StatusCode::CREATED, Json(note)))
}
