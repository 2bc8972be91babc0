//! The `LeadStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `fml-store-sqlite`).
//! Higher layers (`fml-api`, `fml-cli`) depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  lead::{Lead, LeadDetail, LeadNote, NewLead},
  status::LeadStatus,
};

/// Abstraction over a lead store backend.
///
/// Leads are mutated only through [`set_status`](Self::set_status); notes
/// are append-only. Each write touches a single record; implementations
/// must make that one write atomic, but no cross-record transaction is ever
/// required.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait LeadStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Create and persist a new lead. The store assigns `lead_id` and
  /// `created_at`, sets status to `New`, and scores the lead if the input
  /// carries no score.
  fn add_lead(
    &self,
    input: NewLead,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + '_;

  /// Overwrite the status of an existing lead; every other field is left
  /// untouched except `last_contact`, which is stamped when the new status
  /// implies contact. Returns the updated lead.
  fn set_status(
    &self,
    id: Uuid,
    status: LeadStatus,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + '_;

  /// Create a note against an existing lead and return it with its assigned
  /// id and timestamp. Fails if the lead does not exist or the content is
  /// empty.
  fn append_note(
    &self,
    lead_id: Uuid,
    content: String,
    author: String,
  ) -> impl Future<Output = Result<LeadNote, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve a lead by id, without notes. Returns `None` if not found.
  fn get_lead(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Lead>, Self::Error>> + Send + '_;

  /// Retrieve a lead with all its notes attached, newest-first. Returns
  /// `None` if not found.
  fn get_detail(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<LeadDetail>, Self::Error>> + Send + '_;

  /// List the full lead collection. No pagination: callers hold the
  /// collection and sort/filter locally.
  fn list_leads(
    &self,
  ) -> impl Future<Output = Result<Vec<Lead>, Self::Error>> + Send + '_;
}
