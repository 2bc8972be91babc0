//! Lead and note records.
//!
//! A lead is a mutable row keyed by UUID; the only mutations the system
//! performs are status transitions and note appends. Notes are immutable
//! once written and are only ever added, never edited or removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::LeadStatus;

/// A prospective customer record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
  pub lead_id:         Uuid,
  pub name:            String,
  pub email:           String,
  pub phone:           Option<String>,
  pub company:         Option<String>,
  pub industry:        Option<String>,
  pub location:        Option<String>,
  /// Origin channel, free text (e.g. "Website", "Referral", "csv-import").
  pub source:          String,
  /// Quality score on the canonical 0 to 100 scale.
  pub score:           f64,
  pub estimated_value: Option<f64>,
  pub status:          LeadStatus,
  /// Store-assigned; never changes after creation.
  pub created_at:      DateTime<Utc>,
  /// Stamped by contact-implying status transitions; `None` until then.
  pub last_contact:    Option<DateTime<Utc>>,
}

/// An immutable annotation attached to a lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadNote {
  pub note_id:    Uuid,
  pub lead_id:    Uuid,
  pub content:    String,
  /// Acting identity at creation time; "Unknown" when unresolvable.
  pub author:     String,
  /// Store-assigned; never changes after creation.
  pub created_at: DateTime<Utc>,
}

/// The read model for the detail screen: a lead with its notes attached,
/// newest-first. Never stored, always derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadDetail {
  #[serde(flatten)]
  pub lead:  Lead,
  pub notes: Vec<LeadNote>,
}

/// Input to [`crate::store::LeadStore::add_lead`].
///
/// Identity, timestamps, and status are store-assigned: every lead starts
/// out as [`LeadStatus::New`]. When `score` is absent the store derives one
/// with [`crate::score::quality_score`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewLead {
  pub name:            String,
  pub email:           String,
  pub phone:           Option<String>,
  pub company:         Option<String>,
  pub industry:        Option<String>,
  pub location:        Option<String>,
  pub source:          Option<String>,
  pub score:           Option<f64>,
  pub estimated_value: Option<f64>,
}
