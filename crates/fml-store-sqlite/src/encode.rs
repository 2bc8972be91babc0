//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Statuses are stored as
//! their lowercase discriminant. UUIDs are stored as hyphenated lowercase
//! strings.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use fml_core::{
  lead::{Lead, LeadNote},
  status::LeadStatus,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── LeadStatus ───────────────────────────────────────────────────────────────

pub fn encode_status(status: LeadStatus) -> String {
  status.as_ref().to_owned()
}

pub fn decode_status(s: &str) -> Result<LeadStatus> {
  LeadStatus::from_str(s)
    .map_err(|_| Error::Core(fml_core::Error::UnknownStatus(s.to_owned())))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `leads` row.
pub struct RawLead {
  pub lead_id:         String,
  pub name:            String,
  pub email:           String,
  pub phone:           Option<String>,
  pub company:         Option<String>,
  pub industry:        Option<String>,
  pub location:        Option<String>,
  pub source:          String,
  pub score:           f64,
  pub estimated_value: Option<f64>,
  pub status:          String,
  pub created_at:      String,
  pub last_contact:    Option<String>,
}

impl RawLead {
  pub fn into_lead(self) -> Result<Lead> {
    Ok(Lead {
      lead_id:         decode_uuid(&self.lead_id)?,
      name:            self.name,
      email:           self.email,
      phone:           self.phone,
      company:         self.company,
      industry:        self.industry,
      location:        self.location,
      source:          self.source,
      score:           self.score,
      estimated_value: self.estimated_value,
      status:          decode_status(&self.status)?,
      created_at:      decode_dt(&self.created_at)?,
      last_contact:    self
        .last_contact
        .as_deref()
        .map(decode_dt)
        .transpose()?,
    })
  }
}

/// Raw strings read directly from a `lead_notes` row.
pub struct RawNote {
  pub note_id:    String,
  pub lead_id:    String,
  pub content:    String,
  pub author:     String,
  pub created_at: String,
}

impl RawNote {
  pub fn into_note(self) -> Result<LeadNote> {
    Ok(LeadNote {
      note_id:    decode_uuid(&self.note_id)?,
      lead_id:    decode_uuid(&self.lead_id)?,
      content:    self.content,
      author:     self.author,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
