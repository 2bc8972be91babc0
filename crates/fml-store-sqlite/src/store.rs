//! [`SqliteStore`], the SQLite implementation of [`LeadStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use fml_core::{
  lead::{Lead, LeadDetail, LeadNote, NewLead},
  score::quality_score,
  status::LeadStatus,
  store::LeadStore,
};

use crate::{
  Error, Result,
  encode::{RawLead, RawNote, encode_dt, encode_status, encode_uuid},
  schema::SCHEMA,
};

const LEAD_COLUMNS: &str = "lead_id, name, email, phone, company, industry, \
   location, source, score, estimated_value, status, created_at, last_contact";

fn lead_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawLead> {
  Ok(RawLead {
    lead_id:         row.get(0)?,
    name:            row.get(1)?,
    email:           row.get(2)?,
    phone:           row.get(3)?,
    company:         row.get(4)?,
    industry:        row.get(5)?,
    location:        row.get(6)?,
    source:          row.get(7)?,
    score:           row.get(8)?,
    estimated_value: row.get(9)?,
    status:          row.get(10)?,
    created_at:      row.get(11)?,
    last_contact:    row.get(12)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A lead store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Whether a lead row exists for `id`.
  async fn lead_exists(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let exists: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM leads WHERE lead_id = ?1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  /// Fetch a lead or fail with [`Error::LeadNotFound`].
  async fn fetch_lead(&self, id: Uuid) -> Result<Lead> {
    self.get_lead(id).await?.ok_or(Error::LeadNotFound(id))
  }
}

// ─── LeadStore impl ──────────────────────────────────────────────────────────

impl LeadStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn add_lead(&self, input: NewLead) -> Result<Lead> {
    if let Some(v) = input.estimated_value
      && v < 0.0
    {
      return Err(Error::Core(fml_core::Error::NegativeValue(v)));
    }

    let score = input.score.unwrap_or_else(|| {
      quality_score(&input.name, &input.email, input.company.as_deref())
    });

    let lead = Lead {
      lead_id:         Uuid::new_v4(),
      name:            input.name,
      email:           input.email,
      phone:           input.phone,
      company:         input.company,
      industry:        input.industry,
      location:        input.location,
      source:          input.source.unwrap_or_else(|| "Manual".to_owned()),
      score,
      estimated_value: input.estimated_value,
      status:          LeadStatus::New,
      created_at:      Utc::now(),
      last_contact:    None,
    };

    let id_str     = encode_uuid(lead.lead_id);
    let source     = lead.source.clone();
    let status_str = encode_status(lead.status);
    let at_str     = encode_dt(lead.created_at);
    let name       = lead.name.clone();
    let email      = lead.email.clone();
    let phone      = lead.phone.clone();
    let company    = lead.company.clone();
    let industry   = lead.industry.clone();
    let location   = lead.location.clone();
    let value      = lead.estimated_value;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO leads (
             lead_id, name, email, phone, company, industry, location,
             source, score, estimated_value, status, created_at, last_contact
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, NULL)",
          rusqlite::params![
            id_str, name, email, phone, company, industry, location, source,
            score, value, status_str, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(lead)
  }

  async fn set_status(&self, id: Uuid, status: LeadStatus) -> Result<Lead> {
    let id_str     = encode_uuid(id);
    let status_str = encode_status(status);
    let contact_at = status.implies_contact().then(|| encode_dt(Utc::now()));

    // One UPDATE touching one row; last_contact moves only when the new
    // stage implies an interaction.
    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE leads
           SET status = ?2,
               last_contact = COALESCE(?3, last_contact)
           WHERE lead_id = ?1",
          rusqlite::params![id_str, status_str, contact_at],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::LeadNotFound(id));
    }
    self.fetch_lead(id).await
  }

  async fn append_note(
    &self,
    lead_id: Uuid,
    content: String,
    author:  String,
  ) -> Result<LeadNote> {
    if content.trim().is_empty() {
      return Err(Error::EmptyNoteContent);
    }
    if !self.lead_exists(lead_id).await? {
      return Err(Error::LeadNotFound(lead_id));
    }

    let note = LeadNote {
      note_id:    Uuid::new_v4(),
      lead_id,
      content,
      author,
      created_at: Utc::now(),
    };

    let note_id_str = encode_uuid(note.note_id);
    let lead_id_str = encode_uuid(lead_id);
    let content     = note.content.clone();
    let author      = note.author.clone();
    let at_str      = encode_dt(note.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO lead_notes (note_id, lead_id, content, author, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![note_id_str, lead_id_str, content, author, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(note)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_lead(&self, id: Uuid) -> Result<Option<Lead>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawLead> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE lead_id = ?1"),
              rusqlite::params![id_str],
              lead_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawLead::into_lead).transpose()
  }

  async fn get_detail(&self, id: Uuid) -> Result<Option<LeadDetail>> {
    let lead = match self.get_lead(id).await? {
      Some(l) => l,
      None => return Ok(None),
    };

    let lead_id_str = encode_uuid(id);
    let raws: Vec<RawNote> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT note_id, lead_id, content, author, created_at
           FROM lead_notes
           WHERE lead_id = ?1
           ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![lead_id_str], |row| {
            Ok(RawNote {
              note_id:    row.get(0)?,
              lead_id:    row.get(1)?,
              content:    row.get(2)?,
              author:     row.get(3)?,
              created_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let notes = raws
      .into_iter()
      .map(RawNote::into_note)
      .collect::<Result<Vec<_>>>()?;

    Ok(Some(LeadDetail { lead, notes }))
  }

  async fn list_leads(&self) -> Result<Vec<Lead>> {
    let raws: Vec<RawLead> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {LEAD_COLUMNS} FROM leads ORDER BY created_at DESC"
        ))?;
        let rows = stmt
          .query_map([], lead_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLead::into_lead).collect()
  }
}
