//! Integration tests for `SqliteStore` against an in-memory database.

use fml_core::{lead::NewLead, status::LeadStatus, store::LeadStore};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn sample_lead(name: &str, email: &str) -> NewLead {
  NewLead {
    name: name.into(),
    email: email.into(),
    company: Some("Acme Inc.".into()),
    source: Some("Website".into()),
    score: Some(85.0),
    estimated_value: Some(10_000.0),
    ..Default::default()
  }
}

// ─── Leads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_lead() {
  let s = store().await;

  let lead = s.add_lead(sample_lead("Alice", "alice@example.com")).await.unwrap();
  assert_eq!(lead.status, LeadStatus::New);
  assert_eq!(lead.score, 85.0);
  assert!(lead.last_contact.is_none());

  let fetched = s.get_lead(lead.lead_id).await.unwrap().unwrap();
  assert_eq!(fetched.lead_id, lead.lead_id);
  assert_eq!(fetched.name, "Alice");
  assert_eq!(fetched.email, "alice@example.com");
  assert_eq!(fetched.company.as_deref(), Some("Acme Inc."));
  assert_eq!(fetched.estimated_value, Some(10_000.0));
}

#[tokio::test]
async fn get_lead_missing_returns_none() {
  let s = store().await;
  assert!(s.get_lead(Uuid::new_v4()).await.unwrap().is_none());
  assert!(s.get_detail(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn add_lead_without_score_derives_one() {
  let s = store().await;

  let lead = s
    .add_lead(NewLead {
      name: "Bob".into(),
      email: "bob@corp.com".into(),
      company: Some("Corp Software".into()),
      ..Default::default()
    })
    .await
    .unwrap();

  // name 20 + email 30+10 + company 30+10
  assert_eq!(lead.score, 100.0);
  assert_eq!(lead.source, "Manual");
}

#[tokio::test]
async fn add_lead_rejects_negative_value() {
  let s = store().await;

  let err = s
    .add_lead(NewLead {
      name: "Eve".into(),
      email: "eve@example.com".into(),
      estimated_value: Some(-5.0),
      ..Default::default()
    })
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    crate::Error::Core(fml_core::Error::NegativeValue(_))
  ));
}

#[tokio::test]
async fn list_leads_returns_all() {
  let s = store().await;
  s.add_lead(sample_lead("A", "a@example.com")).await.unwrap();
  s.add_lead(sample_lead("B", "b@example.com")).await.unwrap();
  s.add_lead(sample_lead("C", "c@example.com")).await.unwrap();

  let all = s.list_leads().await.unwrap();
  assert_eq!(all.len(), 3);
}

// ─── Status transitions ──────────────────────────────────────────────────────

#[tokio::test]
async fn set_status_changes_only_status() {
  let s = store().await;
  let lead = s.add_lead(sample_lead("Alice", "alice@example.com")).await.unwrap();

  let updated = s.set_status(lead.lead_id, LeadStatus::Qualified).await.unwrap();
  assert_eq!(updated.status, LeadStatus::Qualified);

  // Every other field is untouched. Qualified does not imply contact.
  assert_eq!(updated.name, lead.name);
  assert_eq!(updated.email, lead.email);
  assert_eq!(updated.company, lead.company);
  assert_eq!(updated.score, lead.score);
  assert_eq!(updated.estimated_value, lead.estimated_value);
  assert_eq!(updated.created_at, lead.created_at);
  assert_eq!(updated.last_contact, None);
}

#[tokio::test]
async fn contact_implying_status_stamps_last_contact() {
  let s = store().await;
  let lead = s.add_lead(sample_lead("Alice", "alice@example.com")).await.unwrap();

  let updated = s.set_status(lead.lead_id, LeadStatus::Contacted).await.unwrap();
  assert_eq!(updated.status, LeadStatus::Contacted);
  assert!(updated.last_contact.is_some());

  // A later non-contact transition keeps the stamp.
  let stamp = updated.last_contact;
  let updated = s.set_status(lead.lead_id, LeadStatus::Lost).await.unwrap();
  assert_eq!(updated.last_contact, stamp);
}

#[tokio::test]
async fn set_status_missing_lead_errors() {
  let s = store().await;
  let err = s.set_status(Uuid::new_v4(), LeadStatus::Closed).await.unwrap_err();
  assert!(matches!(err, crate::Error::LeadNotFound(_)));
}

// ─── Notes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn append_note_and_read_back_newest_first() {
  let s = store().await;
  let lead = s.add_lead(sample_lead("Alice", "alice@example.com")).await.unwrap();

  let first = s
    .append_note(lead.lead_id, "Initial call went well".into(), "sales-1".into())
    .await
    .unwrap();
  let second = s
    .append_note(lead.lead_id, "Follow-up scheduled".into(), "sales-2".into())
    .await
    .unwrap();

  let detail = s.get_detail(lead.lead_id).await.unwrap().unwrap();
  assert_eq!(detail.notes.len(), 2);
  // Newest-first: the most recent append is at index 0.
  assert_eq!(detail.notes[0].note_id, second.note_id);
  assert_eq!(detail.notes[0].content, "Follow-up scheduled");
  assert_eq!(detail.notes[0].author, "sales-2");
  assert_eq!(detail.notes[1].note_id, first.note_id);
}

#[tokio::test]
async fn append_empty_note_errors_and_leaves_notes_unchanged() {
  let s = store().await;
  let lead = s.add_lead(sample_lead("Alice", "alice@example.com")).await.unwrap();
  s.append_note(lead.lead_id, "kept".into(), "sales-1".into())
    .await
    .unwrap();

  for content in ["", "   ", "\n\t"] {
    let err = s
      .append_note(lead.lead_id, content.into(), "sales-1".into())
      .await
      .unwrap_err();
    assert!(matches!(err, crate::Error::EmptyNoteContent));
  }

  let detail = s.get_detail(lead.lead_id).await.unwrap().unwrap();
  assert_eq!(detail.notes.len(), 1);
}

#[tokio::test]
async fn append_note_missing_lead_errors() {
  let s = store().await;
  let err = s
    .append_note(Uuid::new_v4(), "hello".into(), "sales-1".into())
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::LeadNotFound(_)));
}

#[tokio::test]
async fn notes_do_not_leak_across_leads() {
  let s = store().await;
  let a = s.add_lead(sample_lead("A", "a@example.com")).await.unwrap();
  let b = s.add_lead(sample_lead("B", "b@example.com")).await.unwrap();

  s.append_note(a.lead_id, "about A".into(), "sales-1".into()).await.unwrap();

  let detail_b = s.get_detail(b.lead_id).await.unwrap().unwrap();
  assert!(detail_b.notes.is_empty());
}
