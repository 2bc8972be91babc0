//! CSV lead ingestion: `POST /leads/upload-csv`.
//!
//! Accepts a multipart body with a single `file` field. The file must be
//! UTF-8 CSV with a header row carrying at least `name` and `email`
//! columns; any malformed row rejects the whole upload, so a file is either
//! ingested completely or not at all.

use axum::{
  Json,
  extract::{Multipart, State},
};
use fml_core::{lead::NewLead, store::LeadStore};
use serde::Serialize;

use crate::{AppState, auth::Identity, error::ApiError};

const REQUIRED_COLUMNS: &[&str] = &["name", "email"];

const OPTIONAL_COLUMNS: &[&str] =
  &["phone", "company", "industry", "location", "estimated_value"];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
  pub imported: usize,
}

/// `POST /leads/upload-csv`
pub async fn handler<S>(
  _identity: Identity,
  State(state): State<AppState<S>>,
  mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError>
where
  S: LeadStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  // Find the `file` part; everything else in the body is ignored.
  let mut file_bytes = None;
  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::Validation(format!("malformed multipart body: {e}")))?
  {
    if field.name() == Some("file") {
      let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::Validation(format!("unreadable file field: {e}")))?;
      file_bytes = Some(bytes);
      break;
    }
  }

  let bytes =
    file_bytes.ok_or_else(|| ApiError::Validation("missing file field".into()))?;
  let text = std::str::from_utf8(&bytes)
    .map_err(|_| ApiError::Validation("file is not valid UTF-8".into()))?;

  let rows = parse_leads_csv(text).map_err(ApiError::Validation)?;

  let imported = rows.len();
  for row in rows {
    state
      .store
      .add_lead(row)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
  }

  tracing::info!(imported, "csv upload ingested");
  Ok(Json(UploadResponse { imported }))
}

// ─── CSV parsing ─────────────────────────────────────────────────────────────

/// Parse the whole file into `NewLead` rows, or fail with a message naming
/// the first problem found.
fn parse_leads_csv(text: &str) -> Result<Vec<NewLead>, String> {
  let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

  let (_, header_line) = lines.next().ok_or("empty file")?;
  let header: Vec<String> = split_csv_line(header_line)
    .into_iter()
    .map(|c| c.trim().to_lowercase())
    .collect();

  for required in REQUIRED_COLUMNS {
    if !header.iter().any(|c| c.as_str() == *required) {
      return Err(format!("missing required column: {required}"));
    }
  }

  let col = |name: &str| header.iter().position(|c| c.as_str() == name);
  let get = |fields: &[String], idx: Option<usize>| -> Option<String> {
    idx
      .and_then(|i| fields.get(i))
      .map(|v| v.trim().to_owned())
      .filter(|v| !v.is_empty())
  };

  // Resolve column positions once; OPTIONAL_COLUMNS documents the accepted
  // header beyond the required pair.
  let name_idx     = col("name");
  let email_idx    = col("email");
  let phone_idx    = col(OPTIONAL_COLUMNS[0]);
  let company_idx  = col(OPTIONAL_COLUMNS[1]);
  let industry_idx = col(OPTIONAL_COLUMNS[2]);
  let location_idx = col(OPTIONAL_COLUMNS[3]);
  let value_idx    = col(OPTIONAL_COLUMNS[4]);

  let mut rows = Vec::new();
  for (line_no, line) in lines {
    let fields = split_csv_line(line);
    if fields.len() > header.len() {
      return Err(format!("row {}: too many fields", line_no + 1));
    }

    let name = get(&fields, name_idx)
      .ok_or_else(|| format!("row {}: missing name", line_no + 1))?;
    let email = get(&fields, email_idx)
      .ok_or_else(|| format!("row {}: missing email", line_no + 1))?;

    let estimated_value = get(&fields, value_idx)
      .map(|v| {
        v.parse::<f64>()
          .map_err(|_| format!("row {}: bad estimated_value {v:?}", line_no + 1))
      })
      .transpose()?;
    if let Some(v) = estimated_value
      && v < 0.0
    {
      return Err(format!("row {}: negative estimated_value", line_no + 1));
    }

    rows.push(NewLead {
      name,
      email,
      phone: get(&fields, phone_idx),
      company: get(&fields, company_idx),
      industry: get(&fields, industry_idx),
      location: get(&fields, location_idx),
      source: Some("csv-import".to_owned()),
      score: None,
      estimated_value,
    });
  }

  Ok(rows)
}

/// Split one CSV line into fields. Double-quoted fields may contain commas
/// and escaped quotes (`""`).
fn split_csv_line(line: &str) -> Vec<String> {
  let mut fields = Vec::new();
  let mut current = String::new();
  let mut in_quotes = false;
  let mut chars = line.chars().peekable();

  while let Some(c) = chars.next() {
    match c {
      '"' if in_quotes && chars.peek() == Some(&'"') => {
        current.push('"');
        chars.next();
      }
      '"' => in_quotes = !in_quotes,
      ',' if !in_quotes => {
        fields.push(std::mem::take(&mut current));
      }
      _ => current.push(c),
    }
  }
  fields.push(current);
  fields
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn splits_plain_fields() {
    assert_eq!(split_csv_line("a,b,c"), vec!["a", "b", "c"]);
    assert_eq!(split_csv_line("a,,c"), vec!["a", "", "c"]);
  }

  #[test]
  fn splits_quoted_fields() {
    assert_eq!(
      split_csv_line(r#""Smith, Jane",jane@example.com"#),
      vec!["Smith, Jane", "jane@example.com"]
    );
    assert_eq!(split_csv_line(r#""say ""hi""""#), vec![r#"say "hi""#]);
  }

  #[test]
  fn parses_rows_with_optional_columns() {
    let csv = "name,email,company,estimated_value\n\
               Alice,alice@example.com,Acme,5000\n\
               Bob,bob@example.com,,\n";
    let rows = parse_leads_csv(csv).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Alice");
    assert_eq!(rows[0].estimated_value, Some(5000.0));
    assert_eq!(rows[0].source.as_deref(), Some("csv-import"));
    assert_eq!(rows[1].company, None);
    assert_eq!(rows[1].estimated_value, None);
  }

  #[test]
  fn rejects_missing_required_column() {
    let err = parse_leads_csv("name,phone\nAlice,555-1234\n").unwrap_err();
    assert!(err.contains("email"), "{err}");
  }

  #[test]
  fn rejects_malformed_rows() {
    assert!(parse_leads_csv("name,email\nAlice,\n").is_err());
    assert!(
      parse_leads_csv("name,email,estimated_value\nA,a@b.com,lots\n").is_err()
    );
    assert!(
      parse_leads_csv("name,email,estimated_value\nA,a@b.com,-1\n").is_err()
    );
    assert!(parse_leads_csv("").is_err());
  }
}
