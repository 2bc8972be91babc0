//! Dashboard sorting and filtering.
//!
//! The visible view is always recomputed from the full collection: the
//! dashboard holds every lead in memory, so a pure recompute is cheap and
//! trivially deterministic. Numeric fields compare numerically with a
//! NaN-safe total order; everything else compares as case-normalized
//! strings.

use std::cmp::Ordering;

use fml_core::lead::Lead;

// ─── Fields ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
  Name,
  Email,
  Company,
  Status,
  Source,
  Score,
  EstimatedValue,
  CreatedAt,
}

/// Dashboard column order; the 1-9 hotkeys index into this.
pub const SORT_FIELDS: &[SortField] = &[
  SortField::Name,
  SortField::Email,
  SortField::Company,
  SortField::Status,
  SortField::Source,
  SortField::Score,
  SortField::EstimatedValue,
  SortField::CreatedAt,
];

impl SortField {
  pub fn label(self) -> &'static str {
    match self {
      Self::Name => "name",
      Self::Email => "email",
      Self::Company => "company",
      Self::Status => "status",
      Self::Source => "source",
      Self::Score => "score",
      Self::EstimatedValue => "value",
      Self::CreatedAt => "created",
    }
  }

  fn compare(self, a: &Lead, b: &Lead) -> Ordering {
    match self {
      Self::Name => str_key(&a.name).cmp(&str_key(&b.name)),
      Self::Email => str_key(&a.email).cmp(&str_key(&b.email)),
      Self::Company => {
        opt_str_key(a.company.as_deref()).cmp(&opt_str_key(b.company.as_deref()))
      }
      Self::Status => {
        str_key(a.status.as_ref()).cmp(&str_key(b.status.as_ref()))
      }
      Self::Source => str_key(&a.source).cmp(&str_key(&b.source)),
      Self::Score => a.score.total_cmp(&b.score),
      Self::EstimatedValue => match (a.estimated_value, b.estimated_value) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
      },
      Self::CreatedAt => a.created_at.cmp(&b.created_at),
    }
  }
}

fn str_key(s: &str) -> String { s.to_lowercase() }

fn opt_str_key(s: Option<&str>) -> String {
  s.map(str_key).unwrap_or_default()
}

// ─── Direction and state ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
  Ascending,
  Descending,
}

impl SortDirection {
  pub fn toggled(self) -> Self {
    match self {
      Self::Ascending => Self::Descending,
      Self::Descending => Self::Ascending,
    }
  }

  pub fn arrow(self) -> &'static str {
    match self {
      Self::Ascending => "^",
      Self::Descending => "v",
    }
  }
}

/// The dashboard's current sort selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
  pub field:     SortField,
  pub direction: SortDirection,
}

impl Default for SortState {
  fn default() -> Self {
    Self {
      field:     SortField::CreatedAt,
      direction: SortDirection::Descending,
    }
  }
}

impl SortState {
  /// Re-selecting the active field toggles direction; a new field resets to
  /// descending.
  pub fn select(&mut self, field: SortField) {
    if self.field == field {
      self.direction = self.direction.toggled();
    } else {
      self.field = field;
      self.direction = SortDirection::Descending;
    }
  }
}

// ─── View computation ────────────────────────────────────────────────────────

/// Case-insensitive substring match over name, email, and company.
pub fn matches_filter(lead: &Lead, query: &str) -> bool {
  if query.is_empty() {
    return true;
  }
  let q = query.to_lowercase();
  lead.name.to_lowercase().contains(&q)
    || lead.email.to_lowercase().contains(&q)
    || lead
      .company
      .as_deref()
      .is_some_and(|c| c.to_lowercase().contains(&q))
}

/// The filtered, sorted view of the full collection, recomputed from
/// scratch on every call.
pub fn visible_leads(leads: &[Lead], filter: &str, sort: SortState) -> Vec<Lead> {
  let mut view: Vec<Lead> = leads
    .iter()
    .filter(|l| matches_filter(l, filter))
    .cloned()
    .collect();

  view.sort_by(|a, b| {
    let ord = sort.field.compare(a, b);
    match sort.direction {
      SortDirection::Ascending => ord,
      SortDirection::Descending => ord.reverse(),
    }
  });

  view
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use fml_core::status::LeadStatus;
  use uuid::Uuid;

  use super::*;

  fn lead(name: &str, email: &str, company: Option<&str>, score: f64) -> Lead {
    Lead {
      lead_id:         Uuid::new_v4(),
      name:            name.into(),
      email:           email.into(),
      phone:           None,
      company:         company.map(Into::into),
      industry:        None,
      location:        None,
      source:          "Website".into(),
      score,
      estimated_value: None,
      status:          LeadStatus::New,
      created_at:      Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
      last_contact:    None,
    }
  }

  fn names(view: &[Lead]) -> Vec<&str> {
    view.iter().map(|l| l.name.as_str()).collect()
  }

  #[test]
  fn name_sort_is_case_normalized() {
    let leads = vec![
      lead("bob", "b@x.com", None, 10.0),
      lead("Alice", "a@x.com", None, 20.0),
      lead("carol", "c@x.com", None, 30.0),
    ];
    let sort = SortState {
      field:     SortField::Name,
      direction: SortDirection::Ascending,
    };
    assert_eq!(names(&visible_leads(&leads, "", sort)), vec!["Alice", "bob", "carol"]);
  }

  #[test]
  fn score_sorts_numerically_not_lexically() {
    let leads = vec![
      lead("A", "a@x.com", None, 9.0),
      lead("B", "b@x.com", None, 85.0),
      lead("C", "c@x.com", None, 100.0),
    ];
    let sort = SortState {
      field:     SortField::Score,
      direction: SortDirection::Descending,
    };
    // Lexically "9" > "85" > "100"; numerically the reverse.
    assert_eq!(names(&visible_leads(&leads, "", sort)), vec!["C", "B", "A"]);
  }

  #[test]
  fn nan_scores_do_not_break_the_order() {
    let leads = vec![
      lead("A", "a@x.com", None, f64::NAN),
      lead("B", "b@x.com", None, 50.0),
    ];
    let sort = SortState {
      field:     SortField::Score,
      direction: SortDirection::Ascending,
    };
    // total_cmp gives NaN a fixed place; the call must not panic.
    assert_eq!(visible_leads(&leads, "", sort).len(), 2);
  }

  #[test]
  fn missing_values_sort_below_present_ones() {
    let mut with = lead("A", "a@x.com", None, 0.0);
    with.estimated_value = Some(100.0);
    let without = lead("B", "b@x.com", None, 0.0);

    let sort = SortState {
      field:     SortField::EstimatedValue,
      direction: SortDirection::Descending,
    };
    assert_eq!(
      names(&visible_leads(&[without, with], "", sort)),
      vec!["A", "B"]
    );
  }

  #[test]
  fn reselecting_field_toggles_direction() {
    let mut sort = SortState::default();
    assert_eq!(sort.field, SortField::CreatedAt);
    assert_eq!(sort.direction, SortDirection::Descending);

    sort.select(SortField::Score);
    assert_eq!(sort.field, SortField::Score);
    assert_eq!(sort.direction, SortDirection::Descending);

    sort.select(SortField::Score);
    assert_eq!(sort.direction, SortDirection::Ascending);

    sort.select(SortField::Score);
    assert_eq!(sort.direction, SortDirection::Descending);

    // A new field resets to descending.
    sort.select(SortField::Name);
    assert_eq!(sort.direction, SortDirection::Descending);
  }

  #[test]
  fn filter_matches_name_email_and_company() {
    let leads = vec![
      lead("Alice", "alice@acme.com", Some("Acme Inc."), 1.0),
      lead("Bob", "bob@globex.com", Some("Globex"), 2.0),
    ];

    let sort = SortState::default();
    assert_eq!(names(&visible_leads(&leads, "ALICE", sort)), vec!["Alice"]);
    assert_eq!(names(&visible_leads(&leads, "globex.com", sort)), vec!["Bob"]);
    assert_eq!(names(&visible_leads(&leads, "acme", sort)), vec!["Alice"]);
    assert!(visible_leads(&leads, "zzz", sort).is_empty());
    assert_eq!(visible_leads(&leads, "", sort).len(), 2);
  }

  #[test]
  fn recompute_is_deterministic() {
    let leads = vec![
      lead("Alice", "a@x.com", None, 10.0),
      lead("Bob", "b@x.com", None, 20.0),
    ];
    let sort = SortState {
      field:     SortField::Score,
      direction: SortDirection::Ascending,
    };
    let once_view = visible_leads(&leads, "", sort);
    let twice_view = visible_leads(&leads, "", sort);
    let once = names(&once_view);
    let twice = names(&twice_view);
    assert_eq!(once, twice);
  }
}
