//! The read-only insights report: `GET /insights`.
//!
//! Source distribution, conversion rates, and quality metrics are computed
//! live from the lead collection. Engagement figures come from server
//! configuration; the lead store has nothing to say about page views.

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use fml_core::{
  insights::{EngagementMetrics, InsightsReport, QualityMetrics},
  score::ScoreBand,
  store::LeadStore,
};
use serde::Deserialize;

use crate::{AppState, auth::Identity, error::ApiError};

/// Configured engagement figures, served verbatim in the report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngagementConfig {
  #[serde(default)]
  pub average_time_spent: f64,
  #[serde(default)]
  pub average_page_views: f64,
  #[serde(default)]
  pub monthly_visits:     u64,
}

/// `GET /insights`
pub async fn handler<S>(
  _identity: Identity,
  State(state): State<AppState<S>>,
) -> Result<Json<InsightsReport>, ApiError>
where
  S: LeadStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let leads = state
    .store
    .list_leads()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let mut by_source: BTreeMap<String, u64> = BTreeMap::new();
  let mut converted_by_source: BTreeMap<String, u64> = BTreeMap::new();
  let mut by_band: BTreeMap<String, u64> = BTreeMap::new();
  let mut by_decile: BTreeMap<String, u64> = BTreeMap::new();

  for lead in &leads {
    *by_source.entry(lead.source.clone()).or_default() += 1;
    if lead.status.is_converted() {
      *converted_by_source.entry(lead.source.clone()).or_default() += 1;
    }
    let band = ScoreBand::from_score(lead.score);
    *by_band.entry(band.label().to_owned()).or_default() += 1;
    *by_decile.entry(decile_label(lead.score).to_owned()).or_default() += 1;
  }

  let conversion_rates = by_source
    .iter()
    .map(|(source, total)| {
      let converted = converted_by_source.get(source).copied().unwrap_or(0);
      (source.clone(), converted as f64 / *total as f64)
    })
    .collect();

  let engagement = &state.engagement;
  let mut total_visits = BTreeMap::new();
  total_visits.insert("Last 30 days".to_owned(), engagement.monthly_visits);

  Ok(Json(InsightsReport {
    lead_source_distribution: by_source,
    conversion_rates,
    engagement_metrics: EngagementMetrics {
      average_time_spent: engagement.average_time_spent,
      average_page_views: engagement.average_page_views,
      total_visits,
    },
    quality_metrics: QualityMetrics {
      lead_quality_distribution:  by_band,
      profile_score_distribution: by_decile,
    },
  }))
}

/// Decile bucket label for a 0 to 100 score; 100 folds into the top bucket.
fn decile_label(score: f64) -> &'static str {
  match score {
    s if s < 10.0 => "0-9",
    s if s < 20.0 => "10-19",
    s if s < 30.0 => "20-29",
    s if s < 40.0 => "30-39",
    s if s < 50.0 => "40-49",
    s if s < 60.0 => "50-59",
    s if s < 70.0 => "60-69",
    s if s < 80.0 => "70-79",
    s if s < 90.0 => "80-89",
    _ => "90-100",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decile_edges() {
    assert_eq!(decile_label(0.0), "0-9");
    assert_eq!(decile_label(9.99), "0-9");
    assert_eq!(decile_label(10.0), "10-19");
    assert_eq!(decile_label(89.9), "80-89");
    assert_eq!(decile_label(90.0), "90-100");
    assert_eq!(decile_label(100.0), "90-100");
  }
}
