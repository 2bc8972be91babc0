//! Wire types for the read-only insights report.
//!
//! Field names are camelCase on the wire to match the consumers of the
//! existing insights endpoint. The report is always computed or fetched
//! whole; nothing in this system ever mutates one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregate analytics over the lead collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsReport {
  /// Lead count per source channel.
  pub lead_source_distribution: BTreeMap<String, u64>,
  /// Fraction of leads per source that reached the converted stage.
  pub conversion_rates:         BTreeMap<String, f64>,
  pub engagement_metrics:       EngagementMetrics,
  pub quality_metrics:          QualityMetrics,
}

/// Site-engagement figures. Not derivable from the lead store; the service
/// fills these from configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetrics {
  /// Seconds per visit.
  pub average_time_spent: f64,
  pub average_page_views: f64,
  /// Visit counts keyed by window label, e.g. "Last 30 days".
  pub total_visits:       BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
  /// Lead count per score band label ("High" / "Medium" / "Low").
  pub lead_quality_distribution: BTreeMap<String, u64>,
  /// Lead count per decile bucket label ("0-9" through "90-100").
  pub profile_score_distribution: BTreeMap<String, u64>,
}
