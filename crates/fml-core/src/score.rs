//! Lead quality scoring and score bands.
//!
//! Scores live on a single canonical 0 to 100 scale. The band boundaries are
//! fixed at 80 and 60; every finite score falls in exactly one band.

use serde::{Deserialize, Serialize};

// ─── Bands ───────────────────────────────────────────────────────────────────

/// Quality band of a lead score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
  High,
  Medium,
  Low,
}

impl ScoreBand {
  /// Band for a 0 to 100 score. `>= 80` is high, `>= 60` is medium,
  /// everything below (including NaN and negatives) is low.
  pub fn from_score(score: f64) -> Self {
    if score >= 80.0 {
      Self::High
    } else if score >= 60.0 {
      Self::Medium
    } else {
      Self::Low
    }
  }

  /// Colour class for the band badge.
  pub fn color(self) -> BandColor {
    match self {
      Self::High => BandColor::Green,
      Self::Medium => BandColor::Yellow,
      Self::Low => BandColor::Red,
    }
  }

  /// Display label used in the quality distribution report.
  pub fn label(self) -> &'static str {
    match self {
      Self::High => "High",
      Self::Medium => "Medium",
      Self::Low => "Low",
    }
  }
}

/// Colour class for a score badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandColor {
  Green,
  Yellow,
  Red,
}

// ─── Scoring ─────────────────────────────────────────────────────────────────

const BUSINESS_TLDS: &[&str] = &["com", "org", "net", "io", "co"];

const TECH_TERMS: &[&str] = &[
  "tech",
  "solutions",
  "digital",
  "software",
  "innovations",
  "systems",
];

/// Score a lead from its intake fields.
///
/// Weights: email 30 (+10 business TLD), company 30 (+10 tech-flavoured
/// name), name 20. The result is clamped to [0, 100].
pub fn quality_score(name: &str, email: &str, company: Option<&str>) -> f64 {
  let mut score: f64 = 0.0;

  let email = email.trim().to_lowercase();
  if !email.is_empty() {
    score += 30.0;
    if BUSINESS_TLDS.iter().any(|tld| email.ends_with(&format!(".{tld}"))) {
      score += 10.0;
    }
  }

  let company = company.unwrap_or("").trim().to_lowercase();
  if !company.is_empty() {
    score += 30.0;
    if TECH_TERMS.iter().any(|term| company.contains(term)) {
      score += 10.0;
    }
  }

  if !name.trim().is_empty() {
    score += 20.0;
  }

  score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn band_anchors() {
    assert_eq!(ScoreBand::from_score(85.0), ScoreBand::High);
    assert_eq!(ScoreBand::from_score(65.0), ScoreBand::Medium);
    assert_eq!(ScoreBand::from_score(40.0), ScoreBand::Low);
  }

  #[test]
  fn band_boundaries_are_inclusive_below() {
    assert_eq!(ScoreBand::from_score(80.0), ScoreBand::High);
    assert_eq!(ScoreBand::from_score(79.999), ScoreBand::Medium);
    assert_eq!(ScoreBand::from_score(60.0), ScoreBand::Medium);
    assert_eq!(ScoreBand::from_score(59.999), ScoreBand::Low);
  }

  #[test]
  fn band_is_total_over_odd_inputs() {
    assert_eq!(ScoreBand::from_score(f64::NAN), ScoreBand::Low);
    assert_eq!(ScoreBand::from_score(-3.0), ScoreBand::Low);
    assert_eq!(ScoreBand::from_score(1000.0), ScoreBand::High);
  }

  #[test]
  fn band_colors() {
    assert_eq!(ScoreBand::High.color(), BandColor::Green);
    assert_eq!(ScoreBand::Medium.color(), BandColor::Yellow);
    assert_eq!(ScoreBand::Low.color(), BandColor::Red);
  }

  #[test]
  fn full_profile_scores_high() {
    let s = quality_score("Ada Lovelace", "ada@analytical.io", Some("Analytical Engines Tech"));
    assert_eq!(s, 100.0);
    assert_eq!(ScoreBand::from_score(s), ScoreBand::High);
  }

  #[test]
  fn email_only_scores_low() {
    let s = quality_score("", "lead@example.com", None);
    assert_eq!(s, 40.0);
    assert_eq!(ScoreBand::from_score(s), ScoreBand::Low);
  }

  #[test]
  fn empty_profile_scores_zero() {
    assert_eq!(quality_score("", "", None), 0.0);
    assert_eq!(quality_score("  ", " ", Some("  ")), 0.0);
  }

  #[test]
  fn non_business_tld_gets_no_bonus() {
    let with = quality_score("A", "a@b.com", None);
    let without = quality_score("A", "a@b.xyz", None);
    assert_eq!(with - without, 10.0);
  }
}
