//! Filtering, search and ordering for the admin applicant table.
//!
//! Applied in memory over the full record list; the applicant pool is small.

use std::cmp::Reverse;

use serde::Deserialize;

use crate::applicant::{ApplicantRecord, UserStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
  #[default]
  Name,
  Email,
  Status,
  CreatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  #[default]
  Asc,
  Desc,
}

/// Parameters for [`apply`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectoryQuery {
  /// Case-insensitive substring over name, email and status.
  pub q:                Option<String>,
  /// Restrict to applications awaiting an admission decision.
  pub ready_for_review: bool,
  pub sort:             SortKey,
  pub direction:        SortDirection,
}

fn haystack(r: &ApplicantRecord) -> String {
  format!(
    "{} {} {} {}",
    r.profile.first_name, r.profile.last_name, r.profile.email, r.status
  )
  .to_lowercase()
}

pub fn matches(query: &DirectoryQuery, record: &ApplicantRecord) -> bool {
  if query.ready_for_review && record.status != UserStatus::AdmissionPending {
    return false;
  }
  match query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
    Some(needle) => haystack(record).contains(&needle.to_lowercase()),
    None => true,
  }
}

pub fn apply(records: Vec<ApplicantRecord>, query: &DirectoryQuery) -> Vec<ApplicantRecord> {
  let mut rows: Vec<ApplicantRecord> = records.into_iter().filter(|r| matches(query, r)).collect();

  // Stable in both directions: ties keep their incoming order.
  let desc = query.direction == SortDirection::Desc;
  match (query.sort, desc) {
    (SortKey::Name, false) => rows.sort_by_cached_key(|r| r.profile.full_name().to_lowercase()),
    (SortKey::Name, true) => {
      rows.sort_by_cached_key(|r| Reverse(r.profile.full_name().to_lowercase()))
    }
    (SortKey::Email, false) => rows.sort_by_cached_key(|r| r.email_key()),
    (SortKey::Email, true) => rows.sort_by_cached_key(|r| Reverse(r.email_key())),
    (SortKey::Status, false) => rows.sort_by_key(|r| r.status),
    (SortKey::Status, true) => rows.sort_by_key(|r| Reverse(r.status)),
    (SortKey::CreatedAt, false) => rows.sort_by_key(|r| r.created_at),
    (SortKey::CreatedAt, true) => rows.sort_by_key(|r| Reverse(r.created_at)),
  }
  rows
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, Utc};

  use super::*;
  use crate::applicant::Profile;

  fn record(id: &str, first: &str, last: &str, email: &str, status: UserStatus) -> ApplicantRecord {
    let mut profile = Profile::with_email(email);
    profile.first_name = first.into();
    profile.last_name = last.into();
    ApplicantRecord::new(id.into(), status, profile)
  }

  fn pool() -> Vec<ApplicantRecord> {
    let mut rows = vec![
      record("1", "Grace", "Hopper", "grace@navy.mil", UserStatus::AdmissionPending),
      record("2", "Ada", "Lovelace", "ada@engine.org", UserStatus::Confirmed),
      record("3", "Alan", "Turing", "alan@bletchley.uk", UserStatus::AdmissionPending),
      record("4", "Edsger", "Dijkstra", "ewd@tue.nl", UserStatus::Denied),
    ];
    let base = Utc::now();
    for (i, r) in rows.iter_mut().enumerate() {
      r.created_at = base + Duration::seconds(i as i64);
    }
    rows
  }

  fn ids(rows: &[ApplicantRecord]) -> Vec<&str> { rows.iter().map(|r| r.id.as_str()).collect() }

  #[test]
  fn default_query_sorts_by_name() {
    let rows = apply(pool(), &DirectoryQuery::default());
    assert_eq!(ids(&rows), vec!["2", "3", "4", "1"]);
  }

  #[test]
  fn search_covers_name_email_and_status() {
    let q = |s: &str| DirectoryQuery { q: Some(s.into()), ..Default::default() };
    assert_eq!(ids(&apply(pool(), &q("  TURING "))), vec!["3"]);
    assert_eq!(ids(&apply(pool(), &q("navy.mil"))), vec!["1"]);
    assert_eq!(ids(&apply(pool(), &q("denied"))), vec!["4"]);
    assert_eq!(apply(pool(), &q("   ")).len(), 4);
  }

  #[test]
  fn ready_for_review_only() {
    let query = DirectoryQuery { ready_for_review: true, ..Default::default() };
    assert_eq!(ids(&apply(pool(), &query)), vec!["3", "1"]);
  }

  #[test]
  fn descending_created_at() {
    let query = DirectoryQuery {
      sort: SortKey::CreatedAt,
      direction: SortDirection::Desc,
      ..Default::default()
    };
    assert_eq!(ids(&apply(pool(), &query)), vec!["4", "3", "2", "1"]);
  }

  #[test]
  fn ties_keep_insertion_order_in_both_directions() {
    let tied: Vec<ApplicantRecord> = ["1", "2", "3"]
      .into_iter()
      .map(|id| record(id, "Same", "", &format!("{id}@x.io"), UserStatus::AdmissionPending))
      .collect();

    let asc = DirectoryQuery::default();
    assert_eq!(ids(&apply(tied.clone(), &asc)), vec!["1", "2", "3"]);

    let desc = DirectoryQuery { direction: SortDirection::Desc, ..Default::default() };
    assert_eq!(ids(&apply(tied.clone(), &desc)), vec!["1", "2", "3"]);

    let by_status = DirectoryQuery {
      sort: SortKey::Status,
      direction: SortDirection::Desc,
      ..Default::default()
    };
    assert_eq!(ids(&apply(tied, &by_status)), vec!["1", "2", "3"]);
  }

  #[test]
  fn query_deserialises_from_camel_case() {
    let query: DirectoryQuery =
      serde_json::from_str(r#"{"readyForReview":true,"sort":"createdAt","direction":"desc"}"#).unwrap();
    assert!(query.ready_for_review);
    assert_eq!(query.sort, SortKey::CreatedAt);
    assert_eq!(query.direction, SortDirection::Desc);
  }
}
