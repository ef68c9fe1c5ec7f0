//! Conversions between [`ApplicantRecord`] and the plain columns stored in
//! SQLite.
//!
//! Timestamps are RFC 3339 strings, statuses are their display labels and the
//! profile is compact JSON.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use phreg_core::applicant::{ApplicantId, ApplicantRecord, UserStatus};

use crate::{Error, Result};

/// Column list matching [`RawRecord::from_row`].
pub const COLUMNS: &str =
  "applicant_id, email, status, admin, profile_json, created_at, updated_at";

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn decode_status(s: &str) -> Result<UserStatus> {
  UserStatus::from_str(s).map_err(|_| Error::Status(s.to_owned()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Owned column values for one `applicants` row, ready to cross the
/// connection thread in either direction.
#[derive(Debug, Clone)]
pub struct RawRecord {
  pub applicant_id: String,
  pub email:        String,
  pub status:       String,
  pub admin:        bool,
  pub profile_json: String,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawRecord {
  pub fn encode(record: &ApplicantRecord) -> Result<Self> {
    Ok(Self {
      applicant_id: record.id.as_str().to_owned(),
      email:        record.email_key(),
      status:       record.status.label().to_owned(),
      admin:        record.admin,
      profile_json: serde_json::to_string(&record.profile)?,
      created_at:   encode_dt(record.created_at),
      updated_at:   encode_dt(record.updated_at),
    })
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      applicant_id: row.get(0)?,
      email:        row.get(1)?,
      status:       row.get(2)?,
      admin:        row.get(3)?,
      profile_json: row.get(4)?,
      created_at:   row.get(5)?,
      updated_at:   row.get(6)?,
    })
  }

  pub fn into_record(self) -> Result<ApplicantRecord> {
    Ok(ApplicantRecord {
      id:         ApplicantId(self.applicant_id),
      status:     decode_status(&self.status)?,
      admin:      self.admin,
      profile:    serde_json::from_str(&self.profile_json)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use phreg_core::applicant::Profile;

  use super::*;

  #[test]
  fn encode_lifts_normalised_email() {
    let record = ApplicantRecord::new(
      "u1".into(),
      UserStatus::ConfirmationPending,
      Profile::with_email("  Ada@Example.COM "),
    );
    let raw = RawRecord::encode(&record).unwrap();
    assert_eq!(raw.email, "ada@example.com");
    assert_eq!(raw.status, "Confirmation Pending");

    let back = raw.into_record().unwrap();
    assert_eq!(back.profile.email, "  Ada@Example.COM ");
    assert_eq!(back.status, UserStatus::ConfirmationPending);
  }

  #[test]
  fn unknown_status_column_is_rejected() {
    assert!(matches!(decode_status("Approved"), Err(Error::Status(_))));
  }
}
