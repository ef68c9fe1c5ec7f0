//! The applicant record and its canonical profile schema.
//!
//! One [`ApplicantRecord`] exists per identity. The profile is stored as a
//! document; the identity, status and admin flag are the only fields the
//! rest of the system reasons about.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Opaque caller identity, as handed to us by the identity provider
/// (session cookie value or auth subject).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicantId(pub String);

impl ApplicantId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ApplicantId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for ApplicantId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

/// Canonical form of a contact email, used as the natural upsert key.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

// ─── Status ──────────────────────────────────────────────────────────────────

/// Where an applicant is in the registration lifecycle.
///
/// The wire and storage representation is the human-readable label, e.g.
/// `"Confirmation Pending"`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::EnumIter,
  strum::IntoStaticStr,
)]
pub enum UserStatus {
  #[serde(rename = "Profile Pending")]
  #[strum(serialize = "Profile Pending")]
  ProfilePending,
  #[serde(rename = "Admission Pending")]
  #[strum(serialize = "Admission Pending")]
  AdmissionPending,
  #[serde(rename = "Confirmation Pending")]
  #[strum(serialize = "Confirmation Pending")]
  ConfirmationPending,
  #[serde(rename = "Denied")]
  #[strum(serialize = "Denied")]
  Denied,
  #[serde(rename = "Confirmed")]
  #[strum(serialize = "Confirmed")]
  Confirmed,
  #[serde(rename = "Checked In")]
  #[strum(serialize = "Checked In")]
  CheckedIn,
}

impl UserStatus {
  pub fn label(self) -> &'static str { self.into() }

  /// No transition leaves a terminal status.
  pub fn is_terminal(self) -> bool { matches!(self, Self::Denied | Self::CheckedIn) }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShirtSize {
  Xs,
  S,
  M,
  L,
  Xl,
  Xxl,
}

/// Everything the applicant fills in on the registration form.
///
/// Free-form fields are kept as strings exactly as entered; an empty string
/// means "not provided". See [`crate::validate`] for what counts as complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
  pub first_name:               String,
  pub last_name:                String,
  pub email:                    String,
  pub age:                      String,
  pub phone_number:             String,
  pub country:                  String,
  pub school:                   String,
  pub level_of_study:           String,
  pub graduation_month:         String,
  pub graduation_year:          String,
  pub shirt_size:               Option<ShirtSize>,
  pub diet_restrictions:        Vec<String>,
  pub hackathon_count:          String,
  /// URI of an uploaded resume; the upload itself happens elsewhere.
  pub resume:                   Option<String>,
  pub linkedin:                 Option<String>,
  pub github:                   Option<String>,
  pub other_sites:              Vec<String>,
  pub attending_prehacks:       bool,
  pub looking_for_team:         bool,
  pub code_of_conduct_agreement: bool,
  pub data_agreement:           bool,
  pub mlh_agreement:            bool,
}

impl Profile {
  /// A blank profile carrying only a contact email.
  pub fn with_email(email: impl Into<String>) -> Self {
    Self { email: email.into(), ..Self::default() }
  }

  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name.trim(), self.last_name.trim())
      .trim()
      .to_owned()
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// The stored document for one applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantRecord {
  pub id:         ApplicantId,
  pub status:     UserStatus,
  #[serde(default)]
  pub admin:      bool,
  #[serde(flatten)]
  pub profile:    Profile,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl ApplicantRecord {
  /// A fresh, non-admin record.
  pub fn new(id: ApplicantId, status: UserStatus, profile: Profile) -> Self {
    let now = Utc::now();
    Self { id, status, admin: false, profile, created_at: now, updated_at: now }
  }

  /// The normalised contact email this record is keyed under.
  pub fn email_key(&self) -> String { normalize_email(&self.profile.email) }
}
