//! Adapter for record shapes written by earlier versions of the portal.
//!
//! Older exports used flat lowercase keys (`firstname`, `userstatus`, ...),
//! JSON-encoded strings for list fields, and a different status vocabulary.
//! Everything is converted to [`ApplicantRecord`] here, at the boundary, so
//! nothing else needs to know those shapes existed.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
  Error, Result,
  applicant::{ApplicantId, ApplicantRecord, Profile, ShirtSize, UserStatus},
};

/// Parse a status label, accepting the legacy vocabulary as well.
pub fn parse_status(label: &str) -> Result<UserStatus> {
  match label.trim() {
    "In Progress" => Ok(UserStatus::ProfilePending),
    "Ready for Review" => Ok(UserStatus::AdmissionPending),
    "Admitted" => Ok(UserStatus::ConfirmationPending),
    other => UserStatus::from_str(other).map_err(|_| Error::UnknownStatus(other.to_owned())),
  }
}

/// The flat record shape of the first table-backed revision.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyEntry {
  pub id:               String,
  #[serde(default)]
  pub admin:            bool,
  pub userstatus:       String,
  #[serde(default)]
  pub firstname:        String,
  #[serde(default)]
  pub lastname:         String,
  pub email:            String,
  #[serde(default)]
  pub age:              String,
  #[serde(default)]
  pub phone:            String,
  #[serde(default)]
  pub country:          String,
  #[serde(default)]
  pub school:           String,
  #[serde(default)]
  pub levelofstudy:     String,
  #[serde(default)]
  pub gradyear:         String,
  #[serde(default)]
  pub gradmonth:        String,
  #[serde(default)]
  pub shirtsize:        String,
  #[serde(default)]
  pub resume:           Option<String>,
  /// JSON-encoded `string[]`.
  #[serde(default)]
  pub diet:             String,
  #[serde(default)]
  pub experience:       String,
  /// JSON-encoded `[linkedin, github, ...otherSites]`.
  #[serde(default)]
  pub links:            String,
  #[serde(default)]
  pub prehacks:         bool,
  #[serde(default)]
  pub lft:              bool,
  #[serde(default)]
  pub mlhcodeofconduct: bool,
  #[serde(default)]
  pub mlhcommunication: bool,
  #[serde(default)]
  pub mlhlogistics:     bool,
}

fn decode_list(raw: &str) -> Result<Vec<Option<String>>> {
  if raw.trim().is_empty() {
    return Ok(Vec::new());
  }
  Ok(serde_json::from_str(raw)?)
}

fn decode_shirt_size(raw: &str) -> Option<ShirtSize> {
  serde_json::from_value(serde_json::Value::String(raw.trim().to_uppercase())).ok()
}

impl LegacyEntry {
  pub fn into_record(self, imported_at: DateTime<Utc>) -> Result<ApplicantRecord> {
    let status = parse_status(&self.userstatus)?;

    let diet_restrictions = decode_list(&self.diet)?.into_iter().flatten().collect();

    let mut links = decode_list(&self.links)?.into_iter();
    let linkedin = links.next().flatten().filter(|s| !s.is_empty());
    let github = links.next().flatten().filter(|s| !s.is_empty());
    let other_sites = links.flatten().filter(|s| !s.is_empty()).collect();

    let profile = Profile {
      first_name: self.firstname,
      last_name: self.lastname,
      email: self.email,
      age: self.age,
      phone_number: self.phone,
      country: self.country,
      school: self.school,
      level_of_study: self.levelofstudy,
      graduation_month: self.gradmonth,
      graduation_year: self.gradyear,
      shirt_size: decode_shirt_size(&self.shirtsize),
      diet_restrictions,
      hackathon_count: self.experience,
      resume: self.resume.filter(|s| !s.is_empty()),
      linkedin,
      github,
      other_sites,
      attending_prehacks: self.prehacks,
      looking_for_team: self.lft,
      code_of_conduct_agreement: self.mlhcodeofconduct,
      data_agreement: self.mlhcommunication,
      mlh_agreement: self.mlhlogistics,
    };

    Ok(ApplicantRecord {
      id: ApplicantId(self.id),
      status,
      admin: self.admin,
      profile,
      created_at: imported_at,
      updated_at: imported_at,
    })
  }
}

/// A canonical-shape record whose timestamps may be absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEntry {
  pub id:         String,
  pub status:     String,
  #[serde(default)]
  pub admin:      bool,
  #[serde(flatten)]
  pub profile:    Profile,
  pub created_at: Option<DateTime<Utc>>,
  pub updated_at: Option<DateTime<Utc>>,
}

/// Any record shape we know how to import.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ImportEntry {
  Legacy(LegacyEntry),
  Canonical(CanonicalEntry),
}

impl ImportEntry {
  pub fn into_record(self, imported_at: DateTime<Utc>) -> Result<ApplicantRecord> {
    match self {
      ImportEntry::Legacy(entry) => entry.into_record(imported_at),
      ImportEntry::Canonical(entry) => Ok(ApplicantRecord {
        id:         ApplicantId(entry.id),
        status:     parse_status(&entry.status)?,
        admin:      entry.admin,
        profile:    entry.profile,
        created_at: entry.created_at.unwrap_or(imported_at),
        updated_at: entry.updated_at.unwrap_or(imported_at),
      }),
    }
  }
}

/// Parse a JSON array of records in any known shape.
pub fn parse_import(json: &str, imported_at: DateTime<Utc>) -> Result<Vec<ApplicantRecord>> {
  let entries: Vec<ImportEntry> = serde_json::from_str(json)?;
  entries.into_iter().map(|e| e.into_record(imported_at)).collect()
}
