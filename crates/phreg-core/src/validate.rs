//! Profile validation.
//!
//! Two separate questions are answered here: is every *provided* field well
//! formed, and is the profile *complete* enough to be reviewed. Malformed
//! input is always rejected; an incomplete profile is accepted and simply
//! stays in `Profile Pending`.

use serde::Serialize;

use crate::applicant::Profile;

/// One rejected field, named as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field:   &'static str,
  pub message: &'static str,
}

impl FieldError {
  fn new(field: &'static str, message: &'static str) -> Self { Self { field, message } }
}

/// Outcome of [`check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
  pub errors:   Vec<FieldError>,
  pub complete: bool,
}

impl Report {
  pub fn is_valid(&self) -> bool { self.errors.is_empty() }
}

pub fn check(profile: &Profile) -> Report {
  let mut errors = Vec::new();

  if profile.email.trim().is_empty() {
    errors.push(FieldError::new("email", "email is required"));
  } else if !is_email(profile.email.trim()) {
    errors.push(FieldError::new("email", "invalid email"));
  }

  if present(&profile.phone_number) && !is_phone(profile.phone_number.trim()) {
    errors.push(FieldError::new(
      "phoneNumber",
      "invalid phone number (must be in format xxxyyyzzzz)",
    ));
  }

  if let Some(url) = provided(&profile.linkedin)
    && !is_profile_url(url, "linkedin.com/in/")
  {
    errors.push(FieldError::new("linkedin", "invalid LinkedIn URL"));
  }

  if let Some(url) = provided(&profile.github)
    && !is_profile_url(url, "github.com/")
  {
    errors.push(FieldError::new("github", "invalid GitHub URL"));
  }

  if present(&profile.graduation_year) && !is_year(profile.graduation_year.trim()) {
    errors.push(FieldError::new("graduationYear", "graduation year must be a four-digit year"));
  }

  if present(&profile.age) && !is_count(profile.age.trim()) {
    errors.push(FieldError::new("age", "age must be a whole number"));
  }

  if present(&profile.hackathon_count) && !is_count(profile.hackathon_count.trim()) {
    errors.push(FieldError::new("hackathonCount", "hackathon count must be a whole number"));
  }

  Report { complete: errors.is_empty() && is_complete(profile), errors }
}

/// Every field the review form requires is filled in and every agreement
/// accepted.
pub fn is_complete(p: &Profile) -> bool {
  let required = [
    &p.first_name,
    &p.last_name,
    &p.email,
    &p.age,
    &p.phone_number,
    &p.country,
    &p.school,
    &p.level_of_study,
    &p.graduation_month,
    &p.graduation_year,
    &p.hackathon_count,
  ];

  required.iter().all(|f| present(f))
    && p.shirt_size.is_some()
    && p.code_of_conduct_agreement
    && p.data_agreement
    && p.mlh_agreement
}

fn present(s: &str) -> bool { !s.trim().is_empty() }

fn provided(s: &Option<String>) -> Option<&str> {
  s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// `\S+@\S+`: non-blank text on both sides of an `@`, no whitespace anywhere.
fn is_email(s: &str) -> bool {
  if s.chars().any(char::is_whitespace) {
    return false;
  }
  match s.split_once('@') {
    Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
    None => false,
  }
}

fn is_phone(s: &str) -> bool { s.len() == 10 && s.bytes().all(|b| b.is_ascii_digit()) }

fn is_year(s: &str) -> bool { s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) }

fn is_count(s: &str) -> bool { !s.is_empty() && s.len() <= 4 && s.bytes().all(|b| b.is_ascii_digit()) }

/// `https://(www.)?<host_path><non-space>`
fn is_profile_url(url: &str, host_path: &str) -> bool {
  let Some(rest) = url.strip_prefix("https://") else {
    return false;
  };
  let rest = rest.strip_prefix("www.").unwrap_or(rest);
  match rest.strip_prefix(host_path) {
    Some(handle) => !handle.is_empty() && !handle.chars().any(char::is_whitespace),
    None => false,
  }
}
