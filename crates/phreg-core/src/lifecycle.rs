//! The applicant status lifecycle.
//!
//! ```text
//! Profile Pending ─▶ Admission Pending ─┬─▶ Confirmation Pending ─▶ Confirmed ─▶ Checked In
//!                                       └─▶ Denied
//! ```
//!
//! Everything here is pure; callers apply the result to the store with a
//! conditional update on the status they observed.

use serde::Serialize;

use crate::{
  Error, Result,
  applicant::{ApplicantId, UserStatus},
};

/// A status-changing action other than profile submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Action {
  Admit,
  Deny,
  Confirm,
  CheckIn,
}

/// Who is allowed to trigger an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
  /// The owner of the record.
  Applicant,
  Admin,
  /// Someone with shell access to the server; never reachable over HTTP.
  Operator,
}

impl Action {
  pub fn actor(self) -> Actor {
    match self {
      Action::Admit | Action::Deny => Actor::Admin,
      Action::Confirm => Actor::Applicant,
      Action::CheckIn => Actor::Operator,
    }
  }

  /// The status this action requires.
  pub fn from_status(self) -> UserStatus {
    match self {
      Action::Admit | Action::Deny => UserStatus::AdmissionPending,
      Action::Confirm => UserStatus::ConfirmationPending,
      Action::CheckIn => UserStatus::Confirmed,
    }
  }

  pub fn to_status(self) -> UserStatus {
    match self {
      Action::Admit => UserStatus::ConfirmationPending,
      Action::Deny => UserStatus::Denied,
      Action::Confirm => UserStatus::Confirmed,
      Action::CheckIn => UserStatus::CheckedIn,
    }
  }
}

/// The status `action` leads to from `current`, or `None` if not permitted.
pub fn next(current: UserStatus, action: Action) -> Option<UserStatus> {
  (current == action.from_status()).then(|| action.to_status())
}

/// Like [`next`], but as an `InvalidState` error naming the record.
pub fn transition(id: &ApplicantId, current: UserStatus, action: Action) -> Result<UserStatus> {
  next(current, action).ok_or_else(|| Error::InvalidState {
    id: id.clone(),
    status: current,
    action,
  })
}

/// Status after the applicant submits their profile.
///
/// A complete profile moves `Profile Pending` (or a brand-new record) to
/// `Admission Pending`. Past that point a resubmission never changes the
/// status; `None` means the submission must be rejected as incomplete.
pub fn after_submission(current: Option<UserStatus>, complete: bool) -> Option<UserStatus> {
  match (current, complete) {
    (None | Some(UserStatus::ProfilePending), true) => Some(UserStatus::AdmissionPending),
    (None | Some(UserStatus::ProfilePending), false) => Some(UserStatus::ProfilePending),
    (Some(status), true) => Some(status),
    (Some(_), false) => None,
  }
}

// ─── Applicant-facing progress ───────────────────────────────────────────────

/// The dashboard's step-by-step view of a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
  pub status:            UserStatus,
  pub profile_submitted: bool,
  pub admission_decided: bool,
  pub admitted:          bool,
  pub confirmed:         bool,
  pub checked_in:        bool,
  pub denied:            bool,
}

pub fn progress(status: UserStatus) -> Progress {
  use UserStatus::*;

  let admitted = matches!(status, ConfirmationPending | Confirmed | CheckedIn);
  Progress {
    status,
    profile_submitted: status != ProfilePending,
    admission_decided: admitted || status == Denied,
    admitted,
    confirmed: matches!(status, Confirmed | CheckedIn),
    checked_in: status == CheckedIn,
    denied: status == Denied,
  }
}
