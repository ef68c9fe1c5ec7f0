//! Error types for `phreg-core`.

use thiserror::Error;

use crate::{
  applicant::{ApplicantId, UserStatus},
  lifecycle::Action,
  store::BackendError,
  validate::FieldError,
};

#[derive(Debug, Error)]
pub enum Error {
  /// The requested transition is not permitted from the current status.
  #[error("cannot {action} applicant {id}: status is {status}")]
  InvalidState {
    id:     ApplicantId,
    status: UserStatus,
    action: Action,
  },

  /// The caller is neither an admin nor the owner of the target record.
  #[error("forbidden: {0}")]
  Forbidden(&'static str),

  /// The caller's identity has no record yet.
  #[error("no applicant record for identity {0}")]
  UnknownIdentity(ApplicantId),

  /// The target record does not exist.
  #[error("applicant {0} not found")]
  NotFound(ApplicantId),

  /// No record is registered under this email.
  #[error("no applicant registered under {0}")]
  NoSuchEmail(String),

  /// An admin asked for a status that is not an admission decision.
  #[error("status can only be set to Confirmation Pending or Denied, not {0}")]
  StatusNotSettable(UserStatus),

  #[error("profile failed validation ({} field(s))", .0.len())]
  Validation(Vec<FieldError>),

  #[error("conflict: {0}")]
  Conflict(String),

  /// The backing store signalled throughput exhaustion.
  #[error("store overloaded: {0}")]
  Overloaded(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("unknown status label: {0:?}")]
  UnknownStatus(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Classify a storage failure: overloaded, conflict, or anything else.
  pub fn from_backend<E: BackendError>(e: E) -> Self {
    if e.is_overloaded() {
      Error::Overloaded(Box::new(e))
    } else if e.is_conflict() {
      Error::Conflict(e.to_string())
    } else {
      Error::Store(Box::new(e))
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
