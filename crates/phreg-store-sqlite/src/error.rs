//! Error type for `phreg-store-sqlite`.

use phreg_core::store::BackendError;
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A row carries a status label no `UserStatus` matches.
  #[error("corrupt status column: {0:?}")]
  Status(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  fn sqlite_code(&self) -> Option<ErrorCode> {
    match self {
      Error::Database(tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))) => {
        Some(e.code)
      }
      _ => None,
    }
  }
}

impl BackendError for Error {
  fn is_overloaded(&self) -> bool {
    matches!(
      self.sqlite_code(),
      Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
  }

  fn is_conflict(&self) -> bool {
    matches!(self.sqlite_code(), Some(ErrorCode::ConstraintViolation))
  }
}
