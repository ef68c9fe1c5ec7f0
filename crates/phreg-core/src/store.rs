//! The `ApplicantStore` trait.
//!
//! Implemented by storage backends (e.g. `phreg-store-sqlite`). The handle is
//! created by the hosting process and passed in explicitly; nothing in this
//! workspace reaches for a global connection.

use std::future::Future;

use crate::applicant::{ApplicantId, ApplicantRecord, UserStatus};

/// Lets the service layer classify backend failures without knowing the
/// backend.
pub trait BackendError: std::error::Error + Send + Sync + 'static {
  /// The backend is out of capacity; the caller may retry later.
  fn is_overloaded(&self) -> bool { false }

  /// A uniqueness constraint (identity or email) was violated.
  fn is_conflict(&self) -> bool { false }
}

/// Abstraction over the applicant record store.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait ApplicantStore: Send + Sync {
  type Error: BackendError;

  /// Retrieve a record by identity. Returns `None` if not found.
  fn get(
    &self,
    id: ApplicantId,
  ) -> impl Future<Output = Result<Option<ApplicantRecord>, Self::Error>> + Send + '_;

  /// Retrieve the record registered under `email` (compared normalised).
  fn find_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<ApplicantRecord>, Self::Error>> + Send + '_;

  /// All records, in no particular order.
  fn list(&self) -> impl Future<Output = Result<Vec<ApplicantRecord>, Self::Error>> + Send + '_;

  /// Persist a new record. Fails with a conflict if the identity or email is
  /// already taken.
  fn insert(
    &self,
    record: ApplicantRecord,
  ) -> impl Future<Output = Result<ApplicantRecord, Self::Error>> + Send + '_;

  /// Replace the whole document for `record.id`, but only if its stored
  /// status is still `expected`. Returns `None` when nothing matched.
  ///
  /// The stored `admin` flag and `created_at` are never changed by a replace.
  fn replace(
    &self,
    record: ApplicantRecord,
    expected: UserStatus,
  ) -> impl Future<Output = Result<Option<ApplicantRecord>, Self::Error>> + Send + '_;

  /// Atomically move `id` from `from` to `to`. Returns the updated record,
  /// or `None` if the record is missing or no longer in `from`.
  fn transition(
    &self,
    id: ApplicantId,
    from: UserStatus,
    to: UserStatus,
  ) -> impl Future<Output = Result<Option<ApplicantRecord>, Self::Error>> + Send + '_;

  /// Set or clear the admin flag. Operator use only.
  fn set_admin(
    &self,
    id: ApplicantId,
    admin: bool,
  ) -> impl Future<Output = Result<Option<ApplicantRecord>, Self::Error>> + Send + '_;

  /// Write a batch of records as-is, creating or overwriting by identity.
  /// Used by operator imports; bypasses the lifecycle.
  ///
  /// All or nothing: if any record would break identity or email uniqueness
  /// the whole batch fails with a conflict and nothing is written. Returns
  /// the number of records written.
  fn put_all(
    &self,
    records: Vec<ApplicantRecord>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
