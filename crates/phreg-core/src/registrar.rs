//! [`Registrar`]: every registration operation, expressed against any
//! [`ApplicantStore`].
//!
//! Each operation re-reads the caller's record, checks access with
//! [`guard`], computes the next status with [`lifecycle`], and writes it with
//! a conditional update so a concurrent change is never overwritten.

use std::sync::Arc;

use chrono::Utc;

use crate::{
  Error, Result,
  applicant::{ApplicantId, ApplicantRecord, Profile, UserStatus, normalize_email},
  directory::{self, DirectoryQuery},
  guard::{self, Principal},
  lifecycle::{self, Action},
  store::ApplicantStore,
  validate,
};

/// Result of a profile submission.
#[derive(Debug, Clone)]
pub struct Submission {
  pub record:  ApplicantRecord,
  pub created: bool,
}

/// An admin's verdict on an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
  Admit,
  Deny,
}

impl Decision {
  /// Map a requested target status onto a decision, if it is one.
  pub fn from_target(status: UserStatus) -> Option<Self> {
    match status {
      UserStatus::ConfirmationPending => Some(Decision::Admit),
      UserStatus::Denied => Some(Decision::Deny),
      _ => None,
    }
  }

  /// Like [`Decision::from_target`], failing with
  /// [`Error::StatusNotSettable`].
  pub fn require_target(status: UserStatus) -> Result<Self> {
    Self::from_target(status).ok_or(Error::StatusNotSettable(status))
  }

  pub fn action(self) -> Action {
    match self {
      Decision::Admit => Action::Admit,
      Decision::Deny => Action::Deny,
    }
  }
}

/// Status of an existing record after its profile is replaced.
fn resubmitted_status(current: UserStatus, complete: bool) -> Result<UserStatus> {
  lifecycle::after_submission(Some(current), complete).ok_or_else(|| {
    Error::Validation(vec![validate::FieldError {
      field:   "profile",
      message: "a submitted application must stay complete",
    }])
  })
}

pub struct Registrar<S> {
  store: Arc<S>,
}

impl<S> Clone for Registrar<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S: ApplicantStore> Registrar<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  // ── Lookups ───────────────────────────────────────────────────────────────

  async fn fetch(&self, id: &ApplicantId) -> Result<Option<ApplicantRecord>> {
    self.store.get(id.clone()).await.map_err(Error::from_backend)
  }

  async fn fetch_target(&self, id: &ApplicantId) -> Result<ApplicantRecord> {
    self.fetch(id).await?.ok_or_else(|| Error::NotFound(id.clone()))
  }

  /// The caller's own record, freshly read. No trust is cached between
  /// requests.
  pub async fn me(&self, caller: &ApplicantId) -> Result<ApplicantRecord> {
    self.fetch(caller).await?.ok_or_else(|| Error::UnknownIdentity(caller.clone()))
  }

  async fn principal(&self, caller: &ApplicantId) -> Result<Principal> {
    Ok(Principal::from(&self.me(caller).await?))
  }

  /// `GET /api/users/{id}`: admin or self.
  pub async fn get(&self, caller: &ApplicantId, target: &ApplicantId) -> Result<ApplicantRecord> {
    let principal = self.principal(caller).await?;
    guard::authorize(&principal, target)?;
    self.fetch_target(target).await
  }

  /// `GET /api/users`: admin only.
  pub async fn list(
    &self,
    caller: &ApplicantId,
    query: &DirectoryQuery,
  ) -> Result<Vec<ApplicantRecord>> {
    guard::require_admin(&self.principal(caller).await?)?;
    let records = self.store.list().await.map_err(Error::from_backend)?;
    Ok(directory::apply(records, query))
  }

  // ── Registration ──────────────────────────────────────────────────────────

  /// `POST /api/me`: fetch the caller's record, creating a blank
  /// `Profile Pending` one under `email` if there is none yet.
  pub async fn register(&self, caller: &ApplicantId, email: &str) -> Result<Submission> {
    if let Some(record) = self.fetch(caller).await? {
      return Ok(Submission { record, created: false });
    }

    let profile = Profile::with_email(email.trim());
    let report = validate::check(&profile);
    if !report.is_valid() {
      return Err(Error::Validation(report.errors));
    }

    self.ensure_email_free(&profile.email, caller).await?;

    let record = ApplicantRecord::new(caller.clone(), UserStatus::ProfilePending, profile);
    let record = self.store.insert(record).await.map_err(Error::from_backend)?;
    Ok(Submission { record, created: true })
  }

  /// `POST /api/users`: upsert the caller's profile, keyed by identity.
  ///
  /// An email already registered under another identity is a
  /// [`Error::Conflict`]; a caller cannot take over someone else's record by
  /// submitting their address.
  pub async fn submit_profile(&self, caller: &ApplicantId, profile: Profile) -> Result<Submission> {
    let report = validate::check(&profile);
    if !report.is_valid() {
      return Err(Error::Validation(report.errors));
    }

    self.ensure_email_free(&profile.email, caller).await?;

    match self.fetch(caller).await? {
      Some(existing) => {
        let record = self.write_profile(existing, profile, report.complete).await?;
        Ok(Submission { record, created: false })
      }
      None => {
        let status = lifecycle::after_submission(None, report.complete)
          .unwrap_or(UserStatus::ProfilePending);
        let record = ApplicantRecord::new(caller.clone(), status, profile);
        let record = self.store.insert(record).await.map_err(Error::from_backend)?;
        Ok(Submission { record, created: true })
      }
    }
  }

  /// `POST /api/users/{id}` with a profile body: full replace, admin or self.
  pub async fn replace_profile(
    &self,
    caller: &ApplicantId,
    target: &ApplicantId,
    profile: Profile,
  ) -> Result<ApplicantRecord> {
    self.update(caller, target, profile, None).await
  }

  /// `POST /api/users/{id}` with a full record: replace the profile and, when
  /// `status` differs from the stored one, review the application first.
  ///
  /// A status change needs an admin and must be an admission decision. The
  /// profile is validated before anything is written.
  pub async fn update(
    &self,
    caller: &ApplicantId,
    target: &ApplicantId,
    profile: Profile,
    status: Option<UserStatus>,
  ) -> Result<ApplicantRecord> {
    let principal = self.principal(caller).await?;
    guard::authorize(&principal, target)?;

    let report = validate::check(&profile);
    if !report.is_valid() {
      return Err(Error::Validation(report.errors));
    }

    let mut existing = self.fetch_target(target).await?;
    self.ensure_email_free(&profile.email, target).await?;

    if let Some(status) = status.filter(|s| *s != existing.status) {
      guard::require_admin(&principal)?;
      let decision = Decision::require_target(status)?;
      resubmitted_status(status, report.complete)?;
      existing = self.apply(existing, decision.action()).await?;
    }

    self.write_profile(existing, profile, report.complete).await
  }

  async fn ensure_email_free(&self, email: &str, owner: &ApplicantId) -> Result<()> {
    match self.store.find_by_email(normalize_email(email)).await.map_err(Error::from_backend)? {
      Some(other) if other.id != *owner => {
        Err(Error::Conflict(format!("email {email} is registered to another applicant")))
      }
      _ => Ok(()),
    }
  }

  async fn write_profile(
    &self,
    existing: ApplicantRecord,
    profile: Profile,
    complete: bool,
  ) -> Result<ApplicantRecord> {
    let expected = existing.status;
    let status = resubmitted_status(expected, complete)?;

    let record = ApplicantRecord {
      status,
      profile,
      updated_at: Utc::now(),
      ..existing
    };
    let id = record.id.clone();

    match self.store.replace(record, expected).await.map_err(Error::from_backend)? {
      Some(stored) => Ok(stored),
      None => Err(Error::Conflict(format!("applicant {id} changed status concurrently; retry"))),
    }
  }

  // ── Transitions ───────────────────────────────────────────────────────────

  /// Apply `action` to `target` with a compare-and-swap on its current
  /// status.
  async fn apply(&self, target: ApplicantRecord, action: Action) -> Result<ApplicantRecord> {
    let to = lifecycle::transition(&target.id, target.status, action)?;

    match self
      .store
      .transition(target.id.clone(), target.status, to)
      .await
      .map_err(Error::from_backend)?
    {
      Some(updated) => Ok(updated),
      None => {
        // Lost a race: report what the record looks like now.
        let current = self.fetch_target(&target.id).await?;
        Err(Error::InvalidState { id: current.id, status: current.status, action })
      }
    }
  }

  /// `POST /api/users/{id}` with a status-only body.
  pub async fn set_status(
    &self,
    caller: &ApplicantId,
    target: &ApplicantId,
    status: UserStatus,
  ) -> Result<ApplicantRecord> {
    guard::require_admin(&self.principal(caller).await?)?;
    let decision = Decision::require_target(status)?;
    self.review(caller, target, decision).await
  }

  /// Admit or deny `target`. Admin only; target must be awaiting admission.
  pub async fn review(
    &self,
    caller: &ApplicantId,
    target: &ApplicantId,
    decision: Decision,
  ) -> Result<ApplicantRecord> {
    guard::require_admin(&self.principal(caller).await?)?;
    let target = self.fetch_target(target).await?;
    self.apply(target, decision.action()).await
  }

  /// `POST /api/confirm`: the applicant confirms their own attendance.
  pub async fn confirm(&self, caller: &ApplicantId) -> Result<ApplicantRecord> {
    let record = self.me(caller).await?;
    self.apply(record, Action::Confirm).await
  }

  /// Mark a confirmed applicant as present. Operator only; not exposed over
  /// HTTP.
  pub async fn check_in(&self, target: &ApplicantId) -> Result<ApplicantRecord> {
    let record = self.fetch_target(target).await?;
    self.apply(record, Action::CheckIn).await
  }

  // ── Operator ──────────────────────────────────────────────────────────────

  /// Grant or revoke admin rights for the record registered under `email`.
  pub async fn set_admin(&self, email: &str, admin: bool) -> Result<ApplicantRecord> {
    let record = self
      .store
      .find_by_email(normalize_email(email))
      .await
      .map_err(Error::from_backend)?
      .ok_or_else(|| Error::NoSuchEmail(email.to_owned()))?;

    self
      .store
      .set_admin(record.id.clone(), admin)
      .await
      .map_err(Error::from_backend)?
      .ok_or(Error::NotFound(record.id))
  }

  /// Write imported records verbatim, keyed by identity. Nothing is written
  /// unless every record fits.
  pub async fn import(&self, records: Vec<ApplicantRecord>) -> Result<usize> {
    self.store.put_all(records).await.map_err(Error::from_backend)
  }
}
