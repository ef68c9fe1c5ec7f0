//! Operator commands: privileged actions run from a shell on the server host.
//!
//! None of these are routed over HTTP. Admin rights and check-in exist only
//! here, so no request can grant itself privileges.

use std::path::Path;

use anyhow::Context as _;
use chrono::Utc;
use phreg_core::{
  Registrar,
  applicant::{ApplicantId, ApplicantRecord},
  legacy,
  store::ApplicantStore,
};

/// Grant (`admin = true`) or revoke admin rights for the applicant registered
/// under `email`.
pub async fn set_admin<S: ApplicantStore>(
  registrar: &Registrar<S>,
  email: &str,
  admin: bool,
) -> anyhow::Result<ApplicantRecord> {
  let record = registrar
    .set_admin(email, admin)
    .await
    .with_context(|| format!("failed to update admin flag for {email}"))?;
  tracing::info!(id = %record.id, email, admin, "admin flag updated");
  Ok(record)
}

/// Mark a confirmed applicant as arrived.
pub async fn check_in<S: ApplicantStore>(
  registrar: &Registrar<S>,
  id: &str,
) -> anyhow::Result<ApplicantRecord> {
  let record = registrar
    .check_in(&ApplicantId::new(id))
    .await
    .with_context(|| format!("failed to check in {id}"))?;
  tracing::info!(id = %record.id, "checked in");
  Ok(record)
}

/// Load a JSON array of records (current or legacy shape) from `path` and
/// write them as-is, replacing any record with the same identity. A file
/// that clashes on identity or email writes nothing.
pub async fn import<S: ApplicantStore>(
  registrar: &Registrar<S>,
  path: &Path,
) -> anyhow::Result<usize> {
  let json = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read {}", path.display()))?;
  let records = legacy::parse_import(&json, Utc::now())
    .with_context(|| format!("failed to parse {}", path.display()))?;
  let written = registrar.import(records).await.context("failed to write records")?;
  tracing::info!(written, path = %path.display(), "import finished");
  Ok(written)
}
