//! Handler for `POST /confirm`: the applicant accepts their admission.

use axum::{Json, extract::State};
use phreg_core::{applicant::ApplicantRecord, store::ApplicantStore};

use crate::{AppState, Caller, error::ApiError};

/// `POST /confirm`
///
/// Moves the caller from `Confirmation Pending` to `Confirmed`; any other
/// status is a 400 and leaves the record untouched.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
) -> Result<Json<ApplicantRecord>, ApiError>
where
  S: ApplicantStore + 'static,
{
  let record = state.registrar.confirm(&caller).await?;
  tracing::info!(id = %record.id, "attendance confirmed");
  Ok(Json(record))
}
