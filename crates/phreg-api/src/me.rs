//! Handlers for the caller's own record.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/me` | 400 if the caller has no record yet |
//! | `POST` | `/me` | Body: `{"email":"…"}`; 201 when created, 200 when it already existed |
//! | `GET`  | `/me/status` | Progress checklist for the dashboard |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use phreg_core::{
  applicant::ApplicantRecord,
  lifecycle::{self, Progress},
  store::ApplicantStore,
};
use serde::Deserialize;

use crate::{AppState, Caller, error::ApiError};

// ─── Get ──────────────────────────────────────────────────────────────────────

/// `GET /me`
pub async fn get<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
) -> Result<Json<ApplicantRecord>, ApiError>
where
  S: ApplicantStore + 'static,
{
  Ok(Json(state.registrar.me(&caller).await?))
}

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub email: String,
}

/// `POST /me` — body: `{"email":"a@b.com"}`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ApplicantStore + 'static,
{
  let submission = state.registrar.register(&caller, &body.email).await?;
  let status = if submission.created {
    tracing::info!(id = %caller, "registration started");
    StatusCode::CREATED
  } else {
    StatusCode::OK
  };
  Ok((status, Json(submission.record)))
}

// ─── Status ───────────────────────────────────────────────────────────────────

/// `GET /me/status`
pub async fn status<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
) -> Result<Json<Progress>, ApiError>
where
  S: ApplicantStore + 'static,
{
  let record = state.registrar.me(&caller).await?;
  Ok(Json(lifecycle::progress(record.status)))
}
