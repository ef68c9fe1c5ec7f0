//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users` | Admin only. `?q=&readyForReview=&sort=&direction=` |
//! | `POST` | `/users` | Body: profile, keyed by caller identity. 201 when created, 200 when updated, 409 when the email belongs to another identity |
//! | `GET`  | `/users/{id}` | Admin or self |
//! | `POST` | `/users/{id}` | Body `{"status":…}` (admin review) or a record (admin or self); a changed `status` in a record is reviewed first |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use phreg_core::{
  applicant::{ApplicantId, ApplicantRecord, Profile, UserStatus},
  directory::DirectoryQuery,
  store::ApplicantStore,
};
use serde::Deserialize;

use crate::{AppState, Caller, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users[?q=<text>&readyForReview=true&sort=<key>&direction=<asc|desc>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Query(query): Query<DirectoryQuery>,
) -> Result<Json<Vec<ApplicantRecord>>, ApiError>
where
  S: ApplicantStore + 'static,
{
  Ok(Json(state.registrar.list(&caller, &query).await?))
}

// ─── Submit ───────────────────────────────────────────────────────────────────

/// `POST /users` — upsert the caller's own profile.
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Json(profile): Json<Profile>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ApplicantStore + 'static,
{
  let submission = state.registrar.submit_profile(&caller, profile).await?;
  let record = submission.record;
  tracing::info!(id = %record.id, status = %record.status, created = submission.created, "profile submitted");

  let status = if submission.created { StatusCode::CREATED } else { StatusCode::OK };
  Ok((status, Json(record)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(id): Path<String>,
) -> Result<Json<ApplicantRecord>, ApiError>
where
  S: ApplicantStore + 'static,
{
  Ok(Json(state.registrar.get(&caller, &ApplicantId(id)).await?))
}

// ─── Update one ───────────────────────────────────────────────────────────────

/// A status-only body. Any other key makes the body a profile instead.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewBody {
  pub status: UserStatus,
}

/// A full record as the admin table sends it back. Server-owned keys such
/// as `id` and `admin` are ignored.
#[derive(Debug, Deserialize)]
pub struct RecordBody {
  #[serde(default)]
  pub status:  Option<UserStatus>,
  #[serde(flatten)]
  pub profile: Profile,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UpdateBody {
  Review(ReviewBody),
  Record(RecordBody),
}

/// `POST /users/{id}` — admin review, or a full profile replace.
pub async fn update_one<S>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  Path(id): Path<String>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<ApplicantRecord>, ApiError>
where
  S: ApplicantStore + 'static,
{
  let target = ApplicantId(id);

  let record = match body {
    UpdateBody::Review(ReviewBody { status }) => {
      let record = state.registrar.set_status(&caller, &target, status).await?;
      tracing::info!(admin = %caller, id = %record.id, status = %record.status, "application reviewed");
      record
    }
    UpdateBody::Record(RecordBody { status, profile }) => {
      let record = state.registrar.update(&caller, &target, profile, status).await?;
      tracing::info!(caller = %caller, id = %record.id, status = %record.status, "record replaced");
      record
    }
  };

  Ok(Json(record))
}
