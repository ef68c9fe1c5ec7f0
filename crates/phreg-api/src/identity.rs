//! Caller identity extraction.
//!
//! Authentication happens upstream. The identity provider (or the proxy in
//! front of this service) places the authenticated subject in a trusted
//! header; browsers that only hold the session cookie are accepted too. A
//! request with neither is rejected before any handler runs.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header::COOKIE, request::Parts},
};
use phreg_core::{applicant::ApplicantId, store::ApplicantStore};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

pub const DEFAULT_IDENTITY_HEADER: &str = "x-auth-subject";
pub const DEFAULT_SESSION_COOKIE: &str = "ph-registration::id";

/// Where to look for the caller's identity.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
  pub header: String,
  pub cookie: String,
}

impl Default for IdentityConfig {
  fn default() -> Self {
    Self {
      header: DEFAULT_IDENTITY_HEADER.to_owned(),
      cookie: DEFAULT_SESSION_COOKIE.to_owned(),
    }
  }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub ApplicantId);

/// Resolve the caller from `headers`: the identity header wins over the
/// cookie, and blank values count as absent.
pub fn identify(headers: &HeaderMap, config: &IdentityConfig) -> Option<ApplicantId> {
  let from_header = headers
    .get(config.header.as_str())
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|v| !v.is_empty());

  if let Some(subject) = from_header {
    return Some(ApplicantId::new(subject));
  }

  headers
    .get_all(COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.split_once('='))
    .find(|(name, _)| name.trim() == config.cookie)
    .map(|(_, value)| value.trim().trim_matches('"'))
    .filter(|v| !v.is_empty())
    .map(ApplicantId::new)
}

impl<S> FromRequestParts<AppState<S>> for Caller
where
  S: ApplicantStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    identify(&parts.headers, &state.identity)
      .map(Caller)
      .ok_or(ApiError::MissingIdentity)
  }
}
