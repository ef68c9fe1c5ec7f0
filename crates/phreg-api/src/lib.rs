//! JSON REST API for the registration portal.
//!
//! Exposes an axum [`Router`] backed by any
//! [`phreg_core::store::ApplicantStore`]. Authentication and TLS are the
//! caller's responsibility; the authenticated subject arrives in a trusted
//! header (see [`identity`]).
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = phreg_api::router(AppState::new(store, IdentityConfig::default()));
//! ```

pub mod confirm;
pub mod error;
pub mod identity;
pub mod me;
pub mod users;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post},
};
use phreg_core::{Registrar, store::ApplicantStore};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use identity::{Caller, IdentityConfig};

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub registrar: Registrar<S>,
  pub identity:  Arc<IdentityConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { registrar: self.registrar.clone(), identity: self.identity.clone() }
  }
}

impl<S: ApplicantStore> AppState<S> {
  pub fn new(store: Arc<S>, identity: IdentityConfig) -> Self {
    Self { registrar: Registrar::new(store), identity: Arc::new(identity) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The `/api` routes alone, without middleware.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: ApplicantStore + 'static,
{
  Router::new()
    // Records
    .route("/users", get(users::list::<S>).post(users::submit::<S>))
    .route("/users/{id}", get(users::get_one::<S>).post(users::update_one::<S>))
    // Applicant self-service
    .route("/confirm", post(confirm::handler::<S>))
    .route("/me", get(me::get::<S>).post(me::register::<S>))
    .route("/me/status", get(me::status::<S>))
    .with_state(state)
}

/// The complete service: `/api/*`, `/health`, and request tracing.
pub fn router<S>(state: AppState<S>) -> Router<()>
where
  S: ApplicantStore + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .route("/health", get(health))
    .layer(TraceLayer::new_for_http())
}

/// `GET /health`
async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

#[cfg(test)]
mod tests;
