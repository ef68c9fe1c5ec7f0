//! Router tests against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use phreg_core::store::ApplicantStore as _;
use phreg_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AppState, IdentityConfig, router};

async fn make_state() -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  AppState::new(Arc::new(store), IdentityConfig::default())
}

/// A state with an admin already registered under identity `admin`.
async fn make_state_with_admin() -> AppState<SqliteStore> {
  let state = make_state().await;
  state.registrar.register(&"admin".into(), "admin@pickhacks.io").await.unwrap();
  state.registrar.set_admin("admin@pickhacks.io", true).await.unwrap();
  state
}

async fn send(
  state: &AppState<SqliteStore>,
  method: &str,
  uri: &str,
  caller: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(caller) = caller {
    builder = builder.header("x-auth-subject", caller);
  }
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };

  let resp = router(state.clone()).oneshot(builder.body(body).unwrap()).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
  (status, json)
}

fn profile(email: &str) -> Value {
  json!({
    "firstName": "Ada",
    "lastName": "Lovelace",
    "email": email,
    "age": "20",
    "phoneNumber": "5735550123",
    "country": "United States",
    "school": "Missouri S&T",
    "levelOfStudy": "Undergraduate",
    "graduationMonth": "May",
    "graduationYear": "2026",
    "shirtSize": "M",
    "dietRestrictions": ["Vegetarian"],
    "hackathonCount": "1",
    "linkedin": "https://www.linkedin.com/in/ada",
    "codeOfConductAgreement": true,
    "dataAgreement": true,
    "mlhAgreement": true
  })
}

// ── Identity ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_needs_no_identity() {
  let state = make_state().await;
  let (status, body) = send(&state, "GET", "/health", None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn missing_identity_is_400() {
  let state = make_state().await;
  let (status, body) = send(&state, "GET", "/api/me", None, None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn session_cookie_identifies_caller() {
  let state = make_state().await;
  send(&state, "POST", "/api/me", Some("u1"), Some(json!({ "email": "a@b.com" }))).await;

  let req = Request::builder()
    .uri("/api/me")
    .header(header::COOKIE, "ph-registration::id=u1")
    .body(Body::empty())
    .unwrap();
  let resp = router(state).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn me_without_record_is_400() {
  let state = make_state().await;
  let (status, _) = send(&state, "GET", "/api/me", Some("ghost"), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Registration ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_creates_then_returns_existing() {
  let state = make_state().await;
  let (status, body) =
    send(&state, "POST", "/api/me", Some("u1"), Some(json!({ "email": "a@b.com" }))).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["status"], "Profile Pending");
  assert_eq!(body["admin"], false);

  let (status, body) =
    send(&state, "POST", "/api/me", Some("u1"), Some(json!({ "email": "z@b.com" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["email"], "a@b.com");
}

#[tokio::test]
async fn submit_creates_then_updates() {
  let state = make_state().await;
  let (status, body) = send(&state, "POST", "/api/users", Some("u1"), Some(profile("a@b.com"))).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["status"], "Admission Pending");
  assert_eq!(body["id"], "u1");

  let mut changed = profile("a@b.com");
  changed["school"] = json!("MIT");
  let (status, body) = send(&state, "POST", "/api/users", Some("u1"), Some(changed)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["school"], "MIT");

  let records = state.registrar.store().list().await.unwrap();
  assert_eq!(records.iter().filter(|r| r.email_key() == "a@b.com").count(), 1);
}

#[tokio::test]
async fn submit_with_taken_email_is_409() {
  let state = make_state().await;
  send(&state, "POST", "/api/users", Some("u1"), Some(profile("a@b.com"))).await;
  let (status, _) = send(&state, "POST", "/api/users", Some("u2"), Some(profile("A@B.com"))).await;
  assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_fields_are_reported() {
  let state = make_state().await;
  let mut bad = profile("a@b.com");
  bad["github"] = json!("https://gitlab.com/ada");
  let (status, body) = send(&state, "POST", "/api/users", Some("u1"), Some(bad)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["fields"][0]["field"], "github");
}

#[tokio::test]
async fn progress_view() {
  let state = make_state().await;
  send(&state, "POST", "/api/users", Some("u1"), Some(profile("a@b.com"))).await;
  let (status, body) = send(&state, "GET", "/api/me/status", Some("u1"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "Admission Pending");
  assert_eq!(body["profileSubmitted"], true);
  assert_eq!(body["admissionDecided"], false);
}

// ── Access control ────────────────────────────────────────────────────────────

#[tokio::test]
async fn non_admin_cannot_read_another_record() {
  let state = make_state().await;
  send(&state, "POST", "/api/users", Some("u1"), Some(profile("a@b.com"))).await;
  send(&state, "POST", "/api/users", Some("u2"), Some(profile("c@d.com"))).await;

  let (status, body) = send(&state, "GET", "/api/users/u1", Some("u2"), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert!(body.get("email").is_none());

  let (status, body) = send(&state, "GET", "/api/users/u2", Some("u2"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["email"], "c@d.com");
}

#[tokio::test]
async fn directory_is_admin_only() {
  let state = make_state_with_admin().await;
  send(&state, "POST", "/api/users", Some("u1"), Some(profile("a@b.com"))).await;

  let (status, _) = send(&state, "GET", "/api/users", Some("u1"), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, body) =
    send(&state, "GET", "/api/users?readyForReview=true&sort=email", Some("admin"), None).await;
  assert_eq!(status, StatusCode::OK);
  let list = body.as_array().unwrap();
  assert_eq!(list.len(), 1);
  assert_eq!(list[0]["id"], "u1");
}

#[tokio::test]
async fn admin_reads_missing_record_as_404() {
  let state = make_state_with_admin().await;
  let (status, _) = send(&state, "GET", "/api/users/nobody", Some("admin"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_admin_review_is_403_and_target_unchanged() {
  let state = make_state().await;
  send(&state, "POST", "/api/users", Some("u1"), Some(profile("a@b.com"))).await;
  send(&state, "POST", "/api/users", Some("u2"), Some(profile("c@d.com"))).await;

  let review = json!({ "status": "Confirmation Pending" });
  let (status, _) = send(&state, "POST", "/api/users/u1", Some("u2"), Some(review)).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (_, body) = send(&state, "GET", "/api/me", Some("u1"), None).await;
  assert_eq!(body["status"], "Admission Pending");
}

#[tokio::test]
async fn review_to_other_status_is_400() {
  let state = make_state_with_admin().await;
  send(&state, "POST", "/api/users", Some("u1"), Some(profile("a@b.com"))).await;

  let review = json!({ "status": "Checked In" });
  let (status, _) = send(&state, "POST", "/api/users/u1", Some("admin"), Some(review)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn owner_can_replace_profile_but_not_admin_flag() {
  let state = make_state().await;
  send(&state, "POST", "/api/users", Some("u1"), Some(profile("a@b.com"))).await;

  let mut replacement = profile("a@b.com");
  replacement["country"] = json!("Canada");
  replacement["admin"] = json!(true);
  let (status, body) = send(&state, "POST", "/api/users/u1", Some("u1"), Some(replacement)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["country"], "Canada");
  assert_eq!(body["admin"], false);
}

#[tokio::test]
async fn admin_record_edit_with_new_status_reviews_it() {
  let state = make_state_with_admin().await;
  send(&state, "POST", "/api/users", Some("u1"), Some(profile("a@b.com"))).await;

  let mut edited = profile("a@b.com");
  edited["school"] = json!("MIT");
  edited["status"] = json!("Denied");
  let (status, body) = send(&state, "POST", "/api/users/u1", Some("admin"), Some(edited)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "Denied");
  assert_eq!(body["school"], "MIT");

  let (_, body) = send(&state, "GET", "/api/me", Some("u1"), None).await;
  assert_eq!(body["status"], "Denied");
  assert_eq!(body["school"], "MIT");
}

#[tokio::test]
async fn record_edit_with_unchanged_status_replaces_profile() {
  let state = make_state().await;
  send(&state, "POST", "/api/users", Some("u1"), Some(profile("a@b.com"))).await;

  let (_, mut current) = send(&state, "GET", "/api/me", Some("u1"), None).await;
  current["country"] = json!("Canada");
  let (status, body) = send(&state, "POST", "/api/users/u1", Some("u1"), Some(current)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["country"], "Canada");
  assert_eq!(body["status"], "Admission Pending");
}

#[tokio::test]
async fn owner_cannot_change_own_status_through_record() {
  let state = make_state().await;
  send(&state, "POST", "/api/users", Some("u1"), Some(profile("a@b.com"))).await;

  let mut edited = profile("a@b.com");
  edited["country"] = json!("Canada");
  edited["status"] = json!("Confirmation Pending");
  let (status, _) = send(&state, "POST", "/api/users/u1", Some("u1"), Some(edited)).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (_, body) = send(&state, "GET", "/api/me", Some("u1"), None).await;
  assert_eq!(body["status"], "Admission Pending");
  assert_eq!(body["country"], "United States");
}

#[tokio::test]
async fn record_edit_to_unsettable_status_is_400_and_writes_nothing() {
  let state = make_state_with_admin().await;
  send(&state, "POST", "/api/users", Some("u1"), Some(profile("a@b.com"))).await;

  let mut edited = profile("a@b.com");
  edited["country"] = json!("Canada");
  edited["status"] = json!("Checked In");
  let (status, _) = send(&state, "POST", "/api/users/u1", Some("admin"), Some(edited)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, body) = send(&state, "GET", "/api/me", Some("u1"), None).await;
  assert_eq!(body["status"], "Admission Pending");
  assert_eq!(body["country"], "United States");
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn confirm_before_admission_is_400() {
  let state = make_state().await;
  send(&state, "POST", "/api/users", Some("u1"), Some(profile("a@b.com"))).await;

  let (status, _) = send(&state, "POST", "/api/confirm", Some("u1"), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, body) = send(&state, "GET", "/api/me", Some("u1"), None).await;
  assert_eq!(body["status"], "Admission Pending");
}

#[tokio::test]
async fn end_to_end_admit_and_confirm() {
  let state = make_state_with_admin().await;

  let (status, body) = send(&state, "POST", "/api/users", Some("u1"), Some(profile("a@b.com"))).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["status"], "Admission Pending");

  let review = json!({ "status": "Confirmation Pending" });
  let (status, body) = send(&state, "POST", "/api/users/u1", Some("admin"), Some(review)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "Confirmation Pending");

  let (status, body) = send(&state, "POST", "/api/confirm", Some("u1"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "Confirmed");
}

#[tokio::test]
async fn end_to_end_deny_then_confirm_fails() {
  let state = make_state_with_admin().await;
  send(&state, "POST", "/api/users", Some("u1"), Some(profile("a@b.com"))).await;

  let review = json!({ "status": "Denied" });
  let (status, body) = send(&state, "POST", "/api/users/u1", Some("admin"), Some(review)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "Denied");

  let (status, _) = send(&state, "POST", "/api/confirm", Some("u1"), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, body) = send(&state, "GET", "/api/me", Some("u1"), None).await;
  assert_eq!(body["status"], "Denied");
}
