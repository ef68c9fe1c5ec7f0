//! [`SqliteStore`] — the SQLite implementation of [`ApplicantStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use phreg_core::{
  applicant::{ApplicantId, ApplicantRecord, UserStatus},
  store::ApplicantStore,
};

use crate::{
  Result,
  encode::{COLUMNS, RawRecord, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An applicant store backed by a single SQLite file.
///
/// Clones share one connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

type Param = Box<dyn rusqlite::ToSql + Send>;

fn param(value: impl rusqlite::ToSql + Send + 'static) -> Param { Box::new(value) }

fn select_one(
  conn: &rusqlite::Connection,
  id: &str,
) -> rusqlite::Result<Option<RawRecord>> {
  conn
    .query_row(
      &format!("SELECT {COLUMNS} FROM applicants WHERE applicant_id = ?1"),
      rusqlite::params![id],
      RawRecord::from_row,
    )
    .optional()
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_owned();
    let conn = tokio_rusqlite::Connection::open(&path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::info!(path = %path.display(), "opened applicant store");
    Ok(store)
  }

  /// Open a private in-memory database, used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a conditional `UPDATE` and read the row back if it matched.
  async fn update_where(
    &self,
    id: String,
    sql: &'static str,
    params: Vec<Param>,
  ) -> Result<Option<ApplicantRecord>> {
    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(sql, rusqlite::params_from_iter(params.iter()))?;
        let raw = if changed == 0 { None } else { select_one(&tx, &id)? };
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }
}

// ─── ApplicantStore impl ─────────────────────────────────────────────────────

impl ApplicantStore for SqliteStore {
  type Error = crate::Error;

  async fn get(&self, id: ApplicantId) -> Result<Option<ApplicantRecord>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_one(conn, id.as_str())?))
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn find_by_email(&self, email: String) -> Result<Option<ApplicantRecord>> {
    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COLUMNS} FROM applicants WHERE email = ?1"),
              rusqlite::params![email],
              RawRecord::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn list(&self) -> Result<Vec<ApplicantRecord>> {
    let raws: Vec<RawRecord> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {COLUMNS} FROM applicants ORDER BY created_at"))?;
        let rows = stmt
          .query_map([], RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  async fn insert(&self, record: ApplicantRecord) -> Result<ApplicantRecord> {
    let raw = RawRecord::encode(&record)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!("INSERT INTO applicants ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
          rusqlite::params![
            raw.applicant_id,
            raw.email,
            raw.status,
            raw.admin,
            raw.profile_json,
            raw.created_at,
            raw.updated_at,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(id = %record.id, status = %record.status, "inserted applicant");
    Ok(record)
  }

  async fn replace(
    &self,
    record: ApplicantRecord,
    expected: UserStatus,
  ) -> Result<Option<ApplicantRecord>> {
    let raw = RawRecord::encode(&record)?;

    self
      .update_where(
        raw.applicant_id.clone(),
        "UPDATE applicants
            SET email = ?3, status = ?4, profile_json = ?5, updated_at = ?6
          WHERE applicant_id = ?1 AND status = ?2",
        vec![
          param(raw.applicant_id),
          param(expected.label()),
          param(raw.email),
          param(raw.status),
          param(raw.profile_json),
          param(raw.updated_at),
        ],
      )
      .await
  }

  async fn transition(
    &self,
    id: ApplicantId,
    from: UserStatus,
    to: UserStatus,
  ) -> Result<Option<ApplicantRecord>> {
    let updated = self
      .update_where(
        id.0.clone(),
        "UPDATE applicants SET status = ?3, updated_at = ?4
          WHERE applicant_id = ?1 AND status = ?2",
        vec![
          param(id.0.clone()),
          param(from.label()),
          param(to.label()),
          param(encode_dt(Utc::now())),
        ],
      )
      .await?;

    if updated.is_some() {
      tracing::info!(%id, %from, %to, "status changed");
    }
    Ok(updated)
  }

  async fn set_admin(&self, id: ApplicantId, admin: bool) -> Result<Option<ApplicantRecord>> {
    self
      .update_where(
        id.0.clone(),
        "UPDATE applicants SET admin = ?2, updated_at = ?3 WHERE applicant_id = ?1",
        vec![
          param(id.0.clone()),
          param(admin),
          param(encode_dt(Utc::now())),
        ],
      )
      .await
  }

  async fn put_all(&self, records: Vec<ApplicantRecord>) -> Result<usize> {
    let raws = records.iter().map(RawRecord::encode).collect::<Result<Vec<_>>>()?;

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(&format!(
            "INSERT INTO applicants ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT (applicant_id) DO UPDATE SET
               email        = excluded.email,
               status       = excluded.status,
               admin        = excluded.admin,
               profile_json = excluded.profile_json,
               created_at   = excluded.created_at,
               updated_at   = excluded.updated_at"
          ))?;
          for raw in &raws {
            stmt.execute(rusqlite::params![
              raw.applicant_id,
              raw.email,
              raw.status,
              raw.admin,
              raw.profile_json,
              raw.created_at,
              raw.updated_at,
            ])?;
          }
        }
        // Dropping `tx` on an early return rolls the whole batch back.
        tx.commit()?;
        Ok(raws.len())
      })
      .await?;

    tracing::info!(written, "wrote applicant batch");
    Ok(written)
  }
}
