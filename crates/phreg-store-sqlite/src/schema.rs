//! SQL schema for the registration store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA busy_timeout = 5000;

-- One row per applicant. The profile document is stored as JSON; the
-- columns that are filtered or constrained on are lifted out of it.
CREATE TABLE IF NOT EXISTS applicants (
    applicant_id  TEXT PRIMARY KEY,           -- external identity subject
    email         TEXT NOT NULL UNIQUE,       -- trimmed, lowercased
    status        TEXT NOT NULL CHECK (status IN (
                    'Profile Pending', 'Admission Pending', 'Confirmation Pending',
                    'Denied', 'Confirmed', 'Checked In')),
    admin         INTEGER NOT NULL DEFAULT 0,
    profile_json  TEXT NOT NULL,
    created_at    TEXT NOT NULL,              -- ISO 8601 UTC
    updated_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS applicants_status_idx ON applicants(status);

PRAGMA user_version = 1;
";
