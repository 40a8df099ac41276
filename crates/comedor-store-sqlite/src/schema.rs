//! SQL schema for the Comedor SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS guests (
    id              TEXT PRIMARY KEY,
    external_id     TEXT NOT NULL UNIQUE,
    first_name      TEXT NOT NULL,
    last_name       TEXT NOT NULL,
    full_name       TEXT NOT NULL,
    preferred_name  TEXT,
    housing_status  TEXT NOT NULL,
    age_group       TEXT NOT NULL,
    gender          TEXT NOT NULL
);

-- Attendance rows are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS meal_attendance (
    id          TEXT PRIMARY KEY,
    guest_id    TEXT REFERENCES guests(id),  -- NULL for unattributed categories
    meal_type   TEXT NOT NULL,
    quantity    INTEGER NOT NULL,
    served_on   TEXT NOT NULL,   -- ISO 8601 calendar date
    recorded_at TEXT NOT NULL,   -- ISO 8601 UTC; store-assigned
    notes       TEXT
);

-- One guest-category meal per guest per service date. The insert itself is
-- the duplicate check: a violation of this index is the conflict signal.
CREATE UNIQUE INDEX IF NOT EXISTS meal_attendance_guest_day
    ON meal_attendance(guest_id, served_on)
    WHERE meal_type = 'guest';

CREATE INDEX IF NOT EXISTS meal_attendance_served_idx
    ON meal_attendance(served_on, meal_type);

CREATE INDEX IF NOT EXISTS guests_full_name_idx ON guests(full_name);

PRAGMA user_version = 1;
";
