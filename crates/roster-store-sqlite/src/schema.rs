//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.
//!
//! One table per named collection. Participations deliberately carry no
//! foreign key to `volunteers`: volunteer records are imported from outside
//! and may disappear, leaving orphaned participations behind.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS volunteers (
    volunteer_id  TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    city          TEXT NOT NULL DEFAULT '',
    state         TEXT NOT NULL DEFAULT '',
    country       TEXT NOT NULL DEFAULT '',
    kendra        TEXT NOT NULL DEFAULT '',
    lesson_number TEXT NOT NULL DEFAULT '',
    age           INTEGER,
    gender        TEXT NOT NULL DEFAULT '',
    contact       TEXT NOT NULL DEFAULT '',
    skills        TEXT NOT NULL DEFAULT '',   -- comma-separated, free-form
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS events (
    event_id    TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    event_date  TEXT,                          -- YYYY-MM-DD or NULL
    location    TEXT NOT NULL DEFAULT '',
    mode        TEXT,                          -- 'In Person' | 'Online' | 'Hybrid'
    age_group   TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    context     TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS departments (
    department_id TEXT PRIMARY KEY,
    name          TEXT NOT NULL
);

-- Roles are not foreign-keyed to departments; a missing department renders
-- as 'Unknown'.
CREATE TABLE IF NOT EXISTS roles (
    role_id          TEXT PRIMARY KEY,
    name             TEXT NOT NULL,
    department_id    TEXT NOT NULL,
    category         TEXT NOT NULL DEFAULT '',
    responsibilities TEXT NOT NULL DEFAULT '',
    comments         TEXT NOT NULL DEFAULT '',
    preferred_skills TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    time_commitment  TEXT NOT NULL DEFAULT ''
);

-- At most one participation per (event, volunteer).
CREATE TABLE IF NOT EXISTS event_participation (
    participation_id TEXT PRIMARY KEY,
    event_id         TEXT NOT NULL REFERENCES events(event_id),
    volunteer_id     TEXT NOT NULL,
    department_id    TEXT,
    assigned_roles   TEXT NOT NULL DEFAULT '[]',   -- JSON array of role names
    status           TEXT NOT NULL DEFAULT 'Assigned',
    recorded_at      TEXT NOT NULL,                -- server-assigned
    UNIQUE (event_id, volunteer_id)
);

CREATE TABLE IF NOT EXISTS actions (
    action_id   TEXT PRIMARY KEY,
    description TEXT NOT NULL,
    owner_name  TEXT NOT NULL DEFAULT '',
    due_date    TEXT,                              -- YYYY-MM-DD or NULL
    status      TEXT NOT NULL DEFAULT 'Yet to Start',
    event_id    TEXT REFERENCES events(event_id),
    assigned_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS manual_links (
    link_id    TEXT PRIMARY KEY,
    event_id   TEXT NOT NULL REFERENCES events(event_id),
    name       TEXT NOT NULL,
    url        TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS admins (
    email TEXT PRIMARY KEY COLLATE NOCASE
);

CREATE INDEX IF NOT EXISTS participation_volunteer_idx ON event_participation(volunteer_id);
CREATE INDEX IF NOT EXISTS actions_event_idx           ON actions(event_id);
CREATE INDEX IF NOT EXISTS links_event_idx             ON manual_links(event_id);

PRAGMA user_version = 1;
";
