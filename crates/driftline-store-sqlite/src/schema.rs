//! SQL schema for the Driftline SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Written by ingestion; the rebuild only reads this table.
CREATE TABLE IF NOT EXISTS articles (
    article_id           INTEGER PRIMARY KEY AUTOINCREMENT,
    title                TEXT,
    summary              TEXT,
    website              TEXT,
    content              TEXT,
    keywords             TEXT    NOT NULL DEFAULT '[]',  -- JSON array
    date                 TEXT,                          -- YYYY-MM-DD
    number_dead          INTEGER,
    number_missing       INTEGER,
    number_survivors     INTEGER,
    country_of_origin    TEXT,
    region_of_origin     TEXT,
    cause_of_death       TEXT,
    region_of_incident   TEXT,
    country_of_incident  TEXT,
    location_of_incident TEXT,
    latitude             REAL,
    longitude            REAL,
    relevant             INTEGER NOT NULL DEFAULT 1
);

-- Recreated by every rebuild. AUTOINCREMENT keeps ids from being reused
-- after a wipe.
CREATE TABLE IF NOT EXISTS incidents (
    incident_id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title                TEXT,
    verified             INTEGER NOT NULL DEFAULT 0,
    date                 TEXT,
    number_dead          INTEGER,
    number_missing       INTEGER,
    number_survivors     INTEGER,
    country_of_origin    TEXT,
    region_of_origin     TEXT,
    cause_of_death       TEXT,
    region_of_incident   TEXT,
    country_of_incident  TEXT,
    location_of_incident TEXT,
    latitude             REAL,
    longitude            REAL
);

CREATE TABLE IF NOT EXISTS mapping (
    incident_id INTEGER NOT NULL REFERENCES incidents(incident_id),
    article_id  INTEGER NOT NULL REFERENCES articles(article_id),
    PRIMARY KEY (incident_id, article_id)
);

CREATE INDEX IF NOT EXISTS mapping_article_idx ON mapping(article_id);
CREATE INDEX IF NOT EXISTS articles_date_idx   ON articles(date);

PRAGMA user_version = 1;
";
