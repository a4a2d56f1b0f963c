//! Database schema definitions
//!
//! This module contains the SQL schema for the SQLite record store.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track crawl runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    records_written INTEGER NOT NULL DEFAULT 0
);

-- Captured catalog records, one row per listing id
CREATE TABLE IF NOT EXISTS records (
    id TEXT PRIMARY KEY NOT NULL CHECK (id <> ''),
    url TEXT NOT NULL,
    title TEXT NOT NULL,
    info TEXT NOT NULL,
    price TEXT NOT NULL,
    model TEXT NOT NULL,
    registration_date TEXT NOT NULL,
    transmission TEXT NOT NULL,
    color TEXT NOT NULL,
    manufacturer_year TEXT NOT NULL,
    mileage TEXT NOT NULL,
    fuel TEXT NOT NULL,
    identifier_plate TEXT NOT NULL,
    accident_history TEXT NOT NULL,
    features TEXT NOT NULL,
    image_urls TEXT NOT NULL,
    captured_at TEXT NOT NULL
);
"#;

/// Insert statement matching the column order of [`crate::extract::RECORD_COLUMNS`]
pub const INSERT_RECORD_SQL: &str = "INSERT OR IGNORE INTO records (
    id, url, title, info, price, model, registration_date, transmission, color,
    manufacturer_year, mileage, fuel, identifier_plate, accident_history, features,
    image_urls, captured_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)";

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
