//! v001 -- Initial schema creation.
//!
//! Creates the four tables: `cars`, `blog_posts`, `contact_messages` and
//! `users`. Column names are the snake_case form of the entity field names.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Cars
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS cars (
    id           TEXT PRIMARY KEY NOT NULL,   -- UUID v4
    brand        TEXT NOT NULL,
    model        TEXT NOT NULL,
    year         INTEGER NOT NULL,
    description  TEXT NOT NULL,
    image        TEXT NOT NULL,
    engine       TEXT NOT NULL,
    power        TEXT NOT NULL,               -- display string, e.g. "300hp"
    acceleration TEXT NOT NULL,
    consumption  TEXT NOT NULL,
    drive_type   TEXT NOT NULL,
    category     TEXT NOT NULL,
    video_url    TEXT,
    reliability  INTEGER NOT NULL DEFAULT 3
);

CREATE INDEX IF NOT EXISTS idx_cars_category ON cars(category);

-- ----------------------------------------------------------------
-- Blog posts
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS blog_posts (
    id       TEXT PRIMARY KEY NOT NULL,       -- UUID v4
    title    TEXT NOT NULL,
    content  TEXT NOT NULL,
    author   TEXT NOT NULL,
    date     TEXT NOT NULL,                   -- author supplied
    image    TEXT NOT NULL,
    category TEXT NOT NULL,
    excerpt  TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Contact messages
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS contact_messages (
    id      TEXT PRIMARY KEY NOT NULL,        -- UUID v4
    name    TEXT NOT NULL,
    email   TEXT NOT NULL,
    message TEXT NOT NULL,
    date    TEXT NOT NULL                     -- RFC-3339, set on insert
);

-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id         TEXT PRIMARY KEY NOT NULL,     -- UUID v4
    email      TEXT NOT NULL UNIQUE,
    password   TEXT NOT NULL,                 -- Argon2id PHC string
    name       TEXT NOT NULL,
    role       TEXT NOT NULL DEFAULT 'user',
    created_at TEXT NOT NULL                  -- RFC-3339, set on insert
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
