//! Database schema and migrations for accountd.
//!
//! Migrations are applied sequentially when the database is opened; the
//! schema_version table tracks which ones have run.

/// Database migrations (SQLite flavor).
#[cfg(feature = "sqlite")]
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - users table
    r#"
-- Users table for account identity and credentials
CREATE TABLE users (
    id                              INTEGER PRIMARY KEY AUTOINCREMENT,
    name                            TEXT NOT NULL,
    email                           TEXT NOT NULL UNIQUE,    -- stored lowercased
    password                        TEXT NOT NULL,           -- Argon2 hash
    role                            TEXT NOT NULL DEFAULT 'user',  -- 'user', 'admin', 'moderator'
    is_active                       INTEGER NOT NULL DEFAULT 1,
    is_email_verified               INTEGER NOT NULL DEFAULT 0,
    email_verification_token        TEXT,                    -- SHA-256 hex of raw token
    email_verification_expires_at   TEXT,
    password_reset_token            TEXT,                    -- SHA-256 hex of raw token
    password_reset_expires_at       TEXT,
    refresh_token                   TEXT,                    -- most recently issued refresh token
    created_at                      TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at                      TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_users_email ON users(email);
CREATE INDEX idx_users_password_reset_token ON users(password_reset_token);
CREATE INDEX idx_users_email_verification_token ON users(email_verification_token);
"#,
];

/// Database migrations (PostgreSQL flavor).
#[cfg(feature = "postgres")]
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - users table
    r#"
-- Users table for account identity and credentials
CREATE TABLE users (
    id                              BIGSERIAL PRIMARY KEY,
    name                            TEXT NOT NULL,
    email                           TEXT NOT NULL UNIQUE,    -- stored lowercased
    password                        TEXT NOT NULL,           -- Argon2 hash
    role                            TEXT NOT NULL DEFAULT 'user',  -- 'user', 'admin', 'moderator'
    is_active                       BOOLEAN NOT NULL DEFAULT TRUE,
    is_email_verified               BOOLEAN NOT NULL DEFAULT FALSE,
    email_verification_token        TEXT,                    -- SHA-256 hex of raw token
    email_verification_expires_at   TEXT,
    password_reset_token            TEXT,                    -- SHA-256 hex of raw token
    password_reset_expires_at       TEXT,
    refresh_token                   TEXT,                    -- most recently issued refresh token
    created_at                      TEXT NOT NULL DEFAULT TO_CHAR(NOW(), 'YYYY-MM-DD HH24:MI:SS'),
    updated_at                      TEXT NOT NULL DEFAULT TO_CHAR(NOW(), 'YYYY-MM-DD HH24:MI:SS')
);

CREATE INDEX idx_users_email ON users(email);
CREATE INDEX idx_users_password_reset_token ON users(password_reset_token);
CREATE INDEX idx_users_email_verification_token ON users(email_verification_token);
"#,
];
