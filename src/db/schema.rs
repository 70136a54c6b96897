//! Database schema and migrations for CloudVault.
//!
//! Migrations are applied sequentially when the database is opened.
//! The schema_version table tracks which migrations have been applied.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: Users table for authentication
    r#"
-- Users table for authentication and account management
CREATE TABLE users (
    id              BLOB PRIMARY KEY,        -- UUID
    name            TEXT NOT NULL,
    email           TEXT NOT NULL UNIQUE,    -- case-sensitive exact match
    password_hash   TEXT NOT NULL,           -- Argon2id PHC string
    created_at      TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_users_email ON users(email);
"#,
    // v2: Folders table
    r#"
CREATE TABLE folders (
    id          BLOB PRIMARY KEY,
    name        TEXT NOT NULL,
    parent_id   BLOB REFERENCES folders(id) ON DELETE CASCADE,
    owner_id    BLOB NOT NULL REFERENCES users(id),
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_folders_owner_id ON folders(owner_id);
CREATE INDEX idx_folders_parent_id ON folders(parent_id);
"#,
    // v3: Files table (metadata only; bytes live in object storage)
    r#"
CREATE TABLE files (
    id          BLOB PRIMARY KEY,
    name        TEXT NOT NULL,
    mime_type   TEXT,
    size        INTEGER NOT NULL DEFAULT 0,
    owner_id    BLOB NOT NULL REFERENCES users(id),
    folder_id   BLOB REFERENCES folders(id) ON DELETE SET NULL,
    is_starred  INTEGER NOT NULL DEFAULT 0,
    is_deleted  INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_files_owner_id ON files(owner_id);
CREATE INDEX idx_files_folder_id ON files(folder_id);
"#,
    // v4: Share grants; one grant per (resource, user) pair
    r#"
CREATE TABLE shares (
    id          BLOB PRIMARY KEY,
    file_id     BLOB REFERENCES files(id) ON DELETE CASCADE,
    folder_id   BLOB REFERENCES folders(id) ON DELETE CASCADE,
    user_id     BLOB NOT NULL REFERENCES users(id),
    role        TEXT NOT NULL,               -- 'owner', 'editor', 'viewer'
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    CHECK ((file_id IS NULL) <> (folder_id IS NULL))
);

CREATE UNIQUE INDEX idx_shares_file_user ON shares(file_id, user_id)
    WHERE file_id IS NOT NULL;
CREATE UNIQUE INDEX idx_shares_folder_user ON shares(folder_id, user_id)
    WHERE folder_id IS NOT NULL;
"#,
    // v5: Public links; token-gated, optionally password/time limited
    r#"
CREATE TABLE public_links (
    id            BLOB PRIMARY KEY,
    token         TEXT NOT NULL UNIQUE,
    file_id       BLOB REFERENCES files(id) ON DELETE CASCADE,
    folder_id     BLOB REFERENCES folders(id) ON DELETE CASCADE,
    password_hash TEXT,                      -- Argon2id PHC string
    expires_at    TEXT,
    created_at    TEXT NOT NULL DEFAULT (datetime('now')),
    CHECK ((file_id IS NULL) <> (folder_id IS NULL))
);

CREATE INDEX idx_public_links_token ON public_links(token);
"#,
];
