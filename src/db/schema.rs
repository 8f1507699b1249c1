//! SQL text for the `test_data` table, one set per dialect.
//! Every statement is safe to run repeatedly.

/// PostgreSQL:
/// - `id` SERIAL (int4), widened to BIGINT when read
/// - `created_at` defaults to the insertion time
pub const POSTGRES_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS test_data (
    id SERIAL PRIMARY KEY,
    message TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Transaction-scoped advisory lock serialising the check-and-insert below.
/// The key is an arbitrary constant reserved for `test_data`.
pub const POSTGRES_INSERT_LOCK: &str = "SELECT pg_advisory_xact_lock(7301001)";

pub const POSTGRES_INSERT_IF_ABSENT: &str = r#"
INSERT INTO test_data (message)
SELECT $1::TEXT
WHERE NOT EXISTS (SELECT 1 FROM test_data WHERE message = $1::TEXT)
"#;

pub const POSTGRES_SELECT_RECENT: &str = r#"
SELECT id::BIGINT AS id, message, created_at
FROM test_data
ORDER BY created_at DESC, id DESC
LIMIT $1
"#;

/// SQLite: millisecond timestamps stored as text so ordering stays stable
/// within the same second.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS test_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    message TEXT,
    created_at TIMESTAMP DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
)
"#;

pub const SQLITE_INSERT_IF_ABSENT: &str = r#"
INSERT INTO test_data (message)
SELECT ?
WHERE NOT EXISTS (SELECT 1 FROM test_data WHERE message = ?)
"#;

pub const SQLITE_SELECT_RECENT: &str = r#"
SELECT id, message, created_at
FROM test_data
ORDER BY created_at DESC, id DESC
LIMIT ?
"#;
