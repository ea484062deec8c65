//! Database schema definitions

use sqlx::SqlitePool;

use crate::error::AppResult;

/// SQL to create the users table
pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
)
"#;

/// SQL to create the movies table
pub const CREATE_MOVIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY,
    tmdb_id INTEGER NOT NULL UNIQUE,
    title TEXT NOT NULL,
    overview TEXT NOT NULL DEFAULT '',
    poster_url TEXT NOT NULL DEFAULT '',
    release_year INTEGER NOT NULL DEFAULT 0,
    genres_json TEXT NOT NULL DEFAULT '[]'
)
"#;

/// SQL to create the swipes table
pub const CREATE_SWIPES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS swipes (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id),
    movie_id INTEGER NOT NULL REFERENCES movies(id),
    action TEXT NOT NULL CHECK (action IN ('like', 'dislike')),
    timestamp TEXT NOT NULL,
    UNIQUE(user_id, movie_id)
)
"#;

/// SQL to create the watchlist_items table
pub const CREATE_WATCHLIST_ITEMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS watchlist_items (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id),
    movie_id INTEGER NOT NULL REFERENCES movies(id),
    timestamp TEXT NOT NULL,
    UNIQUE(user_id, movie_id)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_swipes_movie ON swipes(movie_id)",
    "CREATE INDEX IF NOT EXISTS idx_watchlist_items_movie ON watchlist_items(movie_id)",
];

/// Tables in dependency order, parents first
pub const TABLES: &[&str] = &["users", "movies", "swipes", "watchlist_items"];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_USERS_TABLE,
        CREATE_MOVIES_TABLE,
        CREATE_SWIPES_TABLE,
        CREATE_WATCHLIST_ITEMS_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}

/// Creates every table and index that does not exist yet.
///
/// Safe to call on an initialized database.
pub async fn initialize_schema(pool: &SqlitePool) -> AppResult<()> {
    let mut tx = pool.begin().await?;
    for stmt in all_schema_statements() {
        sqlx::query(stmt).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!(tables = TABLES.len(), "Schema initialized");
    Ok(())
}
