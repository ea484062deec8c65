use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    error::AppResult,
    models::{Movie, NewMovie, NewUser, Swipe, SwipeAction, TableCounts, User, WatchlistItem},
};

use super::{schema, sqlite};

/// Handle to the relational store
///
/// Cloning is cheap; every clone shares the same pool. Each operation
/// borrows a connection for its own duration only.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens the database at `database_url`
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let pool = sqlite::create_pool(database_url).await?;
        Ok(Self { pool })
    }

    /// Opens a private in-memory database with the schema already created
    pub async fn in_memory() -> AppResult<Self> {
        let store = Self::connect(sqlite::IN_MEMORY_URL).await?;
        store.initialize_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn initialize_schema(&self) -> AppResult<()> {
        schema::initialize_schema(&self.pool).await
    }

    /// Cheap round trip used for liveness checks
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn counts(&self) -> AppResult<TableCounts> {
        let mut conn = self.pool.acquire().await?;
        count_all(&mut conn).await
    }

    pub async fn insert_user(&self, user: &NewUser) -> AppResult<i64> {
        let mut conn = self.pool.acquire().await?;
        insert_user(&mut conn, user).await
    }

    pub async fn insert_movie(&self, movie: &NewMovie) -> AppResult<i64> {
        let mut conn = self.pool.acquire().await?;
        insert_movie(&mut conn, movie).await
    }

    pub async fn insert_swipe(
        &self,
        user_id: i64,
        movie_id: i64,
        action: SwipeAction,
        timestamp: DateTime<Utc>,
    ) -> AppResult<i64> {
        let mut conn = self.pool.acquire().await?;
        insert_swipe(&mut conn, user_id, movie_id, action, timestamp).await
    }

    pub async fn insert_watchlist_item(
        &self,
        user_id: i64,
        movie_id: i64,
        timestamp: DateTime<Utc>,
    ) -> AppResult<i64> {
        let mut conn = self.pool.acquire().await?;
        insert_watchlist_item(&mut conn, user_id, movie_id, timestamp).await
    }

    pub async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_movie_by_tmdb_id(&self, tmdb_id: i64) -> AppResult<Option<Movie>> {
        let mut conn = self.pool.acquire().await?;
        find_movie_by_tmdb_id(&mut conn, tmdb_id).await
    }

    pub async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(
            "SELECT id, tmdb_id, title, overview, poster_url, release_year, genres_json FROM movies ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(movies)
    }

    pub async fn swipes_for_user(&self, user_id: i64) -> AppResult<Vec<Swipe>> {
        let swipes = sqlx::query_as::<_, Swipe>(
            "SELECT id, user_id, movie_id, action, timestamp FROM swipes WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(swipes)
    }

    pub async fn watchlist_for_user(&self, user_id: i64) -> AppResult<Vec<WatchlistItem>> {
        let items = sqlx::query_as::<_, WatchlistItem>(
            "SELECT id, user_id, movie_id, timestamp FROM watchlist_items WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }
}

// Connection-level queries. These run on a plain connection or inside a
// caller's transaction (`&mut *tx`).

pub async fn count_all(conn: &mut SqliteConnection) -> AppResult<TableCounts> {
    Ok(TableCounts {
        users: count_rows(conn, "users").await?,
        movies: count_rows(conn, "movies").await?,
        swipes: count_rows(conn, "swipes").await?,
        watchlist_items: count_rows(conn, "watchlist_items").await?,
    })
}

async fn count_rows(conn: &mut SqliteConnection, table: &'static str) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

pub async fn insert_user(conn: &mut SqliteConnection, user: &NewUser) -> AppResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (name, email, password_hash, created_at) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.created_at)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

pub async fn insert_movie(conn: &mut SqliteConnection, movie: &NewMovie) -> AppResult<i64> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO movies (tmdb_id, title, overview, poster_url, release_year, genres_json)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(movie.tmdb_id)
    .bind(&movie.title)
    .bind(&movie.overview)
    .bind(&movie.poster_url)
    .bind(movie.release_year)
    .bind(movie.genres_json()?)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

/// Records a swipe; a repeat swipe by the same user on the same movie
/// replaces the earlier action and timestamp.
pub async fn insert_swipe(
    conn: &mut SqliteConnection,
    user_id: i64,
    movie_id: i64,
    action: SwipeAction,
    timestamp: DateTime<Utc>,
) -> AppResult<i64> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO swipes (user_id, movie_id, action, timestamp)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id, movie_id) DO UPDATE SET
            action = excluded.action,
            timestamp = excluded.timestamp
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(movie_id)
    .bind(action)
    .bind(timestamp)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

/// Adds a movie to a user's watchlist; adding it twice returns the existing
/// row's id.
pub async fn insert_watchlist_item(
    conn: &mut SqliteConnection,
    user_id: i64,
    movie_id: i64,
    timestamp: DateTime<Utc>,
) -> AppResult<i64> {
    let inserted: Option<i64> = sqlx::query_scalar(
        r#"
        INSERT INTO watchlist_items (user_id, movie_id, timestamp)
        VALUES (?, ?, ?)
        ON CONFLICT(user_id, movie_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(movie_id)
    .bind(timestamp)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(id) = inserted {
        return Ok(id);
    }

    let id: i64 =
        sqlx::query_scalar("SELECT id FROM watchlist_items WHERE user_id = ? AND movie_id = ?")
            .bind(user_id)
            .bind(movie_id)
            .fetch_one(&mut *conn)
            .await?;
    Ok(id)
}

pub async fn find_movie_by_tmdb_id(
    conn: &mut SqliteConnection,
    tmdb_id: i64,
) -> AppResult<Option<Movie>> {
    let movie = sqlx::query_as::<_, Movie>(
        "SELECT id, tmdb_id, title, overview, poster_url, release_year, genres_json FROM movies WHERE tmdb_id = ?",
    )
    .bind(tmdb_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(movie)
}
