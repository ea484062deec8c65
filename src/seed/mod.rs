//! Destructive seeding of the store, either from a built-in fixture or from
//! a MovieLens CSV export.

pub mod fixture;
pub mod movielens;

use serde::Serialize;

use crate::{
    db::Store,
    error::AppResult,
    models::TableCounts,
};

pub use fixture::seed_fixture;
pub use movielens::{seed_from_import, ImportSources, ImportSummary};

/// Tables in deletion order, children before parents
const CLEAR_ORDER: &[&str] = &["watchlist_items", "swipes", "movies", "users"];

/// One-way password hashing used when seeding users
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> AppResult<String>;
}

/// bcrypt with a configurable work factor
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> AppResult<String> {
        Ok(bcrypt::hash(password, self.cost)?)
    }
}

/// Row counts after a seed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub counts: TableCounts,
}

/// Deletes every row from every table in one transaction.
///
/// Nothing is committed unless all four deletions succeed.
pub async fn clear_all(store: &Store) -> AppResult<()> {
    let mut tx = store.pool().begin().await?;
    for table in CLEAR_ORDER {
        let result = sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await?;
        tracing::debug!(table = %table, rows = result.rows_affected(), "Cleared table");
    }
    tx.commit().await?;

    tracing::info!("Database cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewMovie, NewUser, SwipeAction};
    use chrono::Utc;

    #[tokio::test]
    async fn test_clear_all_empties_every_table() {
        let store = Store::in_memory().await.unwrap();
        let user_id = store
            .insert_user(&NewUser::new("u", "u@example.com", "h".to_string()))
            .await
            .unwrap();
        let movie_id = store
            .insert_movie(&NewMovie::bare(1, "M", 2000, vec![]))
            .await
            .unwrap();
        store
            .insert_swipe(user_id, movie_id, SwipeAction::Like, Utc::now())
            .await
            .unwrap();
        store
            .insert_watchlist_item(user_id, movie_id, Utc::now())
            .await
            .unwrap();

        clear_all(&store).await.unwrap();

        assert!(store.counts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_all_on_empty_store() {
        let store = Store::in_memory().await.unwrap();
        clear_all(&store).await.unwrap();
        assert!(store.counts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_clear_rolls_back() {
        let store = Store::in_memory().await.unwrap();
        store
            .insert_user(&NewUser::new("u", "u@example.com", "h".to_string()))
            .await
            .unwrap();
        store
            .insert_movie(&NewMovie::bare(1, "M", 2000, vec![]))
            .await
            .unwrap();
        sqlx::query(
            "CREATE TRIGGER lock_users BEFORE DELETE ON users BEGIN SELECT RAISE(ABORT, 'users are locked'); END",
        )
        .execute(store.pool())
        .await
        .unwrap();

        // `movies` is emptied inside the transaction before `users` fails.
        assert!(clear_all(&store).await.is_err());

        let counts = store.counts().await.unwrap();
        assert_eq!(counts.movies, 1);
        assert_eq!(counts.users, 1);
    }

    #[test]
    fn test_bcrypt_hasher_produces_verifiable_hash() {
        let hash = BcryptHasher::new(4).hash("password123").unwrap();
        assert!(bcrypt::verify("password123", &hash).unwrap());
    }
}
