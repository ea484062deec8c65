use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A movie a user intends to watch later; at most one per (user, movie)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct WatchlistItem {
    pub id: i64,
    pub user_id: i64,
    pub movie_id: i64,
    pub timestamp: DateTime<Utc>,
}
