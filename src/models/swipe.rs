use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// A user's judgment of a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SwipeAction {
    Like,
    Dislike,
}

impl SwipeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeAction::Like => "like",
            SwipeAction::Dislike => "dislike",
        }
    }

    /// Maps a MovieLens star rating (0.5 to 5.0) onto a swipe.
    ///
    /// Ratings strictly between 2.0 and 4.0 carry no clear sentiment and
    /// yield `None`.
    pub fn from_rating(rating: f64) -> Option<Self> {
        if rating >= 4.0 {
            Some(SwipeAction::Like)
        } else if rating <= 2.0 {
            Some(SwipeAction::Dislike)
        } else {
            None
        }
    }
}

impl Display for SwipeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SwipeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(SwipeAction::Like),
            "dislike" => Ok(SwipeAction::Dislike),
            other => Err(format!("unknown swipe action: {}", other)),
        }
    }
}

/// One recorded swipe; at most one per (user, movie)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Swipe {
    pub id: i64,
    pub user_id: i64,
    pub movie_id: i64,
    pub action: SwipeAction,
    pub timestamp: DateTime<Utc>,
}
