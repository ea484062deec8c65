mod movie;
mod swipe;
mod user;
mod watchlist;

pub use movie::*;
pub use swipe::*;
pub use user::*;
pub use watchlist::*;

use serde::Serialize;

/// Row counts for each persisted entity set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub users: i64,
    pub movies: i64,
    pub swipes: i64,
    pub watchlist_items: i64,
}

impl TableCounts {
    pub fn is_empty(&self) -> bool {
        self.users == 0 && self.movies == 0 && self.swipes == 0 && self.watchlist_items == 0
    }
}
