use std::collections::HashMap;

use chrono::Utc;

use crate::{
    db::{
        store::{insert_movie, insert_swipe, insert_watchlist_item},
        Store,
    },
    error::{AppError, AppResult},
    models::{NewMovie, NewUser, SwipeAction},
};

use super::{clear_all, PasswordHasher, SeedSummary};

pub const DEMO_USER_NAME: &str = "Test User";
pub const DEMO_USER_EMAIL: &str = "test@example.com";
pub const DEMO_USER_PASSWORD: &str = "password123";

struct FixtureMovie {
    tmdb_id: i64,
    title: &'static str,
    overview: &'static str,
    poster_url: &'static str,
    release_year: i32,
    genres: &'static [&'static str],
}

impl FixtureMovie {
    fn to_new_movie(&self) -> NewMovie {
        NewMovie {
            tmdb_id: self.tmdb_id,
            title: self.title.to_string(),
            overview: self.overview.to_string(),
            poster_url: self.poster_url.to_string(),
            release_year: self.release_year,
            genres: self.genres.iter().map(|g| g.to_string()).collect(),
        }
    }
}

const MOVIES: &[FixtureMovie] = &[
    // Modern classics
    FixtureMovie {
        tmdb_id: 1,
        title: "The Shawshank Redemption",
        overview: "Two imprisoned men bond over a number of years...",
        poster_url: "https://example.com/shawshank.jpg",
        release_year: 1994,
        genres: &["Drama"],
    },
    FixtureMovie {
        tmdb_id: 2,
        title: "The Godfather",
        overview: "The aging patriarch of an organized crime dynasty...",
        poster_url: "https://example.com/godfather.jpg",
        release_year: 1972,
        genres: &["Crime", "Drama"],
    },
    FixtureMovie {
        tmdb_id: 3,
        title: "The Dark Knight",
        overview: "When the menace known as the Joker...",
        poster_url: "https://example.com/darkknight.jpg",
        release_year: 2008,
        genres: &["Action", "Crime", "Drama"],
    },
    // Black and white
    FixtureMovie {
        tmdb_id: 4,
        title: "Casablanca",
        overview: "A cynical expatriate American cafe owner...",
        poster_url: "https://example.com/casablanca.jpg",
        release_year: 1942,
        genres: &["Drama", "Romance", "War"],
    },
    FixtureMovie {
        tmdb_id: 5,
        title: "Citizen Kane",
        overview: "Following the death of publishing tycoon Charles Foster Kane...",
        poster_url: "https://example.com/citizenkane.jpg",
        release_year: 1941,
        genres: &["Drama", "Mystery"],
    },
    FixtureMovie {
        tmdb_id: 6,
        title: "Psycho",
        overview: "A Phoenix secretary embezzles $40,000 from her employer's client...",
        poster_url: "https://example.com/psycho.jpg",
        release_year: 1960,
        genres: &["Horror", "Mystery", "Thriller"],
    },
    // Anime
    FixtureMovie {
        tmdb_id: 7,
        title: "Spirited Away",
        overview: "During her family's move to the suburbs, a sullen 10-year-old girl...",
        poster_url: "https://example.com/spiritedaway.jpg",
        release_year: 2001,
        genres: &["Animation", "Adventure", "Family", "Fantasy"],
    },
    FixtureMovie {
        tmdb_id: 8,
        title: "Akira",
        overview: "A secret military project endangers Neo-Tokyo when it turns a biker gang member...",
        poster_url: "https://example.com/akira.jpg",
        release_year: 1988,
        genres: &["Animation", "Action", "Sci-Fi"],
    },
    FixtureMovie {
        tmdb_id: 9,
        title: "Your Name",
        overview: "Two strangers find themselves linked in a bizarre way...",
        poster_url: "https://example.com/yourname.jpg",
        release_year: 2016,
        genres: &["Animation", "Drama", "Fantasy", "Romance"],
    },
    // International
    FixtureMovie {
        tmdb_id: 10,
        title: "Seven Samurai",
        overview: "A poor village under attack by bandits recruits seven unemployed samurai...",
        poster_url: "https://example.com/sevensamurai.jpg",
        release_year: 1954,
        genres: &["Action", "Adventure", "Drama"],
    },
    FixtureMovie {
        tmdb_id: 11,
        title: "The 400 Blows",
        overview: "A young boy, left without attention, delves into a life of petty crime...",
        poster_url: "https://example.com/400blows.jpg",
        release_year: 1959,
        genres: &["Crime", "Drama"],
    },
    FixtureMovie {
        tmdb_id: 12,
        title: "8½",
        overview: "A harried movie director retreats into his memories and fantasies...",
        poster_url: "https://example.com/8andhalf.jpg",
        release_year: 1963,
        genres: &["Drama", "Fantasy"],
    },
    // Recent anime
    FixtureMovie {
        tmdb_id: 13,
        title: "Demon Slayer: Mugen Train",
        overview: "Tanjiro and his comrades investigate the mysterious disappearances...",
        poster_url: "https://example.com/demonslayer.jpg",
        release_year: 2020,
        genres: &["Animation", "Action", "Adventure", "Fantasy"],
    },
    FixtureMovie {
        tmdb_id: 14,
        title: "Jujutsu Kaisen 0",
        overview: "Yuta Okkotsu gains control of an extremely powerful cursed spirit...",
        poster_url: "https://example.com/jjk0.jpg",
        release_year: 2021,
        genres: &["Animation", "Action", "Fantasy"],
    },
    FixtureMovie {
        tmdb_id: 15,
        title: "Weathering With You",
        overview: "A high-school boy who has run away to Tokyo befriends a girl...",
        poster_url: "https://example.com/weathering.jpg",
        release_year: 2019,
        genres: &["Animation", "Drama", "Fantasy", "Romance"],
    },
];

/// Demo user's swipes, keyed by tmdb id
const SWIPES: &[(i64, SwipeAction)] = &[
    (1, SwipeAction::Like),
    (2, SwipeAction::Like),
    (3, SwipeAction::Like),
    (4, SwipeAction::Like),
    (5, SwipeAction::Dislike),
    (6, SwipeAction::Like),
    (7, SwipeAction::Like),
    (8, SwipeAction::Like),
    (9, SwipeAction::Dislike),
    (10, SwipeAction::Like),
    (11, SwipeAction::Dislike),
    (12, SwipeAction::Like),
    (13, SwipeAction::Like),
    (14, SwipeAction::Like),
    (15, SwipeAction::Dislike),
];

/// Demo user's watchlist, by tmdb id
const WATCHLIST: &[i64] = &[1, 4, 7, 10, 13];

/// Replaces the store's content with the demo user, the fixture catalog,
/// and the demo user's swipes and watchlist.
pub async fn seed_fixture(store: &Store, hasher: &dyn PasswordHasher) -> AppResult<SeedSummary> {
    clear_all(store).await?;

    // Committed on its own so the generated id can be referenced below.
    let password_hash = hasher.hash(DEMO_USER_PASSWORD)?;
    let user_id = store
        .insert_user(&NewUser::new(DEMO_USER_NAME, DEMO_USER_EMAIL, password_hash))
        .await?;
    tracing::info!(user_id, email = DEMO_USER_EMAIL, "Created demo user");

    let mut movie_ids = HashMap::with_capacity(MOVIES.len());
    let mut tx = store.pool().begin().await?;
    for movie in MOVIES {
        let id = insert_movie(&mut *tx, &movie.to_new_movie()).await?;
        movie_ids.insert(movie.tmdb_id, id);
    }
    tx.commit().await?;
    tracing::info!(count = movie_ids.len(), "Inserted fixture movies");

    let resolve = |tmdb_id: i64| {
        movie_ids
            .get(&tmdb_id)
            .copied()
            .ok_or_else(|| AppError::Internal(format!("fixture references unknown tmdb id {}", tmdb_id)))
    };

    let now = Utc::now();
    let mut tx = store.pool().begin().await?;
    for &(tmdb_id, action) in SWIPES {
        insert_swipe(&mut *tx, user_id, resolve(tmdb_id)?, action, now).await?;
    }
    for &tmdb_id in WATCHLIST {
        insert_watchlist_item(&mut *tx, user_id, resolve(tmdb_id)?, now).await?;
    }
    tx.commit().await?;

    let counts = store.counts().await?;
    tracing::info!(
        users = counts.users,
        movies = counts.movies,
        swipes = counts.swipes,
        watchlist_items = counts.watchlist_items,
        "Fixture seed complete"
    );

    Ok(SeedSummary { counts })
}
