use std::{
    collections::{hash_map::Entry, BTreeMap, HashMap},
    fs::File,
    io::Read,
    path::Path,
    sync::OnceLock,
};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    db::{
        store::{insert_movie, insert_swipe, insert_user},
        Store,
    },
    error::AppResult,
    models::{NewMovie, NewUser, SwipeAction},
};

use super::{clear_all, PasswordHasher};

/// Genre placeholder MovieLens uses for uncategorised movies
pub const NO_GENRES_SENTINEL: &str = "(no genres listed)";

pub const MOVIES_FILE: &str = "movies.csv";
pub const LINKS_FILE: &str = "links.csv";
pub const RATINGS_FILE: &str = "ratings.csv";

/// The three tables of a MovieLens export
pub struct ImportSources<M, L, R> {
    pub movies: M,
    pub links: L,
    pub ratings: R,
}

impl ImportSources<File, File, File> {
    pub fn open(movies: &Path, links: &Path, ratings: &Path) -> AppResult<Self> {
        Ok(Self {
            movies: File::open(movies)?,
            links: File::open(links)?,
            ratings: File::open(ratings)?,
        })
    }

    /// Opens `movies.csv`, `links.csv` and `ratings.csv` from one directory
    pub fn open_dir(dir: &Path) -> AppResult<Self> {
        Self::open(
            &dir.join(MOVIES_FILE),
            &dir.join(LINKS_FILE),
            &dir.join(RATINGS_FILE),
        )
    }
}

/// What an import run inserted and what it skipped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub movies_imported: usize,
    /// Movies with no tmdb id in the link table
    pub movies_unlinked: usize,
    /// Movies whose tmdb id was already imported in this run
    pub movies_duplicate: usize,
    pub users_imported: usize,
    pub swipes_imported: usize,
    /// Ratings strictly between the dislike and like thresholds
    pub ratings_neutral: usize,
    /// Ratings whose movie did not resolve to an imported movie
    pub ratings_unresolved: usize,
    /// Decisive ratings replaced by another rating of the same rater for
    /// the same movie
    pub ratings_superseded: usize,
    /// Rows in any table that failed to parse
    pub malformed_rows: usize,
}

#[derive(Debug, Deserialize)]
struct MovieRecord {
    #[serde(rename = "movieId")]
    movie_id: i64,
    title: String,
    genres: String,
}

#[derive(Debug, Deserialize)]
struct LinkRecord {
    #[serde(rename = "movieId")]
    movie_id: i64,
    #[serde(rename = "tmdbId")]
    tmdb_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RatingRecord {
    #[serde(rename = "userId")]
    user_id: i64,
    #[serde(rename = "movieId")]
    movie_id: i64,
    rating: f64,
    timestamp: i64,
}

/// The newest decisive rating of one rater for one tmdb id
struct PendingSwipe {
    row: usize,
    action: SwipeAction,
    timestamp: DateTime<Utc>,
}

fn trailing_year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\((\d{4})\)\s*$").expect("valid year regex"))
}

/// Splits a trailing `(YYYY)` off a catalog title.
///
/// Returns the remaining title and the year, or the trimmed title and 0 when
/// there is no such parenthetical.
pub fn split_title_year(raw: &str) -> (String, i32) {
    let raw = raw.trim();
    match trailing_year_regex().captures(raw) {
        Some(caps) => {
            let year = caps[1].parse().unwrap_or(0);
            let start = caps.get(0).map(|m| m.start()).unwrap_or(raw.len());
            let title = raw[..start].trim_end();
            if title.is_empty() {
                (raw.to_string(), year)
            } else {
                (title.to_string(), year)
            }
        }
        None => (raw.to_string(), 0),
    }
}

/// Splits a pipe-delimited genre list, dropping empties and the
/// "no genres" placeholder
pub fn parse_genres(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty() && *g != NO_GENRES_SENTINEL)
        .map(str::to_string)
        .collect()
}

/// Email given to the user created for a MovieLens rater
pub fn movielens_user_email(movielens_user: i64) -> String {
    format!("movielens-{}@example.com", movielens_user)
}

/// Streams every well-formed row into `f`; rows that fail to parse are
/// skipped and counted. I/O failures abort.
fn for_each_record<T, S, F>(source: S, table: &'static str, mut f: F) -> AppResult<usize>
where
    T: DeserializeOwned,
    S: Read,
    F: FnMut(usize, T),
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut parsed = 0;
    let mut malformed = 0;
    for (index, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(record) => {
                parsed += 1;
                f(index + 1, record);
            }
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                malformed += 1;
                tracing::debug!(table, row = index + 1, error = %e, "Skipping malformed row");
            }
        }
    }

    if parsed == 0 && malformed > 0 {
        tracing::warn!(table, malformed, "No usable rows; check the header line");
    }

    Ok(malformed)
}

/// Replaces the store's content with a MovieLens export.
///
/// Movies are keyed by their tmdb id; movies without one are skipped.
/// Ratings of 4.0 and above become likes, 2.0 and below dislikes, and each
/// rater with at least one swipe becomes a user whose password hash is
/// computed once from `user_password`. When a rater has several decisive
/// ratings for the same tmdb id, the newest one wins.
///
/// Ratings are streamed, but the decisive ones are held in memory until the
/// movies are written, one small entry per (rater, movie).
pub async fn seed_from_import<M, L, R>(
    store: &Store,
    sources: ImportSources<M, L, R>,
    hasher: &dyn PasswordHasher,
    user_password: &str,
) -> AppResult<ImportSummary>
where
    M: Read,
    L: Read,
    R: Read,
{
    let mut summary = ImportSummary::default();

    // Parse everything before touching the store so an unreadable source
    // leaves the existing content alone.
    let mut tmdb_by_movielens: HashMap<i64, i64> = HashMap::new();
    let malformed = for_each_record(sources.links, LINKS_FILE, |_, link: LinkRecord| {
        if let Some(tmdb_id) = link.tmdb_id {
            tmdb_by_movielens.insert(link.movie_id, tmdb_id);
        }
    })?;
    summary.malformed_rows += malformed;

    let mut movies: Vec<MovieRecord> = Vec::new();
    let malformed = for_each_record(sources.movies, MOVIES_FILE, |_, record| movies.push(record))?;
    summary.malformed_rows += malformed;

    let mut pending: HashMap<(i64, i64), PendingSwipe> = HashMap::new();
    let malformed = for_each_record(
        sources.ratings,
        RATINGS_FILE,
        |row, record: RatingRecord| {
            let Some(action) = SwipeAction::from_rating(record.rating) else {
                summary.ratings_neutral += 1;
                return;
            };
            let Some(&tmdb_id) = tmdb_by_movielens.get(&record.movie_id) else {
                summary.ratings_unresolved += 1;
                tracing::debug!(movie_id = record.movie_id, "Skipping rating for unlinked movie");
                return;
            };
            let Some(timestamp) = DateTime::<Utc>::from_timestamp(record.timestamp, 0) else {
                summary.malformed_rows += 1;
                tracing::debug!(row, timestamp = record.timestamp, "Skipping rating with invalid timestamp");
                return;
            };

            let candidate = PendingSwipe {
                row,
                action,
                timestamp,
            };
            match pending.entry((record.user_id, tmdb_id)) {
                Entry::Vacant(slot) => {
                    slot.insert(candidate);
                }
                Entry::Occupied(mut slot) => {
                    summary.ratings_superseded += 1;
                    if candidate.timestamp >= slot.get().timestamp {
                        slot.insert(candidate);
                    }
                }
            }
        },
    )?;
    summary.malformed_rows += malformed;

    clear_all(store).await?;

    let mut local_by_tmdb: HashMap<i64, i64> = HashMap::new();
    let mut tx = store.pool().begin().await?;
    for record in movies {
        let Some(&tmdb_id) = tmdb_by_movielens.get(&record.movie_id) else {
            summary.movies_unlinked += 1;
            tracing::debug!(movie_id = record.movie_id, "Skipping movie without tmdb id");
            continue;
        };
        if local_by_tmdb.contains_key(&tmdb_id) {
            summary.movies_duplicate += 1;
            tracing::debug!(movie_id = record.movie_id, tmdb_id, "Skipping duplicate tmdb id");
            continue;
        }

        let (title, release_year) = split_title_year(&record.title);
        let movie = NewMovie::bare(tmdb_id, title, release_year, parse_genres(&record.genres));
        let id = insert_movie(&mut *tx, &movie).await?;
        local_by_tmdb.insert(tmdb_id, id);
    }
    tx.commit().await?;
    summary.movies_imported = local_by_tmdb.len();
    tracing::info!(count = summary.movies_imported, "Imported movies");

    // Linked to a tmdb id that never appeared in the movie table.
    let before = pending.len();
    pending.retain(|(_, tmdb_id), _| local_by_tmdb.contains_key(tmdb_id));
    summary.ratings_unresolved += before - pending.len();

    let mut swipes: Vec<(i64, i64, PendingSwipe)> = pending
        .into_iter()
        .map(|((movielens_user, tmdb_id), swipe)| (movielens_user, local_by_tmdb[&tmdb_id], swipe))
        .collect();
    swipes.sort_by_key(|(_, _, swipe)| swipe.row);

    let mut user_ids: BTreeMap<i64, i64> = swipes.iter().map(|(user, _, _)| (*user, 0)).collect();
    if !user_ids.is_empty() {
        let password_hash = hasher.hash(user_password)?;
        let mut tx = store.pool().begin().await?;
        for (movielens_user, local_id) in user_ids.iter_mut() {
            let user = NewUser::new(
                format!("MovieLens user {}", movielens_user),
                movielens_user_email(*movielens_user),
                password_hash.clone(),
            );
            *local_id = insert_user(&mut *tx, &user).await?;
        }
        tx.commit().await?;
    }
    summary.users_imported = user_ids.len();
    tracing::info!(count = summary.users_imported, "Imported users");

    let mut tx = store.pool().begin().await?;
    for (movielens_user, movie_id, swipe) in &swipes {
        let user_id = user_ids[movielens_user];
        insert_swipe(&mut *tx, user_id, *movie_id, swipe.action, swipe.timestamp).await?;
    }
    tx.commit().await?;
    summary.swipes_imported = swipes.len();

    tracing::info!(
        movies = summary.movies_imported,
        users = summary.users_imported,
        swipes = summary.swipes_imported,
        unlinked = summary.movies_unlinked,
        neutral = summary.ratings_neutral,
        unresolved = summary.ratings_unresolved,
        superseded = summary.ratings_superseded,
        malformed = summary.malformed_rows,
        "MovieLens import complete"
    );

    Ok(summary)
}
