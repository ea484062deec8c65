use std::fs;

use chrono::Utc;
use movie_swipe_api::{
    db::Store,
    models::{NewMovie, NewUser, SwipeAction, TableCounts},
    seed::{self, BcryptHasher, ImportSources},
};
use tempfile::TempDir;

fn fast_hasher() -> BcryptHasher {
    BcryptHasher::new(4)
}

fn database_url(dir: &TempDir) -> String {
    format!("sqlite://{}", dir.path().join("data").join("app.db").display())
}

#[tokio::test]
async fn test_fixture_seed_persists_to_file() {
    let dir = TempDir::new().unwrap();
    let url = database_url(&dir);

    let store = Store::connect(&url).await.unwrap();
    store.initialize_schema().await.unwrap();
    let summary = seed::seed_fixture(&store, &fast_hasher()).await.unwrap();
    store.close().await;

    assert!(dir.path().join("data").join("app.db").exists());

    let reopened = Store::connect(&url).await.unwrap();
    reopened.initialize_schema().await.unwrap();
    assert_eq!(reopened.counts().await.unwrap(), summary.counts);
    assert_eq!(summary.counts.movies, 15);
}

#[tokio::test]
async fn test_fixture_seed_is_repeatable() {
    let store = Store::in_memory().await.unwrap();

    let once = seed::seed_fixture(&store, &fast_hasher()).await.unwrap();
    let twice = seed::seed_fixture(&store, &fast_hasher()).await.unwrap();

    assert_eq!(once.counts, twice.counts);
}

#[tokio::test]
async fn test_clear_all_after_seed() {
    let store = Store::in_memory().await.unwrap();
    seed::seed_fixture(&store, &fast_hasher()).await.unwrap();

    seed::clear_all(&store).await.unwrap();

    assert_eq!(store.counts().await.unwrap(), TableCounts::default());
}

#[tokio::test]
async fn test_movielens_import_from_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("movies.csv"),
        "movieId,title,genres\n\
         1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy\n\
         2,Jumanji (1995),Adventure|Children|Fantasy\n\
         3,Grumpier Old Men (1995),Comedy|Romance\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("links.csv"),
        "movieId,imdbId,tmdbId\n1,0114709,862\n2,0113497,8844\n3,0113228,\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("ratings.csv"),
        "userId,movieId,rating,timestamp\n\
         1,1,4.0,964982703\n\
         1,2,3.5,964981247\n\
         1,3,5.0,964982224\n\
         2,2,1.5,964983815\n",
    )
    .unwrap();

    let store = Store::in_memory().await.unwrap();
    let sources = ImportSources::open_dir(dir.path()).unwrap();
    let summary = seed::seed_from_import(&store, sources, &fast_hasher(), "movielens")
        .await
        .unwrap();

    assert_eq!(summary.movies_imported, 2);
    assert_eq!(summary.movies_unlinked, 1);
    assert_eq!(summary.ratings_neutral, 1);
    assert_eq!(summary.ratings_unresolved, 1);
    assert_eq!(summary.swipes_imported, 2);
    assert_eq!(
        store.counts().await.unwrap(),
        TableCounts {
            users: 2,
            movies: 2,
            swipes: 2,
            watchlist_items: 0
        }
    );

    let user = store
        .find_user_by_email(&seed::movielens::movielens_user_email(2))
        .await
        .unwrap()
        .unwrap();
    assert!(bcrypt::verify("movielens", &user.password_hash).unwrap());
    let swipes = store.swipes_for_user(user.id).await.unwrap();
    assert_eq!(swipes.len(), 1);
    assert_eq!(swipes[0].action, SwipeAction::Dislike);
}

#[tokio::test]
async fn test_missing_import_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(ImportSources::open_dir(dir.path()).is_err());
}

#[tokio::test]
async fn test_swipe_on_missing_movie_is_rejected() {
    let store = Store::in_memory().await.unwrap();
    let user_id = store
        .insert_user(&NewUser::new("Ada", "ada@example.com", "hash".to_string()))
        .await
        .unwrap();
    let movie_id = store
        .insert_movie(&NewMovie::bare(603, "The Matrix", 1999, vec![]))
        .await
        .unwrap();

    let err = store
        .insert_swipe(user_id, movie_id + 1, SwipeAction::Like, Utc::now())
        .await
        .unwrap_err();

    assert!(err.is_constraint_violation());
}
