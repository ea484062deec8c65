use serde::{Deserialize, Serialize};
use sqlx::types::Json;

/// A movie in the local catalog
///
/// `genres` is persisted as JSON text in the `genres_json` column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Movie {
    pub id: i64,
    pub tmdb_id: i64,
    pub title: String,
    pub overview: String,
    pub poster_url: String,
    /// 0 when the year is unknown
    pub release_year: i32,
    #[sqlx(rename = "genres_json")]
    pub genres: Json<Vec<String>>,
}

/// Fields required to create a movie; the store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub tmdb_id: i64,
    pub title: String,
    pub overview: String,
    pub poster_url: String,
    pub release_year: i32,
    pub genres: Vec<String>,
}

impl NewMovie {
    /// Movie with empty overview and poster, as produced by catalog imports
    pub fn bare(tmdb_id: i64, title: impl Into<String>, release_year: i32, genres: Vec<String>) -> Self {
        Self {
            tmdb_id,
            title: title.into(),
            overview: String::new(),
            poster_url: String::new(),
            release_year,
            genres,
        }
    }

    /// Genre list encoded the way it is stored
    pub fn genres_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.genres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genres_json_preserves_order() {
        let movie = NewMovie::bare(
            862,
            "Toy Story",
            1995,
            vec!["Adventure".into(), "Animation".into(), "Children".into()],
        );
        assert_eq!(
            movie.genres_json().unwrap(),
            r#"["Adventure","Animation","Children"]"#
        );
        assert!(movie.overview.is_empty());
        assert!(movie.poster_url.is_empty());
    }

    #[test]
    fn test_movie_serializes_genres_as_array() {
        let movie = Movie {
            id: 3,
            tmdb_id: 155,
            title: "The Dark Knight".to_string(),
            overview: String::new(),
            poster_url: String::new(),
            release_year: 2008,
            genres: Json(vec!["Action".to_string(), "Crime".to_string()]),
        };

        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(json["genres"], serde_json::json!(["Action", "Crime"]));
    }
}
