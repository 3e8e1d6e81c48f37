use serde::Deserialize;

/// A movie that survived validation, still carrying its upstream genre list
/// for the link-table fan-out.
#[derive(Clone, Debug, PartialEq)]
pub struct CleanMovie {
    pub id: i32,
    pub title: String,
    pub overview: String,
    pub release_date: String,
    pub popularity: f64,
    pub vote_average: f64,
    pub vote_count: i32,
    pub genre_ids: Vec<i32>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MovieRow {
    pub id: i32,
    pub title: String,
    pub overview: String,
    pub release_date: String,
    pub popularity: f64,
    pub vote_average: f64,
    pub vote_count: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovieGenreRow {
    pub movie_id: i32,
    pub genre_id: i32,
}
