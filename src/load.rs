use std::{collections::HashSet, hash::Hash};

use sea_orm::{DatabaseConnection, EntityTrait, QuerySelect, Set};
use tracing::{error, info};

use crate::{
    entities::{genres, movie_genres, movies},
    error::AppResult,
    models::{Genre, MovieGenreRow, MovieRow},
};

/// Rows newly written per table; `None` means the table's load was skipped
/// because its store read or write failed this run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub movies: Option<u64>,
    pub genres: Option<u64>,
    pub movie_genres: Option<u64>,
}

/// Anti-join on an extracted key: candidates whose key is absent from the
/// persisted set, in candidate order.
fn reconcile<R, K, F>(candidates: Vec<R>, persisted: &HashSet<K>, key: F) -> Vec<R>
where
    K: Eq + Hash,
    F: Fn(&R) -> K,
{
    candidates.into_iter().filter(|row| !persisted.contains(&key(row))).collect()
}

async fn persisted_movie_ids(db: &DatabaseConnection) -> AppResult<HashSet<i32>> {
    let ids: Vec<i32> = movies::Entity::find()
        .select_only()
        .column(movies::Column::Id)
        .into_tuple()
        .all(db)
        .await?;
    Ok(ids.into_iter().collect())
}

async fn persisted_genre_ids(db: &DatabaseConnection) -> AppResult<HashSet<i32>> {
    let ids: Vec<i32> = genres::Entity::find()
        .select_only()
        .column(genres::Column::Id)
        .into_tuple()
        .all(db)
        .await?;
    Ok(ids.into_iter().collect())
}

async fn persisted_link_pairs(db: &DatabaseConnection) -> AppResult<HashSet<(i32, i32)>> {
    let pairs: Vec<(i32, i32)> = movie_genres::Entity::find()
        .select_only()
        .columns([movie_genres::Column::MovieId, movie_genres::Column::GenreId])
        .into_tuple()
        .all(db)
        .await?;
    Ok(pairs.into_iter().collect())
}

pub async fn load_movies(db: &DatabaseConnection, candidates: Vec<MovieRow>) -> AppResult<u64> {
    let persisted = persisted_movie_ids(db).await?;
    let new_rows = reconcile(candidates, &persisted, |row| row.id);
    if new_rows.is_empty() {
        info!(table = "movies", "no new rows to load");
        return Ok(0);
    }

    let rows = new_rows.len();
    let models = new_rows.into_iter().map(|row| movies::ActiveModel {
        id: Set(row.id),
        title: Set(row.title),
        overview: Set(row.overview),
        release_date: Set(row.release_date),
        popularity: Set(row.popularity),
        vote_average: Set(row.vote_average),
        vote_count: Set(row.vote_count),
    });

    movies::Entity::insert_many(models).exec_without_returning(db).await?;
    info!(table = "movies", rows = rows, "new rows loaded");
    Ok(rows as u64)
}

pub async fn load_genres(db: &DatabaseConnection, candidates: Vec<Genre>) -> AppResult<u64> {
    let persisted = persisted_genre_ids(db).await?;
    let new_rows = reconcile(candidates, &persisted, |row| row.id);
    if new_rows.is_empty() {
        info!(table = "genres", "no new rows to load");
        return Ok(0);
    }

    let rows = new_rows.len();
    let models = new_rows
        .into_iter()
        .map(|row| genres::ActiveModel { id: Set(row.id), name: Set(row.name) });

    genres::Entity::insert_many(models).exec_without_returning(db).await?;
    info!(table = "genres", rows = rows, "new rows loaded");
    Ok(rows as u64)
}

pub async fn load_links(db: &DatabaseConnection, candidates: Vec<MovieGenreRow>) -> AppResult<u64> {
    let persisted = persisted_link_pairs(db).await?;
    let new_rows = reconcile(candidates, &persisted, |row| (row.movie_id, row.genre_id));
    if new_rows.is_empty() {
        info!(table = "movie_genres", "no new rows to load");
        return Ok(0);
    }

    let rows = new_rows.len();
    let models = new_rows.into_iter().map(|row| movie_genres::ActiveModel {
        movie_id: Set(row.movie_id),
        genre_id: Set(row.genre_id),
    });

    movie_genres::Entity::insert_many(models).exec_without_returning(db).await?;
    info!(table = "movie_genres", rows = rows, "new rows loaded");
    Ok(rows as u64)
}

/// Incremental load of all three tables, each behind its own error boundary.
/// Movies and genres must land before links for the foreign keys to hold.
pub async fn load(
    db: &DatabaseConnection,
    movies: Vec<MovieRow>,
    genres: Vec<Genre>,
    links: Vec<MovieGenreRow>,
) -> LoadReport {
    let mut report = LoadReport::default();

    report.movies = match load_movies(db, movies).await {
        Ok(rows) => Some(rows),
        Err(err) => {
            error!(table = "movies", error = %err, "load failed, table skipped");
            None
        },
    };

    report.genres = match load_genres(db, genres).await {
        Ok(rows) => Some(rows),
        Err(err) => {
            error!(table = "genres", error = %err, "load failed, table skipped");
            None
        },
    };

    report.movie_genres = match load_links(db, links).await {
        Ok(rows) => Some(rows),
        Err(err) => {
            error!(table = "movie_genres", error = %err, "load failed, table skipped");
            None
        },
    };

    report
}
