mod clean;
mod config;
mod db;
mod entities;
mod error;
mod load;
mod models;
mod shape;
mod tmdb;

use std::time::Duration;

use anyhow::Context;

use crate::{config::Config, tmdb::TmdbClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,cinedata=debug,sqlx=warn".to_string()),
        )
        .init();

    tracing::info!("sync started");

    let config = Config::from_env()?;

    // The store being down at setup is the one fatal condition.
    let db = db::connect_and_migrate(&config.database_url)
        .await
        .context("relational store unavailable")?;

    let http = reqwest::Client::builder()
        .user_agent("cinedata/0.1")
        .timeout(Duration::from_secs(30))
        .build()?;

    let tmdb = TmdbClient::new(
        http,
        config.tmdb_api_key.clone(),
        config.tmdb_base_url.clone(),
        config.tmdb_rps,
    );

    let raw_movies = tmdb.collect_popular(config.first_page, config.last_page).await;
    let genre_catalog = tmdb.genre_catalog().await.context("genre catalog fetch failed")?;

    let cleaned = clean::cleanup(&raw_movies);
    let (movie_rows, genre_rows, link_rows) = shape::shape(&cleaned, &genre_catalog);

    let report = load::load(&db, movie_rows, genre_rows, link_rows).await;

    tracing::info!(
        movies = ?report.movies,
        genres = ?report.genres,
        movie_genres = ?report.movie_genres,
        "sync completed"
    );

    Ok(())
}
