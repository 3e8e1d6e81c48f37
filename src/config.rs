use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub database_url: String,
    pub first_page: u32,
    pub last_page: u32,
    pub tmdb_rps: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let tmdb_api_key = std::env::var("TMDB_API_KEY").context("TMDB_API_KEY")?;
        let tmdb_base_url = std::env::var("TMDB_BASE_URL")
            .unwrap_or_else(|_| "https://api.themoviedb.org/3".to_string());

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://cinedata.db?mode=rwc".to_string());

        let first_page: u32 =
            std::env::var("TMDB_FIRST_PAGE").ok().and_then(|s| s.parse().ok()).unwrap_or(1);

        let last_page: u32 =
            std::env::var("TMDB_LAST_PAGE").ok().and_then(|s| s.parse().ok()).unwrap_or(25);

        let tmdb_rps: u32 =
            std::env::var("TMDB_RPS").ok().and_then(|s| s.parse().ok()).unwrap_or(4);

        Ok(Self { tmdb_api_key, tmdb_base_url, database_url, first_page, last_page, tmdb_rps })
    }
}
