use std::{num::NonZeroU32, sync::Arc, time::Instant};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{error::AppResult, models::Genre};

pub struct TmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(client: reqwest::Client, api_key: String, base_url: String, rps: u32) -> Self {
        let limiter =
            Arc::new(RateLimiter::direct(Quota::per_second(NonZeroU32::new(rps.max(1)).unwrap())));
        Self { client, api_key, base_url, limiter }
    }

    /// One page of the popular-movie listing, as raw records. Records stay
    /// untyped here so a malformed field rejects one record downstream
    /// instead of failing the whole page.
    pub async fn popular_page(&self, page: u32) -> AppResult<Vec<serde_json::Value>> {
        self.limiter.until_ready().await;

        let url = format!("{}/movie/popular", self.base_url.trim_end_matches('/'));
        let started = Instant::now();
        let resp: ListingResponse = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(&[("page", page)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(
            page = page,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetched listing page"
        );

        Ok(resp.results)
    }

    /// Collect a page range, best effort: a failed page is logged and
    /// contributes nothing, the batch carries on.
    pub async fn collect_popular(&self, first_page: u32, last_page: u32) -> Vec<serde_json::Value> {
        info!(first_page = first_page, last_page = last_page, "collecting movie listing");

        let mut out = Vec::new();
        for page in first_page..=last_page {
            match self.popular_page(page).await {
                Ok(records) => {
                    debug!(page = page, records = records.len(), "page collected");
                    out.extend(records);
                },
                Err(err) => {
                    warn!(page = page, error = %err, "no data collected for page");
                },
            }
        }
        out
    }

    pub async fn genre_catalog(&self) -> AppResult<Vec<Genre>> {
        self.limiter.until_ready().await;

        let url = format!("{}/genre/movie/list", self.base_url.trim_end_matches('/'));
        let resp: GenreListResponse = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(genres = resp.genres.len(), "fetched genre catalog");

        Ok(resp.genres)
    }
}

#[derive(Debug, Deserialize)]
struct ListingResponse {
    results: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GenreListResponse {
    genres: Vec<Genre>,
}
