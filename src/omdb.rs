use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::Deserialize;

use crate::{error::AppResult, models::NewMovie};

pub struct OmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl OmdbClient {
    pub fn new(client: reqwest::Client, api_key: String, base_url: String, rps: u32) -> Self {
        if api_key.trim().is_empty() {
            tracing::warn!("no OMDB_API_KEY provided, movie lookups will be rejected");
        }

        let rps = NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rps)));
        Self { client, api_key, base_url, limiter }
    }

    /// Looks a movie up by title. `Ok(None)` means the provider had no match.
    pub async fn lookup(&self, title: &str) -> AppResult<Option<NewMovie>> {
        self.limiter.until_ready().await;

        let url = format!("{}/", self.base_url.trim_end_matches('/'));
        let resp: LookupResponse = self
            .client
            .get(url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if resp.response != "True" {
            tracing::debug!(title, error = ?resp.error, "no match from movie lookup");
            return Ok(None);
        }

        let movie = resp.into_movie();
        if movie.is_none() {
            tracing::warn!(title, "movie lookup returned an unusable record");
        }
        Ok(movie)
    }
}

/// Extracts a release year from free-form text such as `"1996"` or `"2014–2018"`.
///
/// Only the part before the first range separator is read, and it must hold
/// exactly four digits.
pub fn parse_year(raw: &str) -> Option<i32> {
    let first = raw.split(['–', '—', '-']).next()?;
    let digits: String = first.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 4 {
        return None;
    }
    digits.parse().ok()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LookupResponse {
    response: String,
    title: Option<String>,
    director: Option<String>,
    year: Option<String>,
    poster: Option<String>,
    error: Option<String>,
}

impl LookupResponse {
    fn into_movie(self) -> Option<NewMovie> {
        let name = self.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())?;
        let year = parse_year(self.year.as_deref()?)?;
        let director = self
            .director
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "N/A".to_string());
        let poster_url = self.poster.and_then(|p| {
            let p = p.trim();
            (!p.is_empty() && p != "N/A").then(|| p.to_string())
        });

        Some(NewMovie { name, director, year, poster_url })
    }
}
