use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::catalog::Catalog;
use crate::constants::{DETAIL_BASE_URL, DETAIL_FETCH_LIMIT, FEED_URL};
use crate::detail_request_funcs::enrich;
use crate::feed_request_funcs::ingest;
use crate::types::{Canteen, CatalogError, DetailError, IngestionError, Meal};

/// Outward surface of the crate: owns the transport client and the catalog,
/// and wires fetch → parse → store together.
#[derive(Clone)]
pub struct MensaClient {
    http: reqwest::Client,
    catalog: Arc<Catalog>,
    feed_url: String,
}

impl MensaClient {
    pub fn new() -> Self {
        Self::with_feed_url(FEED_URL)
    }

    pub fn with_feed_url(feed_url: &str) -> Self {
        MensaClient {
            http: reqwest::Client::new(),
            catalog: Arc::new(Catalog::new()),
            feed_url: feed_url.to_string(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Fetches the feed and replaces the catalog with its contents. On any
    /// failure the previously stored snapshot stays readable as-is.
    pub async fn refresh_catalog(&self) -> Result<(), IngestionError> {
        let now = Instant::now();

        let response = self.http.get(&self.feed_url).send().await.map_err(|e| {
            log::warn!("feed request failed: {}", e);
            IngestionError::Request
        })?;

        if !response.status().is_success() {
            log::warn!("feed server answered {}", response.status());
            return Err(IngestionError::Server);
        }

        let body = response.text().await.map_err(|e| {
            log::warn!("feed body unreadable: {}", e);
            IngestionError::Server
        })?;

        let snapshot = ingest(&body)?;
        log::info!(
            "catalog refreshed: {} canteens in {:.2?}",
            snapshot.canteens.len(),
            now.elapsed()
        );
        self.catalog.refresh(snapshot);

        Ok(())
    }

    pub fn list_canteens(&self) -> Result<Vec<Canteen>, CatalogError> {
        self.catalog.canteens()
    }

    pub fn list_meals(&self, canteen_name: &str) -> Result<Vec<Meal>, CatalogError> {
        self.catalog.meals(canteen_name)
    }

    /// Fetches one meal's detail page and returns the enriched copy. The input
    /// meal is left untouched.
    pub async fn fetch_meal_detail(&self, meal: &Meal) -> Result<Meal, DetailError> {
        let url = format!("{}/mensen/speiseplan/details-{}.html", DETAIL_BASE_URL, meal.id);

        let response = self.http.get(&url).send().await.map_err(|e| {
            log::warn!("detail request for '{}' failed: {}", meal.name, e);
            DetailError::Request
        })?;

        if !response.status().is_success() {
            log::warn!(
                "detail server answered {} for '{}'",
                response.status(),
                meal.name
            );
            return Err(DetailError::Server);
        }

        let body = response
            .text()
            .await
            .map_err(|_| DetailError::Server)?;

        Ok(enrich(meal, &body))
    }

    /// Enriches a whole plan at once, fetching detail pages concurrently but
    /// never more than `DETAIL_FETCH_LIMIT` at a time. Meals whose detail
    /// fetch fails are returned unenriched; order is preserved.
    pub async fn fetch_meal_details(&self, meals: Vec<Meal>) -> Vec<Meal> {
        let semaphore = Arc::new(Semaphore::new(DETAIL_FETCH_LIMIT));
        let mut set = JoinSet::new();

        for (index, meal) in meals.iter().cloned().enumerate() {
            let client = self.clone();
            let semaphore = semaphore.clone();
            set.spawn(async move {
                // the semaphore is never closed while permits are handed out
                let _permit = semaphore.acquire_owned().await.unwrap();
                let enriched = client.fetch_meal_detail(&meal).await;
                (index, enriched)
            });
        }

        let mut enriched_meals = meals;
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, Ok(meal))) => enriched_meals[index] = meal,
                Ok((index, Err(e))) => {
                    log::warn!(
                        "keeping '{}' unenriched: {}",
                        enriched_meals[index].name,
                        e
                    );
                }
                Err(e) => log::warn!("detail fetch task failed: {}", e),
            }
        }

        enriched_meals
    }
}

impl Default for MensaClient {
    fn default() -> Self {
        Self::new()
    }
}
