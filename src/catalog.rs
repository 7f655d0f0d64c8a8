use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

use crate::constants::STALE_WINDOW_MINUTES;
use crate::types::{Canteen, CatalogError, CatalogSnapshot, Meal};

/// In-memory store for the last successfully ingested snapshot. All reads are
/// gated on snapshot age; a stale catalog refuses to answer until the next
/// successful refresh.
pub struct Catalog {
    snapshot: RwLock<CatalogSnapshot>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog {
            snapshot: RwLock::new(CatalogSnapshot::empty()),
        }
    }

    /// Replaces the stored snapshot as a whole. Readers either see the old
    /// snapshot or the new one, never a mix.
    pub fn refresh(&self, snapshot: CatalogSnapshot) {
        *self.snapshot.write().unwrap() = snapshot;
    }

    pub fn canteens(&self) -> Result<Vec<Canteen>, CatalogError> {
        self.canteens_at(Utc::now())
    }

    pub fn meals(&self, canteen_name: &str) -> Result<Vec<Meal>, CatalogError> {
        self.meals_at(canteen_name, Utc::now())
    }

    // freshness is a property of "now", not of the snapshot: the same snapshot
    // can be readable in one call and refused in the next
    pub(crate) fn canteens_at(&self, now: DateTime<Utc>) -> Result<Vec<Canteen>, CatalogError> {
        let snapshot = self.snapshot.read().unwrap();
        if Self::is_stale(&snapshot, now) {
            return Err(CatalogError::OutdatedData);
        }
        Ok(snapshot.canteens.clone())
    }

    pub(crate) fn meals_at(
        &self,
        canteen_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Meal>, CatalogError> {
        let snapshot = self.snapshot.read().unwrap();
        if Self::is_stale(&snapshot, now) {
            return Err(CatalogError::OutdatedData);
        }
        snapshot
            .meals_by_canteen
            .get(canteen_name)
            .cloned()
            .ok_or(CatalogError::UnknownCanteen)
    }

    fn is_stale(snapshot: &CatalogSnapshot, now: DateTime<Utc>) -> bool {
        now - snapshot.last_updated >= Duration::minutes(STALE_WINDOW_MINUTES)
    }

    #[cfg(test)]
    pub(crate) fn last_updated(&self) -> DateTime<Utc> {
        self.snapshot.read().unwrap().last_updated
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
