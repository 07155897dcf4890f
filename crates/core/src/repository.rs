use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::entity::{Forecast, ForecastTarget};

/// Storage contract for targets and forecasts.
///
/// Implementations must be callable from multiple request-handling threads
/// at once. List operations return snapshot copies of the stored entities;
/// iteration order is implementation-defined and callers must not rely on it.
pub trait ForecastRepository: Send + Sync {
    /// Inserts a target by id, overwriting any existing entry with the same
    /// id, and returns the stored value.
    fn create_target(&self, target: ForecastTarget) -> ForecastTarget;

    /// Snapshot of every stored target.
    fn list_targets(&self) -> Vec<ForecastTarget>;

    /// Exact-id lookup.
    fn get_target(&self, target_id: Uuid) -> Option<ForecastTarget>;

    /// Inserts a forecast by id and returns the stored value. `created_at`
    /// is stamped at commit time, overriding the constructor default; commit
    /// time is the authoritative creation timestamp.
    fn create_forecast(&self, forecast: Forecast) -> Forecast;

    /// Forecasts whose target reference equals `target_id`, or every stored
    /// forecast when no filter is given. Matching is exact equality; the
    /// `None` filter does not match targetless forecasts specially.
    fn list_forecasts(&self, target_id: Option<Uuid>) -> Vec<Forecast>;

    /// Exact-id lookup.
    fn get_forecast(&self, forecast_id: Uuid) -> Option<Forecast>;

    /// Full snapshot, equivalent to `list_forecasts(None)`.
    fn list_all_forecasts(&self) -> Vec<Forecast>;

    /// Partitions every stored forecast by its target reference. Forecasts
    /// without a target land in the `None` bucket.
    fn aggregate_by_target(&self) -> HashMap<Option<Uuid>, Vec<Forecast>>;
}

#[derive(Default)]
struct Stores {
    targets: HashMap<Uuid, ForecastTarget>,
    forecasts: HashMap<Uuid, Forecast>,
}

/// Thread-safe in-memory store for rapid prototyping and tests.
///
/// Both entity maps sit behind a single mutex, so readers and writers
/// exclude each other. Hold time is bounded: O(matching entities) for list
/// operations, O(1) for point lookups and inserts, and nothing blocks or
/// performs I/O under the lock.
#[derive(Default)]
pub struct InMemoryForecastRepository {
    stores: Mutex<Stores>,
}

impl InMemoryForecastRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn stores(&self) -> MutexGuard<'_, Stores> {
        self.stores.lock().expect("repository lock poisoned")
    }
}

impl ForecastRepository for InMemoryForecastRepository {
    fn create_target(&self, target: ForecastTarget) -> ForecastTarget {
        self.stores().targets.insert(target.id, target.clone());
        target
    }

    fn list_targets(&self) -> Vec<ForecastTarget> {
        self.stores().targets.values().cloned().collect()
    }

    fn get_target(&self, target_id: Uuid) -> Option<ForecastTarget> {
        self.stores().targets.get(&target_id).cloned()
    }

    fn create_forecast(&self, mut forecast: Forecast) -> Forecast {
        forecast.created_at = Utc::now();
        self.stores().forecasts.insert(forecast.id, forecast.clone());
        forecast
    }

    fn list_forecasts(&self, target_id: Option<Uuid>) -> Vec<Forecast> {
        let stores = self.stores();
        match target_id {
            None => stores.forecasts.values().cloned().collect(),
            Some(id) => stores
                .forecasts
                .values()
                .filter(|forecast| forecast.target_id == Some(id))
                .cloned()
                .collect(),
        }
    }

    fn get_forecast(&self, forecast_id: Uuid) -> Option<Forecast> {
        self.stores().forecasts.get(&forecast_id).cloned()
    }

    fn list_all_forecasts(&self) -> Vec<Forecast> {
        self.stores().forecasts.values().cloned().collect()
    }

    fn aggregate_by_target(&self) -> HashMap<Option<Uuid>, Vec<Forecast>> {
        let stores = self.stores();
        let mut grouped: HashMap<Option<Uuid>, Vec<Forecast>> = HashMap::new();
        for forecast in stores.forecasts.values() {
            grouped
                .entry(forecast.target_id)
                .or_default()
                .push(forecast.clone());
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ForecastKind;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn point_forecast(target_id: Option<Uuid>, value: f64) -> Forecast {
        Forecast::new(
            target_id,
            Some(value),
            None,
            ForecastKind::Point,
            Some("manual".to_string()),
        )
    }

    fn ids(forecasts: &[Forecast]) -> HashSet<Uuid> {
        forecasts.iter().map(|forecast| forecast.id).collect()
    }

    #[test]
    fn create_and_get_target_roundtrip() {
        let repo = InMemoryForecastRepository::new();
        let target = ForecastTarget::new("Rainfall", "daily mm", 7);

        let stored = repo.create_target(target.clone());
        assert_eq!(stored, target);

        let fetched = repo.get_target(target.id).expect("target should exist");
        assert_eq!(fetched, target);
    }

    #[test]
    fn missing_lookups_return_none() {
        let repo = InMemoryForecastRepository::new();
        assert!(repo.get_target(Uuid::new_v4()).is_none());
        assert!(repo.get_forecast(Uuid::new_v4()).is_none());
    }

    #[test]
    fn create_target_overwrites_same_id() {
        let repo = InMemoryForecastRepository::new();
        let target = ForecastTarget::new("Rainfall", "", 7);
        repo.create_target(target.clone());

        let mut renamed = target.clone();
        renamed.name = "Rainfall v2".to_string();
        repo.create_target(renamed.clone());

        assert_eq!(repo.list_targets().len(), 1);
        let fetched = repo.get_target(target.id).expect("target should exist");
        assert_eq!(fetched.name, "Rainfall v2");
    }

    #[test]
    fn filtered_listing_matches_exact_target() {
        let repo = InMemoryForecastRepository::new();
        let tracked = Uuid::new_v4();
        let other = Uuid::new_v4();

        let first = repo.create_forecast(point_forecast(Some(tracked), 1.0));
        let second = repo.create_forecast(point_forecast(Some(tracked), 2.0));
        repo.create_forecast(point_forecast(Some(other), 3.0));
        repo.create_forecast(point_forecast(None, 4.0));

        let filtered = repo.list_forecasts(Some(tracked));
        assert_eq!(ids(&filtered), HashSet::from([first.id, second.id]));
    }

    #[test]
    fn unfiltered_listing_is_the_union() {
        let repo = InMemoryForecastRepository::new();
        let target = Uuid::new_v4();
        repo.create_forecast(point_forecast(Some(target), 1.0));
        repo.create_forecast(point_forecast(None, 2.0));

        let all = repo.list_forecasts(None);
        assert_eq!(all.len(), 2);
        assert_eq!(ids(&all), ids(&repo.list_all_forecasts()));
    }

    #[test]
    fn aggregate_partitions_every_forecast_once() {
        let repo = InMemoryForecastRepository::new();
        let first_target = Uuid::new_v4();
        let second_target = Uuid::new_v4();

        repo.create_forecast(point_forecast(Some(first_target), 1.0));
        repo.create_forecast(point_forecast(Some(first_target), 2.0));
        repo.create_forecast(point_forecast(Some(second_target), 3.0));
        repo.create_forecast(point_forecast(None, 4.0));

        let grouped = repo.aggregate_by_target();
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[&Some(first_target)].len(), 2);
        assert_eq!(grouped[&Some(second_target)].len(), 1);
        assert_eq!(grouped[&None].len(), 1);

        let total: usize = grouped.values().map(Vec::len).sum();
        assert_eq!(total, repo.list_all_forecasts().len());

        let mut seen = HashSet::new();
        for forecast in grouped.values().flatten() {
            assert!(seen.insert(forecast.id), "forecast counted twice");
        }
    }

    #[test]
    fn created_at_is_stamped_at_commit() {
        let repo = InMemoryForecastRepository::new();
        let forecast = point_forecast(None, 1.0);
        let constructed_at = forecast.created_at;

        let stored = repo.create_forecast(forecast);
        assert!(stored.created_at >= constructed_at);

        let fetched = repo.get_forecast(stored.id).expect("forecast should exist");
        assert_eq!(fetched.created_at, stored.created_at);
    }

    #[test]
    fn commit_stamp_leaves_observation_time_alone() {
        let repo = InMemoryForecastRepository::new();
        let forecast = point_forecast(None, 1.0);
        let observed_at = forecast.timestamp;

        let stored = repo.create_forecast(forecast);
        assert_eq!(stored.timestamp, observed_at);
    }

    #[test]
    fn repeated_reads_return_equal_snapshots() {
        let repo = InMemoryForecastRepository::new();
        repo.create_target(ForecastTarget::new("Rainfall", "", 7));
        repo.create_forecast(point_forecast(None, 1.0));

        assert_eq!(repo.list_targets(), repo.list_targets());
        assert_eq!(ids(&repo.list_forecasts(None)), ids(&repo.list_forecasts(None)));
    }

    #[test]
    fn concurrent_creates_lose_no_writes() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 16;

        let repo = Arc::new(InMemoryForecastRepository::new());
        let handles: Vec<_> = (0..THREADS)
            .map(|worker| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    for step in 0..PER_THREAD {
                        repo.create_forecast(point_forecast(None, (worker * step) as f64));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("writer thread panicked");
        }

        let all = repo.list_all_forecasts();
        assert_eq!(all.len(), THREADS * PER_THREAD);
        assert_eq!(ids(&all).len(), THREADS * PER_THREAD);
    }
}
