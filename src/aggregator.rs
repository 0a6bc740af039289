//! Weather aggregator - concurrent fetch-and-collect over a city list
//!
//! Every distinct city gets its own lookup task; all tasks are started before
//! any is awaited and the whole set is drained before returning. A failed
//! lookup only ever produces that city's `Outcome::Failure`.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::api::WeatherSource;
use crate::state::{Outcome, ResultSet};

/// Outcome recorded for a city whose lookup task panicked or was aborted
pub const TASK_LOST: &str = "lookup task did not complete";

/// Distinct cities in first-occurrence order
pub fn distinct<S: AsRef<str>>(cities: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for city in cities {
        let city: &str = city.as_ref();
        if seen.insert(city) {
            unique.push(city.to_string());
        }
    }
    unique
}

/// Look up every distinct city concurrently and collect one outcome per city.
///
/// The returned key set always equals the de-duplicated input.
pub async fn fetch_all<S: AsRef<str>>(source: Arc<dyn WeatherSource>, cities: &[S]) -> ResultSet {
    let cities = distinct(cities);
    tracing::debug!(count = cities.len(), "starting fetch cycle");

    let mut join_set = JoinSet::new();
    for city in &cities {
        let city = city.clone();
        let source = Arc::clone(&source);
        join_set.spawn(async move {
            let outcome = match source.current(&city).await {
                Ok(report) => Outcome::Success(report),
                Err(e) => {
                    tracing::warn!(city = %city, error = %e, "weather lookup failed");
                    Outcome::Failure(e.to_string())
                }
            };
            (city, outcome)
        });
    }

    let mut results = ResultSet::new();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((city, outcome)) => {
                results.insert(city, outcome);
            }
            Err(e) => tracing::error!(error = %e, "weather lookup task failed"),
        }
    }

    for city in cities {
        results
            .entry(city)
            .or_insert_with(|| Outcome::Failure(TASK_LOST.to_string()));
    }

    tracing::debug!(
        ok = results.values().filter(|o| o.report().is_some()).count(),
        total = results.len(),
        "fetch cycle finished"
    );
    results
}

/// Overwrite the entries of `previous` that were fetched in `fresh`
pub fn merge(previous: &ResultSet, fresh: ResultSet) -> ResultSet {
    let mut merged = previous.clone();
    merged.extend(fresh);
    merged
}

/// Fetch `cities` and lay the fresh outcomes over `previous`
pub async fn refresh<S: AsRef<str>>(
    source: Arc<dyn WeatherSource>,
    cities: &[S],
    previous: &ResultSet,
) -> ResultSet {
    let fresh = fetch_all(source, cities).await;
    merge(previous, fresh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::WeatherReport;

    fn success(place: &str) -> Outcome {
        Outcome::Success(WeatherReport {
            place: place.into(),
            ..Default::default()
        })
    }

    #[test]
    fn test_distinct_keeps_first_occurrence_order() {
        assert_eq!(
            distinct(&["B", "A", "B", "C", "A"]),
            vec!["B".to_string(), "A".into(), "C".into()]
        );
        assert!(distinct::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_merge_overwrites_only_fetched_keys() {
        let mut previous = ResultSet::new();
        previous.insert("A".into(), success("A"));
        previous.insert("B".into(), success("B"));

        let mut fresh = ResultSet::new();
        fresh.insert("A".into(), Outcome::Failure("boom".into()));

        let merged = merge(&previous, fresh);

        assert_eq!(merged["A"], Outcome::Failure("boom".into()));
        assert_eq!(merged["B"], success("B"));
        assert_eq!(merged.len(), 2);
    }
}
