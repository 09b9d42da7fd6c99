//! Batch fetch-and-record over a list of products.

use crate::core::config::{ProductConfig, ProductSource};
use crate::core::{FetchError, ProductFetcher, ProductSnapshot, RecordOutcome};
use crate::store::{HistoryStore, ProductRegistry};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{info, warn};

/// One product to fetch in a tracking run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTarget {
    pub url: String,
    pub name: Option<String>,
    pub source: ProductSource,
}

impl TrackTarget {
    pub fn from_url(url: &str) -> Self {
        Self {
            url: url.trim().to_string(),
            name: None,
            source: ProductSource::Api,
        }
    }
}

impl From<&ProductConfig> for TrackTarget {
    fn from(config: &ProductConfig) -> Self {
        Self {
            url: config.url.trim().to_string(),
            name: config.name.clone(),
            source: config.source,
        }
    }
}

/// Fetchers by product source.
pub struct Fetchers<'a> {
    pub api: &'a dyn ProductFetcher,
    pub page: &'a dyn ProductFetcher,
}

impl Fetchers<'_> {
    fn for_source(&self, source: ProductSource) -> &dyn ProductFetcher {
        match source {
            ProductSource::Api => self.api,
            ProductSource::Page => self.page,
        }
    }
}

#[derive(Debug)]
pub enum TrackStatus {
    Recorded {
        outcome: RecordOutcome,
        price: u64,
    },
    /// The product's history was not touched.
    FetchFailed(FetchError),
    PersistFailed(anyhow::Error),
}

#[derive(Debug)]
pub struct TrackReport {
    pub url: String,
    /// Key the price was recorded under, when known.
    pub name: Option<String>,
    pub status: TrackStatus,
}

impl TrackReport {
    pub fn is_success(&self) -> bool {
        matches!(self.status, TrackStatus::Recorded { .. })
    }

    pub fn persist_failed(&self) -> bool {
        matches!(self.status, TrackStatus::PersistFailed(_))
    }
}

/// Fetches every target concurrently, then records them in input order.
///
/// A failure for one product never stops the others.
pub async fn track(
    targets: &[TrackTarget],
    fetchers: &Fetchers<'_>,
    store: &HistoryStore,
    registry: &ProductRegistry,
    date: NaiveDate,
    update_callback: &(dyn Fn()),
) -> Vec<TrackReport> {
    let fetches = targets.iter().map(|target| async move {
        let result = fetchers
            .for_source(target.source)
            .fetch_product(&target.url)
            .await;
        update_callback();
        result
    });
    let results = join_all(fetches).await;

    targets
        .iter()
        .zip(results)
        .map(|(target, result)| match result {
            Ok(snapshot) => record_snapshot(target, snapshot, store, registry, date),
            Err(e) => {
                warn!("Failed to fetch {}: {}", target.url, e);
                TrackReport {
                    url: target.url.clone(),
                    name: target.name.clone(),
                    status: TrackStatus::FetchFailed(e),
                }
            }
        })
        .collect()
}

fn record_snapshot(
    target: &TrackTarget,
    snapshot: ProductSnapshot,
    store: &HistoryStore,
    registry: &ProductRegistry,
    date: NaiveDate,
) -> TrackReport {
    let name = target
        .name
        .clone()
        .unwrap_or_else(|| snapshot.title.clone());
    let price = snapshot.price;

    let status = match persist(&name, target, &snapshot, store, registry, date) {
        Ok(outcome) => {
            info!(product = %name, price, appended = outcome.appended(), "Recorded price");
            TrackStatus::Recorded { outcome, price }
        }
        Err(e) => {
            warn!(product = %name, error = %e, "Failed to save price");
            TrackStatus::PersistFailed(e)
        }
    };

    TrackReport {
        url: target.url.clone(),
        name: Some(name),
        status,
    }
}

fn persist(
    name: &str,
    target: &TrackTarget,
    snapshot: &ProductSnapshot,
    store: &HistoryStore,
    registry: &ProductRegistry,
    date: NaiveDate,
) -> Result<RecordOutcome> {
    registry
        .register(name, &target.url, snapshot.image_url.as_deref())
        .context("Failed to update product registry")?;
    store
        .record_observation(name, date, snapshot.price)
        .with_context(|| format!("Failed to save price history for {name}"))
}
