use super::{StoreError, file_stem_for, lock, write_csv_atomic};
use crate::core::{PriceHistory, PriceObservation, RecordOutcome};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

pub const HISTORY_DIR: &str = "history";

/// Per-product price histories, one CSV file each under `<base>/history`.
pub struct HistoryStore {
    history_dir: PathBuf,
    key_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl HistoryStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            history_dir: base_path.as_ref().join(HISTORY_DIR),
            key_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn history_path(&self, product_key: &str) -> PathBuf {
        self.history_dir
            .join(format!("{}.csv", file_stem_for(product_key.trim())))
    }

    /// Appends `(date, price)` unless the date is already recorded for the product.
    ///
    /// The whole history is rewritten on append and swapped in atomically.
    /// Concurrent calls for the same key within this process are serialized.
    pub fn record_observation(
        &self,
        product_key: &str,
        date: NaiveDate,
        price: u64,
    ) -> Result<RecordOutcome, StoreError> {
        let key = validate_key(product_key)?;
        if price == 0 {
            return Err(StoreError::InvalidPrice(price));
        }

        let key_lock = self.key_lock(key);
        let _guard = lock(&key_lock);

        let path = self.history_path(key);
        let mut history = read_history(&path)?;
        if !history.push_if_new(PriceObservation::new(date, price)) {
            debug!("Price for {} on {} already recorded", key, date);
            return Ok(RecordOutcome::AlreadyRecorded);
        }

        write_csv_atomic(&path, history.observations())?;
        debug!(
            "Recorded {} for {} on {} ({} observations)",
            price,
            key,
            date,
            history.len()
        );
        Ok(RecordOutcome::Appended)
    }

    /// Price of the most recently appended observation, if any.
    pub fn latest_price(&self, product_key: &str) -> Result<Option<u64>, StoreError> {
        Ok(self.full_history(product_key)?.latest().map(|o| o.price))
    }

    pub fn full_history(&self, product_key: &str) -> Result<PriceHistory, StoreError> {
        let key = validate_key(product_key)?;
        let key_lock = self.key_lock(key);
        let _guard = lock(&key_lock);
        read_history(&self.history_path(key))
    }

    // Keyed by file stem so names that map to the same file share a lock.
    fn key_lock(&self, product_key: &str) -> Arc<Mutex<()>> {
        let mut locks = lock(&self.key_locks);
        Arc::clone(locks.entry(file_stem_for(product_key)).or_default())
    }
}

fn validate_key(product_key: &str) -> Result<&str, StoreError> {
    let key = product_key.trim();
    if key.is_empty() {
        return Err(StoreError::EmptyKey);
    }
    Ok(key)
}

fn read_history(path: &Path) -> Result<PriceHistory, StoreError> {
    if !path.exists() {
        return Ok(PriceHistory::new());
    }

    let mut reader = csv::Reader::from_path(path).map_err(|e| StoreError::csv(path, e))?;
    let observations = reader
        .deserialize::<PriceObservation>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StoreError::csv(path, e))?;
    Ok(PriceHistory::from(observations))
}
