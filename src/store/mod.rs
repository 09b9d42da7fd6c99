//! On-disk persistence for price histories and the product registry.

pub mod history;
pub mod registry;

pub use history::HistoryStore;
pub use registry::{ProductRecord, ProductRegistry};

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Product key must not be empty")]
    EmptyKey,
    #[error("Price must be a positive integer, got {0}")]
    InvalidPrice(u64),
    #[error("Product name {name:?} maps to the same history file as {existing:?}")]
    NameCollision { name: String, existing: String },
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error on {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        StoreError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Maps a product name to a file stem: whitespace and path separators become `_`.
pub fn file_stem_for(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '_'
            } else {
                c
            }
        })
        .collect()
}

// A poisoned guard only protects `()` or a path, so the data is still usable.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Replaces `path` with a CSV of `rows`.
///
/// Rows go to a temporary file in the same directory which is then renamed over
/// `path`, so a failed write leaves the previous file untouched.
pub(crate) fn write_csv_atomic<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

    let mut file = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    {
        let mut writer = csv::Writer::from_writer(file.as_file_mut());
        for row in rows {
            writer.serialize(row).map_err(|e| StoreError::csv(path, e))?;
        }
        writer.flush().map_err(|e| StoreError::io(path, e))?;
    }
    file.as_file()
        .sync_all()
        .map_err(|e| StoreError::io(path, e))?;
    file.persist(path)
        .map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serializer;
    use serde::ser::Error as _;
    use tempfile::TempDir;

    #[test]
    fn test_file_stem_for() {
        assert_eq!(file_stem_for("Top1"), "Top1");
        assert_eq!(file_stem_for("Women Printed Top"), "Women_Printed_Top");
        assert_eq!(file_stem_for("Tab\tand  spaces"), "Tab_and__spaces");
        assert_eq!(file_stem_for("Shirt/Kurta"), "Shirt_Kurta");
    }

    #[derive(Serialize)]
    struct Row {
        #[serde(rename = "Date")]
        date: &'static str,
        #[serde(rename = "Price", serialize_with = "price_or_fail")]
        price: u64,
    }

    // Zero stands in for a write that fails halfway through the file.
    fn price_or_fail<S: Serializer>(price: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        if *price == 0 {
            return Err(S::Error::custom("write failed"));
        }
        serializer.serialize_u64(*price)
    }

    #[test]
    fn test_write_csv_atomic_replaces_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("Top1.csv");

        write_csv_atomic(&path, &[Row { date: "2024-01-01", price: 999 }]).unwrap();
        write_csv_atomic(
            &path,
            &[
                Row { date: "2024-01-01", price: 999 },
                Row { date: "2024-01-02", price: 1099 },
            ],
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Date,Price\n2024-01-01,999\n2024-01-02,1099\n"
        );
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Top1.csv");
        let before = "Date,Price\n2023-12-30,1200\n2023-12-31,1150\n";
        fs::write(&path, before).unwrap();

        let result = write_csv_atomic(
            &path,
            &[
                Row { date: "2023-12-30", price: 1200 },
                Row { date: "2023-12-31", price: 0 },
                Row { date: "2024-01-01", price: 999 },
            ],
        );

        assert!(matches!(result, Err(StoreError::Csv { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        // The temporary file is cleaned up as well.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
