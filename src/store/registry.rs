use super::{StoreError, file_stem_for, lock, write_csv_atomic};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

pub const REGISTRY_FILE: &str = "products.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "ImageURL")]
    pub image_url: Option<String>,
}

/// Append-only table of tracked products, stored as `<base>/products.csv`.
pub struct ProductRegistry {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ProductRegistry {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            path: base_path.as_ref().join(REGISTRY_FILE),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<ProductRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader =
            csv::Reader::from_path(&self.path).map_err(|e| StoreError::csv(&self.path, e))?;
        reader
            .deserialize()
            .collect::<Result<Vec<ProductRecord>, _>>()
            .map_err(|e| StoreError::csv(&self.path, e))
    }

    pub fn get(&self, name: &str) -> Result<Option<ProductRecord>, StoreError> {
        let name = name.trim();
        Ok(self.load()?.into_iter().find(|r| r.name.trim() == name))
    }

    /// Fails if `name` would share a history file with a different registered product.
    pub fn check_name(&self, name: &str) -> Result<(), StoreError> {
        check_collision(&self.load()?, name)
    }

    /// Adds a product the first time its name is seen. Returns whether a row was added.
    pub fn register(
        &self,
        name: &str,
        url: &str,
        image_url: Option<&str>,
    ) -> Result<bool, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyKey);
        }

        let _guard = lock(&self.write_lock);
        let mut records = self.load()?;
        if records.iter().any(|r| r.name.trim() == name) {
            return Ok(false);
        }
        check_collision(&records, name)?;

        records.push(ProductRecord {
            name: name.to_string(),
            url: url.to_string(),
            image_url: image_url.map(str::to_string),
        });
        self.save(&records)?;
        debug!("Registered product {} ({})", name, url);
        Ok(true)
    }

    fn save(&self, records: &[ProductRecord]) -> Result<(), StoreError> {
        write_csv_atomic(&self.path, records)
    }
}

fn check_collision(records: &[ProductRecord], name: &str) -> Result<(), StoreError> {
    let name = name.trim();
    let stem = file_stem_for(name);
    match records
        .iter()
        .find(|r| r.name.trim() != name && file_stem_for(r.name.trim()) == stem)
    {
        Some(existing) => Err(StoreError::NameCollision {
            name: name.to_string(),
            existing: existing.name.clone(),
        }),
        None => Ok(()),
    }
}
