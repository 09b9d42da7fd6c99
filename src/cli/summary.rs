use super::ui;
use crate::core::PriceHistory;
use crate::store::{HistoryStore, ProductRecord, ProductRegistry};
use anyhow::{Context, Result};
use comfy_table::Cell;
use tracing::warn;

/// Latest state of one tracked product.
#[derive(Debug)]
pub struct ProductSummary {
    pub record: ProductRecord,
    pub history: Option<PriceHistory>,
    pub error: Option<String>,
}

impl ProductSummary {
    pub fn latest_price(&self) -> Option<u64> {
        self.history.as_ref()?.latest().map(|o| o.price)
    }

    /// Difference between the last two observations.
    pub fn last_change(&self) -> Option<i128> {
        let observations = self.history.as_ref()?.observations();
        match observations {
            [.., previous, last] => Some(ui::price_change(last.price, previous.price)),
            _ => None,
        }
    }
}

pub fn collect(registry: &ProductRegistry, store: &HistoryStore) -> Result<Vec<ProductSummary>> {
    let records = registry
        .load()
        .context("Failed to read product registry")?;

    Ok(records
        .into_iter()
        .map(|record| match store.full_history(&record.name) {
            Ok(history) => ProductSummary {
                record,
                history: Some(history),
                error: None,
            },
            Err(e) => {
                warn!("Failed to read history for {}: {}", record.name, e);
                ProductSummary {
                    record,
                    history: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect())
}

pub fn display_as_table(summaries: &[ProductSummary]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Product"),
        ui::header_cell("Latest Price"),
        ui::header_cell("Change"),
        ui::header_cell("Lowest"),
        ui::header_cell("Observations"),
        ui::header_cell("Last Updated"),
        ui::header_cell("URL"),
        ui::header_cell("Image"),
    ]);

    for summary in summaries {
        let has_error = summary.error.is_some();
        let history = summary.history.as_ref();

        let latest = match summary.latest_price() {
            Some(price) => Cell::new(ui::format_price(price)),
            None => ui::na_cell(has_error),
        };
        let change = summary
            .last_change()
            .map_or_else(|| ui::na_cell(has_error), ui::price_change_cell);
        let lowest =
            ui::format_optional_cell(history.and_then(PriceHistory::min_price), ui::format_price);
        let count = ui::format_optional_cell(history.map(PriceHistory::len), |n| n.to_string());
        let updated = ui::format_optional_cell(
            history.and_then(|h| h.latest()).map(|o| o.date),
            |d| d.to_string(),
        );
        let url = if summary.record.url.is_empty() {
            ui::na_cell(false)
        } else {
            Cell::new(&summary.record.url)
        };
        let image = match summary.record.image_url.as_deref() {
            Some(image_url) if !image_url.is_empty() => Cell::new(image_url),
            _ => ui::na_cell(false),
        };

        table.add_row(vec![
            Cell::new(&summary.record.name),
            latest,
            change,
            lowest,
            count,
            updated,
            url,
            image,
        ]);
    }

    table.to_string()
}

pub fn run(registry: &ProductRegistry, store: &HistoryStore) -> Result<()> {
    let summaries = collect(registry, store)?;
    if summaries.is_empty() {
        println!("No tracked products yet. Run `pricewatch track` first.");
        return Ok(());
    }

    println!(
        "{}\n",
        ui::style_text("Tracked Products", ui::StyleType::Title)
    );
    println!("{}", display_as_table(&summaries));

    let failed = summaries.iter().filter(|s| s.error.is_some()).count();
    if failed > 0 {
        println!(
            "\n{}",
            ui::style_text(
                &format!("{failed} product history file(s) could not be read"),
                ui::StyleType::Error
            )
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_and_display() -> Result<()> {
        let dir = TempDir::new()?;
        let store = HistoryStore::new(dir.path());
        let registry = ProductRegistry::new(dir.path());
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        registry.register(
            "Top1",
            "https://www.myntra.com/1",
            Some("https://assets.example/1.jpg"),
        )?;
        registry.register("Top2", "https://www.myntra.com/2", None)?;
        registry.register("Broken", "https://www.myntra.com/3", None)?;
        store.record_observation("Top1", d1, 1099)?;
        store.record_observation("Top1", d2, 999)?;
        fs::write(store.history_path("Broken"), "Date,Price\nnope,nope\n")?;

        let summaries = collect(&registry, &store)?;
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].latest_price(), Some(999));
        assert_eq!(summaries[0].last_change(), Some(-100));
        assert_eq!(summaries[1].latest_price(), None);
        assert_eq!(summaries[1].last_change(), None);
        assert!(summaries[1].error.is_none());
        assert!(summaries[2].error.is_some());

        let output = display_as_table(&summaries);
        assert!(output.contains("Top1"));
        assert!(output.contains("₹999"));
        assert!(output.contains("-100"));
        assert!(output.contains("2024-01-02"));
        assert!(output.contains("https://assets.example/1.jpg"));
        Ok(())
    }

    #[test]
    fn test_last_change_on_extreme_prices() -> Result<()> {
        let dir = TempDir::new()?;
        let store = HistoryStore::new(dir.path());
        let registry = ProductRegistry::new(dir.path());
        registry.register("Top1", "https://www.myntra.com/1", None)?;
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        store.record_observation("Top1", d1, u64::MAX)?;
        store.record_observation("Top1", d2, 1)?;

        let summaries = collect(&registry, &store)?;
        assert_eq!(summaries[0].last_change(), Some(1 - i128::from(u64::MAX)));
        assert!(display_as_table(&summaries).contains("-18446744073709551614"));
        Ok(())
    }
}
