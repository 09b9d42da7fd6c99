use super::ui;
use crate::core::RecordOutcome;
use crate::store::{HistoryStore, ProductRegistry};
use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Records a manually observed price.
pub fn run(
    store: &HistoryStore,
    registry: &ProductRegistry,
    name: &str,
    price: u64,
    date: NaiveDate,
    url: Option<&str>,
) -> Result<RecordOutcome> {
    registry
        .check_name(name)
        .with_context(|| format!("Cannot record price for {name}"))?;
    let outcome = store
        .record_observation(name, date, price)
        .with_context(|| format!("Failed to record price for {name}"))?;

    if let Some(url) = url {
        registry
            .register(name, url, None)
            .context("Failed to update product registry")?;
    }

    match outcome {
        RecordOutcome::Appended => println!(
            "Recorded {} for {} on {}",
            ui::style_text(&ui::format_price(price), ui::StyleType::TotalValue),
            ui::style_text(name, ui::StyleType::TotalLabel),
            date
        ),
        RecordOutcome::AlreadyRecorded => println!(
            "{}",
            ui::style_text(
                &format!("{name} already has a price for {date}; keeping it"),
                ui::StyleType::Subtle
            )
        ),
    }
    Ok(outcome)
}
