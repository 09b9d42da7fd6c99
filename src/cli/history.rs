use super::{chart, ui};
use crate::core::PriceHistory;
use crate::store::HistoryStore;
use anyhow::{Context, Result};
use comfy_table::Cell;

const CHART_HEIGHT: usize = 10;
const CHART_MAX_POINTS: usize = 30;

pub fn display_as_table(history: &PriceHistory) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Price"),
        ui::header_cell("Change"),
    ]);

    let mut previous: Option<u64> = None;
    for observation in history.observations() {
        let change = previous.map_or_else(
            || ui::na_cell(false),
            |p| ui::price_change_cell(ui::price_change(observation.price, p)),
        );
        table.add_row(vec![
            Cell::new(observation.date),
            Cell::new(ui::format_price(observation.price)),
            change,
        ]);
        previous = Some(observation.price);
    }

    table.to_string()
}

pub fn run(store: &HistoryStore, name: &str) -> Result<()> {
    let history = store
        .full_history(name)
        .with_context(|| format!("Failed to read price history for {name}"))?;

    if history.is_empty() {
        println!("No price history for {name}.");
        return Ok(());
    }

    println!(
        "Price Trend for {}\n",
        ui::style_text(name, ui::StyleType::Title)
    );
    println!("{}", display_as_table(&history));

    let observations = history.observations();
    let recent = &observations[observations.len().saturating_sub(CHART_MAX_POINTS)..];
    ui::print_separator();
    println!("{}", chart::render_chart(recent, CHART_HEIGHT));

    if let (Some(min), Some(max)) = (history.min_price(), history.max_price()) {
        println!(
            "{} {}   {} {}",
            ui::style_text("Lowest:", ui::StyleType::TotalLabel),
            ui::style_text(&ui::format_price(min), ui::StyleType::TotalValue),
            ui::style_text("Highest:", ui::StyleType::TotalLabel),
            ui::format_price(max)
        );
    }
    Ok(())
}
