use super::ui;
use crate::core::RecordOutcome;
use crate::core::config::AppConfig;
use crate::providers::{MyntraApiFetcher, PageFetcher};
use crate::store::{HistoryStore, ProductRegistry};
use crate::tracker::{self, Fetchers, TrackReport, TrackStatus, TrackTarget};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use comfy_table::{Cell, Color};

/// Configured products plus ad-hoc URLs, without duplicate URLs.
pub fn collect_targets(config: &AppConfig, extra_urls: &[String]) -> Vec<TrackTarget> {
    let mut targets: Vec<TrackTarget> = config.products.iter().map(TrackTarget::from).collect();
    for url in extra_urls.iter().map(|u| u.trim()).filter(|u| !u.is_empty()) {
        if !targets.iter().any(|t| t.url == url) {
            targets.push(TrackTarget::from_url(url));
        }
    }
    targets
}

pub fn display_reports(reports: &[TrackReport]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Product"),
        ui::header_cell("Price"),
        ui::header_cell("Result"),
    ]);

    for report in reports {
        let name = report.name.clone().unwrap_or_else(|| report.url.clone());
        let (price, result) = match &report.status {
            TrackStatus::Recorded { outcome, price } => {
                let result = match outcome {
                    RecordOutcome::Appended => Cell::new("added").fg(Color::Green),
                    RecordOutcome::AlreadyRecorded => {
                        Cell::new("already recorded today").fg(Color::DarkGrey)
                    }
                };
                (
                    ui::format_optional_cell(Some(*price), ui::format_price),
                    result,
                )
            }
            TrackStatus::FetchFailed(e) => (
                ui::na_cell(true),
                Cell::new(format!("fetch failed: {e}")).fg(Color::Red),
            ),
            TrackStatus::PersistFailed(e) => (
                ui::na_cell(true),
                Cell::new(format!("not saved: {e:#}")).fg(Color::Red),
            ),
        };
        table.add_row(vec![Cell::new(name), price, result]);
    }

    table.to_string()
}

pub async fn run(
    config: &AppConfig,
    extra_urls: &[String],
    store: &HistoryStore,
    registry: &ProductRegistry,
    date: NaiveDate,
) -> Result<()> {
    let targets = collect_targets(config, extra_urls);
    if targets.is_empty() {
        println!("No products to track. Add some to the config file or pass --url.");
        return Ok(());
    }

    let api = MyntraApiFetcher::new(config.providers.myntra_base_url())
        .context("Failed to create API client")?;
    let page = PageFetcher::new().context("Failed to create page client")?;
    let fetchers = Fetchers {
        api: &api,
        page: &page,
    };

    let pb = ui::new_progress_bar(targets.len() as u64);
    pb.set_message("Fetching prices...");
    let reports = tracker::track(&targets, &fetchers, store, registry, date, &|| pb.inc(1)).await;
    pb.finish_and_clear();

    println!(
        "Prices for {}\n",
        ui::style_text(&date.to_string(), ui::StyleType::Title)
    );
    println!("{}", display_reports(&reports));

    let fetch_failures = reports
        .iter()
        .filter(|r| matches!(r.status, TrackStatus::FetchFailed(_)))
        .count();
    if fetch_failures > 0 {
        println!(
            "\n{}",
            ui::style_text(
                &format!("{fetch_failures} product(s) could not be fetched"),
                ui::StyleType::Subtle
            )
        );
    }

    let persist_failures = reports.iter().filter(|r| r.persist_failed()).count();
    if persist_failures > 0 {
        bail!("Failed to save prices for {persist_failures} product(s)");
    }
    Ok(())
}
