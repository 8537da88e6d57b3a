use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use finance_dashboard::domain::TransactionTableService;
use finance_dashboard::services::{FileSessionStore, InMemorySessionStore, SessionStore, SnapshotFileApi};
use finance_dashboard::{logging, DashboardConfig, TransactionListViewModel};
use tracing::{info, warn};

const USAGE: &str = "usage: dashboard-preview <snapshot.json> [config.yaml]";

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(snapshot_path) = args.next().map(PathBuf::from) else {
        bail!(USAGE);
    };
    let config = match args.next() {
        Some(config_path) => DashboardConfig::load(&PathBuf::from(config_path))?,
        None => DashboardConfig::default(),
    };

    logging::init(&config.log_filter);
    info!("Previewing dashboard from {:?}", snapshot_path);

    let api = Arc::new(SnapshotFileApi::new(snapshot_path));
    let session: Arc<dyn SessionStore> = match FileSessionStore::in_data_dir() {
        Ok(store) => {
            info!("Using session token at {:?}", store.path());
            Arc::new(store)
        }
        Err(e) => {
            warn!("{}; keeping the session in memory", e);
            Arc::new(InMemorySessionStore::new())
        }
    };
    let view_model = TransactionListViewModel::load(api, session, config).await?;

    let table = TransactionTableService::with_config(&view_model.config().date_display);
    let totals = view_model.totals();
    println!("Total Balance: {}", table.format_amount(totals.total_balance));
    println!("Income:        {}", table.format_amount(totals.total_income));
    println!("Expenses:      {}", table.format_amount(totals.total_expenses));
    println!();
    println!("Signed in: {}", if view_model.is_authenticated() { "yes" } else { "no" });
    println!("Categories: {}", view_model.categories().join(", "));
    if view_model.skipped_records() > 0 {
        println!("({} malformed records skipped)", view_model.skipped_records());
    }
    println!();

    let page = view_model.current_page();
    println!(
        "Transaction List (page {} of {}, {} matching)",
        page.page + 1,
        page.page_count().max(1),
        page.total_filtered_count
    );
    for row in view_model.formatted_page() {
        println!("{}", row.to_line());
    }

    let options: Vec<String> = view_model
        .rows_per_page_options()
        .iter()
        .map(|rows| rows.to_string())
        .collect();
    println!();
    println!(
        "Rows per page: {} (options: {})",
        view_model.view_state().rows_per_page,
        options.join(", ")
    );

    Ok(())
}
