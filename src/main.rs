use anbima_msec::{dates, extract, fetch, instrument::InstrumentType, report};
use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Scrapes ANBIMA's secondary-market bond price pages into a styled
/// spreadsheet report, one sheet per instrument type.
#[derive(Parser)]
#[command(name = "msec", version, about)]
struct Cli {
    /// Query date as dd/mm/aaaa; defaults to the previous business day
    date: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = Cli::parse();

    // ─── 2) resolve the query date ───────────────────────────────────
    // Validation failures are fatal; anything after this runs to the end.
    let today = Local::now().date_naive();
    let date = dates::resolve(cli.date.as_deref(), today)?;
    info!(date = %date.format(dates::INPUT_FORMAT), "extracting secondary-market data");

    // ─── 3) fetch + extract, one instrument type at a time ───────────
    let client = fetch::build_client()?;
    let mut data_by_type: HashMap<InstrumentType, Vec<Vec<String>>> = HashMap::new();
    for instrument in InstrumentType::ALL {
        match fetch::fetch_page(&client, date, instrument).await {
            Ok(html) => {
                let rows = extract::extract_rows(&html);
                info!(%instrument, rows = rows.len(), "fetched");
                data_by_type.insert(instrument, rows);
            }
            Err(err) => {
                // A failed type gets zero rows; the run keeps going.
                error!(%instrument, %err, "failed to extract data");
                data_by_type.insert(instrument, Vec::new());
            }
        }
    }

    // ─── 4) build and save the report ────────────────────────────────
    info!("building report workbook");
    match report::build_workbook(
        date,
        &data_by_type,
        Path::new(report::TEMPLATE_FILE),
        Path::new(report::OUTPUT_DIR),
    )? {
        Some(path) => info!(path = %path.display(), "done"),
        None => warn!("no sheets produced; nothing written"),
    }

    Ok(())
}
