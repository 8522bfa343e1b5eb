// src/fetch.rs
use anyhow::Result;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::dates;
use crate::instrument::InstrumentType;

/// Result-page address template; filled with the ANBIMA-formatted date and
/// the instrument-type code.
pub const URL_BASE: &str = "https://www.anbima.com.br/informacoes/merc-sec/resultados";

/// Each page fetch blocks the run, so keep the timeout bounded.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared HTTP client with the bounded request timeout applied.
pub fn build_client() -> Result<Client> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Builds the result-page URL for one instrument type on one date,
/// e.g. `.../msec_31out2025_ntn-b.asp`.
pub fn page_url(date: NaiveDate, instrument: InstrumentType) -> String {
    format!(
        "{URL_BASE}/msec_{}_{}.asp",
        dates::format_anbima(date),
        instrument.code()
    )
}

/// Fetches the raw HTML of one result page. Non-2xx statuses and transport
/// errors surface as errors; the caller treats a failed type as having zero
/// rows rather than aborting the run.
pub async fn fetch_page(
    client: &Client,
    date: NaiveDate,
    instrument: InstrumentType,
) -> Result<String> {
    let url = Url::parse(&page_url(date, instrument))?;
    let body = client
        .get(url.as_str())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(body)
}
