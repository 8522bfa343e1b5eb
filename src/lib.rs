//! Scraper for ANBIMA's daily secondary-market bond price tables.
//!
//! Fetches the published HTML page for each public-bond instrument type,
//! extracts the bordered data table, and writes a styled `.xlsx` report with
//! one sheet per instrument type, cloned from a template sheet.

pub mod coerce;
pub mod dates;
pub mod extract;
pub mod fetch;
pub mod instrument;
pub mod report;
