// src/report.rs
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use umya_spreadsheet::{
    helper::coordinate::string_from_column_index, reader, writer, Border,
    HorizontalAlignmentValues, Spreadsheet, Style, VerticalAlignmentValues, Worksheet,
};

use crate::coerce::{coerce_cell, CellValue, EXPECTED_COLUMNS};
use crate::dates;
use crate::instrument::InstrumentType;

/// Template workbook expected in the working directory.
pub const TEMPLATE_FILE: &str = "modelo.xlsx";
/// Name of the pre-styled stencil sheet inside the template workbook.
pub const TEMPLATE_SHEET: &str = "modelo";
/// Reports land here, created on demand.
pub const OUTPUT_DIR: &str = "relatorios";

/// First data row; rows 1-5 belong to the cloned header block.
pub const DATA_START_ROW: u32 = 6;

const COLUMN_WIDTH: f64 = 15.0;
const HEADER_ROW: u32 = 4;
const HEADER_ROW_HEIGHT: f64 = 30.0;

const FMT_INT: &str = "0";
const FMT_TEXT: &str = "@";
const FMT_PU: &str = "#,##0.000000";
const FMT_RATE: &str = "0.0000";

/// Assembles the report workbook: one sheet per instrument type that has
/// data, cloned from the template sheet, labelled, filled from
/// [`DATA_START_ROW`] and formatted per column. The template sheet is
/// dropped from the output.
///
/// Returns `Ok(None)` without writing anything when no type produced rows;
/// otherwise saves to `<out_dir>/msec_<ddMMMyyyy>.xlsx` and returns the
/// path. Template problems (missing file, missing `modelo` sheet) are hard
/// errors.
pub fn build_workbook(
    date: NaiveDate,
    data_by_type: &HashMap<InstrumentType, Vec<Vec<String>>>,
    template_path: &Path,
    out_dir: &Path,
) -> Result<Option<PathBuf>> {
    let mut book = reader::xlsx::read(template_path).with_context(|| {
        format!(
            "failed to load template workbook `{}`",
            template_path.display()
        )
    })?;
    let template = book
        .get_sheet_by_name(TEMPLATE_SHEET)
        .with_context(|| {
            format!(
                "template workbook `{}` has no `{TEMPLATE_SHEET}` sheet",
                template_path.display()
            )
        })?
        .clone();

    let stamp = dates::format_anbima(date);
    let mut sheets_created = 0usize;
    let mut total_rows = 0usize;

    for instrument in InstrumentType::ALL {
        let rows = match data_by_type.get(&instrument) {
            Some(rows) if !rows.is_empty() => rows,
            _ => {
                warn!(%instrument, "no data; sheet skipped");
                continue;
            }
        };

        let sheet = clone_template_sheet(&mut book, &template, instrument.sheet_name())?;

        sheet
            .get_cell_mut((1u32, 3u32))
            .set_value(instrument.paper_kind());
        sheet
            .get_cell_mut((3u32, 3u32))
            .set_value(instrument.rate_label());
        sheet.get_cell_mut((11u32, 1u32)).set_value(stamp.clone());
        center(sheet.get_style_mut((11u32, 1u32)));

        for (i, row) in rows.iter().enumerate() {
            write_data_row(sheet, DATA_START_ROW + i as u32, row);
        }

        info!(sheet = instrument.sheet_name(), rows = rows.len(), "sheet written");
        sheets_created += 1;
        total_rows += rows.len();
    }

    book.remove_sheet_by_name(TEMPLATE_SHEET)
        .map_err(|e| anyhow!("failed to drop the template sheet: {e}"))?;

    if sheets_created == 0 {
        return Ok(None);
    }

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory `{}`", out_dir.display()))?;
    let out_path = out_dir.join(format!("msec_{stamp}.xlsx"));
    writer::xlsx::write(&book, &out_path)
        .with_context(|| format!("failed to save report `{}`", out_path.display()))?;

    info!(
        path = %out_path.display(),
        sheets = sheets_created,
        rows = total_rows,
        "report saved"
    );
    Ok(Some(out_path))
}

/// Clones the template stencil into a new sheet: every cell's value and
/// style, the merged ranges and the custom row heights, then the fixed
/// column widths and the header-row height override.
fn clone_template_sheet<'a>(
    book: &'a mut Spreadsheet,
    template: &Worksheet,
    name: &str,
) -> Result<&'a mut Worksheet> {
    let sheet = book
        .new_sheet(name)
        .map_err(|e| anyhow!("failed to create sheet `{name}`: {e}"))?;

    for row in 1..=template.get_highest_row() {
        for col in 1..=template.get_highest_column() {
            if let Some(cell) = template.get_cell((col, row)) {
                let target = sheet.get_cell_mut((col, row));
                target.set_value(cell.get_value().to_string());
                target.set_style(cell.get_style().clone());
            }
        }
    }

    for range in template.get_merge_cells() {
        sheet.add_merge_cells(range.get_range());
    }

    for col in 1..=EXPECTED_COLUMNS as u32 {
        sheet
            .get_column_dimension_mut(&string_from_column_index(&col))
            .set_width(COLUMN_WIDTH);
    }

    for row in template.get_row_dimensions() {
        let height = *row.get_height();
        if height > 0.0 {
            sheet.get_row_dimension_mut(row.get_row_num()).set_height(height);
        }
    }
    sheet
        .get_row_dimension_mut(&HEADER_ROW)
        .set_height(HEADER_ROW_HEIGHT);

    Ok(sheet)
}

/// Writes one coerced data row and formats the full 11-column span: thin
/// borders, centered alignment, and the per-column number format. The PU
/// column switches to a text format when its value was kept as a fallback
/// string.
fn write_data_row(sheet: &mut Worksheet, row_idx: u32, cells: &[String]) {
    let coerced: Vec<CellValue> = cells
        .iter()
        .take(EXPECTED_COLUMNS)
        .enumerate()
        .map(|(i, raw)| coerce_cell(raw, i + 1))
        .collect();

    for (i, value) in coerced.iter().enumerate() {
        let cell = sheet.get_cell_mut((i as u32 + 1, row_idx));
        match value {
            CellValue::Int(v) => {
                cell.set_value_number(*v as f64);
            }
            CellValue::Float(v) => {
                cell.set_value_number(*v);
            }
            CellValue::Text(t) => {
                cell.set_value_string(t.clone());
            }
        }
    }

    let pu_kept_as_text = matches!(coerced.get(6), Some(CellValue::Text(_)));
    for col in 1..=EXPECTED_COLUMNS as u32 {
        let format = match col {
            1 => FMT_INT,
            2 | 3 => FMT_TEXT,
            7 if pu_kept_as_text => FMT_TEXT,
            7 => FMT_PU,
            _ => FMT_RATE,
        };
        let style = sheet.get_style_mut((col, row_idx));
        style.get_number_format_mut().set_format_code(format);
        center(style);
        thin_border(style);
    }
}

fn center(style: &mut Style) {
    let alignment = style.get_alignment_mut();
    alignment.set_horizontal(HorizontalAlignmentValues::Center);
    alignment.set_vertical(VerticalAlignmentValues::Center);
}

fn thin_border(style: &mut Style) {
    let borders = style.get_borders_mut();
    borders.get_left_mut().set_border_style(Border::BORDER_THIN);
    borders.get_right_mut().set_border_style(Border::BORDER_THIN);
    borders.get_top_mut().set_border_style(Border::BORDER_THIN);
    borders.get_bottom_mut().set_border_style(Border::BORDER_THIN);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn query_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 6).unwrap()
    }

    fn write_template(dir: &Path) -> PathBuf {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_active_sheet_mut();
        sheet.set_name(TEMPLATE_SHEET);
        sheet
            .get_cell_mut("A1")
            .set_value("MERCADO SECUNDARIO DE TITULOS PUBLICOS");
        sheet.get_cell_mut("A3").set_value("tipo");
        sheet.get_cell_mut("C3").set_value("papel");
        sheet.get_cell_mut("A5").set_value("Codigo SELIC");
        sheet.get_cell_mut("B5").set_value("Data Referencia");
        sheet.add_merge_cells("A1:J1");

        let path = dir.join(TEMPLATE_FILE);
        writer::xlsx::write(&book, &path).expect("template fixture should write");
        path
    }

    fn ltn_rows() -> Vec<Vec<String>> {
        vec![
            vec![
                "210100", "06/11/2025", "01/01/2026", "14,6721", "14,6901", "14,6811", "978,937041",
                "0,0200", "14,6811", "0,0100", "0,0300",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            vec![
                "210100", "06/11/2025", "01/01/2031", "13,5000", "13,5400", "13,5200",
                "1.234,567890", "0,0400", "13,5200", "0,0200", "0,0600",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        ]
    }

    #[test]
    fn builds_one_sheet_per_type_with_data_and_drops_the_template() {
        init_test_logging();
        let dir = TempDir::new().unwrap();
        let template = write_template(dir.path());
        let out_dir = dir.path().join(OUTPUT_DIR);

        let mut data = HashMap::new();
        data.insert(InstrumentType::Ltn, ltn_rows());
        data.insert(InstrumentType::NtnB, ltn_rows()[..1].to_vec());
        data.insert(InstrumentType::Lft, Vec::new());

        let path = build_workbook(query_date(), &data, &template, &out_dir)
            .unwrap()
            .expect("two sheets should be produced");
        assert_eq!(path, out_dir.join("msec_06nov2025.xlsx"));

        let book = reader::xlsx::read(&path).unwrap();
        assert!(book.get_sheet_by_name("LTN").is_some());
        assert!(book.get_sheet_by_name("NTN-B").is_some());
        assert!(book.get_sheet_by_name("LFT").is_none());
        assert!(book.get_sheet_by_name(TEMPLATE_SHEET).is_none());
    }

    #[test]
    fn sheets_carry_labels_stamp_and_typed_data_from_the_start_row() {
        let dir = TempDir::new().unwrap();
        let template = write_template(dir.path());
        let out_dir = dir.path().join(OUTPUT_DIR);

        let mut data = HashMap::new();
        data.insert(InstrumentType::Ltn, ltn_rows());

        let path = build_workbook(query_date(), &data, &template, &out_dir)
            .unwrap()
            .unwrap();
        let book = reader::xlsx::read(&path).unwrap();
        let sheet = book.get_sheet_by_name("LTN").unwrap();

        // Header block comes from the template, labels from the lookups.
        assert_eq!(
            sheet.get_value("A1"),
            "MERCADO SECUNDARIO DE TITULOS PUBLICOS"
        );
        assert_eq!(sheet.get_value("A3"), "Papel PREFIXADO");
        assert_eq!(sheet.get_value("C3"), "LTN - Taxa (% a.a.)/252");
        assert_eq!(sheet.get_value("K1"), "06nov2025");

        // Data starts at row 6; SELIC code numeric, dates textual.
        assert_eq!(sheet.get_value((1, DATA_START_ROW)).parse::<f64>().unwrap(), 210100.0);
        assert_eq!(sheet.get_value((2, DATA_START_ROW)), "06/11/2025");
        assert_eq!(sheet.get_value((3, DATA_START_ROW)), "01/01/2026");
        let rate: f64 = sheet.get_value((4, DATA_START_ROW)).parse().unwrap();
        assert!((rate - 14.6721).abs() < 1e-9);

        // Small PU parsed as a number, large PU preserved verbatim.
        let pu: f64 = sheet.get_value((7, DATA_START_ROW)).parse().unwrap();
        assert!((pu - 978.937041).abs() < 1e-9);
        assert_eq!(sheet.get_value((7, DATA_START_ROW + 1)), "1.234,567890");
    }

    #[test]
    fn zero_sheets_yields_none_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let template = write_template(dir.path());
        let out_dir = dir.path().join(OUTPUT_DIR);

        let mut data = HashMap::new();
        for instrument in InstrumentType::ALL {
            data.insert(instrument, Vec::new());
        }

        let result = build_workbook(query_date(), &data, &template, &out_dir).unwrap();
        assert!(result.is_none());
        assert!(!out_dir.join("msec_06nov2025.xlsx").exists());
    }

    #[test]
    fn missing_template_sheet_is_a_hard_error() {
        let dir = TempDir::new().unwrap();
        // Workbook exists but its only sheet keeps the default name.
        let book = umya_spreadsheet::new_file();
        let path = dir.path().join(TEMPLATE_FILE);
        writer::xlsx::write(&book, &path).unwrap();

        let mut data = HashMap::new();
        data.insert(InstrumentType::Ltn, ltn_rows());

        let err = build_workbook(query_date(), &data, &path, dir.path()).unwrap_err();
        assert!(err.to_string().contains(TEMPLATE_SHEET));
    }

    #[test]
    fn html_fixture_flows_end_to_end_into_the_report() {
        let html = r#"<table border="1">
            <tr><td>Titulo</td><td>Data</td></tr>
            <tr><td>210100</td><td>06/11/2025</td><td>01/01/2026</td><td>14,6721</td>
                <td>14,6901</td><td>14,6811</td><td>978,937041</td><td>0,0200</td>
                <td>14,6811</td><td>0,0100</td><td>0,0300</td></tr>
        </table>"#;
        let rows = crate::extract::extract_rows(html);
        assert_eq!(rows.len(), 1);

        let dir = TempDir::new().unwrap();
        let template = write_template(dir.path());
        let out_dir = dir.path().join(OUTPUT_DIR);
        let mut data = HashMap::new();
        data.insert(InstrumentType::NtnF, rows);

        let path = build_workbook(query_date(), &data, &template, &out_dir)
            .unwrap()
            .unwrap();
        let book = reader::xlsx::read(&path).unwrap();
        let sheet = book.get_sheet_by_name("NTN-F").unwrap();
        assert_eq!(sheet.get_value("A3"), "Papel PREFIXADO");
        assert_eq!(
            sheet.get_value((1, DATA_START_ROW)).parse::<f64>().unwrap(),
            210100.0
        );
    }

    #[test]
    fn missing_template_file_is_a_hard_error() {
        let dir = TempDir::new().unwrap();
        let data = HashMap::new();
        let missing = dir.path().join("nope.xlsx");
        assert!(build_workbook(query_date(), &data, &missing, dir.path()).is_err());
    }
}
