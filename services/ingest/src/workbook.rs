//! Workbook normalization: one fetched XLSX into observation drafts.
//!
//! The published files share one layout: the sheet title is the series
//! name, row 2 carries one date label per data column from column B, and
//! data rows start at row 3 with the link label (parameter or region) in
//! column A. Drafts come out in source order - rows top-to-bottom, columns
//! left-to-right - which only matters for error attribution.

use std::io::Cursor;

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Xlsx};

use crate::datasets::DatasetKind;
use crate::normalize::{clean_name, convert_date, ConvertedDate, ZERO_SENTINELS};

/// Header row with the date labels (0-based).
const HEADER_ROW: u32 = 1;
/// First data row; everything above is the title block and the header.
const FIRST_DATA_ROW: u32 = 2;
/// First value column; column 0 carries the row label.
const FIRST_VALUE_COL: u32 = 1;

/// One (row, column) cell, normalized but not yet resolved against the
/// dimension tables. Values stay textual so the store does the final
/// numeric validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationDraft {
    pub link_label: String,
    pub date: ConvertedDate,
    pub value: String,
    /// Source position, for error attribution only.
    pub row: u32,
    pub col: u32,
}

pub struct Sheet {
    pub name: String,
    pub range: Range<Data>,
}

/// Open the fetched bytes as an XLSX workbook and materialize every sheet
/// in source order.
pub fn open_workbook(bytes: &[u8]) -> Result<Vec<Sheet>> {
    let mut workbook = Xlsx::new(Cursor::new(bytes)).context("failed to open workbook")?;
    let names = workbook.sheet_names().to_vec();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook
            .worksheet_range(&name)
            .with_context(|| format!("failed to read sheet {name:?}"))?;
        sheets.push(Sheet { name, range });
    }
    Ok(sheets)
}

/// Flatten one sheet into drafts. Parameter-linked row labels are cleaned
/// like any dimension name; region-linked labels are only trimmed because
/// they must match the seeded titles as published. Zero sentinels become
/// "0"; all other values pass through untouched.
pub fn normalize_sheet(range: &Range<Data>, kind: DatasetKind) -> Vec<ObservationDraft> {
    let Some((end_row, end_col)) = range.end() else {
        return Vec::new();
    };

    // (column, converted date) for every non-empty header cell. Columns
    // with an empty header are ragged-range noise and are skipped.
    let mut headers: Vec<(u32, ConvertedDate)> = Vec::new();
    for col in FIRST_VALUE_COL..=end_col {
        let label = cell_text(range.get_value((HEADER_ROW, col)));
        if label.trim().is_empty() {
            continue;
        }
        headers.push((col, convert_date(&label)));
    }

    let mut drafts = Vec::new();
    for row in FIRST_DATA_ROW..=end_row {
        let raw_label = cell_text(range.get_value((row, 0)));
        if raw_label.trim().is_empty() {
            continue;
        }
        let link_label = match kind {
            DatasetKind::ParameterLinked => clean_name(&raw_label),
            DatasetKind::RegionLinked => raw_label.trim().to_string(),
        };

        for (col, date) in &headers {
            let value = cell_text(range.get_value((row, *col)));
            let value = if ZERO_SENTINELS.contains(&value.trim()) {
                "0".to_string()
            } else {
                value
            };
            drafts.push(ObservationDraft {
                link_label: link_label.clone(),
                date: date.clone(),
                value,
                row,
                col: *col,
            });
        }
    }

    drafts
}

fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.clone(),
        Some(Data::Float(f)) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Some(Data::Int(i)) => i.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sheet(cells: &[(u32, u32, Data)]) -> Range<Data> {
        let end = cells
            .iter()
            .fold((0, 0), |acc, (r, c, _)| (acc.0.max(*r), acc.1.max(*c)));
        let mut range = Range::new((0, 0), end);
        for (r, c, value) in cells {
            range.set_value((*r, *c), value.clone());
        }
        range
    }

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    // -------------------------------------------------------------------------
    // SHEET NORMALIZATION TESTS
    // -------------------------------------------------------------------------

    #[test]
    fn test_region_sheet_single_cell() {
        let range = sheet(&[
            (1, 1, s("Сентябрь 2023")),
            (2, 0, s("г. Москва")),
            (2, 1, s("0,00")),
        ]);

        let drafts = normalize_sheet(&range, DatasetKind::RegionLinked);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].link_label, "г. Москва");
        assert_eq!(drafts[0].value, "0");
        assert_eq!(
            drafts[0].date,
            ConvertedDate::Canonical(NaiveDate::from_ymd_opt(2023, 9, 1).unwrap())
        );
    }

    #[test]
    fn test_parameter_labels_are_cleaned() {
        let range = sheet(&[
            (1, 1, s("Август 2023")),
            (2, 0, s("  mortgage   loans  ")),
            (2, 1, Data::Float(12.5)),
        ]);

        let drafts = normalize_sheet(&range, DatasetKind::ParameterLinked);
        assert_eq!(drafts[0].link_label, "Mortgage loans");
        assert_eq!(drafts[0].value, "12.5");
    }

    #[test]
    fn test_region_labels_are_trimmed_not_cleaned() {
        let range = sheet(&[
            (1, 1, s("Август 2023")),
            (2, 0, s("  г. Москва ")),
            (2, 1, Data::Float(1.0)),
        ]);

        let drafts = normalize_sheet(&range, DatasetKind::RegionLinked);
        // Trimmed only: first character keeps its published case.
        assert_eq!(drafts[0].link_label, "г. Москва");
    }

    #[test]
    fn test_source_order_is_preserved() {
        let range = sheet(&[
            (1, 1, s("Январь 2023")),
            (1, 2, s("Февраль 2023")),
            (2, 0, s("A")),
            (2, 1, Data::Float(1.0)),
            (2, 2, Data::Float(2.0)),
            (3, 0, s("B")),
            (3, 1, Data::Float(3.0)),
            (3, 2, Data::Float(4.0)),
        ]);

        let drafts = normalize_sheet(&range, DatasetKind::ParameterLinked);
        let order: Vec<(u32, u32)> = drafts.iter().map(|d| (d.row, d.col)).collect();
        assert_eq!(order, vec![(2, 1), (2, 2), (3, 1), (3, 2)]);
        let values: Vec<&str> = drafts.iter().map(|d| d.value.as_str()).collect();
        assert_eq!(values, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_zero_sentinels_mapped() {
        let range = sheet(&[
            (1, 1, s("Март 2023")),
            (1, 2, s("Апрель 2023")),
            (2, 0, s("Rate")),
            (2, 1, s("0,0")),
            (2, 2, s("0,00")),
        ]);

        let drafts = normalize_sheet(&range, DatasetKind::ParameterLinked);
        assert_eq!(drafts[0].value, "0");
        assert_eq!(drafts[1].value, "0");
    }

    #[test]
    fn test_other_values_pass_through() {
        let range = sheet(&[
            (1, 1, s("Март 2023")),
            (2, 0, s("Rate")),
            (2, 1, s("not a number")),
        ]);

        let drafts = normalize_sheet(&range, DatasetKind::ParameterLinked);
        // The store, not the parser, rejects malformed values.
        assert_eq!(drafts[0].value, "not a number");
    }

    #[test]
    fn test_unparsed_header_passes_through() {
        let range = sheet(&[
            (1, 1, s("August 2023")),
            (2, 0, s("Rate")),
            (2, 1, Data::Float(1.0)),
        ]);

        let drafts = normalize_sheet(&range, DatasetKind::ParameterLinked);
        assert_eq!(
            drafts[0].date,
            ConvertedDate::Unparsed("August 2023".to_string())
        );
    }

    #[test]
    fn test_empty_rows_and_header_gaps_skipped() {
        let range = sheet(&[
            (1, 1, s("Май 2023")),
            (1, 3, s("Июнь 2023")), // column 2 has no header
            (2, 0, s("A")),
            (2, 1, Data::Float(1.0)),
            (2, 3, Data::Float(2.0)),
            (3, 0, Data::Empty), // no label, skipped
            (3, 1, Data::Float(9.0)),
        ]);

        let drafts = normalize_sheet(&range, DatasetKind::ParameterLinked);
        assert_eq!(drafts.len(), 2);
        assert!(drafts.iter().all(|d| d.link_label == "A"));
    }

    #[test]
    fn test_empty_range_yields_nothing() {
        let range: Range<Data> = Range::new((0, 0), (0, 0));
        assert!(normalize_sheet(&range, DatasetKind::RegionLinked).is_empty());
    }

    // -------------------------------------------------------------------------
    // CELL TEXT TESTS
    // -------------------------------------------------------------------------

    #[test]
    fn test_cell_text_float_rendering() {
        assert_eq!(cell_text(Some(&Data::Float(1234.0))), "1234");
        assert_eq!(cell_text(Some(&Data::Float(12.75))), "12.75");
        assert_eq!(cell_text(Some(&Data::Int(7))), "7");
        assert_eq!(cell_text(Some(&Data::Empty)), "");
        assert_eq!(cell_text(None), "");
    }
}
