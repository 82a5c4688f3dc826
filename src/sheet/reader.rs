use anyhow::{anyhow, Result};
use calamine::{open_workbook, open_workbook_auto, Data, Range, Reader, Xls, Xlsx};
use log::debug;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use crate::diff::RawGrid;

/// Sheet name -> ragged rows of display text
pub type RawWorkbook = BTreeMap<String, RawGrid>;

/// Turns a materialized snapshot file into text grids
pub trait WorkbookReader {
    fn read(&self, path: &Path) -> Result<RawWorkbook>;
}

/// Reads xlsx/xlsm/xlsb/xls/ods through calamine
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineReader;

impl WorkbookReader for CalamineReader {
    fn read(&self, path: &Path) -> Result<RawWorkbook> {
        // Extension-based detection first, then the two container formats
        // explicitly, so a snapshot with a misleading name still opens.
        let auto_err = match open_workbook_auto(path) {
            Ok(mut wb) => return read_sheets(&mut wb),
            Err(e) => e,
        };
        debug!("auto-detect failed for {}: {}", path.display(), auto_err);

        if let Ok(mut wb) = open_workbook::<Xlsx<BufReader<File>>, _>(path) {
            return read_sheets(&mut wb);
        }
        if let Ok(mut wb) = open_workbook::<Xls<BufReader<File>>, _>(path) {
            return read_sheets(&mut wb);
        }
        Err(anyhow!("{}", auto_err))
    }
}

fn read_sheets<RS, R>(workbook: &mut R) -> Result<RawWorkbook>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        anyhow::bail!("workbook contains no sheets");
    }

    let mut sheets = RawWorkbook::new();
    for name in sheet_names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| anyhow!("failed to read sheet '{}': {}", name, e))?;
        let rows = range_to_rows(&range);
        debug!("sheet '{}': {} rows", name, rows.len());
        sheets.insert(name, rows);
    }
    Ok(sheets)
}

/// Convert a used range to rows addressed from A1. Cells above or left of
/// the range start become empty text so coordinates match the spreadsheet.
fn range_to_rows(range: &Range<Data>) -> RawGrid {
    let (start_row, start_col) = match range.start() {
        Some((r, c)) => (r as usize, c as usize),
        None => return Vec::new(),
    };

    let mut rows: RawGrid = vec![Vec::new(); start_row];
    for row in range.rows() {
        let mut out = vec![String::new(); start_col];
        out.extend(row.iter().map(cell_text));
        rows.push(out);
    }
    rows
}

/// Display text for one cell. Numbers keep Rust's shortest float form, so
/// an integral float reads `3`, not `3.0`. Dates stay as their serial number.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => e.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;
    use std::io::Write;

    /// Two sheets: `Items` from A1, `Notes` with a single cell at B3
    fn write_two_sheet_xlsx(path: &Path) {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let items = workbook.add_worksheet();
        items.set_name("Items").unwrap();
        items.write_string(0, 0, "qty").unwrap();
        items.write_number(0, 1, 3.0).unwrap();
        let notes = workbook.add_worksheet();
        notes.set_name("Notes").unwrap();
        notes.write_string(2, 1, "late").unwrap();
        workbook.save(path).unwrap();
    }

    fn assert_two_sheet_book(book: &RawWorkbook) {
        assert_eq!(
            book.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["Items", "Notes"]
        );
        assert_eq!(book["Items"], vec![vec!["qty".to_string(), "3".to_string()]]);
        let notes = &book["Notes"];
        assert_eq!(notes.len(), 3);
        assert!(notes[0].is_empty());
        assert!(notes[1].is_empty());
        assert_eq!(notes[2], vec![String::new(), "late".to_string()]);
    }

    #[test]
    fn reads_real_xlsx_with_absolute_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        write_two_sheet_xlsx(&path);
        let book = CalamineReader.read(&path).unwrap();
        assert_two_sheet_book(&book);
    }

    #[test]
    fn xlsx_saved_under_xls_name_opens_through_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        write_two_sheet_xlsx(&path);
        let misnamed = dir.path().join("r5-book.xls");
        std::fs::copy(&path, &misnamed).unwrap();
        let book = CalamineReader.read(&misnamed).unwrap();
        assert_two_sheet_book(&book);
    }

    #[test]
    fn extensionless_snapshot_opens_through_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        write_two_sheet_xlsx(&path);
        let bare = dir.path().join("snapshot");
        std::fs::copy(&path, &bare).unwrap();
        let book = CalamineReader.read(&bare).unwrap();
        assert_two_sheet_book(&book);
    }

    #[test]
    fn cell_text_formats_scalars() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("abc".into())), "abc");
        assert_eq!(cell_text(&Data::Float(3.0)), "3");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Int(-7)), "-7");
        assert_eq!(cell_text(&Data::Bool(true)), "TRUE");
        assert_eq!(cell_text(&Data::Bool(false)), "FALSE");
    }

    #[test]
    fn cell_text_shows_error_cells_as_excel_does() {
        assert_eq!(cell_text(&Data::Error(CellErrorType::Div0)), "#DIV/0!");
        assert_eq!(cell_text(&Data::Error(CellErrorType::NA)), "#N/A");
    }

    #[test]
    fn cell_text_keeps_whitespace() {
        assert_eq!(cell_text(&Data::String("  padded ".into())), "  padded ");
    }

    #[test]
    fn range_starting_at_origin_maps_directly() {
        let mut range: Range<Data> = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("a".into()));
        range.set_value((1, 1), Data::Int(5));
        let rows = range_to_rows(&range);
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string(), String::new()],
                vec![String::new(), "5".to_string()],
            ]
        );
    }

    #[test]
    fn range_not_at_origin_is_offset_to_absolute_coordinates() {
        let mut range: Range<Data> = Range::new((2, 1), (2, 2));
        range.set_value((2, 1), Data::String("x".into()));
        range.set_value((2, 2), Data::String("y".into()));
        let rows = range_to_rows(&range);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_empty());
        assert!(rows[1].is_empty());
        assert_eq!(rows[2], vec![String::new(), "x".to_string(), "y".to_string()]);
    }

    #[test]
    fn empty_range_gives_empty_grid() {
        let range: Range<Data> = Range::empty();
        assert!(range_to_rows(&range).is_empty());
    }

    #[test]
    fn garbage_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"definitely not a workbook").unwrap();
        drop(f);
        assert!(CalamineReader.read(&path).is_err());
    }

    #[test]
    fn missing_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CalamineReader.read(&dir.path().join("nope.xls")).is_err());
    }
}
