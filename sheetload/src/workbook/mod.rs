//! Workbook access.
//!
//! Reads an XLSX file with calamine and materializes each sheet as an
//! absolute cell grid plus its merged-cell regions, so the extraction
//! pipeline never touches calamine types directly. Sheets are cheap to
//! construct by hand, which is how the pipeline tests drive extraction
//! without any file I/O.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook, Data, Dimensions, Range, Reader, Xlsx};

use crate::error::WorkbookResult;
use crate::models::{CellValue, MergedRange};

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One sheet: a rectangular cell grid in absolute coordinates plus the
/// sheet's merged-cell regions in declaration order.
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<CellValue>>,
    merges: Vec<MergedRange>,
    width: usize,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>, merges: Vec<MergedRange>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self {
            name: name.into(),
            rows,
            merges,
            width,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.width
    }

    /// A full row; `None` past the end of the sheet.
    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Cell at (row, col); out-of-bounds coordinates read as empty, the way
    /// a sheet's unused area behaves.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn merges(&self) -> &[MergedRange] {
        &self.merges
    }
}

/// Open an XLSX workbook and read every sheet.
///
/// The file handle lives only for the duration of this call; the returned
/// sheets are fully materialized.
pub fn open_workbook_file(path: &Path) -> WorkbookResult<Vec<Sheet>> {
    let mut workbook: Xlsx<BufReader<File>> = open_workbook(path)?;
    workbook.load_merged_regions()?;

    let names = workbook.sheet_names().to_owned();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook.worksheet_range(&name)?;
        let regions = workbook
            .worksheet_merge_cells(&name)
            .unwrap_or(Ok(Vec::new()))
            .unwrap_or_default();
        sheets.push(sheet_from_range(&name, &range, &regions));
    }
    Ok(sheets)
}

/// Build a [`Sheet`] from a calamine range.
///
/// calamine ranges cover only the used area and carry a start offset;
/// merged-region coordinates are absolute, so the grid is padded back to
/// absolute coordinates before the two are combined.
fn sheet_from_range(name: &str, range: &Range<Data>, regions: &[Dimensions]) -> Sheet {
    let merges = regions
        .iter()
        .map(|d| {
            MergedRange::new(
                d.start.0 as usize,
                d.end.0 as usize,
                d.start.1 as usize,
                d.end.1 as usize,
            )
        })
        .collect();

    let (height, width) = range.get_size();
    if height == 0 || width == 0 {
        return Sheet::new(name, Vec::new(), merges);
    }

    let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
    let (row_offset, col_offset) = (row_offset as usize, col_offset as usize);
    let mut rows = vec![vec![CellValue::Empty; col_offset + width]; row_offset + height];
    for r in 0..height {
        for c in 0..width {
            if let Some(data) = range.get((r, c)) {
                rows[row_offset + r][col_offset + c] = cell_from_data(data);
            }
        }
    }
    Sheet::new(name, rows, merges)
}

/// Convert one calamine cell into the pipeline's cell model.
///
/// Blank strings and error cells read as empty; ISO date/duration strings
/// keep their text form.
fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::DateTime(naive),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Empty,
    }
}
