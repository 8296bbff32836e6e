//! Merged-range resolution.
//!
//! A merged region stores its value only at the anchor (top-left) cell;
//! every other cell in the region reads as empty. When a direct lookup
//! comes back empty, the extractor asks here whether the coordinate sits
//! inside a merged region and, if so, borrows the anchor's value.

use crate::models::CellValue;
use crate::workbook::Sheet;

/// Resolve a blank cell through the sheet's merged regions.
///
/// Regions are scanned in declaration order and the first one containing
/// (row, col) wins; regions are assumed non-overlapping in practice, so no
/// re-sorting happens. Returns `None` when no region contains the
/// coordinate, or when the winning region's anchor carries no value either.
pub fn resolve_merged(sheet: &Sheet, row: usize, col: usize) -> Option<&CellValue> {
    for range in sheet.merges() {
        if range.contains(row, col) {
            let (anchor_row, anchor_col) = range.anchor();
            let value = sheet.cell(anchor_row, anchor_col);
            return if value.is_empty() { None } else { Some(value) };
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MergedRange;

    fn sheet_with_merges(merges: Vec<MergedRange>) -> Sheet {
        Sheet::new(
            "s",
            vec![
                vec![CellValue::Text("anchor".into()), CellValue::Empty],
                vec![CellValue::Empty, CellValue::Empty],
                vec![CellValue::Empty, CellValue::Text("other".into())],
            ],
            merges,
        )
    }

    #[test]
    fn test_blank_cell_inside_region_yields_anchor() {
        let sheet = sheet_with_merges(vec![MergedRange::new(0, 1, 0, 0)]);
        assert_eq!(
            resolve_merged(&sheet, 1, 0),
            Some(&CellValue::Text("anchor".into()))
        );
    }

    #[test]
    fn test_uncovered_cell_is_absent() {
        let sheet = sheet_with_merges(vec![MergedRange::new(0, 1, 0, 0)]);
        assert_eq!(resolve_merged(&sheet, 2, 0), None);
        assert_eq!(resolve_merged(&sheet, 1, 1), None);
    }

    #[test]
    fn test_first_matching_region_wins() {
        let sheet = sheet_with_merges(vec![
            MergedRange::new(2, 2, 0, 1),
            MergedRange::new(0, 2, 0, 0),
        ]);
        // (2, 0) is inside both regions; the first declared one resolves,
        // to the anchor at (2, 0) itself -- which is empty.
        assert_eq!(resolve_merged(&sheet, 2, 0), None);
    }

    #[test]
    fn test_empty_anchor_is_absent() {
        let sheet = sheet_with_merges(vec![MergedRange::new(1, 2, 0, 0)]);
        assert_eq!(resolve_merged(&sheet, 2, 0), None);
    }
}
