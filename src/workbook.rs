//! Thin wrapper over the workbook reader: a file path and a 1-based sheet
//! number in, a rectangular matrix of raw cells out. Missing files and
//! out-of-range sheet numbers are the fatal cases; everything cell-shaped is
//! left to the parsers.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::{JangbuError, Result};
use crate::parsers::{cell_text, is_row_empty};

/// Sheet holding the predefined child/parent category pairs.
pub const CATEGORY_MAP_SHEET: usize = 4;
/// Header rows above the mapping region.
pub const CATEGORY_MAP_SKIP: usize = 1;
const CATEGORY_MAP_CHILD_COL: usize = 0;
const CATEGORY_MAP_PARENT_COL: usize = 1;

pub fn read_sheet(path: &Path, sheet: usize) -> Result<Vec<Vec<Data>>> {
    if !path.exists() {
        return Err(JangbuError::MissingWorkbook(path.to_path_buf()));
    }
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| JangbuError::Workbook(format!("{}: {e}", path.display())))?;
    let count = workbook.sheet_names().len();
    if sheet == 0 || sheet > count {
        return Err(JangbuError::SheetOutOfRange {
            path: path.to_path_buf(),
            sheet,
            count,
        });
    }
    let range = workbook
        .worksheet_range_at(sheet - 1)
        .ok_or_else(|| JangbuError::SheetOutOfRange {
            path: path.to_path_buf(),
            sheet,
            count,
        })?
        .map_err(|e| JangbuError::Workbook(format!("{}: {e}", path.display())))?;
    Ok(range.rows().map(|r| r.to_vec()).collect())
}

/// Read the fixed child/parent region off the mapping sheet. A workbook
/// without that sheet simply has no predefined mapping; that is not an
/// error, unlike a bad index on a data sheet.
pub fn read_category_map(path: &Path) -> Result<Vec<(String, String)>> {
    let rows = match read_sheet(path, CATEGORY_MAP_SHEET) {
        Ok(rows) => rows,
        Err(JangbuError::SheetOutOfRange { .. }) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    Ok(extract_category_pairs(&rows))
}

pub fn extract_category_pairs(rows: &[Vec<Data>]) -> Vec<(String, String)> {
    rows.iter()
        .skip(CATEGORY_MAP_SKIP)
        .filter(|row| !is_row_empty(row))
        .filter_map(|row| {
            let child = cell_text(row, CATEGORY_MAP_CHILD_COL)?;
            let parent = cell_text(row, CATEGORY_MAP_PARENT_COL)?;
            Some((child, parent))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_sheet_missing_file() {
        let err = read_sheet(Path::new("/no/such/file.xlsx"), 1).unwrap_err();
        assert!(matches!(err, JangbuError::MissingWorkbook(_)));
    }

    #[test]
    fn test_extract_category_pairs_skips_header_and_blanks() {
        let rows = vec![
            vec![Data::String("분류".into()), Data::String("상위분류".into())],
            vec![Data::String("식비".into()), Data::String("생활비".into())],
            vec![Data::Empty, Data::Empty],
            vec![Data::String(" 교통비 ".into()), Data::String("생활비".into())],
            vec![Data::String("미분류".into()), Data::Empty],
        ];
        let pairs = extract_category_pairs(&rows);
        assert_eq!(
            pairs,
            vec![
                ("식비".to_string(), "생활비".to_string()),
                ("교통비".to_string(), "생활비".to_string()),
            ]
        );
    }
}
