//! Spreadsheet input for cities and products.
//!
//! Both workbooks carry a header row followed by fixed-position columns.
//! Columns past the used ones are ignored and fully empty rows are skipped.
//! A cell that cannot be converted aborts the import with its row and column.

use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Xlsx, XlsxError, open_workbook};
use thiserror::Error;

const CITY_ID: usize = 0;
const CITY_NAME: usize = 1;
const CITY_LATITUDE: usize = 2;
const CITY_LONGITUDE: usize = 3;

const PRODUCT_ID: usize = 0;
const PRODUCT_BRAND: usize = 1;
const PRODUCT_MODEL: usize = 2;
const PRODUCT_BODY_TYPE: usize = 3;
const PRODUCT_YEAR: usize = 4;
const PRODUCT_PRICE: usize = 5;

/// Errors raised while reading input workbooks
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to open workbook {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },
    #[error("failed to read sheet '{sheet}' from {path}: {source}")]
    Worksheet {
        path: PathBuf,
        sheet: String,
        #[source]
        source: XlsxError,
    },
    #[error("sheet '{sheet}' row {row}, column '{column}': {problem}")]
    InvalidCell {
        sheet: String,
        row: usize,
        column: &'static str,
        problem: String,
    },
}

/// One data row of the city sheet
#[derive(Debug, Clone, PartialEq)]
pub struct CityRow {
    pub id: i32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One data row of the product sheet
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub id: i32,
    pub brand: String,
    pub model: String,
    pub body_type: String,
    pub year: i32,
    pub price: f64,
}

/// A data row with its 1-based spreadsheet row number
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row: usize,
    pub cells: Vec<Data>,
}

/// Reads every data row of `sheet`, aligned so that index 0 is column A.
pub fn read_rows(path: &Path, sheet: &str) -> Result<Vec<RawRow>, SheetError> {
    let mut workbook = open_workbook::<Xlsx<_>, _>(path).map_err(|source| SheetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|source| SheetError::Worksheet {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
            source,
        })?;

    let Some((start_row, start_col)) = range.start() else {
        return Ok(Vec::new());
    };
    // The header lives on the first spreadsheet row; a range starting lower has no header.
    let skip = usize::from(start_row == 0);

    let rows = range
        .rows()
        .enumerate()
        .skip(skip)
        .filter(|(_, cells)| cells.iter().any(|cell| !matches!(cell, Data::Empty)))
        .map(|(offset, cells)| {
            let mut aligned = vec![Data::Empty; start_col as usize];
            aligned.extend_from_slice(cells);
            RawRow {
                row: start_row as usize + offset + 1,
                cells: aligned,
            }
        })
        .collect();

    Ok(rows)
}

/// Reads and converts every row of the city sheet.
pub fn read_city_rows(path: &Path, sheet: &str) -> Result<Vec<CityRow>, SheetError> {
    read_rows(path, sheet)?
        .iter()
        .map(|raw| CityRow::from_cells(sheet, raw.row, &raw.cells))
        .collect()
}

/// Reads and converts every row of the product sheet.
pub fn read_product_rows(path: &Path, sheet: &str) -> Result<Vec<ProductRow>, SheetError> {
    read_rows(path, sheet)?
        .iter()
        .map(|raw| ProductRow::from_cells(sheet, raw.row, &raw.cells))
        .collect()
}

impl CityRow {
    pub fn from_cells(sheet: &str, row: usize, cells: &[Data]) -> Result<Self, SheetError> {
        let cell = CellReader { sheet, row, cells };
        Ok(Self {
            id: cell.int(CITY_ID, "id")?,
            name: cell.text(CITY_NAME, "name")?,
            latitude: cell.float(CITY_LATITUDE, "latitude")?,
            longitude: cell.float(CITY_LONGITUDE, "longitude")?,
        })
    }
}

impl ProductRow {
    pub fn from_cells(sheet: &str, row: usize, cells: &[Data]) -> Result<Self, SheetError> {
        let cell = CellReader { sheet, row, cells };
        Ok(Self {
            id: cell.int(PRODUCT_ID, "id")?,
            brand: cell.text(PRODUCT_BRAND, "brand")?,
            model: cell.text(PRODUCT_MODEL, "model")?,
            body_type: cell.text(PRODUCT_BODY_TYPE, "body type")?,
            year: cell.int(PRODUCT_YEAR, "year")?,
            price: cell.float(PRODUCT_PRICE, "price")?,
        })
    }
}

struct CellReader<'a> {
    sheet: &'a str,
    row: usize,
    cells: &'a [Data],
}

impl CellReader<'_> {
    fn invalid(&self, column: &'static str, problem: impl Into<String>) -> SheetError {
        SheetError::InvalidCell {
            sheet: self.sheet.to_string(),
            row: self.row,
            column,
            problem: problem.into(),
        }
    }

    fn get(&self, index: usize, column: &'static str) -> Result<&Data, SheetError> {
        match self.cells.get(index) {
            None | Some(Data::Empty) => Err(self.invalid(column, "cell is empty")),
            Some(value) => Ok(value),
        }
    }

    /// Integers accept whole numbers, truncated floats and numeric text.
    fn int(&self, index: usize, column: &'static str) -> Result<i32, SheetError> {
        let value = match self.get(index, column)? {
            Data::Int(v) => *v,
            Data::Float(v) if v.is_finite() => v.trunc() as i64,
            Data::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| self.invalid(column, format!("'{s}' is not an integer")))?,
            other => return Err(self.invalid(column, format!("'{other}' is not an integer"))),
        };
        i32::try_from(value).map_err(|_| self.invalid(column, format!("{value} is out of range")))
    }

    fn float(&self, index: usize, column: &'static str) -> Result<f64, SheetError> {
        match self.get(index, column)? {
            Data::Int(v) => Ok(*v as f64),
            Data::Float(v) => Ok(*v),
            Data::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| self.invalid(column, format!("'{s}' is not a number"))),
            other => Err(self.invalid(column, format!("'{other}' is not a number"))),
        }
    }

    fn text(&self, index: usize, column: &'static str) -> Result<String, SheetError> {
        match self.get(index, column)? {
            Data::String(s) => Ok(s.clone()),
            other => Ok(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> Data {
        Data::String(value.to_string())
    }

    #[test]
    fn parses_city_row_with_extra_columns() {
        let cells = vec![
            Data::Float(1.0),
            s("A"),
            Data::Float(1.0),
            Data::Float(2.0),
            s("ignored"),
        ];
        let row = CityRow::from_cells("city", 2, &cells).unwrap();
        assert_eq!(
            row,
            CityRow {
                id: 1,
                name: "A".to_string(),
                latitude: 1.0,
                longitude: 2.0,
            }
        );
    }

    #[test]
    fn parses_product_row_with_text_numbers() {
        let cells = vec![
            Data::Int(10),
            s("Toyota"),
            s("Avanza"),
            s("MPV"),
            s("2019"),
            s(" 150000000 "),
        ];
        let row = ProductRow::from_cells("car_product", 3, &cells).unwrap();
        assert_eq!(row.id, 10);
        assert_eq!(row.brand, "Toyota");
        assert_eq!(row.model, "Avanza");
        assert_eq!(row.body_type, "MPV");
        assert_eq!(row.year, 2019);
        assert_eq!(row.price, 150_000_000.0);
    }

    #[test]
    fn non_numeric_year_names_row_and_column() {
        let cells = vec![
            Data::Int(10),
            s("Toyota"),
            s("Avanza"),
            s("MPV"),
            s("new"),
            Data::Float(1.0),
        ];
        let err = ProductRow::from_cells("car_product", 7, &cells).unwrap_err();
        match err {
            SheetError::InvalidCell { row, column, .. } => {
                assert_eq!(row, 7);
                assert_eq!(column, "year");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_cell_is_rejected() {
        let cells = vec![Data::Int(1), s("A"), Data::Float(1.0)];
        let err = CityRow::from_cells("city", 2, &cells).unwrap_err();
        assert!(err.to_string().contains("longitude"));
    }

    #[test]
    fn missing_workbook_fails_to_open() {
        let err = read_rows(Path::new("does/not/exist.xlsx"), "city").unwrap_err();
        assert!(matches!(err, SheetError::Open { .. }));
    }
}
