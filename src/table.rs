use std::fmt;

use sxd_document::dom::{Document, Element};

use crate::{codec::CellAttributes, node::CellKind, number::ParsedInt, options::TableOptions, Error};

/// A decoded `td`/`th` element and where it starts on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub kind: CellKind,
    pub attrs: CellAttributes,
    pub text: String,
    pub row: usize,
    pub column: usize,
}

impl TableCell {
    pub fn is_header(&self) -> bool {
        self.kind == CellKind::Header
    }

    /// Width hint for grid column `column`, if this cell covers it.
    pub fn width_at(&self, column: usize) -> Option<u32> {
        let offset = column.checked_sub(self.column)?;
        match self.attrs.colwidth.as_ref()?.get(offset)? {
            ParsedInt::Value(v) if *v > 0 => u32::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for TableCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<T> {
    size: (usize, usize),
    cells: Vec<Option<T>>,
}

impl<T> Table<T> {
    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    pub fn set(&mut self, row: usize, col: usize, item: T) {
        self.cells[row * self.size.1 + col] = Some(item);
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.size.0 || col >= self.size.1 {
            return None;
        }
        self.cells[row * self.size.1 + col].as_ref()
    }

    pub fn rows(&self) -> Vec<Vec<Option<&T>>> {
        (0..self.size.0)
            .map(|i| (0..self.size.1).map(|j| self.get(i, j)).collect())
            .collect()
    }
}

impl<T> Table<T>
where
    T: Clone,
{
    pub fn new(size: (usize, usize)) -> Self {
        Self {
            size,
            cells: vec![None; size.0 * size.1],
        }
    }

    pub fn map<T2>(&self, f: impl Fn(usize, usize, &T) -> T2) -> Table<T2>
    where
        T2: Clone,
    {
        let mut new_table = Table::new(self.size);
        for i in 0..self.size.0 {
            for j in 0..self.size.1 {
                if let Some(item) = self.get(i, j) {
                    new_table.set(i, j, f(i, j, item));
                }
            }
        }
        new_table
    }
}

impl Table<TableCell> {
    pub fn to_string_table_with_header(&self) -> Table<(String, bool)> {
        self.map(|_, _, cell| (cell.text.clone(), cell.is_header()))
    }

    /// Per-column pixel widths. The first cell, in row order, with a positive
    /// `colwidth` entry for a column decides that column's width.
    pub fn column_widths(&self) -> Vec<Option<u32>> {
        (0..self.size.1)
            .map(|j| (0..self.size.0).find_map(|i| self.get(i, j)?.width_at(j)))
            .collect()
    }

    /// Sum of column widths, with `cell_min_width` for columns without a hint.
    pub fn min_width(&self, options: &TableOptions) -> u64 {
        self.column_widths()
            .iter()
            .map(|w| u64::from(w.unwrap_or(options.cell_min_width)))
            .sum()
    }

    /// `<colgroup>` with one `<col>` per grid column, or `None` when the
    /// table is not resizable. Columns without a width hint get a
    /// `min-width` of `cell_min_width`.
    pub fn write_colgroup<'d>(
        &self,
        document: &Document<'d>,
        options: &TableOptions,
    ) -> Option<Element<'d>> {
        if !options.resizable {
            return None;
        }
        let colgroup = document.create_element("colgroup");
        for width in self.column_widths() {
            let col = document.create_element("col");
            let style = match width {
                Some(w) => format!("width: {w}px"),
                None => format!("min-width: {}px", options.cell_min_width),
            };
            col.set_attribute_value("style", &style);
            colgroup.append_child(col);
        }
        Some(colgroup)
    }
}

impl<T> Table<T>
where
    T: fmt::Display,
{
    pub fn write_csv(&self, writer: &mut impl std::io::Write) -> Result<(), Error> {
        let mut writer = csv::Writer::from_writer(writer);
        for row in &self.rows() {
            let mut record = csv::StringRecord::new();
            for cell in row {
                match cell {
                    Some(item) => record.push_field(&item.to_string()),
                    None => record.push_field(""),
                }
            }
            writer.write_record(&record)?;
        }
        writer.flush().map_err(|_| Error::FailedToConvertToCSV)?;
        Ok(())
    }

    pub fn to_csv(&self) -> Result<String, Error> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|_| Error::FailedToConvertToCSV)
    }
}
