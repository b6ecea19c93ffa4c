//! Table cell attributes (`colspan`, `rowspan`, `colwidth`) for rich-text
//! editor markup.
//!
//! [`codec::decode`] and [`codec::encode`] translate between raw attribute
//! strings and [`CellAttributes`]. The HTML helpers in this crate parse
//! documents with `sxd_html` and lay decoded cells out on a [`Table`] grid.

pub mod codec;
pub mod element_utils;
pub mod node;
pub mod node_utils;
pub mod number;
pub mod options;
pub mod table;

pub use codec::{decode, encode, AttributeSource, CellAttributes, RawAttributes};
pub use node::CellKind;
pub use number::{parse_int, ParsedInt};
pub use options::TableOptions;
pub use table::{Table, TableCell};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("table not found")]
    TableNotFound,
    #[error("invalid document")]
    InvalidDocument,
    #[error("XPath evaluation failed: {0:?}")]
    XPathEvaluationError(sxd_xpath::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("failed to convert to CSV")]
    FailedToConvertToCSV,
}

/// Parses `html` and lays out every table in it.
pub fn parse_tables(html: &str) -> Result<Vec<Table<TableCell>>, Error> {
    let package = sxd_html::parse_html(html);
    let document = package.as_document();
    node_utils::extract_table_nodes_to_table(document.root())
}

/// Parses the first table in `html`.
pub fn parse_table(html: &str) -> Result<Table<TableCell>, Error> {
    parse_tables(html)?
        .into_iter()
        .next()
        .ok_or(Error::TableNotFound)
}

/// Decodes every `td` and `th` element in `html`, in document order.
pub fn decode_cells(html: &str) -> Result<Vec<(CellKind, CellAttributes)>, Error> {
    let package = sxd_html::parse_html(html);
    let document = package.as_document();
    let mut cells = vec![];
    for node in node_utils::extract_cell_nodes(document.root())? {
        let cell = node_utils::node_to_cell(node, 0, 0)?;
        cells.push((cell.kind, cell.attrs));
    }
    Ok(cells)
}
