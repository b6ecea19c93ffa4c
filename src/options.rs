use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{codec::RawAttributes, node::CellKind};

const DEFAULT_CELL_MIN_WIDTH: u32 = 25;

/// Table extension configuration, as found in editor settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableOptions {
    /// Emit a `<colgroup>` carrying column widths when rendering tables.
    pub resizable: bool,
    /// Width in pixels assumed for columns without a `colwidth` hint.
    pub cell_min_width: u32,
    #[serde(rename = "cellHTMLAttributes")]
    pub cell_html_attributes: BTreeMap<String, String>,
    #[serde(rename = "headerHTMLAttributes")]
    pub header_html_attributes: BTreeMap<String, String>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            resizable: true,
            cell_min_width: DEFAULT_CELL_MIN_WIDTH,
            cell_html_attributes: BTreeMap::new(),
            header_html_attributes: BTreeMap::new(),
        }
    }
}

impl TableOptions {
    pub fn html_attributes(&self, kind: CellKind) -> &RawAttributes {
        match kind {
            CellKind::Cell => &self.cell_html_attributes,
            CellKind::Header => &self.header_html_attributes,
        }
    }
}
