use std::collections::HashMap;

use sxd_xpath::{nodeset::Node, Context, Factory, Value};

use crate::{
    element_utils,
    number::ParsedInt,
    table::{Table, TableCell},
    Error,
};

/// Browsers stop honouring `colspan` past this value.
const MAX_COLSPAN: usize = 1000;

struct TableSupport<'a>(Node<'a>);

impl<'a> TableSupport<'a> {
    /// Rows grouped by `thead`/`tbody`/`tfoot`. Consecutive rows placed
    /// directly under the table form one group.
    fn row_groups(&self) -> Result<Vec<Vec<Node<'a>>>, Error> {
        let mut groups: Vec<Vec<Node<'a>>> = vec![];
        let mut loose: Vec<Node<'a>> = vec![];
        for child in nodes(self.0, "./thead|./tbody|./tfoot|./tr")? {
            let is_row = child
                .element()
                .is_some_and(|e| e.name().local_part().eq_ignore_ascii_case("tr"));
            if is_row {
                loose.push(child);
                continue;
            }
            if !loose.is_empty() {
                groups.push(std::mem::take(&mut loose));
            }
            groups.push(nodes(child, "./tr")?);
        }
        if !loose.is_empty() {
            groups.push(loose);
        }
        Ok(groups)
    }

    fn cell_nodes(&self, tr: Node<'a>) -> Result<Vec<Node<'a>>, Error> {
        nodes(tr, "./td|./th")
    }
}

pub fn evaluate_xpath_node<'a>(
    node: impl Into<Node<'a>>,
    expr: &str,
) -> Result<Value<'a>, sxd_xpath::Error> {
    let factory = Factory::new();
    let expression = factory.build(expr)?;
    let expression = expression.ok_or(sxd_xpath::Error::NoXPath)?;
    let context = Context::new();
    expression
        .evaluate(&context, node.into())
        .map_err(Into::into)
}

fn nodes<'a>(node: impl Into<Node<'a>>, expr: &str) -> Result<Vec<Node<'a>>, Error> {
    match evaluate_xpath_node(node, expr).map_err(Error::XPathEvaluationError)? {
        Value::Nodeset(set) => Ok(set.document_order()),
        _ => Err(Error::InvalidDocument),
    }
}

pub fn extract_table_nodes<'a>(node: impl Into<Node<'a>>) -> Result<Vec<Node<'a>>, Error> {
    nodes(node, "//table")
}

pub fn extract_cell_nodes<'a>(node: impl Into<Node<'a>>) -> Result<Vec<Node<'a>>, Error> {
    nodes(node, "//td|//th")
}

pub fn node_to_cell(node: Node, row: usize, column: usize) -> Result<TableCell, Error> {
    let Some(element) = node.element() else {
        return Err(Error::InvalidDocument);
    };
    let Some(kind) = element_utils::cell_kind(element) else {
        return Err(Error::InvalidDocument);
    };
    Ok(TableCell {
        kind,
        attrs: element_utils::extract_cell_attributes(element),
        text: node.string_value(),
        row,
        column,
    })
}

pub fn extract_table_nodes_to_table<'a>(
    node: impl Into<Node<'a>>,
) -> Result<Vec<Table<TableCell>>, Error> {
    let mut tables = vec![];
    for node in extract_table_nodes(node)? {
        tables.push(node_to_table(node)?);
    }
    Ok(tables)
}

fn node_to_table<'a>(node: impl Into<Node<'a>>) -> Result<Table<TableCell>, Error> {
    let mut map: HashMap<(usize, usize), TableCell> = HashMap::new();
    let t = TableSupport(node.into());
    let mut group_start = 0;
    for group in t.row_groups()? {
        for (offset, tr_node) in group.iter().enumerate() {
            let row_index = group_start + offset;
            let rows_left = group.len() - offset;
            let mut col_index = 0;
            for td_node in t.cell_nodes(*tr_node)? {
                while map.contains_key(&(row_index, col_index)) {
                    col_index += 1;
                }
                let cell = node_to_cell(td_node, row_index, col_index)?;
                // rowspan="0" runs to the end of the row group
                let row_size = match cell.attrs.rowspan {
                    ParsedInt::Value(0) => rows_left,
                    rowspan => rowspan.span().min(rows_left),
                };
                let col_size = cell.attrs.colspan.span().min(MAX_COLSPAN);
                for k in 0..row_size {
                    for l in 0..col_size {
                        map.insert((row_index + k, col_index + l), cell.clone());
                    }
                }
                col_index += col_size;
            }
        }
        group_start += group.len();
    }

    let size = if map.is_empty() {
        (0, 0)
    } else {
        let rows = map.keys().map(|(i, _)| *i).max().unwrap_or(0) + 1;
        let cols = map.keys().map(|(_, j)| *j).max().unwrap_or(0) + 1;
        (rows, cols)
    };
    tracing::trace!(rows = size.0, cols = size.1, "laid out table");

    let mut table = Table::new(size);
    for ((i, j), item) in map {
        table.set(i, j, item);
    }
    Ok(table)
}
