use sxd_document::dom::Element;

use crate::{
    codec::{self, CellAttributes, COLSPAN, COLWIDTH, ROWSPAN},
    node::CellKind,
};

pub fn cell_kind(element: Element) -> Option<CellKind> {
    CellKind::from_tag(element.name().local_part())
}

pub fn extract_cell_attributes(element: Element) -> CellAttributes {
    codec::decode(&element)
}

/// Rewrites the span attributes of `element` from `attrs`. Attributes equal
/// to their default are removed.
pub fn apply_cell_attributes(element: Element, attrs: &CellAttributes) {
    for name in [COLSPAN, ROWSPAN, COLWIDTH] {
        element.remove_attribute(name);
    }
    for (name, value) in codec::encode(attrs) {
        element.set_attribute_value(name.as_str(), &value);
    }
}
