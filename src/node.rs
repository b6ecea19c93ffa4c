//! Cell-like node kinds (`td` and `th`) sharing one attribute codec.

use sxd_document::dom::{Document, Element};

use crate::{
    codec::{self, CellAttributes, RawAttributes, COLSPAN, COLWIDTH, ROWSPAN},
    options::TableOptions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Cell,
    Header,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeDefault {
    Integer(i64),
    Null,
}

/// One attribute declared on a node kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub default: AttributeDefault,
}

impl AttributeSpec {
    pub const fn new(name: &'static str, default: AttributeDefault) -> Self {
        Self { name, default }
    }
}

/// Attributes every cell-like node declares before the span attributes are added.
pub fn base_schema() -> Vec<AttributeSpec> {
    vec![]
}

/// `base` plus `colspan`, `rowspan` and `colwidth`. Same-named entries in
/// `base` are replaced.
pub fn cell_attribute_schema(base: Vec<AttributeSpec>) -> Vec<AttributeSpec> {
    let added = [
        AttributeSpec::new(COLSPAN, AttributeDefault::Integer(1)),
        AttributeSpec::new(ROWSPAN, AttributeDefault::Integer(1)),
        AttributeSpec::new(COLWIDTH, AttributeDefault::Null),
    ];
    let mut schema: Vec<AttributeSpec> = base
        .into_iter()
        .filter(|spec| added.iter().all(|a| a.name != spec.name))
        .collect();
    schema.extend(added);
    schema
}

impl CellKind {
    pub fn tag_name(self) -> &'static str {
        match self {
            CellKind::Cell => "td",
            CellKind::Header => "th",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        if tag.eq_ignore_ascii_case("td") {
            Some(CellKind::Cell)
        } else if tag.eq_ignore_ascii_case("th") {
            Some(CellKind::Header)
        } else {
            None
        }
    }

    pub fn schema(self) -> Vec<AttributeSpec> {
        cell_attribute_schema(base_schema())
    }

    /// Tag name and attributes for serializing a node of this kind. Encoded
    /// cell attributes take precedence over configured ones.
    pub fn render_attributes(
        self,
        options: &TableOptions,
        attrs: &CellAttributes,
    ) -> (&'static str, RawAttributes) {
        let encoded = codec::encode(attrs);
        let merged = merge_attributes(&[options.html_attributes(self), &encoded]);
        (self.tag_name(), merged)
    }

    pub fn write_element<'d>(
        self,
        document: &Document<'d>,
        options: &TableOptions,
        attrs: &CellAttributes,
    ) -> Element<'d> {
        let (tag, rendered) = self.render_attributes(options, attrs);
        let element = document.create_element(tag);
        for (name, value) in &rendered {
            element.set_attribute_value(name.as_str(), value);
        }
        element
    }
}

/// Merges attribute maps left to right. Later maps win, except `class`
/// values are unioned and `style` declarations are merged per property.
pub fn merge_attributes(layers: &[&RawAttributes]) -> RawAttributes {
    let mut merged = RawAttributes::new();
    for layer in layers {
        for (key, value) in layer.iter() {
            let combined = match (key.as_str(), merged.get(key)) {
                ("class", Some(existing)) => merge_class(existing, value),
                ("style", Some(existing)) => merge_style(existing, value),
                _ => value.clone(),
            };
            merged.insert(key.clone(), combined);
        }
    }
    merged
}

fn merge_class(existing: &str, added: &str) -> String {
    let mut classes: Vec<&str> = existing.split_whitespace().collect();
    for class in added.split_whitespace() {
        if !classes.contains(&class) {
            classes.push(class);
        }
    }
    classes.join(" ")
}

fn style_declarations(style: &str) -> impl Iterator<Item = (&str, &str)> {
    style.split(';').filter_map(|decl| {
        let (property, value) = decl.split_once(':')?;
        let property = property.trim();
        if property.is_empty() {
            return None;
        }
        Some((property, value.trim()))
    })
}

fn merge_style(existing: &str, added: &str) -> String {
    let mut declarations: Vec<(&str, &str)> = vec![];
    for (property, value) in style_declarations(existing).chain(style_declarations(added)) {
        match declarations.iter_mut().find(|(p, _)| *p == property) {
            Some(slot) => slot.1 = value,
            None => declarations.push((property, value)),
        }
    }
    declarations
        .iter()
        .map(|(p, v)| format!("{p}: {v}"))
        .collect::<Vec<_>>()
        .join("; ")
}
