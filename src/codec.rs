//! Mapping between raw markup attributes and [`CellAttributes`].
//!
//! Absent attributes decode to their defaults. Present but malformed numbers
//! decode to [`ParsedInt::NotANumber`] and are carried along as-is. Encoding
//! only emits attributes that differ from their defaults.

use std::collections::{BTreeMap, HashMap};

use crate::number::{parse_int, ParsedInt};

pub const COLSPAN: &str = "colspan";
pub const ROWSPAN: &str = "rowspan";
pub const COLWIDTH: &str = "colwidth";

const COLWIDTH_DELIMITER: char = ',';

/// Raw markup attributes, keyed by attribute name.
pub type RawAttributes = BTreeMap<String, String>;

/// Lookup of raw attribute values by name.
pub trait AttributeSource {
    fn attribute(&self, name: &str) -> Option<&str>;
}

impl AttributeSource for HashMap<String, String> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl AttributeSource for BTreeMap<String, String> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl AttributeSource for sxd_document::dom::Element<'_> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attribute_value(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellAttributes {
    pub colspan: ParsedInt,
    pub rowspan: ParsedInt,
    pub colwidth: Option<Vec<ParsedInt>>,
}

impl Default for CellAttributes {
    fn default() -> Self {
        Self {
            colspan: ParsedInt::Value(1),
            rowspan: ParsedInt::Value(1),
            colwidth: None,
        }
    }
}

impl CellAttributes {
    pub fn new(colspan: i64, rowspan: i64) -> Self {
        Self {
            colspan: colspan.into(),
            rowspan: rowspan.into(),
            colwidth: None,
        }
    }

    pub fn with_colwidth(mut self, widths: impl IntoIterator<Item = i64>) -> Self {
        self.colwidth = Some(widths.into_iter().map(ParsedInt::from).collect());
        self
    }

    pub fn has_sentinel(&self) -> bool {
        self.colspan.is_nan()
            || self.rowspan.is_nan()
            || self
                .colwidth
                .as_ref()
                .is_some_and(|widths| widths.iter().any(|w| w.is_nan()))
    }
}

/// Empty values count as absent.
fn present<'a>(source: &'a impl AttributeSource, name: &str) -> Option<&'a str> {
    source.attribute(name).filter(|value| !value.is_empty())
}

fn parse_logged(name: &str, raw: &str) -> ParsedInt {
    let parsed = parse_int(raw);
    if parsed.is_nan() {
        tracing::debug!(attribute = name, raw, "attribute is not a number");
    }
    parsed
}

pub fn decode_span(source: &impl AttributeSource, name: &str) -> ParsedInt {
    match present(source, name) {
        Some(raw) => parse_logged(name, raw),
        None => ParsedInt::Value(1),
    }
}

pub fn decode_colwidth(source: &impl AttributeSource) -> Option<Vec<ParsedInt>> {
    let raw = present(source, COLWIDTH)?;
    Some(
        raw.split(COLWIDTH_DELIMITER)
            .map(|segment| parse_logged(COLWIDTH, segment))
            .collect(),
    )
}

pub fn decode(source: &impl AttributeSource) -> CellAttributes {
    CellAttributes {
        colspan: decode_span(source, COLSPAN),
        rowspan: decode_span(source, ROWSPAN),
        colwidth: decode_colwidth(source),
    }
}

/// Writes `span` only when it is truthy and greater than 1.
pub fn encode_span(name: &str, span: ParsedInt, out: &mut RawAttributes) {
    if !span.is_truthy() {
        return;
    }
    if let ParsedInt::Value(v @ 2..) = span {
        out.insert(name.to_string(), v.to_string());
    }
}

pub fn encode_colwidth(colwidth: Option<&[ParsedInt]>, out: &mut RawAttributes) {
    let Some(widths) = colwidth else {
        return;
    };
    let joined = widths
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    out.insert(COLWIDTH.to_string(), joined);
}

pub fn encode(attrs: &CellAttributes) -> RawAttributes {
    let mut out = RawAttributes::new();
    encode_span(COLSPAN, attrs.colspan, &mut out);
    encode_span(ROWSPAN, attrs.rowspan, &mut out);
    encode_colwidth(attrs.colwidth.as_deref(), &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawAttributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_decode_defaults() {
        let attrs = decode(&RawAttributes::new());
        assert_eq!(attrs, CellAttributes::default());
        assert_eq!(attrs.colspan, ParsedInt::Value(1));
        assert_eq!(attrs.rowspan, ParsedInt::Value(1));
        assert_eq!(attrs.colwidth, None);

        // empty values are treated like missing ones
        let attrs = decode(&raw(&[("colspan", ""), ("rowspan", ""), ("colwidth", "")]));
        assert_eq!(attrs, CellAttributes::default());
    }

    #[test]
    fn test_decode_values_without_clamping() {
        for (text, expected) in [("1", 1), ("2", 2), ("3", 3), ("100", 100), ("5000", 5000)] {
            let attrs = decode(&raw(&[("colspan", text), ("rowspan", text)]));
            assert_eq!(attrs.colspan, ParsedInt::Value(expected));
            assert_eq!(attrs.rowspan, ParsedInt::Value(expected));
        }
    }

    #[test]
    fn test_decode_malformed() {
        let attrs = decode(&raw(&[("colspan", "abc")]));
        assert_eq!(attrs.colspan, ParsedInt::NotANumber);
        assert_eq!(attrs.rowspan, ParsedInt::Value(1));
        assert!(attrs.has_sentinel());

        let attrs = decode(&raw(&[("colwidth", "100,x,50")]));
        assert_eq!(
            attrs.colwidth,
            Some(vec![
                ParsedInt::Value(100),
                ParsedInt::NotANumber,
                ParsedInt::Value(50)
            ])
        );

        // trailing delimiter yields an empty, unparsable segment
        let attrs = decode(&raw(&[("colwidth", "100,")]));
        assert_eq!(
            attrs.colwidth,
            Some(vec![ParsedInt::Value(100), ParsedInt::NotANumber])
        );
    }

    #[test]
    fn test_decode_colwidth_keeps_order_and_duplicates() {
        let attrs = decode(&raw(&[("colwidth", "200,100,200")]));
        assert_eq!(
            attrs.colwidth,
            Some(vec![
                ParsedInt::Value(200),
                ParsedInt::Value(100),
                ParsedInt::Value(200)
            ])
        );
    }

    #[test]
    fn test_encode_minimal() {
        assert_eq!(encode(&CellAttributes::default()), RawAttributes::new());
        assert_eq!(encode(&CellAttributes::new(1, 1)), RawAttributes::new());

        for n in [2, 3, 100] {
            let out = encode(&CellAttributes::new(n, 1));
            assert_eq!(out, raw(&[("colspan", n.to_string().as_str())]));
        }

        let out = encode(&CellAttributes::new(1, 4));
        assert_eq!(out, raw(&[("rowspan", "4")]));

        // zero, negative and sentinel spans are never written
        let attrs = CellAttributes {
            colspan: ParsedInt::Value(0),
            rowspan: ParsedInt::NotANumber,
            colwidth: None,
        };
        assert_eq!(encode(&attrs), RawAttributes::new());
        assert_eq!(encode(&CellAttributes::new(-3, 1)), RawAttributes::new());
    }

    #[test]
    fn test_encode_colwidth() {
        let out = encode(&CellAttributes::default().with_colwidth([100, 200, 50]));
        assert_eq!(out, raw(&[("colwidth", "100,200,50")]));

        // present but empty still emits the key
        let out = encode(&CellAttributes::default().with_colwidth([]));
        assert_eq!(out, raw(&[("colwidth", "")]));

        let attrs = CellAttributes {
            colwidth: Some(vec![ParsedInt::Value(80), ParsedInt::NotANumber]),
            ..CellAttributes::default()
        };
        assert_eq!(encode(&attrs), raw(&[("colwidth", "80,NaN")]));
    }

    #[test]
    fn test_round_trip() {
        let cases = [
            CellAttributes::default(),
            CellAttributes::new(2, 1),
            CellAttributes::new(1, 3),
            CellAttributes::new(4, 5).with_colwidth([10, 20, 30, 40]),
            CellAttributes::default().with_colwidth([100, 200, 50]),
        ];
        for attrs in cases {
            assert!(!attrs.has_sentinel());
            assert_eq!(decode(&encode(&attrs)), attrs);
        }
    }

    #[test]
    fn test_round_trip_sweep() {
        let widths: [&[i64]; 5] = [&[], &[100], &[100, 200], &[1, 1, 1], &[640, 80, 80, 12]];
        for colspan in 1..=200 {
            for rowspan in [1, 2, 3, 17, 65534] {
                let attrs = CellAttributes::new(colspan, rowspan);
                assert_eq!(decode(&encode(&attrs)), attrs);

                for w in widths {
                    let attrs = CellAttributes::new(colspan, rowspan).with_colwidth(w.iter().copied());
                    let encoded = encode(&attrs);
                    assert_eq!(encoded.contains_key("colspan"), colspan > 1);
                    assert_eq!(encoded.contains_key("rowspan"), rowspan > 1);
                    if w.is_empty() {
                        // an empty colwidth encodes to "", which reads back as absent
                        assert_eq!(decode(&encoded), CellAttributes::new(colspan, rowspan));
                    } else {
                        assert_eq!(decode(&encoded), attrs);
                    }
                }
            }
        }
    }

    #[test]
    fn test_decode_is_total() {
        let long = "x".repeat(100_000);
        let long_list = vec!["5"; 10_000].join(",");
        let inputs = [
            "١٢",
            "日本語",
            "\0",
            "1\0",
            "\u{FEFF}",
            ",,,",
            long.as_str(),
            long_list.as_str(),
        ];
        for input in inputs {
            let source = raw(&[("colspan", input), ("rowspan", input), ("colwidth", input)]);
            let attrs = decode(&source);
            let segments = input.split(',').count();
            assert_eq!(attrs.colwidth.as_ref().map(Vec::len), Some(segments));
            // encoding the result never fails either
            let _ = encode(&attrs);
        }

        let attrs = decode(&raw(&[("colspan", "١٢"), ("colwidth", long_list.as_str())]));
        assert_eq!(attrs.colspan, ParsedInt::NotANumber);
        assert_eq!(attrs.colwidth, Some(vec![ParsedInt::Value(5); 10_000]));
    }

    #[test]
    fn test_scenarios() {
        let attrs = decode(&raw(&[("colspan", "2"), ("rowspan", "1")]));
        assert_eq!(attrs, CellAttributes::new(2, 1));
        assert_eq!(encode(&attrs), raw(&[("colspan", "2")]));

        let attrs = decode(&raw(&[("colwidth", "100,150")]));
        assert_eq!(attrs, CellAttributes::default().with_colwidth([100, 150]));
        assert_eq!(encode(&attrs), raw(&[("colwidth", "100,150")]));
    }

    #[test]
    fn test_decode_from_hash_map() {
        let mut map = HashMap::new();
        map.insert("rowspan".to_string(), "2".to_string());
        assert_eq!(decode(&map), CellAttributes::new(1, 2));
    }
}
