//! The sprinkles property table: which properties `sprinkles()` accepts and
//! with which values.

mod cache;
mod discover;
mod loader;
mod parse;

use std::collections::BTreeSet;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::extract::{Primitive, PropertyValue};

pub use cache::{needs_refresh, Clock, SchemaCache, SystemClock};
pub use discover::find_schema_file;
pub use loader::SchemaLoader;
pub use parse::parse_schema_source;

static LEGACY_COLOR_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z]+-\d+$|^(white|black|transparent)$").expect("static regex")
});

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaLiteral {
    Str(String),
    Num(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueSpec {
    /// `display: ['none', 'flex']`
    Enumerated(Vec<SchemaLiteral>),
    /// `zIndex: { BASE: 1, MODAL: 500 }`; matches a key or a recorded number.
    EnumeratedRecord(IndexMap<String, f64>),
    /// Keys of a token table, e.g. `color: theme.colors` resolved to the keys
    /// of `colors`.
    TokenSet(BTreeSet<String>),
    /// Legacy color matching by token shape only.
    ColorPattern,
}

/// What a style value looks like to the schema.
#[derive(Debug, Clone, Copy)]
enum Candidate<'a> {
    Str(&'a str),
    Num(f64),
    Other,
}

impl ValueSpec {
    fn admits(&self, candidate: Candidate<'_>) -> bool {
        match (self, candidate) {
            (_, Candidate::Other) => false,
            (ValueSpec::Enumerated(values), candidate) => values.iter().any(|v| match (v, candidate) {
                (SchemaLiteral::Str(a), Candidate::Str(b)) => a == b,
                (SchemaLiteral::Num(a), Candidate::Num(b)) => *a == b,
                _ => false,
            }),
            (ValueSpec::EnumeratedRecord(record), Candidate::Str(s)) => record.contains_key(s),
            (ValueSpec::EnumeratedRecord(record), Candidate::Num(n)) => {
                record.values().any(|v| *v == n)
            }
            (ValueSpec::TokenSet(keys), Candidate::Str(s)) => keys.contains(s),
            (ValueSpec::TokenSet(_), Candidate::Num(_)) => false,
            (ValueSpec::ColorPattern, Candidate::Str(s)) => LEGACY_COLOR_TOKEN.is_match(s),
            (ValueSpec::ColorPattern, Candidate::Num(_)) => false,
        }
    }
}

/// Immutable once built; a reload replaces the whole table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    properties: IndexMap<String, ValueSpec>,
}

impl Schema {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ValueSpec> {
        self.properties.get(name)
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn is_known_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Literals and bare identifiers are compared by value; nested blocks and
    /// preserved expressions are never allowed.
    pub fn is_allowed_value(&self, name: &str, value: &PropertyValue) -> bool {
        let Some(spec) = self.properties.get(name) else {
            return false;
        };
        let candidate = match value {
            PropertyValue::Literal(Primitive::Str(s)) => Candidate::Str(s),
            PropertyValue::Literal(Primitive::Num(n)) => Candidate::Num(*n),
            PropertyValue::Literal(Primitive::Bool(_) | Primitive::Null) => Candidate::Other,
            PropertyValue::Identifier(ident) => Candidate::Str(ident),
            PropertyValue::Nested(_) | PropertyValue::Preserved { .. } => return false,
        };
        spec.admits(candidate)
    }

    /// The table the plugin shipped with before schema loading existed.
    pub fn builtin() -> Self {
        fn strs(values: &[&str]) -> ValueSpec {
            ValueSpec::Enumerated(values.iter().map(|v| SchemaLiteral::Str(v.to_string())).collect())
        }

        let z_index = [
            ("BASE", 1.0),
            ("STICKY", 100.0),
            ("FLOATING", 200.0),
            ("FIXED", 300.0),
            ("MODAL", 500.0),
            ("SNACKBAR", 600.0),
            ("HIGHEST", 999.0),
            ("BOTTOM_SHEET", 1000.0),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect();

        [
            ("position", strs(&["absolute", "relative", "fixed", "sticky", "static"])),
            (
                "display",
                strs(&["none", "flex", "inline-flex", "block", "inline", "grid", "inline-block"]),
            ),
            ("flexDirection", strs(&["row", "column"])),
            (
                "justifyContent",
                strs(&[
                    "stretch",
                    "flex-start",
                    "center",
                    "flex-end",
                    "space-around",
                    "space-between",
                    "space-evenly",
                ]),
            ),
            (
                "alignItems",
                strs(&["stretch", "flex-start", "center", "flex-end", "baseline", "initial"]),
            ),
            ("margin", strs(&["0 auto"])),
            ("width", strs(&["100%", "100vw"])),
            ("height", strs(&["100%", "100vh", "calc(var(--vh, 1vh) * 100)"])),
            ("textAlign", strs(&["left", "center", "right", "start"])),
            ("overflow", strs(&["auto", "hidden", "scroll"])),
            ("borderRadius", ValueSpec::Enumerated(vec![SchemaLiteral::Num(999.0)])),
            (
                "whiteSpace",
                strs(&["normal", "nowrap", "pre", "pre-line", "pre-wrap", "break-spaces"]),
            ),
            ("wordBreak", strs(&["normal", "break-all", "break-word", "keep-all"])),
            ("zIndex", ValueSpec::EnumeratedRecord(z_index)),
            ("color", ValueSpec::ColorPattern),
            ("backgroundColor", ValueSpec::ColorPattern),
        ]
        .into_iter()
        .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, ValueSpec)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, ValueSpec)>>(iter: I) -> Self {
        Self {
            properties: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> PropertyValue {
        PropertyValue::Literal(Primitive::Str(v.into()))
    }

    fn n(v: f64) -> PropertyValue {
        PropertyValue::Literal(Primitive::Num(v))
    }

    #[test]
    fn enumerated_values_compare_strictly() {
        let schema: Schema = [(
            "borderRadius",
            ValueSpec::Enumerated(vec![SchemaLiteral::Num(999.0), SchemaLiteral::Str("50%".into())]),
        )]
        .into_iter()
        .collect();
        assert!(schema.is_allowed_value("borderRadius", &n(999.0)));
        assert!(schema.is_allowed_value("borderRadius", &s("50%")));
        assert!(!schema.is_allowed_value("borderRadius", &s("999")));
        assert!(!schema.is_allowed_value("borderRadius", &n(4.0)));
    }

    #[test]
    fn record_matches_key_or_value() {
        let schema = Schema::builtin();
        assert!(schema.is_allowed_value("zIndex", &s("MODAL")));
        assert!(schema.is_allowed_value("zIndex", &n(500.0)));
        assert!(!schema.is_allowed_value("zIndex", &n(501.0)));
        assert!(!schema.is_allowed_value("zIndex", &s("500")));
    }

    #[test]
    fn token_set_requires_membership() {
        let keys = ["gray-100", "blue-500"].iter().map(|k| k.to_string()).collect();
        let schema: Schema = [("color", ValueSpec::TokenSet(keys))].into_iter().collect();
        assert!(schema.is_allowed_value("color", &s("gray-100")));
        assert!(!schema.is_allowed_value("color", &s("hotpink")));
        assert!(!schema.is_allowed_value("color", &n(100.0)));
    }

    #[test]
    fn legacy_color_pattern() {
        let schema = Schema::builtin();
        assert!(schema.is_allowed_value("color", &s("gray-100")));
        assert!(schema.is_allowed_value("backgroundColor", &s("transparent")));
        assert!(!schema.is_allowed_value("color", &s("hotpink")));
        assert!(!schema.is_allowed_value("color", &s("Gray-100")));
    }

    #[test]
    fn identifiers_compare_by_name() {
        let schema = Schema::builtin();
        assert!(schema.is_allowed_value("display", &PropertyValue::Identifier("flex".into())));
    }

    #[test]
    fn unknown_properties_nested_and_preserved_values_are_rejected() {
        let schema = Schema::builtin();
        assert!(!schema.is_known_property("gap"));
        assert!(!schema.is_allowed_value("gap", &s("4px")));
        assert!(!schema.is_allowed_value(
            "width",
            &PropertyValue::Preserved {
                text: "'100%'".into(),
                kind: crate::extract::PreservedKind::Complex,
            }
        ));
        assert!(!schema.is_allowed_value("width", &PropertyValue::Nested(Default::default())));
        assert!(!schema.is_allowed_value("display", &PropertyValue::Literal(Primitive::Bool(true))));
    }

    #[test]
    fn empty_schema_rejects_everything() {
        let schema = Schema::empty();
        assert!(schema.is_empty());
        assert!(!schema.is_allowed_value("width", &s("100%")));
    }
}
