use crate::extract::PropertyMap;
use crate::schema::Schema;

/// `movable` and `remaining` are disjoint and together hold every input key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub movable: PropertyMap,
    pub remaining: PropertyMap,
}

impl Classification {
    pub fn has_movable(&self) -> bool {
        !self.movable.is_empty()
    }
}

/// Split `props` into what `sprinkles()` accepts and what must stay in `style()`.
pub fn classify(props: PropertyMap, schema: &Schema) -> Classification {
    let mut out = Classification::default();
    for (key, value) in props {
        if schema.is_allowed_value(&key, &value) {
            out.movable.insert(key, value);
        } else {
            out.remaining.insert(key, value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Primitive, PreservedKind, PropertyValue};
    use crate::schema::{SchemaLiteral, ValueSpec};
    use proptest::prelude::*;

    fn schema() -> Schema {
        let tokens = ["gray-100", "blue-500"].iter().map(|s| s.to_string()).collect();
        [
            ("width", ValueSpec::Enumerated(vec![SchemaLiteral::Str("100%".into())])),
            (
                "display",
                ValueSpec::Enumerated(vec![
                    SchemaLiteral::Str("flex".into()),
                    SchemaLiteral::Str("none".into()),
                ]),
            ),
            ("zIndex", ValueSpec::EnumeratedRecord([("BASE".to_string(), 1.0)].into_iter().collect())),
            ("color", ValueSpec::TokenSet(tokens)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn keeps_source_order_in_both_halves() {
        let props: PropertyMap = [
            ("color", PropertyValue::Literal(Primitive::Str("navy".into()))),
            ("width", PropertyValue::Literal(Primitive::Str("100%".into()))),
            ("gap", PropertyValue::Literal(Primitive::Str("4px".into()))),
            ("display", PropertyValue::Identifier("flex".into())),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        let c = classify(props, &schema());
        let movable: Vec<&str> = c.movable.keys().map(String::as_str).collect();
        let remaining: Vec<&str> = c.remaining.keys().map(String::as_str).collect();
        assert_eq!(movable, ["width", "display"]);
        assert_eq!(remaining, ["color", "gap"]);
        assert!(c.has_movable());
    }

    #[test]
    fn preserved_template_for_known_property_stays() {
        let props: PropertyMap = [(
            "width".to_string(),
            PropertyValue::Preserved {
                text: "`calc(${x}px)`".into(),
                kind: PreservedKind::Template,
            },
        )]
        .into_iter()
        .collect();
        let c = classify(props, &schema());
        assert!(!c.has_movable());
        assert!(c.remaining.contains_key("width"));
    }

    fn value() -> impl Strategy<Value = PropertyValue> {
        prop_oneof![
            prop::sample::select(vec!["100%", "flex", "none", "gray-100", "hotpink", "BASE"])
                .prop_map(|s| PropertyValue::Literal(Primitive::Str(s.to_string()))),
            (0u32..4).prop_map(|n| PropertyValue::Literal(Primitive::Num(f64::from(n)))),
            any::<bool>().prop_map(|b| PropertyValue::Literal(Primitive::Bool(b))),
            "[a-z]{1,6}".prop_map(PropertyValue::Identifier),
            "[a-z%()]{0,8}".prop_map(|text| PropertyValue::Preserved {
                text,
                kind: PreservedKind::Complex,
            }),
        ]
    }

    fn props() -> impl Strategy<Value = PropertyMap> {
        let key = prop::sample::select(vec!["width", "display", "zIndex", "color", "gap", "margin"]);
        prop::collection::vec((key, value()), 0..10)
            .prop_map(|entries| entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    proptest! {
        #[test]
        fn halves_are_disjoint_and_cover_the_input(input in props()) {
            let keys: Vec<String> = input.keys().cloned().collect();
            let c = classify(input, &schema());
            for key in c.movable.keys() {
                prop_assert!(!c.remaining.contains_key(key));
            }
            prop_assert_eq!(c.movable.len() + c.remaining.len(), keys.len());
            for key in &keys {
                prop_assert!(c.movable.contains_key(key) || c.remaining.contains_key(key));
            }
        }

        #[test]
        fn preserved_values_never_move(input in props()) {
            let c = classify(input, &schema());
            prop_assert!(c.movable.values().all(|v| !v.is_preserved()));
        }
    }
}
