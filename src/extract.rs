//! Object literal → ordered property map.

use indexmap::IndexMap;
use swc_core::ecma::ast::*;

use crate::host::SourceText;

/// Insertion-ordered property name → value, scoped to one object literal.
pub type PropertyMap = IndexMap<String, PropertyValue>;

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreservedKind {
    Template,
    Complex,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Literal(Primitive),
    Identifier(String),
    /// Pseudo-selector and similar blocks (`':hover': { ... }`).
    Nested(PropertyMap),
    /// Anything not decomposed; `text` is the exact source span.
    Preserved { text: String, kind: PreservedKind },
}

impl PropertyValue {
    pub fn is_preserved(&self) -> bool {
        matches!(self, PropertyValue::Preserved { .. })
    }
}

/// Extract the properties of `expr` if it is an object literal; anything else
/// yields an empty map.
pub fn extract(expr: &Expr, source: &dyn SourceText) -> PropertyMap {
    match expr {
        Expr::Object(obj) => extract_object(obj, source),
        Expr::Paren(p) => extract(&p.expr, source),
        _ => PropertyMap::new(),
    }
}

/// Own, non-computed keys in source order. A repeated key keeps the position
/// of its first occurrence and the value of its last, like object evaluation.
pub fn extract_object(obj: &ObjectLit, source: &dyn SourceText) -> PropertyMap {
    let mut out = PropertyMap::new();
    for prop in &obj.props {
        let PropOrSpread::Prop(prop) = prop else {
            continue;
        };
        match &**prop {
            Prop::KeyValue(kv) => {
                let Some(key) = static_key(&kv.key) else {
                    continue;
                };
                out.insert(key, extract_value(&kv.value, source));
            }
            Prop::Shorthand(id) => {
                out.insert(id.sym.to_string(), PropertyValue::Identifier(id.sym.to_string()));
            }
            _ => {}
        }
    }
    out
}

/// Whether every member of `obj` is a plain `key: value` or shorthand entry
/// with a static key. Anything else (spread, computed key, method, accessor)
/// would be lost by re-synthesizing the literal.
pub fn is_plain_object(obj: &ObjectLit) -> bool {
    obj.props.iter().all(|p| match p {
        PropOrSpread::Spread(_) => false,
        PropOrSpread::Prop(prop) => match &**prop {
            Prop::KeyValue(kv) => static_key(&kv.key).is_some(),
            Prop::Shorthand(_) => true,
            _ => false,
        },
    })
}

pub(crate) fn static_key(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(i) => Some(i.sym.to_string()),
        PropName::Str(s) => Some(s.value.to_string()),
        PropName::Num(n) => Some(n.value.to_string()),
        PropName::Computed(_) | PropName::BigInt(_) => None,
    }
}

fn extract_value(expr: &Expr, source: &dyn SourceText) -> PropertyValue {
    match expr {
        Expr::Lit(Lit::Str(s)) => PropertyValue::Literal(Primitive::Str(s.value.to_string())),
        Expr::Lit(Lit::Num(n)) => PropertyValue::Literal(Primitive::Num(n.value)),
        Expr::Lit(Lit::Bool(b)) => PropertyValue::Literal(Primitive::Bool(b.value)),
        Expr::Lit(Lit::Null(_)) => PropertyValue::Literal(Primitive::Null),
        Expr::Ident(i) => PropertyValue::Identifier(i.sym.to_string()),
        Expr::Object(obj) if is_plain_object(obj) => {
            PropertyValue::Nested(extract_object(obj, source))
        }
        Expr::Tpl(t) => PropertyValue::Preserved {
            text: source.text(t.span),
            kind: PreservedKind::Template,
        },
        other => PropertyValue::Preserved {
            text: source.text(swc_core::common::Spanned::span(other)),
            kind: PreservedKind::Complex,
        },
    }
}
