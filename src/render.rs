//! Property map → object literal source.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extract::{Primitive, PropertyMap, PropertyValue};

static BARE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("static regex"));

const INDENT: &str = "  ";

/// Render `props` as a brace-delimited object literal, one property per line.
/// Preserved values are emitted byte for byte.
pub fn render_object(props: &PropertyMap) -> String {
    let mut out = String::new();
    write_object(&mut out, props, 0);
    out
}

/// `callee({ ... })`
pub fn render_call(callee: &str, props: &PropertyMap) -> String {
    format!("{callee}({})", render_object(props))
}

fn write_object(out: &mut String, props: &PropertyMap, depth: usize) {
    if props.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    for (i, (key, value)) in props.iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        out.push_str(&INDENT.repeat(depth + 1));
        out.push_str(&render_key(key));
        out.push_str(": ");
        write_value(out, value, depth + 1);
    }
    out.push('\n');
    out.push_str(&INDENT.repeat(depth));
    out.push('}');
}

fn write_value(out: &mut String, value: &PropertyValue, depth: usize) {
    match value {
        PropertyValue::Literal(Primitive::Str(s)) => out.push_str(&quote(s)),
        PropertyValue::Literal(Primitive::Num(n)) => out.push_str(&n.to_string()),
        PropertyValue::Literal(Primitive::Bool(b)) => out.push_str(if *b { "true" } else { "false" }),
        PropertyValue::Literal(Primitive::Null) => out.push_str("null"),
        PropertyValue::Identifier(name) => out.push_str(name),
        PropertyValue::Nested(inner) => write_object(out, inner, depth),
        PropertyValue::Preserved { text, .. } => out.push_str(text),
    }
}

fn render_key(key: &str) -> String {
    if BARE_KEY.is_match(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
