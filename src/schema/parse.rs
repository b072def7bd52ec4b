use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use indexmap::IndexMap;
use swc_core::ecma::{
    ast::*,
    visit::{Visit, VisitWith},
};

use super::{Schema, SchemaLiteral, ValueSpec};
use crate::config::{ColorMatching, RuleOptions};
use crate::error::{LintError, SchemaError};
use crate::extract::static_key;
use crate::lint::{callee_name, parse_source};

/// Parse a schema module and build its property table.
pub fn parse_schema_source(path: &Path, text: &str, options: &RuleOptions) -> Result<Schema, SchemaError> {
    let filename = path.to_string_lossy();
    let parsed = parse_source(&filename, text).map_err(|err| match err {
        LintError::Parse { message, .. } => SchemaError::Parse {
            path: path.to_path_buf(),
            message,
        },
    })?;
    Ok(build_schema(&parsed.module, options))
}

pub(crate) fn build_schema(module: &Module, options: &RuleOptions) -> Schema {
    let mut collector = DefinePropertiesCollector {
        definer: &options.schema_definer,
        entries: IndexMap::new(),
    };
    module.visit_with(&mut collector);

    let referenced: Vec<String> = collector
        .entries
        .values()
        .filter_map(|e| match e {
            RawSpec::PendingTokenRef { table } if !table.is_empty() => Some(table.clone()),
            _ => None,
        })
        .collect();
    let tables = if !referenced.is_empty() && options.color_matching == ColorMatching::TokenTable {
        // Tables named by a reference, plus the conventional ones a color
        // reference may fall back to.
        let mut names = referenced;
        names.extend(options.token_table_names.iter().cloned());
        names.sort();
        names.dedup();
        let mut finder = TokenTableFinder {
            names: &names,
            tables: HashMap::new(),
        };
        module.visit_with(&mut finder);
        finder.tables
    } else {
        HashMap::new()
    };

    collector
        .entries
        .into_iter()
        .filter_map(|(name, raw)| {
            let spec = match raw {
                RawSpec::Ready(spec) => spec,
                RawSpec::PendingTokenRef { table } => {
                    match resolve_reference(&table, &tables, options) {
                        Some(spec) => spec,
                        None => {
                            tracing::debug!(property = %name, reference = %table, "token table not found; dropping property");
                            return None;
                        }
                    }
                }
            };
            Some((name, spec))
        })
        .collect()
}

fn resolve_reference(
    table: &str,
    tables: &HashMap<String, BTreeSet<String>>,
    options: &RuleOptions,
) -> Option<ValueSpec> {
    let conventional = options.token_table_names.iter().any(|n| n == table);
    match options.color_matching {
        ColorMatching::LegacyPattern => conventional.then_some(ValueSpec::ColorPattern),
        ColorMatching::TokenTable => {
            // A missing conventional table may live under another conventional
            // name (`theme.colors` next to `const palette`). Other names only
            // ever resolve to themselves.
            let fallback = || {
                conventional
                    .then(|| options.token_table_names.iter().find_map(|n| tables.get(n)))
                    .flatten()
            };
            tables
                .get(table)
                .or_else(fallback)
                .map(|keys| ValueSpec::TokenSet(keys.clone()))
        }
    }
}

// -----------------------------------------------------------------------------
// Pass 1: defineProperties({ properties: { ... } })
// -----------------------------------------------------------------------------

enum RawSpec {
    Ready(ValueSpec),
    /// `color: theme.colors`; `table` is the last member segment.
    PendingTokenRef { table: String },
}

struct DefinePropertiesCollector<'a> {
    definer: &'a str,
    entries: IndexMap<String, RawSpec>,
}

impl DefinePropertiesCollector<'_> {
    fn collect(&mut self, config: &ObjectLit) {
        let Some(Expr::Object(props)) = field(config, "properties").map(unwrap_ts) else {
            return;
        };
        for prop in &props.props {
            let PropOrSpread::Prop(prop) = prop else {
                continue;
            };
            let Prop::KeyValue(kv) = &**prop else {
                continue;
            };
            let Some(name) = static_key(&kv.key) else {
                continue;
            };
            if let Some(spec) = raw_spec(&kv.value) {
                self.entries.insert(name, spec);
            }
        }
    }
}

impl Visit for DefinePropertiesCollector<'_> {
    fn visit_call_expr(&mut self, n: &CallExpr) {
        if callee_name(n) == Some(self.definer) {
            if let Some(arg) = n.args.first().filter(|a| a.spread.is_none()) {
                if let Expr::Object(config) = unwrap_ts(&arg.expr) {
                    self.collect(config);
                }
            }
        }
        n.visit_children_with(self);
    }
}

fn raw_spec(value: &Expr) -> Option<RawSpec> {
    match unwrap_ts(value) {
        Expr::Array(arr) => {
            let values = arr
                .elems
                .iter()
                .flatten()
                .filter(|el| el.spread.is_none())
                .filter_map(|el| match unwrap_ts(&el.expr) {
                    Expr::Lit(Lit::Str(s)) => Some(SchemaLiteral::Str(s.value.to_string())),
                    Expr::Lit(Lit::Num(n)) => Some(SchemaLiteral::Num(n.value)),
                    _ => None,
                })
                .collect();
            Some(RawSpec::Ready(ValueSpec::Enumerated(values)))
        }
        Expr::Object(obj) => object_spec(obj).map(RawSpec::Ready),
        Expr::Member(m) => Some(RawSpec::PendingTokenRef {
            table: member_tail(m),
        }),
        Expr::Ident(id) => Some(RawSpec::PendingTokenRef {
            table: id.sym.to_string(),
        }),
        _ => None,
    }
}

/// All-numeric objects become records; any other object with keys is a token
/// set over those keys.
fn object_spec(obj: &ObjectLit) -> Option<ValueSpec> {
    let mut record = IndexMap::new();
    let mut all_numeric = true;
    for prop in &obj.props {
        let PropOrSpread::Prop(prop) = prop else {
            all_numeric = false;
            continue;
        };
        match &**prop {
            Prop::KeyValue(kv) => match (static_key(&kv.key), unwrap_ts(&kv.value)) {
                (Some(key), Expr::Lit(Lit::Num(n))) => {
                    record.insert(key, n.value);
                }
                _ => all_numeric = false,
            },
            _ => all_numeric = false,
        }
    }
    if all_numeric {
        return (!record.is_empty()).then_some(ValueSpec::EnumeratedRecord(record));
    }
    let keys = object_keys(obj);
    (!keys.is_empty()).then_some(ValueSpec::TokenSet(keys))
}

fn member_tail(m: &MemberExpr) -> String {
    match &m.prop {
        MemberProp::Ident(p) => p.sym.to_string(),
        MemberProp::Computed(c) => match &*c.expr {
            Expr::Lit(Lit::Str(s)) => s.value.to_string(),
            _ => String::new(),
        },
        MemberProp::PrivateName(_) => String::new(),
    }
}

// -----------------------------------------------------------------------------
// Pass 2: token tables (`const colors = {...}` or `colors: {...}`)
// -----------------------------------------------------------------------------

struct TokenTableFinder<'a> {
    names: &'a [String],
    tables: HashMap<String, BTreeSet<String>>,
}

impl TokenTableFinder<'_> {
    fn consider(&mut self, name: &str, value: &Expr) {
        if !self.names.iter().any(|n| n == name) || self.tables.contains_key(name) {
            return;
        }
        if let Expr::Object(obj) = unwrap_ts(value) {
            self.tables.insert(name.to_string(), object_keys(obj));
        }
    }
}

impl Visit for TokenTableFinder<'_> {
    fn visit_var_declarator(&mut self, n: &VarDeclarator) {
        if let (Pat::Ident(binding), Some(init)) = (&n.name, &n.init) {
            self.consider(binding.id.sym.as_ref(), init);
        }
        n.visit_children_with(self);
    }

    fn visit_key_value_prop(&mut self, n: &KeyValueProp) {
        if let Some(key) = static_key(&n.key) {
            self.consider(&key, &n.value);
        }
        n.visit_children_with(self);
    }
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn object_keys(obj: &ObjectLit) -> BTreeSet<String> {
    obj.props
        .iter()
        .filter_map(|p| match p {
            PropOrSpread::Prop(prop) => match &**prop {
                Prop::KeyValue(kv) => static_key(&kv.key),
                Prop::Shorthand(id) => Some(id.sym.to_string()),
                _ => None,
            },
            PropOrSpread::Spread(_) => None,
        })
        .collect()
}

fn field<'a>(obj: &'a ObjectLit, name: &str) -> Option<&'a Expr> {
    obj.props.iter().find_map(|p| match p {
        PropOrSpread::Prop(prop) => match &**prop {
            Prop::KeyValue(kv) if static_key(&kv.key).as_deref() == Some(name) => Some(&*kv.value),
            _ => None,
        },
        PropOrSpread::Spread(_) => None,
    })
}

/// Look through `as const`, `satisfies`, type assertions and parentheses.
fn unwrap_ts(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(p) => unwrap_ts(&p.expr),
        Expr::TsConstAssertion(a) => unwrap_ts(&a.expr),
        Expr::TsAs(a) => unwrap_ts(&a.expr),
        Expr::TsSatisfies(s) => unwrap_ts(&s.expr),
        Expr::TsTypeAssertion(a) => unwrap_ts(&a.expr),
        _ => expr,
    }
}
