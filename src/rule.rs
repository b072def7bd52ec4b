use std::collections::HashSet;

use swc_core::{
    common::{Span, Spanned},
    ecma::{
        ast::*,
        visit::{Visit, VisitWith},
    },
};

use crate::classify::classify;
use crate::config::RuleOptions;
use crate::extract::{extract_object, is_plain_object, static_key, PropertyMap};
use crate::host::{Diagnostic, DiagnosticSink, Fix, MessageId, SourceText};
use crate::lint::callee_name;
use crate::render::{render_call, render_object};
use crate::schema::Schema;

// -----------------------------------------------------------------------------
// Rule state
// -----------------------------------------------------------------------------

/// `prefer-sprinkles`: reports `style()` properties that `sprinkles()` can
/// express and attaches the rewrite. Visit a module (or feed calls to
/// [`PreferSprinkles::check_call`]) in source order.
pub struct PreferSprinkles<'a> {
    options: &'a RuleOptions,
    schema: &'a Schema,
    source: &'a dyn SourceText,
    sink: &'a mut dyn DiagnosticSink,
    // style() calls already checked as part of a variants/recipe container
    handled: HashSet<Span>,
}

/// What an array rewrite replaces.
enum ArrayTarget<'t> {
    /// `style([...], ...extra)`
    StyleCall { extra_args: &'t [String] },
    /// A bare `[...]` inside a variants/recipe container.
    Bare,
}

/// Mixed-array analysis result.
struct ArrayPlan {
    opaque: Vec<String>,
    atomic: PropertyMap,
    remaining: Vec<PropertyMap>,
    moved: Vec<String>,
}

impl<'a> PreferSprinkles<'a> {
    pub fn new(
        options: &'a RuleOptions,
        schema: &'a Schema,
        source: &'a dyn SourceText,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            options,
            schema,
            source,
            sink,
            handled: HashSet::new(),
        }
    }

    /// Entry point for a single call expression. Unknown callees are ignored.
    pub fn check_call(&mut self, call: &CallExpr) {
        if self.handled.contains(&call.span) {
            return;
        }
        let Some(name) = callee_name(call) else {
            return;
        };
        if name == self.options.style_callee {
            self.check_style_call(call, MessageId::PreferSprinkles);
        } else if name == self.options.variants_callee {
            self.check_style_variants(call);
        } else if name == self.options.recipe_callee {
            self.check_recipe(call);
        }
    }

    // ---------- containers ----------

    fn check_style_variants(&mut self, call: &CallExpr) {
        let Some(Expr::Object(variants)) = first_arg(call) else {
            return;
        };
        for kv in key_values(variants) {
            self.check_style_value(&kv.value, MessageId::PreferSprinklesInVariants);
        }
    }

    /// `base` is one style value; `variants` is trait → option → style value.
    fn check_recipe(&mut self, call: &CallExpr) {
        let Some(Expr::Object(config)) = first_arg(call) else {
            return;
        };
        for kv in key_values(config) {
            match static_key(&kv.key).as_deref() {
                Some("base") => self.check_style_value(&kv.value, MessageId::PreferSprinklesInRecipe),
                Some("variants") => {
                    let Expr::Object(traits) = &*kv.value else {
                        continue;
                    };
                    for trait_kv in key_values(traits) {
                        let Expr::Object(options) = &*trait_kv.value else {
                            continue;
                        };
                        for option in key_values(options) {
                            self.check_style_value(&option.value, MessageId::PreferSprinklesInRecipe);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// One entry of a container: a `style()` call, an array, or an object.
    fn check_style_value(&mut self, value: &Expr, id: MessageId) {
        match value {
            Expr::Call(call) => {
                if self.is_style_call(call) {
                    self.check_style_call(call, id);
                }
            }
            Expr::Array(arr) => self.check_array(arr, arr.span, ArrayTarget::Bare, id),
            Expr::Object(obj) => self.check_object(obj, obj.span, &[], id),
            _ => {}
        }
    }

    // ---------- style() ----------

    fn check_style_call(&mut self, call: &CallExpr, id: MessageId) {
        self.handled.insert(call.span);
        let Some(arg) = call.args.first() else {
            return;
        };
        if arg.spread.is_some() {
            return;
        }
        // debugId and anything after it ride along unchanged
        let extra_args: Vec<String> = call.args[1..]
            .iter()
            .map(|a| self.source.text(a.span()))
            .collect();
        match &*arg.expr {
            Expr::Object(obj) => self.check_object(obj, call.span, &extra_args, id),
            Expr::Array(arr) => {
                self.check_array(arr, call.span, ArrayTarget::StyleCall { extra_args: &extra_args }, id)
            }
            _ => {}
        }
    }

    /// Plain object: `style({...})` or a bare object in a container.
    fn check_object(&mut self, obj: &ObjectLit, target: Span, extra_args: &[String], id: MessageId) {
        if !is_plain_object(obj) {
            return;
        }
        let split = classify(extract_object(obj, self.source), self.schema);
        if !split.has_movable() {
            return;
        }
        let properties: Vec<String> = split.movable.keys().cloned().collect();
        let atomic = render_call(&self.options.atomic_callee, &split.movable);
        let replacement = if split.remaining.is_empty() && extra_args.is_empty() {
            atomic
        } else {
            let mut elements = vec![atomic];
            if !split.remaining.is_empty() {
                elements.push(render_object(&split.remaining));
            }
            self.style_call_text(&elements, extra_args)
        };
        self.report(id, target, properties, replacement);
    }

    /// Mixed array: `style([...])` or a bare array in a container.
    fn check_array(&mut self, arr: &ArrayLit, target: Span, kind: ArrayTarget<'_>, id: MessageId) {
        // style() elements of a container array belong to the container.
        let container = matches!(kind, ArrayTarget::Bare).then_some(id);
        let plan = self.plan_array(arr, container);
        if plan.moved.is_empty() {
            return;
        }
        // Opaque elements go first, then the merged atomic call, then the
        // leftover objects. This reorders opaque elements relative to the
        // source array.
        let mut elements = plan.opaque;
        if !plan.atomic.is_empty() {
            elements.push(render_call(&self.options.atomic_callee, &plan.atomic));
        }
        elements.extend(plan.remaining.iter().map(render_object));
        let replacement = match kind {
            ArrayTarget::StyleCall { extra_args } => self.style_call_text(&elements, extra_args),
            ArrayTarget::Bare => format!("[{}]", elements.join(", ")),
        };
        self.report(id, target, plan.moved, replacement);
    }

    /// Sorts the elements of `arr`. With `container` set, `style()` elements
    /// are checked under that message id and kept as they are.
    fn plan_array(&mut self, arr: &ArrayLit, container: Option<MessageId>) -> ArrayPlan {
        let mut opaque = Vec::new();
        let mut existing = PropertyMap::new();
        let mut fresh = PropertyMap::new();
        let mut remaining = Vec::new();

        for el in &arr.elems {
            // A hole stays a hole: `[, x]` re-emits as `, x`.
            let Some(el) = el else {
                opaque.push(String::new());
                continue;
            };
            if el.spread.is_some() {
                opaque.push(self.source.text(el.span()));
                continue;
            }
            match &*el.expr {
                Expr::Call(call) if self.is_atomic_call(call) => match atomic_argument(call) {
                    Some(obj) => existing.extend(extract_object(obj, self.source)),
                    None => opaque.push(self.source.text(el.span())),
                },
                Expr::Call(call) if self.is_style_call(call) => {
                    if let Some(id) = container {
                        self.check_style_call(call, id);
                    }
                    opaque.push(self.source.text(el.span()));
                }
                Expr::Object(obj) if is_plain_object(obj) => {
                    let split = classify(extract_object(obj, self.source), self.schema);
                    fresh.extend(split.movable);
                    if !split.remaining.is_empty() {
                        remaining.push(split.remaining);
                    }
                }
                _ => opaque.push(self.source.text(el.span())),
            }
        }

        let moved = fresh.keys().cloned().collect();
        // Newly moved values win over what the existing call already had.
        let mut atomic = existing;
        atomic.extend(fresh);
        ArrayPlan {
            opaque,
            atomic,
            remaining,
            moved,
        }
    }

    // ---------- helpers ----------

    fn is_atomic_call(&self, call: &CallExpr) -> bool {
        callee_name(call) == Some(self.options.atomic_callee.as_str())
    }

    fn is_style_call(&self, call: &CallExpr) -> bool {
        callee_name(call) == Some(self.options.style_callee.as_str())
    }

    fn style_call_text(&self, elements: &[String], extra_args: &[String]) -> String {
        let mut args = vec![format!("[{}]", elements.join(", "))];
        args.extend(extra_args.iter().cloned());
        format!("{}({})", self.options.style_callee, args.join(", "))
    }

    fn message(&self, id: MessageId, properties: &[String]) -> String {
        let o = self.options;
        let list = properties.join(", ");
        match id {
            MessageId::PreferSprinkles => format!(
                "Use {}() instead of {}() for properties: {list}",
                o.atomic_callee, o.style_callee
            ),
            MessageId::PreferSprinklesInVariants => format!(
                "Use {}() instead of {}() for properties in {}: {list}",
                o.atomic_callee, o.style_callee, o.variants_callee
            ),
            MessageId::PreferSprinklesInRecipe => format!(
                "Use {}() instead of {}() for properties in {}: {list}",
                o.atomic_callee, o.style_callee, o.recipe_callee
            ),
        }
    }

    fn report(&mut self, id: MessageId, span: Span, properties: Vec<String>, replacement: String) {
        let message = self.message(id, &properties);
        tracing::debug!(message_id = id.as_str(), ?properties, "movable properties found");
        self.sink.report(Diagnostic {
            message_id: id,
            message,
            properties,
            span,
            fix: Some(Fix { span, replacement }),
        });
    }
}

impl Visit for PreferSprinkles<'_> {
    fn visit_call_expr(&mut self, n: &CallExpr) {
        self.check_call(n);
        n.visit_children_with(self);
    }
}

// -----------------------------------------------------------------------------
// AST shape helpers
// -----------------------------------------------------------------------------

fn first_arg(call: &CallExpr) -> Option<&Expr> {
    call.args
        .first()
        .filter(|a| a.spread.is_none())
        .map(|a| &*a.expr)
}

/// The object literal of `sprinkles({...})` when it can be merged losslessly.
fn atomic_argument(call: &CallExpr) -> Option<&ObjectLit> {
    if call.args.len() != 1 {
        return None;
    }
    match first_arg(call)? {
        Expr::Object(obj) if is_plain_object(obj) => Some(obj),
        _ => None,
    }
}

fn key_values(obj: &ObjectLit) -> impl Iterator<Item = &KeyValueProp> {
    obj.props.iter().filter_map(|p| match p {
        PropOrSpread::Prop(prop) => match &**prop {
            Prop::KeyValue(kv) => Some(kv),
            _ => None,
        },
        PropOrSpread::Spread(_) => None,
    })
}
