//! A minimal host: parse a file with swc, run the rule, apply fixes. Real lint
//! hosts bring their own; this one backs the tests and simple embedding.

use std::path::Path;
use std::sync::Arc;

use swc_core::{
    common::{sync::Lrc, BytePos, FileName, SourceFile, SourceMap},
    ecma::{
        ast::*,
        parser::{lexer::Lexer, EsSyntax, Parser, StringInput, Syntax, TsSyntax},
        visit::VisitWith,
    },
};

use crate::config::RuleOptions;
use crate::error::LintError;
use crate::host::{Diagnostic, MessageId, SourceText};
use crate::rule::PreferSprinkles;
use crate::schema::{Schema, SchemaLoader};

/// ESLint's limit on repeated fix passes.
const MAX_FIX_PASSES: usize = 10;

// -----------------------------------------------------------------------------
// Parsing
// -----------------------------------------------------------------------------

pub struct ParsedSource {
    pub source_map: Lrc<SourceMap>,
    pub file: Lrc<SourceFile>,
    pub module: Module,
    text: String,
}

impl ParsedSource {
    /// Byte offset of `pos` within the parsed text.
    pub fn offset(&self, pos: BytePos) -> usize {
        (pos.0 - self.file.start_pos.0) as usize
    }

    /// 1-based column of `pos` in UTF-16 code units, as JS hosts count.
    pub fn utf16_column(&self, pos: BytePos) -> usize {
        let offset = self.offset(pos).min(self.text.len());
        let prefix = self.text.get(..offset).unwrap_or_default();
        let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
        prefix[line_start..].encode_utf16().count() + 1
    }
}

/// Parse `text` as a module. The syntax follows the file extension: `.ts`,
/// `.tsx`, anything else is JavaScript with JSX.
pub fn parse_source(filename: &str, text: &str) -> Result<ParsedSource, LintError> {
    let source_map: Lrc<SourceMap> = Default::default();
    let file = source_map.new_source_file(
        Lrc::new(FileName::Custom(filename.to_string())),
        text.to_string(),
    );
    let lexer = Lexer::new(
        syntax_for(filename),
        EsVersion::latest(),
        StringInput::from(&*file),
        None,
    );
    let mut parser = Parser::new_from(lexer);
    let module = parser.parse_module().map_err(|err| LintError::Parse {
        filename: filename.to_string(),
        message: format!("{:?}", err.kind()),
    })?;
    for err in parser.take_errors() {
        tracing::debug!(filename, error = ?err.kind(), "recovered from parse error");
    }
    Ok(ParsedSource {
        source_map,
        file,
        module,
        text: text.to_string(),
    })
}

fn syntax_for(filename: &str) -> Syntax {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    match ext {
        "ts" | "mts" | "cts" => Syntax::Typescript(TsSyntax::default()),
        "tsx" => Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        }),
        _ => Syntax::Es(EsSyntax {
            jsx: true,
            ..Default::default()
        }),
    }
}

/// Name of a plain identifier callee (`style(...)`); member callees are `None`.
pub fn callee_name(call: &CallExpr) -> Option<&str> {
    match &call.callee {
        Callee::Expr(expr) => match &**expr {
            Expr::Ident(id) => Some(id.sym.as_ref()),
            _ => None,
        },
        Callee::Super(_) | Callee::Import(_) => None,
    }
}

// -----------------------------------------------------------------------------
// Running the rule
// -----------------------------------------------------------------------------

/// Run the rule over every call expression of `module` in source order.
pub fn check_module(
    module: &Module,
    source: &dyn SourceText,
    schema: &Schema,
    options: &RuleOptions,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut rule = PreferSprinkles::new(options, schema, source, &mut diagnostics);
    module.visit_with(&mut rule);
    diagnostics
}

pub fn lint_with_schema(
    schema: &Schema,
    options: &RuleOptions,
    filename: &str,
    text: &str,
) -> Result<Vec<Diagnostic>, LintError> {
    let parsed = parse_source(filename, text)?;
    Ok(check_module(&parsed.module, &*parsed.source_map, schema, options))
}

/// Apply fixes pass after pass until none applies or the pass limit is hit.
pub fn fix_with_schema(
    schema: &Schema,
    options: &RuleOptions,
    filename: &str,
    text: &str,
) -> Result<String, LintError> {
    let mut current = text.to_string();
    for pass in 0..MAX_FIX_PASSES {
        let parsed = parse_source(filename, &current)?;
        let diagnostics = check_module(&parsed.module, &*parsed.source_map, schema, options);
        let (fixed, applied) = apply_fixes(&current, &parsed, &diagnostics);
        tracing::debug!(filename, pass, applied, "fix pass");
        if applied == 0 {
            break;
        }
        current = fixed;
    }
    Ok(current)
}

/// Apply every fix that does not overlap an earlier one. Returns the new text
/// and how many fixes were applied.
pub fn apply_fixes(text: &str, parsed: &ParsedSource, diagnostics: &[Diagnostic]) -> (String, usize) {
    let mut fixes: Vec<(usize, usize, &str)> = diagnostics
        .iter()
        .filter_map(|d| d.fix.as_ref())
        .map(|f| {
            (
                parsed.offset(f.span.lo),
                parsed.offset(f.span.hi),
                f.replacement.as_str(),
            )
        })
        .filter(|(lo, hi, _)| lo <= hi && *hi <= text.len())
        .collect();
    fixes.sort_by_key(|(lo, hi, _)| (*lo, *hi));

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut applied = 0;
    for (lo, hi, replacement) in fixes {
        if lo < cursor {
            continue;
        }
        out.push_str(&text[cursor..lo]);
        out.push_str(replacement);
        cursor = hi;
        applied += 1;
    }
    out.push_str(&text[cursor..]);
    (out, applied)
}

// -----------------------------------------------------------------------------
// Reports
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintReport {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub message_id: MessageId,
    pub message: String,
    pub properties: Vec<String>,
    pub fix: Option<String>,
}

/// Line/column (1-based) reports for `diagnostics`. Columns count UTF-16 code
/// units.
pub fn reports(filename: &str, parsed: &ParsedSource, diagnostics: &[Diagnostic]) -> Vec<LintReport> {
    diagnostics
        .iter()
        .map(|d| {
            let lo = parsed.source_map.lookup_char_pos(d.span.lo);
            let hi = parsed.source_map.lookup_char_pos(d.span.hi);
            LintReport {
                file: filename.to_string(),
                line: lo.line,
                column: parsed.utf16_column(d.span.lo),
                end_line: hi.line,
                end_column: parsed.utf16_column(d.span.hi),
                message_id: d.message_id,
                message: d.message.clone(),
                properties: d.properties.clone(),
                fix: d.fix.as_ref().map(|f| f.replacement.clone()),
            }
        })
        .collect()
}

pub fn to_json(reports: &[LintReport]) -> String {
    serde_json::to_string_pretty(reports).unwrap_or_else(|_| "[]".into())
}

// -----------------------------------------------------------------------------
// Linter
// -----------------------------------------------------------------------------

/// Rule options plus a schema loader whose cache lives as long as the linter.
pub struct Linter {
    loader: Arc<SchemaLoader>,
}

impl Linter {
    pub fn new(options: RuleOptions) -> Self {
        Self::with_loader(Arc::new(SchemaLoader::new(options)))
    }

    /// Options given as the JSON the host passes through. Invalid options are
    /// logged and replaced by the defaults.
    pub fn from_json_options(json: &str) -> Self {
        let options = RuleOptions::from_json(json).unwrap_or_else(|err| {
            tracing::warn!(%err, "using default rule options");
            RuleOptions::default()
        });
        Self::new(options)
    }

    pub fn with_loader(loader: Arc<SchemaLoader>) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &SchemaLoader {
        &self.loader
    }

    pub fn lint(&self, filename: &str, text: &str) -> Result<Vec<Diagnostic>, LintError> {
        let schema = self.loader.schema();
        lint_with_schema(&schema, self.loader.options(), filename, text)
    }

    pub fn fix(&self, filename: &str, text: &str) -> Result<String, LintError> {
        let schema = self.loader.schema();
        fix_with_schema(&schema, self.loader.options(), filename, text)
    }

    pub fn report(&self, filename: &str, text: &str) -> Result<Vec<LintReport>, LintError> {
        let schema = self.loader.schema();
        let parsed = parse_source(filename, text)?;
        let diagnostics = check_module(&parsed.module, &*parsed.source_map, &schema, self.loader.options());
        Ok(reports(filename, &parsed, &diagnostics))
    }
}

// -----------------------------------------------------------------------------
// Test helpers
// -----------------------------------------------------------------------------

#[cfg(test)]
pub(crate) fn first_call_arg(module: &Module) -> Option<Box<Expr>> {
    use swc_core::ecma::visit::Visit;

    struct FirstArg(Option<Box<Expr>>);

    impl Visit for FirstArg {
        fn visit_call_expr(&mut self, n: &CallExpr) {
            if self.0.is_none() {
                self.0 = n.args.first().map(|a| a.expr.clone());
            }
        }
    }

    let mut finder = FirstArg(None);
    module.visit_with(&mut finder);
    finder.0
}
