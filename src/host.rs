//! The narrow surface the rule needs from whatever drives it: exact source
//! text for a span, and somewhere to put diagnostics.

use swc_core::common::{SourceMap, SourceMapper, Span};

/// Source text accessor (`getText(node)` in lint-host terms).
pub trait SourceText {
    /// Exact source substring covered by `span`. Empty when the span does not
    /// map into a loaded file.
    fn text(&self, span: Span) -> String;
}

impl SourceText for SourceMap {
    fn text(&self, span: Span) -> String {
        match self.span_to_snippet(span) {
            Ok(snippet) => snippet,
            Err(err) => {
                tracing::debug!(?span, ?err, "span has no source text");
                String::new()
            }
        }
    }
}

/// Receives diagnostics in the order the rule produces them.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageId {
    PreferSprinkles,
    PreferSprinklesInVariants,
    PreferSprinklesInRecipe,
}

impl MessageId {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageId::PreferSprinkles => "preferSprinkles",
            MessageId::PreferSprinklesInVariants => "preferSprinklesInVariants",
            MessageId::PreferSprinklesInRecipe => "preferSprinklesInRecipe",
        }
    }
}

/// Full-text replacement for one node's span. Applying it is the host's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub span: Span,
    pub replacement: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message_id: MessageId,
    pub message: String,
    /// Property keys that can move into the atomic call, in source order.
    pub properties: Vec<String>,
    pub span: Span,
    pub fix: Option<Fix>,
}
