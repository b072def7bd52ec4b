//! `prefer-sprinkles`: finds vanilla-extract `style()` properties that the
//! project's `sprinkles()` function can express and produces the rewrite.
//!
//! The schema of legal sprinkles properties is read from the project's
//! `sprinkles.css.ts` (its `defineProperties` calls), cached for a minute, and
//! consulted for every `style()`, `styleVariants()` and `recipe()` call.
//!
//! ```ignore
//! let linter = Linter::new(RuleOptions::default());
//! for d in linter.lint("button.css.ts", &text)? {
//!     println!("{}", d.message);
//! }
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod host;
pub mod lint;
pub mod render;
pub mod rule;
pub mod schema;

pub use classify::{classify, Classification};
pub use config::{ColorMatching, RuleOptions, SchemaFallback};
pub use error::{ConfigError, LintError, SchemaError};
pub use extract::{extract, Primitive, PreservedKind, PropertyMap, PropertyValue};
pub use host::{Diagnostic, DiagnosticSink, Fix, MessageId, SourceText};
pub use lint::{check_module, fix_with_schema, lint_with_schema, parse_source, LintReport, Linter};
pub use render::render_object;
pub use rule::PreferSprinkles;
pub use schema::{Clock, Schema, SchemaCache, SchemaLiteral, SchemaLoader, SystemClock, ValueSpec};
