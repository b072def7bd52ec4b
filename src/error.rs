use std::path::PathBuf;

// -----------------------------------------------------------------------------
// Schema loading
// -----------------------------------------------------------------------------

/// Reasons a sprinkles schema could not be produced. The cached load path
/// logs these and degrades to the fallback schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("no sprinkles schema file found under {}", root.display())]
    NotFound { root: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

// -----------------------------------------------------------------------------
// Rule options
// -----------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid rule options: {0}")]
    Invalid(#[from] serde_json::Error),
}

// -----------------------------------------------------------------------------
// Harness
// -----------------------------------------------------------------------------

/// Raised only when the analyzed file itself cannot be parsed.
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error("failed to parse {filename}: {message}")]
    Parse { filename: String, message: String },
}
