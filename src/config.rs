use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// How schema entries that reference an external color table are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorMatching {
    /// Resolve the referenced token table and require set membership.
    #[default]
    TokenTable,
    /// Accept any string shaped like `gray-100`, `white`, `black` or
    /// `transparent`. Kept for projects linted with the first plugin release.
    LegacyPattern,
}

/// Schema used when no schema module is found or it fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaFallback {
    /// No property is ever movable.
    #[default]
    Empty,
    /// The hard-coded property table the plugin shipped with.
    Builtin,
}

/// Options accepted by the `prefer-sprinkles` rule. Keys are camelCase to match
/// the JSON the host passes through.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleOptions {
    pub style_callee: String,
    pub atomic_callee: String,
    pub variants_callee: String,
    pub recipe_callee: String,
    pub schema_definer: String,
    pub schema_patterns: Vec<String>,
    pub ignored_dirs: Vec<String>,
    pub token_table_names: Vec<String>,
    pub cache_ttl_ms: u64,
    pub color_matching: ColorMatching,
    pub fallback: SchemaFallback,
    pub project_root: Option<PathBuf>,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            style_callee: "style".into(),
            atomic_callee: "sprinkles".into(),
            variants_callee: "styleVariants".into(),
            recipe_callee: "recipe".into(),
            schema_definer: "defineProperties".into(),
            schema_patterns: [
                "src/styles/sprinkles.css.ts",
                "src/style/sprinkles.css.ts",
                "**/styles/sprinkles.css.ts",
                "**/style/sprinkles.css.ts",
                "**/sprinkles.css.ts",
                "**/sprinkles.css.js",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            ignored_dirs: ["node_modules", "dist", "build", ".git"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            token_table_names: ["colors", "themeColors", "colorTokens", "palette"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            cache_ttl_ms: 60_000,
            color_matching: ColorMatching::default(),
            fallback: SchemaFallback::default(),
            project_root: None,
        }
    }
}

impl RuleOptions {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn project_root(&self) -> PathBuf {
        self.project_root
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
