//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root and is sparse: stock defaults are the base layer and the
//! user file only overrides what it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [content]
//! base_path = "content"          # Slugs are derived relative to this directory
//! slug_policy = "last-segment"   # or "full-path"
//! rules = [                      # First matching fragment wins
//!     { path = "content/posts", kind = "post" },
//!     { path = "content/blog", kind = "post" },
//!     { path = "content/pages", kind = "page" },
//!     { path = "content/site", kind = "page" },
//! ]
//!
//! [tags]
//! fallback_icon = "tag"          # Icon for tags with no entry below
//!
//! [tags.icons]                   # Keyed by kebab identifier, not display label
//! python = "python"
//! github = "github"
//!
//! [archive]
//! enabled = false                # Emit a listing page of every post
//! path = "/articles/"
//! latest = 5                     # How many posts count as "latest"
//!
//! [processing]
//! max_processes = 4              # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Arrays (like `content.rules`) replace the stock value wholesale; tables
//! (like `tags.icons`) merge key by key. Unknown keys are rejected to catch
//! typos early.

use crate::naming;
use crate::slug::SlugPolicy;
use crate::types::ContentType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Where content lives and how it is classified and slugged.
    pub content: ContentConfig,
    /// Tag icon mapping.
    pub tags: TagsConfig,
    /// Optional listing page of all posts.
    pub archive: ArchiveConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content.base_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "content.base_path must not be empty".into(),
            ));
        }
        if let Some(rule) = self.content.rules.iter().find(|r| r.path.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "content.rules entry for kind '{}' has an empty path",
                rule.kind
            )));
        }
        if let Some(key) = self.tags.icons.keys().find(|k| !naming::is_kebab_case(k)) {
            return Err(ConfigError::Validation(format!(
                "tags.icons key '{key}' must be a kebab identifier (did you mean '{}'?)",
                naming::kebab_case(key)
            )));
        }
        if self.tags.fallback_icon.is_empty() {
            return Err(ConfigError::Validation(
                "tags.fallback_icon must not be empty".into(),
            ));
        }
        let path = &self.archive.path;
        if path.len() < 2 || !path.starts_with('/') || !path.ends_with('/') {
            return Err(ConfigError::Validation(format!(
                "archive.path '{path}' must start and end with '/' and name a page"
            )));
        }
        if self.archive.latest == 0 {
            return Err(ConfigError::Validation(
                "archive.latest must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Content layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Directory that slugs are derived relative to.
    pub base_path: String,
    /// How much of the relative path ends up in the slug.
    pub slug_policy: SlugPolicy,
    /// Classification rules in priority order.
    pub rules: Vec<ClassificationRule>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_path: "content".to_string(),
            slug_policy: SlugPolicy::default(),
            rules: vec![
                ClassificationRule::new("content/posts", ContentType::Post),
                ClassificationRule::new("content/blog", ContentType::Post),
                ClassificationRule::new("content/pages", ContentType::Page),
                ClassificationRule::new("content/site", ContentType::Page),
            ],
        }
    }
}

/// One `(path fragment, content type)` pair.
///
/// A rule may map to `unclassified` to carve a subtree (say, drafts) out of a
/// broader rule listed after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassificationRule {
    pub path: String,
    pub kind: ContentType,
}

impl ClassificationRule {
    pub fn new(path: impl Into<String>, kind: ContentType) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Tag presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagsConfig {
    /// Icon used for any tag without an entry in `icons`.
    pub fallback_icon: String,
    /// Tag identifier → icon reference.
    pub icons: BTreeMap<String, String>,
}

impl Default for TagsConfig {
    fn default() -> Self {
        let icons = [
            ("python", "python"),
            ("dev", "dev"),
            ("jvm", "java"),
            ("google", "google"),
            ("github", "github"),
            ("crypto", "bitcoin"),
        ]
        .into_iter()
        .map(|(tag, icon)| (tag.to_string(), icon.to_string()))
        .collect();
        Self {
            fallback_icon: "tag".to_string(),
            icons,
        }
    }
}

/// Archive listing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    pub enabled: bool,
    /// Route of the listing page.
    pub path: String,
    /// Number of newest posts exposed separately as "latest".
    pub latest: usize,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "/articles/".to_string(),
            latest: 5,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of workers for per-item stages.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from the content root.
///
/// A missing file yields the stock defaults. Otherwise the file's values are
/// merged over the defaults, unknown keys are rejected, and the result is
/// validated.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let mut merged = stock_defaults_value()?;
    let config_path = root.join("config.toml");
    if config_path.exists() {
        let overlay: toml::Value = toml::from_str(&fs::read_to_string(&config_path)?)?;
        merged = merge_toml(merged, overlay);
    }
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# folio configuration
# ====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Place this file in the content root.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Content layout
# ---------------------------------------------------------------------------
[content]
# Slugs are derived from the part of each file path below this directory.
base_path = "content"

# "last-segment": content/blog/2021/hello-world.md -> /hello-world/
# "full-path":    content/blog/2021/hello-world.md -> /blog/2021/hello-world/
# Pick one per site; switching changes every route.
slug_policy = "last-segment"

# Classification rules, first match wins. kind is post, page or unclassified.
# Files matching no rule are skipped with a warning.
rules = [
    { path = "content/posts", kind = "post" },
    { path = "content/blog", kind = "post" },
    { path = "content/pages", kind = "page" },
    { path = "content/site", kind = "page" },
]

# ---------------------------------------------------------------------------
# Tags
# ---------------------------------------------------------------------------
[tags]
# Icon for any tag not listed under [tags.icons].
fallback_icon = "tag"

# Tag identifier (kebab form, as in /tags/<id>/) -> icon reference.
[tags.icons]
crypto = "bitcoin"
dev = "dev"
github = "github"
google = "google"
jvm = "java"
python = "python"

# ---------------------------------------------------------------------------
# Archive listing
# ---------------------------------------------------------------------------
[archive]
# Emit one extra page listing every post, newest first.
enabled = false
path = "/articles/"
# How many of the newest posts to expose as "latest".
latest = 5

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for per-file work.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
