//! Content classification by source directory.
//!
//! Posts and standalone pages are both plain markdown; the only thing that
//! tells them apart is which directory they were written in. Rules are
//! checked in order and the first path fragment found in the item's path
//! decides its type. Fragments match whole path components, so
//! `content/blog` matches `content/blog/2021/x.md` but not
//! `content/blogroll/x.md`.

use crate::config::{ClassificationRule, ContentConfig};
use crate::slug::components_after;
use crate::types::ContentType;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<ClassificationRule>,
}

impl Classifier {
    pub fn new(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    pub fn from_config(config: &ContentConfig) -> Self {
        Self::new(config.rules.clone())
    }

    /// Type of the first matching rule, or `Unclassified`.
    pub fn classify(&self, path: &Path) -> ContentType {
        self.rules
            .iter()
            .find(|rule| components_after(path, Path::new(&rule.path)).is_some())
            .map(|rule| rule.kind)
            .unwrap_or(ContentType::Unclassified)
    }
}
