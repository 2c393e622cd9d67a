//! Shared types passed between pipeline stages.
//!
//! Content items come in from the loader (or any other collaborator that can
//! produce them), slugs and content types are attached per item, and the
//! aggregate stages read the lot. Everything here is serializable so a build
//! plan can be written out as JSON and read back by the renderer.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

/// A markdown file after the external transformer has run.
///
/// Immutable once loaded; the pipeline only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Location of the source file. Must contain the configured base path.
    pub path: PathBuf,
    pub frontmatter: Frontmatter,
    /// Rendered body.
    #[serde(default)]
    pub html: String,
}

/// Metadata block at the top of a content file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// `None` when the field is missing or is not a list of strings.
    #[serde(
        default,
        deserialize_with = "lenient_tags",
        skip_serializing_if = "Option::is_none"
    )]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Frontmatter {
    /// Tags in declaration order; empty when the field is absent or malformed.
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}

/// Accept any value for `tags`, keeping it only when it is a list.
///
/// Scalar elements become their text (`2021` → `"2021"`); other elements
/// are dropped with a warning.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TagValue {
        Text(String),
        Bool(bool),
        Int(i64),
        Float(f64),
        Other(serde::de::IgnoredAny),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TagsField {
        List(Vec<TagValue>),
        Other(serde::de::IgnoredAny),
    }

    let values = match TagsField::deserialize(deserializer)? {
        TagsField::List(values) => values,
        TagsField::Other(_) => return Ok(None),
    };

    let mut tags = Vec::with_capacity(values.len());
    for (position, value) in values.into_iter().enumerate() {
        match value {
            TagValue::Text(text) => tags.push(text),
            TagValue::Bool(b) => tags.push(b.to_string()),
            TagValue::Int(n) => tags.push(n.to_string()),
            TagValue::Float(n) => tags.push(n.to_string()),
            TagValue::Other(_) => {
                warn!(position, "tag is not a string or number, skipping");
            }
        }
    }
    Ok(Some(tags))
}

impl ContentItem {
    pub fn new(path: impl Into<PathBuf>, frontmatter: Frontmatter) -> Self {
        Self {
            path: path.into(),
            frontmatter,
            html: String::new(),
        }
    }
}

/// What kind of page a content item becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Post,
    Page,
    Unclassified,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentType::Post => "post",
            ContentType::Page => "page",
            ContentType::Unclassified => "unclassified",
        };
        f.write_str(name)
    }
}

/// Canonical URL path of a content item. Always starts and ends with `/`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Build a slug from already-normalized segments.
    ///
    /// No segments gives the root slug `/`.
    pub(crate) fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = String::from("/");
        for segment in segments {
            path.push_str(segment.as_ref());
            path.push('/');
        }
        Slug(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
