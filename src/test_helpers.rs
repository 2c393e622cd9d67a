//! Shared test utilities for the folio test suite.
//!
//! Builders for content items and classified items, plus lookups into a
//! directive list that panic with the available routes on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let items = vec![item("content/blog/hello.md", &["Rust"])];
//! let plan = pipeline::build(&items, &SiteConfig::default()).unwrap();
//!
//! assert_eq!(routes(&plan.directives), vec!["/hello/", "/tags/rust/"]);
//! let tag = find_directive(&plan.directives, "/tags/rust/");
//! ```

use crate::plan::{ClassifiedItem, PageCreationDirective};
use crate::types::{ContentItem, ContentType, Frontmatter, Slug};

// =========================================================================
// Item builders
// =========================================================================

/// Content item at `path` whose title is the file stem. An empty `tags`
/// slice means the frontmatter has no `tags` field at all.
pub fn item(path: &str, tags: &[&str]) -> ContentItem {
    let title = std::path::Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tags = (!tags.is_empty()).then(|| tags.iter().map(|t| t.to_string()).collect());
    ContentItem::new(
        path,
        Frontmatter {
            title,
            tags,
            ..Frontmatter::default()
        },
    )
}

/// Like [`item`], with a `date`.
pub fn dated_item(path: &str, date: &str, tags: &[&str]) -> ContentItem {
    let mut item = item(path, tags);
    item.frontmatter.date = Some(date.to_string());
    item
}

/// Content item whose frontmatter is parsed from a YAML snippet, for
/// exercising malformed `tags` fields.
pub fn item_with_raw_tags(path: &str, yaml: &str) -> ContentItem {
    let frontmatter: Frontmatter = serde_yaml::from_str(&format!("title: raw\n{yaml}"))
        .unwrap_or_else(|e| panic!("bad test frontmatter {yaml:?}: {e}"));
    ContentItem::new(path, frontmatter)
}

/// Pair an item with a slug (given as a route like `/a/b/`) and a type.
pub fn classified<'a>(item: &'a ContentItem, slug: &str, kind: ContentType) -> ClassifiedItem<'a> {
    ClassifiedItem {
        item,
        slug: Slug::from_segments(slug.split('/').filter(|s| !s.is_empty())),
        kind,
    }
}

// =========================================================================
// Directive lookups
// =========================================================================

/// Routes of a directive list, in list order.
pub fn routes(directives: &[PageCreationDirective]) -> Vec<&str> {
    directives.iter().map(|d| d.route_path.as_str()).collect()
}

/// Find a directive by route. Panics if not found.
pub fn find_directive<'a>(
    directives: &'a [PageCreationDirective],
    route: &str,
) -> &'a PageCreationDirective {
    directives
        .iter()
        .find(|d| d.route_path == route)
        .unwrap_or_else(|| panic!("route '{route}' not found. Available: {:?}", routes(directives)))
}
