//! Tag index: every distinct tag across all content, with reference counts.
//!
//! Tags are free text in frontmatter and get normalized with
//! [`naming::kebab_case`] into the identifier used in `/tags/<id>/`. Spelling
//! variants collapse onto one entry:
//!
//! ```text
//! hello-world.md   tags: [Python, SQL Server]
//! second-post.md   tags: [sql-server]
//!
//! python      → "Python"      (1 item)
//! sql-server  → "SQL Server"  (2 items, alias "sql-server")
//! ```
//!
//! ## Rules
//!
//! - The display label is the first spelling seen, in item order then tag
//!   order within an item. Feed items in a fixed order for stable labels.
//! - `count` is the number of items referencing the identifier. An item that
//!   lists two spellings of the same tag counts once.
//! - Items without a usable `tags` list contribute nothing.
//! - A tag with no letters or digits cannot be routed and is skipped with a
//!   warning.
//!
//! The identifier set itself does not depend on item order; entries are kept
//! sorted by identifier.

use crate::config::TagsConfig;
use crate::naming;
use crate::types::ContentItem;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// One distinct tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagEntry {
    /// Kebab identifier, unique in the index.
    pub id: String,
    /// First-seen spelling, used for display.
    pub label: String,
    /// Number of content items carrying this tag.
    pub count: usize,
    /// Other spellings that normalized to the same identifier, first-seen order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagIndex {
    entries: BTreeMap<String, TagEntry>,
}

impl TagIndex {
    /// Index the tags of `items`, in order.
    pub fn build(items: &[ContentItem]) -> Self {
        let mut entries: BTreeMap<String, TagEntry> = BTreeMap::new();

        for item in items {
            let mut seen_in_item = BTreeSet::new();
            for tag in item.frontmatter.tags() {
                let id = naming::kebab_case(tag);
                if id.is_empty() {
                    warn!(path = %item.path.display(), tag = %tag, "tag has no letters or digits, skipping");
                    continue;
                }
                let entry = entries.entry(id.clone()).or_insert_with(|| TagEntry {
                    id: id.clone(),
                    label: tag.clone(),
                    count: 0,
                    aliases: Vec::new(),
                });
                if *tag != entry.label && !entry.aliases.contains(tag) {
                    entry.aliases.push(tag.clone());
                }
                if seen_in_item.insert(id) {
                    entry.count += 1;
                }
            }
        }

        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&TagEntry> {
        self.entries.get(id)
    }

    /// Look up the entry a raw tag spelling belongs to.
    pub fn find_label(&self, tag: &str) -> Option<&TagEntry> {
        self.entries.get(&naming::kebab_case(tag))
    }

    /// Entries sorted by identifier.
    pub fn iter(&self) -> impl Iterator<Item = &TagEntry> {
        self.entries.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tag identifier → icon reference, with a fallback for everything else.
#[derive(Debug, Clone)]
pub struct TagIcons {
    fallback: String,
    icons: BTreeMap<String, String>,
}

impl TagIcons {
    pub fn from_config(config: &TagsConfig) -> Self {
        Self {
            fallback: config.fallback_icon.clone(),
            icons: config.icons.clone(),
        }
    }

    pub fn icon_for(&self, id: &str) -> &str {
        self.icons.get(id).map(String::as_str).unwrap_or(&self.fallback)
    }

    /// Identifiers in `index` that will render with the fallback icon.
    pub fn unmapped<'a>(&self, index: &'a TagIndex) -> Vec<&'a str> {
        index.ids().filter(|id| !self.icons.contains_key(*id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{item, item_with_raw_tags};

    #[test]
    fn scenario_sql_server_variants_collapse() {
        let items = vec![
            item("content/blog/2021/hello-world.md", &["Python", "SQL Server"]),
            item("content/blog/2022/second-post.md", &["sql-server"]),
        ];
        let index = TagIndex::build(&items);

        assert_eq!(index.len(), 2);
        let python = index.get("python").unwrap();
        assert_eq!(python.label, "Python");
        assert_eq!(python.count, 1);
        let sql = index.get("sql-server").unwrap();
        assert_eq!(sql.label, "SQL Server");
        assert_eq!(sql.count, 2);
        assert_eq!(sql.aliases, vec!["sql-server"]);
    }

    #[test]
    fn first_seen_label_follows_item_order() {
        let a = item("content/blog/a.md", &["sql-server"]);
        let b = item("content/blog/b.md", &["SQL Server"]);

        let forward = TagIndex::build(&[a.clone(), b.clone()]);
        assert_eq!(forward.get("sql-server").unwrap().label, "sql-server");

        let reverse = TagIndex::build(&[b, a]);
        assert_eq!(reverse.get("sql-server").unwrap().label, "SQL Server");
    }

    #[test]
    fn first_seen_within_one_item_follows_tag_order() {
        let index = TagIndex::build(&[item("content/blog/a.md", &["MachineLearning", "machine learning"])]);
        let entry = index.get("machine-learning").unwrap();
        assert_eq!(entry.label, "MachineLearning");
        assert_eq!(entry.count, 1);
    }

    #[test]
    fn identifier_set_is_order_independent() {
        let items = vec![
            item("content/blog/a.md", &["Rust", "Go"]),
            item("content/blog/b.md", &["go", "Zig"]),
            item("content/blog/c.md", &["rust"]),
        ];
        let mut reversed = items.clone();
        reversed.reverse();

        let forward: Vec<String> = TagIndex::build(&items).ids().map(String::from).collect();
        let backward: Vec<String> = TagIndex::build(&reversed).ids().map(String::from).collect();
        assert_eq!(forward, backward);
        assert_eq!(forward, vec!["go", "rust", "zig"]);
    }

    #[test]
    fn counts_are_order_independent() {
        let items = vec![
            item("content/blog/a.md", &["Rust"]),
            item("content/blog/b.md", &["rust", "Go"]),
        ];
        let mut reversed = items.clone();
        reversed.reverse();
        let counts = |idx: &TagIndex| idx.iter().map(|e| (e.id.clone(), e.count)).collect::<Vec<_>>();
        assert_eq!(counts(&TagIndex::build(&items)), counts(&TagIndex::build(&reversed)));
    }

    #[test]
    fn duplicate_tag_in_one_item_counts_once() {
        let index = TagIndex::build(&[item("content/blog/a.md", &["Python", "python", "Python"])]);
        assert_eq!(index.get("python").unwrap().count, 1);
        assert_eq!(index.get("python").unwrap().aliases, vec!["python"]);
    }

    #[test]
    fn missing_tags_contribute_nothing() {
        let index = TagIndex::build(&[item("content/blog/a.md", &[])]);
        assert!(index.is_empty());
    }

    #[test]
    fn non_sequence_tags_contribute_nothing() {
        let items = vec![
            item_with_raw_tags("content/blog/a.md", "tags: python"),
            item_with_raw_tags("content/blog/b.md", "tags: {lang: rust}"),
            item("content/blog/c.md", &["Go"]),
        ];
        let index = TagIndex::build(&items);
        assert_eq!(index.ids().collect::<Vec<_>>(), vec!["go"]);
    }

    #[test]
    fn numeric_tags_keep_their_neighbours() {
        let items = vec![
            item_with_raw_tags("content/blog/a.md", "tags: [Python, 2021]"),
            item_with_raw_tags("content/blog/b.md", "tags: [python, 3.5]"),
        ];
        let index = TagIndex::build(&items);
        assert_eq!(index.ids().collect::<Vec<_>>(), vec!["2021", "3-5", "python"]);
        assert_eq!(index.get("python").unwrap().count, 2);
        assert_eq!(index.get("2021").unwrap().label, "2021");
    }

    #[test]
    fn unroutable_tag_skipped() {
        let index = TagIndex::build(&[item("content/blog/a.md", &["C++", "+++"])]);
        assert_eq!(index.ids().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn find_label_normalizes_lookup() {
        let index = TagIndex::build(&[item("content/blog/a.md", &["SQL Server"])]);
        assert_eq!(index.find_label("SqlServer").unwrap().id, "sql-server");
        assert!(index.find_label("Python").is_none());
    }

    #[test]
    fn serializes_as_map_keyed_by_id() {
        let index = TagIndex::build(&[item("content/blog/a.md", &["Python"])]);
        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(json["python"]["label"], "Python");
        assert_eq!(json["python"]["count"], 1);
        assert!(json["python"].get("aliases").is_none());
    }

    // =========================================================================
    // Icons
    // =========================================================================

    #[test]
    fn icons_fall_back_for_unmapped_tags() {
        let icons = TagIcons::from_config(&TagsConfig::default());
        assert_eq!(icons.icon_for("python"), "python");
        assert_eq!(icons.icon_for("jvm"), "java");
        assert_eq!(icons.icon_for("sql-server"), "tag");
    }

    #[test]
    fn unmapped_lists_tags_without_icons() {
        let index = TagIndex::build(&[item("content/blog/a.md", &["Python", "SQL Server", "Rust"])]);
        let icons = TagIcons::from_config(&TagsConfig::default());
        assert_eq!(icons.unmapped(&index), vec!["rust", "sql-server"]);
    }
}
