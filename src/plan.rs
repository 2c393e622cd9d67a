//! Page plan: one page-creation directive per routable entity.
//!
//! The plan is what the renderer consumes. Each directive names a route, the
//! template to render it with, and the data that template needs:
//!
//! | Source                 | Route               | Template  | Context                          |
//! |------------------------|---------------------|-----------|----------------------------------|
//! | post item              | its slug            | `post`    | slug, tags                       |
//! | page item              | its slug            | `page`    | slug, tags                       |
//! | tag index entry        | `/tags/<id>/`       | `tag`     | label, icon, posts newest first  |
//! | `[archive]` if enabled | `archive.path`      | `archive` | all posts, latest, by year       |
//!
//! Unclassified items produce nothing.
//!
//! ## Route Uniqueness
//!
//! Two directives on one route would overwrite each other in the output, so
//! the builder refuses: [`PlanError::DuplicateRoute`] names the route and both
//! claimants. Directives are checked in generation order (posts and pages in
//! item order, then tags, then the archive), so the "first" claimant is stable.
//!
//! ## Ordering
//!
//! The returned list is sorted by route. Building twice from the same input
//! yields identical directives, and identical JSON.

use crate::config::{ArchiveConfig, SiteConfig};
use crate::naming;
use crate::tags::{TagIcons, TagIndex};
use crate::types::{ContentItem, ContentType, Slug};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("route {route} is claimed by both {first} and {second}")]
    DuplicateRoute {
        route: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Post,
    Page,
    Tag,
    Archive,
}

/// Instruction to render one page at one route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageCreationDirective {
    pub route_path: String,
    pub template: TemplateKind,
    pub context: DirectiveContext,
    /// Human description of what produced this directive, for diagnostics.
    #[serde(skip)]
    pub origin: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DirectiveContext {
    Content {
        slug: Slug,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        tags: Vec<TagRef>,
    },
    Tag {
        tag: String,
        id: String,
        icon: String,
        post_count: usize,
        posts: Vec<PostSummary>,
    },
    Archive {
        post_count: usize,
        posts: Vec<PostSummary>,
        latest: Vec<PostSummary>,
        years: Vec<YearGroup>,
    },
}

/// A tag as shown on a post: the spelling used there, plus where it links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagRef {
    pub id: String,
    pub label: String,
    pub icon: String,
}

/// What a listing needs to link to a post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub slug: Slug,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearGroup {
    /// `YYYY`, or empty for posts without a usable date.
    pub year: String,
    pub posts: Vec<PostSummary>,
}

/// A content item after the per-item stages.
#[derive(Debug, Clone)]
pub struct ClassifiedItem<'a> {
    pub item: &'a ContentItem,
    pub slug: Slug,
    pub kind: ContentType,
}

#[derive(Debug, Clone)]
pub struct PlanBuilder {
    icons: TagIcons,
    archive: ArchiveConfig,
}

impl PlanBuilder {
    pub fn new(icons: TagIcons, archive: ArchiveConfig) -> Self {
        Self { icons, archive }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(TagIcons::from_config(&config.tags), config.archive.clone())
    }

    /// Build the directive list, sorted by route.
    pub fn build(
        &self,
        items: &[ClassifiedItem<'_>],
        index: &TagIndex,
    ) -> Result<Vec<PageCreationDirective>, PlanError> {
        let mut plan = RouteSet::default();

        for classified in items {
            let template = match classified.kind {
                ContentType::Post => TemplateKind::Post,
                ContentType::Page => TemplateKind::Page,
                ContentType::Unclassified => continue,
            };
            plan.add(PageCreationDirective {
                route_path: classified.slug.to_string(),
                template,
                context: DirectiveContext::Content {
                    slug: classified.slug.clone(),
                    tags: self.tag_refs(classified.item, index),
                },
                origin: format!("{} {}", classified.kind, classified.item.path.display()),
            })?;
        }

        let posts = newest_first(
            items
                .iter()
                .filter(|c| c.kind == ContentType::Post)
                .map(|c| (summarize(c), tag_ids(c.item)))
                .collect(),
        );

        for entry in index.iter() {
            let tagged: Vec<PostSummary> = posts
                .iter()
                .filter(|(_, ids)| ids.contains(&entry.id))
                .map(|(summary, _)| summary.clone())
                .collect();
            plan.add(PageCreationDirective {
                route_path: format!("/tags/{}/", entry.id),
                template: TemplateKind::Tag,
                context: DirectiveContext::Tag {
                    tag: entry.label.clone(),
                    id: entry.id.clone(),
                    icon: self.icons.icon_for(&entry.id).to_string(),
                    post_count: tagged.len(),
                    posts: tagged,
                },
                origin: format!("tag \"{}\"", entry.label),
            })?;
        }

        if self.archive.enabled {
            let all: Vec<PostSummary> = posts.into_iter().map(|(summary, _)| summary).collect();
            plan.add(PageCreationDirective {
                route_path: self.archive.path.clone(),
                template: TemplateKind::Archive,
                context: DirectiveContext::Archive {
                    post_count: all.len(),
                    latest: all.iter().take(self.archive.latest).cloned().collect(),
                    years: group_by_year(&all),
                    posts: all,
                },
                origin: "archive listing".to_string(),
            })?;
        }

        Ok(plan.into_sorted())
    }

    /// Tags of one item as spelled there, linked to their index entries.
    fn tag_refs(&self, item: &ContentItem, index: &TagIndex) -> Vec<TagRef> {
        let mut seen = BTreeSet::new();
        item.frontmatter
            .tags()
            .iter()
            .filter_map(|label| {
                let entry = index.find_label(label)?;
                if !seen.insert(entry.id.as_str()) {
                    return None;
                }
                Some(TagRef {
                    id: entry.id.clone(),
                    label: label.clone(),
                    icon: self.icons.icon_for(&entry.id).to_string(),
                })
            })
            .collect()
    }
}

/// Directives accepted so far, indexed by route.
#[derive(Default)]
struct RouteSet {
    directives: Vec<PageCreationDirective>,
    routes: BTreeMap<String, usize>,
}

impl RouteSet {
    fn add(&mut self, directive: PageCreationDirective) -> Result<(), PlanError> {
        if let Some(&existing) = self.routes.get(&directive.route_path) {
            return Err(PlanError::DuplicateRoute {
                route: directive.route_path,
                first: self.directives[existing].origin.clone(),
                second: directive.origin,
            });
        }
        self.routes
            .insert(directive.route_path.clone(), self.directives.len());
        self.directives.push(directive);
        Ok(())
    }

    fn into_sorted(mut self) -> Vec<PageCreationDirective> {
        self.directives
            .sort_by(|a, b| a.route_path.cmp(&b.route_path));
        self.directives
    }
}

fn summarize(classified: &ClassifiedItem<'_>) -> PostSummary {
    let frontmatter = &classified.item.frontmatter;
    PostSummary {
        slug: classified.slug.clone(),
        title: frontmatter.title.clone(),
        date: frontmatter.date.clone(),
        summary: frontmatter.summary.clone(),
    }
}

fn tag_ids(item: &ContentItem) -> BTreeSet<String> {
    item.frontmatter
        .tags()
        .iter()
        .map(|t| naming::kebab_case(t))
        .filter(|id| !id.is_empty())
        .collect()
}

/// Sort by date descending (undated last), ties by slug.
fn newest_first<T>(mut posts: Vec<(PostSummary, T)>) -> Vec<(PostSummary, T)> {
    posts.sort_by(|(a, _), (b, _)| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
    posts
}

/// Group already-sorted posts by the `YYYY` prefix of their date.
fn group_by_year(posts: &[PostSummary]) -> Vec<YearGroup> {
    let mut groups: Vec<YearGroup> = Vec::new();
    for post in posts {
        let year = post.date.as_deref().map(year_of).unwrap_or_default();
        match groups.last_mut() {
            Some(group) if group.year == year => group.posts.push(post.clone()),
            _ => groups.push(YearGroup {
                year,
                posts: vec![post.clone()],
            }),
        }
    }
    groups
}

fn year_of(date: &str) -> String {
    let year: String = date.chars().take(4).collect();
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        year
    } else {
        String::new()
    }
}
