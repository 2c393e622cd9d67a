//! # Folio
//!
//! The planning half of a static blog generator. Given a tree of markdown
//! files, folio decides what each file is, where it lives on the site, which
//! tags exist, and which pages a renderer has to produce. It renders nothing
//! itself; the output is a list of page-creation directives.
//!
//! # Architecture: Per-Item Stages, Then Barriers
//!
//! ```text
//! load        content/     →  Vec<ContentItem>       (files → frontmatter + HTML)
//! classify    path         →  post | page | none     (per item, parallel)
//! slug        path         →  /hello-world/          (per item, parallel)
//! tags        all items    →  TagIndex               (barrier)
//! plan        all of it    →  Vec<PageCreationDirective>
//! ```
//!
//! The per-item stages look at one path and nothing else, so they run on the
//! rayon pool. Tag indexing and planning need every item and start only once
//! the per-item results are in.
//!
//! Everything after `load` is a pure function of its inputs: no filesystem,
//! no clock, no randomness. Running it twice produces identical directives,
//! which is what makes `plan.json` diffable between builds.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`load`] | Walks the content directory, parses YAML frontmatter, renders markdown |
//! | [`classify`] | Ordered path-fragment rules → [`types::ContentType`] |
//! | [`slug`] | Path → URL slug, by last segment or full relative path |
//! | [`tags`] | Tag normalization and the site-wide [`tags::TagIndex`]; tag icons |
//! | [`plan`] | Post, page, tag and archive directives, checked for route clashes |
//! | [`pipeline`] | Runs the stages in order; the one-call [`pipeline::build`] |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`naming`] | Word splitting and kebab-case normalization |
//! | [`types`] | Content items, frontmatter, slugs |
//! | [`output`] | CLI output formatting of plans and tag tables |
//!
//! # Design Decisions
//!
//! ## Last Segment Slugs
//!
//! By default a post's URL is its file name: `content/blog/2021/hello-world.md`
//! becomes `/hello-world/`. Moving a file between year folders never breaks a
//! link. The price is that two files with the same name collide; the planner
//! refuses such a build with [`plan::PlanError::DuplicateRoute`] instead of
//! letting one page silently replace the other. Sites that want nested URLs
//! set `slug_policy = "full-path"`, which applies to every item of the build.
//!
//! ## Tags Are Identifiers, Not Strings
//!
//! Authors write `SQL Server` in one post and `sql-server` in the next. Both
//! normalize to the identifier `sql-server` and share one tag page. The label
//! shown on that page is the first spelling encountered, and the loader feeds
//! items in sorted path order so that label does not change between builds.
//!
//! ## Unclassified Content Is a Warning
//!
//! A file no rule matches (a draft folder, a stray README) gets a `warn!` and
//! is left out of the plan. A file outside the content base path is different:
//! its slug cannot be derived and the build fails with that file's path.

pub mod classify;
pub mod config;
pub mod load;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod plan;
pub mod slug;
pub mod tags;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
