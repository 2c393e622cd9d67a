//! CLI output formatting for build results.
//!
//! # Route-First Display
//!
//! The primary display for every directive is its route, since that is what
//! ends up in the browser's address bar. What produced it (a file, a tag, the
//! archive) follows as indented context, so a summary reads as a site map
//! that can still be traced back to content.
//!
//! # Output Format
//!
//! ## Plan
//!
//! ```text
//! Posts
//! 001 /hello-world/
//!     Source: content/blog/2021/hello-world.md
//!     Tags: python, sql-server
//! 002 /second-post/
//!     Source: content/blog/2022/second-post.md
//!
//! Tags
//! 001 /tags/python/ Python (1 post)
//! 002 /tags/sql-server/ SQL Server (2 posts)
//!
//! Skipped
//!     content/unknown/x.md
//!
//! Planned 2 posts, 0 pages, 2 tags
//! ```
//!
//! ## Tags
//!
//! ```text
//! python       Python       1  python
//! sql-server   SQL Server   2  tag (fallback)
//!     Also: sql-server
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::pipeline::BuildPlan;
use crate::plan::{DirectiveContext, PageCreationDirective, TemplateKind};
use crate::tags::{TagIcons, TagIndex};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 post`, `2 posts`.
fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Strip the `post `/`page ` prefix from a content directive's origin.
fn origin_path(origin: &str) -> &str {
    origin
        .split_once(' ')
        .map(|(_, rest)| rest)
        .unwrap_or(origin)
}

fn section_title(template: TemplateKind) -> &'static str {
    match template {
        TemplateKind::Post => "Posts",
        TemplateKind::Page => "Pages",
        TemplateKind::Tag => "Tags",
        TemplateKind::Archive => "Archive",
    }
}

fn directive_lines(index: usize, directive: &PageCreationDirective) -> Vec<String> {
    match &directive.context {
        DirectiveContext::Content { tags, .. } => {
            let mut lines = vec![
                format!("{} {}", format_index(index), directive.route_path),
                format!("{}Source: {}", indent(1), origin_path(&directive.origin)),
            ];
            if !tags.is_empty() {
                let ids: Vec<&str> = tags.iter().map(|t| t.id.as_str()).collect();
                lines.push(format!("{}Tags: {}", indent(1), ids.join(", ")));
            }
            lines
        }
        DirectiveContext::Tag {
            tag, post_count, ..
        } => vec![format!(
            "{} {} {} ({})",
            format_index(index),
            directive.route_path,
            tag,
            plural(*post_count, "post")
        )],
        DirectiveContext::Archive {
            post_count, years, ..
        } => vec![format!(
            "{} {} ({}, {})",
            format_index(index),
            directive.route_path,
            plural(*post_count, "post"),
            plural(years.len(), "year")
        )],
    }
}

// ============================================================================
// Plan
// ============================================================================

pub fn format_plan_output(plan: &BuildPlan) -> Vec<String> {
    let mut lines = Vec::new();

    for template in [
        TemplateKind::Post,
        TemplateKind::Page,
        TemplateKind::Tag,
        TemplateKind::Archive,
    ] {
        let section: Vec<&PageCreationDirective> = plan
            .directives
            .iter()
            .filter(|d| d.template == template)
            .collect();
        if section.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(section_title(template).to_string());
        for (i, directive) in section.iter().enumerate() {
            lines.extend(directive_lines(i + 1, directive));
        }
    }

    if !plan.skipped.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Skipped".to_string());
        for path in &plan.skipped {
            lines.push(format!("{}{}", indent(1), path.display()));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Planned {}, {}, {}",
        plural(plan.count(TemplateKind::Post), "post"),
        plural(plan.count(TemplateKind::Page), "page"),
        plural(plan.count(TemplateKind::Tag), "tag"),
    ));

    lines
}

pub fn print_plan_output(plan: &BuildPlan) {
    for line in format_plan_output(plan) {
        println!("{}", line);
    }
}

// ============================================================================
// Tags
// ============================================================================

pub fn format_tags_output(index: &TagIndex, icons: &TagIcons) -> Vec<String> {
    if index.is_empty() {
        return vec!["No tags".to_string()];
    }

    let id_width = index.iter().map(|e| e.id.chars().count()).max().unwrap_or(0);
    let label_width = index
        .iter()
        .map(|e| e.label.chars().count())
        .max()
        .unwrap_or(0);
    let unmapped = icons.unmapped(index);

    let mut lines = Vec::new();
    for entry in index.iter() {
        let icon = icons.icon_for(&entry.id);
        let fallback = if unmapped.contains(&entry.id.as_str()) {
            " (fallback)"
        } else {
            ""
        };
        lines.push(format!(
            "{:<id_width$}   {:<label_width$}   {}  {}{}",
            entry.id, entry.label, entry.count, icon, fallback
        ));
        if !entry.aliases.is_empty() {
            lines.push(format!("{}Also: {}", indent(1), entry.aliases.join(", ")));
        }
    }
    lines
}

pub fn print_tags_output(index: &TagIndex, icons: &TagIcons) {
    for line in format_tags_output(index, icons) {
        println!("{}", line);
    }
}
