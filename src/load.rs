//! Content loading: markdown files on disk → [`ContentItem`]s.
//!
//! The pipeline itself never touches the filesystem; this module is the
//! collaborator that feeds it. It walks the content directory, splits off
//! each file's YAML frontmatter, and renders the body to HTML.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                          # Content root (passed as --source)
//! ├── config.toml                   # Site configuration (optional)
//! ├── blog/
//! │   ├── 2021/
//! │   │   └── hello-world.md        # Post → /hello-world/
//! │   └── 2022/
//! │       └── second-post/
//! │           └── index.md          # Post → /second-post/
//! ├── pages/
//! │   └── about.md                  # Page → /about/
//! └── .drafts/                      # Hidden: never loaded
//! ```
//!
//! ## File Format
//!
//! ```text
//! ---
//! title: Hello World
//! date: 2021-03-04
//! tags: [Python, SQL Server]
//! summary: First post.
//! ---
//!
//! # Hello World
//! ...
//! ```
//!
//! The frontmatter block is optional. Without a `title`, the first `# heading`
//! is used, then the file stem with dashes turned into spaces.
//!
//! Files are returned sorted by path (directory by directory, names in byte
//! order), so tag labels, which go to the first spelling seen, are stable
//! between builds.

use crate::naming;
use crate::types::{ContentItem, Frontmatter};
use pulldown_cmark::{Options, Parser, html as md_html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid frontmatter in {}: {source}", .path.display())]
    Frontmatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Load every markdown file below `root`.
pub fn load_content(root: &Path) -> Result<Vec<ContentItem>, LoadError> {
    let mut items = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            items.push(load_file(entry.path())?);
        }
    }

    debug!(root = %root.display(), files = items.len(), "loaded content");
    Ok(items)
}

/// Load one markdown file.
pub fn load_file(path: &Path) -> Result<ContentItem, LoadError> {
    let content = fs::read_to_string(path)?;
    let (yaml, body) = split_frontmatter(&content);

    let mut frontmatter: Frontmatter = match yaml {
        Some(yaml) if !yaml.trim().is_empty() => {
            serde_yaml::from_str(yaml).map_err(|source| LoadError::Frontmatter {
                path: path.to_path_buf(),
                source,
            })?
        }
        _ => Frontmatter::default(),
    };

    if frontmatter.title.trim().is_empty() {
        frontmatter.title = fallback_title(path, body);
    }

    Ok(ContentItem {
        path: path.to_path_buf(),
        frontmatter,
        html: render_markdown(body),
    })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.contains(&ext.as_str()))
}

/// Split a leading `---` delimited block from the body.
///
/// An unterminated block is treated as body text.
fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let Some(after_open) = content
        .strip_prefix("---\r\n")
        .or_else(|| content.strip_prefix("---\n"))
    else {
        return (None, content);
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }
    (None, content)
}

/// First `# heading` in the body, else the file stem for display.
fn fallback_title(path: &Path, body: &str) -> String {
    body.lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
        .unwrap_or_else(|| {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            naming::display_title(&stem)
        })
}

fn render_markdown(body: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(body, options);
    let mut html = String::with_capacity(body.len() * 3 / 2);
    md_html::push_html(&mut html, parser);
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn splits_frontmatter_from_body() {
        let (yaml, body) = split_frontmatter("---\ntitle: Hi\n---\n\nBody\n");
        assert_eq!(yaml, Some("title: Hi\n"));
        assert_eq!(body, "\nBody\n");
    }

    #[test]
    fn crlf_frontmatter() {
        let (yaml, body) = split_frontmatter("---\r\ntitle: Hi\r\n---\r\nBody");
        assert_eq!(yaml, Some("title: Hi\r\n"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn empty_frontmatter_block() {
        let (yaml, body) = split_frontmatter("---\n---\nBody");
        assert_eq!(yaml, Some(""));
        assert_eq!(body, "Body");
    }

    #[test]
    fn no_frontmatter() {
        let (yaml, body) = split_frontmatter("# Title\n---\n");
        assert_eq!(yaml, None);
        assert_eq!(body, "# Title\n---\n");
    }

    #[test]
    fn unterminated_frontmatter_is_body() {
        let input = "---\ntitle: Hi\nno close";
        assert_eq!(split_frontmatter(input), (None, input));
    }

    #[test]
    fn byte_order_mark_skipped() {
        let (yaml, _) = split_frontmatter("\u{feff}---\ntitle: Hi\n---\n");
        assert_eq!(yaml, Some("title: Hi\n"));
    }

    #[test]
    fn loads_frontmatter_fields() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "content/blog/hello.md",
            "---\ntitle: Hello World\ndate: 2021-03-04\ntags: [Python, SQL Server]\nsummary: First.\n---\nSome *text*.\n",
        );

        let items = load_content(tmp.path()).unwrap();
        assert_eq!(items.len(), 1);
        let fm = &items[0].frontmatter;
        assert_eq!(fm.title, "Hello World");
        assert_eq!(fm.date.as_deref(), Some("2021-03-04"));
        assert_eq!(fm.tags(), ["Python", "SQL Server"]);
        assert_eq!(fm.summary.as_deref(), Some("First."));
        assert!(items[0].html.contains("<em>text</em>"));
        assert!(items[0].path.ends_with("content/blog/hello.md"));
    }

    #[test]
    fn title_falls_back_to_heading_then_stem() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "pages/about-me.md", "# About This Site\n\nText.");
        write(tmp.path(), "pages/who-am-i.md", "No heading here.");

        let items = load_content(tmp.path()).unwrap();
        let titles: Vec<&str> = items.iter().map(|i| i.frontmatter.title.as_str()).collect();
        assert_eq!(titles, vec!["About This Site", "who am i"]);
    }

    #[test]
    fn non_list_tags_load_as_none() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "blog/a.md", "---\ntitle: A\ntags: python\n---\n");
        let items = load_content(tmp.path()).unwrap();
        assert!(items[0].frontmatter.tags.is_none());
    }

    #[test]
    fn files_sorted_and_non_markdown_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "blog/b.md", "b");
        write(tmp.path(), "blog/a.markdown", "a");
        write(tmp.path(), "blog/notes.txt", "ignored");
        write(tmp.path(), "config.toml", "");
        write(tmp.path(), "about.MD", "about");

        let items = load_content(tmp.path()).unwrap();
        let names: Vec<String> = items
            .iter()
            .map(|i| i.path.strip_prefix(tmp.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["about.MD", "blog/a.markdown", "blog/b.md"]);
    }

    #[test]
    fn hidden_entries_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), ".drafts/secret.md", "x");
        write(tmp.path(), "blog/.wip.md", "x");
        write(tmp.path(), "blog/real.md", "x");

        let items = load_content(tmp.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].path.ends_with("blog/real.md"));
    }

    #[test]
    fn invalid_yaml_names_file() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "blog/broken.md", "---\ntitle: [unclosed\n---\n");

        let err = load_content(tmp.path()).unwrap_err();
        assert!(matches!(err, LoadError::Frontmatter { .. }));
        assert!(err.to_string().contains("broken.md"));
    }

    #[test]
    fn missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_content(&tmp.path().join("nope"));
        assert!(matches!(result, Err(LoadError::Walk(_))));
    }

    #[test]
    fn renders_tables() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }
}
