//! Slug derivation from content file paths.
//!
//! A slug is the route a content item is served at. It comes from where the
//! file sits below the configured base path, never from its title, so
//! retitling a post does not break links to it.
//!
//! ```text
//! content/blog/2021/hello-world.md      → /hello-world/          (last-segment)
//! content/blog/2021/hello-world.md      → /blog/2021/hello-world/ (full-path)
//! content/posts/my-trip/index.md        → /my-trip/              (both)
//! ```
//!
//! ## Policies
//!
//! [`SlugPolicy::LastSegment`] is the default: only the deepest name survives,
//! so moving a post between year folders keeps its URL, at the price that two
//! posts with the same file name collide (the plan builder reports that as a
//! duplicate route). [`SlugPolicy::FullPath`] keeps every directory below the
//! base. A build uses exactly one policy.
//!
//! ## Normalization
//!
//! Each segment is lowercased and whitespace runs become a single `-`. An
//! `index` file takes its name from the containing directory.

use crate::config::ContentConfig;
use crate::types::Slug;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlugError {
    #[error("{} is not under the content base path '{base}'", .path.display())]
    InvalidPath { path: PathBuf, base: String },
    #[error("{}: file name has no characters usable in a slug", .path.display())]
    EmptyName { path: PathBuf },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlugPolicy {
    /// `/<deepest name>/`
    #[default]
    LastSegment,
    /// `/<every>/<directory>/<below>/<base>/`
    FullPath,
}

/// Derives slugs relative to one base path with one policy.
#[derive(Debug, Clone)]
pub struct SlugDeriver {
    base: PathBuf,
    policy: SlugPolicy,
}

impl SlugDeriver {
    pub fn new(base: impl Into<PathBuf>, policy: SlugPolicy) -> Self {
        Self {
            base: base.into(),
            policy,
        }
    }

    pub fn from_config(config: &ContentConfig) -> Self {
        Self::new(&config.base_path, config.slug_policy)
    }

    pub fn policy(&self) -> SlugPolicy {
        self.policy
    }

    /// Compute the slug for a content file.
    ///
    /// Fails when the base path does not appear in `path`.
    pub fn derive(&self, path: &Path) -> Result<Slug, SlugError> {
        let invalid = || SlugError::InvalidPath {
            path: path.to_path_buf(),
            base: self.base.display().to_string(),
        };

        let mut rest = components_after(path, &self.base).ok_or_else(invalid)?;
        let file_name = rest.pop().ok_or_else(invalid)?;

        let stem = match Path::new(&file_name).file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None => file_name.clone(),
        };
        if stem != "index" {
            if normalize_segment(&stem).is_empty() {
                return Err(SlugError::EmptyName {
                    path: path.to_path_buf(),
                });
            }
            rest.push(stem);
        }

        let segments: Vec<String> = rest
            .iter()
            .map(|s| normalize_segment(s))
            .filter(|s| !s.is_empty())
            .collect();

        let slug = match self.policy {
            SlugPolicy::LastSegment => Slug::from_segments(segments.last()),
            SlugPolicy::FullPath => Slug::from_segments(&segments),
        };
        Ok(slug)
    }
}

/// Lowercase a path segment and turn whitespace runs into `-`.
fn normalize_segment(segment: &str) -> String {
    segment
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn normal_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Components of `path` following the last occurrence of `fragment`,
/// matched on whole components (`content/blog` does not match `content/blogroll`).
pub(crate) fn components_after(path: &Path, fragment: &Path) -> Option<Vec<String>> {
    let haystack = normal_components(path);
    let needle = normal_components(fragment);
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .rposition(|window| window == needle.as_slice())
        .map(|start| haystack[start + needle.len()..].to_vec())
}
