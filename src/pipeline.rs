//! The build: content items in, page plan out.
//!
//! ```text
//! per item (parallel)      barrier              last
//! ───────────────────      ───────────────      ─────────────────
//! classify + derive slug → index all tags    → build page plan
//! ```
//!
//! Per-item work is independent and runs on the rayon pool. The tag index and
//! the plan need every item, so they start only once all per-item results are
//! in. A per-item failure aborts the build with the path of the offending
//! file; the first failure in input order is reported, so the error is
//! reproducible regardless of scheduling.

use crate::classify::Classifier;
use crate::config::SiteConfig;
use crate::plan::{ClassifiedItem, PageCreationDirective, PlanBuilder, PlanError, TemplateKind};
use crate::slug::{SlugDeriver, SlugError};
use crate::tags::{TagIcons, TagIndex};
use crate::types::{ContentItem, ContentType};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{}: {source}", .path.display())]
    Item {
        path: PathBuf,
        #[source]
        source: SlugError,
    },
    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// Everything one build produces.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub directives: Vec<PageCreationDirective>,
    pub tags: TagIndex,
    /// Items no classification rule matched.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<PathBuf>,
}

impl BuildPlan {
    pub fn count(&self, template: TemplateKind) -> usize {
        self.directives
            .iter()
            .filter(|d| d.template == template)
            .count()
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    classifier: Classifier,
    deriver: SlugDeriver,
    icons: TagIcons,
    planner: PlanBuilder,
}

impl Pipeline {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            classifier: Classifier::from_config(&config.content),
            deriver: SlugDeriver::from_config(&config.content),
            icons: TagIcons::from_config(&config.tags),
            planner: PlanBuilder::from_config(config),
        }
    }

    pub fn run(&self, items: &[ContentItem]) -> Result<BuildPlan, PipelineError> {
        debug!(items = items.len(), policy = ?self.deriver.policy(), "classifying content");
        let classified = items
            .par_iter()
            .map(|item| self.prepare(item))
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        let mut skipped = Vec::new();
        for c in classified.iter().filter(|c| c.kind == ContentType::Unclassified) {
            warn!(path = %c.item.path.display(), "no classification rule matches, not creating a page");
            skipped.push(c.item.path.clone());
        }

        let tags = TagIndex::build(items);
        let unmapped = self.icons.unmapped(&tags);
        if !unmapped.is_empty() {
            warn!(tags = ?unmapped, "tags without an icon mapping use the fallback icon");
        }

        let directives = self.planner.build(&classified, &tags)?;
        debug!(directives = directives.len(), tags = tags.len(), "page plan ready");

        Ok(BuildPlan {
            directives,
            tags,
            skipped,
        })
    }

    fn prepare<'a>(&self, item: &'a ContentItem) -> Result<ClassifiedItem<'a>, PipelineError> {
        let kind = self.classifier.classify(&item.path);
        let slug = self
            .deriver
            .derive(&item.path)
            .map_err(|source| PipelineError::Item {
                path: item.path.clone(),
                source,
            })?;
        Ok(ClassifiedItem { item, slug, kind })
    }
}

/// Run the whole pipeline with `config`.
pub fn build(items: &[ContentItem], config: &SiteConfig) -> Result<BuildPlan, PipelineError> {
    Pipeline::from_config(config).run(items)
}
