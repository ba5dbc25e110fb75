//! Catalog reference data: tasks, rules, templates, playbook articles

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{EngineError, Result};
use crate::core::types::{Task, TaskId};
use crate::profile::Profile;
use crate::rules::{parse_rules_value, BlueprintRule};

/// A downloadable document template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub content: String,
}

/// A playbook (guide) article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybookArticle {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
}

/// A task resource reference resolved against the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Resource {
    Template(Template),
    Article(PlaybookArticle),
}

/// Immutable catalog contents, shared read-only once loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogData {
    pub sample_profile: Profile,
    pub tasks: Vec<Task>,
    pub templates: Vec<Template>,
    pub playbook: Vec<PlaybookArticle>,
    pub blueprint_rules: Vec<BlueprintRule>,
}

/// On-disk shape. Sections stay untyped so one bad entry is skipped on its
/// own instead of failing the whole document.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCatalog {
    #[serde(default)]
    sample_profile: Value,
    #[serde(default)]
    tasks: Value,
    #[serde(default)]
    templates: Value,
    #[serde(default)]
    playbook: Value,
    #[serde(default)]
    blueprint_rules: Value,
}

impl From<RawCatalog> for CatalogData {
    fn from(raw: RawCatalog) -> Self {
        Self {
            sample_profile: parse_sample_profile(raw.sample_profile),
            tasks: parse_entries("task", raw.tasks),
            templates: parse_entries("template", raw.templates),
            playbook: parse_entries("playbook article", raw.playbook),
            blueprint_rules: parse_rules_value(&raw.blueprint_rules),
        }
    }
}

fn parse_sample_profile(value: Value) -> Profile {
    if value.is_null() {
        return Profile::builtin_sample();
    }
    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!("Malformed sample profile, using the built-in one: {}", e);
        Profile::builtin_sample()
    })
}

/// Deserialize each element of a list section, skipping the ones that fail
fn parse_entries<T: DeserializeOwned>(kind: &str, value: Value) -> Vec<T> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Null => return Vec::new(),
        _ => {
            tracing::warn!("Expected a list of {} entries, ignoring the section", kind);
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Skipping malformed {} at index {}: {}", kind, index, e);
                None
            }
        })
        .collect()
}

impl CatalogData {
    /// Empty but valid catalog used when loading fails
    pub fn fallback() -> Self {
        Self {
            sample_profile: Profile::builtin_sample(),
            tasks: Vec::new(),
            templates: Vec::new(),
            playbook: Vec::new(),
            blueprint_rules: Vec::new(),
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let raw: RawCatalog = serde_json::from_str(content)?;
        Ok(raw.into())
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawCatalog = toml::from_str(content)?;
        Ok(raw.into())
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.blueprint_rules.is_empty()
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn template(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn article(&self, slug: &str) -> Option<&PlaybookArticle> {
        self.playbook.iter().find(|a| a.slug == slug)
    }

    /// Templates in `category` (any when `None`) whose title or description
    /// contains `query`, case-insensitively
    pub fn search_templates(&self, category: Option<&str>, query: Option<&str>) -> Vec<&Template> {
        let query = query.map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty());

        self.templates
            .iter()
            .filter(|t| category.map_or(true, |c| t.category.eq_ignore_ascii_case(c)))
            .filter(|t| {
                query.as_ref().map_or(true, |q| {
                    t.title.to_lowercase().contains(q) || t.description.to_lowercase().contains(q)
                })
            })
            .collect()
    }

    /// Resolve a task's resource references; unknown references are skipped
    pub fn resources_for(&self, task: &Task) -> Vec<Resource> {
        task.resources
            .iter()
            .filter_map(|r| {
                self.template(r)
                    .cloned()
                    .map(Resource::Template)
                    .or_else(|| self.article(r).cloned().map(Resource::Article))
            })
            .collect()
    }

    /// Rule task ids that do not resolve to a catalog task
    ///
    /// Matching tolerates these; this is for diagnostics only.
    pub fn dangling_rule_tasks(&self) -> Vec<&TaskId> {
        let mut dangling: Vec<&TaskId> = self
            .blueprint_rules
            .iter()
            .flat_map(|r| r.tasks.iter())
            .filter(|id| self.task(id).is_none())
            .collect();
        dangling.sort();
        dangling.dedup();
        dangling
    }
}

/// Parse a catalog document in the given format
pub fn parse_catalog(content: &str, is_toml: bool) -> Result<CatalogData> {
    let parsed = if is_toml {
        CatalogData::from_toml(content)
    } else {
        CatalogData::from_json(content)
    };
    parsed.map_err(|e| EngineError::Catalog(e.to_string()))
}
