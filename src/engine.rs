//! The blueprint engine: the operations exposed to the display layer
//!
//! Every operation degrades instead of failing. Catalog load failures give
//! the empty catalog, store read failures read as "nothing stored", and store
//! write failures are logged while the computed result is still returned.
//! The one error callers can see is an invalid onboarding submission.

use chrono::Utc;
use std::sync::Arc;

use crate::blueprints::{
    aggregate, build_blueprint_with_threshold, group_by_week, upcoming, with_status, Progress,
    TaskFilter, WeekGroup,
};
use crate::catalog::{
    CatalogData, CatalogService, CatalogSource, FileCatalogSource, PlaybookArticle, Resource,
    Template,
};
use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::core::types::{Task, TaskId, TaskWithStatus};
use crate::profile::{Profile, ProfileDraft};
use crate::rules::{effective_rules, BlueprintRule};
use crate::store::{CompletionEntry, CompletionState, JsonFileStore, StoredBlueprint, Stores};

pub struct BlueprintEngine<S> {
    catalog: Arc<CatalogService<S>>,
    stores: Stores,
    config: EngineConfig,
    /// Held for a whole regeneration, so they run one at a time in lock
    /// order and the last writer wins
    blueprint_writer: tokio::sync::Mutex<()>,
}

impl BlueprintEngine<FileCatalogSource> {
    /// Engine backed by the catalog file and JSON data directory in `config`
    pub fn from_config(config: EngineConfig) -> Self {
        let catalog = CatalogService::new(FileCatalogSource::new(&config.catalog_path));
        let stores = Stores::shared(Arc::new(JsonFileStore::new(&config.data_dir)));
        Self::new(Arc::new(catalog), stores, config)
    }
}

impl<S: CatalogSource> BlueprintEngine<S> {
    pub fn new(catalog: Arc<CatalogService<S>>, stores: Stores, config: EngineConfig) -> Self {
        Self {
            catalog,
            stores,
            config,
            blueprint_writer: tokio::sync::Mutex::new(()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn catalog(&self) -> Arc<CatalogData> {
        self.catalog.ensure_loaded().await
    }

    // === PROFILE ===

    pub fn profile(&self) -> Option<Profile> {
        self.stores.profile.get_profile().unwrap_or_else(|e| {
            tracing::warn!("Failed to read profile: {}", e);
            None
        })
    }

    pub async fn sample_profile(&self) -> Profile {
        self.catalog().await.sample_profile.clone()
    }

    /// Validate onboarding answers, store the profile and generate its blueprint
    pub async fn onboard(&self, draft: ProfileDraft) -> Result<(Profile, Vec<Task>)> {
        let profile = draft.validate()?;
        if let Err(e) = self.stores.profile.put_profile(&profile) {
            tracing::warn!("Failed to save profile {}: {}", profile.id, e);
        }
        tracing::info!("Onboarded {} ({})", profile.company_name, profile.id);

        let tasks = self.generate_blueprint(&profile).await;
        Ok((profile, tasks))
    }

    pub fn clear_profile(&self) {
        if let Err(e) = self.stores.profile.clear_profile() {
            tracing::warn!("Failed to clear profile: {}", e);
        }
    }

    // === RULES ===

    /// The custom override if one is stored, otherwise the catalog's rules.
    /// Never a mix of the two.
    pub async fn effective_rules(&self) -> Vec<BlueprintRule> {
        let catalog = self.catalog().await;
        let custom = self.custom_rules();
        effective_rules(custom.as_deref(), &catalog.blueprint_rules).to_vec()
    }

    pub fn custom_rules(&self) -> Option<Vec<BlueprintRule>> {
        self.stores.rules.get_custom_rules().unwrap_or_else(|e| {
            tracing::warn!("Failed to read custom rules: {}", e);
            None
        })
    }

    pub fn save_custom_rules(&self, rules: &[BlueprintRule]) {
        match self.stores.rules.put_custom_rules(rules) {
            Ok(()) => tracing::info!("Saved {} custom rules", rules.len()),
            Err(e) => tracing::warn!("Failed to save custom rules: {}", e),
        }
    }

    pub fn clear_custom_rules(&self) {
        if let Err(e) = self.stores.rules.clear_custom_rules() {
            tracing::warn!("Failed to clear custom rules: {}", e);
        }
    }

    // === BLUEPRINT ===

    /// Match `profile` against the effective rules and persist the result as
    /// the current blueprint, replacing any previous one.
    ///
    /// The returned tasks carry no completion state. If persisting fails the
    /// tasks are still returned.
    pub async fn generate_blueprint(&self, profile: &Profile) -> Vec<Task> {
        let _writer = self.blueprint_writer.lock().await;
        let catalog = self.catalog().await;
        let rules = self.effective_rules().await;
        let tasks = build_blueprint_with_threshold(
            profile,
            &catalog.tasks,
            &rules,
            self.config.parallel_threshold,
        );

        let stored = StoredBlueprint::new(tasks, Utc::now());
        match self.stores.blueprint.put_blueprint(&stored) {
            Ok(()) => tracing::info!(
                "Generated blueprint for {}: {} tasks from {} rules",
                profile.company_name,
                stored.tasks.len(),
                rules.len()
            ),
            Err(e) => tracing::warn!("Failed to save blueprint: {}", e),
        }

        stored.tasks
    }

    pub fn stored_blueprint(&self) -> Option<StoredBlueprint> {
        self.stores.blueprint.get_blueprint().unwrap_or_else(|e| {
            tracing::warn!("Failed to read blueprint: {}", e);
            None
        })
    }

    /// The stored blueprint with current completion flags; empty if none
    pub async fn get_blueprint_with_status(&self) -> Vec<TaskWithStatus> {
        match self.stored_blueprint() {
            Some(blueprint) => with_status(&blueprint.tasks, &self.completion()),
            None => Vec::new(),
        }
    }

    /// The whole catalog with completion flags, regardless of the blueprint
    pub async fn get_all_tasks(&self) -> Vec<TaskWithStatus> {
        let catalog = self.catalog().await;
        with_status(&catalog.tasks, &self.completion())
    }

    /// Catalog tasks accepted by `filter`
    pub async fn find_tasks(&self, filter: &TaskFilter) -> Vec<TaskWithStatus> {
        let tasks = self.get_all_tasks().await;
        filter.apply(&tasks).into_iter().cloned().collect()
    }

    pub async fn task(&self, id: &TaskId) -> Option<Task> {
        self.catalog().await.task(id).cloned()
    }

    /// Templates and articles a catalog task refers to; empty for unknown ids
    pub async fn task_resources(&self, id: &TaskId) -> Vec<Resource> {
        let catalog = self.catalog().await;
        match catalog.task(id) {
            Some(task) => catalog.resources_for(task),
            None => Vec::new(),
        }
    }

    // === PROGRESS ===

    pub async fn calculate_progress(&self) -> Progress {
        aggregate(&self.get_blueprint_with_status().await)
    }

    pub async fn week_groups(&self) -> Vec<WeekGroup> {
        group_by_week(&self.get_blueprint_with_status().await)
    }

    /// The next pending blueprint tasks, up to the configured limit
    pub async fn upcoming_tasks(&self) -> Vec<TaskWithStatus> {
        let tasks = self.get_blueprint_with_status().await;
        upcoming(&tasks, self.config.upcoming_limit)
            .into_iter()
            .cloned()
            .collect()
    }

    // === COMPLETION ===

    pub fn completion(&self) -> CompletionState {
        self.stores.completion.get_completion().unwrap_or_else(|e| {
            tracing::warn!("Failed to read task statuses: {}", e);
            CompletionState::new()
        })
    }

    /// Mark a task completed or pending.
    ///
    /// The id is not checked against the blueprint or catalog, and
    /// dependencies are not enforced.
    pub async fn set_status(&self, id: &TaskId, completed: bool) {
        let entry = CompletionEntry::new(completed, Utc::now());
        match self.stores.completion.upsert_completion(id, entry) {
            Ok(()) => tracing::debug!("Task {} completed={}", id, completed),
            Err(e) => tracing::warn!("Failed to save status for task {}: {}", id, e),
        }
    }

    // === TEMPLATES & PLAYBOOK ===

    pub async fn templates(&self) -> Vec<Template> {
        self.catalog().await.templates.clone()
    }

    pub async fn template(&self, id: &str) -> Option<Template> {
        self.catalog().await.template(id).cloned()
    }

    pub async fn search_templates(&self, category: Option<&str>, query: Option<&str>) -> Vec<Template> {
        self.catalog()
            .await
            .search_templates(category, query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn articles(&self) -> Vec<PlaybookArticle> {
        self.catalog().await.playbook.clone()
    }

    pub async fn article(&self, slug: &str) -> Option<PlaybookArticle> {
        self.catalog().await.article(slug).cloned()
    }
}
