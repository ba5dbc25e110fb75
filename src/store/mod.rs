//! Persistence contracts for user state
//!
//! Four independent slots: the active profile, the materialized blueprint,
//! per-task completion, and an optional custom rule override. Each trait
//! uses distinct method names so one backend can implement all of them.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::types::{Task, TaskId};
use crate::profile::Profile;
use crate::rules::BlueprintRule;

/// Completion status of one task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEntry {
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl CompletionEntry {
    /// `completed_at` is stamped with `now` only when completing
    pub fn new(completed: bool, now: DateTime<Utc>) -> Self {
        Self {
            completed,
            completed_at: completed.then_some(now),
        }
    }
}

/// Task id -> completion, independent of any blueprint
///
/// May hold entries for tasks that are not in the current blueprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionState(BTreeMap<TaskId, CompletionEntry>);

impl CompletionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &TaskId) -> Option<&CompletionEntry> {
        self.0.get(id)
    }

    /// Unknown tasks count as not completed
    pub fn is_completed(&self, id: &TaskId) -> bool {
        self.0.get(id).map_or(false, |e| e.completed)
    }

    pub fn upsert(&mut self, id: TaskId, entry: CompletionEntry) {
        self.0.insert(id, entry);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, &CompletionEntry)> {
        self.0.iter()
    }
}

/// A blueprint as persisted: tasks without completion flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBlueprint {
    pub tasks: Vec<Task>,
    pub generated_at: DateTime<Utc>,
}

impl StoredBlueprint {
    pub fn new(tasks: Vec<Task>, generated_at: DateTime<Utc>) -> Self {
        Self { tasks, generated_at }
    }
}

pub trait ProfileStore: Send + Sync {
    fn get_profile(&self) -> Result<Option<Profile>>;
    /// Replaces any existing profile
    fn put_profile(&self, profile: &Profile) -> Result<()>;
    fn clear_profile(&self) -> Result<()>;
}

pub trait BlueprintStore: Send + Sync {
    fn get_blueprint(&self) -> Result<Option<StoredBlueprint>>;
    /// Overwrites the previous blueprint entirely
    fn put_blueprint(&self, blueprint: &StoredBlueprint) -> Result<()>;
}

pub trait CompletionStore: Send + Sync {
    fn get_completion(&self) -> Result<CompletionState>;
    fn upsert_completion(&self, id: &TaskId, entry: CompletionEntry) -> Result<()>;
}

pub trait RuleOverrideStore: Send + Sync {
    fn get_custom_rules(&self) -> Result<Option<Vec<BlueprintRule>>>;
    fn put_custom_rules(&self, rules: &[BlueprintRule]) -> Result<()>;
    fn clear_custom_rules(&self) -> Result<()>;
}

/// Handles to every store the engine talks to
#[derive(Clone)]
pub struct Stores {
    pub profile: Arc<dyn ProfileStore>,
    pub blueprint: Arc<dyn BlueprintStore>,
    pub completion: Arc<dyn CompletionStore>,
    pub rules: Arc<dyn RuleOverrideStore>,
}

impl Stores {
    /// Use one backend for all four slots
    pub fn shared<T>(backend: Arc<T>) -> Self
    where
        T: ProfileStore + BlueprintStore + CompletionStore + RuleOverrideStore + 'static,
    {
        Self {
            profile: backend.clone(),
            blueprint: backend.clone(),
            completion: backend.clone(),
            rules: backend,
        }
    }
}
