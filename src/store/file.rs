//! JSON-file store: one document per slot inside a data directory
//!
//! Writes go to a uniquely named sibling temp file that is then renamed over
//! the target, so readers see either the old or the new document, never a
//! torn one, and concurrent writers never share a temp file.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tempfile::NamedTempFile;

use super::{
    BlueprintStore, CompletionEntry, CompletionState, CompletionStore, ProfileStore,
    RuleOverrideStore, StoredBlueprint,
};
use crate::core::error::{EngineError, Result};
use crate::core::types::TaskId;
use crate::profile::Profile;
use crate::rules::BlueprintRule;

pub const PROFILE_FILE: &str = "profile.json";
pub const BLUEPRINT_FILE: &str = "blueprint.json";
pub const COMPLETION_FILE: &str = "tasks.json";
pub const CUSTOM_RULES_FILE: &str = "custom_rules.json";

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredProfile {
    profile: Profile,
    created_at: DateTime<Utc>,
}

pub struct JsonFileStore {
    dir: PathBuf,
    /// Serializes read-modify-write cycles on the completion map
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let content = match fs::read_to_string(self.path(name)) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value = serde_json::from_str(&content)
            .map_err(|e| EngineError::Persistence(format!("{}: {}", name, e)))?;
        Ok(Some(value))
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(value)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(self.path(name)).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl ProfileStore for JsonFileStore {
    fn get_profile(&self) -> Result<Option<Profile>> {
        Ok(self
            .read_json::<StoredProfile>(PROFILE_FILE)?
            .map(|stored| stored.profile))
    }

    fn put_profile(&self, profile: &Profile) -> Result<()> {
        let stored = StoredProfile {
            profile: profile.clone(),
            created_at: Utc::now(),
        };
        self.write_json(PROFILE_FILE, &stored)
    }

    fn clear_profile(&self) -> Result<()> {
        self.remove(PROFILE_FILE)
    }
}

impl BlueprintStore for JsonFileStore {
    fn get_blueprint(&self) -> Result<Option<StoredBlueprint>> {
        self.read_json(BLUEPRINT_FILE)
    }

    fn put_blueprint(&self, blueprint: &StoredBlueprint) -> Result<()> {
        self.write_json(BLUEPRINT_FILE, blueprint)
    }
}

impl CompletionStore for JsonFileStore {
    fn get_completion(&self) -> Result<CompletionState> {
        Ok(self.read_json(COMPLETION_FILE)?.unwrap_or_default())
    }

    fn upsert_completion(&self, id: &TaskId, entry: CompletionEntry) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut state = match self.get_completion() {
            Ok(state) => state,
            Err(EngineError::Persistence(e)) => {
                tracing::warn!("Discarding unreadable task statuses: {}", e);
                CompletionState::new()
            }
            Err(e) => return Err(e),
        };
        state.upsert(id.clone(), entry);
        self.write_json(COMPLETION_FILE, &state)
    }
}

impl RuleOverrideStore for JsonFileStore {
    fn get_custom_rules(&self) -> Result<Option<Vec<BlueprintRule>>> {
        self.read_json(CUSTOM_RULES_FILE)
    }

    fn put_custom_rules(&self, rules: &[BlueprintRule]) -> Result<()> {
        self.write_json(CUSTOM_RULES_FILE, &rules)
    }

    fn clear_custom_rules(&self) -> Result<()> {
        self.remove(CUSTOM_RULES_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Category, Priority, Task};

    #[test]
    fn test_missing_files_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested"));

        assert!(store.get_profile().unwrap().is_none());
        assert!(store.get_blueprint().unwrap().is_none());
        assert!(store.get_completion().unwrap().is_empty());
        assert!(store.get_custom_rules().unwrap().is_none());
    }

    #[test]
    fn test_blueprint_overwrite_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let first = StoredBlueprint {
            tasks: vec![Task::new("t1", "A", 1, Category::Legal, Priority::High)],
            generated_at: Utc::now(),
        };
        let second = StoredBlueprint {
            tasks: Vec::new(),
            generated_at: Utc::now(),
        };

        store.put_blueprint(&first).unwrap();
        store.put_blueprint(&second).unwrap();

        assert_eq!(store.get_blueprint().unwrap(), Some(second));
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![BLUEPRINT_FILE]);
    }

    #[test]
    fn test_concurrent_rule_writes_keep_one_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(JsonFileStore::new(dir.path()));

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let rules: Vec<_> = (0..=n)
                        .map(|i| BlueprintRule::new(Default::default(), [format!("t{}", i)]))
                        .collect();
                    store.put_custom_rules(&rules).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let rules = store.get_custom_rules().unwrap().unwrap();
        assert!((1..=8).contains(&rules.len()));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_profile_document_wraps_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.put_profile(&Profile::builtin_sample()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(PROFILE_FILE)).unwrap()).unwrap();
        assert_eq!(raw["profile"]["companyName"], "TechFlow AI");
        assert!(raw["createdAt"].is_string());

        store.clear_profile().unwrap();
        store.clear_profile().unwrap();
        assert!(store.get_profile().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_document_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(COMPLETION_FILE), "{not json").unwrap();
        let store = JsonFileStore::new(dir.path());

        assert!(matches!(store.get_completion(), Err(EngineError::Persistence(_))));
    }

    #[test]
    fn test_upsert_recovers_from_corrupt_statuses() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(COMPLETION_FILE), "{not json").unwrap();
        let store = JsonFileStore::new(dir.path());

        store
            .upsert_completion(&TaskId::from("t1"), CompletionEntry::new(true, Utc::now()))
            .unwrap();

        let state = store.get_completion().unwrap();
        assert_eq!(state.len(), 1);
        assert!(state.is_completed(&TaskId::from("t1")));
    }
}
