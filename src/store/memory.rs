//! In-memory store for embedding and tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use super::{
    BlueprintStore, CompletionEntry, CompletionState, CompletionStore, ProfileStore,
    RuleOverrideStore, StoredBlueprint,
};
use crate::core::error::{EngineError, Result};
use crate::core::types::TaskId;
use crate::profile::Profile;
use crate::rules::BlueprintRule;

#[derive(Default)]
pub struct MemoryStore {
    profile: RwLock<Option<Profile>>,
    blueprint: RwLock<Option<StoredBlueprint>>,
    completion: RwLock<CompletionState>,
    custom_rules: RwLock<Option<Vec<BlueprintRule>>>,
    /// When set every write is rejected, like a full or locked disk
    read_only: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(EngineError::Persistence("store is read-only".into()));
        }
        Ok(())
    }
}

fn read<T: Clone>(lock: &RwLock<T>) -> T {
    lock.read().unwrap_or_else(PoisonError::into_inner).clone()
}

fn write<T>(lock: &RwLock<T>, value: T) {
    *lock.write().unwrap_or_else(PoisonError::into_inner) = value;
}

impl ProfileStore for MemoryStore {
    fn get_profile(&self) -> Result<Option<Profile>> {
        Ok(read(&self.profile))
    }

    fn put_profile(&self, profile: &Profile) -> Result<()> {
        self.check_writable()?;
        write(&self.profile, Some(profile.clone()));
        Ok(())
    }

    fn clear_profile(&self) -> Result<()> {
        self.check_writable()?;
        write(&self.profile, None);
        Ok(())
    }
}

impl BlueprintStore for MemoryStore {
    fn get_blueprint(&self) -> Result<Option<StoredBlueprint>> {
        Ok(read(&self.blueprint))
    }

    fn put_blueprint(&self, blueprint: &StoredBlueprint) -> Result<()> {
        self.check_writable()?;
        write(&self.blueprint, Some(blueprint.clone()));
        Ok(())
    }
}

impl CompletionStore for MemoryStore {
    fn get_completion(&self) -> Result<CompletionState> {
        Ok(read(&self.completion))
    }

    fn upsert_completion(&self, id: &TaskId, entry: CompletionEntry) -> Result<()> {
        self.check_writable()?;
        self.completion
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .upsert(id.clone(), entry);
        Ok(())
    }
}

impl RuleOverrideStore for MemoryStore {
    fn get_custom_rules(&self) -> Result<Option<Vec<BlueprintRule>>> {
        Ok(read(&self.custom_rules))
    }

    fn put_custom_rules(&self, rules: &[BlueprintRule]) -> Result<()> {
        self.check_writable()?;
        write(&self.custom_rules, Some(rules.to_vec()));
        Ok(())
    }

    fn clear_custom_rules(&self) -> Result<()> {
        self.check_writable()?;
        write(&self.custom_rules, None);
        Ok(())
    }
}
