//! Onboarding form answers before they become a [`Profile`]

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Profile;
use crate::core::error::{EngineError, Result};

/// Unvalidated onboarding answers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileDraft {
    pub company_name: String,
    pub industry: String,
    pub stage: String,
    pub founder_count: u32,
    pub funding_goal: String,
    pub current_state: String,
    pub goals: Vec<String>,
}

impl ProfileDraft {
    /// Prefill a draft from an existing profile (the "use sample" shortcut)
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            company_name: profile.company_name.clone(),
            industry: profile.industry.clone(),
            stage: profile.stage.clone(),
            founder_count: profile.founder_count,
            funding_goal: profile.funding_goal.clone(),
            current_state: profile.current_state.clone(),
            goals: profile.goals.clone(),
        }
    }

    /// Check every onboarding step and collect all problems at once
    pub fn errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let required = [
            ("company name", &self.company_name),
            ("industry", &self.industry),
            ("stage", &self.stage),
            ("current state", &self.current_state),
            ("funding goal", &self.funding_goal),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(format!("{} is required", field));
            }
        }

        if self.founder_count == 0 {
            errors.push("founder count must be at least 1".into());
        }

        if !self.goals.iter().any(|g| !g.trim().is_empty()) {
            errors.push("select at least one goal".into());
        }

        errors
    }

    /// Turn the answers into a profile with a fresh id and creation time
    ///
    /// Goals are trimmed and deduplicated, keeping first-selected order.
    pub fn validate(self) -> Result<Profile> {
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(EngineError::InvalidProfile(errors));
        }

        let mut goals: Vec<String> = Vec::with_capacity(self.goals.len());
        for goal in self.goals {
            let goal = goal.trim().to_string();
            if !goal.is_empty() && !goals.contains(&goal) {
                goals.push(goal);
            }
        }

        Ok(Profile {
            id: Uuid::new_v4().to_string(),
            company_name: self.company_name.trim().to_string(),
            industry: self.industry.trim().to_string(),
            stage: self.stage.trim().to_string(),
            founder_count: self.founder_count,
            funding_goal: self.funding_goal.trim().to_string(),
            current_state: self.current_state.trim().to_string(),
            goals,
            created_at: Utc::now(),
        })
    }
}
