//! Founder profiles and onboarding validation

pub mod draft;

pub use draft::ProfileDraft;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A founder's onboarding answers
///
/// Immutable once created; a new onboarding submission replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub company_name: String,
    pub industry: String,
    pub stage: String,
    pub founder_count: u32,
    pub funding_goal: String,
    pub current_state: String,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn has_goal(&self, goal: &str) -> bool {
        self.goals.iter().any(|g| g == goal)
    }

    /// Profile used when no catalog could be loaded
    pub fn builtin_sample() -> Self {
        Self {
            id: "sample-1".to_string(),
            company_name: "TechFlow AI".to_string(),
            industry: "SaaS".to_string(),
            stage: "idea".to_string(),
            founder_count: 2,
            funding_goal: "seed".to_string(),
            current_state: "concept".to_string(),
            goals: vec![
                "build_mvp".to_string(),
                "raise_funding".to_string(),
                "get_first_customers".to_string(),
            ],
            created_at: Utc::now(),
        }
    }
}
