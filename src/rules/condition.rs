//! Blueprint rule definitions

use serde::{Deserialize, Serialize};

use crate::core::types::TaskId;
use crate::profile::Profile;

/// Profile predicate of a rule
///
/// Every sub-condition is optional. Present ones are ANDed; absent ones hold
/// vacuously. A present but empty list never holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_goal: Option<Vec<String>>,
    /// Holds when the profile shares at least one goal with this list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<String>>,
}

impl RuleCondition {
    /// Evaluate the condition against a profile
    pub fn holds(&self, profile: &Profile) -> bool {
        member(&self.stage, &profile.stage)
            && member(&self.industry, &profile.industry)
            && member(&self.funding_goal, &profile.funding_goal)
            && self
                .goals
                .as_ref()
                .map_or(true, |wanted| wanted.iter().any(|g| profile.has_goal(g)))
    }

    pub fn is_unconditional(&self) -> bool {
        self.stage.is_none()
            && self.industry.is_none()
            && self.funding_goal.is_none()
            && self.goals.is_none()
    }
}

fn member(accepted: &Option<Vec<String>>, value: &str) -> bool {
    accepted
        .as_ref()
        .map_or(true, |values| values.iter().any(|v| v == value))
}

/// A condition plus the catalog tasks it activates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueprintRule {
    #[serde(default)]
    pub condition: RuleCondition,
    #[serde(default)]
    pub tasks: Vec<TaskId>,
}

impl BlueprintRule {
    pub fn new(condition: RuleCondition, tasks: impl IntoIterator<Item = impl Into<TaskId>>) -> Self {
        Self {
            condition,
            tasks: tasks.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, profile: &Profile) -> bool {
        self.condition.holds(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            stage: "idea".into(),
            industry: "SaaS".into(),
            funding_goal: "seed".into(),
            goals: vec!["build_mvp".into()],
            ..Profile::builtin_sample()
        }
    }

    fn list(values: &[&str]) -> Option<Vec<String>> {
        Some(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_empty_condition_always_holds() {
        let condition = RuleCondition::default();
        assert!(condition.is_unconditional());
        assert!(condition.holds(&profile()));
    }

    #[test]
    fn test_all_present_conditions_must_hold() {
        let condition = RuleCondition {
            stage: list(&["idea", "mvp"]),
            industry: list(&["Fintech"]),
            ..RuleCondition::default()
        };
        assert!(!condition.holds(&profile()));

        let condition = RuleCondition {
            stage: list(&["idea", "mvp"]),
            industry: list(&["SaaS"]),
            funding_goal: list(&["seed"]),
            ..RuleCondition::default()
        };
        assert!(condition.holds(&profile()));
    }

    #[test]
    fn test_goals_need_any_overlap() {
        let condition = RuleCondition {
            goals: list(&["raise_funding", "build_mvp"]),
            ..RuleCondition::default()
        };
        assert!(condition.holds(&profile()));

        let no_goals = Profile {
            goals: Vec::new(),
            ..profile()
        };
        assert!(!condition.holds(&no_goals));
    }

    #[test]
    fn test_present_empty_list_never_holds() {
        let condition = RuleCondition {
            stage: Some(Vec::new()),
            ..RuleCondition::default()
        };
        assert!(!condition.holds(&profile()));
    }

    #[test]
    fn test_rule_json_uses_camel_case_keys() {
        let rule: BlueprintRule = serde_json::from_str(
            r#"{"condition": {"fundingGoal": ["seed"], "unknownKey": ["x"]}, "tasks": ["t9"]}"#,
        )
        .unwrap();

        assert_eq!(rule.condition.funding_goal, list(&["seed"]));
        assert_eq!(rule.tasks, vec![TaskId::from("t9")]);
        assert!(rule.matches(&profile()));
    }
}
