//! Rule matching: profile + rule set -> applicable task ids

use rayon::prelude::*;
use std::collections::HashSet;

use super::condition::BlueprintRule;
use crate::core::types::TaskId;
use crate::profile::Profile;

/// Set of task ids selected by a rule run
pub type TaskIdSet = HashSet<TaskId, ahash::RandomState>;

/// Collect the tasks of every rule whose condition holds for `profile`.
///
/// Ids are unioned, so a task selected by several rules appears once. Ids
/// are not checked against any catalog here; unknown ones drop out when the
/// builder filters the catalog.
pub fn match_rules(profile: &Profile, rules: &[BlueprintRule]) -> TaskIdSet {
    rules
        .iter()
        .filter(|rule| rule.matches(profile))
        .flat_map(|rule| rule.tasks.iter().cloned())
        .collect()
}

/// Same as [`match_rules`], fanning out over `rayon` once the rule set has
/// at least `parallel_threshold` entries. Union is commutative so the result
/// is identical either way.
pub fn match_rules_with_threshold(
    profile: &Profile,
    rules: &[BlueprintRule],
    parallel_threshold: usize,
) -> TaskIdSet {
    if rules.len() < parallel_threshold {
        return match_rules(profile, rules);
    }

    // PARALLEL: each rule evaluates independently
    rules
        .par_iter()
        .filter(|rule| rule.matches(profile))
        .flat_map_iter(|rule| rule.tasks.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::condition::RuleCondition;

    fn profile() -> Profile {
        Profile {
            stage: "idea".into(),
            industry: "SaaS".into(),
            goals: vec!["build_mvp".into()],
            ..Profile::builtin_sample()
        }
    }

    fn stage_rule(stage: &str, tasks: &[&str]) -> BlueprintRule {
        BlueprintRule::new(
            RuleCondition {
                stage: Some(vec![stage.to_string()]),
                ..RuleCondition::default()
            },
            tasks.iter().copied(),
        )
    }

    #[test]
    fn test_only_matching_rules_contribute() {
        let rules = vec![stage_rule("idea", &["t1", "t2"]), stage_rule("growth", &["t3"])];
        let matched = match_rules(&profile(), &rules);

        assert_eq!(matched.len(), 2);
        assert!(matched.contains(&TaskId::from("t1")));
        assert!(!matched.contains(&TaskId::from("t3")));
    }

    #[test]
    fn test_overlapping_rules_union_once() {
        let by_goal = BlueprintRule::new(
            RuleCondition {
                goals: Some(vec!["build_mvp".into()]),
                ..RuleCondition::default()
            },
            ["t1"],
        );
        let rules = vec![stage_rule("idea", &["t1"]), by_goal];
        let matched = match_rules(&profile(), &rules);

        assert_eq!(matched.len(), 1);
        assert!(matched.contains(&TaskId::from("t1")));
    }

    #[test]
    fn test_empty_rule_set_matches_nothing() {
        assert!(match_rules(&profile(), &[]).is_empty());
    }

    #[test]
    fn test_parallel_path_agrees_with_sequential() {
        let rules: Vec<_> = (0..50)
            .map(|i| {
                let stage = if i % 3 == 0 { "idea" } else { "growth" };
                let shared = format!("t{}", i % 7);
                let own = format!("t{}", i);
                stage_rule(stage, &[shared.as_str(), own.as_str()])
            })
            .collect();

        let sequential = match_rules(&profile(), &rules);
        let parallel = match_rules_with_threshold(&profile(), &rules, 1);
        assert_eq!(sequential, parallel);
    }
}
