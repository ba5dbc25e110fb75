//! Blueprint building: matched rules -> ordered task sequence

use std::collections::HashSet;

use crate::core::types::{Task, TaskId};
use crate::profile::Profile;
use crate::rules::{match_rules_with_threshold, BlueprintRule, TaskIdSet};

/// Select the catalog tasks activated by `rules` for `profile`.
///
/// Catalog order is kept for tasks in the same week (stable sort), each id
/// appears at most once, and rule ids missing from the catalog are dropped.
/// The result carries no completion state.
pub fn build_blueprint(profile: &Profile, catalog: &[Task], rules: &[BlueprintRule]) -> Vec<Task> {
    build_blueprint_with_threshold(profile, catalog, rules, usize::MAX)
}

/// [`build_blueprint`] with rule matching parallelized above `parallel_threshold`
pub fn build_blueprint_with_threshold(
    profile: &Profile,
    catalog: &[Task],
    rules: &[BlueprintRule],
    parallel_threshold: usize,
) -> Vec<Task> {
    let matched = match_rules_with_threshold(profile, rules, parallel_threshold);
    select_tasks(catalog, &matched)
}

/// Filter `catalog` to `matched` and order by week
pub fn select_tasks(catalog: &[Task], matched: &TaskIdSet) -> Vec<Task> {
    let mut seen: HashSet<&TaskId, ahash::RandomState> = HashSet::default();

    let mut tasks: Vec<Task> = catalog
        .iter()
        .filter(|task| matched.contains(&task.id) && seen.insert(&task.id))
        .cloned()
        .collect();

    tasks.sort_by_key(|task| task.week);
    tasks
}
