//! Progress statistics over status-annotated task lists

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::TaskWithStatus;

/// Summary of a blueprint's completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Rounded whole percent; 0 when there are no tasks
    pub percentage: u32,
    /// Highest week number present; 0 when there are no tasks
    pub weeks_covered: u32,
}

/// Reduce a task list to its progress summary
pub fn aggregate(tasks: &[TaskWithStatus]) -> Progress {
    let total_tasks = tasks.len();
    let completed_tasks = tasks.iter().filter(|t| t.completed).count();

    Progress {
        total_tasks,
        completed_tasks,
        percentage: percent(completed_tasks, total_tasks),
        weeks_covered: tasks.iter().map(|t| t.week()).max().unwrap_or(0),
    }
}

fn percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (done as f64 / total as f64 * 100.0).round() as u32
}

/// One week of a blueprint with its own completion figures
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekGroup {
    pub week: u32,
    pub tasks: Vec<TaskWithStatus>,
    pub completed: usize,
    pub percentage: u32,
}

impl WeekGroup {
    pub fn total(&self) -> usize {
        self.tasks.len()
    }
}

/// Group tasks by week, weeks ascending, input order kept within a week
pub fn group_by_week(tasks: &[TaskWithStatus]) -> Vec<WeekGroup> {
    let mut weeks: BTreeMap<u32, Vec<TaskWithStatus>> = BTreeMap::new();
    for task in tasks {
        weeks.entry(task.week()).or_default().push(task.clone());
    }

    weeks
        .into_iter()
        .map(|(week, tasks)| {
            let completed = tasks.iter().filter(|t| t.completed).count();
            WeekGroup {
                week,
                percentage: percent(completed, tasks.len()),
                completed,
                tasks,
            }
        })
        .collect()
}

/// The next `limit` pending tasks, in list order
pub fn upcoming(tasks: &[TaskWithStatus], limit: usize) -> Vec<&TaskWithStatus> {
    tasks.iter().filter(|t| !t.completed).take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Category, Priority, Task};

    fn annotated(id: &str, week: u32, completed: bool) -> TaskWithStatus {
        TaskWithStatus {
            task: Task::new(id, id, week, Category::Operations, Priority::Medium),
            completed,
        }
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        assert_eq!(
            aggregate(&[]),
            Progress {
                total_tasks: 0,
                completed_tasks: 0,
                percentage: 0,
                weeks_covered: 0,
            }
        );
    }

    #[test]
    fn test_percentage_rounds() {
        let tasks = vec![
            annotated("a", 1, true),
            annotated("b", 2, false),
            annotated("c", 12, false),
        ];
        let progress = aggregate(&tasks);

        assert_eq!(progress.completed_tasks, 1);
        assert_eq!(progress.percentage, 33);
        assert_eq!(progress.weeks_covered, 12);

        let two_of_three = vec![
            annotated("a", 1, true),
            annotated("b", 1, true),
            annotated("c", 1, false),
        ];
        assert_eq!(aggregate(&two_of_three).percentage, 67);
    }

    #[test]
    fn test_group_by_week() {
        let tasks = vec![
            annotated("a", 2, true),
            annotated("b", 1, false),
            annotated("c", 2, false),
        ];
        let groups = group_by_week(&tasks);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].week, 1);
        assert_eq!(groups[0].percentage, 0);
        assert_eq!(groups[1].total(), 2);
        assert_eq!(groups[1].completed, 1);
        assert_eq!(groups[1].percentage, 50);
        assert_eq!(groups[1].tasks[0].id().as_str(), "a");
    }

    #[test]
    fn test_upcoming_skips_completed() {
        let tasks = vec![
            annotated("a", 1, true),
            annotated("b", 1, false),
            annotated("c", 2, false),
            annotated("d", 3, false),
            annotated("e", 4, false),
        ];
        let next: Vec<_> = upcoming(&tasks, 3).iter().map(|t| t.id().as_str()).collect();

        assert_eq!(next, vec!["b", "c", "d"]);
    }
}
