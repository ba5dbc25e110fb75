//! Layering completion state onto task lists

use crate::core::types::{Task, TaskWithStatus};
use crate::store::CompletionState;

/// Annotate each task with its completion flag.
///
/// Returns fresh copies in input order; the input is never touched. Tasks
/// without an entry are pending, and entries for tasks not in `tasks` are
/// ignored.
pub fn with_status(tasks: &[Task], completion: &CompletionState) -> Vec<TaskWithStatus> {
    tasks
        .iter()
        .map(|task| TaskWithStatus {
            completed: completion.is_completed(&task.id),
            task: task.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Category, Priority, TaskId};
    use crate::store::CompletionEntry;
    use chrono::Utc;

    fn tasks() -> Vec<Task> {
        vec![
            Task::new("t2", "B", 2, Category::Legal, Priority::Low),
            Task::new("t1", "A", 1, Category::Legal, Priority::Low),
        ]
    }

    #[test]
    fn test_defaults_to_pending_and_keeps_order() {
        let merged = with_status(&tasks(), &CompletionState::new());

        assert_eq!(merged[0].id(), &TaskId::from("t2"));
        assert!(merged.iter().all(|t| !t.completed));
    }

    #[test]
    fn test_explicitly_reopened_task_is_pending() {
        let mut state = CompletionState::new();
        state.upsert(TaskId::from("t1"), CompletionEntry::new(true, Utc::now()));
        state.upsert(TaskId::from("t2"), CompletionEntry::new(false, Utc::now()));
        state.upsert(TaskId::from("orphan"), CompletionEntry::new(true, Utc::now()));

        let merged = with_status(&tasks(), &state);
        assert_eq!(merged.len(), 2);
        assert!(!merged[0].completed);
        assert!(merged[1].completed);
    }
}
