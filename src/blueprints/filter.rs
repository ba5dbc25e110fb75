//! Task list filtering by category, priority and status

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::core::types::{Category, Priority, TaskWithStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    Completed,
    Pending,
}

impl StatusFilter {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(StatusFilter::Completed),
            "pending" => Some(StatusFilter::Pending),
            _ => None,
        }
    }
}

/// Optional criteria, all of which must hold. `None` means "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<StatusFilter>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = Some(status);
        self
    }

    /// Build a filter from user-supplied names; `None` or "all" leaves a
    /// criterion open
    pub fn from_args(
        category: Option<&str>,
        priority: Option<&str>,
        status: Option<&str>,
    ) -> Result<Self> {
        let mut filter = Self::new();

        if let Some(c) = category.filter(|c| *c != "all") {
            let category = Category::parse(c)
                .ok_or_else(|| EngineError::InvalidArgument(format!("unknown category '{}'", c)))?;
            filter = filter.category(category);
        }
        if let Some(p) = priority.filter(|p| *p != "all") {
            let priority = Priority::parse(p)
                .ok_or_else(|| EngineError::InvalidArgument(format!("unknown priority '{}'", p)))?;
            filter = filter.priority(priority);
        }
        if let Some(s) = status.filter(|s| *s != "all") {
            let status = StatusFilter::parse(s)
                .ok_or_else(|| EngineError::InvalidArgument(format!("unknown status '{}'", s)))?;
            filter = filter.status(status);
        }

        Ok(filter)
    }

    pub fn is_active(&self) -> bool {
        self.category.is_some() || self.priority.is_some() || self.status.is_some()
    }

    pub fn accepts(&self, task: &TaskWithStatus) -> bool {
        self.category.map_or(true, |c| task.task.category == c)
            && self.priority.map_or(true, |p| task.task.priority == p)
            && self.status.map_or(true, |s| match s {
                StatusFilter::Completed => task.completed,
                StatusFilter::Pending => !task.completed,
            })
    }

    /// Keep matching tasks, preserving order
    pub fn apply<'a>(&self, tasks: &'a [TaskWithStatus]) -> Vec<&'a TaskWithStatus> {
        tasks.iter().filter(|t| self.accepts(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Task;

    fn tasks() -> Vec<TaskWithStatus> {
        vec![
            TaskWithStatus {
                task: Task::new("t1", "A", 1, Category::Legal, Priority::High),
                completed: true,
            },
            TaskWithStatus {
                task: Task::new("t2", "B", 1, Category::Legal, Priority::Low),
                completed: false,
            },
            TaskWithStatus {
                task: Task::new("t3", "C", 2, Category::Product, Priority::High),
                completed: false,
            },
        ]
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let tasks = tasks();
        assert!(!TaskFilter::new().is_active());
        assert_eq!(TaskFilter::new().apply(&tasks).len(), 3);
    }

    #[test]
    fn test_criteria_combine() {
        let tasks = tasks();
        let high_pending = TaskFilter::new()
            .priority(Priority::High)
            .status(StatusFilter::Pending);
        let hits = high_pending.apply(&tasks);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id().as_str(), "t3");

        let legal_done = TaskFilter::new()
            .category(Category::Legal)
            .status(StatusFilter::Completed);
        assert_eq!(legal_done.apply(&tasks)[0].id().as_str(), "t1");
    }

    #[test]
    fn test_from_args() {
        let filter = TaskFilter::from_args(Some("legal"), Some("all"), Some("pending")).unwrap();
        assert_eq!(
            filter,
            TaskFilter::new().category(Category::Legal).status(StatusFilter::Pending)
        );
        assert!(!TaskFilter::from_args(None, Some("all"), None).unwrap().is_active());
    }

    #[test]
    fn test_from_args_rejects_unknown_names() {
        assert!(matches!(
            TaskFilter::from_args(Some("hr"), None, None),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            TaskFilter::from_args(None, Some("urgent"), None),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            TaskFilter::from_args(None, None, Some("done")),
            Err(EngineError::InvalidArgument(_))
        ));
    }
}
