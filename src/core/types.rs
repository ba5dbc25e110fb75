//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog identifier for a task (e.g. `"t1"`, `"incorporate-delaware"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Work area a task belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Legal,
    Product,
    Marketing,
    Fundraising,
    Operations,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Legal,
        Category::Product,
        Category::Marketing,
        Category::Fundraising,
        Category::Operations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Legal => "legal",
            Category::Product => "product",
            Category::Marketing => "marketing",
            Category::Fundraising => "fundraising",
            Category::Operations => "operations",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog task as stored at rest.
///
/// Carries no completion state. Completion is layered on at read time by
/// producing a [`TaskWithStatus`], so catalog and blueprint records are never
/// mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// 1-based week of the 90-day plan; defines blueprint ordering
    pub week: u32,
    pub category: Category,
    pub priority: Priority,
    #[serde(default)]
    pub estimated_hours: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<TaskId>,
    /// Opaque references to templates or playbook articles
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
}

impl Task {
    pub fn new(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        week: u32,
        category: Category,
        priority: Priority,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            week,
            category,
            priority,
            estimated_hours: 0.0,
            dependencies: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_hours(mut self, hours: f32) -> Self {
        self.estimated_hours = hours;
        self
    }

    pub fn with_dependency(mut self, id: impl Into<TaskId>) -> Self {
        self.dependencies.push(id.into());
        self
    }

    pub fn with_resource(mut self, reference: impl Into<String>) -> Self {
        self.resources.push(reference.into());
        self
    }
}

/// A task annotated with the user's current completion state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskWithStatus {
    #[serde(flatten)]
    pub task: Task,
    pub completed: bool,
}

impl TaskWithStatus {
    pub fn id(&self) -> &TaskId {
        &self.task.id
    }

    pub fn week(&self) -> u32 {
        self.task.week
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_deserializes_catalog_shape() {
        let json = r#"{
            "id": "t1",
            "title": "Incorporate",
            "description": "File incorporation papers",
            "week": 1,
            "category": "legal",
            "priority": "high",
            "estimatedHours": 4,
            "dependencies": [],
            "resources": ["tpl-founders-agreement"]
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.id, TaskId::from("t1"));
        assert_eq!(task.week, 1);
        assert_eq!(task.category, Category::Legal);
        assert_eq!(task.priority, Priority::High);
        assert!((task.estimated_hours - 4.0).abs() < f32::EPSILON);
        assert_eq!(task.resources, vec!["tpl-founders-agreement".to_string()]);
    }

    #[test]
    fn test_task_with_status_serializes_flat() {
        let task = Task::new("t1", "Incorporate", 1, Category::Legal, Priority::High);
        let annotated = TaskWithStatus { task, completed: true };
        let value = serde_json::to_value(&annotated).unwrap();

        assert_eq!(value["id"], "t1");
        assert_eq!(value["completed"], true);
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!(Category::parse("Marketing"), Some(Category::Marketing));
        assert_eq!(Category::parse("hr"), None);
        assert_eq!(Priority::parse("LOW"), Some(Priority::Low));
    }
}
