//! Load blueprint rules from JSON or TOML
//!
//! Parsing is lenient: unknown condition keys are ignored and entries that
//! are not rule-shaped are skipped with a warning instead of failing the
//! whole set. A scalar where a list is expected is read as a one-element
//! list.

use serde_json::Value;
use std::fs;
use std::path::Path;

use super::condition::{BlueprintRule, RuleCondition};
use crate::core::error::{EngineError, Result};
use crate::core::types::TaskId;

/// Load a rule file, picking the format from the extension (`.toml` or JSON)
pub fn load_rules_file(path: &Path) -> Result<Vec<BlueprintRule>> {
    let content = fs::read_to_string(path)?;
    let is_toml = path.extension().map_or(false, |ext| ext == "toml");

    if is_toml {
        parse_rules_toml(&content)
    } else {
        parse_rules_json(&content)
    }
}

/// Parse rules from a JSON array (or an object with a `blueprintRules` array)
pub fn parse_rules_json(content: &str) -> Result<Vec<BlueprintRule>> {
    let value: Value = serde_json::from_str(content)?;
    Ok(parse_rules_value(&value))
}

/// Parse rules from TOML using `[[rules]]` or `[[blueprintRules]]` tables
pub fn parse_rules_toml(content: &str) -> Result<Vec<BlueprintRule>> {
    let toml: toml::Value = content.parse()?;
    let value = serde_json::to_value(toml)
        .map_err(|e| EngineError::Catalog(format!("Unrepresentable TOML: {}", e)))?;
    Ok(parse_rules_value(&value))
}

/// Extract rules from an already-parsed document
pub fn parse_rules_value(value: &Value) -> Vec<BlueprintRule> {
    let entries = match value {
        Value::Array(entries) => entries.as_slice(),
        Value::Object(map) => match map
            .get("blueprintRules")
            .or_else(|| map.get("rules"))
            .and_then(|v| v.as_array())
        {
            Some(entries) => entries.as_slice(),
            None => &[],
        },
        _ => &[],
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let rule = parse_rule(entry);
            if rule.is_none() {
                tracing::warn!("Skipping malformed blueprint rule at index {}", index);
            }
            rule
        })
        .collect()
}

fn parse_rule(value: &Value) -> Option<BlueprintRule> {
    let table = value.as_object()?;

    let condition = match table.get("condition") {
        Some(Value::Object(cond)) => RuleCondition {
            stage: string_list(cond.get("stage")),
            industry: string_list(cond.get("industry")),
            funding_goal: string_list(cond.get("fundingGoal").or_else(|| cond.get("funding_goal"))),
            goals: string_list(cond.get("goals")),
        },
        Some(Value::Null) | None => RuleCondition::default(),
        Some(_) => return None,
    };

    let tasks = string_list(table.get("tasks"))
        .unwrap_or_default()
        .into_iter()
        .map(TaskId::from)
        .collect();

    Some(BlueprintRule { condition, tasks })
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    match value? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        ),
        Value::String(s) => Some(vec![s.clone()]),
        _ => None,
    }
}
