//! Blueprint rules: definitions, matching and file loading

pub mod condition;
pub mod matcher;
mod loader;

pub use condition::{BlueprintRule, RuleCondition};
pub use matcher::{match_rules, match_rules_with_threshold, TaskIdSet};
pub use loader::{load_rules_file, parse_rules_json, parse_rules_toml, parse_rules_value};

/// Resolve the rule set to use: an override replaces the defaults entirely.
pub fn effective_rules<'a>(
    custom: Option<&'a [BlueprintRule]>,
    defaults: &'a [BlueprintRule],
) -> &'a [BlueprintRule] {
    custom.unwrap_or(defaults)
}
