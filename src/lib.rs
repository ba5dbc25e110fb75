//! Founder Blueprint - rule-matched 90-day task plans with progress tracking

pub mod blueprints;
pub mod catalog;
pub mod core;
pub mod engine;
pub mod profile;
pub mod rules;
pub mod store;

pub use engine::BlueprintEngine;
