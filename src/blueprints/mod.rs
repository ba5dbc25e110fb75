//! Blueprint assembly and read-side views
//!
//! Building is pure and produces tasks at rest. Completion is layered on at
//! read time by [`with_status`], and everything downstream (progress, week
//! grouping, filters) works on the annotated copies.

pub mod builder;
pub mod filter;
pub mod progress;
pub mod status;

pub use builder::{build_blueprint, build_blueprint_with_threshold, select_tasks};
pub use filter::{StatusFilter, TaskFilter};
pub use progress::{aggregate, group_by_week, upcoming, Progress, WeekGroup};
pub use status::with_status;
