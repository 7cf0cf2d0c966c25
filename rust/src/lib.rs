//! Critical Path Method (CPM) scheduling engine.
//!
//! Given the activities and precedence dependencies of one scheduling scope,
//! computes earliest/latest start and finish, float, and criticality for
//! every activity. The engine is a pure function of its input: it keeps no
//! state between calls and never touches caller-owned records.
//!
//! Pipeline: [`graph`] (index + validate + topological order) →
//! [`forward_pass`] → [`backward_pass`], wired together by
//! [`calculate_schedule`].

pub mod backward_pass;
mod config;
pub mod forward_pass;
pub mod graph;
pub mod interner;
pub mod logging;
mod models;
#[cfg(feature = "python")]
mod python;
mod schedule;

pub use backward_pass::backward_pass;
pub use config::{CpmConfig, FinishScope};
pub use forward_pass::{forward_pass, ForwardPassResult};
pub use graph::{CpmError, Edge, ScheduleGraph};
pub use interner::ActivityIdx;
pub use models::{Activity, ActivityTiming, DatedTiming, Dependency, DependencyType, Window};
pub use schedule::{calculate_schedule, recalculate, ScheduleResult};
