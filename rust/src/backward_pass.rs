//! Backward pass: latest times, float and criticality.

use crate::forward_pass::ForwardPassResult;
use crate::graph::ScheduleGraph;
use crate::interner::ActivityIdx;
use crate::log_debug;
use crate::models::ActivityTiming;

/// Compute LS/LF, float and the critical flag for every activity.
///
/// `order` is the same topological order the forward pass used; it is walked
/// in reverse so every successor is finalized first. `finish_bounds[idx]` is
/// the latest finish given to an activity with no successors (the project
/// finish, or its network's finish).
///
/// Returns timings indexed by activity index. Plain subtraction is safe:
/// `duration <= EF <= LF <= finish bound` and `0 <= ES <= LS`, so neither
/// `LF - duration` nor `LS - ES` leaves the `i64` range.
pub fn backward_pass(
    graph: &ScheduleGraph,
    order: &[ActivityIdx],
    forward: &ForwardPassResult,
    finish_bounds: &[i64],
    verbosity: u8,
) -> Vec<ActivityTiming> {
    let n = graph.len();
    let mut timings = vec![ActivityTiming::default(); n];

    for &idx in order.iter().rev() {
        let i = idx as usize;

        let latest_finish = graph
            .successors(idx)
            .iter()
            .map(|edge| {
                edge.kind
                    .predecessor_latest_finish(timings[edge.node as usize].late())
            })
            .min()
            .unwrap_or(finish_bounds[i]);
        let latest_start = latest_finish - graph.duration(idx);

        let early = forward.early(idx);
        let float = latest_start - early.start;

        timings[i] = ActivityTiming {
            earliest_start: early.start,
            earliest_finish: early.finish,
            latest_start,
            latest_finish,
            float,
            is_critical: float == 0,
        };

        log_debug!(
            verbosity,
            activity = graph.activity_id(idx),
            ls = latest_start,
            lf = latest_finish,
            float,
            "backward pass"
        );
    }

    timings
}
