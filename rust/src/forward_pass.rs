//! Forward pass: earliest start and finish times.

use crate::graph::{CpmError, ScheduleGraph};
use crate::interner::ActivityIdx;
use crate::log_debug;
use crate::models::Window;

/// Early windows indexed by activity index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForwardPassResult {
    pub earliest_start: Vec<i64>,
    pub earliest_finish: Vec<i64>,
}

impl ForwardPassResult {
    #[inline]
    pub fn early(&self, idx: ActivityIdx) -> Window {
        Window {
            start: self.earliest_start[idx as usize],
            finish: self.earliest_finish[idx as usize],
        }
    }

    /// Latest earliest finish over every activity; 0 for an empty scope.
    pub fn project_finish(&self) -> i64 {
        self.earliest_finish.iter().copied().max().unwrap_or(0)
    }

    /// Latest earliest finish per network, given each activity's network id.
    pub fn network_finishes(&self, membership: &[usize], network_count: usize) -> Vec<i64> {
        let mut finishes = vec![0; network_count];
        for (idx, &network) in membership.iter().enumerate() {
            finishes[network] = finishes[network].max(self.earliest_finish[idx]);
        }
        finishes
    }
}

/// Compute ES/EF for every activity.
///
/// `order` must be a topological order of `graph`: every predecessor is
/// finalized before its successors are visited.
///
/// Fails with [`CpmError::ScheduleOverflow`] if an earliest finish exceeds
/// `i64::MAX`. Every other offset in the schedule lies between 0 and the
/// largest earliest finish, so nothing downstream can overflow once this
/// pass succeeds.
pub fn forward_pass(
    graph: &ScheduleGraph,
    order: &[ActivityIdx],
    verbosity: u8,
) -> Result<ForwardPassResult, CpmError> {
    let n = graph.len();
    let mut result = ForwardPassResult {
        earliest_start: vec![0; n],
        earliest_finish: vec![0; n],
    };

    for &idx in order {
        let earliest_start = graph
            .predecessors(idx)
            .iter()
            .map(|edge| edge.kind.successor_earliest_start(result.early(edge.node)))
            .max()
            .unwrap_or(0);
        let earliest_finish = earliest_start
            .checked_add(graph.duration(idx))
            .ok_or_else(|| CpmError::ScheduleOverflow {
                activity_id: graph.activity_id(idx).to_string(),
            })?;

        result.earliest_start[idx as usize] = earliest_start;
        result.earliest_finish[idx as usize] = earliest_finish;

        log_debug!(
            verbosity,
            activity = graph.activity_id(idx),
            es = earliest_start,
            ef = earliest_finish,
            "forward pass"
        );
    }

    Ok(result)
}
