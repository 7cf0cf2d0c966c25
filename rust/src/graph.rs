//! Dependency graph construction and validation.
//!
//! Turns flat activity and dependency lists into an index-based adjacency
//! structure and rejects malformed input before any arithmetic runs.

use std::collections::VecDeque;

use thiserror::Error;

use crate::interner::{ActivityIdx, ActivityIndex};
use crate::models::{Activity, Dependency, DependencyType};
use crate::{log_checks, log_debug};

/// Errors that reject a scheduling scope. No partial result is ever produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CpmError {
    #[error("Activity {activity_id:?} has negative duration {duration}")]
    InvalidDuration { activity_id: String, duration: i64 },

    #[error("Activity id {activity_id:?} appears more than once in the scope")]
    DuplicateActivity { activity_id: String },

    #[error("Dependency {dependency_id:?} references unknown activity {activity_id:?}")]
    DanglingReference {
        dependency_id: String,
        activity_id: String,
    },

    /// `activity_ids` holds every activity that could not be ordered: the
    /// cycle members plus anything downstream of them, sorted.
    #[error("Circular dependency detected among activities {activity_ids:?}")]
    CycleDetected { activity_ids: Vec<String> },

    /// An earliest finish does not fit in an `i64` offset.
    #[error("Schedule offsets overflow at activity {activity_id:?}")]
    ScheduleOverflow { activity_id: String },

    #[error("Scope holds {activities} activities, more than the {max} an index can address")]
    ScopeTooLarge { activities: usize, max: usize },
}

/// Largest number of activities one scope may hold; indices are `u32`.
pub const MAX_ACTIVITIES: usize = ActivityIdx::MAX as usize;

fn check_scope_size(activities: usize) -> Result<(), CpmError> {
    if activities > MAX_ACTIVITIES {
        return Err(CpmError::ScopeTooLarge {
            activities,
            max: MAX_ACTIVITIES,
        });
    }
    Ok(())
}

/// One side of a dependency, stored on the activity at the other end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub node: ActivityIdx,
    pub kind: DependencyType,
}

/// Validated, index-based view of one scheduling scope.
#[derive(Clone, Debug)]
pub struct ScheduleGraph {
    index: ActivityIndex,
    durations: Vec<i64>,
    predecessors: Vec<Vec<Edge>>,
    successors: Vec<Vec<Edge>>,
}

impl ScheduleGraph {
    /// Index activities and wire up dependencies.
    ///
    /// Checks the scope size up front, durations and duplicate ids while
    /// indexing activities, then dangling endpoints while indexing
    /// dependencies. Cycles are caught by [`ScheduleGraph::topological_order`].
    pub fn build(
        activities: &[Activity],
        dependencies: &[Dependency],
        verbosity: u8,
    ) -> Result<Self, CpmError> {
        let n = activities.len();
        check_scope_size(n)?;
        let mut index = ActivityIndex::with_capacity(n);
        let mut durations = Vec::with_capacity(n);

        for activity in activities {
            if activity.duration < 0 {
                return Err(CpmError::InvalidDuration {
                    activity_id: activity.id.clone(),
                    duration: activity.duration,
                });
            }
            if index.insert(&activity.id).is_none() {
                return Err(CpmError::DuplicateActivity {
                    activity_id: activity.id.clone(),
                });
            }
            durations.push(activity.duration);
        }

        let mut predecessors: Vec<Vec<Edge>> = vec![Vec::new(); n];
        let mut successors: Vec<Vec<Edge>> = vec![Vec::new(); n];

        for dep in dependencies {
            let from = resolve_endpoint(&index, dep, &dep.from_activity_id)?;
            let to = resolve_endpoint(&index, dep, &dep.to_activity_id)?;

            if !dep.kind.is_native() {
                log_checks!(
                    verbosity,
                    dependency = %dep.id,
                    tag = dep.kind.tag(),
                    lag = dep.kind.lag(),
                    "dependency evaluated as finish-to-start without lag"
                );
            }

            successors[from as usize].push(Edge {
                node: to,
                kind: dep.kind.clone(),
            });
            predecessors[to as usize].push(Edge {
                node: from,
                kind: dep.kind.clone(),
            });
        }

        Ok(Self {
            index,
            durations,
            predecessors,
            successors,
        })
    }

    /// Kahn's algorithm: dependencies before dependents.
    ///
    /// The queue is seeded and drained in activity input order, so the order
    /// is reproducible for a given input. A self-loop keeps its node's
    /// in-degree above zero and is reported like any longer cycle.
    pub fn topological_order(&self, verbosity: u8) -> Result<Vec<ActivityIdx>, CpmError> {
        let n = self.len();
        let mut in_degree: Vec<usize> = self.predecessors.iter().map(Vec::len).collect();

        // n <= MAX_ACTIVITIES, enforced by build()
        let mut queue: VecDeque<ActivityIdx> = (0..n as ActivityIdx)
            .filter(|&idx| in_degree[idx as usize] == 0)
            .collect();

        let mut order: Vec<ActivityIdx> = Vec::with_capacity(n);

        while let Some(idx) = queue.pop_front() {
            order.push(idx);
            for edge in &self.successors[idx as usize] {
                let degree = &mut in_degree[edge.node as usize];
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(edge.node);
                }
            }
        }

        if order.len() < n {
            let mut activity_ids: Vec<String> = (0..n)
                .filter(|&i| in_degree[i] > 0)
                .map(|i| self.index.resolve(i as ActivityIdx).to_string())
                .collect();
            activity_ids.sort();
            log_checks!(
                verbosity,
                unordered = activity_ids.len(),
                "cycle detected, rejecting scope"
            );
            return Err(CpmError::CycleDetected { activity_ids });
        }

        log_debug!(verbosity, activities = n, "topological order computed");
        Ok(order)
    }

    /// Weakly connected network of each activity.
    ///
    /// Returns the network id per activity index and the number of networks.
    /// Network ids are numbered by the first activity (in input order) that
    /// belongs to them.
    pub fn networks(&self) -> (Vec<usize>, usize) {
        let n = self.len();
        let mut parent: Vec<usize> = (0..n).collect();

        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }

        for (from, edges) in self.successors.iter().enumerate() {
            for edge in edges {
                let a = find(&mut parent, from);
                let b = find(&mut parent, edge.node as usize);
                if a != b {
                    parent[a.max(b)] = a.min(b);
                }
            }
        }

        let mut root_to_network: Vec<Option<usize>> = vec![None; n];
        let mut membership = Vec::with_capacity(n);
        let mut count = 0;
        for idx in 0..n {
            let root = find(&mut parent, idx);
            let network = *root_to_network[root].get_or_insert_with(|| {
                count += 1;
                count - 1
            });
            membership.push(network);
        }

        (membership, count)
    }

    /// Duration of the activity at `idx`.
    #[inline]
    pub fn duration(&self, idx: ActivityIdx) -> i64 {
        self.durations[idx as usize]
    }

    /// Incoming edges: activities that must finish before `idx` starts.
    #[inline]
    pub fn predecessors(&self, idx: ActivityIdx) -> &[Edge] {
        &self.predecessors[idx as usize]
    }

    /// Outgoing edges: activities waiting on `idx`.
    #[inline]
    pub fn successors(&self, idx: ActivityIdx) -> &[Edge] {
        &self.successors[idx as usize]
    }

    /// Caller-supplied id of the activity at `idx`.
    #[inline]
    pub fn activity_id(&self, idx: ActivityIdx) -> &str {
        self.index.resolve(idx)
    }

    /// Index of an activity id, if it belongs to the scope.
    pub fn index_of(&self, id: &str) -> Option<ActivityIdx> {
        self.index.get(id)
    }

    /// Number of activities in the scope.
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// Check if the scope has no activities.
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}

fn resolve_endpoint(
    index: &ActivityIndex,
    dep: &Dependency,
    activity_id: &str,
) -> Result<ActivityIdx, CpmError> {
    index
        .get(activity_id)
        .ok_or_else(|| CpmError::DanglingReference {
            dependency_id: dep.id.clone(),
            activity_id: activity_id.to_string(),
        })
}
