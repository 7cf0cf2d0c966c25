//! CPM engine entry point: build, forward pass, backward pass.

use chrono::{Days, NaiveDate};
use rustc_hash::FxHashMap;

use crate::backward_pass::backward_pass;
use crate::config::{CpmConfig, FinishScope};
use crate::forward_pass::forward_pass;
use crate::graph::{CpmError, ScheduleGraph};
use crate::models::{Activity, ActivityTiming, DatedTiming, Dependency};
use crate::{log_changes, log_checks};

/// Output of one engine invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScheduleResult {
    /// Metrics per activity id.
    pub timings: FxHashMap<String, ActivityTiming>,
    /// Latest earliest finish across the whole invocation.
    pub project_finish: i64,
    /// Latest earliest finish of each weakly connected network.
    pub network_finishes: Vec<i64>,
    /// Network id of each activity, indexing `network_finishes`.
    pub networks: FxHashMap<String, usize>,
    /// Activity ids in the topological order used by both passes.
    pub order: Vec<String>,
}

impl ScheduleResult {
    /// Metrics for one activity.
    pub fn get(&self, activity_id: &str) -> Option<&ActivityTiming> {
        self.timings.get(activity_id)
    }

    /// Finish of the network containing `activity_id`.
    pub fn network_finish(&self, activity_id: &str) -> Option<i64> {
        self.networks
            .get(activity_id)
            .map(|&network| self.network_finishes[network])
    }

    /// Zero-float activity ids, in topological order.
    pub fn critical_activities(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|id| self.timings.get(id.as_str()).is_some_and(|t| t.is_critical))
            .map(String::as_str)
            .collect()
    }

    /// Number of scheduled activities.
    pub fn len(&self) -> usize {
        self.timings.len()
    }

    /// Check if the scope was empty.
    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }

    /// Project offsets onto calendar dates, counting every day from `anchor`.
    ///
    /// Returns `None` if a date falls outside the representable range.
    pub fn anchor_at(&self, anchor: NaiveDate) -> Option<FxHashMap<String, DatedTiming>> {
        let date = |offset: i64| anchor.checked_add_days(Days::new(u64::try_from(offset).ok()?));
        self.timings
            .iter()
            .map(|(id, t)| {
                Some((
                    id.clone(),
                    DatedTiming {
                        earliest_start: date(t.earliest_start)?,
                        earliest_finish: date(t.earliest_finish)?,
                        latest_start: date(t.latest_start)?,
                        latest_finish: date(t.latest_finish)?,
                        float: t.float,
                        is_critical: t.is_critical,
                    },
                ))
            })
            .collect()
    }
}

/// Run the critical path method over one scheduling scope.
///
/// Validation happens in full before any arithmetic: negative durations,
/// duplicate ids, dangling dependency endpoints and cycles (self-loops
/// included) each reject the whole invocation. A chain whose total duration
/// overflows `i64` is rejected by the forward pass, still with no output.
///
/// # Arguments
/// * `activities` - Activities of the scope, in any order
/// * `dependencies` - Precedence relations between them
/// * `config` - Finish scope and logging verbosity
///
/// # Returns
/// * `Ok(ScheduleResult)` with metrics for every activity
/// * `Err(CpmError)` describing the first structural problem found
pub fn calculate_schedule(
    activities: &[Activity],
    dependencies: &[Dependency],
    config: &CpmConfig,
) -> Result<ScheduleResult, CpmError> {
    let verbosity = config.verbosity;

    let graph = ScheduleGraph::build(activities, dependencies, verbosity)?;
    let order = graph.topological_order(verbosity)?;

    let forward = forward_pass(&graph, &order, verbosity)?;
    let project_finish = forward.project_finish();

    let (membership, network_count) = graph.networks();
    let network_finishes = forward.network_finishes(&membership, network_count);
    log_checks!(
        verbosity,
        networks = network_count,
        project_finish,
        "forward pass complete"
    );

    let finish_bounds: Vec<i64> = match config.finish_scope {
        FinishScope::Shared => vec![project_finish; graph.len()],
        FinishScope::PerNetwork => membership
            .iter()
            .map(|&network| network_finishes[network])
            .collect(),
    };

    let timings = backward_pass(&graph, &order, &forward, &finish_bounds, verbosity);

    let mut result = ScheduleResult {
        timings: FxHashMap::with_capacity_and_hasher(graph.len(), Default::default()),
        project_finish,
        network_finishes,
        networks: FxHashMap::with_capacity_and_hasher(graph.len(), Default::default()),
        order: Vec::with_capacity(graph.len()),
    };
    for &idx in &order {
        let id = graph.activity_id(idx);
        result.timings.insert(id.to_string(), timings[idx as usize]);
        result.networks.insert(id.to_string(), membership[idx as usize]);
        result.order.push(id.to_string());
    }

    log_changes!(
        verbosity,
        activities = result.len(),
        critical = result.critical_activities().len(),
        project_finish,
        "schedule recalculated"
    );

    Ok(result)
}

/// [`calculate_schedule`] with the default configuration.
pub fn recalculate(
    activities: &[Activity],
    dependencies: &[Dependency],
) -> Result<ScheduleResult, CpmError> {
    calculate_schedule(activities, dependencies, &CpmConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DependencyType;

    fn make_activities(specs: &[(&str, i64)]) -> Vec<Activity> {
        specs
            .iter()
            .map(|&(id, duration)| Activity::new(id, duration))
            .collect()
    }

    fn make_deps(edges: &[(&str, &str)]) -> Vec<Dependency> {
        edges
            .iter()
            .enumerate()
            .map(|(i, &(from, to))| Dependency::new(format!("d{}", i), from, to))
            .collect()
    }

    fn timing(es: i64, ef: i64, ls: i64, lf: i64) -> ActivityTiming {
        ActivityTiming {
            earliest_start: es,
            earliest_finish: ef,
            latest_start: ls,
            latest_finish: lf,
            float: ls - es,
            is_critical: ls == es,
        }
    }

    #[test]
    fn test_linear_chain() {
        let activities = make_activities(&[("a", 7), ("b", 7), ("c", 7)]);
        let deps = make_deps(&[("a", "b"), ("b", "c")]);
        let result = recalculate(&activities, &deps).unwrap();

        assert_eq!(result.project_finish, 21);
        assert_eq!(result.get("a"), Some(&timing(0, 7, 0, 7)));
        assert_eq!(result.get("b"), Some(&timing(7, 14, 7, 14)));
        assert_eq!(result.get("c"), Some(&timing(14, 21, 14, 21)));
        assert_eq!(result.critical_activities(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_diamond_unequal_branches() {
        let activities = make_activities(&[("a", 5), ("b", 3), ("c", 6), ("d", 2)]);
        let deps = make_deps(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
        let result = recalculate(&activities, &deps).unwrap();

        assert_eq!(result.project_finish, 13);
        assert_eq!(result.get("a"), Some(&timing(0, 5, 0, 5)));
        assert_eq!(result.get("b"), Some(&timing(5, 8, 8, 11)));
        assert_eq!(result.get("c"), Some(&timing(5, 11, 5, 11)));
        assert_eq!(result.get("d"), Some(&timing(11, 13, 11, 13)));

        assert_eq!(result.get("b").unwrap().float, 3);
        assert!(!result.get("b").unwrap().is_critical);
        assert_eq!(result.critical_activities(), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_cycle_produces_no_output() {
        let activities = make_activities(&[("a", 1), ("b", 1)]);
        let deps = make_deps(&[("a", "b"), ("b", "a")]);
        let err = recalculate(&activities, &deps).unwrap_err();
        assert_eq!(
            err,
            CpmError::CycleDetected {
                activity_ids: vec!["a".to_string(), "b".to_string()]
            }
        );
    }

    #[test]
    fn test_self_loop_rejected() {
        let activities = make_activities(&[("a", 1), ("b", 1)]);
        let deps = make_deps(&[("a", "b"), ("b", "b")]);
        assert!(matches!(
            recalculate(&activities, &deps),
            Err(CpmError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let activities = make_activities(&[("a", 1)]);
        let deps = vec![Dependency::new("dep-x", "missing", "a")];
        let err = recalculate(&activities, &deps).unwrap_err();
        assert_eq!(
            err,
            CpmError::DanglingReference {
                dependency_id: "dep-x".to_string(),
                activity_id: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_duration_rejected() {
        let activities = make_activities(&[("a", 3), ("b", -1)]);
        let deps = make_deps(&[("a", "b")]);
        assert!(matches!(
            recalculate(&activities, &deps),
            Err(CpmError::InvalidDuration { duration: -1, .. })
        ));
    }

    #[test]
    fn test_duration_overflow_rejected() {
        let half = i64::MAX / 2 + 1;
        let activities = make_activities(&[("a", half), ("b", half)]);
        let deps = make_deps(&[("a", "b")]);
        assert_eq!(
            recalculate(&activities, &deps),
            Err(CpmError::ScheduleOverflow {
                activity_id: "b".to_string()
            })
        );

        // The same durations in unrelated networks do not add up.
        let result = recalculate(&activities, &[]).unwrap();
        assert_eq!(result.project_finish, half);
    }

    #[test]
    fn test_zero_duration_milestone() {
        let result = recalculate(&make_activities(&[("m", 0)]), &[]).unwrap();
        assert_eq!(result.get("m"), Some(&timing(0, 0, 0, 0)));
        assert!(result.get("m").unwrap().is_critical);
    }

    #[test]
    fn test_empty_scope() {
        let result = recalculate(&[], &[]).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.project_finish, 0);
        assert!(result.network_finishes.is_empty());
    }

    #[test]
    fn test_disconnected_chains_share_finish() {
        let activities = make_activities(&[("a1", 2), ("a2", 3), ("b1", 10), ("b2", 10)]);
        let deps = make_deps(&[("a1", "a2"), ("b1", "b2")]);

        let shared = recalculate(&activities, &deps).unwrap();
        assert_eq!(shared.project_finish, 20);
        assert_eq!(shared.get("a2").unwrap().latest_finish, 20);
        assert_eq!(shared.get("a1").unwrap().float, 15);
        assert_eq!(shared.critical_activities(), vec!["b1", "b2"]);

        let per_network =
            calculate_schedule(&activities, &deps, &CpmConfig::per_network()).unwrap();
        assert_eq!(per_network.project_finish, 20);
        assert_eq!(per_network.network_finish("a1"), Some(5));
        assert_eq!(per_network.network_finish("b2"), Some(20));
        assert_eq!(per_network.get("a1"), Some(&timing(0, 2, 0, 2)));
        assert_eq!(per_network.get("a2"), Some(&timing(2, 5, 2, 5)));
        assert_eq!(per_network.get("b2"), shared.get("b2"));
    }

    #[test]
    fn test_per_network_matches_separate_invocations() {
        let activities = make_activities(&[("a1", 2), ("b1", 10), ("a2", 3), ("b2", 10)]);
        let deps = make_deps(&[("a1", "a2"), ("b1", "b2")]);
        let combined = calculate_schedule(&activities, &deps, &CpmConfig::per_network()).unwrap();

        let chain_a = recalculate(
            &make_activities(&[("a1", 2), ("a2", 3)]),
            &make_deps(&[("a1", "a2")]),
        )
        .unwrap();
        let chain_b = recalculate(
            &make_activities(&[("b1", 10), ("b2", 10)]),
            &make_deps(&[("b1", "b2")]),
        )
        .unwrap();

        assert_eq!(chain_a.project_finish, 5);
        assert_eq!(chain_b.project_finish, 20);
        for separate in [&chain_a, &chain_b] {
            for (id, t) in &separate.timings {
                assert_eq!(combined.get(id), Some(t));
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let activities = make_activities(&[("a", 5), ("b", 3), ("c", 6), ("d", 2), ("e", 0)]);
        let deps = make_deps(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
        let first = recalculate(&activities, &deps).unwrap();
        let second = recalculate(&activities, &deps).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_finish_to_start_tags_behave_as_finish_to_start() {
        let activities = make_activities(&[("a", 4), ("b", 2)]);
        let fs = make_deps(&[("a", "b")]);
        let tagged: Vec<Dependency> = ["SS", "FF", "SF", "??"]
            .iter()
            .map(|tag| Dependency::new("d0", "a", "b").with_kind(DependencyType::from_tag(tag, 3)))
            .collect();

        let expected = recalculate(&activities, &fs).unwrap();
        for dep in tagged {
            let result = recalculate(&activities, &[dep]).unwrap();
            assert_eq!(result.timings, expected.timings);
        }
    }

    #[test]
    fn test_anchor_at() {
        let activities = make_activities(&[("a", 5), ("b", 3), ("c", 6), ("d", 2)]);
        let deps = make_deps(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
        let result = recalculate(&activities, &deps).unwrap();

        let anchor = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let dated = result.anchor_at(anchor).unwrap();
        let b = &dated["b"];
        assert_eq!(b.earliest_start, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        assert_eq!(b.latest_finish, NaiveDate::from_ymd_opt(2025, 1, 12).unwrap());
        assert_eq!(b.float, 3);
        assert!(!b.is_critical);
    }

    #[test]
    fn test_verbose_run_matches_silent_run() {
        let activities = make_activities(&[("a", 1), ("b", 2)]);
        let deps = make_deps(&[("a", "b")]);
        let silent = recalculate(&activities, &deps).unwrap();
        let verbose =
            calculate_schedule(&activities, &deps, &CpmConfig::default().with_verbosity(3))
                .unwrap();
        assert_eq!(silent, verbose);
    }
}
