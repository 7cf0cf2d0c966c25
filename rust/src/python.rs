//! Python bindings (feature `python`).
//!
//! Thin wrapper classes mirroring the Rust models; all computation goes
//! through [`crate::calculate_schedule`].

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDate;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::config::{CpmConfig, FinishScope};
use crate::models::{Activity, ActivityTiming, Dependency, DependencyType};
use crate::schedule::calculate_schedule;

/// A schedule activity.
#[pyclass(name = "Activity")]
#[derive(Clone, Debug)]
pub struct PyActivity {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub duration: i64,
    #[pyo3(get, set)]
    pub planned_start: Option<NaiveDate>,
    #[pyo3(get, set)]
    pub planned_finish: Option<NaiveDate>,
    #[pyo3(get, set)]
    pub actual_start: Option<NaiveDate>,
    #[pyo3(get, set)]
    pub actual_finish: Option<NaiveDate>,
}

#[pymethods]
impl PyActivity {
    #[new]
    #[pyo3(signature = (
        id,
        duration,
        planned_start=None,
        planned_finish=None,
        actual_start=None,
        actual_finish=None
    ))]
    fn new(
        id: String,
        duration: i64,
        planned_start: Option<NaiveDate>,
        planned_finish: Option<NaiveDate>,
        actual_start: Option<NaiveDate>,
        actual_finish: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            duration,
            planned_start,
            planned_finish,
            actual_start,
            actual_finish,
        }
    }

    fn __repr__(&self) -> String {
        format!("Activity(id={:?}, duration={})", self.id, self.duration)
    }
}

impl From<Activity> for PyActivity {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id,
            duration: activity.duration,
            planned_start: activity.planned_start,
            planned_finish: activity.planned_finish,
            actual_start: activity.actual_start,
            actual_finish: activity.actual_finish,
        }
    }
}

impl From<&PyActivity> for Activity {
    fn from(py: &PyActivity) -> Self {
        let mut activity = Activity::new(py.id.clone(), py.duration);
        activity.planned_start = py.planned_start;
        activity.planned_finish = py.planned_finish;
        activity.actual_start = py.actual_start;
        activity.actual_finish = py.actual_finish;
        activity
    }
}

/// A precedence dependency. `dependency_type` is the tag ("FS", "SS", ...).
#[pyclass(name = "Dependency")]
#[derive(Clone, Debug)]
pub struct PyDependency {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub from_activity_id: String,
    #[pyo3(get, set)]
    pub to_activity_id: String,
    #[pyo3(get, set)]
    pub dependency_type: String,
    #[pyo3(get, set)]
    pub lag: i64,
}

#[pymethods]
impl PyDependency {
    #[new]
    #[pyo3(signature = (id, from_activity_id, to_activity_id, dependency_type="FS".to_string(), lag=0))]
    fn new(
        id: String,
        from_activity_id: String,
        to_activity_id: String,
        dependency_type: String,
        lag: i64,
    ) -> Self {
        Self {
            id,
            from_activity_id,
            to_activity_id,
            dependency_type,
            lag,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Dependency(id={:?}, {:?} -> {:?}, type={:?})",
            self.id, self.from_activity_id, self.to_activity_id, self.dependency_type
        )
    }
}

impl From<&PyDependency> for Dependency {
    fn from(py: &PyDependency) -> Self {
        Dependency::new(
            py.id.clone(),
            py.from_activity_id.clone(),
            py.to_activity_id.clone(),
        )
        .with_kind(DependencyType::from_tag(&py.dependency_type, py.lag))
    }
}

/// Computed metrics for one activity.
#[pyclass(name = "ActivityTiming")]
#[derive(Clone, Debug)]
pub struct PyActivityTiming {
    #[pyo3(get)]
    pub earliest_start: i64,
    #[pyo3(get)]
    pub earliest_finish: i64,
    #[pyo3(get)]
    pub latest_start: i64,
    #[pyo3(get)]
    pub latest_finish: i64,
    #[pyo3(get)]
    pub float: i64,
    #[pyo3(get)]
    pub is_critical: bool,
}

#[pymethods]
impl PyActivityTiming {
    fn __repr__(&self) -> String {
        format!(
            "ActivityTiming(es={}, ef={}, ls={}, lf={}, float={}, critical={})",
            self.earliest_start,
            self.earliest_finish,
            self.latest_start,
            self.latest_finish,
            self.float,
            self.is_critical
        )
    }
}

impl From<ActivityTiming> for PyActivityTiming {
    fn from(t: ActivityTiming) -> Self {
        Self {
            earliest_start: t.earliest_start,
            earliest_finish: t.earliest_finish,
            latest_start: t.latest_start,
            latest_finish: t.latest_finish,
            float: t.float,
            is_critical: t.is_critical,
        }
    }
}

/// Engine configuration.
#[pyclass(name = "CpmConfig")]
#[derive(Clone, Debug, Default)]
pub struct PyCpmConfig {
    /// Bound each connected network by its own finish instead of one shared finish
    #[pyo3(get, set)]
    pub per_network: bool,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug
    #[pyo3(get, set)]
    pub verbosity: u8,
}

#[pymethods]
impl PyCpmConfig {
    #[new]
    #[pyo3(signature = (per_network=false, verbosity=0))]
    fn new(per_network: bool, verbosity: u8) -> Self {
        Self {
            per_network,
            verbosity,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "CpmConfig(per_network={}, verbosity={})",
            self.per_network, self.verbosity
        )
    }
}

impl From<&PyCpmConfig> for CpmConfig {
    fn from(py: &PyCpmConfig) -> Self {
        Self {
            finish_scope: if py.per_network {
                FinishScope::PerNetwork
            } else {
                FinishScope::Shared
            },
            verbosity: py.verbosity,
        }
    }
}

/// Recalculate CPM metrics for one scheduling scope.
///
/// # Returns
/// * Dict mapping activity id to ActivityTiming
///
/// # Raises
/// * ValueError on negative duration, duplicate id, dangling reference, cycle,
///   or offsets that overflow
#[pyfunction]
#[pyo3(signature = (activities, dependencies, config=None))]
fn recalculate(
    activities: Vec<PyActivity>,
    dependencies: Vec<PyDependency>,
    config: Option<PyCpmConfig>,
) -> PyResult<HashMap<String, PyActivityTiming>> {
    let activities: Vec<Activity> = activities.iter().map(Activity::from).collect();
    let dependencies: Vec<Dependency> = dependencies.iter().map(Dependency::from).collect();
    let config = config
        .as_ref()
        .map(CpmConfig::from)
        .unwrap_or_default();

    match calculate_schedule(&activities, &dependencies, &config) {
        Ok(result) => Ok(result
            .timings
            .into_iter()
            .map(|(id, timing)| (id, timing.into()))
            .collect()),
        Err(e) => Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    }
}

/// The cpm_engine Python module.
#[pymodule]
fn cpm_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyActivity>()?;
    m.add_class::<PyDependency>()?;
    m.add_class::<PyActivityTiming>()?;
    m.add_class::<PyCpmConfig>()?;

    m.add_function(wrap_pyfunction!(recalculate, m)?)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_dates_round_trip() {
        let day = |d| NaiveDate::from_ymd_opt(2025, 2, d).unwrap();
        let mut activity = Activity::new("a", 4).with_planned(day(3), day(7));
        activity.actual_start = Some(day(4));
        activity.actual_finish = Some(day(9));

        let py = PyActivity::from(activity.clone());
        assert_eq!(py.actual_start, Some(day(4)));
        assert_eq!(Activity::from(&py), activity);
    }
}
