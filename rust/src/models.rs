//! Core data types for the CPM engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A schedule activity (graph node).
///
/// Only `id` and `duration` are read by the engine. Planned and actual dates
/// ride along untouched so callers can pass their records straight through.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    /// Duration in whole time units (days). Zero marks a milestone.
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_finish: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_finish: Option<NaiveDate>,
}

impl Activity {
    pub fn new(id: impl Into<String>, duration: i64) -> Self {
        Self {
            id: id.into(),
            duration,
            planned_start: None,
            planned_finish: None,
            actual_start: None,
            actual_finish: None,
        }
    }

    pub fn with_planned(mut self, start: NaiveDate, finish: NaiveDate) -> Self {
        self.planned_start = Some(start);
        self.planned_finish = Some(finish);
        self
    }

    pub fn is_milestone(&self) -> bool {
        self.duration == 0
    }
}

/// Start and finish offsets of an activity, early or late.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub start: i64,
    pub finish: i64,
}

/// Precedence relation between two activities.
///
/// Only finish-to-start semantics are evaluated today. The other variants and
/// the lag are kept so the arithmetic can grow per type without changing the
/// graph builder; until then every variant behaves as finish-to-start with no
/// lag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DependencyType {
    FinishToStart { lag: i64 },
    StartToStart { lag: i64 },
    FinishToFinish { lag: i64 },
    StartToFinish { lag: i64 },
    /// Unrecognized tag, kept verbatim.
    Other(String),
}

impl Default for DependencyType {
    fn default() -> Self {
        Self::FinishToStart { lag: 0 }
    }
}

impl DependencyType {
    /// Parse a dependency tag such as `"FS"` or `"finish-to-start"`.
    ///
    /// Never fails: unknown tags become [`DependencyType::Other`].
    pub fn from_tag(tag: &str, lag: i64) -> Self {
        let normalized = tag.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "fs" | "finish-to-start" => Self::FinishToStart { lag },
            "ss" | "start-to-start" => Self::StartToStart { lag },
            "ff" | "finish-to-finish" => Self::FinishToFinish { lag },
            "sf" | "start-to-finish" => Self::StartToFinish { lag },
            _ => Self::Other(tag.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::FinishToStart { .. } => "FS",
            Self::StartToStart { .. } => "SS",
            Self::FinishToFinish { .. } => "FF",
            Self::StartToFinish { .. } => "SF",
            Self::Other(tag) => tag,
        }
    }

    pub fn lag(&self) -> i64 {
        match self {
            Self::FinishToStart { lag }
            | Self::StartToStart { lag }
            | Self::FinishToFinish { lag }
            | Self::StartToFinish { lag } => *lag,
            Self::Other(_) => 0,
        }
    }

    /// True when the relation is evaluated exactly as declared.
    pub fn is_native(&self) -> bool {
        matches!(self, Self::FinishToStart { lag: 0 })
    }

    /// Earliest start this relation allows the successor, given the
    /// predecessor's early window.
    pub fn successor_earliest_start(&self, predecessor: Window) -> i64 {
        predecessor.finish
    }

    /// Latest finish this relation allows the predecessor, given the
    /// successor's late window.
    pub fn predecessor_latest_finish(&self, successor: Window) -> i64 {
        successor.start
    }
}

/// A precedence dependency (graph edge).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DependencyRecord", into = "DependencyRecord")]
pub struct Dependency {
    pub id: String,
    pub from_activity_id: String,
    pub to_activity_id: String,
    pub kind: DependencyType,
}

impl Dependency {
    /// Finish-to-start dependency `from -> to`.
    pub fn new(
        id: impl Into<String>,
        from_activity_id: impl Into<String>,
        to_activity_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from_activity_id: from_activity_id.into(),
            to_activity_id: to_activity_id.into(),
            kind: DependencyType::default(),
        }
    }

    pub fn with_kind(mut self, kind: DependencyType) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.from_activity_id == self.to_activity_id
    }
}

/// Wire shape of a dependency: the type travels as its tag string.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DependencyRecord {
    id: String,
    from_activity_id: String,
    to_activity_id: String,
    #[serde(rename = "type", default = "default_tag")]
    tag: String,
    #[serde(default)]
    lag: i64,
}

fn default_tag() -> String {
    "FS".to_string()
}

impl From<DependencyRecord> for Dependency {
    fn from(record: DependencyRecord) -> Self {
        Self {
            kind: DependencyType::from_tag(&record.tag, record.lag),
            id: record.id,
            from_activity_id: record.from_activity_id,
            to_activity_id: record.to_activity_id,
        }
    }
}

impl From<Dependency> for DependencyRecord {
    fn from(dep: Dependency) -> Self {
        Self {
            tag: dep.kind.tag().to_string(),
            lag: dep.kind.lag(),
            id: dep.id,
            from_activity_id: dep.from_activity_id,
            to_activity_id: dep.to_activity_id,
        }
    }
}

/// Computed CPM metrics for one activity, as offsets from time zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTiming {
    pub earliest_start: i64,
    pub earliest_finish: i64,
    pub latest_start: i64,
    pub latest_finish: i64,
    /// Float (slack) = latest_start - earliest_start.
    pub float: i64,
    pub is_critical: bool,
}

impl ActivityTiming {
    pub fn early(&self) -> Window {
        Window {
            start: self.earliest_start,
            finish: self.earliest_finish,
        }
    }

    pub fn late(&self) -> Window {
        Window {
            start: self.latest_start,
            finish: self.latest_finish,
        }
    }
}

/// [`ActivityTiming`] projected onto calendar days from an anchor date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatedTiming {
    pub earliest_start: NaiveDate,
    pub earliest_finish: NaiveDate,
    pub latest_start: NaiveDate,
    pub latest_finish: NaiveDate,
    pub float: i64,
    pub is_critical: bool,
}
