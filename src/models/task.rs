//! Schedulable task model.
//!
//! A [`ScheduleTask`] is one bar on the chart. Tasks are rebuilt from the
//! backend records on every projection pass and never mutated afterwards;
//! an operator's drag produces a pending edit in the coordinator instead.
//!
//! # Identity
//! Each task carries a [`TaskKey`] decided at projection time. The key is
//! what later routes a committed edit to the work-order or the operation
//! endpoint, so commit routing never has to inspect strings. The renderer
//! still sees the familiar ids: a bare number for work orders and
//! `op-{id}` for operations.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ScheduleError;

/// Prefix marking an operation-level task id on the renderer side.
pub const OPERATION_ID_PREFIX: &str = "op-";

/// Identity of a task, tagged by the entity it edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskKey {
    /// The task edits a work order's planned dates.
    WorkOrder { work_order_id: i64 },
    /// The task edits a single operation's planned dates.
    Operation { operation_id: i64 },
}

impl TaskKey {
    /// Key of a work-order-level task.
    pub fn work_order(work_order_id: i64) -> Self {
        Self::WorkOrder { work_order_id }
    }

    /// Key of an operation-level task.
    pub fn operation(operation_id: i64) -> Self {
        Self::Operation { operation_id }
    }

    /// Whether this key targets an operation.
    pub fn is_operation(&self) -> bool {
        matches!(self, Self::Operation { .. })
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WorkOrder { work_order_id } => write!(f, "{work_order_id}"),
            Self::Operation { operation_id } => {
                write!(f, "{OPERATION_ID_PREFIX}{operation_id}")
            }
        }
    }
}

impl FromStr for TaskKey {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = match s.strip_prefix(OPERATION_ID_PREFIX) {
            Some(rest) => rest.parse().map(TaskKey::operation),
            None => s.parse().map(TaskKey::work_order),
        };
        parsed.map_err(|_| ScheduleError::invalid_task_id(s))
    }
}

impl Serialize for TaskKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::WorkOrder { work_order_id } => serializer.serialize_i64(*work_order_id),
            Self::Operation { .. } => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for TaskKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawKey {
            Number(i64),
            Text(String),
        }

        match RawKey::deserialize(deserializer)? {
            RawKey::Number(id) => Ok(TaskKey::work_order(id)),
            RawKey::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Granularity at which work orders are laid out on the chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskLevel {
    /// One bar per work order.
    #[default]
    WorkOrder,
    /// One bar per identified operation, falling back to the work order.
    Operation,
}

/// A bar on the production-scheduling chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTask {
    /// Task identity; routes committed edits.
    pub id: TaskKey,
    /// Display label: a primary line, then an optional resource line.
    pub label: String,
    /// Bar start.
    pub start: NaiveDateTime,
    /// Bar end. Not guaranteed to be after `start`.
    pub end: NaiveDateTime,
    /// Whole days covered, at least 1.
    pub duration_days: i64,
    /// Completion percentage in `0..=100`.
    pub progress_percent: u8,
    pub work_center_name: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    /// Level the task was projected at.
    pub level: TaskLevel,
    /// Owning work order, set for operation-level tasks only.
    pub parent_work_order_id: Option<i64>,
}

impl ScheduleTask {
    /// The renderer-facing id string (`7`, `op-101`).
    pub fn display_id(&self) -> String {
        self.id.to_string()
    }

    /// Work center used for grouping; empty when unassigned.
    pub fn group_name(&self) -> &str {
        self.work_center_name.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_key_display() {
        assert_eq!(TaskKey::work_order(7).to_string(), "7");
        assert_eq!(TaskKey::operation(101).to_string(), "op-101");
    }

    #[test]
    fn test_task_key_parse() {
        assert_eq!("7".parse::<TaskKey>().unwrap(), TaskKey::work_order(7));
        assert_eq!(
            "op-101".parse::<TaskKey>().unwrap(),
            TaskKey::operation(101)
        );
        assert_eq!(" 42 ".parse::<TaskKey>().unwrap(), TaskKey::work_order(42));
    }

    #[test]
    fn test_task_key_parse_rejects_garbage() {
        assert_eq!(
            "op-abc".parse::<TaskKey>(),
            Err(ScheduleError::invalid_task_id("op-abc"))
        );
        assert!("wo-7".parse::<TaskKey>().is_err());
        assert!("".parse::<TaskKey>().is_err());
    }

    #[test]
    fn test_task_key_serde_shapes() {
        assert_eq!(serde_json::to_string(&TaskKey::work_order(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&TaskKey::operation(101)).unwrap(),
            "\"op-101\""
        );

        let from_number: TaskKey = serde_json::from_str("7").unwrap();
        assert_eq!(from_number, TaskKey::work_order(7));
        let from_text: TaskKey = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(from_text, TaskKey::work_order(7));
        let op: TaskKey = serde_json::from_str("\"op-101\"").unwrap();
        assert!(op.is_operation());
        assert!(serde_json::from_str::<TaskKey>("\"op-\"").is_err());
    }

    #[test]
    fn test_task_level_serde() {
        assert_eq!(
            serde_json::to_string(&TaskLevel::WorkOrder).unwrap(),
            "\"work_order\""
        );
        let level: TaskLevel = serde_json::from_str("\"operation\"").unwrap();
        assert_eq!(level, TaskLevel::Operation);
    }
}
