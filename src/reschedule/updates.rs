//! Reschedule payloads and the update capability.
//!
//! A commit cycle turns the pending edits into at most two batches: one for
//! the work-order endpoint and one for the operation endpoint. Routing uses
//! the [`TaskKey`] variant chosen at projection time.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::ScheduleResult;
use crate::models::{lenient_timestamp, TaskKey};

/// Proposed planned window for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEdit {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl PendingEdit {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }
}

/// New planned window for a work order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderDateUpdate {
    pub work_order_id: i64,
    pub planned_start_date: NaiveDateTime,
    pub planned_end_date: NaiveDateTime,
}

/// New planned window for an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDateUpdate {
    pub operation_id: i64,
    pub planned_start_date: NaiveDateTime,
    pub planned_end_date: NaiveDateTime,
}

/// The two batches of one commit cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateBatches {
    pub work_orders: Vec<WorkOrderDateUpdate>,
    pub operations: Vec<OperationDateUpdate>,
}

impl UpdateBatches {
    /// Whether there is nothing to send.
    pub fn is_empty(&self) -> bool {
        self.work_orders.is_empty() && self.operations.is_empty()
    }
}

/// Splits pending edits into work-order and operation batches.
///
/// Batches follow key order, so the same edits always produce the same
/// payloads.
pub fn partition_edits<'a, I>(edits: I) -> UpdateBatches
where
    I: IntoIterator<Item = (&'a TaskKey, &'a PendingEdit)>,
{
    let mut batches = UpdateBatches::default();
    for (key, edit) in edits {
        match *key {
            TaskKey::WorkOrder { work_order_id } => batches.work_orders.push(WorkOrderDateUpdate {
                work_order_id,
                planned_start_date: edit.start,
                planned_end_date: edit.end,
            }),
            TaskKey::Operation { operation_id } => batches.operations.push(OperationDateUpdate {
                operation_id,
                planned_start_date: edit.start,
                planned_end_date: edit.end,
            }),
        }
    }
    batches
}

/// Backend capability that persists rescheduled dates.
///
/// Implementations own transport, authentication and timeouts. A rejected
/// batch is reported as an error; the coordinator keeps the edits.
#[async_trait]
pub trait ScheduleUpdater: Send + Sync {
    /// Persists new planned windows for work orders.
    async fn update_work_order_dates(&self, updates: Vec<WorkOrderDateUpdate>)
        -> ScheduleResult<()>;

    /// Persists new planned windows for operations.
    async fn update_operation_dates(&self, updates: Vec<OperationDateUpdate>)
        -> ScheduleResult<()>;
}

#[async_trait]
impl<T: ScheduleUpdater + ?Sized> ScheduleUpdater for Arc<T> {
    async fn update_work_order_dates(
        &self,
        updates: Vec<WorkOrderDateUpdate>,
    ) -> ScheduleResult<()> {
        (**self).update_work_order_dates(updates).await
    }

    async fn update_operation_dates(
        &self,
        updates: Vec<OperationDateUpdate>,
    ) -> ScheduleResult<()> {
        (**self).update_operation_dates(updates).await
    }
}

/// A drag or resize reported by the chart renderer.
///
/// `id` is the renderer-facing task id (`7` or `op-101`); either endpoint
/// may be missing when the widget emits a partial event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeEvent {
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub start: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub end: Option<NaiveDateTime>,
}

fn id_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

/// Edits grouped by key, the unit a commit cycle snapshots.
pub type EditMap = BTreeMap<TaskKey, PendingEdit>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_partition_routes_by_key() {
        let mut edits = EditMap::new();
        edits.insert(TaskKey::operation(101), PendingEdit::new(at(2, 8), at(3, 17)));
        edits.insert(TaskKey::work_order(7), PendingEdit::new(at(4, 8), at(5, 17)));
        edits.insert(TaskKey::work_order(3), PendingEdit::new(at(6, 8), at(6, 17)));

        let batches = partition_edits(&edits);

        assert_eq!(
            batches.work_orders,
            vec![
                WorkOrderDateUpdate {
                    work_order_id: 3,
                    planned_start_date: at(6, 8),
                    planned_end_date: at(6, 17),
                },
                WorkOrderDateUpdate {
                    work_order_id: 7,
                    planned_start_date: at(4, 8),
                    planned_end_date: at(5, 17),
                },
            ]
        );
        assert_eq!(
            batches.operations,
            vec![OperationDateUpdate {
                operation_id: 101,
                planned_start_date: at(2, 8),
                planned_end_date: at(3, 17),
            }]
        );
    }

    #[test]
    fn test_partition_empty() {
        assert!(partition_edits(&EditMap::new()).is_empty());
    }

    #[test]
    fn test_payload_wire_shape() {
        let update = OperationDateUpdate {
            operation_id: 101,
            planned_start_date: at(2, 8),
            planned_end_date: at(3, 17),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "operation_id": 101,
                "planned_start_date": "2026-03-02T08:00:00",
                "planned_end_date": "2026-03-03T17:00:00",
            })
        );
    }

    #[test]
    fn test_resize_event_accepts_numeric_and_text_ids() {
        let numeric: ResizeEvent = serde_json::from_str(
            r#"{"id": 7, "start": "2026-03-02T08:00:00", "end": "2026-03-03T17:00:00"}"#,
        )
        .unwrap();
        assert_eq!(numeric.id, "7");
        assert_eq!(numeric.start, Some(at(2, 8)));

        let partial: ResizeEvent = serde_json::from_str(r#"{"id": "op-101", "start": null}"#).unwrap();
        assert_eq!(partial.id, "op-101");
        assert_eq!(partial.start, None);
        assert_eq!(partial.end, None);
    }
}
