//! Task projection.
//!
//! Maps a work order, or one of its operations, onto a [`ScheduleTask`].
//! Projection never fails: every optional field has a default.
//!
//! # Date resolution
//! 1. The entity's own planned start and end, when both are present.
//! 2. For operations, the parent work order's planned start and end.
//! 3. The configured working window on the projector's reference date.

use chrono::{Local, NaiveDate, NaiveDateTime};

use super::resources::{aggregate_resource_names, format_resource_line};
use crate::config::ProjectionConfig;
use crate::models::{
    duration_days, OperationRecord, ResourceKind, ScheduleTask, TaskKey, TaskLevel,
    WorkOrderRecord,
};

/// Projects backend records into chart tasks.
///
/// The reference date for the fallback window is fixed at construction so a
/// projection pass is deterministic.
#[derive(Debug, Clone)]
pub struct TaskProjector {
    config: ProjectionConfig,
    today: NaiveDate,
}

impl TaskProjector {
    /// Creates a projector anchored on the local current date.
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            config,
            today: Local::now().date_naive(),
        }
    }

    /// Overrides the reference date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// The reference date used for the fallback window.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Projects a work order to a single work-order-level task.
    ///
    /// The resource line aggregates assignments across the work order's
    /// operations when it has none of its own.
    pub fn project_work_order(&self, work_order: &WorkOrderRecord) -> ScheduleTask {
        let (start, end) = work_order
            .planned_window()
            .unwrap_or_else(|| self.fallback_window());

        let resources = format_resource_line(
            ResourceKind::ALL.map(|kind| (kind, aggregate_resource_names(work_order, kind))),
        );

        ScheduleTask {
            id: TaskKey::work_order(work_order.id),
            label: compose_label(work_order_title(work_order), resources),
            start,
            end,
            duration_days: duration_days(start, end),
            progress_percent: progress_percent(work_order),
            work_center_name: work_order.work_center_name.clone(),
            status: passthrough_status(work_order),
            priority: work_order.priority.clone(),
            level: TaskLevel::WorkOrder,
            parent_work_order_id: None,
        }
    }

    /// Projects one operation of `work_order`.
    ///
    /// Returns `None` when the operation has no identifier. Progress is the
    /// parent work order's; the resource line uses the operation's own
    /// assignments only.
    pub fn project_operation(
        &self,
        operation: &OperationRecord,
        work_order: &WorkOrderRecord,
    ) -> Option<ScheduleTask> {
        let operation_id = operation.id?;

        let (start, end) = operation
            .planned_window()
            .or_else(|| work_order.planned_window())
            .unwrap_or_else(|| self.fallback_window());

        let resources = format_resource_line(
            ResourceKind::ALL.map(|kind| (kind, operation.resource(kind).map(str::to_string))),
        );

        Some(ScheduleTask {
            id: TaskKey::operation(operation_id),
            label: compose_label(operation_title(operation_id, operation, work_order), resources),
            start,
            end,
            duration_days: duration_days(start, end),
            progress_percent: progress_percent(work_order),
            work_center_name: work_order.work_center_name.clone(),
            status: passthrough_status(work_order),
            priority: work_order.priority.clone(),
            level: TaskLevel::Operation,
            parent_work_order_id: Some(work_order.id),
        })
    }

    fn fallback_window(&self) -> (NaiveDateTime, NaiveDateTime) {
        self.config.working_window.on(self.today)
    }
}

impl Default for TaskProjector {
    fn default() -> Self {
        Self::new(ProjectionConfig::default())
    }
}

/// Completion percentage of a work order, in `0..=100`.
///
/// A missing, zero or negative quantity yields 0.
pub fn progress_percent(work_order: &WorkOrderRecord) -> u8 {
    let Some(quantity) = work_order.quantity.filter(|q| q.is_finite() && *q > 0.0) else {
        return 0;
    };
    let completed = work_order
        .completed_quantity
        .filter(|c| c.is_finite())
        .unwrap_or(0.0)
        .max(0.0);

    (completed / quantity * 100.0).min(100.0).round() as u8
}

fn passthrough_status(work_order: &WorkOrderRecord) -> Option<String> {
    Some(work_order.status.clone()).filter(|s| !s.is_empty())
}

fn work_order_title(work_order: &WorkOrderRecord) -> String {
    let product = non_blank(&work_order.product_name).or_else(|| non_blank(&work_order.name));
    join_title([non_blank(&work_order.code), product])
        .unwrap_or_else(|| format!("Work Order {}", work_order.id))
}

fn operation_title(
    operation_id: i64,
    operation: &OperationRecord,
    work_order: &WorkOrderRecord,
) -> String {
    let name = non_blank(&operation.operation_name)
        .map(str::to_string)
        .or_else(|| operation.sequence.map(|seq| format!("Operation {seq}")));
    join_title([non_blank(&work_order.code), name.as_deref()])
        .unwrap_or_else(|| format!("Operation {operation_id}"))
}

fn join_title<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    let parts: Vec<&str> = parts.into_iter().flatten().collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" - "))
    }
}

fn compose_label(title: String, resources: Option<String>) -> String {
    match resources {
        Some(line) => format!("{title}\n{line}"),
        None => title,
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
