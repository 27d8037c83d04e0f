//! Task list assembly and display order.
//!
//! Expands work orders into a flat task list at the requested level and
//! sorts it by work center, then by task id. Tasks without a work center
//! come first. The order depends only on the input, so re-rendering after
//! an edit keeps every bar where the operator left it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TaskProjector;
use crate::models::{Granularity, ScheduleTask, TaskLevel, ViewWindow, WorkOrderRecord};

/// Everything the chart renderer needs for one render cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleView {
    pub tasks: Vec<ScheduleTask>,
    /// Suggested visible range.
    pub window: ViewWindow,
    pub granularity: Granularity,
    pub level: TaskLevel,
}

impl TaskProjector {
    /// Projects `work_orders` into a sorted task list.
    ///
    /// At [`TaskLevel::Operation`], a work order without identified
    /// operations is projected as a single work-order task so it stays
    /// visible.
    pub fn build_task_list(
        &self,
        work_orders: &[WorkOrderRecord],
        level: TaskLevel,
    ) -> Vec<ScheduleTask> {
        let mut tasks = Vec::with_capacity(work_orders.len());

        for work_order in work_orders {
            match level {
                TaskLevel::WorkOrder => tasks.push(self.project_work_order(work_order)),
                TaskLevel::Operation => {
                    let before = tasks.len();
                    tasks.extend(
                        work_order
                            .schedulable_operations()
                            .filter_map(|op| self.project_operation(op, work_order)),
                    );

                    let skipped = work_order.operations.len() - (tasks.len() - before);
                    if skipped > 0 {
                        debug!(
                            work_order_id = work_order.id,
                            skipped, "skipping operations without id"
                        );
                    }
                    if tasks.len() == before {
                        tasks.push(self.project_work_order(work_order));
                    }
                }
            }
        }

        sort_tasks(&mut tasks);
        tasks
    }

    /// Builds the task list plus its view window.
    pub fn build_view(
        &self,
        work_orders: &[WorkOrderRecord],
        level: TaskLevel,
        granularity: Granularity,
        now: NaiveDateTime,
    ) -> ScheduleView {
        let tasks = self.build_task_list(work_orders, level);
        let window = view_window(&tasks, granularity, now);
        ScheduleView {
            tasks,
            window,
            granularity,
            level,
        }
    }
}

/// Sorts tasks by `(work center, id)` using a case-folded comparison with
/// an exact-text tie-break. Unassigned work centers sort first.
pub fn sort_tasks(tasks: &mut [ScheduleTask]) {
    tasks.sort_by_cached_key(|task| {
        let group = task.group_name().to_string();
        let id = task.display_id();
        (group.to_lowercase(), group, id.to_lowercase(), id)
    });
}

/// Visible range covering every task, padded by the granularity buffer.
///
/// An empty list yields the default window around `now`.
pub fn view_window(
    tasks: &[ScheduleTask],
    granularity: Granularity,
    now: NaiveDateTime,
) -> ViewWindow {
    let earliest = tasks.iter().map(|t| t.start.min(t.end)).min();
    let latest = tasks.iter().map(|t| t.start.max(t.end)).max();

    match earliest.zip(latest) {
        Some((earliest, latest)) => ViewWindow::padded(earliest, latest, granularity.buffer()),
        None => ViewWindow::around(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectionConfig;
    use crate::models::{OperationRecord, ResourceKind, TaskKey};
    use chrono::{Duration, NaiveDate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn projector() -> TaskProjector {
        TaskProjector::new(ProjectionConfig::default()).with_today(today())
    }

    fn ids(tasks: &[ScheduleTask]) -> Vec<String> {
        tasks.iter().map(ScheduleTask::display_id).collect()
    }

    #[test]
    fn test_work_order_level_one_task_each() {
        let orders = vec![
            WorkOrderRecord::new(1).with_operation(OperationRecord::new(10)),
            WorkOrderRecord::new(2),
        ];
        let tasks = projector().build_task_list(&orders, TaskLevel::WorkOrder);
        assert_eq!(ids(&tasks), vec!["1", "2"]);
        assert!(tasks.iter().all(|t| t.level == TaskLevel::WorkOrder));
    }

    #[test]
    fn test_operation_level_expands_and_falls_back() {
        let orders = vec![
            WorkOrderRecord::new(1)
                .with_operation(OperationRecord::new(11))
                .with_operation(OperationRecord::unidentified())
                .with_operation(OperationRecord::new(12)),
            WorkOrderRecord::new(2).with_operation(OperationRecord::unidentified()),
            WorkOrderRecord::new(3),
        ];
        let tasks = projector().build_task_list(&orders, TaskLevel::Operation);

        assert_eq!(ids(&tasks), vec!["2", "3", "op-11", "op-12"]);
        assert_eq!(tasks[0].level, TaskLevel::WorkOrder);
        assert_eq!(tasks[2].parent_work_order_id, Some(1));
    }

    #[test]
    fn test_operation_level_scenario() {
        let orders = vec![WorkOrderRecord::new(7)
            .with_quantities(10.0, 3.0)
            .with_operation(
                OperationRecord::new(101).with_resource(ResourceKind::Equipment, "CNC-1"),
            )];

        let tasks = projector().build_task_list(&orders, TaskLevel::Operation);
        assert_eq!(tasks.len(), 1);

        let task = &tasks[0];
        assert_eq!(task.id, TaskKey::operation(101));
        assert_eq!(task.display_id(), "op-101");
        assert_eq!(task.progress_percent, 30);
        assert!(task.label.contains("Equipment: CNC-1"));
        assert_eq!(task.start, at(2, 8));
        assert_eq!(task.end, at(2, 17));
    }

    #[test]
    fn test_unassigned_work_center_sorts_first() {
        let orders = vec![
            WorkOrderRecord::new(1).with_work_center("A"),
            WorkOrderRecord::new(2).with_work_center(""),
        ];
        let tasks = projector().build_task_list(&orders, TaskLevel::WorkOrder);
        assert_eq!(ids(&tasks), vec!["2", "1"]);

        let orders = vec![
            WorkOrderRecord::new(1).with_work_center("A"),
            WorkOrderRecord::new(2),
        ];
        let tasks = projector().build_task_list(&orders, TaskLevel::WorkOrder);
        assert_eq!(ids(&tasks), vec!["2", "1"]);
    }

    #[test]
    fn test_sort_by_work_center_then_id_text() {
        let orders = vec![
            WorkOrderRecord::new(7).with_work_center("b-line"),
            WorkOrderRecord::new(10).with_work_center("B-line"),
            WorkOrderRecord::new(9).with_work_center("a-line"),
            WorkOrderRecord::new(8).with_work_center("b-line"),
        ];
        let tasks = projector().build_task_list(&orders, TaskLevel::WorkOrder);

        // Case-folded groups tie, so the exact text breaks them; ids compare as text.
        assert_eq!(ids(&tasks), vec!["9", "10", "7", "8"]);
    }

    #[test]
    fn test_build_is_idempotent() {
        let orders = vec![
            WorkOrderRecord::new(3)
                .with_work_center("Z")
                .with_operation(OperationRecord::new(31).with_resource(ResourceKind::Tool, "T"))
                .with_operation(OperationRecord::new(30)),
            WorkOrderRecord::new(1).with_work_center("Y"),
            WorkOrderRecord::new(2).with_code("WO-2"),
        ];
        let p = projector();

        for level in [TaskLevel::WorkOrder, TaskLevel::Operation] {
            let first = p.build_task_list(&orders, level);
            let second = p.build_task_list(&orders, level);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_view_window_pads_by_granularity() {
        let orders = vec![
            WorkOrderRecord::new(1).with_planned_dates(at(4, 8), at(6, 17)),
            WorkOrderRecord::new(2).with_planned_dates(at(10, 8), at(8, 8)),
        ];
        let view = projector().build_view(&orders, TaskLevel::WorkOrder, Granularity::Week, at(1, 0));

        assert_eq!(view.window.start, at(4, 8) - Duration::days(7));
        assert_eq!(view.window.end, at(10, 8) + Duration::days(7));
        assert_eq!(view.tasks.len(), 2);
        assert_eq!(view.granularity, Granularity::Week);
    }

    #[test]
    fn test_view_window_survives_far_future_dates() {
        let far = NaiveDateTime::MAX - Duration::days(3);
        let orders = vec![
            WorkOrderRecord::new(1).with_planned_dates(far, far + Duration::days(1)),
            WorkOrderRecord::new(2).with_planned_dates(at(4, 8), at(6, 17)),
        ];
        let view = projector().build_view(&orders, TaskLevel::WorkOrder, Granularity::Month, at(1, 0));

        assert_eq!(view.window.start, at(4, 8) - Duration::days(30));
        assert_eq!(view.window.end, NaiveDateTime::MAX);
        assert_eq!(view.tasks.len(), 2);
    }

    #[test]
    fn test_view_window_empty_board() {
        let view = projector().build_view(&[], TaskLevel::Operation, Granularity::Day, at(10, 12));
        assert!(view.tasks.is_empty());
        assert_eq!(view.window, ViewWindow::around(at(10, 12)));
    }
}
