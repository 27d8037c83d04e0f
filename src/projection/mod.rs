//! Projection of backend records into chart tasks.
//!
//! # Pipeline
//!
//! ```text
//! WorkOrderRecord[] ──► TaskProjector ──► build_task_list ──► ScheduleView
//!                         │                  (expand, sort)      (tasks + window)
//!                         └─ aggregate_resource_names
//! ```
//!
//! # Usage
//!
//! ```
//! use u_gantt::config::ProjectionConfig;
//! use u_gantt::models::{TaskLevel, WorkOrderRecord};
//! use u_gantt::projection::TaskProjector;
//!
//! let projector = TaskProjector::new(ProjectionConfig::default());
//! let orders = vec![WorkOrderRecord::new(7).with_code("WO-7")];
//! let tasks = projector.build_task_list(&orders, TaskLevel::WorkOrder);
//! assert_eq!(tasks[0].label, "WO-7");
//! ```

mod assembler;
mod projector;
mod resources;

pub use assembler::{sort_tasks, view_window, ScheduleView};
pub use projector::{progress_percent, TaskProjector};
pub use resources::{aggregate_resource_names, format_resource_line};
