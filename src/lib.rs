//! Production-scheduling Gantt core for the U-Engine ecosystem.
//!
//! Turns work orders and their routed operations into chart tasks, and turns
//! an operator's drag/resize gestures back into batched planned-date updates.
//! The chart widget itself, and the scheduling algorithm that would compute
//! feasible dates, live elsewhere: this crate records operator decisions.
//!
//! # Modules
//!
//! - **`models`**: Input records (`WorkOrderRecord`, `OperationRecord`) and the
//!   chart model (`ScheduleTask`, `TaskKey`, `ViewWindow`)
//! - **`projection`**: Record → task projection, resource aggregation, task
//!   list assembly and display order
//! - **`reschedule`**: Debounced batch-commit coordinator and update payloads
//! - **`config`**: Board settings with defaults
//! - **`validation`**: Diagnostic checks on input records
//!
//! # Data flow
//!
//! ```text
//! backend records ─► projection ─► renderer ─► reschedule ─► ScheduleUpdater
//!        ▲                                          │
//!        └──────────── reload on CommitEvent ◄──────┘
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod projection;
pub mod reschedule;
pub mod validation;

pub use error::{ScheduleError, ScheduleResult};
