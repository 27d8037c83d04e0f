//! Batch rescheduling of dragged tasks.
//!
//! The chart emits a resize event per gesture; the coordinator coalesces
//! bursts of them into one commit per quiet period and routes each edit to
//! the work-order or operation update endpoint.
//!
//! # Per-task lifecycle
//!
//! ```text
//! clean ──edit──► pending ──timer──► in-flight ──ok──► clean
//!                   ▲                    │
//!                   └──────failure───────┘
//! ```

mod coordinator;
mod updates;

pub use coordinator::{CommitEvent, CommitReport, RescheduleCoordinator};
pub use updates::{
    partition_edits, EditMap, OperationDateUpdate, PendingEdit, ResizeEvent, ScheduleUpdater,
    UpdateBatches, WorkOrderDateUpdate,
};
