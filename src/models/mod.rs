//! Board domain models.
//!
//! Input records as the production backend sends them, and the uniform
//! task model the chart renders.
//!
//! # Domain Mappings
//!
//! | u-gantt | Backend | Chart |
//! |---------|---------|-------|
//! | WorkOrderRecord | Work order | Bar (work-order level) |
//! | OperationRecord | Routed operation | Bar (operation level) |
//! | ScheduleTask | — | Bar |
//! | TaskKey | Update endpoint | Bar id |

mod calendar;
mod resource;
mod task;
mod work_order;

pub use calendar::{duration_days, Granularity, ViewWindow, WorkingWindow};
pub use resource::ResourceKind;
pub use task::{ScheduleTask, TaskKey, TaskLevel, OPERATION_ID_PREFIX};
pub use work_order::{OperationRecord, WorkOrderRecord};

pub(crate) use work_order::lenient_timestamp;
