//! Work order and operation records.
//!
//! These are the read-only inputs of the board, deserialized straight from
//! the production backend's JSON. Every field except the work order id is
//! optional; the projector supplies defaults, so partially filled records
//! (draft orders, operations without routing dates) still deserialize.
//!
//! # Wire tolerance
//! - Quantities arrive either as numbers or as decimal strings (`"10.00"`).
//! - Timestamps arrive as naive ISO-8601 (`2026-03-02T08:00:00`), RFC 3339
//!   with an offset (converted to the wall-clock time of that offset), or a
//!   bare date (midnight).

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::ResourceKind;

/// A production work order, optionally decomposed into operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkOrderRecord {
    /// Backend identifier.
    pub id: i64,
    /// Human work order code (e.g., "WO-2026-0042").
    #[serde(default)]
    pub code: Option<String>,
    /// Work order name.
    #[serde(default)]
    pub name: Option<String>,
    /// Name of the product being made.
    #[serde(default)]
    pub product_name: Option<String>,
    /// Ordered quantity.
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: Option<f64>,
    /// Quantity reported as finished.
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub completed_quantity: Option<f64>,
    /// Planned start.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub planned_start_date: Option<NaiveDateTime>,
    /// Planned end.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub planned_end_date: Option<NaiveDateTime>,
    /// Work center the order is dispatched to.
    #[serde(default)]
    pub work_center_name: Option<String>,
    /// Workshop the work center belongs to.
    #[serde(default)]
    pub workshop_name: Option<String>,
    /// Backend status code (e.g., "draft", "released", "in_progress").
    #[serde(default)]
    pub status: String,
    /// Priority label.
    #[serde(default)]
    pub priority: Option<String>,
    /// Routed operations, in backend order.
    #[serde(default)]
    pub operations: Vec<OperationRecord>,
    /// Equipment assigned directly to the work order.
    #[serde(default)]
    pub assigned_equipment_name: Option<String>,
    /// Mold assigned directly to the work order.
    #[serde(default)]
    pub assigned_mold_name: Option<String>,
    /// Tool assigned directly to the work order.
    #[serde(default)]
    pub assigned_tool_name: Option<String>,
}

/// A routed operation nested under a work order.
///
/// Only operations carrying an `id` are schedulable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub operation_name: Option<String>,
    /// Position in the routing.
    #[serde(default)]
    pub sequence: Option<i32>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub planned_start_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub planned_end_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub assigned_equipment_name: Option<String>,
    #[serde(default)]
    pub assigned_mold_name: Option<String>,
    #[serde(default)]
    pub assigned_tool_name: Option<String>,
}

impl WorkOrderRecord {
    /// Creates a work order with the given id and no other data.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Sets the work order code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the work order name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the product name.
    pub fn with_product_name(mut self, product_name: impl Into<String>) -> Self {
        self.product_name = Some(product_name.into());
        self
    }

    /// Sets ordered and completed quantities.
    pub fn with_quantities(mut self, quantity: f64, completed: f64) -> Self {
        self.quantity = Some(quantity);
        self.completed_quantity = Some(completed);
        self
    }

    /// Sets the planned window.
    pub fn with_planned_dates(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.planned_start_date = Some(start);
        self.planned_end_date = Some(end);
        self
    }

    /// Sets the work center name.
    pub fn with_work_center(mut self, work_center_name: impl Into<String>) -> Self {
        self.work_center_name = Some(work_center_name.into());
        self
    }

    /// Sets the status code.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the priority label.
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Assigns a resource directly to the work order.
    pub fn with_resource(mut self, kind: ResourceKind, name: impl Into<String>) -> Self {
        let name = Some(name.into());
        match kind {
            ResourceKind::Equipment => self.assigned_equipment_name = name,
            ResourceKind::Mold => self.assigned_mold_name = name,
            ResourceKind::Tool => self.assigned_tool_name = name,
        }
        self
    }

    /// Adds a routed operation.
    pub fn with_operation(mut self, operation: OperationRecord) -> Self {
        self.operations.push(operation);
        self
    }

    /// The directly assigned resource of `kind`, if non-empty.
    pub fn resource(&self, kind: ResourceKind) -> Option<&str> {
        let value = match kind {
            ResourceKind::Equipment => &self.assigned_equipment_name,
            ResourceKind::Mold => &self.assigned_mold_name,
            ResourceKind::Tool => &self.assigned_tool_name,
        };
        non_empty(value)
    }

    /// Planned window, only when both ends are present.
    pub fn planned_window(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.planned_start_date.zip(self.planned_end_date)
    }

    /// Operations that carry an identifier.
    pub fn schedulable_operations(&self) -> impl Iterator<Item = &OperationRecord> {
        self.operations.iter().filter(|op| op.id.is_some())
    }
}

impl OperationRecord {
    /// Creates an operation with the given id.
    pub fn new(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Creates an operation the backend has not assigned an id yet.
    pub fn unidentified() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Sets the routing sequence number.
    pub fn with_sequence(mut self, sequence: i32) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Sets the planned window.
    pub fn with_planned_dates(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.planned_start_date = Some(start);
        self.planned_end_date = Some(end);
        self
    }

    /// Assigns a resource to the operation.
    pub fn with_resource(mut self, kind: ResourceKind, name: impl Into<String>) -> Self {
        let name = Some(name.into());
        match kind {
            ResourceKind::Equipment => self.assigned_equipment_name = name,
            ResourceKind::Mold => self.assigned_mold_name = name,
            ResourceKind::Tool => self.assigned_tool_name = name,
        }
        self
    }

    /// The assigned resource of `kind`, if non-empty.
    pub fn resource(&self, kind: ResourceKind) -> Option<&str> {
        let value = match kind {
            ResourceKind::Equipment => &self.assigned_equipment_name,
            ResourceKind::Mold => &self.assigned_mold_name,
            ResourceKind::Tool => &self.assigned_tool_name,
        };
        non_empty(value)
    }

    /// Planned window, only when both ends are present.
    pub fn planned_window(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.planned_start_date.zip(self.planned_end_date)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Number(f64),
    Text(String),
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawQuantity>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawQuantity::Number(n)) => Some(n),
        Some(RawQuantity::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    })
}

pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// Parses the timestamp shapes the backend emits. Unparseable text is `None`.
fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
