//! Resource aggregation.
//!
//! A work-order bar shows which equipment, molds and tools it occupies.
//! When the work order has a direct assignment, that value is shown as is.
//! Otherwise the assignments of its operations are merged into one
//! deduplicated, comma-separated value.

use std::collections::BTreeSet;

use crate::models::{ResourceKind, WorkOrderRecord};

/// Separator between distinct names of one resource kind.
const NAME_SEPARATOR: &str = ", ";

/// Separator between resource kinds on the label's resource line.
const LINE_SEPARATOR: &str = " | ";

/// Display value for a work order's `kind` assignment.
///
/// Returns the direct assignment unchanged when present. Otherwise returns
/// the distinct operation assignments joined with `", "`, in sorted order,
/// or `None` when no operation carries one.
pub fn aggregate_resource_names(work_order: &WorkOrderRecord, kind: ResourceKind) -> Option<String> {
    if let Some(direct) = work_order.resource(kind) {
        return Some(direct.to_string());
    }

    let names: BTreeSet<&str> = work_order
        .operations
        .iter()
        .filter_map(|op| op.resource(kind))
        .collect();

    if names.is_empty() {
        None
    } else {
        Some(names.into_iter().collect::<Vec<_>>().join(NAME_SEPARATOR))
    }
}

/// Builds the label's resource line, e.g. `Equipment: CNC-1 | Tool: T-3`.
///
/// Kinds without a value are left out; `None` when nothing remains.
pub fn format_resource_line<I>(assignments: I) -> Option<String>
where
    I: IntoIterator<Item = (ResourceKind, Option<String>)>,
{
    let parts: Vec<String> = assignments
        .into_iter()
        .filter_map(|(kind, name)| name.map(|name| format!("{}: {}", kind.caption(), name)))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(LINE_SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OperationRecord;

    #[test]
    fn test_direct_value_wins() {
        let wo = WorkOrderRecord::new(1)
            .with_resource(ResourceKind::Equipment, "Press-7")
            .with_operation(OperationRecord::new(1).with_resource(ResourceKind::Equipment, "CNC-1"));

        assert_eq!(
            aggregate_resource_names(&wo, ResourceKind::Equipment),
            Some("Press-7".to_string())
        );
    }

    #[test]
    fn test_union_across_operations() {
        let wo = WorkOrderRecord::new(1)
            .with_operation(OperationRecord::new(1).with_resource(ResourceKind::Tool, "T-2"))
            .with_operation(OperationRecord::new(2).with_resource(ResourceKind::Tool, "T-1"))
            .with_operation(OperationRecord::new(3).with_resource(ResourceKind::Tool, "T-2"))
            .with_operation(OperationRecord::new(4));

        assert_eq!(
            aggregate_resource_names(&wo, ResourceKind::Tool),
            Some("T-1, T-2".to_string())
        );
    }

    #[test]
    fn test_blank_direct_value_falls_through() {
        let wo = WorkOrderRecord::new(1)
            .with_resource(ResourceKind::Mold, "")
            .with_operation(OperationRecord::new(1).with_resource(ResourceKind::Mold, "M-4"));

        assert_eq!(
            aggregate_resource_names(&wo, ResourceKind::Mold),
            Some("M-4".to_string())
        );
    }

    #[test]
    fn test_nothing_assigned_is_none() {
        let wo = WorkOrderRecord::new(1).with_operation(OperationRecord::new(1));
        assert_eq!(aggregate_resource_names(&wo, ResourceKind::Equipment), None);
        assert_eq!(aggregate_resource_names(&WorkOrderRecord::new(2), ResourceKind::Tool), None);
    }

    #[test]
    fn test_resource_line() {
        let line = format_resource_line([
            (ResourceKind::Equipment, Some("CNC-1".to_string())),
            (ResourceKind::Mold, None),
            (ResourceKind::Tool, Some("T-1, T-2".to_string())),
        ]);
        assert_eq!(line.as_deref(), Some("Equipment: CNC-1 | Tool: T-1, T-2"));

        assert_eq!(format_resource_line([(ResourceKind::Mold, None)]), None);
    }
}
