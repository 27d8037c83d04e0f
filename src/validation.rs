//! Diagnostic checks on input records.
//!
//! Projection tolerates every problem reported here by falling back to
//! defaults, so these checks never gate rendering. They exist to explain to
//! an operator (or a data-quality report) why a bar looks odd:
//! - Duplicate work order or operation IDs
//! - Operations without an ID (hidden at operation level)
//! - Planned end before planned start
//! - Negative quantities

use crate::models::WorkOrderRecord;
use chrono::NaiveDateTime;
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Finding category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An operation has no ID and cannot be scheduled on its own.
    UnidentifiedOperation,
    /// Planned end precedes planned start.
    InvertedDates,
    /// Ordered or completed quantity is negative.
    NegativeQuantity,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a batch of work orders as loaded for the board.
///
/// Checks:
/// 1. No duplicate work order IDs
/// 2. No duplicate operation IDs (across all work orders)
/// 3. Every operation has an ID
/// 4. Planned windows are not inverted (work orders and operations)
/// 5. Quantities are not negative
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_work_orders(work_orders: &[WorkOrderRecord]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut work_order_ids = HashSet::new();
    let mut operation_ids = HashSet::new();

    for wo in work_orders {
        if !work_order_ids.insert(wo.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate work order ID: {}", wo.id),
            ));
        }

        if let Some(err) = check_window(
            wo.planned_start_date,
            wo.planned_end_date,
            || format!("Work order {}", wo.id),
        ) {
            errors.push(err);
        }

        let quantities = [
            ("quantity", wo.quantity),
            ("completed quantity", wo.completed_quantity),
        ];
        for (field, value) in quantities {
            if value.is_some_and(|q| q < 0.0) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NegativeQuantity,
                    format!("Work order {} has a negative {field}", wo.id),
                ));
            }
        }

        for (index, op) in wo.operations.iter().enumerate() {
            let Some(op_id) = op.id else {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnidentifiedOperation,
                    format!("Work order {} operation #{} has no ID", wo.id, index + 1),
                ));
                continue;
            };

            if !operation_ids.insert(op_id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate operation ID: {op_id}"),
                ));
            }

            if let Some(err) = check_window(op.planned_start_date, op.planned_end_date, || {
                format!("Operation {op_id}")
            }) {
                errors.push(err);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_window(
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    subject: impl FnOnce() -> String,
) -> Option<ValidationError> {
    let (start, end) = start.zip(end)?;
    (end < start).then(|| {
        ValidationError::new(
            ValidationErrorKind::InvertedDates,
            format!("{} ends ({end}) before it starts ({start})", subject()),
        )
    })
}
