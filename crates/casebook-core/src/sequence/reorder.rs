//! Pure reordering computations over an ordered slice of steps.
//!
//! Nothing here mutates its input. Callers receive a complete reassignment
//! and apply it in one go, so a half-applied reorder can never be observed.

use std::collections::HashMap;

use crate::{
    error::{CasebookError, Result},
    models::Step,
};

/// New order value for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderAssignment {
    pub step_id: u64,
    pub order: u32,
}

/// Result of a move computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reorder {
    /// The step already sits at the target position
    Unchanged,

    /// Full reassignment for every step, listed in the new sequence order
    Moved(Vec<OrderAssignment>),
}

/// Computes the sequence obtained by moving `step_id` to the 1-indexed
/// `target` position.
///
/// `steps` must be sorted by `order`. The moving step is taken out of its
/// slot and reinserted in front of the step currently at `target`; every
/// step between the two slots shifts one position toward the vacated slot.
///
/// # Errors
///
/// - `StepNotFound` if `step_id` is not in `steps`
/// - `InvalidPosition` if `target` is outside `1..=steps.len()`
///
/// # Examples
///
/// ```rust
/// # use casebook_core::models::{ParentRef, Step};
/// use casebook_core::sequence::reorder::{move_to_position, Reorder};
/// # let step = |id: u64, order: u32| Step {
/// #     id, parent: ParentRef::test_case(1), order, action: format!("step {id}"),
/// #     data: None, expected: None, script: None, disabled: false,
/// #     referenced_fixture_id: None,
/// #     created_at: jiff::Timestamp::UNIX_EPOCH, updated_at: jiff::Timestamp::UNIX_EPOCH,
/// # };
/// let steps = vec![step(10, 1), step(11, 2), step(12, 3)];
///
/// let Reorder::Moved(assignments) = move_to_position(&steps, 12, 1)? else {
///     unreachable!()
/// };
/// let ids: Vec<u64> = assignments.iter().map(|a| a.step_id).collect();
/// assert_eq!(ids, vec![12, 10, 11]);
/// # Ok::<(), casebook_core::CasebookError>(())
/// ```
pub fn move_to_position(steps: &[Step], step_id: u64, target: u32) -> Result<Reorder> {
    let from = steps
        .iter()
        .position(|step| step.id == step_id)
        .ok_or(CasebookError::StepNotFound { id: step_id })?;

    if target < 1 || target as usize > steps.len() {
        return Err(CasebookError::InvalidPosition {
            position: target,
            len: steps.len(),
        });
    }

    let to = (target - 1) as usize;
    if from == to {
        return Ok(Reorder::Unchanged);
    }

    let assignments = (0..steps.len())
        .map(|slot| {
            let source = if slot == to {
                from
            } else if from < to && (from..to).contains(&slot) {
                slot + 1
            } else if to < from && (to + 1..=from).contains(&slot) {
                slot - 1
            } else {
                slot
            };
            OrderAssignment {
                step_id: steps[source].id,
                order: slot as u32 + 1,
            }
        })
        .collect();

    Ok(Reorder::Moved(assignments))
}

/// Dense `1..=N` renumbering that keeps the relative order of `steps`.
pub fn compact(steps: &[Step]) -> Vec<OrderAssignment> {
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| OrderAssignment {
            step_id: step.id,
            order: index as u32 + 1,
        })
        .collect()
}

/// Ids of the steps whose order differs between `steps` and `assignments`.
pub fn displaced(steps: &[Step], assignments: &[OrderAssignment]) -> Vec<u64> {
    let current: HashMap<u64, u32> = steps.iter().map(|s| (s.id, s.order)).collect();
    assignments
        .iter()
        .filter(|a| current.get(&a.step_id) != Some(&a.order))
        .map(|a| a.step_id)
        .collect()
}
