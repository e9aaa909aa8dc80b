//! Ordered step sequences.
//!
//! [`OrderedStepSet`] holds the steps of one parent and guarantees that,
//! between operations, their `order` values are exactly `1..=N` with no
//! duplicates and no gaps. Every mutating method builds the next state on a
//! scratch copy and only swaps it in once the invariant has been checked, so
//! a failed call leaves the set exactly as it was.
//!
//! Move and compaction arithmetic lives in [`reorder`] as pure functions.

pub mod reorder;

use std::collections::HashMap;

use reorder::{OrderAssignment, Reorder};

use crate::{
    error::{CasebookError, Result},
    models::Step,
};

/// Outcome of [`OrderedStepSet::move_to_position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The step was already at the requested position
    Unchanged,

    /// The step moved from one position to another
    Moved { from: u32, to: u32 },
}

/// The steps of one parent, kept sorted by `order`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedStepSet {
    steps: Vec<Step>,
}

impl OrderedStepSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from steps that must already be dense.
    pub fn from_steps(steps: Vec<Step>) -> Result<Self> {
        let mut steps = steps;
        steps.sort_by_key(|step| (step.order, step.id));
        check_dense(&steps)?;
        Ok(Self { steps })
    }

    /// Builds a set from stored rows without requiring density. Use
    /// [`auto_reorder`](Self::auto_reorder) to restore the invariant.
    pub fn from_stored(steps: Vec<Step>) -> Self {
        let mut steps = steps;
        steps.sort_by_key(|step| (step.order, step.id));
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    pub fn as_slice(&self) -> &[Step] {
        &self.steps
    }

    pub fn get(&self, step_id: u64) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == step_id)
    }

    /// Current order of a step.
    pub fn position_of(&self, step_id: u64) -> Option<u32> {
        self.get(step_id).map(|step| step.order)
    }

    /// `(step_id, order)` pairs in sequence order.
    pub fn orders(&self) -> Vec<(u64, u32)> {
        self.steps.iter().map(|step| (step.id, step.order)).collect()
    }

    /// Whether the orders are exactly `1..=N`.
    pub fn is_dense(&self) -> bool {
        check_dense(&self.steps).is_ok()
    }

    /// Verifies the dense ordering invariant.
    pub fn check_invariant(&self) -> Result<()> {
        check_dense(&self.steps)
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }

    /// Places `step` at `desired_order`, shifting every step at or after
    /// that position up by one. Without a position the step is appended.
    /// Returns the order the step received.
    ///
    /// # Errors
    ///
    /// - `InvalidPosition` if `desired_order` is 0 or beyond `N + 1`
    /// - `InvalidInput` if a step with the same id is already present
    pub fn insert(&mut self, step: Step, desired_order: Option<u32>) -> Result<u32> {
        if self.get(step.id).is_some() {
            return Err(CasebookError::invalid_input("id")
                .with_reason(format!("Step {} is already in the sequence", step.id)));
        }

        let append_at = self.steps.last().map_or(1, |last| last.order + 1);
        let order = match desired_order {
            None => append_at,
            Some(position) if position < 1 || position > append_at => {
                return Err(CasebookError::InvalidPosition {
                    position,
                    len: self.steps.len(),
                });
            }
            Some(position) => position,
        };

        let mut scratch = self.steps.clone();
        for existing in scratch.iter_mut().filter(|s| s.order >= order) {
            existing.order += 1;
        }
        let mut step = step;
        step.order = order;
        scratch.push(step);
        scratch.sort_by_key(|s| s.order);

        self.commit(scratch)?;
        Ok(order)
    }

    /// Removes a step and closes the gap it leaves behind.
    pub fn remove(&mut self, step_id: u64) -> Result<Step> {
        let index = self
            .steps
            .iter()
            .position(|step| step.id == step_id)
            .ok_or(CasebookError::StepNotFound { id: step_id })?;

        let mut scratch = self.steps.clone();
        let removed = scratch.remove(index);
        for later in scratch.iter_mut().filter(|s| s.order > removed.order) {
            later.order -= 1;
        }

        self.commit(scratch)?;
        Ok(removed)
    }

    /// Moves a step to `target_order`, applying the complete reassignment
    /// computed by [`reorder::move_to_position`] atomically.
    pub fn move_to_position(&mut self, step_id: u64, target_order: u32) -> Result<MoveOutcome> {
        match reorder::move_to_position(&self.steps, step_id, target_order)? {
            Reorder::Unchanged => Ok(MoveOutcome::Unchanged),
            Reorder::Moved(assignments) => {
                let from = self.position_of(step_id).unwrap_or_default();
                self.apply(&assignments)?;
                Ok(MoveOutcome::Moved {
                    from,
                    to: target_order,
                })
            }
        }
    }

    /// Renumbers the steps as `1..=N`, keeping their relative order.
    /// Returns whether any order value changed.
    pub fn auto_reorder(&mut self) -> Result<bool> {
        let assignments = reorder::compact(&self.steps);
        if reorder::displaced(&self.steps, &assignments).is_empty() {
            return Ok(false);
        }
        self.apply(&assignments)?;
        Ok(true)
    }

    /// Ids of steps whose order differs from `before`, including steps that
    /// were not present in `before`.
    pub fn displaced_since(&self, before: &[(u64, u32)]) -> Vec<u64> {
        let before: HashMap<u64, u32> = before.iter().copied().collect();
        self.steps
            .iter()
            .filter(|step| before.get(&step.id) != Some(&step.order))
            .map(|step| step.id)
            .collect()
    }

    /// Edits a step's content in place. The closure must not change the
    /// step's id or order; such changes are rejected and rolled back.
    pub fn update<F>(&mut self, step_id: u64, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Step),
    {
        let index = self
            .steps
            .iter()
            .position(|step| step.id == step_id)
            .ok_or(CasebookError::StepNotFound { id: step_id })?;

        let mut edited = self.steps[index].clone();
        edit(&mut edited);
        if edited.id != step_id || edited.order != self.steps[index].order {
            return Err(CasebookError::OrderingViolated {
                reason: format!("content edit of step {step_id} changed its id or order"),
            });
        }
        self.steps[index] = edited;
        Ok(())
    }

    fn apply(&mut self, assignments: &[OrderAssignment]) -> Result<()> {
        let mut by_id: HashMap<u64, Step> = self
            .steps
            .iter()
            .map(|step| (step.id, step.clone()))
            .collect();

        let mut scratch = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let mut step = by_id.remove(&assignment.step_id).ok_or_else(|| {
                CasebookError::OrderingViolated {
                    reason: format!("assignment names unknown step {}", assignment.step_id),
                }
            })?;
            step.order = assignment.order;
            scratch.push(step);
        }
        if !by_id.is_empty() {
            return Err(CasebookError::OrderingViolated {
                reason: format!("{} steps missing from reassignment", by_id.len()),
            });
        }

        scratch.sort_by_key(|s| s.order);
        self.commit(scratch)
    }

    fn commit(&mut self, scratch: Vec<Step>) -> Result<()> {
        check_dense(&scratch)?;
        self.steps = scratch;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a OrderedStepSet {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

fn check_dense(steps: &[Step]) -> Result<()> {
    for (index, step) in steps.iter().enumerate() {
        let expected = index as u32 + 1;
        if step.order != expected {
            return Err(CasebookError::OrderingViolated {
                reason: format!(
                    "step {} has order {} where {} was expected",
                    step.id, step.order, expected
                ),
            });
        }
    }
    Ok(())
}
