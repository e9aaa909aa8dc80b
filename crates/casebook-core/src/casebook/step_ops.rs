//! Step operations.

use super::Casebook;
use crate::{
    controller::MutationOutcome,
    display::Steps,
    error::Result,
    models::ParentRef,
    params::{AddStep, AutoReorder, DeleteStep, EditStep, MoveStep},
};

impl Casebook {
    /// Retrieves the steps of a test case or fixture in order.
    pub async fn get_steps(&self, parent: ParentRef) -> Result<Steps> {
        self.run(move |controller| controller.list_steps(parent))
            .await
            .map(Steps)
    }

    /// Adds a step, appending it unless a position is given.
    pub async fn add_step(&self, params: &AddStep) -> Result<MutationOutcome> {
        let parent = params.parent;
        let draft = params.step.clone();
        let position = params.position;
        let policy = params.policy;

        self.write(parent, move |controller| {
            controller.add_step(parent, draft, position, policy)
        })
        .await
    }

    /// Edits a step's content and optionally moves it.
    pub async fn edit_step(&self, params: &EditStep) -> Result<MutationOutcome> {
        let step_id = params.step_id;
        let patch = params.patch.clone();
        let policy = params.policy;

        let parent = self.parent_of_step(step_id).await?;
        self.write(parent, move |controller| {
            controller.edit_step(step_id, patch, policy)
        })
        .await
    }

    /// Deletes a step and compacts the remaining orders.
    pub async fn delete_step(&self, params: &DeleteStep) -> Result<MutationOutcome> {
        let step_id = params.step_id;
        let policy = params.policy;

        let parent = self.parent_of_step(step_id).await?;
        self.write(parent, move |controller| {
            controller.delete_step(step_id, policy)
        })
        .await
    }

    /// Moves a step to a new 1-indexed position.
    pub async fn move_step(&self, params: &MoveStep) -> Result<MutationOutcome> {
        let step_id = params.step_id;
        let position = params.position;
        let policy = params.policy;

        let parent = self.parent_of_step(step_id).await?;
        self.write(parent, move |controller| {
            controller.move_step(step_id, position, policy)
        })
        .await
    }

    /// Renumbers a parent's steps as `1..=N`.
    pub async fn auto_reorder_all(&self, params: &AutoReorder) -> Result<MutationOutcome> {
        let parent = params.parent;
        let policy = params.policy;

        self.write(parent, move |controller| {
            controller.auto_reorder_all(parent, policy)
        })
        .await
    }
}
