//! Transaction sequencing for parent entities.
//!
//! Every mutating operation of [`ParentController`] follows the same shape:
//! load the parent, build the next state on copies, validate it, snapshot it
//! into the ledger and hand both to the store in a single
//! [`commit`](ParentStore::commit). Nothing reaches the store before every
//! check has passed, so a failed operation leaves no trace.
//!
//! The controller is synchronous and assumes its caller serializes writers
//! per parent (see [`crate::casebook`]).

use jiff::Timestamp;
use log::{debug, warn};

use crate::{
    error::{CasebookError, Result},
    fixture_rules::{
        check_self_reference, ClearedReference, FixtureReferenceValidator, ReferencePolicy,
    },
    ledger::VersionLedger,
    models::{
        default_export_name, requests::validate_action, FieldsPatch, Fixture, FixtureType,
        ParentFields, ParentRef, Step, StepDraft, StepPatch, TestCase, Version,
    },
    sequence::{MoveOutcome, OrderedStepSet},
    store::{FixtureLookup, LoadedParent, ParentStore},
};

/// Result of a mutating operation.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub parent: ParentRef,
    pub fields: ParentFields,
    /// The parent's steps after the operation, in order
    pub steps: Vec<Step>,
    /// The step the operation targeted, as it ended up
    pub step: Option<Step>,
    /// The version recorded, or `None` when nothing changed
    pub version: Option<Version>,
    /// References cleared under [`ReferencePolicy::Clear`]
    pub cleared: Vec<ClearedReference>,
}

impl MutationOutcome {
    /// Whether the operation changed anything.
    pub fn is_change(&self) -> bool {
        self.version.is_some()
    }
}

/// Working copy of a parent while an operation is being prepared.
struct Draft {
    parent: ParentRef,
    fields: ParentFields,
    steps: OrderedStepSet,
    ledger: VersionLedger,
    /// Set when the stored sequence had to be compacted on load
    compacted: bool,
}

impl Draft {
    fn unchanged(self, step: Option<Step>) -> MutationOutcome {
        MutationOutcome {
            parent: self.parent,
            fields: self.fields,
            steps: self.steps.into_steps(),
            step,
            version: None,
            cleared: Vec::new(),
        }
    }
}

/// Applies operations to test cases and fixtures through a store.
pub struct ParentController<S> {
    store: S,
}

impl<S> ParentController<S>
where
    S: ParentStore + FixtureLookup,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Creates a test case with no steps and an empty ledger.
    pub fn create_test_case(&mut self, fields: ParentFields) -> Result<TestCase> {
        fields.validate()?;
        let test_case = self.store.create_test_case(&fields, Timestamp::now())?;
        debug!("Created test case {}", test_case.id);
        Ok(test_case)
    }

    /// Creates a fixture with no steps and an empty ledger. The export name
    /// defaults to the camel-cased fixture name.
    pub fn create_fixture(
        &mut self,
        fields: ParentFields,
        fixture_type: FixtureType,
        export_name: Option<String>,
    ) -> Result<Fixture> {
        fields.validate()?;
        let export_name = match export_name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => default_export_name(&fields.name),
        };
        if export_name.is_empty() {
            return Err(CasebookError::invalid_input("export_name")
                .with_reason("Could not derive an export name; provide one explicitly"));
        }

        let fixture =
            self.store
                .create_fixture(&fields, fixture_type, &export_name, Timestamp::now())?;
        debug!("Created {} fixture {}", fixture.fixture_type, fixture.id);
        Ok(fixture)
    }

    /// Adds a step, appending it unless `position` is given.
    ///
    /// A step created with a fixture reference must fit its own position;
    /// steps pushed down by the insert are checked under `policy`.
    pub fn add_step(
        &mut self,
        parent: ParentRef,
        draft: StepDraft,
        position: Option<u32>,
        policy: ReferencePolicy,
    ) -> Result<MutationOutcome> {
        draft.validate()?;
        let mut working = self.begin(parent)?;
        let now = Timestamp::now();

        let mut action = draft.action.trim().to_string();
        if let Some(fixture_id) = draft.referenced_fixture_id {
            check_self_reference(parent, fixture_id)?;
            let fixture = self.store.fixture_info(fixture_id)?;
            if action.is_empty() {
                action = fixture.name;
            }
        }

        let step_id = self.store.allocate_step_id()?;
        let step = Step {
            id: step_id,
            parent,
            order: 0,
            action,
            data: draft.data.filter(|v| !v.trim().is_empty()),
            expected: draft.expected.filter(|v| !v.trim().is_empty()),
            script: draft.script.filter(|v| !v.trim().is_empty()),
            disabled: draft.disabled,
            referenced_fixture_id: draft.referenced_fixture_id,
            created_at: now,
            updated_at: now,
        };

        let before = working.steps.orders();
        let order = working.steps.insert(step, position)?;

        let validator = FixtureReferenceValidator::new(&self.store);
        if let Some(added) = working.steps.get(step_id) {
            validator.validate(added, order)?;
        }
        let displaced: Vec<u64> = working
            .steps
            .displaced_since(&before)
            .into_iter()
            .filter(|&id| id != step_id)
            .collect();
        let cleared = validator.reconcile(&mut working.steps, &displaced, policy)?;

        let label = self.step_label(&working.steps, step_id)?;
        self.finish(
            working,
            &displaced,
            Some(step_id),
            cleared,
            format!("Added step: {label}"),
            now,
        )
    }

    /// Edits a step's content and optionally its position.
    ///
    /// Explicit reference changes are always validated strictly; steps
    /// displaced by a position change are checked under `policy`. A patch
    /// that changes nothing records no version.
    pub fn edit_step(
        &mut self,
        step_id: u64,
        patch: StepPatch,
        policy: ReferencePolicy,
    ) -> Result<MutationOutcome> {
        let parent = self.store.parent_of_step(step_id)?;
        let mut working = self.begin(parent)?;
        let now = Timestamp::now();

        let current = working
            .steps
            .get(step_id)
            .cloned()
            .ok_or(CasebookError::StepNotFound { id: step_id })?;

        let mut updated = patch.apply_content(&current);
        let reference_changed = patch.touches_reference(&current);
        if reference_changed {
            if let Some(fixture_id) = updated.referenced_fixture_id {
                check_self_reference(parent, fixture_id)?;
            }
        }
        if !updated.has_action() {
            if let Some(fixture_id) = updated.referenced_fixture_id {
                updated.action = self.store.fixture_info(fixture_id)?.name;
            }
        }
        validate_action(&updated.action, updated.referenced_fixture_id)?;

        let content_changed = !updated.same_content(&current);
        let position_changed = patch.order.is_some_and(|order| order != current.order);
        if !content_changed && !position_changed {
            return Ok(working.unchanged(Some(current)));
        }

        let before = working.steps.orders();
        working.steps.update(step_id, |step| *step = updated)?;
        if let Some(target) = patch.order {
            working.steps.move_to_position(step_id, target)?;
        }

        let validator = FixtureReferenceValidator::new(&self.store);
        let mut displaced = working.steps.displaced_since(&before);
        if reference_changed {
            if let Some(edited) = working.steps.get(step_id) {
                validator.validate(edited, edited.order)?;
            }
            displaced.retain(|&id| id != step_id);
        }
        let cleared = validator.reconcile(&mut working.steps, &displaced, policy)?;

        let mut touched = displaced;
        if content_changed {
            touched.push(step_id);
        }
        let label = self.step_label(&working.steps, step_id)?;
        self.finish(
            working,
            &touched,
            Some(step_id),
            cleared,
            format!("Updated step: {label}"),
            now,
        )
    }

    /// Deletes a step and compacts the orders of the steps after it.
    pub fn delete_step(
        &mut self,
        step_id: u64,
        policy: ReferencePolicy,
    ) -> Result<MutationOutcome> {
        let parent = self.store.parent_of_step(step_id)?;
        let mut working = self.begin(parent)?;
        let now = Timestamp::now();

        let before = working.steps.orders();
        let removed = working.steps.remove(step_id)?;
        working.steps.auto_reorder()?;

        let displaced = working.steps.displaced_since(&before);
        let validator = FixtureReferenceValidator::new(&self.store);
        let cleared = validator.reconcile(&mut working.steps, &displaced, policy)?;

        let label = self.label_of(&removed)?;
        self.finish(
            working,
            &displaced,
            None,
            cleared,
            format!("Deleted step: {label}"),
            now,
        )
    }

    /// Moves a step to `target`. Moving a step onto its own position is a
    /// successful no-op that records no version.
    pub fn move_step(
        &mut self,
        step_id: u64,
        target: u32,
        policy: ReferencePolicy,
    ) -> Result<MutationOutcome> {
        let parent = self.store.parent_of_step(step_id)?;
        let mut working = self.begin(parent)?;
        let now = Timestamp::now();

        let before = working.steps.orders();
        let outcome = working.steps.move_to_position(step_id, target)?;
        if outcome == MoveOutcome::Unchanged {
            let step = working.steps.get(step_id).cloned();
            return Ok(working.unchanged(step));
        }

        let displaced = working.steps.displaced_since(&before);
        let validator = FixtureReferenceValidator::new(&self.store);
        let cleared = validator.reconcile(&mut working.steps, &displaced, policy)?;

        let label = self.step_label(&working.steps, step_id)?;
        self.finish(
            working,
            &displaced,
            Some(step_id),
            cleared,
            format!("Moved step: {label} to position {target}"),
            now,
        )
    }

    /// Renumbers the parent's steps as `1..=N`. A set that is already dense
    /// is left alone and no version is recorded.
    pub fn auto_reorder_all(
        &mut self,
        parent: ParentRef,
        policy: ReferencePolicy,
    ) -> Result<MutationOutcome> {
        let mut working = self.begin(parent)?;
        let now = Timestamp::now();

        let changed = working.steps.auto_reorder()? || working.compacted;
        if !changed {
            return Ok(working.unchanged(None));
        }

        // Compaction may already have happened on load, so validate all.
        let all: Vec<u64> = working.steps.iter().map(|step| step.id).collect();
        let validator = FixtureReferenceValidator::new(&self.store);
        let cleared = validator.reconcile(&mut working.steps, &all, policy)?;

        self.finish(
            working,
            &all,
            None,
            cleared,
            "Auto-reordered steps".to_string(),
            now,
        )
    }

    /// Applies `patch` to a parent's scalar fields. A patch that leaves every
    /// field as it was records no version.
    pub fn update_parent(
        &mut self,
        parent: ParentRef,
        patch: &FieldsPatch,
    ) -> Result<MutationOutcome> {
        let mut working = self.begin(parent)?;
        let now = Timestamp::now();

        let updated = patch.apply(&working.fields)?;
        let changed = working.fields.changed_fields(&updated);
        if changed.is_empty() {
            return Ok(working.unchanged(None));
        }

        let reason = if changed == ["name"] {
            format!("Renamed from {} to {}", working.fields.name, updated.name)
        } else {
            format!("Updated {}", changed.join(", "))
        };
        working.fields = updated;
        self.finish(working, &[], None, Vec::new(), reason, now)
    }

    /// Renames a parent. Renaming to the current name is a no-op.
    pub fn rename_parent(&mut self, parent: ParentRef, new_name: &str) -> Result<MutationOutcome> {
        let patch = FieldsPatch {
            name: Some(new_name.to_string()),
            ..Default::default()
        };
        self.update_parent(parent, &patch)
    }

    /// Replaces the parent's fields and steps with those captured by
    /// `version_number` and records the restore as a new version.
    pub fn restore_version(
        &mut self,
        parent: ParentRef,
        version_number: u32,
    ) -> Result<MutationOutcome> {
        let LoadedParent {
            parent,
            mut ledger,
            ..
        } = self.store.load(parent)?;
        let now = Timestamp::now();

        let restored = ledger.restore(version_number, now)?;
        self.store.commit(
            parent,
            &restored.fields,
            &restored.steps,
            &restored.version,
            now,
        )?;
        debug!(
            "Restored {parent} to version {version_number} as version {}",
            restored.version.version_number
        );

        Ok(MutationOutcome {
            parent,
            fields: restored.fields,
            steps: restored.steps.into_steps(),
            step: None,
            version: Some(restored.version),
            cleared: Vec::new(),
        })
    }

    pub fn load_test_case(&self, id: u64) -> Result<TestCase> {
        self.store.load_test_case(id)
    }

    pub fn load_fixture(&self, id: u64) -> Result<Fixture> {
        self.store.load_fixture(id)
    }

    pub fn list_test_cases(&self) -> Result<Vec<TestCase>> {
        self.store.list_test_cases()
    }

    pub fn list_fixtures(&self) -> Result<Vec<Fixture>> {
        self.store.list_fixtures()
    }

    /// Current steps of a parent in order.
    pub fn list_steps(&self, parent: ParentRef) -> Result<Vec<Step>> {
        Ok(self.store.load(parent)?.steps.into_steps())
    }

    /// All versions of a parent, oldest first.
    pub fn list_versions(&self, parent: ParentRef) -> Result<Vec<Version>> {
        Ok(self.store.load(parent)?.ledger.list().to_vec())
    }

    pub fn get_version(&self, parent: ParentRef, version_number: u32) -> Result<Version> {
        let loaded = self.store.load(parent)?;
        loaded.ledger.get(version_number).cloned()
    }

    /// Steps exactly as captured by a version.
    pub fn get_version_steps(&self, parent: ParentRef, version_number: u32) -> Result<Vec<Step>> {
        Ok(self.get_version(parent, version_number)?.steps)
    }

    fn begin(&self, parent: ParentRef) -> Result<Draft> {
        let LoadedParent {
            parent,
            fields,
            mut steps,
            ledger,
        } = self.store.load(parent)?;

        let mut compacted = false;
        if !steps.is_dense() {
            warn!("Stored steps of {parent} are not densely ordered; compacting");
            compacted = steps.auto_reorder()?;
        }

        Ok(Draft {
            parent,
            fields,
            steps,
            ledger,
            compacted,
        })
    }

    /// Stamps touched steps, snapshots and commits.
    fn finish(
        &mut self,
        working: Draft,
        touched: &[u64],
        step_id: Option<u64>,
        cleared: Vec<ClearedReference>,
        reason: String,
        now: Timestamp,
    ) -> Result<MutationOutcome> {
        let Draft {
            parent,
            fields,
            mut steps,
            mut ledger,
            ..
        } = working;

        for &id in touched {
            if steps.get(id).is_some() {
                steps.update(id, |step| step.updated_at = now)?;
            }
        }
        steps.check_invariant()?;

        let version = ledger.snapshot(&fields, &steps, reason, now).clone();
        self.store.commit(parent, &fields, &steps, &version, now)?;
        debug!(
            "Recorded version {} of {parent}: {}",
            version.version_number, version.reason
        );

        let step = step_id.and_then(|id| steps.get(id).cloned());
        Ok(MutationOutcome {
            parent,
            fields,
            steps: steps.into_steps(),
            step,
            version: Some(version),
            cleared,
        })
    }

    fn step_label(&self, steps: &OrderedStepSet, step_id: u64) -> Result<String> {
        let step = steps
            .get(step_id)
            .ok_or(CasebookError::StepNotFound { id: step_id })?;
        self.label_of(step)
    }

    /// The action, or the referenced fixture's name when the action is blank.
    fn label_of(&self, step: &Step) -> Result<String> {
        if step.has_action() {
            return Ok(step.action.clone());
        }
        match step.referenced_fixture_id {
            Some(fixture_id) => Ok(self.store.fixture_info(fixture_id)?.name),
            None => Ok(String::new()),
        }
    }
}
