//! Position rules for fixture references.
//!
//! A step at order 1 may only reference an `extend` fixture; every later
//! step may only reference `inline` fixtures. The rule is re-checked for
//! every step whose order changes, not just the one being edited.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    error::{CasebookError, Result},
    models::{FixtureType, ParentKind, ParentRef, Step},
    sequence::OrderedStepSet,
    store::FixtureLookup,
};

/// What to do with references that a structural change made incompatible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// Fail the whole operation
    #[default]
    Reject,

    /// Clear the incompatible references and carry on
    Clear,
}

/// A reference removed under [`ReferencePolicy::Clear`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearedReference {
    pub step_id: u64,
    pub fixture_id: u64,
    pub fixture_type: FixtureType,
    /// Order the step ended up at
    pub order: u32,
}

/// The only fixture type a step at `order` may reference.
pub fn required_type_for(order: u32) -> FixtureType {
    if order <= 1 {
        FixtureType::Extend
    } else {
        FixtureType::Inline
    }
}

/// Rejects a fixture step that references its own fixture.
pub fn check_self_reference(parent: ParentRef, fixture_id: u64) -> Result<()> {
    if parent.kind == ParentKind::Fixture && parent.id == fixture_id {
        return Err(CasebookError::invalid_input("referenced_fixture_id")
            .with_reason(format!("Fixture {fixture_id} cannot reference itself")));
    }
    Ok(())
}

/// Checks fixture references against step positions.
pub struct FixtureReferenceValidator<'a, L: ?Sized> {
    lookup: &'a L,
}

impl<'a, L: FixtureLookup + ?Sized> FixtureReferenceValidator<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    /// Validates `step` as if it sat at `order`. Steps without a reference
    /// always pass.
    pub fn validate(&self, step: &Step, order: u32) -> Result<()> {
        let Some(fixture_id) = step.referenced_fixture_id else {
            return Ok(());
        };

        let fixture_type = self.lookup.fixture_type(fixture_id)?;
        let required = required_type_for(order);
        if fixture_type != required {
            return Err(CasebookError::IncompatibleFixtureForPosition {
                step_id: step.id,
                fixture_id,
                fixture_type,
                required,
                order,
            });
        }
        Ok(())
    }

    /// Re-validates every step in `touched` at its current order in `steps`.
    ///
    /// Under [`ReferencePolicy::Reject`] the first incompatible reference
    /// fails the call and `steps` is left as it was. Under
    /// [`ReferencePolicy::Clear`] incompatible references are removed; a step
    /// whose action was blank takes the fixture's name so it stays valid.
    pub fn reconcile(
        &self,
        steps: &mut OrderedStepSet,
        touched: &[u64],
        policy: ReferencePolicy,
    ) -> Result<Vec<ClearedReference>> {
        let mut incompatible = Vec::new();
        for &step_id in touched {
            let Some(step) = steps.get(step_id) else {
                continue;
            };
            match self.validate(step, step.order) {
                Ok(()) => {}
                Err(CasebookError::IncompatibleFixtureForPosition {
                    step_id,
                    fixture_id,
                    fixture_type,
                    order,
                    ..
                }) if policy == ReferencePolicy::Clear => incompatible.push(ClearedReference {
                    step_id,
                    fixture_id,
                    fixture_type,
                    order,
                }),
                Err(e) => return Err(e),
            }
        }

        for cleared in &incompatible {
            let fallback_name = self.lookup.fixture_info(cleared.fixture_id)?.name;
            steps.update(cleared.step_id, |step| {
                step.referenced_fixture_id = None;
                if !step.has_action() {
                    step.action = fallback_name;
                }
            })?;
            warn!(
                "Cleared {} fixture {} from step {} at position {}",
                cleared.fixture_type, cleared.fixture_id, cleared.step_id, cleared.order
            );
        }

        Ok(incompatible)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use jiff::Timestamp;

    use super::*;
    use crate::models::FixtureInfo;

    struct Fixtures(HashMap<u64, FixtureInfo>);

    impl Fixtures {
        fn new() -> Self {
            let mut fixtures = HashMap::new();
            for (id, name, fixture_type) in [
                (1, "Login", FixtureType::Extend),
                (2, "Fill form", FixtureType::Inline),
            ] {
                fixtures.insert(
                    id,
                    FixtureInfo {
                        id,
                        name: name.to_string(),
                        fixture_type,
                    },
                );
            }
            Self(fixtures)
        }
    }

    impl FixtureLookup for Fixtures {
        fn fixture_info(&self, fixture_id: u64) -> Result<FixtureInfo> {
            self.0
                .get(&fixture_id)
                .cloned()
                .ok_or(CasebookError::FixtureNotFound { id: fixture_id })
        }
    }

    fn step(id: u64, action: &str, fixture: Option<u64>) -> Step {
        Step {
            id,
            parent: ParentRef::test_case(10),
            order: 0,
            action: action.to_string(),
            data: None,
            expected: None,
            script: None,
            disabled: false,
            referenced_fixture_id: fixture,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_required_type_by_position() {
        assert_eq!(required_type_for(1), FixtureType::Extend);
        assert_eq!(required_type_for(2), FixtureType::Inline);
        assert_eq!(required_type_for(40), FixtureType::Inline);
    }

    #[test]
    fn test_validate() {
        let fixtures = Fixtures::new();
        let validator = FixtureReferenceValidator::new(&fixtures);

        assert!(validator.validate(&step(1, "Plain", None), 1).is_ok());
        assert!(validator.validate(&step(1, "", Some(1)), 1).is_ok());
        assert!(validator.validate(&step(1, "", Some(2)), 3).is_ok());

        match validator.validate(&step(5, "", Some(1)), 2) {
            Err(CasebookError::IncompatibleFixtureForPosition {
                step_id,
                fixture_id,
                fixture_type,
                required,
                order,
            }) => {
                assert_eq!(step_id, 5);
                assert_eq!(fixture_id, 1);
                assert_eq!(fixture_type, FixtureType::Extend);
                assert_eq!(required, FixtureType::Inline);
                assert_eq!(order, 2);
            }
            other => panic!("expected incompatible fixture, got {other:?}"),
        }

        assert!(matches!(
            validator.validate(&step(1, "", Some(99)), 1),
            Err(CasebookError::FixtureNotFound { id: 99 })
        ));
    }

    #[test]
    fn test_self_reference() {
        assert!(check_self_reference(ParentRef::fixture(3), 3).is_err());
        assert!(check_self_reference(ParentRef::fixture(3), 4).is_ok());
        assert!(check_self_reference(ParentRef::test_case(3), 3).is_ok());
    }

    fn moved_extend_set() -> OrderedStepSet {
        let mut set = OrderedStepSet::new();
        set.insert(step(1, "", Some(1)), None).unwrap();
        set.insert(step(2, "Open page", None), None).unwrap();
        set.move_to_position(1, 2).unwrap();
        set
    }

    #[test]
    fn test_reconcile_reject_leaves_set_untouched() {
        let fixtures = Fixtures::new();
        let validator = FixtureReferenceValidator::new(&fixtures);
        let mut set = moved_extend_set();
        let before = set.clone();

        let result = validator.reconcile(&mut set, &[1, 2], ReferencePolicy::Reject);
        assert!(matches!(
            result,
            Err(CasebookError::IncompatibleFixtureForPosition { step_id: 1, .. })
        ));
        assert_eq!(set, before);
    }

    #[test]
    fn test_reconcile_clear_uses_fixture_name() {
        let fixtures = Fixtures::new();
        let validator = FixtureReferenceValidator::new(&fixtures);
        let mut set = moved_extend_set();

        let cleared = validator
            .reconcile(&mut set, &[1, 2], ReferencePolicy::Clear)
            .unwrap();
        assert_eq!(
            cleared,
            vec![ClearedReference {
                step_id: 1,
                fixture_id: 1,
                fixture_type: FixtureType::Extend,
                order: 2,
            }]
        );

        let step = set.get(1).unwrap();
        assert_eq!(step.referenced_fixture_id, None);
        assert_eq!(step.action, "Login");
        assert_eq!(step.order, 2);
    }

    #[test]
    fn test_reconcile_ignores_untouched_steps() {
        let fixtures = Fixtures::new();
        let validator = FixtureReferenceValidator::new(&fixtures);
        let mut set = moved_extend_set();

        let cleared = validator
            .reconcile(&mut set, &[2], ReferencePolicy::Reject)
            .unwrap();
        assert!(cleared.is_empty());
    }
}
