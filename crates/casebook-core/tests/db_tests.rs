use casebook_core::{
    store::{FixtureLookup, ParentStore},
    CasebookError, Database, FixtureType, OrderedStepSet, ParentController, ParentFields,
    ParentRef, ReferencePolicy, StepDraft,
};
use jiff::Timestamp;
use rusqlite::{params, Connection};
use tempfile::NamedTempFile;

/// Helper function to create a temporary database for testing
fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

/// Writes steps the way an older release did: unordered gaps and no
/// versions.
fn insert_legacy_steps(path: &std::path::Path, test_case_id: u64, orders: &[(u64, u32)]) {
    let conn = Connection::open(path).expect("Failed to open raw connection");
    let now = Timestamp::now().to_string();
    for &(id, order) in orders {
        conn.execute(
            "INSERT INTO steps (id, test_case_id, step_order, action, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![id as i64, test_case_id as i64, order, format!("Legacy {id}"), now],
        )
        .expect("Failed to insert legacy step");
    }
    let highest = orders.iter().map(|&(id, _)| id).max().unwrap_or(0);
    conn.execute(
        "UPDATE id_sequences SET value = ?1 WHERE name = 'steps'",
        params![highest as i64],
    )
    .expect("Failed to bump step sequence");
}

#[test]
fn test_database_initialization() {
    let (temp_file, _db) = create_test_db();
    assert!(temp_file.path().exists());
}

#[test]
fn test_reopening_keeps_data() {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let id = {
        let mut db = Database::new(temp_file.path()).expect("Failed to open database");
        db.create_test_case(&ParentFields::new("Persisted"), Timestamp::now())
            .expect("Failed to create test case")
            .id
    };

    let db = Database::new(temp_file.path()).expect("Failed to reopen database");
    let case = db.load_test_case(id).expect("Failed to load test case");
    assert_eq!(case.fields.name, "Persisted");
}

#[test]
fn test_create_and_list_parents() {
    let (_temp_file, mut db) = create_test_db();
    let now = Timestamp::now();

    db.create_test_case(&ParentFields::new("Case 1"), now)
        .expect("Failed to create case 1");
    db.create_test_case(&ParentFields::new("Case 2"), now)
        .expect("Failed to create case 2");
    let fixture = db
        .create_fixture(
            &ParentFields::new("Logged in"),
            FixtureType::Inline,
            "loggedIn",
            now,
        )
        .expect("Failed to create fixture");

    assert_eq!(db.list_test_cases().unwrap().len(), 2);
    let fixtures = db.list_fixtures().unwrap();
    assert_eq!(fixtures.len(), 1);
    assert_eq!(fixtures[0].export_name, "loggedIn");
    assert_eq!(
        db.fixture_type(fixture.id).unwrap(),
        FixtureType::Inline
    );
}

#[test]
fn test_load_missing_parent() {
    let (_temp_file, db) = create_test_db();

    assert!(matches!(
        db.load(ParentRef::test_case(42)),
        Err(CasebookError::TestCaseNotFound { id: 42 })
    ));
    assert!(matches!(
        db.load(ParentRef::fixture(42)),
        Err(CasebookError::FixtureNotFound { id: 42 })
    ));
    assert!(matches!(
        db.parent_of_step(42),
        Err(CasebookError::StepNotFound { id: 42 })
    ));
}

#[test]
fn test_steps_of_different_parents_do_not_mix() {
    let (_temp_file, db) = create_test_db();
    let mut controller = ParentController::new(db);

    let case = controller
        .create_test_case(ParentFields::new("Case"))
        .unwrap()
        .parent_ref();
    let fixture = controller
        .create_fixture(ParentFields::new("Setup"), FixtureType::Extend, None)
        .unwrap()
        .parent_ref();

    for parent in [case, fixture] {
        for action in ["First", "Second"] {
            controller
                .add_step(parent, StepDraft::with_action(action), None, ReferencePolicy::Reject)
                .unwrap();
        }
    }

    let db = controller.into_store();
    for parent in [case, fixture] {
        let steps = db.get_steps(parent).unwrap();
        assert_eq!(steps.len(), 2);
        assert!(steps.iter().all(|step| step.parent == parent));
        assert_eq!(steps[0].order, 1);
        assert_eq!(steps[1].order, 2);
    }
}

#[test]
fn test_versions_cannot_be_rewritten() {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let mut controller =
        ParentController::new(Database::new(temp_file.path()).expect("Failed to open database"));
    let case = controller
        .create_test_case(ParentFields::new("Case"))
        .unwrap()
        .parent_ref();
    controller
        .add_step(case, StepDraft::with_action("Open"), None, ReferencePolicy::Reject)
        .unwrap();

    let conn = Connection::open(temp_file.path()).unwrap();
    assert!(conn
        .execute("UPDATE versions SET reason = 'tampered'", [])
        .is_err());
    assert!(conn.execute("DELETE FROM versions", []).is_err());

    let versions = controller.list_versions(case).unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].reason, "Added step: Open");
}

#[test]
fn test_legacy_gaps_load_as_non_dense() {
    let (temp_file, mut db) = create_test_db();
    let case = db
        .create_test_case(&ParentFields::new("Legacy"), Timestamp::now())
        .unwrap();
    insert_legacy_steps(temp_file.path(), case.id, &[(1, 9), (2, 2), (3, 5)]);

    let loaded = db.load(case.parent_ref()).unwrap();
    assert!(!loaded.steps.is_dense());
    assert_eq!(loaded.steps.orders(), vec![(2, 2), (3, 5), (1, 9)]);
    assert!(loaded.ledger.is_empty());
}

#[test]
fn test_auto_reorder_compacts_legacy_gaps() {
    let (temp_file, mut db) = create_test_db();
    let case = db
        .create_test_case(&ParentFields::new("Legacy"), Timestamp::now())
        .unwrap();
    insert_legacy_steps(temp_file.path(), case.id, &[(1, 9), (2, 2), (3, 5)]);

    let mut controller = ParentController::new(db);
    let outcome = controller
        .auto_reorder_all(case.parent_ref(), ReferencePolicy::Reject)
        .unwrap();

    let version = outcome.version.expect("compaction should be recorded");
    assert_eq!(version.reason, "Auto-reordered steps");
    let stored: Vec<(u64, u32)> = controller
        .list_steps(case.parent_ref())
        .unwrap()
        .iter()
        .map(|step| (step.id, step.order))
        .collect();
    assert_eq!(stored, vec![(2, 1), (3, 2), (1, 3)]);

    // Already dense now.
    let again = controller
        .auto_reorder_all(case.parent_ref(), ReferencePolicy::Reject)
        .unwrap();
    assert!(again.version.is_none());
}

#[test]
fn test_move_on_legacy_gaps_uses_positions() {
    let (temp_file, mut db) = create_test_db();
    let case = db
        .create_test_case(&ParentFields::new("Legacy"), Timestamp::now())
        .unwrap();
    insert_legacy_steps(temp_file.path(), case.id, &[(1, 10), (2, 20), (3, 30)]);

    let mut controller = ParentController::new(db);
    controller
        .move_step(3, 1, ReferencePolicy::Reject)
        .unwrap();

    let stored = controller.list_steps(case.parent_ref()).unwrap();
    let set = OrderedStepSet::from_steps(stored).expect("orders should be dense");
    assert_eq!(set.orders(), vec![(3, 1), (1, 2), (2, 3)]);

    let new_step = controller
        .add_step(
            case.parent_ref(),
            StepDraft::with_action("Fresh"),
            None,
            ReferencePolicy::Reject,
        )
        .unwrap()
        .step
        .unwrap();
    assert_eq!(new_step.id, 4);
    assert_eq!(new_step.order, 4);
}
