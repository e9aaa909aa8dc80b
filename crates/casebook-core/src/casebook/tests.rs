//! Tests for the casebook facade.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc,
};

use tempfile::TempDir;

use super::*;
use crate::{
    fixture_rules::ReferencePolicy,
    models::{FieldsPatch, FixtureType, StepDraft, StepPatch},
    params::{
        AddStep, AutoReorder, CreateFixture, CreateTestCase, DeleteStep, EditStep, Id, MoveStep,
        RenameParent, UpdateParent, VersionRef,
    },
};

/// Helper function to create a test casebook
async fn create_test_casebook() -> (TempDir, Casebook) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let casebook = CasebookBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create casebook");
    (temp_dir, casebook)
}

async fn create_case(casebook: &Casebook, name: &str) -> ParentRef {
    casebook
        .create_test_case(&CreateTestCase {
            name: name.to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create test case")
        .parent_ref()
}

fn append(parent: ParentRef, action: &str) -> AddStep {
    AddStep {
        parent,
        step: StepDraft::with_action(action),
        position: None,
        policy: ReferencePolicy::Reject,
    }
}

#[tokio::test]
async fn test_builder_creates_nested_directories() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("a").join("b").join("casebook.db");
    let casebook = CasebookBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .unwrap();
    assert!(db_path.exists());
    assert_eq!(casebook.database_path(), db_path.as_path());
}

#[tokio::test]
async fn test_create_and_show() {
    let (_temp_dir, casebook) = create_test_casebook().await;

    let parent = create_case(&casebook, "  Login  ").await;
    casebook.add_step(&append(parent, "Open page")).await.unwrap();

    let test_case = casebook.show_test_case(&Id { id: parent.id }).await.unwrap();
    assert_eq!(test_case.fields.name, "Login");
    assert_eq!(test_case.steps.len(), 1);

    let fixture = casebook
        .create_fixture(&CreateFixture {
            name: "Seed users".to_string(),
            fixture_type: FixtureType::Inline,
            ..Default::default()
        })
        .await
        .unwrap();
    let shown = casebook.show_fixture(&Id { id: fixture.id }).await.unwrap();
    assert_eq!(shown.fixture_type, FixtureType::Inline);
    assert_eq!(shown.export_name, "seedUsers");

    assert_eq!(casebook.list_test_cases().await.unwrap().len(), 1);
    assert_eq!(casebook.list_fixtures().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_show_missing_parents() {
    let (_temp_dir, casebook) = create_test_casebook().await;
    let error = casebook.show_test_case(&Id { id: 99 }).await.unwrap_err();
    assert!(error.is_not_found());
    let error = casebook.show_fixture(&Id { id: 99 }).await.unwrap_err();
    assert!(error.is_not_found());
}

#[tokio::test]
async fn test_step_lifecycle_versions() {
    let (_temp_dir, casebook) = create_test_casebook().await;
    let parent = create_case(&casebook, "Checkout").await;

    let first = casebook
        .add_step(&append(parent, "Open cart"))
        .await
        .unwrap()
        .step
        .unwrap();
    casebook.add_step(&append(parent, "Pay")).await.unwrap();

    casebook
        .edit_step(&EditStep {
            step_id: first.id,
            patch: StepPatch {
                expected: Some("Cart shows one item".to_string()),
                ..Default::default()
            },
            policy: ReferencePolicy::Reject,
        })
        .await
        .unwrap();
    casebook
        .move_step(&MoveStep {
            step_id: first.id,
            position: 2,
            policy: ReferencePolicy::Reject,
        })
        .await
        .unwrap();
    casebook
        .rename_parent(&RenameParent {
            parent,
            name: "Checkout flow".to_string(),
        })
        .await
        .unwrap();
    casebook
        .delete_step(&DeleteStep {
            step_id: first.id,
            policy: ReferencePolicy::Reject,
        })
        .await
        .unwrap();

    let versions = casebook.list_versions(parent).await.unwrap();
    let reasons: Vec<&str> = versions.iter().map(|v| v.reason.as_str()).collect();
    assert_eq!(
        reasons,
        vec![
            "Added step: Open cart",
            "Added step: Pay",
            "Updated step: Open cart",
            "Moved step: Open cart to position 2",
            "Renamed from Checkout to Checkout flow",
            "Deleted step: Open cart",
        ]
    );

    let version = casebook
        .get_version(&VersionRef {
            parent,
            version_number: 4,
        })
        .await
        .unwrap();
    assert_eq!(version.label(), "1.3.0");
    assert_eq!(version.steps[1].id, first.id);
}

#[tokio::test]
async fn test_auto_reorder_dense_set_is_noop() {
    let (_temp_dir, casebook) = create_test_casebook().await;
    let parent = create_case(&casebook, "Login").await;
    casebook.add_step(&append(parent, "A")).await.unwrap();

    let outcome = casebook
        .auto_reorder_all(&AutoReorder {
            parent,
            policy: ReferencePolicy::Reject,
        })
        .await
        .unwrap();
    assert!(!outcome.is_change());
    assert_eq!(casebook.list_versions(parent).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_restore_through_facade() {
    let (_temp_dir, casebook) = create_test_casebook().await;
    let parent = create_case(&casebook, "Login").await;
    casebook.add_step(&append(parent, "A")).await.unwrap();
    casebook.add_step(&append(parent, "B")).await.unwrap();

    let v1 = VersionRef {
        parent,
        version_number: 1,
    };
    let captured = casebook.get_version_steps(&v1).await.unwrap();
    casebook.restore_version(&v1).await.unwrap();

    let current = casebook.get_steps(parent).await.unwrap();
    assert_eq!(current.0, captured.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_keep_sequence_dense() {
    let (_temp_dir, casebook) = create_test_casebook().await;
    let parent = create_case(&casebook, "Busy").await;

    let mut handles = Vec::new();
    for index in 0..8 {
        let casebook = casebook.clone();
        handles.push(tokio::spawn(async move {
            let params = AddStep {
                parent,
                step: StepDraft::with_action(format!("Step {index}")),
                position: Some(1),
                policy: ReferencePolicy::Reject,
            };
            casebook.add_step(&params).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let steps = casebook.get_steps(parent).await.unwrap();
    let orders: Vec<u32> = steps.iter().map(|s| s.order).collect();
    assert_eq!(orders, (1..=8).collect::<Vec<u32>>());

    let versions = casebook.list_versions(parent).await.unwrap();
    let numbers: Vec<u32> = versions.iter().map(|v| v.version_number).collect();
    assert_eq!(numbers, (1..=8).collect::<Vec<u32>>());
}

#[tokio::test]
async fn test_update_parent_and_restore_fields() {
    let (_temp_dir, casebook) = create_test_casebook().await;
    let test_case = casebook
        .create_test_case(&CreateTestCase {
            name: "Login".to_string(),
            description: Some("Happy path".to_string()),
            tags: vec![" smoke ".to_string()],
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(test_case.fields.status, "pending");
    assert_eq!(test_case.fields.tags, vec!["smoke"]);
    let parent = test_case.parent_ref();
    casebook.add_step(&append(parent, "Open page")).await.unwrap();

    let update = UpdateParent {
        parent,
        patch: FieldsPatch {
            description: Some("Locked account".to_string()),
            is_manual: Some(true),
            ..Default::default()
        },
    };
    let outcome = casebook.update_parent(&update).await.unwrap();
    assert_eq!(
        outcome.version.unwrap().reason,
        "Updated description, manual flag"
    );
    assert!(!casebook.update_parent(&update).await.unwrap().is_change());

    casebook
        .restore_version(&VersionRef {
            parent,
            version_number: 1,
        })
        .await
        .unwrap();
    let restored = casebook.show_test_case(&Id { id: parent.id }).await.unwrap();
    assert_eq!(restored.fields.description.as_deref(), Some("Happy path"));
    assert!(!restored.fields.is_manual);
    assert_eq!(restored.steps.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancelled_write_holds_lock_until_operation_returns() {
    let (_temp_dir, casebook) = create_test_casebook().await;
    let parent = create_case(&casebook, "Login").await;

    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let finished = Arc::new(AtomicBool::new(false));

    let first = {
        let casebook = casebook.clone();
        let finished = Arc::clone(&finished);
        tokio::spawn(async move {
            casebook
                .write(parent, move |_controller| {
                    let _ = started_tx.send(());
                    let _ = release_rx.recv();
                    finished.store(true, Ordering::SeqCst);
                    Ok(())
                })
                .await
        })
    };

    task::spawn_blocking(move || started_rx.recv())
        .await
        .unwrap()
        .unwrap();
    first.abort();
    assert!(first.await.unwrap_err().is_cancelled());

    let second = {
        let casebook = casebook.clone();
        let finished = Arc::clone(&finished);
        tokio::spawn(async move {
            casebook
                .write(parent, move |_controller| Ok(finished.load(Ordering::SeqCst)))
                .await
        })
    };
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert!(!second.is_finished());

    release_tx.send(()).unwrap();
    assert!(
        second.await.unwrap().unwrap(),
        "the second write must wait for the cancelled one to return"
    );
}
