#![allow(dead_code)]

use casebook_core::{
    params::{AddStep, CreateFixture, CreateTestCase},
    Casebook, CasebookBuilder, FixtureType, ParentRef, ReferencePolicy, Step, StepDraft,
};
use tempfile::TempDir;

/// Helper function to create a test casebook
pub async fn create_test_casebook() -> (TempDir, Casebook) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let casebook = CasebookBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create casebook");
    (temp_dir, casebook)
}

pub async fn create_case(casebook: &Casebook, name: &str) -> ParentRef {
    casebook
        .create_test_case(&CreateTestCase {
            name: name.to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create test case")
        .parent_ref()
}

pub async fn create_fixture(casebook: &Casebook, name: &str, fixture_type: FixtureType) -> u64 {
    casebook
        .create_fixture(&CreateFixture {
            name: name.to_string(),
            fixture_type,
            ..Default::default()
        })
        .await
        .expect("Failed to create fixture")
        .id
}

pub async fn add(casebook: &Casebook, parent: ParentRef, step: StepDraft) -> Step {
    casebook
        .add_step(&AddStep {
            parent,
            step,
            position: None,
            policy: ReferencePolicy::Reject,
        })
        .await
        .expect("Failed to add step")
        .step
        .expect("Added step missing from outcome")
}

pub async fn orders(casebook: &Casebook, parent: ParentRef) -> Vec<(u64, u32)> {
    casebook
        .get_steps(parent)
        .await
        .expect("Failed to get steps")
        .iter()
        .map(|step| (step.id, step.order))
        .collect()
}

/// Asserts the stored orders are exactly `1..=N`.
pub async fn assert_dense(casebook: &Casebook, parent: ParentRef) {
    let orders: Vec<u32> = orders(casebook, parent)
        .await
        .into_iter()
        .map(|(_, order)| order)
        .collect();
    let expected: Vec<u32> = (1..=orders.len() as u32).collect();
    assert_eq!(orders, expected, "orders are not dense");
}
