//! Test case and fixture operations.

use log::info;

use super::Casebook;
use crate::{
    controller::MutationOutcome,
    display::{Fixtures, TestCases},
    error::Result,
    models::{normalize_tags, Fixture, ParentFields, TestCase, DEFAULT_STATUS},
    params::{CreateFixture, CreateTestCase, Id, RenameParent, UpdateParent},
};

impl Casebook {
    /// Creates a test case. Creation records no version; the first change
    /// to the test case becomes version 1.
    pub async fn create_test_case(&self, params: &CreateTestCase) -> Result<TestCase> {
        let fields = ParentFields {
            name: params.name.trim().to_string(),
            description: params.description.clone(),
            script: params.script.clone(),
            status: initial_status(params.status.as_deref()),
            is_manual: params.is_manual,
            tags: normalize_tags(params.tags.iter().cloned()),
        };

        let test_case = self
            .run(move |controller| controller.create_test_case(fields))
            .await?;
        info!("Created test case {}", test_case.id);
        Ok(test_case)
    }

    /// Creates a fixture. Its type cannot be changed afterwards.
    pub async fn create_fixture(&self, params: &CreateFixture) -> Result<Fixture> {
        let fields = ParentFields {
            name: params.name.trim().to_string(),
            description: params.description.clone(),
            script: params.script.clone(),
            status: initial_status(params.status.as_deref()),
            is_manual: params.is_manual,
            tags: normalize_tags(params.tags.iter().cloned()),
        };
        let fixture_type = params.fixture_type;
        let export_name = params.export_name.clone();

        let fixture = self
            .run(move |controller| {
                controller.create_fixture(fields, fixture_type, export_name)
            })
            .await?;
        info!("Created {} fixture {}", fixture.fixture_type, fixture.id);
        Ok(fixture)
    }

    pub async fn list_test_cases(&self) -> Result<TestCases> {
        self.run(|controller| controller.list_test_cases())
            .await
            .map(TestCases)
    }

    pub async fn list_fixtures(&self) -> Result<Fixtures> {
        self.run(|controller| controller.list_fixtures())
            .await
            .map(Fixtures)
    }

    /// Retrieves a test case with its steps.
    pub async fn show_test_case(&self, params: &Id) -> Result<TestCase> {
        let id = params.id;
        self.run(move |controller| controller.load_test_case(id))
            .await
    }

    /// Retrieves a fixture with its steps.
    pub async fn show_fixture(&self, params: &Id) -> Result<Fixture> {
        let id = params.id;
        self.run(move |controller| controller.load_fixture(id))
            .await
    }

    /// Renames a test case or fixture.
    pub async fn rename_parent(&self, params: &RenameParent) -> Result<MutationOutcome> {
        let parent = params.parent;
        let name = params.name.clone();
        self.write(parent, move |controller| {
            controller.rename_parent(parent, &name)
        })
        .await
    }

    /// Edits the scalar fields of a test case or fixture. Every effective
    /// change records a version; a patch that changes nothing records none.
    pub async fn update_parent(&self, params: &UpdateParent) -> Result<MutationOutcome> {
        let parent = params.parent;
        let patch = params.patch.clone();
        self.write(parent, move |controller| {
            controller.update_parent(parent, &patch)
        })
        .await
    }
}

fn initial_status(status: Option<&str>) -> String {
    status.map_or_else(|| DEFAULT_STATUS.to_string(), |s| s.trim().to_string())
}
