//! Command definitions and their handlers.
//!
//! Every subcommand has a clap argument struct that converts into the
//! matching core parameter type with a `From` impl:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Casebook
//! ```
//!
//! Core parameter types stay free of clap derives; help text, aliases and
//! flag spelling live here.

use anyhow::{bail, Result};
use casebook_core::{
    display::CreateResult, models::FieldsPatch, params::*, Casebook, FixtureType, ParentKind,
    ParentRef, ReferencePolicy, StepDraft, StepPatch,
};
use clap::{Args, Subcommand, ValueEnum};

use crate::renderer::TerminalRenderer;

// ============================================================================
// Shared arguments
// ============================================================================

/// Selects the test case or fixture a step command works on.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct ParentArgs {
    /// ID of the test case
    #[arg(long)]
    pub case: Option<u64>,
    /// ID of the fixture
    #[arg(long)]
    pub fixture: Option<u64>,
}

impl ParentArgs {
    fn parent(&self) -> Result<ParentRef> {
        match (self.case, self.fixture) {
            (Some(id), None) => Ok(ParentRef::test_case(id)),
            (None, Some(id)) => Ok(ParentRef::fixture(id)),
            _ => bail!("Exactly one of --case or --fixture is required"),
        }
    }
}

/// How structural changes treat fixture references they invalidate.
#[derive(Args)]
pub struct PolicyArgs {
    /// Clear fixture references that no longer fit their position instead
    /// of failing
    #[arg(long)]
    pub clear_incompatible: bool,
}

impl From<PolicyArgs> for ReferencePolicy {
    fn from(val: PolicyArgs) -> Self {
        if val.clear_incompatible {
            ReferencePolicy::Clear
        } else {
            ReferencePolicy::Reject
        }
    }
}

/// Fixture type as accepted on the command line
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum FixtureTypeArg {
    /// May only be referenced by the first step
    Extend,
    /// May be referenced by any step after the first
    Inline,
}

impl From<FixtureTypeArg> for FixtureType {
    fn from(val: FixtureTypeArg) -> Self {
        match val {
            FixtureTypeArg::Extend => FixtureType::Extend,
            FixtureTypeArg::Inline => FixtureType::Inline,
        }
    }
}

// ============================================================================
// Test case and fixture commands
// ============================================================================

/// Create a new test case
#[derive(Args)]
pub struct CreateCaseArgs {
    /// Name of the test case
    pub name: String,
    #[arg(short, long, help = "Optional description of what the case covers")]
    pub description: Option<String>,
    #[arg(long, help = "Generated automation script")]
    pub script: Option<String>,
    #[command(flatten)]
    pub status: StatusArgs,
}

impl From<CreateCaseArgs> for CreateTestCase {
    fn from(val: CreateCaseArgs) -> Self {
        CreateTestCase {
            name: val.name,
            description: val.description,
            script: val.script,
            status: val.status.status,
            is_manual: val.status.manual,
            tags: val.status.tags,
        }
    }
}

/// Status, manual flag and tags given at creation
#[derive(Args)]
pub struct StatusArgs {
    #[arg(long, help = "Workflow status; defaults to pending")]
    pub status: Option<String>,
    #[arg(long, help = "Executed by hand rather than by a script")]
    pub manual: bool,
    #[arg(long, value_delimiter = ',', help = "Comma-separated tags")]
    pub tags: Vec<String>,
}

/// Create a new fixture
///
/// The fixture type is fixed once the fixture exists: `extend` fixtures can
/// only be referenced from the first step of a sequence, `inline` fixtures
/// from any later step.
#[derive(Args)]
pub struct CreateFixtureArgs {
    /// Name of the fixture
    pub name: String,
    #[arg(short = 't', long = "type", value_enum, default_value = "extend")]
    pub fixture_type: FixtureTypeArg,
    #[arg(short, long, help = "Optional description of what the fixture sets up")]
    pub description: Option<String>,
    #[arg(long, help = "Generated automation script")]
    pub script: Option<String>,
    #[arg(long, help = "Name used when exporting; defaults to the camel-cased name")]
    pub export_name: Option<String>,
    #[command(flatten)]
    pub status: StatusArgs,
}

impl From<CreateFixtureArgs> for CreateFixture {
    fn from(val: CreateFixtureArgs) -> Self {
        CreateFixture {
            name: val.name,
            description: val.description,
            script: val.script,
            status: val.status.status,
            is_manual: val.status.manual,
            tags: val.status.tags,
            fixture_type: val.fixture_type.into(),
            export_name: val.export_name,
        }
    }
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(help = "Unique identifier to show details for")]
    pub id: u64,
}

impl From<ShowArgs> for Id {
    fn from(val: ShowArgs) -> Self {
        Id { id: val.id }
    }
}

#[derive(Args)]
pub struct RenameArgs {
    pub id: u64,
    /// New name
    pub name: String,
}

/// Edit name, description, script, status, manual flag or tags
///
/// Only the given fields change. An empty `--description` or `--script`
/// clears it; `--tags ""` removes every tag.
#[derive(Args)]
pub struct UpdateArgs {
    pub id: u64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long)]
    pub script: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long, conflicts_with = "automated")]
    pub manual: bool,
    #[arg(long)]
    pub automated: bool,
    #[arg(long, value_delimiter = ',', help = "Comma-separated tags replacing the current ones")]
    pub tags: Option<Vec<String>>,
}

impl UpdateArgs {
    fn into_params(self, kind: ParentKind) -> UpdateParent {
        let is_manual = match (self.manual, self.automated) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        UpdateParent {
            parent: ParentRef { kind, id: self.id },
            patch: FieldsPatch {
                name: self.name,
                description: self.description,
                script: self.script,
                status: self.status,
                is_manual,
                tags: self.tags,
            },
        }
    }
}

#[derive(Args)]
pub struct VersionsArgs {
    pub id: u64,
}

/// Identifies one version of a test case or fixture
#[derive(Args)]
pub struct VersionArgs {
    pub id: u64,
    #[arg(help = "Version number as listed by the versions command")]
    pub version: u32,
}

/// Commands shared by test cases and fixtures.
#[derive(Subcommand)]
pub enum ParentCommands {
    /// List all entries
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show details and steps
    #[command(alias = "s")]
    Show(ShowArgs),
    /// Rename and record a version
    Rename(RenameArgs),
    /// Edit fields and record a version
    #[command(alias = "u")]
    Update(UpdateArgs),
    /// List the recorded versions
    #[command(alias = "v")]
    Versions(VersionsArgs),
    /// Show one recorded version with its steps
    Version(VersionArgs),
    /// Make a recorded version current again
    Restore(VersionArgs),
}

#[derive(Subcommand)]
pub enum CaseCommands {
    /// Create a new test case
    #[command(alias = "c")]
    Create(CreateCaseArgs),
    #[command(flatten)]
    Common(ParentCommands),
}

#[derive(Subcommand)]
pub enum FixtureCommands {
    /// Create a new fixture
    #[command(alias = "c")]
    Create(CreateFixtureArgs),
    #[command(flatten)]
    Common(ParentCommands),
}

// ============================================================================
// Step commands
// ============================================================================

/// Add a step
///
/// The step is appended unless `--position` is given, in which case the
/// steps at and after that position move down by one.
#[derive(Args)]
pub struct AddStepArgs {
    #[command(flatten)]
    pub parent: ParentArgs,
    /// What the tester does; may be omitted when referencing a fixture
    pub action: Option<String>,
    #[arg(long, help = "Test data used by the step")]
    pub data: Option<String>,
    #[arg(short, long, help = "Expected result")]
    pub expected: Option<String>,
    #[arg(long, help = "Generated automation script")]
    pub script: Option<String>,
    #[arg(long, help = "Keep the step but skip it when running")]
    pub disabled: bool,
    #[arg(long, value_name = "FIXTURE_ID", help = "Reference a fixture from this step")]
    pub use_fixture: Option<u64>,
    #[arg(short, long, help = "1-based position to insert at")]
    pub position: Option<u32>,
    #[command(flatten)]
    pub policy: PolicyArgs,
}

impl AddStepArgs {
    fn into_params(self) -> Result<AddStep> {
        Ok(AddStep {
            parent: self.parent.parent()?,
            step: StepDraft {
                action: self.action.unwrap_or_default(),
                data: self.data,
                expected: self.expected,
                script: self.script,
                disabled: self.disabled,
                referenced_fixture_id: self.use_fixture,
            },
            position: self.position,
            policy: self.policy.into(),
        })
    }
}

/// Edit a step
///
/// Only the given fields change. Passing an empty string for `--data`,
/// `--expected` or `--script` clears that field.
#[derive(Args)]
pub struct EditStepArgs {
    #[arg(help = "Unique identifier of the step to edit")]
    pub id: u64,
    #[arg(short, long)]
    pub action: Option<String>,
    #[arg(long)]
    pub data: Option<String>,
    #[arg(short, long)]
    pub expected: Option<String>,
    #[arg(long)]
    pub script: Option<String>,
    #[arg(long, conflicts_with = "enable")]
    pub disable: bool,
    #[arg(long)]
    pub enable: bool,
    #[arg(long, value_name = "FIXTURE_ID", conflicts_with = "no_fixture")]
    pub use_fixture: Option<u64>,
    #[arg(long, help = "Remove the fixture reference")]
    pub no_fixture: bool,
    #[arg(short, long, help = "Move the step to this 1-based position")]
    pub position: Option<u32>,
    #[command(flatten)]
    pub policy: PolicyArgs,
}

impl From<EditStepArgs> for EditStep {
    fn from(val: EditStepArgs) -> Self {
        let disabled = match (val.disable, val.enable) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        let referenced_fixture_id = match (val.use_fixture, val.no_fixture) {
            (Some(id), _) => Some(Some(id)),
            (None, true) => Some(None),
            (None, false) => None,
        };

        EditStep {
            step_id: val.id,
            patch: StepPatch {
                action: val.action,
                data: val.data,
                expected: val.expected,
                script: val.script,
                disabled,
                referenced_fixture_id,
                order: val.position,
            },
            policy: val.policy.into(),
        }
    }
}

#[derive(Args)]
pub struct DeleteStepArgs {
    #[arg(help = "Unique identifier of the step to delete")]
    pub id: u64,
    #[command(flatten)]
    pub policy: PolicyArgs,
}

impl From<DeleteStepArgs> for DeleteStep {
    fn from(val: DeleteStepArgs) -> Self {
        DeleteStep {
            step_id: val.id,
            policy: val.policy.into(),
        }
    }
}

/// Move a step to a new position
///
/// The steps in between shift by one to close the gap.
#[derive(Args)]
pub struct MoveStepArgs {
    #[arg(help = "Unique identifier of the step to move")]
    pub id: u64,
    #[arg(help = "1-based target position")]
    pub position: u32,
    #[command(flatten)]
    pub policy: PolicyArgs,
}

impl From<MoveStepArgs> for MoveStep {
    fn from(val: MoveStepArgs) -> Self {
        MoveStep {
            step_id: val.id,
            position: val.position,
            policy: val.policy.into(),
        }
    }
}

/// Renumber all steps as 1..N
#[derive(Args)]
pub struct ReorderArgs {
    #[command(flatten)]
    pub parent: ParentArgs,
    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(Args)]
pub struct ListStepsArgs {
    #[command(flatten)]
    pub parent: ParentArgs,
    #[arg(long, help = "List the steps captured by this version instead")]
    pub version: Option<u32>,
}

#[derive(Subcommand)]
pub enum StepCommands {
    /// List the steps of a test case or fixture
    #[command(aliases = ["l", "ls"])]
    List(ListStepsArgs),
    /// Add a step
    #[command(alias = "a")]
    Add(AddStepArgs),
    /// Edit a step
    #[command(alias = "e")]
    Edit(EditStepArgs),
    /// Delete a step
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteStepArgs),
    /// Move a step to a new position
    #[command(alias = "m")]
    Move(MoveStepArgs),
    /// Renumber all steps as 1..N
    Reorder(ReorderArgs),
}

// ============================================================================
// Handlers
// ============================================================================

/// Runs parsed commands against a [`Casebook`] and renders the results.
pub struct Cli {
    casebook: Casebook,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(casebook: Casebook, renderer: TerminalRenderer) -> Self {
        Self { casebook, renderer }
    }

    pub async fn handle_case_command(&self, command: CaseCommands) -> Result<()> {
        match command {
            CaseCommands::Create(args) => {
                let test_case = self.casebook.create_test_case(&args.into()).await?;
                self.renderer.render(&CreateResult::new(test_case))
            }
            CaseCommands::Common(command) => {
                self.handle_parent_command(ParentKind::TestCase, command)
                    .await
            }
        }
    }

    pub async fn handle_fixture_command(&self, command: FixtureCommands) -> Result<()> {
        match command {
            FixtureCommands::Create(args) => {
                let fixture = self.casebook.create_fixture(&args.into()).await?;
                self.renderer.render(&CreateResult::new(fixture))
            }
            FixtureCommands::Common(command) => {
                self.handle_parent_command(ParentKind::Fixture, command)
                    .await
            }
        }
    }

    async fn handle_parent_command(&self, kind: ParentKind, command: ParentCommands) -> Result<()> {
        let parent = |id| ParentRef { kind, id };

        match command {
            ParentCommands::List => match kind {
                ParentKind::TestCase => self.list_test_cases().await,
                ParentKind::Fixture => {
                    let fixtures = self.casebook.list_fixtures().await?;
                    self.renderer.render(&fixtures)
                }
            },
            ParentCommands::Show(args) => match kind {
                ParentKind::TestCase => {
                    let test_case = self.casebook.show_test_case(&args.into()).await?;
                    self.renderer.render(&test_case)
                }
                ParentKind::Fixture => {
                    let fixture = self.casebook.show_fixture(&args.into()).await?;
                    self.renderer.render(&fixture)
                }
            },
            ParentCommands::Rename(args) => {
                let outcome = self
                    .casebook
                    .rename_parent(&RenameParent {
                        parent: parent(args.id),
                        name: args.name,
                    })
                    .await?;
                self.renderer.render(&outcome)
            }
            ParentCommands::Update(args) => {
                let outcome = self.casebook.update_parent(&args.into_params(kind)).await?;
                self.renderer.render(&outcome)
            }
            ParentCommands::Versions(args) => {
                let versions = self.casebook.list_versions(parent(args.id)).await?;
                self.renderer.render(&versions)
            }
            ParentCommands::Version(args) => {
                let version = self
                    .casebook
                    .get_version(&VersionRef {
                        parent: parent(args.id),
                        version_number: args.version,
                    })
                    .await?;
                self.renderer.render(&version)
            }
            ParentCommands::Restore(args) => {
                let outcome = self
                    .casebook
                    .restore_version(&VersionRef {
                        parent: parent(args.id),
                        version_number: args.version,
                    })
                    .await?;
                self.renderer.render(&outcome)
            }
        }
    }

    pub async fn handle_step_command(&self, command: StepCommands) -> Result<()> {
        let outcome = match command {
            StepCommands::List(args) => {
                let parent = args.parent.parent()?;
                let steps = match args.version {
                    Some(version_number) => {
                        self.casebook
                            .get_version_steps(&VersionRef {
                                parent,
                                version_number,
                            })
                            .await?
                    }
                    None => self.casebook.get_steps(parent).await?,
                };
                return self.renderer.render(&steps);
            }
            StepCommands::Add(args) => self.casebook.add_step(&args.into_params()?).await?,
            StepCommands::Edit(args) => self.casebook.edit_step(&args.into()).await?,
            StepCommands::Delete(args) => self.casebook.delete_step(&args.into()).await?,
            StepCommands::Move(args) => self.casebook.move_step(&args.into()).await?,
            StepCommands::Reorder(args) => {
                self.casebook
                    .auto_reorder_all(&AutoReorder {
                        parent: args.parent.parent()?,
                        policy: args.policy.into(),
                    })
                    .await?
            }
        };
        self.renderer.render(&outcome)
    }

    pub async fn list_test_cases(&self) -> Result<()> {
        let test_cases = self.casebook.list_test_cases().await?;
        self.renderer.render(&test_cases)
    }
}
