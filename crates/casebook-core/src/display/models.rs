//! Display implementations for domain models.
//!
//! All output is markdown so the CLI can render it through termimad or print
//! it plainly.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    fixture_rules::{ClearedReference, ReferencePolicy},
    models::{Fixture, FixtureType, ParentFields, ParentKind, ParentRef, Step, TestCase, Version},
};

impl fmt::Display for FixtureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ParentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl fmt::Display for ReferencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferencePolicy::Reject => f.write_str("reject"),
            ReferencePolicy::Clear => f.write_str("clear"),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "### {}. {} (ID: {})", self.order, self.action, self.id)?;
        if self.disabled {
            write!(f, " *disabled*")?;
        }
        writeln!(f)?;
        writeln!(f)?;

        if let Some(fixture_id) = self.referenced_fixture_id {
            writeln!(f, "- Fixture: {fixture_id}")?;
            writeln!(f)?;
        }

        if let Some(data) = &self.data {
            writeln!(f, "#### Data")?;
            writeln!(f)?;
            writeln!(f, "{data}")?;
            writeln!(f)?;
        }

        if let Some(expected) = &self.expected {
            writeln!(f, "#### Expected")?;
            writeln!(f)?;
            writeln!(f, "{expected}")?;
            writeln!(f)?;
        }

        if let Some(script) = &self.script {
            writeln!(f, "#### Script")?;
            writeln!(f)?;
            writeln!(f, "```")?;
            writeln!(f, "{script}")?;
            writeln!(f, "```")?;
            writeln!(f)?;
        }

        Ok(())
    }
}

fn fmt_steps(f: &mut fmt::Formatter<'_>, parent: ParentRef, steps: &[Step]) -> fmt::Result {
    if steps.is_empty() {
        writeln!(f, "\nNo steps in this {}.", parent.kind)
    } else {
        writeln!(f, "\n## Steps")?;
        writeln!(f)?;
        for step in steps {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.fields.name)?;
        writeln!(f)?;
        fmt_status(f, &self.fields)?;
        writeln!(f, "- Created: {}", LocalDateTime::new(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime::new(&self.updated_at))?;

        if let Some(description) = &self.fields.description {
            writeln!(f)?;
            writeln!(f, "{description}")?;
        }

        fmt_steps(f, self.parent_ref(), &self.steps)
    }
}

impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.fields.name)?;
        writeln!(f)?;
        writeln!(f, "- Type: {}", self.fixture_type)?;
        writeln!(f, "- Export name: `{}`", self.export_name)?;
        fmt_status(f, &self.fields)?;
        writeln!(f, "- Created: {}", LocalDateTime::new(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime::new(&self.updated_at))?;

        if let Some(description) = &self.fields.description {
            writeln!(f)?;
            writeln!(f, "{description}")?;
        }

        fmt_steps(f, self.parent_ref(), &self.steps)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "# Version {} of {} (#{})",
            self.label(),
            self.parent,
            self.version_number
        )?;
        writeln!(f)?;
        writeln!(f, "- Reason: {}", self.reason)?;
        writeln!(f, "- Name: {}", self.fields.name)?;
        fmt_status(f, &self.fields)?;
        writeln!(f, "- Created: {}", LocalDateTime::new(&self.created_at))?;

        if let Some(description) = &self.fields.description {
            writeln!(f)?;
            writeln!(f, "{description}")?;
        }

        fmt_steps(f, self.parent, &self.steps)
    }
}

/// Status line plus the manual flag and tags when set.
fn fmt_status(f: &mut fmt::Formatter<'_>, fields: &ParentFields) -> fmt::Result {
    writeln!(f, "- Status: {}", fields.status)?;
    if fields.is_manual {
        writeln!(f, "- Manual: yes")?;
    }
    if !fields.tags.is_empty() {
        writeln!(f, "- Tags: {}", fields.tags.join(", "))?;
    }
    Ok(())
}

impl fmt::Display for ClearedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cleared {} fixture {} from step {} (now at position {})",
            self.fixture_type, self.fixture_id, self.step_id, self.order
        )
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::ParentFields;

    fn create_test_step() -> Step {
        Step {
            id: 12,
            parent: ParentRef::test_case(1),
            order: 2,
            action: "Submit the form".to_string(),
            data: Some("name=alice".to_string()),
            expected: None,
            script: Some("await page.click('#submit');".to_string()),
            disabled: true,
            referenced_fixture_id: Some(4),
            created_at: Timestamp::from_second(1640995200).unwrap(),
            updated_at: Timestamp::from_second(1640995200).unwrap(),
        }
    }

    #[test]
    fn test_step_display() {
        let output = create_test_step().to_string();
        assert!(output.starts_with("### 2. Submit the form (ID: 12) *disabled*"));
        assert!(output.contains("- Fixture: 4"));
        assert!(output.contains("#### Data"));
        assert!(!output.contains("#### Expected"));
        assert!(output.contains("```\nawait page.click('#submit');\n```"));
    }

    #[test]
    fn test_fixture_display() {
        let fixture = Fixture {
            id: 3,
            fields: ParentFields::new("Login"),
            fixture_type: FixtureType::Inline,
            export_name: "login".to_string(),
            created_at: Timestamp::from_second(1640995200).unwrap(),
            updated_at: Timestamp::from_second(1640995200).unwrap(),
            steps: vec![],
        };
        let output = fixture.to_string();
        assert!(output.contains("# 3. Login"));
        assert!(output.contains("- Type: inline"));
        assert!(output.contains("- Status: pending"));
        assert!(!output.contains("- Manual"));
        assert!(!output.contains("- Tags"));
        assert!(output.contains("No steps in this fixture."));
    }

    #[test]
    fn test_version_display() {
        let mut fields = ParentFields::new("Checkout");
        fields.is_manual = true;
        fields.tags = vec!["smoke".to_string()];
        let version = Version {
            parent: ParentRef::test_case(1),
            version_number: 2,
            reason: "Moved step: Submit the form to position 2".to_string(),
            created_at: Timestamp::from_second(1640995200).unwrap(),
            fields,
            steps: vec![create_test_step()],
        };
        let output = version.to_string();
        assert!(output.starts_with("# Version 1.1.0 of test case 1 (#2)"));
        assert!(output.contains("- Reason: Moved step: Submit the form to position 2"));
        assert!(output.contains("- Manual: yes"));
        assert!(output.contains("- Tags: smoke"));
        assert!(output.contains("## Steps"));
    }
}
