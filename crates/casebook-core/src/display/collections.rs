//! Collection wrapper types for displaying groups of domain objects.

use std::{fmt, ops::Index};

use super::datetime::LocalDateTime;
use crate::models::{Fixture, Step, TestCase, Version};

/// Newtype plumbing shared by the collection wrappers.
macro_rules! collection {
    ($(#[$meta:meta])* $name:ident, $item:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(pub Vec<$item>);

        impl $name {
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn get(&self, index: usize) -> Option<&$item> {
                self.0.get(index)
            }

            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.0.iter()
            }
        }

        impl Index<usize> for $name {
            type Output = $item;

            fn index(&self, index: usize) -> &Self::Output {
                &self.0[index]
            }
        }

        impl IntoIterator for $name {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<Self::Item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

collection!(
    /// Steps of one parent in order.
    Steps,
    Step
);

collection!(
    /// Test cases listed without their steps.
    TestCases,
    TestCase
);

collection!(
    /// Fixtures listed without their steps.
    Fixtures,
    Fixture
);

collection!(
    /// Version history of one parent, oldest first.
    ///
    /// ```rust
    /// use casebook_core::display::Versions;
    ///
    /// assert_eq!(Versions(vec![]).to_string(), "No versions recorded.\n");
    /// ```
    Versions,
    Version
);

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No steps found.")
        } else {
            for step in &self.0 {
                write!(f, "{step}")?;
            }
            Ok(())
        }
    }
}

impl fmt::Display for TestCases {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No test cases found.");
        }
        for test_case in &self.0 {
            writeln!(f, "## {} (ID: {})", test_case.fields.name, test_case.id)?;
            writeln!(f)?;
            if let Some(description) = &test_case.fields.description {
                writeln!(f, "- **Description**: {description}")?;
            }
            writeln!(f, "- **Status**: {}", test_case.fields.status)?;
            if !test_case.fields.tags.is_empty() {
                writeln!(f, "- **Tags**: {}", test_case.fields.tags.join(", "))?;
            }
            writeln!(
                f,
                "- **Updated**: {}",
                LocalDateTime::new(&test_case.updated_at)
            )?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Fixtures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No fixtures found.");
        }
        for fixture in &self.0 {
            writeln!(
                f,
                "## {} (ID: {}, {})",
                fixture.fields.name, fixture.id, fixture.fixture_type
            )?;
            writeln!(f)?;
            writeln!(f, "- **Export name**: `{}`", fixture.export_name)?;
            if let Some(description) = &fixture.fields.description {
                writeln!(f, "- **Description**: {description}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Versions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No versions recorded.");
        }
        writeln!(f, "| # | Version | Reason | Steps | Created |")?;
        writeln!(f, "|---|---------|--------|-------|---------|")?;
        for version in &self.0 {
            writeln!(
                f,
                "| {} | {} | {} | {} | {} |",
                version.version_number,
                version.label(),
                version.reason.replace('|', "\\|"),
                version.step_count(),
                LocalDateTime::new(&version.created_at)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::{ParentFields, ParentRef};

    fn create_test_version(version_number: u32, reason: &str) -> Version {
        Version {
            parent: ParentRef::test_case(1),
            version_number,
            reason: reason.to_string(),
            created_at: Timestamp::from_second(1640995200).unwrap(),
            fields: ParentFields::new("Login"),
            steps: vec![],
        }
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(Steps(vec![]).to_string(), "No steps found.\n");
        assert_eq!(TestCases(vec![]).to_string(), "No test cases found.\n");
        assert_eq!(Fixtures(vec![]).to_string(), "No fixtures found.\n");
    }

    #[test]
    fn test_versions_table() {
        let versions = Versions(vec![
            create_test_version(1, "Added step: Open page"),
            create_test_version(2, "Renamed from a|b to c"),
        ]);
        let output = versions.to_string();
        assert!(output.starts_with("| # | Version |"));
        assert!(output.contains("| 1 | 1.0.0 | Added step: Open page | 0 |"));
        assert!(output.contains("Renamed from a\\|b to c"));
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[1].version_number, 2);
    }

    #[test]
    fn test_test_cases_display() {
        let test_case = TestCase {
            id: 5,
            fields: ParentFields {
                name: "Checkout".to_string(),
                description: Some("Buy one item".to_string()),
                script: None,
                status: "ready".to_string(),
                is_manual: false,
                tags: vec!["smoke".to_string(), "payments".to_string()],
            },
            created_at: Timestamp::from_second(1640995200).unwrap(),
            updated_at: Timestamp::from_second(1640995200).unwrap(),
            steps: vec![],
        };
        let output = TestCases(vec![test_case]).to_string();
        assert!(output.contains("## Checkout (ID: 5)"));
        assert!(output.contains("- **Description**: Buy one item"));
        assert!(output.contains("- **Status**: ready"));
        assert!(output.contains("- **Tags**: smoke, payments"));
    }
}
