#[cfg(test)]
mod model_tests {
    use jiff::Timestamp;

    use crate::models::{
        default_export_name, FieldsPatch, FixtureType, ParentFields, ParentKind, ParentRef, Step,
        StepDraft, StepPatch, Version, DEFAULT_STATUS,
    };

    fn create_test_step() -> Step {
        Step {
            id: 123,
            parent: ParentRef::test_case(456),
            order: 2,
            action: "Click the login button".to_string(),
            data: Some("admin / secret".to_string()),
            expected: Some("Dashboard is shown".to_string()),
            script: None,
            disabled: false,
            referenced_fixture_id: None,
            created_at: Timestamp::from_second(1640995200).unwrap(), // 2022-01-01 00:00:00 UTC
            updated_at: Timestamp::from_second(1641081600).unwrap(), // 2022-01-02 00:00:00 UTC
        }
    }

    #[test]
    fn test_fixture_type_parsing() {
        assert_eq!("extend".parse::<FixtureType>(), Ok(FixtureType::Extend));
        assert_eq!(" INLINE ".parse::<FixtureType>(), Ok(FixtureType::Inline));
        assert!("data".parse::<FixtureType>().is_err());
        assert_eq!(FixtureType::Inline.as_str(), "inline");
    }

    #[test]
    fn test_parent_kind_round_trip() {
        for kind in [ParentKind::TestCase, ParentKind::Fixture] {
            assert_eq!(kind.as_str().parse::<ParentKind>(), Ok(kind));
        }
        assert!("plan".parse::<ParentKind>().is_err());
    }

    #[test]
    fn test_parent_ref_not_found_matches_kind() {
        assert!(matches!(
            ParentRef::test_case(4).not_found(),
            crate::CasebookError::TestCaseNotFound { id: 4 }
        ));
        assert!(matches!(
            ParentRef::fixture(5).not_found(),
            crate::CasebookError::FixtureNotFound { id: 5 }
        ));
    }

    #[test]
    fn test_parent_fields_reject_blank_name() {
        assert!(ParentFields::new("Login").validate().is_ok());
        assert!(ParentFields::new("   ").validate().is_err());
    }

    #[test]
    fn test_draft_requires_action_or_reference() {
        assert!(StepDraft::with_action("Open page").validate().is_ok());
        assert!(StepDraft::with_fixture(9).validate().is_ok());
        assert!(StepDraft::with_action("  ").validate().is_err());
    }

    #[test]
    fn test_patch_apply_content() {
        let step = create_test_step();
        let patch = StepPatch {
            action: Some("Submit the form".to_string()),
            data: Some(String::new()),
            disabled: Some(true),
            ..Default::default()
        };

        let updated = patch.apply_content(&step);
        assert_eq!(updated.action, "Submit the form");
        assert_eq!(updated.data, None, "blank text clears the field");
        assert_eq!(updated.expected, step.expected);
        assert!(updated.disabled);
        assert_eq!(updated.order, step.order);
        assert!(!updated.same_content(&step));
    }

    #[test]
    fn test_patch_trims_action() {
        let step = create_test_step();
        let patch = StepPatch {
            action: Some("  Click the login button \n".to_string()),
            ..Default::default()
        };

        let updated = patch.apply_content(&step);
        assert_eq!(updated.action, "Click the login button");
        assert!(updated.same_content(&step), "padding alone is not an edit");
    }

    #[test]
    fn test_fields_patch_apply() {
        let mut fields = ParentFields::new("Login");
        fields.description = Some("Happy path".to_string());
        fields.script = Some("await login();".to_string());

        let patch = FieldsPatch {
            name: Some("  Sign in ".to_string()),
            description: Some("Admin account".to_string()),
            script: Some("  ".to_string()),
            status: Some(" ready ".to_string()),
            is_manual: Some(true),
            tags: Some(vec![" smoke".to_string(), String::new(), "auth ".to_string()]),
        };
        assert!(!patch.is_empty());

        let updated = patch.apply(&fields).unwrap();
        assert_eq!(updated.name, "Sign in");
        assert_eq!(updated.description.as_deref(), Some("Admin account"));
        assert_eq!(updated.script, None, "blank text clears the field");
        assert_eq!(updated.status, "ready");
        assert!(updated.is_manual);
        assert_eq!(updated.tags, vec!["smoke", "auth"]);
        assert_eq!(
            fields.changed_fields(&updated),
            vec!["name", "description", "script", "status", "manual flag", "tags"]
        );

        assert!(FieldsPatch::default().is_empty());
        assert_eq!(FieldsPatch::default().apply(&fields).unwrap(), fields);
    }

    #[test]
    fn test_fields_patch_rejects_blank_name_and_status() {
        let fields = ParentFields::new("Login");
        let blank_name = FieldsPatch {
            name: Some(" ".to_string()),
            ..Default::default()
        };
        let blank_status = FieldsPatch {
            status: Some(String::new()),
            ..Default::default()
        };
        assert!(blank_name.apply(&fields).is_err());
        assert!(blank_status.apply(&fields).is_err());
    }

    #[test]
    fn test_parent_fields_defaults_for_older_snapshots() {
        let parsed: ParentFields = serde_json::from_str(r#"{"name":"Login"}"#).unwrap();
        assert_eq!(parsed.status, DEFAULT_STATUS);
        assert!(!parsed.is_manual);
        assert!(parsed.tags.is_empty());
        assert_eq!(parsed, ParentFields::new("Login"));
    }

    #[test]
    fn test_patch_reference_changes() {
        let mut step = create_test_step();
        step.referenced_fixture_id = Some(3);

        let keep = StepPatch::default();
        assert!(keep.is_empty());
        assert!(!keep.touches_reference(&step));

        let clear = StepPatch {
            referenced_fixture_id: Some(None),
            ..Default::default()
        };
        assert!(clear.touches_reference(&step));
        assert_eq!(clear.apply_content(&step).referenced_fixture_id, None);

        let same = StepPatch {
            referenced_fixture_id: Some(Some(3)),
            ..Default::default()
        };
        assert!(!same.touches_reference(&step));
    }

    #[test]
    fn test_version_label() {
        let version = Version {
            parent: ParentRef::fixture(1),
            version_number: 1,
            reason: "Added step: Open page".to_string(),
            created_at: Timestamp::from_second(1640995200).unwrap(),
            fields: ParentFields::new("Setup"),
            steps: vec![create_test_step()],
        };
        assert_eq!(version.label(), "1.0.0");
        assert_eq!(version.step_count(), 1);
    }

    #[test]
    fn test_default_export_name() {
        assert_eq!(default_export_name("Login As Admin"), "loginAsAdmin");
        assert_eq!(default_export_name("  seed_db  "), "seedDb");
        assert_eq!(default_export_name(""), "");
    }

    #[test]
    fn test_step_serialization_skips_empty_fields() {
        let step = create_test_step();
        let json = serde_json::to_string(&step).unwrap();
        assert!(!json.contains("script"));
        assert!(!json.contains("referenced_fixture_id"));
        let parsed: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, step);
    }
}
