use order_core::{
    EntryOverrides, NotesEditor, NotesError, NotesFile, SectionType, StaticEnvironment,
    NOTES_SKELETON,
};
use std::fs;
use tempfile::TempDir;

fn editor_with(content: &str, branch: &str) -> (TempDir, NotesEditor<StaticEnvironment>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dev-notes.md");
    fs::write(&path, content).unwrap();
    let env = StaticEnvironment::new("ana", branch, "2025-10-26");
    (dir, NotesEditor::new(NotesFile::new(&path), env))
}

fn no_overrides() -> EntryOverrides {
    EntryOverrides::default()
}

#[test]
fn new_date_section_is_laid_out_below_project_context() {
    let (_dir, editor) = editor_with(NOTES_SKELETON, "main");

    editor
        .add_to_daily_section("2025-10-24", "Todo", "- [ ] Test task", &no_overrides())
        .unwrap();

    let expected = "# Dev Notes\n\n## Project Context\n\n\
        *Add project-level context, goals, and background information here.*\n\n\
        ## 2025-10-24\n\n### ana-main (@ana)\n#### Todo\n- [ ] Test task\n";
    assert_eq!(editor.read().unwrap(), expected);
}

#[test]
fn two_types_on_one_date_share_date_and_user_headings() {
    let (_dir, editor) = editor_with("# Dev Notes\n", "main");

    editor
        .add_to_daily_section("2025-10-23", "Todo", "- [ ] Task 1", &no_overrides())
        .unwrap();
    editor
        .add_to_daily_section("2025-10-23", "Notes", "Some context", &no_overrides())
        .unwrap();
    editor
        .add_to_daily_section("2025-10-23", "Ideas", "Great idea", &no_overrides())
        .unwrap();

    let content = editor.read().unwrap();
    assert_eq!(content.matches("## 2025-10-23").count(), 1);
    assert_eq!(content.matches("### ana-main (@ana)").count(), 1);
    for heading in ["#### Todo", "#### Notes", "#### Ideas"] {
        assert_eq!(content.matches(heading).count(), 1, "{heading}");
    }
    assert!(content.contains("#### Todo\n- [ ] Task 1\n\n#### Notes\nSome context\n\n#### Ideas\nGreat idea\n"));
}

#[test]
fn repeated_type_appends_inside_existing_block() {
    let (_dir, editor) = editor_with("# Dev Notes\n", "main");

    editor
        .add_to_daily_section("2025-10-23", "Todo", "- [ ] first", &no_overrides())
        .unwrap();
    editor
        .add_to_daily_section("2025-10-23", "Notes", "a note", &no_overrides())
        .unwrap();
    editor
        .add_to_daily_section("2025-10-23", "Todo", "- [ ] second", &no_overrides())
        .unwrap();

    let content = editor.read().unwrap();
    assert!(content.contains("#### Todo\n- [ ] first\n- [ ] second\n\n#### Notes\na note\n"));
}

#[test]
fn content_lands_inside_existing_date_not_after_later_sections() {
    let initial = "# Dev Notes\n\n## 2025-10-23\n### Todo\n- [ ] Existing task\n\n## 2025-10-22\n### Todo\n- [ ] Old task\n";
    let (_dir, editor) = editor_with(initial, "");

    editor
        .add_to_daily_section("2025-10-23", "Notes", "New note content", &no_overrides())
        .unwrap();

    let section = editor.extract_date_section("2025-10-23").unwrap().join("\n");
    assert!(section.contains("### ana (@ana)\n#### Notes\nNew note content"));
    let older = editor.extract_date_section("2025-10-22").unwrap().join("\n");
    assert!(!older.contains("New note content"));
    assert!(older.contains("- [ ] Old task"));
}

#[test]
fn dates_do_not_leak_into_each_other() {
    let (_dir, editor) = editor_with(NOTES_SKELETON, "main");

    editor
        .add_to_daily_section("2025-10-24", "Todo", "- [ ] thursday", &no_overrides())
        .unwrap();
    editor
        .add_to_daily_section("2025-10-25", "Ideas", "friday idea", &no_overrides())
        .unwrap();
    editor
        .add_to_daily_section("2025-10-24", "Notes", "thursday note", &no_overrides())
        .unwrap();

    let thursday = editor.extract_date_section("2025-10-24").unwrap();
    let friday = editor.extract_date_section("2025-10-25").unwrap();
    assert_eq!(thursday[0], "## 2025-10-24");
    assert!(thursday.iter().any(|line| line == "thursday note"));
    assert!(!thursday.iter().any(|line| line == "friday idea"));
    assert!(friday.iter().any(|line| line == "friday idea"));
    assert!(!friday.iter().any(|line| line.contains("thursday")));

    let content = editor.read().unwrap();
    assert!(content.find("## 2025-10-25").unwrap() < content.find("## 2025-10-24").unwrap());
}

#[test]
fn branch_override_wins_and_empty_branch_drops_suffix() {
    let (_dir, editor) = editor_with("# Dev Notes\n", "main");

    editor
        .add_to_daily_section(
            "2025-10-24",
            "Notes",
            "on feature",
            &EntryOverrides::with_branch("feature/login"),
        )
        .unwrap();
    editor
        .add_to_daily_section("2025-10-24", "Notes", "no branch", &EntryOverrides::with_branch(""))
        .unwrap();
    editor
        .add_to_daily_section(
            "2025-10-24",
            "Notes",
            "as bo",
            &EntryOverrides {
                user: Some("bo".to_string()),
                branch: None,
            },
        )
        .unwrap();

    let content = editor.read().unwrap();
    assert!(content.contains("### ana-feature/login (@ana)\n#### Notes\non feature\n"));
    assert!(content.contains("### ana (@ana)\n#### Notes\nno branch\n"));
    assert!(content.contains("### bo-main (@bo)\n#### Notes\nas bo\n"));
    assert!(!content.contains("### ana-main"));
}

#[test]
fn add_today_uses_environment_date() {
    let (_dir, editor) = editor_with(NOTES_SKELETON, "main");

    editor
        .add_today(SectionType::Ideas, "Consider caching", &no_overrides())
        .unwrap();

    let today = editor.parse_daily_section("2025-10-26").unwrap();
    assert!(today.starts_with("## 2025-10-26"));
    assert!(today.contains("#### Ideas\nConsider caching"));
}

#[test]
fn file_without_header_still_gets_a_date_section() {
    let (_dir, editor) = editor_with("Some random content\n", "main");

    editor
        .add_to_daily_section("2025-10-23", "Todo", "- [ ] Task", &no_overrides())
        .unwrap();

    let content = editor.read().unwrap();
    assert!(content.starts_with("Some random content\n\n## 2025-10-23\n"));
    assert!(content.contains("#### Todo\n- [ ] Task"));
}

#[test]
fn legacy_user_suffix_on_date_heading_is_recognized() {
    let initial = "# Dev Notes\n\n## 2025-10-22 (@testuser)\n### Todo\n- [ ] Today's task\n### Notes\n- Working on markdown parser\n\n## 2025-10-21 (@user1)\n### Todo\n- [ ] Old task\n";
    let (_dir, editor) = editor_with(initial, "main");

    let section = editor.parse_daily_section("2025-10-22").unwrap();
    assert!(section.contains("Today's task"));
    assert!(section.contains("Working on markdown parser"));
    assert!(!section.contains("Old task"));

    editor
        .add_to_daily_section("2025-10-22", "Todo", "- [ ] added", &no_overrides())
        .unwrap();
    assert_eq!(editor.read().unwrap().matches("## 2025-10-22").count(), 1);
}

#[test]
fn missing_date_slice_is_empty() {
    let (_dir, editor) = editor_with(NOTES_SKELETON, "main");

    assert!(editor.extract_date_section("2025-01-01").unwrap().is_empty());
    assert_eq!(editor.parse_daily_section("2025-01-01").unwrap(), "");
}

#[test]
fn invalid_input_is_rejected_without_touching_the_file() {
    let (_dir, editor) = editor_with(NOTES_SKELETON, "main");

    for date in ["2025-13-40", "2025-13-01", "25-10-24", "2025/10/24", "Oct 24 2025", "invalid"] {
        let err = editor
            .add_to_daily_section(date, "Todo", "- [ ] Test task", &no_overrides())
            .unwrap_err();
        assert!(matches!(err, NotesError::InvalidDateFormat(_)), "{date}: {err}");
        assert!(err.to_string().contains("Invalid date format"));
        assert!(matches!(
            editor.parse_daily_section(date),
            Err(NotesError::InvalidDateFormat(_))
        ));
        assert!(matches!(
            editor.extract_date_section(date),
            Err(NotesError::InvalidDateFormat(_))
        ));
    }
    for kind in ["Tasks", "Comments", "Bugs", "Random", "", "todo"] {
        let err = editor
            .add_to_daily_section("2025-10-24", kind, "- [ ] Test", &no_overrides())
            .unwrap_err();
        assert!(err.to_string().contains("Invalid section type"), "{kind}");
    }
    let err = editor
        .add_to_daily_section("2025-10-24", "Todo", "   ", &no_overrides())
        .unwrap_err();
    assert_eq!(err.to_string(), "Content cannot be empty");

    assert_eq!(editor.read().unwrap(), NOTES_SKELETON);
}

#[test]
fn write_failure_surfaces_permission_denied() {
    let (dir, editor) = editor_with("# Dev Notes \n", "main");
    let path = dir.path().join("dev-notes.md");
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_readonly(true);
    fs::set_permissions(&path, perms).unwrap();

    let err = editor
        .add_to_daily_section("2025-10-24", "Todo", "- [ ] Test", &no_overrides())
        .unwrap_err();
    assert!(matches!(err, NotesError::PermissionDenied(_)));
}
