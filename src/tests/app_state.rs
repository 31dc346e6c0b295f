use super::{AppState, CommandResult, Focus, View};
use crate::sections::SectionList;
use crate::storage::LocalStore;
use crate::store::{ActiveTab, HierarchyStore};
use tempfile::TempDir;

fn new_app() -> (AppState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let local = LocalStore::open(dir.path().join("store.json")).unwrap();
    let app = AppState::new(HierarchyStore::new(), SectionList::default(), local, 100);
    (app, dir)
}

#[test]
fn test_add_follows_active_tab() {
    let (mut app, _dir) = new_app();

    app.add_at_cursor();
    assert_eq!(app.store.categories().len(), 1);

    app.tab_right();
    assert_eq!(app.store.active_tab(), ActiveTab::Area);
    app.add_at_cursor();
    assert_eq!(app.store.categories()[0].areas.len(), 2);

    app.tab_right();
    assert_eq!(app.store.active_tab(), ActiveTab::Id);
    app.add_at_cursor();
    assert_eq!(app.store.selected_reference().as_deref(), Some("1.01"));
}

#[test]
fn test_tab_right_needs_an_area() {
    let (mut app, _dir) = new_app();

    app.tab_right();
    assert_eq!(app.store.active_tab(), ActiveTab::Category);
    assert!(app.message.is_some());
}

#[test]
fn test_area_tab_reachable_from_empty_category() {
    let (mut app, _dir) = new_app();
    app.add_at_cursor();
    app.tab_right();
    app.remove_at_cursor();
    assert!(app.store.categories()[0].areas.is_empty());

    app.tab_left();
    assert_eq!(app.store.active_tab(), ActiveTab::Category);
    app.tab_right();
    assert_eq!(app.store.active_tab(), ActiveTab::Area);

    app.add_at_cursor();
    assert_eq!(app.store.categories()[0].areas.len(), 1);
    assert_eq!(app.store.categories()[0].areas[0].number, 1);

    app.tab_right();
    assert_eq!(app.store.active_tab(), ActiveTab::Id);
}

#[test]
fn test_id_tab_needs_an_area() {
    let (mut app, _dir) = new_app();
    app.add_at_cursor();
    app.tab_right();
    app.remove_at_cursor();

    app.tab_right();
    assert_eq!(app.store.active_tab(), ActiveTab::Area);
    assert_eq!(app.message.as_deref(), Some("Select an area first"));
}

#[test]
fn test_move_cursor_through_columns() {
    let (mut app, _dir) = new_app();
    app.add_at_cursor();
    app.add_at_cursor();
    app.add_at_cursor();
    assert_eq!(app.store.selection().category, Some(2));

    app.move_up();
    app.move_up();
    app.move_up();
    assert_eq!(app.store.selection().category, Some(0));

    app.move_down();
    assert_eq!(app.store.selection().category, Some(1));

    let _ = app.store.add_item(1, 0);
    let _ = app.store.add_item(1, 0);
    app.move_up();
    assert_eq!(app.store.selected_reference().as_deref(), Some("10.01"));
    app.move_down();
    app.move_down();
    assert_eq!(app.store.selected_reference().as_deref(), Some("10.02"));
}

#[test]
fn test_remove_reports_dangling_references() {
    let (mut app, _dir) = new_app();
    app.add_at_cursor();
    let _ = app.store.add_item(0, 0);
    app.sections.set_checked(1, true);
    app.tag_checked_sections();
    assert_eq!(app.sections.get(1).unwrap().selected_ids, ["0.01"]);

    app.remove_at_cursor();
    assert_eq!(app.store.area(0, 0).unwrap().items.len(), 0);
    assert_eq!(app.dangling_references(), 1);
    assert!(app.message.as_deref().unwrap().contains("dangle"));

    assert_eq!(app.execute_command("reconcile"), CommandResult::Continue);
    assert_eq!(app.dangling_references(), 0);
}

#[test]
fn test_categories_cannot_be_removed() {
    let (mut app, _dir) = new_app();
    app.add_at_cursor();
    app.remove_at_cursor();
    assert_eq!(app.store.categories().len(), 1);
}

#[test]
fn test_rename_selected_node() {
    let (mut app, _dir) = new_app();
    app.add_at_cursor();

    app.begin_rename();
    assert_eq!(app.current_view, View::Rename);
    app.input_buffer.push_str("Projects");
    app.commit_rename();

    assert_eq!(app.current_view, View::Browse);
    assert_eq!(app.store.categories()[0].name, "Projects");

    app.begin_rename();
    assert_eq!(app.input_buffer, "Projects");
    app.input_buffer.push('!');
    app.cancel_rename();
    assert_eq!(app.store.categories()[0].name, "Projects");
}

#[test]
fn test_section_pane_editing() {
    let (mut app, _dir) = new_app();
    app.toggle_focus();
    assert_eq!(app.focus, Focus::Sections);

    app.add_at_cursor();
    assert_eq!(app.current_view, View::Rename);
    app.input_buffer.push_str("Methods");
    app.commit_rename();
    assert_eq!(app.sections.sections[2].name, "Methods");
    assert_eq!(app.current_section_index, 2);

    app.toggle_section_check();
    assert!(app.sections.sections[2].is_checked);

    app.remove_at_cursor();
    assert_eq!(app.sections.sections.len(), 2);
    assert_eq!(app.current_section_index, 1);
}

#[test]
fn test_tag_untag_and_jump() {
    let (mut app, _dir) = new_app();
    app.add_at_cursor();
    let _ = app.store.add_item(0, 0);
    let _ = app.store.add_item(0, 0);

    app.toggle_focus();
    app.toggle_section_check();
    app.tag_checked_sections();
    assert_eq!(app.sections.sections[0].selected_ids, ["0.02"]);

    let _ = app.store.select_category(0);
    app.jump_to_reference();
    assert_eq!(app.store.selected_reference().as_deref(), Some("0.02"));
    assert_eq!(app.focus, Focus::Hierarchy);

    app.toggle_focus();
    app.untag_last();
    assert!(app.sections.sections[0].selected_ids.is_empty());
}

#[test]
fn test_tag_without_item_selected() {
    let (mut app, _dir) = new_app();
    app.sections.set_checked(1, true);
    app.tag_checked_sections();

    assert!(app.sections.get(1).unwrap().selected_ids.is_empty());
    assert_eq!(app.message.as_deref(), Some("Select an item to tag with"));
}

#[test]
fn test_notes_saved_from_editor() {
    let (mut app, _dir) = new_app();
    app.add_at_cursor();
    let _ = app.store.add_item(0, 0);

    app.enter_notes();
    assert_eq!(app.current_view, View::Notes);
    if let Some(ref mut editor_state) = app.editor_state {
        editor_state.lines = edtui::Lines::from("Draft\nsecond line");
    }
    app.exit_notes(true);

    assert_eq!(app.current_view, View::Browse);
    assert!(app.editor_state.is_none());
    assert_eq!(app.store.item(0, 0, 0).unwrap().notes, "Draft\nsecond line");

    app.enter_notes();
    if let Some(ref mut editor_state) = app.editor_state {
        editor_state.lines = edtui::Lines::from("discarded");
    }
    app.exit_notes(false);
    assert_eq!(app.store.item(0, 0, 0).unwrap().notes, "Draft\nsecond line");
}

#[test]
fn test_save_and_reset_commands() {
    let (mut app, dir) = new_app();
    app.add_at_cursor();

    assert_eq!(app.execute_command("w"), CommandResult::Continue);
    let reopened = LocalStore::open(dir.path().join("store.json")).unwrap();
    assert_eq!(reopened.load_store().unwrap().unwrap().categories().len(), 1);

    app.execute_command("reset");
    assert_eq!(app.store.categories().len(), 1, "reset needs confirmation");
    app.execute_command("reset!");
    assert!(app.store.categories().is_empty());

    assert_eq!(app.execute_command("wq"), CommandResult::Quit);
    assert_eq!(app.execute_command("q"), CommandResult::Quit);
}

#[test]
fn test_export_import_commands() {
    let (mut app, dir) = new_app();
    app.add_at_cursor();
    let _ = app.store.update_category_name(0, "Admin".to_string());
    let path = dir.path().join("export.json");

    app.execute_command(&format!("export {}", path.display()));
    assert!(path.exists());

    app.execute_command("reset!");
    app.execute_command(&format!("import {}", path.display()));
    assert_eq!(app.store.categories()[0].name, "Admin");

    app.execute_command("import");
    assert_eq!(app.message.as_deref(), Some("Usage: :import <path>"));

    app.execute_command("import /definitely/not/here.json");
    assert!(app.message.as_deref().unwrap().starts_with("Error importing"));
    assert_eq!(app.store.categories()[0].name, "Admin");
}

#[test]
fn test_unknown_command() {
    let (mut app, _dir) = new_app();
    assert_eq!(app.execute_command("frobnicate"), CommandResult::Continue);
    assert_eq!(app.message.as_deref(), Some("Unknown command: frobnicate"));
}
