//! Session state bridging the hierarchy store, the section list and the terminal UI.
//!
//! The TUI turns key presses into calls on [`AppState`], which forwards them as store
//! operations and keeps the bits of view state the store does not own: which pane has focus,
//! what is being typed, and the status message. The store itself is never written to directly.

use crate::error::Result;
use crate::sections::{Section, SectionList};
use crate::storage::{self, LocalStore};
use crate::store::{ActiveTab, HierarchyStore, Outcome};
use edtui::{EditorState, Lines};
use std::path::Path;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Which pane receives navigation keys.
pub enum Focus {
    /// The category, area and ID columns.
    Hierarchy,
    /// The document section list.
    Sections,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Determines which UI screen renders and how input is interpreted.
pub enum View {
    /// Columns and section list with single-key actions.
    Browse,
    /// Typing a new name into the status line.
    Rename,
    /// Captures vim-style command input after ':' keystroke.
    Command,
    /// Editing the selected item's notes.
    Notes,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum RenameTarget {
    Category(usize),
    Area(usize, usize),
    Item(usize, usize, usize),
    Section(u32),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Whether the event loop keeps going after a command.
pub enum CommandResult {
    /// Stay in the editor.
    Continue,
    /// Leave the editor.
    Quit,
}

/// Everything the TUI needs between key presses.
pub struct AppState {
    /// The decimal index.
    pub store: HierarchyStore,
    /// Document sections and their tags.
    pub sections: SectionList,
    /// Checkpoint target for `:w`.
    pub local_store: LocalStore,
    /// Pane receiving navigation keys.
    pub focus: Focus,
    /// Active UI screen determining input handling.
    pub current_view: View,
    /// Highlighted row of the section list.
    pub current_section_index: usize,
    /// Text typed while renaming.
    pub input_buffer: String,
    /// Accumulates vim-style command input after ':' is pressed.
    pub command_buffer: String,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    /// Notes editor buffer when the notes view is active.
    pub editor_state: Option<EditorState>,
    /// Maximum line width for text wrapping in the notes editor.
    pub wrap_width: usize,
    rename_target: Option<RenameTarget>,
}

fn step(current: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        None => 0,
        Some(index) if forward => (index + 1).min(len - 1),
        Some(index) => index.saturating_sub(1),
    })
}

impl AppState {
    #[must_use]
    /// Starts a session over an existing store and section list.
    pub fn new(
        store: HierarchyStore,
        sections: SectionList,
        local_store: LocalStore,
        wrap_width: usize,
    ) -> Self {
        Self {
            store,
            sections,
            local_store,
            focus: Focus::Hierarchy,
            current_view: View::Browse,
            current_section_index: 0,
            input_buffer: String::new(),
            command_buffer: String::new(),
            message: None,
            editor_state: None,
            wrap_width,
            rename_target: None,
        }
    }

    fn report(&mut self, outcome: &Outcome) {
        if let Some(rejection) = outcome.rejection() {
            self.message = Some(format!("Not done: {rejection}"));
        }
    }

    #[must_use]
    /// The highlighted document section.
    pub fn current_section(&self) -> Option<&Section> {
        self.sections.sections.get(self.current_section_index)
    }

    fn clamp_section_index(&mut self) {
        self.current_section_index = self
            .current_section_index
            .min(self.sections.sections.len().saturating_sub(1));
    }

    #[must_use]
    /// Number of section references that no longer name an item.
    pub fn dangling_references(&self) -> usize {
        self.sections
            .sections
            .iter()
            .flat_map(|section| &section.selected_ids)
            .filter(|reference| self.store.resolve(reference).is_none())
            .count()
    }

    // --- Navigation ---

    /// Swaps focus between the hierarchy columns and the section list.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Hierarchy => Focus::Sections,
            Focus::Sections => Focus::Hierarchy,
        };
    }

    /// Moves the cursor one row up in the focused column.
    pub fn move_up(&mut self) {
        self.move_cursor(false);
    }

    /// Moves the cursor one row down in the focused column.
    pub fn move_down(&mut self) {
        self.move_cursor(true);
    }

    fn move_cursor(&mut self, forward: bool) {
        if self.focus == Focus::Sections {
            if let Some(next) = step(
                Some(self.current_section_index),
                self.sections.sections.len(),
                forward,
            ) {
                self.current_section_index = next;
            }
            return;
        }

        let selection = self.store.selection();
        let outcome = match self.store.active_tab() {
            ActiveTab::Category => {
                step(selection.category, self.store.categories().len(), forward)
                    .map(|c| self.store.select_category(c))
            }
            ActiveTab::Area => selection.category.and_then(|c| {
                let len = self.store.categories()[c].areas.len();
                step(selection.area, len, forward).map(|a| self.store.select_area(c, a))
            }),
            ActiveTab::Id => selection.category.zip(selection.area).and_then(|(c, a)| {
                let len = self.store.categories()[c].areas[a].items.len();
                step(selection.item, len, forward).map(|i| self.store.select_item(c, a, i))
            }),
        };
        if let Some(outcome) = outcome {
            self.report(&outcome);
        }
    }

    /// Moves to the next column right, if its prerequisite selection exists.
    pub fn tab_right(&mut self) {
        let selection = self.store.selection();
        let next = match self.store.active_tab() {
            ActiveTab::Category if selection.category.is_some() => ActiveTab::Area,
            ActiveTab::Category => {
                self.message = Some("Select a category first".to_string());
                return;
            }
            ActiveTab::Area | ActiveTab::Id if selection.area.is_some() => ActiveTab::Id,
            ActiveTab::Area | ActiveTab::Id => {
                self.message = Some("Select an area first".to_string());
                return;
            }
        };
        let outcome = self.store.set_active_tab(next);
        self.report(&outcome);
    }

    /// Moves to the next column left.
    pub fn tab_left(&mut self) {
        let previous = match self.store.active_tab() {
            ActiveTab::Id => ActiveTab::Area,
            ActiveTab::Area | ActiveTab::Category => ActiveTab::Category,
        };
        let outcome = self.store.set_active_tab(previous);
        self.report(&outcome);
    }

    // --- Hierarchy edits ---

    /// Adds a node at the active tab's level, or a section when the section list has focus.
    pub fn add_at_cursor(&mut self) {
        if self.focus == Focus::Sections {
            self.sections.add();
            self.current_section_index = self.sections.sections.len() - 1;
            self.begin_rename();
            return;
        }

        let selection = self.store.selection();
        let outcome = match self.store.active_tab() {
            ActiveTab::Category => Some(self.store.add_category()),
            ActiveTab::Area => selection.category.map(|c| self.store.add_area(c)),
            ActiveTab::Id => selection
                .category
                .zip(selection.area)
                .map(|(c, a)| self.store.add_item(c, a)),
        };
        match outcome {
            Some(outcome) => self.report(&outcome),
            None => self.message = Some("Nothing selected to add to".to_string()),
        }
    }

    /// Removes the node under the cursor, or the highlighted section.
    pub fn remove_at_cursor(&mut self) {
        if self.focus == Focus::Sections {
            if let Some(id) = self.current_section().map(|section| section.id) {
                self.sections.remove(id);
                self.clamp_section_index();
            }
            return;
        }

        let selection = self.store.selection();
        let outcome = match self.store.active_tab() {
            ActiveTab::Category => {
                self.message = Some("Categories cannot be removed".to_string());
                return;
            }
            ActiveTab::Area => selection
                .category
                .zip(selection.area)
                .map(|(c, a)| self.store.remove_area(c, a)),
            ActiveTab::Id => self
                .store
                .selected_path()
                .map(|(c, a, i)| self.store.remove_item(c, a, i)),
        };

        let Some(outcome) = outcome else {
            self.message = Some("Nothing selected to remove".to_string());
            return;
        };
        self.report(&outcome);
        if outcome.is_applied() {
            let dangling = self.dangling_references();
            if dangling > 0 {
                self.message = Some(format!(
                    "{dangling} section reference(s) now dangle; :reconcile drops them"
                ));
            }
        }
    }

    /// Starts renaming the node under the cursor, prefilled with its current name.
    pub fn begin_rename(&mut self) {
        let target = if self.focus == Focus::Sections {
            self.current_section().map(|section| {
                (RenameTarget::Section(section.id), section.name.clone())
            })
        } else {
            let selection = self.store.selection();
            match self.store.active_tab() {
                ActiveTab::Category => selection.category.map(|c| {
                    (
                        RenameTarget::Category(c),
                        self.store.categories()[c].name.clone(),
                    )
                }),
                ActiveTab::Area => selection.category.zip(selection.area).and_then(|(c, a)| {
                    let area = self.store.area(c, a)?;
                    Some((RenameTarget::Area(c, a), area.name.clone()))
                }),
                ActiveTab::Id => self.store.selected_path().and_then(|(c, a, i)| {
                    let item = self.store.item(c, a, i)?;
                    Some((RenameTarget::Item(c, a, i), item.name.clone()))
                }),
            }
        };

        if let Some((target, name)) = target {
            self.rename_target = Some(target);
            self.input_buffer = name;
            self.current_view = View::Rename;
        } else {
            self.message = Some("Nothing selected to rename".to_string());
        }
    }

    /// Applies the typed name and returns to browsing.
    pub fn commit_rename(&mut self) {
        let name = std::mem::take(&mut self.input_buffer);
        match self.rename_target.take() {
            Some(RenameTarget::Category(c)) => {
                let outcome = self.store.update_category_name(c, name);
                self.report(&outcome);
            }
            Some(RenameTarget::Area(c, a)) => {
                let outcome = self.store.update_area_name(c, a, name);
                self.report(&outcome);
            }
            Some(RenameTarget::Item(c, a, i)) => {
                let outcome = self.store.update_item_name(c, a, i, name);
                self.report(&outcome);
            }
            Some(RenameTarget::Section(id)) => {
                self.sections.rename(id, name);
            }
            None => {}
        }
        self.current_view = View::Browse;
    }

    /// Drops the typed name and returns to browsing.
    pub fn cancel_rename(&mut self) {
        self.input_buffer.clear();
        self.rename_target = None;
        self.current_view = View::Browse;
    }

    /// Loads the selected item's notes into the editor buffer.
    pub fn enter_notes(&mut self) {
        let Some((c, a, i)) = self.store.selected_path() else {
            self.message = Some("Select an item to edit its notes".to_string());
            return;
        };
        let notes = self
            .store
            .item(c, a, i)
            .map(|item| item.notes.clone())
            .unwrap_or_default();
        self.editor_state = Some(EditorState::new(Lines::from(notes.as_str())));
        self.current_view = View::Notes;
    }

    /// Leaves the notes editor, optionally storing the buffer on the selected item.
    pub fn exit_notes(&mut self, save: bool) {
        if save {
            if let (Some(editor_state), Some((c, a, i))) =
                (&self.editor_state, self.store.selected_path())
            {
                let notes = editor_state
                    .lines
                    .iter_row()
                    .map(|line| line.iter().collect::<String>())
                    .collect::<Vec<_>>()
                    .join("\n");
                let outcome = self.store.update_item_notes(c, a, i, notes);
                self.report(&outcome);
            }
        }
        self.editor_state = None;
        self.current_view = View::Browse;
    }

    // --- Section list ---

    /// Checks or unchecks the highlighted section.
    pub fn toggle_section_check(&mut self) {
        if let Some((id, checked)) = self
            .current_section()
            .map(|section| (section.id, section.is_checked))
        {
            self.sections.set_checked(id, !checked);
        }
    }

    /// Tags every checked section with the selected item's reference.
    pub fn tag_checked_sections(&mut self) {
        let Some(reference) = self.store.selected_reference() else {
            self.message = Some("Select an item to tag with".to_string());
            return;
        };
        let tagged = self.sections.tag_checked(&reference);
        self.message = Some(format!("Tagged {tagged} section(s) with {reference}"));
    }

    /// Removes the most recently added reference from the highlighted section.
    pub fn untag_last(&mut self) {
        if let Some((id, Some(reference))) = self
            .current_section()
            .map(|section| (section.id, section.selected_ids.last().cloned()))
        {
            self.sections.untag(id, &reference);
        }
    }

    /// Selects the item named by the highlighted section's latest reference.
    pub fn jump_to_reference(&mut self) {
        let Some(reference) = self
            .current_section()
            .and_then(|section| section.selected_ids.last().cloned())
        else {
            return;
        };
        match self.store.resolve(&reference) {
            Some((c, a, i)) => {
                let outcome = self.store.select_item(c, a, i);
                self.report(&outcome);
                self.focus = Focus::Hierarchy;
            }
            None => self.message = Some(format!("{reference} no longer exists")),
        }
    }

    // --- Persistence and commands ---

    /// Checkpoints the store and section list to the local store.
    ///
    /// # Errors
    ///
    /// Returns an error if the local store cannot be written.
    pub fn save(&mut self) -> Result<()> {
        self.local_store.save(&self.store, &self.sections)?;
        self.message = Some(format!("Saved to {}", self.local_store.path().display()));
        Ok(())
    }

    /// Replaces the session contents with an export document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or parsed; the session is unchanged.
    pub fn import(&mut self, path: &Path) -> Result<()> {
        let (store, sections) = storage::import_document(path)?;
        self.store = store;
        self.sections = sections;
        self.clamp_section_index();
        self.message = Some(format!("Imported {}", path.display()));
        Ok(())
    }

    /// Runs a `:` command and reports whether to keep going.
    pub fn execute_command(&mut self, command: &str) -> CommandResult {
        let command = command.trim();
        let (name, argument) = command
            .split_once(' ')
            .map_or((command, ""), |(name, argument)| (name, argument.trim()));

        match name {
            "w" => {
                if let Err(e) = self.save() {
                    self.message = Some(format!("Error saving: {e}"));
                }
            }
            "q" | "q!" => return CommandResult::Quit,
            "wq" | "x" => match self.save() {
                Ok(()) => return CommandResult::Quit,
                Err(e) => self.message = Some(format!("Error saving: {e}")),
            },
            "export" if argument.is_empty() => {
                self.message = Some("Usage: :export <path>".to_string());
            }
            "export" => {
                let path = Path::new(argument);
                self.message = Some(
                    match storage::export_document(path, &self.store, &self.sections) {
                        Ok(()) => format!("Exported to {argument}"),
                        Err(e) => format!("Error exporting: {e}"),
                    },
                );
            }
            "import" if argument.is_empty() => {
                self.message = Some("Usage: :import <path>".to_string());
            }
            "import" => {
                if let Err(e) = self.import(Path::new(argument)) {
                    self.message = Some(format!("Error importing: {e}"));
                }
            }
            "reconcile" => {
                let dropped = self.sections.reconcile(&self.store);
                self.message = Some(format!("Dropped {dropped} dangling reference(s)"));
            }
            "reset" => {
                self.message =
                    Some("This clears every category; use :reset! to confirm".to_string());
            }
            "reset!" => {
                let outcome = self.store.reset();
                self.message = Some("Index cleared".to_string());
                self.report(&outcome);
            }
            _ => {
                self.message = Some(format!("Unknown command: {command}"));
            }
        }
        CommandResult::Continue
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
