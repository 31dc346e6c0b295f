//! Document sections and the cross-references they carry into the index.
//!
//! The list lives beside the hierarchy store rather than inside it. References are plain
//! `area.item` strings, so removing an area or item can leave them dangling until
//! [`SectionList::reconcile`] is called.

use crate::input::Heading;
use crate::store::HierarchyStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// One section of the document being organised.
pub struct Section {
    /// Stable identifier within the list.
    pub id: u32,
    #[serde(default)]
    /// Section title.
    pub name: String,
    #[serde(default)]
    /// Whether tagging applies to this section.
    pub is_checked: bool,
    #[serde(default, rename = "selectedIDs")]
    /// Cross-references such as `12.03`, in the order they were added.
    pub selected_ids: Vec<String>,
}

impl Section {
    fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_checked: false,
            selected_ids: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(transparent)]
/// Ordered list of document sections.
pub struct SectionList {
    /// Sections in display order.
    pub sections: Vec<Section>,
}

impl Default for SectionList {
    fn default() -> Self {
        Self {
            sections: vec![Section::new(1, "Abstract"), Section::new(2, "Introduction")],
        }
    }
}

impl SectionList {
    #[must_use]
    /// A list with no sections.
    pub fn empty() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    #[must_use]
    /// A list with one section per heading, numbered from 1.
    pub fn from_headings(headings: &[Heading]) -> Self {
        let mut list = Self::empty();
        for heading in headings {
            let id = list.next_id();
            list.sections.push(Section::new(id, heading.title.clone()));
        }
        list
    }

    fn next_id(&self) -> u32 {
        self.sections
            .iter()
            .map(|section| section.id)
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Appends an unnamed section and returns its id.
    pub fn add(&mut self) -> u32 {
        let id = self.next_id();
        self.sections.push(Section::new(id, ""));
        id
    }

    /// Removes a section, returning whether it existed.
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.sections.len();
        self.sections.retain(|section| section.id != id);
        self.sections.len() != before
    }

    /// Renames a section, returning whether it existed.
    pub fn rename(&mut self, id: u32, name: String) -> bool {
        self.get_mut(id).map(|section| section.name = name).is_some()
    }

    /// Checks or unchecks a section, returning whether it existed.
    pub fn set_checked(&mut self, id: u32, checked: bool) -> bool {
        self.get_mut(id)
            .map(|section| section.is_checked = checked)
            .is_some()
    }

    /// Adds a reference to every checked section that does not already carry it.
    ///
    /// Returns the number of sections that gained the reference.
    pub fn tag_checked(&mut self, reference: &str) -> usize {
        let mut tagged = 0;
        for section in self.sections.iter_mut().filter(|s| s.is_checked) {
            if !section.selected_ids.iter().any(|r| r == reference) {
                section.selected_ids.push(reference.to_string());
                tagged += 1;
            }
        }
        debug!(reference, tagged, "tagged checked sections");
        tagged
    }

    /// Removes a reference from one section, returning whether it was present.
    pub fn untag(&mut self, id: u32, reference: &str) -> bool {
        let Some(section) = self.get_mut(id) else {
            return false;
        };
        let before = section.selected_ids.len();
        section.selected_ids.retain(|r| r != reference);
        section.selected_ids.len() != before
    }

    /// Checked sections that carry at least one reference.
    pub fn checked_with_tags(&self) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .filter(|section| section.is_checked && !section.selected_ids.is_empty())
    }

    /// Drops every reference that no longer names an item in `store`.
    ///
    /// Returns the number of references removed.
    pub fn reconcile(&mut self, store: &HierarchyStore) -> usize {
        let mut dropped = 0;
        for section in &mut self.sections {
            let before = section.selected_ids.len();
            section
                .selected_ids
                .retain(|reference| store.resolve(reference).is_some());
            dropped += before - section.selected_ids.len();
        }
        debug!(dropped, "reconciled section references");
        dropped
    }

    #[must_use]
    /// Looks a section up by id.
    pub fn get(&self, id: u32) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    fn get_mut(&mut self, id: u32) -> Option<&mut Section> {
        self.sections.iter_mut().find(|section| section.id == id)
    }
}

#[cfg(test)]
#[path = "tests/sections.rs"]
mod tests;
