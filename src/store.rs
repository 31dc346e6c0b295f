//! The single source of truth for the decimal index and what the user has selected in it.
//!
//! Every change goes through a closed set of operations, each of which either applies fully
//! or is rejected and leaves the store untouched. The selection is held as node identities so
//! that removing a sibling never leaves it pointing at the wrong node; it is turned back into
//! positions only when read or serialised.
//!
//! Persistence timing is the caller's business: [`HierarchyStore::serialize`] and
//! [`HierarchyStore::restore`] round-trip the whole state, and nothing here writes to disk.

use crate::hierarchy::{
    area_number, category_range, format_reference, parse_reference, Area, Category, Item, Level,
    NodeId, MAX_AREAS, MAX_CATEGORIES, MAX_ITEMS,
};
use crate::snapshot::{AreaSnapshot, CategorySnapshot, ItemSnapshot, Snapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
/// Which column of the hierarchy the presentation is focused on.
///
/// ```text
/// category -> area -> id
/// ```
///
/// Adding or selecting at a level moves the tab to that level. The store never refuses a tab;
/// keeping `area` and `id` out of reach without a selection is left to the presentation.
pub enum ActiveTab {
    #[default]
    /// Category column.
    Category,
    /// Area column of the selected category.
    Area,
    /// Item column of the selected area.
    Id,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Current selection resolved to positions in the tree.
pub struct Selection {
    /// Position of the selected category.
    pub category: Option<usize>,
    /// Position of the selected area within the selected category.
    pub area: Option<usize>,
    /// Position of the selected item within the selected area.
    pub item: Option<usize>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct SelectedIds {
    category: Option<NodeId>,
    area: Option<NodeId>,
    item: Option<NodeId>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Why an operation left the store unchanged.
pub enum Rejection {
    #[error("{level} limit of {cap} reached")]
    /// The parent has no room left for another node at this level.
    CapacityExceeded {
        /// Level of the node that could not be added.
        level: Level,
        /// The limit that was hit.
        cap: usize,
    },
    #[error("no {level} at position {index}")]
    /// A path pointed past the end of a sequence.
    NotFound {
        /// Level at which the path broke.
        level: Level,
        /// Offending position.
        index: usize,
    },
}

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of applying an operation.
pub enum Outcome {
    /// The store changed as requested.
    Applied,
    /// The store is unchanged.
    Rejected(Rejection),
}

impl Outcome {
    /// Whether the operation took effect.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// The rejection reason, if any.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Applied => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }

    fn settle(operation: &str, result: Result<(), Rejection>) -> Self {
        match result {
            Ok(()) => Self::Applied,
            Err(rejection) => {
                debug!(operation, %rejection, "operation rejected");
                Self::Rejected(rejection)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Every state transition the store accepts, addressed by position.
pub enum Operation {
    /// Append a category with one empty area.
    AddCategory,
    /// Append an area to a category.
    AddArea {
        /// Category position.
        category: usize,
    },
    /// Append an item to an area.
    AddItem {
        /// Category position.
        category: usize,
        /// Area position.
        area: usize,
    },
    /// Remove an area together with its items.
    RemoveArea {
        /// Category position.
        category: usize,
        /// Area position.
        area: usize,
    },
    /// Remove an item.
    RemoveItem {
        /// Category position.
        category: usize,
        /// Area position.
        area: usize,
        /// Item position.
        item: usize,
    },
    /// Replace a category's name.
    UpdateCategoryName {
        /// Category position.
        category: usize,
        /// New name.
        name: String,
    },
    /// Replace an area's name.
    UpdateAreaName {
        /// Category position.
        category: usize,
        /// Area position.
        area: usize,
        /// New name.
        name: String,
    },
    /// Replace an item's name.
    UpdateItemName {
        /// Category position.
        category: usize,
        /// Area position.
        area: usize,
        /// Item position.
        item: usize,
        /// New name.
        name: String,
    },
    /// Replace an item's notes.
    UpdateItemNotes {
        /// Category position.
        category: usize,
        /// Area position.
        area: usize,
        /// Item position.
        item: usize,
        /// New markdown notes.
        notes: String,
    },
    /// Select a category and its first area.
    SelectCategory {
        /// Category position.
        category: usize,
    },
    /// Select an area.
    SelectArea {
        /// Category position.
        category: usize,
        /// Area position.
        area: usize,
    },
    /// Select an item.
    SelectItem {
        /// Category position.
        category: usize,
        /// Area position.
        area: usize,
        /// Item position.
        item: usize,
    },
    /// Switch the view tab.
    SetActiveTab(ActiveTab),
    /// Drop everything and start empty.
    Reset,
    /// Replace the whole state with a snapshot.
    LoadState(Snapshot),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Owns the category tree, the selection and the active tab.
pub struct HierarchyStore {
    categories: Vec<Category>,
    selection: SelectedIds,
    active_tab: ActiveTab,
    next_id: u64,
}

impl HierarchyStore {
    #[must_use]
    /// An empty store: no categories, nothing selected, category tab.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    /// Builds a store from a snapshot, defaulting whatever the snapshot leaves out.
    ///
    /// Selection positions that do not point at an existing node, or whose parent is not
    /// selected, are dropped. Identities are allocated afresh, so restoring the same snapshot
    /// always produces an equal store.
    pub fn restore(snapshot: Snapshot) -> Self {
        let mut store = Self::default();

        for (index, category) in snapshot.categories.into_iter().enumerate() {
            let category = store.restore_category(index, category);
            store.categories.push(category);
        }

        let category = snapshot
            .selected_category
            .and_then(|c| store.categories.get(c));
        let area = category
            .zip(snapshot.selected_area)
            .and_then(|(category, a)| category.areas.get(a));
        let item = area
            .zip(snapshot.selected_id)
            .and_then(|(area, i)| area.items.get(i));

        store.selection = SelectedIds {
            category: category.map(|c| c.id),
            area: area.map(|a| a.id),
            item: item.map(|i| i.id),
        };
        store.active_tab = snapshot.active_tab.unwrap_or_default();
        store
    }

    fn restore_category(&mut self, index: usize, snapshot: CategorySnapshot) -> Category {
        let mut areas = Vec::with_capacity(snapshot.areas.len());
        for area in snapshot.areas {
            areas.push(self.restore_area(area));
        }

        let base = area_number(index, 0);
        let used_slots = areas
            .iter()
            .filter_map(|area| area.number.checked_sub(base))
            .map(|slot| slot.saturating_add(1))
            .max()
            .unwrap_or(0);

        Category {
            id: self.allocate(),
            range: snapshot.range.unwrap_or_else(|| category_range(index)),
            name: snapshot.name,
            areas,
            next_slot: snapshot.next_slot.unwrap_or(0).max(used_slots),
        }
    }

    fn restore_area(&mut self, snapshot: AreaSnapshot) -> Area {
        let mut items = Vec::with_capacity(snapshot.items.len());
        for item in snapshot.items {
            items.push(Item {
                id: self.allocate(),
                number: item.number,
                name: item.name,
                notes: item.notes,
            });
        }

        let used = items
            .iter()
            .map(|item| item.number.saturating_add(1))
            .max()
            .unwrap_or(1);

        Area {
            id: self.allocate(),
            number: snapshot.number,
            name: snapshot.name,
            items,
            next_number: snapshot.next_number.unwrap_or(1).max(used),
        }
    }

    #[must_use]
    /// Captures the full state in a form [`HierarchyStore::restore`] accepts.
    pub fn serialize(&self) -> Snapshot {
        let selection = self.selection();

        Snapshot {
            categories: self
                .categories
                .iter()
                .map(|category| CategorySnapshot {
                    range: Some(category.range.clone()),
                    name: category.name.clone(),
                    areas: category
                        .areas
                        .iter()
                        .map(|area| AreaSnapshot {
                            number: area.number,
                            name: area.name.clone(),
                            items: area
                                .items
                                .iter()
                                .map(|item| ItemSnapshot {
                                    number: item.number,
                                    name: item.name.clone(),
                                    notes: item.notes.clone(),
                                })
                                .collect(),
                            next_number: Some(area.next_number),
                        })
                        .collect(),
                    next_slot: Some(category.next_slot),
                })
                .collect(),
            selected_category: selection.category,
            selected_area: selection.area,
            selected_id: selection.item,
            active_tab: Some(self.active_tab),
        }
    }

    /// Applies one operation.
    pub fn apply(&mut self, operation: Operation) -> Outcome {
        match operation {
            Operation::AddCategory => self.add_category(),
            Operation::AddArea { category } => self.add_area(category),
            Operation::AddItem { category, area } => self.add_item(category, area),
            Operation::RemoveArea { category, area } => self.remove_area(category, area),
            Operation::RemoveItem {
                category,
                area,
                item,
            } => self.remove_item(category, area, item),
            Operation::UpdateCategoryName { category, name } => {
                self.update_category_name(category, name)
            }
            Operation::UpdateAreaName {
                category,
                area,
                name,
            } => self.update_area_name(category, area, name),
            Operation::UpdateItemName {
                category,
                area,
                item,
                name,
            } => self.update_item_name(category, area, item, name),
            Operation::UpdateItemNotes {
                category,
                area,
                item,
                notes,
            } => self.update_item_notes(category, area, item, notes),
            Operation::SelectCategory { category } => self.select_category(category),
            Operation::SelectArea { category, area } => self.select_area(category, area),
            Operation::SelectItem {
                category,
                area,
                item,
            } => self.select_item(category, area, item),
            Operation::SetActiveTab(tab) => self.set_active_tab(tab),
            Operation::Reset => self.reset(),
            Operation::LoadState(snapshot) => self.load_state(snapshot),
        }
    }

    // --- Queries ---

    #[must_use]
    /// Categories in order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    /// The view tab.
    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }

    #[must_use]
    /// The selection as positions into the current tree.
    pub fn selection(&self) -> Selection {
        let category = self.selection.category.and_then(|id| {
            self.categories
                .iter()
                .position(|category| category.id == id)
        });
        let area = category.zip(self.selection.area).and_then(|(c, id)| {
            self.categories[c]
                .areas
                .iter()
                .position(|area| area.id == id)
        });
        let item = category
            .zip(area)
            .zip(self.selection.item)
            .and_then(|((c, a), id)| {
                self.categories[c].areas[a]
                    .items
                    .iter()
                    .position(|item| item.id == id)
            });

        Selection {
            category,
            area,
            item,
        }
    }

    #[must_use]
    /// Category, area and item positions when an item is selected.
    pub fn selected_path(&self) -> Option<(usize, usize, usize)> {
        let selection = self.selection();
        Some((selection.category?, selection.area?, selection.item?))
    }

    #[must_use]
    /// The area at a path.
    pub fn area(&self, category: usize, area: usize) -> Option<&Area> {
        self.categories.get(category)?.areas.get(area)
    }

    #[must_use]
    /// The item at a path.
    pub fn item(&self, category: usize, area: usize, item: usize) -> Option<&Item> {
        self.area(category, area)?.items.get(item)
    }

    #[must_use]
    /// Cross-reference key of the item at a path, e.g. `12.03`.
    pub fn reference(&self, category: usize, area: usize, item: usize) -> Option<String> {
        let owner = self.area(category, area)?;
        let item = owner.items.get(item)?;
        Some(format_reference(owner.number, item.number))
    }

    #[must_use]
    /// Cross-reference key of the selected item.
    pub fn selected_reference(&self) -> Option<String> {
        let (c, a, i) = self.selected_path()?;
        self.reference(c, a, i)
    }

    #[must_use]
    /// Resolves a cross-reference key to the path of the item it names.
    ///
    /// The category is found from the area number's tens digit and the area and item by their
    /// numbers, so references stay valid when earlier siblings are removed.
    pub fn resolve(&self, reference: &str) -> Option<(usize, usize, usize)> {
        let (area_number, item_number) = parse_reference(reference)?;
        let c = area_number / 10;
        let (a, area) = self.categories.get(c)?.area_by_number(area_number)?;
        let (i, _) = area.item_by_number(item_number)?;
        Some((c, a, i))
    }

    // --- Operations ---

    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Appends a category with one empty area and selects both.
    pub fn add_category(&mut self) -> Outcome {
        let result = self.try_add_category();
        Outcome::settle("add_category", result)
    }

    fn try_add_category(&mut self) -> Result<(), Rejection> {
        if self.categories.len() >= MAX_CATEGORIES {
            return Err(Rejection::CapacityExceeded {
                level: Level::Category,
                cap: MAX_CATEGORIES,
            });
        }

        let index = self.categories.len();
        let area = Area::new(self.allocate(), area_number(index, 0));
        let category = Category {
            id: self.allocate(),
            range: category_range(index),
            name: String::new(),
            next_slot: 1,
            areas: vec![area],
        };

        self.selection = SelectedIds {
            category: Some(category.id),
            area: category.areas.first().map(|area| area.id),
            item: None,
        };
        self.categories.push(category);
        self.active_tab = ActiveTab::Category;
        Ok(())
    }

    /// Appends an area to a category and selects it.
    pub fn add_area(&mut self, category: usize) -> Outcome {
        let result = self.try_add_area(category);
        Outcome::settle("add_area", result)
    }

    fn try_add_area(&mut self, c: usize) -> Result<(), Rejection> {
        if self.category_at(c)?.is_full() {
            return Err(Rejection::CapacityExceeded {
                level: Level::Area,
                cap: MAX_AREAS,
            });
        }

        let id = self.allocate();
        let category = &mut self.categories[c];
        category.areas.push(Area::new(id, area_number(c, category.next_slot)));
        category.next_slot += 1;
        let category_id = category.id;

        self.selection = SelectedIds {
            category: Some(category_id),
            area: Some(id),
            item: None,
        };
        self.active_tab = ActiveTab::Area;
        Ok(())
    }

    /// Appends an item to an area and selects it.
    pub fn add_item(&mut self, category: usize, area: usize) -> Outcome {
        let result = self.try_add_item(category, area);
        Outcome::settle("add_item", result)
    }

    fn try_add_item(&mut self, c: usize, a: usize) -> Result<(), Rejection> {
        if self.area_at(c, a)?.is_full() {
            return Err(Rejection::CapacityExceeded {
                level: Level::Item,
                cap: MAX_ITEMS,
            });
        }

        let id = self.allocate();
        let category = &mut self.categories[c];
        let category_id = category.id;
        let area = &mut category.areas[a];
        area.items.push(Item {
            id,
            number: area.next_number,
            name: String::new(),
            notes: String::new(),
        });
        area.next_number += 1;
        let area_id = area.id;

        self.selection = SelectedIds {
            category: Some(category_id),
            area: Some(area_id),
            item: Some(id),
        };
        self.active_tab = ActiveTab::Id;
        Ok(())
    }

    /// Removes an area and its items.
    ///
    /// When the removed area was selected, the selection falls back to the category's first
    /// remaining area (or none) and the item selection is cleared. Otherwise it is untouched.
    pub fn remove_area(&mut self, category: usize, area: usize) -> Outcome {
        let result = self.try_remove_area(category, area);
        Outcome::settle("remove_area", result)
    }

    fn try_remove_area(&mut self, c: usize, a: usize) -> Result<(), Rejection> {
        self.area_at(c, a)?;

        let category = &mut self.categories[c];
        let removed = category.areas.remove(a);
        if self.selection.area == Some(removed.id) {
            self.selection = SelectedIds {
                category: Some(category.id),
                area: category.areas.first().map(|area| area.id),
                item: None,
            };
        }
        Ok(())
    }

    /// Removes an item, clearing the item selection only if it pointed at the removed item.
    pub fn remove_item(&mut self, category: usize, area: usize, item: usize) -> Outcome {
        let result = self.try_remove_item(category, area, item);
        Outcome::settle("remove_item", result)
    }

    fn try_remove_item(&mut self, c: usize, a: usize, i: usize) -> Result<(), Rejection> {
        self.item_at(c, a, i)?;

        let removed = self.categories[c].areas[a].items.remove(i);
        if self.selection.item == Some(removed.id) {
            self.selection.item = None;
        }
        Ok(())
    }

    /// Renames a category.
    pub fn update_category_name(&mut self, category: usize, name: String) -> Outcome {
        let result = self.category_at(category).map(|_| ());
        if result.is_ok() {
            self.categories[category].name = name;
        }
        Outcome::settle("update_category_name", result)
    }

    /// Renames an area.
    pub fn update_area_name(&mut self, category: usize, area: usize, name: String) -> Outcome {
        let result = self.area_at(category, area).map(|_| ());
        if result.is_ok() {
            self.categories[category].areas[area].name = name;
        }
        Outcome::settle("update_area_name", result)
    }

    /// Renames an item.
    pub fn update_item_name(
        &mut self,
        category: usize,
        area: usize,
        item: usize,
        name: String,
    ) -> Outcome {
        let result = self.item_at(category, area, item).map(|_| ());
        if result.is_ok() {
            self.categories[category].areas[area].items[item].name = name;
        }
        Outcome::settle("update_item_name", result)
    }

    /// Replaces an item's notes.
    pub fn update_item_notes(
        &mut self,
        category: usize,
        area: usize,
        item: usize,
        notes: String,
    ) -> Outcome {
        let result = self.item_at(category, area, item).map(|_| ());
        if result.is_ok() {
            self.categories[category].areas[area].items[item].notes = notes;
        }
        Outcome::settle("update_item_notes", result)
    }

    /// Selects a category and its first area, if it has one.
    pub fn select_category(&mut self, category: usize) -> Outcome {
        let result = self.category_at(category).map(|category| SelectedIds {
            category: Some(category.id),
            area: category.areas.first().map(|area| area.id),
            item: None,
        });
        let result = result.map(|selection| {
            self.selection = selection;
            self.active_tab = ActiveTab::Category;
        });
        Outcome::settle("select_category", result)
    }

    /// Selects an area and its category.
    pub fn select_area(&mut self, category: usize, area: usize) -> Outcome {
        let result = self.area_at(category, area).map(|owner| SelectedIds {
            category: None,
            area: Some(owner.id),
            item: None,
        });
        let result = result.map(|selection| {
            self.selection = SelectedIds {
                category: Some(self.categories[category].id),
                ..selection
            };
            self.active_tab = ActiveTab::Area;
        });
        Outcome::settle("select_area", result)
    }

    /// Selects an item along with its area and category.
    pub fn select_item(&mut self, category: usize, area: usize, item: usize) -> Outcome {
        let result = self.item_at(category, area, item).map(|leaf| leaf.id);
        let result = result.map(|id| {
            let owner = &self.categories[category];
            self.selection = SelectedIds {
                category: Some(owner.id),
                area: Some(owner.areas[area].id),
                item: Some(id),
            };
            self.active_tab = ActiveTab::Id;
        });
        Outcome::settle("select_item", result)
    }

    /// Switches the view tab.
    pub fn set_active_tab(&mut self, tab: ActiveTab) -> Outcome {
        self.active_tab = tab;
        Outcome::Applied
    }

    /// Discards the whole tree and selection.
    pub fn reset(&mut self) -> Outcome {
        *self = Self::default();
        info!("hierarchy reset");
        Outcome::Applied
    }

    /// Replaces the whole state with a snapshot; see [`HierarchyStore::restore`].
    pub fn load_state(&mut self, snapshot: Snapshot) -> Outcome {
        *self = Self::restore(snapshot);
        info!(categories = self.categories.len(), "hierarchy loaded");
        Outcome::Applied
    }

    // --- Path lookups ---

    fn category_at(&self, c: usize) -> Result<&Category, Rejection> {
        self.categories.get(c).ok_or(Rejection::NotFound {
            level: Level::Category,
            index: c,
        })
    }

    fn area_at(&self, c: usize, a: usize) -> Result<&Area, Rejection> {
        self.category_at(c)?
            .areas
            .get(a)
            .ok_or(Rejection::NotFound {
                level: Level::Area,
                index: a,
            })
    }

    fn item_at(&self, c: usize, a: usize, i: usize) -> Result<&Item, Rejection> {
        self.area_at(c, a)?
            .items
            .get(i)
            .ok_or(Rejection::NotFound {
                level: Level::Item,
                index: i,
            })
    }
}

#[cfg(test)]
#[path = "tests/store.rs"]
mod tests;
