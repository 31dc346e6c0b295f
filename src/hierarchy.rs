//! Nodes of the three-level decimal index: categories hold areas, areas hold items.
//!
//! Numbers are handed out once when a node is created and never change afterwards. A
//! category's range comes from its position, an area's number from its category and a
//! per-category slot counter, an item's number from a per-area counter. Counters only
//! grow, so removing a node leaves a gap rather than freeing its number for reuse.

use std::fmt;

/// Most categories a hierarchy may hold.
pub const MAX_CATEGORIES: usize = 10;
/// Most areas a category may hold; also the number of slots in a category's range.
pub const MAX_AREAS: usize = 10;
/// Most items an area may hold; item numbers are written with two digits.
pub const MAX_ITEMS: usize = 99;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Opaque identity of a node, stable across sibling insertions and removals.
pub struct NodeId(pub(crate) u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Depth of a node in the hierarchy.
pub enum Level {
    /// Top-level grouping with a fixed range label.
    Category,
    /// Second-level grouping numbered inside its category's range.
    Area,
    /// Leaf entry numbered inside its area.
    Item,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category => f.write_str("category"),
            Self::Area => f.write_str("area"),
            Self::Item => f.write_str("item"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Leaf of the hierarchy that document sections are tagged with.
pub struct Item {
    /// Identity used by the selection.
    pub id: NodeId,
    /// 1-based number, unique within the owning area.
    pub number: usize,
    /// User-given label.
    pub name: String,
    /// Free-form markdown notes attached to the item.
    pub notes: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Second-level grouping inside a category.
pub struct Area {
    /// Identity used by the selection.
    pub id: NodeId,
    /// Number inside the owning category's range.
    pub number: usize,
    /// User-given label.
    pub name: String,
    /// Items in creation order.
    pub items: Vec<Item>,
    /// Number the next added item receives.
    pub next_number: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Top-level grouping of the hierarchy.
pub struct Category {
    /// Identity used by the selection.
    pub id: NodeId,
    /// Range label such as `10-19`, fixed at creation.
    pub range: String,
    /// User-given label.
    pub name: String,
    /// Areas in creation order.
    pub areas: Vec<Area>,
    /// Slot the next added area receives within the range.
    pub next_slot: usize,
}

impl Area {
    pub(crate) fn new(id: NodeId, number: usize) -> Self {
        Self {
            id,
            number,
            name: String::new(),
            items: Vec::new(),
            next_number: 1,
        }
    }

    #[must_use]
    /// Whether another item can be added without exceeding the cap or reusing a number.
    pub fn is_full(&self) -> bool {
        self.items.len() >= MAX_ITEMS || self.next_number > MAX_ITEMS
    }

    #[must_use]
    /// Finds an item by its number rather than its position.
    pub fn item_by_number(&self, number: usize) -> Option<(usize, &Item)> {
        self.items
            .iter()
            .enumerate()
            .find(|(_, item)| item.number == number)
    }
}

impl Category {
    #[must_use]
    /// Whether another area can be added without exceeding the cap or the range.
    pub fn is_full(&self) -> bool {
        self.areas.len() >= MAX_AREAS || self.next_slot >= MAX_AREAS
    }

    #[must_use]
    /// Finds an area by its number rather than its position.
    pub fn area_by_number(&self, number: usize) -> Option<(usize, &Area)> {
        self.areas
            .iter()
            .enumerate()
            .find(|(_, area)| area.number == number)
    }
}

#[must_use]
/// Range label of the category at `index`: `0-9`, `10-19`, `20-29` and so on.
pub fn category_range(index: usize) -> String {
    let start = index * 10;
    format!("{start}-{}", start + 9)
}

#[must_use]
/// Number of the area occupying `slot` in the category at `category_index`.
pub fn area_number(category_index: usize, slot: usize) -> usize {
    category_index * 10 + slot
}

#[must_use]
/// Cross-reference key for an item, e.g. area 12 and item 3 give `12.03`.
pub fn format_reference(area_number: usize, item_number: usize) -> String {
    format!("{area_number}.{item_number:02}")
}

#[must_use]
/// Splits a cross-reference key back into area and item numbers.
pub fn parse_reference(reference: &str) -> Option<(usize, usize)> {
    let (area, item) = reference.trim().split_once('.')?;
    Some((area.parse().ok()?, item.parse().ok()?))
}
