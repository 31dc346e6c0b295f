//! The serialised form of the hierarchy and of the combined export document.
//!
//! Snapshots address the selection by position, which is the format written to disk. Every
//! field except node numbers is optional on the way in so that older or hand-edited files
//! still load; the older key `ids` is accepted in place of `items`.

use crate::error::Result;
use crate::sections::SectionList;
use crate::store::ActiveTab;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Complete, self-describing state of a hierarchy store.
pub struct Snapshot {
    #[serde(default)]
    /// Categories in order.
    pub categories: Vec<CategorySnapshot>,
    #[serde(default)]
    /// Position of the selected category.
    pub selected_category: Option<usize>,
    #[serde(default)]
    /// Position of the selected area within the selected category.
    pub selected_area: Option<usize>,
    #[serde(default, rename = "selectedID")]
    /// Position of the selected item within the selected area.
    pub selected_id: Option<usize>,
    #[serde(default)]
    /// View tab; defaults to the category tab when absent.
    pub active_tab: Option<ActiveTab>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Serialised category.
pub struct CategorySnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Range label; derived from the position when absent.
    pub range: Option<String>,
    #[serde(default)]
    /// User-given label.
    pub name: String,
    #[serde(default)]
    /// Areas in order.
    pub areas: Vec<AreaSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Slot counter; recomputed from the areas when absent.
    pub next_slot: Option<usize>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Serialised area.
pub struct AreaSnapshot {
    /// Number inside the category's range.
    pub number: usize,
    #[serde(default)]
    /// User-given label.
    pub name: String,
    #[serde(default, alias = "ids")]
    /// Items in order.
    pub items: Vec<ItemSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Item number counter; recomputed from the items when absent.
    pub next_number: Option<usize>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
/// Serialised item.
pub struct ItemSnapshot {
    /// Number inside the area.
    pub number: usize,
    #[serde(default)]
    /// User-given label.
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    /// Markdown notes.
    pub notes: String,
}

impl Snapshot {
    /// Parses a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or a required number is missing.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Renders the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Export document bundling the section list with the hierarchy snapshot.
pub struct Envelope {
    #[serde(default = "SectionList::empty")]
    /// Tagged document sections.
    pub paper_sections: SectionList,
    #[serde(default)]
    /// Hierarchy snapshot.
    pub johnny_decimal: Snapshot,
}

impl Envelope {
    /// Parses an export document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid export document.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Renders the export document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[path = "tests/snapshot.rs"]
mod tests;
