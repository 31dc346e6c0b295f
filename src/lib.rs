//! jdex: a decimal-numbered index editor for tagging document sections.
//!
//! The index has three levels. Categories own a fixed range of ten numbers by position (`0-9`
//! for the first, `10-19` for the second), areas take a number from their category's range (`12`) and items are numbered within their area,
//! giving cross-references such as `12.03`. Document sections are tagged with those
//! references. [`store::HierarchyStore`] owns the index and is the only thing that changes it;
//! everything else reads it, serialises it or forwards user intents to it.

pub mod app_state;
pub mod config;
pub mod error;
pub mod formats;
pub mod hierarchy;
pub mod input;
pub mod logging;
pub mod sections;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod ui;
