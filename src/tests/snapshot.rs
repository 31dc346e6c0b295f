use super::{Envelope, Snapshot};
use crate::error::Error;
use crate::store::{ActiveTab, HierarchyStore, Selection};

#[test]
fn test_snapshot_field_names() {
    let mut store = HierarchyStore::new();
    let _ = store.add_category();
    let _ = store.add_item(0, 0);

    let json: serde_json::Value = serde_json::to_value(store.serialize()).unwrap();

    assert_eq!(json["categories"][0]["range"], "0-9");
    assert_eq!(json["categories"][0]["areas"][0]["number"], 0);
    assert_eq!(json["categories"][0]["areas"][0]["items"][0]["number"], 1);
    assert_eq!(json["selectedCategory"], 0);
    assert_eq!(json["selectedArea"], 0);
    assert_eq!(json["selectedID"], 0);
    assert_eq!(json["activeTab"], "id");
}

#[test]
fn test_missing_optional_fields_default() {
    let snapshot = Snapshot::from_json(
        r#"{"categories": [{"name": "Admin", "areas": [{"number": 0, "ids": [{"number": 4}]}]},
                           {"areas": []}]}"#,
    )
    .unwrap();
    let store = HierarchyStore::restore(snapshot);

    assert_eq!(store.categories()[0].range, "0-9");
    assert_eq!(store.categories()[1].range, "10-19");
    assert_eq!(store.categories()[0].areas[0].items[0].number, 4);
    assert_eq!(store.categories()[0].areas[0].next_number, 5);
    assert_eq!(store.categories()[0].next_slot, 1);
    assert_eq!(store.selection(), Selection::default());
    assert_eq!(store.active_tab(), ActiveTab::Category);
}

#[test]
fn test_empty_object_loads_as_empty_store() {
    let store = HierarchyStore::restore(Snapshot::from_json("{}").unwrap());
    assert_eq!(store, HierarchyStore::new());
}

#[test]
fn test_stale_selection_is_dropped_on_load() {
    let snapshot = Snapshot::from_json(
        r#"{"categories": [{"range": "0-9", "areas": [{"number": 0}]}],
            "selectedCategory": 0, "selectedArea": 3, "selectedID": 0, "activeTab": "area"}"#,
    )
    .unwrap();
    let store = HierarchyStore::restore(snapshot);

    assert_eq!(
        store.selection(),
        Selection {
            category: Some(0),
            area: None,
            item: None,
        }
    );
    assert_eq!(store.active_tab(), ActiveTab::Area);
}

#[test]
fn test_item_without_area_selection_is_dropped() {
    let snapshot = Snapshot::from_json(
        r#"{"categories": [{"areas": [{"number": 0, "items": [{"number": 1}]}]}],
            "selectedCategory": null, "selectedArea": 0, "selectedID": 0}"#,
    )
    .unwrap();

    assert_eq!(
        HierarchyStore::restore(snapshot).selection(),
        Selection::default()
    );
}

#[test]
fn test_unparsable_input_is_an_error() {
    assert!(matches!(
        Snapshot::from_json("not json at all"),
        Err(Error::Json(_))
    ));
    assert!(matches!(
        Snapshot::from_json(r#"{"categories": [{"areas": [{"name": "no number"}]}]}"#),
        Err(Error::Json(_))
    ));
}

#[test]
fn test_envelope_shape() {
    let mut store = HierarchyStore::new();
    let _ = store.add_category();
    let envelope = Envelope {
        paper_sections: crate::sections::SectionList::default(),
        johnny_decimal: store.serialize(),
    };

    let json: serde_json::Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();
    assert_eq!(json["paperSections"][0]["name"], "Abstract");
    assert_eq!(json["paperSections"][0]["isChecked"], false);
    assert!(json["paperSections"][0]["selectedIDs"].is_array());
    assert_eq!(json["johnnyDecimal"]["categories"][0]["range"], "0-9");

    let parsed = Envelope::from_json(&envelope.to_json().unwrap()).unwrap();
    assert_eq!(parsed, envelope);
}

#[test]
fn test_envelope_without_sections() {
    let envelope = Envelope::from_json(r#"{"johnnyDecimal": {"categories": []}}"#).unwrap();
    assert!(envelope.paper_sections.sections.is_empty());
}
