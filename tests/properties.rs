//! Property tests for the hierarchy store's numbering, capacity and snapshot laws.

use jdex::hierarchy::{format_reference, MAX_CATEGORIES};
use jdex::store::{ActiveTab, HierarchyStore, Operation};
use proptest::prelude::*;
use std::collections::HashSet;

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        Just(Operation::AddCategory),
        (0..12usize).prop_map(|category| Operation::AddArea { category }),
        (0..12usize, 0..12usize).prop_map(|(category, area)| Operation::AddItem { category, area }),
        (0..12usize, 0..12usize)
            .prop_map(|(category, area)| Operation::RemoveArea { category, area }),
        (0..12usize, 0..12usize, 0..6usize).prop_map(|(category, area, item)| {
            Operation::RemoveItem {
                category,
                area,
                item,
            }
        }),
        (0..12usize).prop_map(|category| Operation::SelectCategory { category }),
        (0..12usize, 0..12usize)
            .prop_map(|(category, area)| Operation::SelectArea { category, area }),
        (0..12usize, 0..12usize, 0..6usize).prop_map(|(category, area, item)| {
            Operation::SelectItem {
                category,
                area,
                item,
            }
        }),
        (0..12usize, "[a-z]{0,8}")
            .prop_map(|(category, name)| Operation::UpdateCategoryName { category, name }),
        prop_oneof![
            Just(ActiveTab::Category),
            Just(ActiveTab::Area),
            Just(ActiveTab::Id)
        ]
        .prop_map(Operation::SetActiveTab),
    ]
}

fn run(operations: Vec<Operation>) -> HierarchyStore {
    let mut store = HierarchyStore::new();
    for operation in operations {
        let _ = store.apply(operation);
    }
    store
}

proptest! {
    #[test]
    fn category_count_never_exceeds_cap(extra in 0..20usize) {
        let mut store = HierarchyStore::new();
        for _ in 0..MAX_CATEGORIES + extra {
            let before = store.clone();
            let outcome = store.add_category();
            if before.categories().len() == MAX_CATEGORIES {
                prop_assert!(!outcome.is_applied());
                prop_assert_eq!(&store, &before);
            }
        }
        prop_assert_eq!(store.categories().len(), MAX_CATEGORIES);
    }

    #[test]
    fn serialize_restore_round_trips(operations in prop::collection::vec(operation(), 0..60)) {
        let store = run(operations);
        let restored = HierarchyStore::restore(store.serialize());

        prop_assert_eq!(restored.serialize(), store.serialize());
        prop_assert_eq!(restored.selection(), store.selection());
        prop_assert_eq!(restored.active_tab(), store.active_tab());
    }

    #[test]
    fn load_state_is_idempotent(operations in prop::collection::vec(operation(), 0..60)) {
        let snapshot = run(operations).serialize();
        let mut store = HierarchyStore::new();
        let _ = store.load_state(snapshot.clone());
        let once = store.clone();
        let _ = store.load_state(snapshot);

        prop_assert_eq!(store, once);
    }

    #[test]
    fn numbers_stay_in_range_and_unique(operations in prop::collection::vec(operation(), 0..80)) {
        let store = run(operations);

        for (c, category) in store.categories().iter().enumerate() {
            let mut areas = HashSet::new();
            for area in &category.areas {
                prop_assert!((10 * c..=10 * c + 9).contains(&area.number));
                prop_assert!(areas.insert(area.number));

                let mut items = HashSet::new();
                for item in &area.items {
                    prop_assert!(item.number >= 1 && item.number < area.next_number);
                    prop_assert!(items.insert(item.number));
                }
            }
        }
    }

    #[test]
    fn selection_always_points_at_nodes(operations in prop::collection::vec(operation(), 0..80)) {
        let store = run(operations);
        let selection = store.selection();

        if let Some(c) = selection.category {
            prop_assert!(c < store.categories().len());
        }
        if let Some(a) = selection.area {
            prop_assert!(store.area(selection.category.unwrap(), a).is_some());
        }
        if let Some(i) = selection.item {
            prop_assert!(store
                .item(selection.category.unwrap(), selection.area.unwrap(), i)
                .is_some());
        }
    }

    #[test]
    fn references_resolve_to_their_item(operations in prop::collection::vec(operation(), 0..80)) {
        let store = run(operations);

        for (c, category) in store.categories().iter().enumerate() {
            for (a, area) in category.areas.iter().enumerate() {
                for (i, item) in area.items.iter().enumerate() {
                    let reference = format_reference(area.number, item.number);
                    prop_assert_eq!(store.resolve(&reference), Some((c, a, i)));
                }
            }
        }
    }
}

#[test]
fn reference_is_zero_padded() {
    assert_eq!(format_reference(12, 3), "12.03");
    assert_eq!(format_reference(47, 99), "47.99");
}
