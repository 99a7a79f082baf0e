use super::*;

fn record(id: &str, holder: &str) -> BookingRecord {
    BookingRecord { holder_name: holder.to_owned(), ..BookingRecord::new(id) }
}

fn ids(store: &BookingStore) -> Vec<&str> {
    store.items().iter().map(|item| item.id.as_str()).collect()
}

fn assert_unique_ids(store: &BookingStore) {
    let mut seen = std::collections::HashSet::new();
    for item in store.items() {
        assert!(seen.insert(item.id.clone()), "duplicate id {}", item.id);
    }
}

// =============================================================================
// upsert
// =============================================================================

#[test]
fn new_store_is_empty() {
    let store = BookingStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
    assert_eq!(store.revision(), 0);
}

#[test]
fn upsert_appends_unknown_id() {
    let mut store = BookingStore::new();
    store.upsert(record("a", "X"));
    store.upsert(record("b", "Y"));
    assert_eq!(ids(&store), vec!["a", "b"]);
}

#[test]
fn upsert_existing_id_replaces_fields() {
    let mut store = BookingStore::new();
    store.upsert(record("a", "X"));
    store.upsert(record("a", "Y"));
    assert_eq!(store.items(), &[record("a", "Y")]);
}

#[test]
fn upsert_existing_id_keeps_position() {
    let mut store = BookingStore::new();
    store.replace_all(vec![record("a", "1"), record("b", "2"), record("c", "3")]);

    let replacement = BookingRecord {
        phone: "02-000".into(),
        venue_address: "Somewhere".into(),
        scheduled_at: "2025-01-01T00:00:00Z".into(),
        booked_by: Some("alice".into()),
        provider_id: Some("p1".into()),
        ..record("b", "new")
    };
    store.upsert(replacement.clone());

    assert_eq!(ids(&store), vec!["a", "b", "c"]);
    assert_eq!(store.get("b"), Some(&replacement));
}

// =============================================================================
// remove
// =============================================================================

#[test]
fn remove_drops_matching_record() {
    let mut store = BookingStore::new();
    store.replace_all(vec![BookingRecord::new("a"), BookingRecord::new("b")]);
    store.remove("a");
    assert_eq!(store.items(), &[BookingRecord::new("b")]);
}

#[test]
fn remove_absent_id_leaves_items_unchanged() {
    let mut store = BookingStore::new();
    store.replace_all(vec![record("a", "X"), record("b", "Y")]);
    let before = store.items().to_vec();
    store.remove("zzz");
    assert_eq!(store.items(), before.as_slice());
}

#[test]
fn remove_on_empty_store_is_noop() {
    let mut store = BookingStore::new();
    store.remove("a");
    assert!(store.is_empty());
}

// =============================================================================
// replace_all
// =============================================================================

#[test]
fn replace_all_empty_clears_store() {
    let mut store = BookingStore::new();
    store.replace_all(vec![record("a", "X"), record("b", "Y")]);
    store.replace_all(Vec::new());
    assert!(store.is_empty());
}

#[test]
fn replace_all_adopts_records_verbatim() {
    let mut store = BookingStore::new();
    store.upsert(record("old", "gone"));
    store.replace_all(vec![record("c", "3"), record("a", "1")]);
    assert_eq!(ids(&store), vec!["c", "a"]);
    assert!(store.get("old").is_none());
}

// =============================================================================
// revision / refresh policy
// =============================================================================

#[test]
fn every_mutation_bumps_revision() {
    let mut store = BookingStore::new();
    store.upsert(record("a", "X"));
    store.remove("missing");
    store.replace_all(Vec::new());
    assert_eq!(store.revision(), 3);
}

#[test]
fn refresh_applies_when_nothing_committed_meanwhile() {
    let mut store = BookingStore::new();
    let seen = store.revision();
    assert!(store.replace_all_if_unchanged(vec![record("a", "X")], seen));
    assert_eq!(ids(&store), vec!["a"]);
}

#[test]
fn refresh_is_discarded_after_concurrent_delete() {
    let mut store = BookingStore::new();
    store.replace_all(vec![record("a", "X"), record("b", "Y")]);

    let seen = store.revision();
    // Delete commits while the refresh is still in flight.
    store.remove("a");
    let stale = vec![record("a", "X"), record("b", "Y")];

    assert!(!store.replace_all_if_unchanged(stale, seen));
    assert_eq!(ids(&store), vec!["b"]);
}

#[test]
fn refresh_is_discarded_after_concurrent_edit() {
    let mut store = BookingStore::new();
    store.replace_all(vec![record("a", "X")]);

    let seen = store.revision();
    store.upsert(record("a", "edited"));

    assert!(!store.replace_all_if_unchanged(vec![record("a", "X")], seen));
    assert_eq!(store.get("a").map(|r| r.holder_name.as_str()), Some("edited"));
}

// =============================================================================
// id uniqueness across operation sequences
// =============================================================================

#[test]
fn ids_stay_unique_across_mixed_operations() {
    let mut store = BookingStore::new();
    let script: [(&str, &str); 10] = [
        ("upsert", "a"),
        ("upsert", "b"),
        ("upsert", "a"),
        ("remove", "b"),
        ("upsert", "c"),
        ("upsert", "b"),
        ("upsert", "c"),
        ("remove", "zz"),
        ("upsert", "a"),
        ("upsert", "d"),
    ];

    for (step, (op, id)) in script.iter().enumerate() {
        match *op {
            "upsert" => store.upsert(record(id, &step.to_string())),
            "remove" => store.remove(id),
            _ => unreachable!(),
        }
        assert_unique_ids(&store);
    }

    assert_eq!(ids(&store), vec!["a", "c", "b", "d"]);
    assert_eq!(store.get("a").map(|r| r.holder_name.as_str()), Some("8"));
}

#[test]
fn upsert_after_bulk_load_never_duplicates() {
    let mut store = BookingStore::new();
    store.replace_all(vec![record("a", "1"), record("b", "2")]);
    store.upsert(record("b", "3"));
    store.upsert(record("a", "4"));
    assert_unique_ids(&store);
    assert_eq!(store.len(), 2);
}

#[test]
fn record_serializes_with_wire_field_names() {
    let json = serde_json::to_value(record("a", "Clinic")).unwrap();
    assert_eq!(json["_id"], "a");
    assert_eq!(json["nameLastname"], "Clinic");
    assert!(json.get("bookedBy").is_none());
}
