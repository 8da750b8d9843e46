use super::*;
use crate::draw::annotation::{AnnotationKind, AnnotationPatch, Bounds, Style};
use crate::draw::color::RED;

fn rect(id: &str, x: f64) -> Annotation {
    Annotation::new(
        id.into(),
        AnnotationKind::Rectangle,
        Bounds::new(x, 0.0, 10.0, 10.0),
        Style {
            color: RED,
            stroke_width: 3.0,
            opacity: 1.0,
            fill_color: None,
        },
        0,
    )
}

/// Applies an add to the store and records it, the way the editor does.
fn add(history: &mut History, store: &mut AnnotationStore, annotation: Annotation) {
    let index = store.len();
    store.push(annotation.clone());
    history.record(HistoryAction::add(history.len() as u64, annotation, index, 0));
}

fn ids(store: &AnnotationStore) -> Vec<String> {
    store
        .annotations()
        .iter()
        .map(|a| a.id.as_str().to_string())
        .collect()
}

#[test]
fn empty_history_is_inert() {
    let mut history = History::new();
    let mut store = AnnotationStore::new();
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert_eq!(history.index(), -1);
    assert!(!history.undo(&mut store));
    assert!(!history.redo(&mut store));
}

#[test]
fn undo_to_exhaustion_restores_initial_store() {
    let mut history = History::new();
    let mut store = AnnotationStore::new();
    store.push(rect("seed", 0.0));
    let initial = store.clone();

    add(&mut history, &mut store, rect("a", 1.0));
    add(&mut history, &mut store, rect("b", 2.0));

    let before = store.get(&"a".into()).unwrap().clone();
    let after = AnnotationPatch::bounds(Bounds::new(40.0, 40.0, 10.0, 10.0)).apply(&before, 9);
    store.replace(after.clone());
    history.record(HistoryAction::update(2, before, after, 1, 9));

    let (index, removed) = store.remove(&"seed".into()).unwrap();
    history.record(HistoryAction::delete(3, removed, index, 10));

    while history.undo(&mut store) {}
    assert_eq!(store, initial);
    assert_eq!(history.index(), -1);
    assert!(history.can_redo());
}

#[test]
fn redo_reapplies_each_kind() {
    let mut history = History::new();
    let mut store = AnnotationStore::new();
    add(&mut history, &mut store, rect("a", 0.0));
    add(&mut history, &mut store, rect("b", 1.0));

    let before = store.get(&"b".into()).unwrap().clone();
    let after = before.translated(5.0, 5.0);
    store.replace(after.clone());
    history.record(HistoryAction::update(2, before, after, 1, 1));

    let (index, removed) = store.remove(&"a".into()).unwrap();
    history.record(HistoryAction::delete(3, removed, index, 2));
    let final_state = store.clone();

    for _ in 0..4 {
        assert!(history.undo(&mut store));
    }
    assert!(store.is_empty());
    for _ in 0..4 {
        assert!(history.redo(&mut store));
    }
    assert_eq!(store, final_state);
    assert!(!history.can_redo());
}

#[test]
fn undo_delete_reinserts_at_original_position() {
    let mut history = History::new();
    let mut store = AnnotationStore::new();
    for (i, id) in ["a", "b", "c"].into_iter().enumerate() {
        add(&mut history, &mut store, rect(id, i as f64));
    }
    let (index, removed) = store.remove(&"b".into()).unwrap();
    history.record(HistoryAction::delete(3, removed, index, 0));
    assert_eq!(ids(&store), ["a", "c"]);

    history.undo(&mut store);
    assert_eq!(ids(&store), ["a", "b", "c"]);
}

#[test]
fn recording_after_undo_discards_redo_branch() {
    let mut history = History::new();
    let mut store = AnnotationStore::new();
    add(&mut history, &mut store, rect("a", 0.0));
    add(&mut history, &mut store, rect("b", 1.0));
    history.undo(&mut store);
    assert!(history.can_redo());

    add(&mut history, &mut store, rect("c", 2.0));
    assert!(!history.can_redo());
    assert_eq!(history.len(), 2);
    assert!(!history.redo(&mut store));
    assert_eq!(ids(&store), ["a", "c"]);
}

#[test]
fn log_is_capped_and_flags_stay_consistent() {
    let mut history = History::new();
    let mut store = AnnotationStore::new();
    for i in 0..(HISTORY_LIMIT + 10) {
        add(&mut history, &mut store, rect(&format!("a{i}"), i as f64));
        assert!(history.len() <= HISTORY_LIMIT);
        assert_eq!(history.index(), history.len() as isize - 1);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }
    assert_eq!(history.len(), HISTORY_LIMIT);
    // The oldest ten adds fell off the front.
    assert_eq!(history.actions()[0].target.id.as_str(), "a10");

    let mut undone = 0;
    while history.undo(&mut store) {
        undone += 1;
        assert_eq!(history.can_undo(), history.index() >= 0);
        assert_eq!(
            history.can_redo(),
            history.index() < history.len() as isize - 1
        );
    }
    assert_eq!(undone, HISTORY_LIMIT);
    // Only the unrecorded ten remain.
    assert_eq!(store.len(), 10);
}

#[test]
fn clear_resets_cursor() {
    let mut history = History::new();
    let mut store = AnnotationStore::new();
    add(&mut history, &mut store, rect("a", 0.0));
    history.clear();
    assert!(history.is_empty());
    assert_eq!(history.index(), -1);
    assert!(!history.can_undo());
}
