//! Annotation store: the canonical ordered annotation list plus the selection.

use super::annotation::{Annotation, AnnotationId, Point};

/// Ordered collection of annotations (first = bottom, last = topmost for hit-testing).
///
/// Read access is public. The raw mutators are crate-private: the editor wraps
/// them with history recording, and the history engine calls them directly when
/// replaying so that undo/redo never record themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
    selected: Option<AnnotationId>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn get(&self, id: &AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| &a.id == id)
    }

    pub fn position(&self, id: &AnnotationId) -> Option<usize> {
        self.annotations.iter().position(|a| &a.id == id)
    }

    pub fn selected(&self) -> Option<&AnnotationId> {
        self.selected.as_ref()
    }

    pub fn selected_annotation(&self) -> Option<&Annotation> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    /// Sets or clears the selection. Unknown ids clear it.
    pub fn select(&mut self, id: Option<AnnotationId>) {
        self.selected = id.filter(|id| self.position(id).is_some());
    }

    /// Topmost annotation whose bounds contain `point`.
    pub fn hit_test(&self, point: Point) -> Option<&Annotation> {
        self.annotations
            .iter()
            .rev()
            .find(|a| a.bounds.contains(point))
    }

    pub(crate) fn push(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// Inserts at `index`, clamped to the current length.
    pub(crate) fn insert_at(&mut self, index: usize, annotation: Annotation) {
        let index = index.min(self.annotations.len());
        self.annotations.insert(index, annotation);
    }

    /// Removes by id, returning the removed annotation and its former index.
    /// Clears the selection when it pointed at the removed annotation.
    pub(crate) fn remove(&mut self, id: &AnnotationId) -> Option<(usize, Annotation)> {
        let index = self.position(id)?;
        let removed = self.annotations.remove(index);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        Some((index, removed))
    }

    /// Replaces the annotation with the same id in place.
    pub(crate) fn replace(&mut self, annotation: Annotation) -> Option<Annotation> {
        let index = self.position(&annotation.id)?;
        Some(std::mem::replace(&mut self.annotations[index], annotation))
    }

    pub(crate) fn clear(&mut self) {
        self.annotations.clear();
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::annotation::{AnnotationKind, Bounds, Style};
    use crate::draw::color::BLUE;

    fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> Annotation {
        Annotation::new(
            id.into(),
            AnnotationKind::Rectangle,
            Bounds::new(x, y, w, h),
            Style {
                color: BLUE,
                stroke_width: 2.0,
                opacity: 1.0,
                fill_color: None,
            },
            0,
        )
    }

    #[test]
    fn hit_test_prefers_topmost() {
        let mut store = AnnotationStore::new();
        store.push(rect("a", 0.0, 0.0, 50.0, 50.0));
        store.push(rect("b", 25.0, 25.0, 50.0, 50.0));
        let hit = store.hit_test(Point::new(30.0, 30.0)).unwrap();
        assert_eq!(hit.id.as_str(), "b");
        assert_eq!(store.hit_test(Point::new(5.0, 5.0)).unwrap().id.as_str(), "a");
        assert!(store.hit_test(Point::new(90.0, 90.0)).is_none());
    }

    #[test]
    fn remove_clears_matching_selection() {
        let mut store = AnnotationStore::new();
        store.push(rect("a", 0.0, 0.0, 5.0, 5.0));
        store.push(rect("b", 0.0, 0.0, 5.0, 5.0));
        store.select(Some("b".into()));
        let (index, removed) = store.remove(&"b".into()).unwrap();
        assert_eq!(index, 1);
        assert_eq!(removed.id.as_str(), "b");
        assert!(store.selected().is_none());
    }

    #[test]
    fn select_ignores_unknown_ids() {
        let mut store = AnnotationStore::new();
        store.push(rect("a", 0.0, 0.0, 5.0, 5.0));
        store.select(Some("missing".into()));
        assert!(store.selected().is_none());
        store.select(Some("a".into()));
        assert_eq!(store.selected().map(AnnotationId::as_str), Some("a"));
    }

    #[test]
    fn insert_at_clamps_index() {
        let mut store = AnnotationStore::new();
        store.insert_at(9, rect("a", 0.0, 0.0, 1.0, 1.0));
        store.insert_at(0, rect("b", 0.0, 0.0, 1.0, 1.0));
        let ids: Vec<_> = store.annotations().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }
}
