//! Checkbox selection over the grouped view.

use std::collections::HashSet;

use uuid::Uuid;

/// Selected submission ids, kept in the order they were picked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<Uuid>,
    index: HashSet<Uuid>,
}

impl Selection {
    pub fn ids(&self) -> &[Uuid] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.index.contains(&id)
    }

    /// Select `id`, or deselect it when already selected
    pub fn toggle(&mut self, id: Uuid) {
        if self.index.remove(&id) {
            self.ids.retain(|selected| *selected != id);
        } else {
            self.index.insert(id);
            self.ids.push(id);
        }
    }

    /// The header checkbox: clears the visible ids when all of them are
    /// selected, otherwise selects exactly the visible ids
    pub fn toggle_all(&mut self, visible: &[Uuid]) {
        if self.is_all_selected(visible) {
            for id in visible {
                self.index.remove(id);
            }
            let index = &self.index;
            self.ids.retain(|id| index.contains(id));
        } else {
            *self = Self::from_iter(visible.iter().copied());
        }
    }

    /// False for an empty view
    pub fn is_all_selected(&self, visible: &[Uuid]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.index.contains(id))
    }
}

impl FromIterator<Uuid> for Selection {
    /// Duplicates collapse into one entry
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        let mut selection = Self::default();
        for id in iter {
            if !selection.contains(id) {
                selection.toggle(id);
            }
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let id = Uuid::new_v4();
        let mut selection = Selection::default();
        selection.toggle(id);
        assert!(selection.contains(id));
        selection.toggle(id);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_all_selects_exactly_visible() {
        let visible = ids(3);
        let hidden = Uuid::new_v4();

        let mut selection = Selection::default();
        selection.toggle(hidden);
        selection.toggle(visible[0]);
        selection.toggle_all(&visible);

        assert_eq!(selection.ids(), visible.as_slice());
        assert!(selection.is_all_selected(&visible));
        assert!(!selection.contains(hidden));
    }

    #[test]
    fn test_toggle_all_twice_clears() {
        let visible = ids(4);
        let mut selection = Selection::default();
        selection.toggle_all(&visible);
        selection.toggle_all(&visible);
        assert!(selection.is_empty());
        assert!(!selection.is_all_selected(&visible));
    }

    #[test]
    fn test_clearing_visible_keeps_other_selections() {
        let all = ids(4);
        let mut selection: Selection = all.iter().copied().collect();
        selection.toggle_all(&all[1..3]);

        assert_eq!(selection.ids(), &[all[0], all[3]]);
        assert!(!selection.contains(all[1]));
        assert!(selection.contains(all[3]));
        selection.toggle(all[1]);
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn test_empty_view_is_never_all_selected() {
        let selection: Selection = ids(2).into_iter().collect();
        assert!(!selection.is_all_selected(&[]));
    }

    #[test]
    fn test_from_iter_dedupes() {
        let id = Uuid::new_v4();
        let selection: Selection = [id, id, id].into_iter().collect();
        assert_eq!(selection.len(), 1);
    }
}
