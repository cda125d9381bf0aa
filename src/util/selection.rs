//! Ordered list with at most one selected position

use crate::error::SelectionError;
use std::fmt;

/// Ordered sequence of elements where zero or one position is selected.
///
/// The selected index, when present, is always a valid position: every
/// operation that shrinks the list re-establishes that invariant. Removal
/// deliberately leaves nothing selected instead of moving the selection to
/// the shifted neighbour.
#[derive(Debug, Clone)]
pub struct SelectionList<T> {
    items: Vec<T>,
    selected: Option<usize>,
}

impl<T> SelectionList<T> {
    /// Create an empty list with nothing selected
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Element at position `index`
    pub fn get(&self, index: usize) -> Result<&T, SelectionError> {
        self.items.get(index).ok_or(SelectionError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    /// Append an element and select it
    pub fn add(&mut self, element: T) {
        self.items.push(element);
        self.selected = Some(self.items.len() - 1);
    }

    /// Select the element at position `index`
    pub fn select(&mut self, index: usize) -> Result<(), SelectionError> {
        if index >= self.items.len() {
            return Err(SelectionError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.selected = Some(index);
        Ok(())
    }

    /// Clear the selection
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn some_selected(&self) -> bool {
        self.selected.is_some()
    }

    /// Selected position, if any
    pub fn selection(&self) -> Option<usize> {
        self.selected
    }

    /// Index of the selected element
    pub fn index_selected(&self) -> Result<usize, SelectionError> {
        self.selected.ok_or(SelectionError::NoSelection)
    }

    /// The selected element
    pub fn selected(&self) -> Result<&T, SelectionError> {
        let index = self.index_selected()?;
        Ok(&self.items[index])
    }

    /// Move the selection one step forward, clearing it past the end
    pub fn next(&mut self) {
        self.selected = match self.selected {
            Some(index) if index + 1 < self.items.len() => Some(index + 1),
            _ => None,
        };
    }

    /// Move the selection one step back, clearing it before the start
    pub fn previous(&mut self) {
        self.selected = match self.selected {
            Some(index) if index > 0 => Some(index - 1),
            _ => None,
        };
    }

    /// Remove the selected element, leaving nothing selected.
    ///
    /// Returns `None` (and changes nothing) when no element is selected.
    pub fn remove(&mut self) -> Option<T> {
        let index = self.selected.take()?;
        Some(self.items.remove(index))
    }

    /// Relocate the selected element to `target`, keeping it selected.
    ///
    /// Elements between the two positions shift by one.
    pub fn move_selected(&mut self, target: usize) -> Result<(), SelectionError> {
        let current = self.index_selected()?;
        if target >= self.items.len() {
            return Err(SelectionError::IndexOutOfRange {
                index: target,
                len: self.items.len(),
            });
        }
        let element = self.items.remove(current);
        self.items.insert(target, element);
        self.selected = Some(target);
        Ok(())
    }

    /// Position of the first element matching `predicate`
    pub fn position<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().position(predicate)
    }

    /// Iterate over the elements in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Default for SelectionList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a SelectionList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: fmt::Display> fmt::Display for SelectionList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, item) in self.items.iter().enumerate() {
            writeln!(f, "{} {}", index, item)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prop_assert;
    use proptest::prop_assert_eq;

    fn list_of(values: &[i32]) -> SelectionList<i32> {
        let mut list = SelectionList::new();
        for value in values {
            list.add(*value);
        }
        list
    }

    #[test]
    fn test_new_list_has_no_selection() {
        let list: SelectionList<i32> = SelectionList::new();
        assert!(list.is_empty());
        assert!(!list.some_selected());
        assert_eq!(list.index_selected(), Err(SelectionError::NoSelection));
        assert_eq!(list.selected(), Err(SelectionError::NoSelection));
    }

    #[test]
    fn test_add_selects_new_tail() {
        let mut list = list_of(&[1, 2]);
        list.select(0).unwrap();
        list.add(3);
        assert_eq!(list.index_selected(), Ok(2));
        assert_eq!(list.selected(), Ok(&3));
    }

    #[test]
    fn test_get_out_of_range() {
        let list = list_of(&[1]);
        assert_eq!(list.get(0), Ok(&1));
        assert_eq!(
            list.get(1),
            Err(SelectionError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn test_select_rejects_invalid_index() {
        let mut list = list_of(&[1, 2]);
        list.select(0).unwrap();
        assert!(list.select(2).is_err());
        // A failed select keeps the previous selection
        assert_eq!(list.index_selected(), Ok(0));
    }

    #[test]
    fn test_next_and_previous_clear_at_bounds() {
        let mut list = list_of(&[1, 2, 3]);
        list.next();
        assert!(!list.some_selected());

        list.select(1).unwrap();
        list.next();
        assert_eq!(list.index_selected(), Ok(2));

        list.select(0).unwrap();
        list.previous();
        assert!(!list.some_selected());

        list.previous();
        assert!(!list.some_selected());
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut list = list_of(&[1, 2, 3]);
        list.select(1).unwrap();
        assert_eq!(list.remove(), Some(2));
        assert_eq!(list.len(), 2);
        assert!(!list.some_selected());
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 3]);

        assert_eq!(list.remove(), None);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_move_selected_shifts_intermediate_elements() {
        let mut list = list_of(&[1, 2, 3, 4]);
        list.select(3).unwrap();
        list.move_selected(1).unwrap();
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 4, 2, 3]);
        assert_eq!(list.index_selected(), Ok(1));
    }

    #[test]
    fn test_iteration_is_restartable() {
        let list = list_of(&[5, 6]);
        let first: Vec<_> = list.iter().collect();
        let second: Vec<_> = (&list).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_display_lists_index_and_item() {
        let list = list_of(&[7, 8]);
        assert_eq!(list.to_string(), "0 7\n1 8\n");
    }

    proptest::proptest! {
        #[test]
        fn remove_shrinks_by_one_or_changes_nothing(
            values in proptest::collection::vec(0i32..100, 0..20),
            pick in proptest::option::of(0usize..20),
        ) {
            let mut list = list_of(&values);
            list.deselect();
            if let Some(index) = pick {
                let _ = list.select(index);
            }
            let before_len = list.len();
            let was_selected = list.some_selected();

            list.remove();

            if was_selected {
                prop_assert_eq!(list.len(), before_len - 1);
            } else {
                prop_assert_eq!(list.len(), before_len);
            }
            prop_assert!(!list.some_selected());
        }

        #[test]
        fn add_always_selects_the_tail(
            values in proptest::collection::vec(0i32..100, 0..20),
            pick in proptest::option::of(0usize..20),
        ) {
            let mut list = list_of(&values);
            list.deselect();
            if let Some(index) = pick {
                let _ = list.select(index);
            }
            list.add(-1);
            prop_assert_eq!(list.index_selected(), Ok(list.len() - 1));
            prop_assert_eq!(list.selected(), Ok(&-1));
        }

        #[test]
        fn navigation_never_leaves_range(
            len in 1usize..15,
            ops in proptest::collection::vec(proptest::bool::ANY, 1..60),
        ) {
            let values: Vec<i32> = (0..len as i32).collect();
            let mut list = list_of(&values);
            for forward in ops {
                let before = list.selection();
                if forward { list.next() } else { list.previous() }
                if let Some(index) = list.selection() {
                    prop_assert!(index < list.len());
                }
                match (before, list.selection()) {
                    (Some(b), None) => prop_assert!(
                        (forward && b == len - 1) || (!forward && b == 0)
                    ),
                    (None, None) => {}
                    (None, Some(_)) => prop_assert!(false, "navigation selected from nothing"),
                    (Some(b), Some(a)) => prop_assert_eq!(
                        a as isize - b as isize,
                        if forward { 1 } else { -1 }
                    ),
                }
                if list.selection().is_none() {
                    list.select(0).unwrap();
                }
            }
        }
    }
}
