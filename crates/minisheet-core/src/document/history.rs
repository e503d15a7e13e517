//! Bounded undo/redo history of cell text changes.

use std::collections::VecDeque;

use minisheet_engine::engine::{CellRef, Grid};

/// A single cell text change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action {
    pub cell_ref: CellRef,
    pub old_text: String,
    pub new_text: String,
}

impl Action {
    pub fn new(cell_ref: CellRef, old_text: &str, new_text: &str) -> Self {
        Action {
            cell_ref,
            old_text: old_text.to_string(),
            new_text: new_text.to_string(),
        }
    }
}

/// Represents a history entry (single change or batch from a fill)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryEntry {
    Single(Action),
    Batch(Vec<Action>),
}

/// Undo and redo stacks with a shared capacity.
///
/// When a stack is full the oldest entry is evicted. Recording a fresh edit
/// clears the redo stack.
#[derive(Clone, Debug)]
pub struct History {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        History {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            capacity,
        }
    }

    /// Record a single cell change. No-op changes are not recorded.
    pub fn record(&mut self, cell_ref: CellRef, old_text: &str, new_text: &str) {
        if old_text == new_text {
            return;
        }
        self.push_fresh(HistoryEntry::Single(Action::new(cell_ref, old_text, new_text)));
    }

    /// Record several changes that undo and redo together.
    pub fn record_batch(&mut self, actions: Vec<Action>) {
        let mut actions: Vec<Action> = actions
            .into_iter()
            .filter(|a| a.old_text != a.new_text)
            .collect();
        if actions.len() > 1 {
            self.push_fresh(HistoryEntry::Batch(actions));
        } else if let Some(action) = actions.pop() {
            self.push_fresh(HistoryEntry::Single(action));
        }
    }

    /// Undo the most recent entry, restoring each cell's old text.
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self, grid: &mut Grid) -> bool {
        let Some(entry) = self.undo_stack.pop_back() else {
            return false;
        };
        let inverse = apply(grid, &entry, Direction::Backward);
        push_bounded(&mut self.redo_stack, inverse, self.capacity);
        tracing::debug!(undo = self.undo_stack.len(), redo = self.redo_stack.len(), "undo");
        true
    }

    /// Re-apply the most recently undone entry.
    /// Returns false when there is nothing to redo.
    pub fn redo(&mut self, grid: &mut Grid) -> bool {
        let Some(entry) = self.redo_stack.pop_back() else {
            return false;
        };
        let inverse = apply(grid, &entry, Direction::Forward);
        push_bounded(&mut self.undo_stack, inverse, self.capacity);
        tracing::debug!(undo = self.undo_stack.len(), redo = self.redo_stack.len(), "redo");
        true
    }

    #[cfg(test)]
    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[cfg(test)]
    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[cfg(test)]
    fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn push_fresh(&mut self, entry: HistoryEntry) {
        push_bounded(&mut self.undo_stack, entry, self.capacity);
        self.redo_stack.clear();
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Backward,
    Forward,
}

/// Write an entry into the grid and build the entry that reverses it.
///
/// The inverse captures what the cell holds right now rather than trusting the
/// recorded text, so it stays correct if the cell was changed outside history.
fn apply(grid: &mut Grid, entry: &HistoryEntry, direction: Direction) -> HistoryEntry {
    match entry {
        HistoryEntry::Single(action) => HistoryEntry::Single(invert(grid, action, direction)),
        HistoryEntry::Batch(actions) => {
            let mut inverse = Vec::with_capacity(actions.len());
            match direction {
                // Unwind in reverse so overlapping writes restore the oldest text.
                Direction::Backward => {
                    for action in actions.iter().rev() {
                        inverse.push(invert(grid, action, direction));
                    }
                    inverse.reverse();
                }
                Direction::Forward => {
                    for action in actions {
                        inverse.push(invert(grid, action, direction));
                    }
                }
            }
            HistoryEntry::Batch(inverse)
        }
    }
}

fn invert(grid: &mut Grid, action: &Action, direction: Direction) -> Action {
    let current = grid.get_ref(&action.cell_ref);
    match direction {
        Direction::Backward => {
            grid.set_ref(&action.cell_ref, &action.old_text);
            Action::new(action.cell_ref, &action.old_text, &current)
        }
        Direction::Forward => {
            grid.set_ref(&action.cell_ref, &action.new_text);
            Action::new(action.cell_ref, &current, &action.new_text)
        }
    }
}

fn push_bounded(stack: &mut VecDeque<HistoryEntry>, entry: HistoryEntry, capacity: usize) {
    if capacity == 0 {
        return;
    }
    if stack.len() >= capacity {
        stack.pop_front();
    }
    stack.push_back(entry);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a1() -> CellRef {
        CellRef::new(0, 0)
    }

    #[test]
    fn test_undo_then_redo() {
        let mut grid = Grid::default();
        let mut history = History::new(10);
        grid.set(0, 0, "new");
        history.record(a1(), "old", "new");

        assert!(history.undo(&mut grid));
        assert_eq!(grid.get(0, 0), "old");
        assert!(history.redo(&mut grid));
        assert_eq!(grid.get(0, 0), "new");
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut grid = Grid::default();
        let mut history = History::new(10);
        assert!(!history.undo(&mut grid));
        assert!(!history.redo(&mut grid));
    }

    #[test]
    fn test_record_after_undo_clears_redo() {
        let mut grid = Grid::default();
        let mut history = History::new(10);
        grid.set(0, 0, "new");
        history.record(a1(), "old", "new");
        history.undo(&mut grid);
        assert!(history.can_redo());

        grid.set(0, 1, "x");
        history.record(CellRef::new(0, 1), "", "x");
        assert!(!history.can_redo());
        assert!(!history.redo(&mut grid));
        assert_eq!(grid.get(0, 0), "old");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut grid = Grid::default();
        let mut history = History::new(3);
        for i in 0..5 {
            let old = grid.get(0, 0);
            let new = i.to_string();
            grid.set(0, 0, &new);
            history.record(a1(), &old, &new);
        }
        assert_eq!(history.undo_len(), 3);
        while history.undo(&mut grid) {}
        // Only the last three edits could be undone: 4 -> 3 -> 2 -> 1.
        assert_eq!(grid.get(0, 0), "1");
    }

    #[test]
    fn test_redo_captures_current_text() {
        let mut grid = Grid::default();
        let mut history = History::new(10);
        grid.set(0, 0, "b");
        history.record(a1(), "a", "b");
        // Changed behind history's back.
        grid.set(0, 0, "c");
        history.undo(&mut grid);
        assert_eq!(grid.get(0, 0), "a");
        history.redo(&mut grid);
        assert_eq!(grid.get(0, 0), "c");
    }

    #[test]
    fn test_batch_undoes_as_one_step() {
        let mut grid = Grid::default();
        let mut history = History::new(10);
        let actions = vec![
            Action::new(CellRef::new(1, 0), "", "=A2"),
            Action::new(CellRef::new(2, 0), "", "=A3"),
        ];
        for action in &actions {
            grid.set_ref(&action.cell_ref, &action.new_text);
        }
        history.record_batch(actions);
        assert_eq!(history.undo_len(), 1);

        assert!(history.undo(&mut grid));
        assert_eq!(grid.get(1, 0), "");
        assert_eq!(grid.get(2, 0), "");
        assert!(history.redo(&mut grid));
        assert_eq!(grid.get(1, 0), "=A2");
        assert_eq!(grid.get(2, 0), "=A3");
    }

    #[test]
    fn test_unchanged_text_is_not_recorded() {
        let mut history = History::new(10);
        history.record(a1(), "same", "same");
        history.record_batch(vec![Action::new(a1(), "x", "x")]);
        assert!(!history.can_undo());
    }
}
