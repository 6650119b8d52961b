//! Recorrido normalizado del TimetableCollection.
//!
//! Every analysis pass walks the collection through [`TimetableIndex`] so the
//! traversal order (program -> semester -> row -> weekday) and the tolerance
//! rules for short grids/rows live in one place.

use crate::models::{TimetableCollection, Weekday};

/// One occupied weekday cell of one semester grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotEntry<'a> {
    pub program: &'a str,
    pub semester: &'a str,
    pub row_index: usize,
    pub time_slot: &'a str,
    pub day: Weekday,
    pub cell: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct TimetableIndex<'a> {
    collection: &'a TimetableCollection,
    slot_limit: usize,
}

impl<'a> TimetableIndex<'a> {
    /// `slot_limit` is the length of the canonical time-slot list; rows past it
    /// are never visited.
    pub fn new(collection: &'a TimetableCollection, slot_limit: usize) -> Self {
        TimetableIndex { collection, slot_limit }
    }

    /// Visits every row of every grid.
    pub fn unbounded(collection: &'a TimetableCollection) -> Self {
        Self::new(collection, usize::MAX)
    }

    pub fn collection(&self) -> &'a TimetableCollection {
        self.collection
    }

    pub fn slot_limit(&self) -> usize {
        self.slot_limit
    }

    /// Lazy, restartable sequence of non-blank weekday cells.
    ///
    /// Grids shorter than the slot limit stop at their last row, short rows
    /// stop at their last column, and columns past FRI are ignored.
    pub fn entries(self) -> impl Iterator<Item = SlotEntry<'a>> {
        let limit = self.slot_limit;
        self.collection.grids().flat_map(move |(program, semester, grid)| {
            grid.rows()
                .iter()
                .take(limit)
                .enumerate()
                .flat_map(move |(row_index, row)| {
                    let time_slot = row.first().map(String::as_str).unwrap_or("");
                    row.iter().enumerate().skip(1).filter_map(move |(col, cell)| {
                        let day = Weekday::from_column(col)?;
                        if cell.trim().is_empty() {
                            return None;
                        }
                        Some(SlotEntry {
                            program,
                            semester,
                            row_index,
                            time_slot,
                            day,
                            cell: cell.as_str(),
                        })
                    })
                })
        })
    }
}
