// Vista consolidada: un único horario semanal por docente a partir de todos los programas.
use std::collections::BTreeSet;

use serde::Serialize;

use crate::algorithm::cell::cell_has_faculty;
use crate::algorithm::index::TimetableIndex;
use crate::models::{GRID_COLUMNS, TimetableGrid, Weekday};

/// One program/semester grid reduced to a single faculty's cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemesterView {
    pub program: String,
    pub semester: String,
    pub grid: TimetableGrid,
}

/// Merges every program/semester grid into one weekly grid for `faculty`.
///
/// The result has one row per canonical slot and `GRID_COLUMNS` columns. A cell
/// holds the raw source cell when the faculty appears in it, otherwise "".
/// When two sources hit the same position the later one in index order wins;
/// such collisions are clashes and are reported by the clash detector.
/// A row is labelled with the time slot of the first source cell placed in it,
/// or with the canonical slot when nothing lands there.
pub fn build_consolidated<S: AsRef<str>>(index: TimetableIndex<'_>, faculty: &str, time_slots: &[S]) -> TimetableGrid {
    let mut grid = TimetableGrid::blank(time_slots);
    let mut labelled = vec![false; grid.rows.len()];

    for entry in index.entries() {
        if entry.row_index >= grid.rows.len() || !cell_has_faculty(entry.cell, faculty) {
            continue;
        }
        let row = &mut grid.rows[entry.row_index];
        if !labelled[entry.row_index] && !entry.time_slot.trim().is_empty() {
            row[0] = entry.time_slot.to_string();
            labelled[entry.row_index] = true;
        }
        row[entry.day.column()] = entry.cell.to_string();
    }

    grid
}

/// Positions `(time_slot, day)` where `faculty` appears in a (consolidated) grid.
pub fn consolidated_positions(grid: &TimetableGrid, faculty: &str) -> BTreeSet<(String, Weekday)> {
    let mut out = BTreeSet::new();
    for row in grid.rows() {
        let slot = row.first().cloned().unwrap_or_default();
        for (col, cell) in row.iter().enumerate().take(GRID_COLUMNS).skip(1) {
            if let Some(day) = Weekday::from_column(col) {
                if cell_has_faculty(cell, faculty) {
                    out.insert((slot.clone(), day));
                }
            }
        }
    }
    out
}

/// Copy of `grid` keeping only the cells that name `faculty`. Row shape is preserved.
pub fn filter_grid_for_faculty(grid: &TimetableGrid, faculty: &str) -> TimetableGrid {
    let rows = grid
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, cell)| {
                    if col == 0 || cell_has_faculty(cell, faculty) {
                        cell.clone()
                    } else {
                        String::new()
                    }
                })
                .collect()
        })
        .collect();
    TimetableGrid::new(rows)
}

/// Filtered grids of every semester where `faculty` teaches at least once.
/// Rows past the index slot limit are dropped, as in the consolidated grid.
pub fn faculty_semester_views(index: TimetableIndex<'_>, faculty: &str) -> Vec<SemesterView> {
    index
        .collection()
        .grids()
        .filter_map(|(program, semester, grid)| {
            let mut filtered = filter_grid_for_faculty(grid, faculty);
            filtered.rows.truncate(index.slot_limit());
            filtered.has_entries().then(|| SemesterView {
                program: program.to_string(),
                semester: semester.to_string(),
                grid: filtered,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimetableCollection;
    use serde_json::json;

    #[test]
    fn later_source_wins_on_collision() {
        let c: TimetableCollection = serde_json::from_value(json!({
            "CS": {"I": [["9-10", "P1 (RJ)", "", "", "", ""]]},
            "IT": {"I": [["9-10", "P7 (RJ,SK)", "", "", "", ""]]}
        }))
        .unwrap();
        let grid = build_consolidated(TimetableIndex::new(&c, 2), "RJ", &["9-10", "10-11"]);
        assert_eq!(grid.rows.len(), 2);
        assert_eq!(grid.rows[0][1], "P7 (RJ,SK)");
        assert_eq!(grid.rows[1], vec!["10-11", "", "", "", "", ""]);
    }

    #[test]
    fn semester_views_stop_at_slot_limit() {
        let c: TimetableCollection = serde_json::from_value(json!({
            "CS": {"I": [
                ["9-10", "P1 (RJ)", "", "", "", ""],
                ["10-11", "", "", "", "", ""],
                ["5-6", "P9 (RJ)", "", "", "", ""]
            ]},
            "IT": {"I": [
                ["9-10", "", "", "", "", ""],
                ["10-11", "", "", "", "", ""],
                ["5-6", "P8 (RJ)", "", "", "", ""]
            ]}
        }))
        .unwrap();
        let views = faculty_semester_views(TimetableIndex::new(&c, 2), "RJ");
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].program, "CS");
        assert_eq!(views[0].grid.rows.len(), 2);
        assert_eq!(faculty_semester_views(TimetableIndex::unbounded(&c), "RJ").len(), 2);
    }

    #[test]
    fn filter_keeps_row_shape() {
        let grid = TimetableGrid::new(vec![vec![
            "9-10".into(),
            "P1 (RJ)".into(),
            "P2 (SK)".into(),
            "Lunch".into(),
        ]]);
        let filtered = filter_grid_for_faculty(&grid, "RJ");
        assert_eq!(filtered.rows[0], vec!["9-10", "P1 (RJ)", "", ""]);
    }
}
