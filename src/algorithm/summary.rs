// Resúmenes por horario: clases por asignatura y docentes involucrados.
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::algorithm::cell::parse_cell;
use crate::models::{FacultyDirectory, SubjectDirectory, TimetableGrid};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectCount {
    pub code: String,
    pub name: String,
    pub classes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacultyEntry {
    pub code: String,
    pub name: String,
}

/// Number of weekday cells per subject in one grid, sorted by code.
/// A cell naming the same subject twice counts once.
pub fn subject_summary(
    grid: &TimetableGrid,
    program: &str,
    semester: &str,
    subjects: &SubjectDirectory,
) -> Vec<SubjectCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in grid.rows() {
        for cell in row.iter().skip(1) {
            let codes: BTreeSet<String> = parse_cell(cell).into_iter().map(|a| a.subject_code).collect();
            for code in codes {
                *counts.entry(code).or_insert(0) += 1;
            }
        }
    }
    counts
        .into_iter()
        .map(|(code, classes)| SubjectCount {
            name: subjects.name_of(program, semester, &code).to_string(),
            code,
            classes,
        })
        .collect()
}

/// Distinct faculty codes of one grid, sorted, with display names.
pub fn faculty_involved(grid: &TimetableGrid, faculties: &FacultyDirectory) -> Vec<FacultyEntry> {
    let codes: BTreeSet<String> = grid
        .rows()
        .iter()
        .flat_map(|row| row.iter().skip(1))
        .flat_map(|cell| parse_cell(cell))
        .flat_map(|a| a.faculty_codes)
        .collect();
    codes
        .into_iter()
        .map(|code| FacultyEntry {
            name: faculties.name_of(&code).to_string(),
            code,
        })
        .collect()
}
