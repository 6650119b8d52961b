//! Consistencia entre los horarios y los directorios de asignaturas/docentes.
//!
//! Informational only: codes used in a timetable but missing from the subject
//! directory, codes defined but never scheduled, and faculty codes without a
//! display name. Nothing here fails.

use std::collections::BTreeSet;

use serde::Serialize;
use strsim::jaro_winkler;

use crate::algorithm::cell::parse_cell;
use crate::models::{Snapshot, TimetableGrid};

/// Minimum Jaro-Winkler score for a defined code to be offered as a suggestion.
pub const SUGGESTION_THRESHOLD: f64 = 0.85;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingSubject {
    pub code: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterCheck {
    pub program: String,
    pub semester: String,
    pub missing: Vec<MissingSubject>,
    pub extra: Vec<String>,
}

impl SemesterCheck {
    pub fn is_consistent(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DirectoryReport {
    pub semesters: Vec<SemesterCheck>,
    pub unknown_faculty: Vec<String>,
}

impl DirectoryReport {
    pub fn is_clean(&self) -> bool {
        self.unknown_faculty.is_empty() && self.semesters.iter().all(SemesterCheck::is_consistent)
    }

    pub fn warning_count(&self) -> usize {
        self.unknown_faculty.len()
            + self
                .semesters
                .iter()
                .map(|s| s.missing.len() + s.extra.len())
                .sum::<usize>()
    }
}

fn used_subject_codes(grid: &TimetableGrid) -> BTreeSet<String> {
    grid.rows()
        .iter()
        .flat_map(|row| row.iter().skip(1))
        .flat_map(|cell| parse_cell(cell))
        .map(|a| a.subject_code)
        .collect()
}

fn closest_code(code: &str, defined: &BTreeSet<&str>) -> Option<String> {
    defined
        .iter()
        .map(|d| (jaro_winkler(code, d), *d))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, d)| d.to_string())
}

/// Cross-checks every program/semester of the snapshot against its directories.
pub fn check_directories(snapshot: &Snapshot) -> DirectoryReport {
    let mut report = DirectoryReport::default();
    let mut faculty_seen: BTreeSet<String> = BTreeSet::new();

    for (program, semester, grid) in snapshot.timetables.grids() {
        let used = used_subject_codes(grid);
        let defined = snapshot.subjects.codes(program, semester);

        let missing: Vec<MissingSubject> = used
            .iter()
            .filter(|code| !defined.contains(code.as_str()))
            .map(|code| MissingSubject {
                code: code.clone(),
                suggestion: closest_code(code, &defined),
            })
            .collect();
        let extra: Vec<String> = defined
            .iter()
            .filter(|code| !used.contains(**code))
            .map(|code| code.to_string())
            .collect();

        if !missing.is_empty() {
            let codes: Vec<&str> = missing.iter().map(|m| m.code.as_str()).collect();
            tracing::warn!(program, semester, ?codes, "subject codes missing from subject directory");
        }
        if !extra.is_empty() {
            tracing::info!(program, semester, codes = ?extra, "subject codes defined but not scheduled");
        }

        for cell in grid.rows().iter().flat_map(|row| row.iter().skip(1)) {
            for a in parse_cell(cell) {
                faculty_seen.extend(a.faculty_codes);
            }
        }

        report.semesters.push(SemesterCheck {
            program: program.to_string(),
            semester: semester.to_string(),
            missing,
            extra,
        });
    }

    report.unknown_faculty = faculty_seen
        .into_iter()
        .filter(|code| !snapshot.faculties.contains(code))
        .collect();
    if !report.unknown_faculty.is_empty() {
        tracing::warn!(codes = ?report.unknown_faculty, "faculty codes missing from faculty directory");
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestion_needs_a_close_code() {
        let defined: BTreeSet<&str> = ["CS101", "MA201"].into_iter().collect();
        assert_eq!(closest_code("CS1O1", &defined), Some("CS101".to_string()));
        assert_eq!(closest_code("ZZ", &defined), None);
    }
}
