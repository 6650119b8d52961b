// Carga docente: horas semanales por faculty y desglose por programa/semestre/asignatura.
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::algorithm::cell::parse_cell;
use crate::algorithm::index::TimetableIndex;
use crate::models::FacultyDirectory;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadKey {
    pub program: String,
    pub semester: String,
    pub faculty: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacultyLoad {
    pub code: String,
    pub name: String,
    pub hours: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadBreakdownRow {
    pub program: String,
    pub semester: String,
    pub faculty: String,
    pub subject: String,
    pub hours: usize,
}

/// Per-faculty drill-down: one row per (program, semester, subject).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacultyLoadDetail {
    pub faculty: String,
    pub name: String,
    pub rows: Vec<LoadBreakdownRow>,
    /// Occupied weekly slots; a cell listing two subjects for the same faculty counts once.
    pub total_hours: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Faculty code -> occupied weekly slots. Faculty never scheduled are absent.
    pub per_faculty: BTreeMap<String, usize>,
    pub breakdown: BTreeMap<LoadKey, usize>,
}

/// Counts weekly slots per faculty in one pass over the index.
///
/// A cell adds one slot to every distinct faculty it names, so a co-taught
/// `"L2 (AK,MN)"` increments both AK and MN. Break markers and unparseable
/// cells add nothing.
pub fn aggregate_load(index: TimetableIndex<'_>) -> LoadSummary {
    let mut summary = LoadSummary::default();

    for entry in index.entries() {
        let assignments = parse_cell(entry.cell);
        if assignments.is_empty() {
            continue;
        }
        let mut counted: BTreeSet<&str> = BTreeSet::new();
        let mut counted_pairs: BTreeSet<(&str, &str)> = BTreeSet::new();
        for a in &assignments {
            for faculty in &a.faculty_codes {
                if counted.insert(faculty.as_str()) {
                    *summary.per_faculty.entry(faculty.clone()).or_insert(0) += 1;
                }
                if counted_pairs.insert((faculty.as_str(), a.subject_code.as_str())) {
                    let key = LoadKey {
                        program: entry.program.to_string(),
                        semester: entry.semester.to_string(),
                        faculty: faculty.clone(),
                        subject: a.subject_code.clone(),
                    };
                    *summary.breakdown.entry(key).or_insert(0) += 1;
                }
            }
        }
    }

    tracing::debug!(faculty = summary.per_faculty.len(), "load aggregated");
    summary
}

impl LoadSummary {
    pub fn hours_for(&self, faculty: &str) -> Option<usize> {
        self.per_faculty.get(faculty).copied()
    }

    pub fn total_hours(&self) -> usize {
        self.per_faculty.values().sum()
    }

    /// Descending by hours, ties by code ascending.
    pub fn ranked(&self, faculties: &FacultyDirectory) -> Vec<FacultyLoad> {
        let mut out: Vec<FacultyLoad> = self
            .per_faculty
            .iter()
            .map(|(code, hours)| FacultyLoad {
                code: code.clone(),
                name: faculties.name_of(code).to_string(),
                hours: *hours,
            })
            .collect();
        out.sort_by(|a, b| b.hours.cmp(&a.hours).then_with(|| a.code.cmp(&b.code)));
        out
    }

    pub fn breakdown_rows(&self) -> Vec<LoadBreakdownRow> {
        self.breakdown
            .iter()
            .map(|(k, hours)| LoadBreakdownRow {
                program: k.program.clone(),
                semester: k.semester.clone(),
                faculty: k.faculty.clone(),
                subject: k.subject.clone(),
                hours: *hours,
            })
            .collect()
    }

    pub fn detail_for(&self, faculty: &str, faculties: &FacultyDirectory) -> FacultyLoadDetail {
        let rows = self
            .breakdown_rows()
            .into_iter()
            .filter(|r| r.faculty == faculty)
            .collect();
        FacultyLoadDetail {
            faculty: faculty.to_string(),
            name: faculties.name_of(faculty).to_string(),
            rows,
            total_hours: self.hours_for(faculty).unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimetableCollection;
    use serde_json::json;

    #[test]
    fn co_taught_cell_counts_each_faculty_once() {
        let c: TimetableCollection = serde_json::from_value(json!({
            "CS": {"I": [["9-10", "L2 (AK,MN)", "P1 (AK) P2 (AK)", "Lunch", "", ""]]}
        }))
        .unwrap();
        let s = aggregate_load(TimetableIndex::unbounded(&c));
        assert_eq!(s.hours_for("AK"), Some(2));
        assert_eq!(s.hours_for("MN"), Some(1));
        assert_eq!(s.hours_for("RJ"), None);
        // breakdown keeps both subjects of the shared cell
        assert_eq!(s.breakdown.len(), 4);
        assert_eq!(s.total_hours(), 3);
    }

    #[test]
    fn ranking_breaks_ties_by_code() {
        let mut s = LoadSummary::default();
        s.per_faculty.insert("SK".into(), 3);
        s.per_faculty.insert("AK".into(), 3);
        s.per_faculty.insert("RJ".into(), 5);
        let ranked = s.ranked(&FacultyDirectory::from([("RJ", "Dr. R. Joshi")]));
        let codes: Vec<&str> = ranked.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["RJ", "AK", "SK"]);
        assert_eq!(ranked[0].name, "Dr. R. Joshi");
        assert_eq!(ranked[1].name, "Unknown");
    }
}
