// Módulo de alto nivel del motor de análisis de horarios.
// Declarar submódulos (archivos en la carpeta `src/algorithm`)
pub mod cell;
pub mod conflict;
pub mod consolidated;
pub mod directory_check;
pub mod index;
pub mod load;
pub mod similarity;
pub mod summary;

pub use cell::{cell_faculty_codes, cell_has_faculty, cell_subject_codes, is_break_marker, parse_cell};
pub use conflict::{ClashReport, detect_clashes};
pub use consolidated::{
    SemesterView, build_consolidated, consolidated_positions, faculty_semester_views, filter_grid_for_faculty,
};
pub use directory_check::{DirectoryReport, MissingSubject, SemesterCheck, check_directories};
pub use index::{SlotEntry, TimetableIndex};
pub use load::{FacultyLoad, FacultyLoadDetail, LoadBreakdownRow, LoadKey, LoadSummary, aggregate_load};
pub use similarity::{CommonSubjectPolicy, sequence_ratio};
pub use summary::{FacultyEntry, SubjectCount, faculty_involved, subject_summary};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{
    ClashRecord, CommonSubjectRecord, DEFAULT_TIME_SLOTS, Snapshot, TimetableCollection, TimetableGrid,
};

/// Parameters shared by every analysis pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub policy: CommonSubjectPolicy,
    /// Canonical slot list; its length bounds the rows visited per grid.
    pub time_slots: Vec<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            policy: CommonSubjectPolicy::default(),
            time_slots: DEFAULT_TIME_SLOTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AnalysisOptions {
    pub fn index<'a>(&self, collection: &'a TimetableCollection) -> TimetableIndex<'a> {
        TimetableIndex::new(collection, self.time_slots.len())
    }
}

/// Full output of one pass, consumed by the API and exporters.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub policy: CommonSubjectPolicy,
    pub clashes: Vec<ClashRecord>,
    pub common_subjects: Vec<CommonSubjectRecord>,
    pub load: Vec<FacultyLoad>,
    pub directory: DirectoryReport,
}

/// Everything shown for one faculty: merged grid, per-semester grids and load.
#[derive(Debug, Clone, Serialize)]
pub struct FacultyOverview {
    pub code: String,
    pub name: String,
    pub consolidated: TimetableGrid,
    pub semesters: Vec<SemesterView>,
    pub load: FacultyLoadDetail,
    pub clashes: Vec<ClashRecord>,
}

/// Runs clash detection, load aggregation and the directory check over one snapshot.
pub fn analyze(snapshot: &Snapshot, options: &AnalysisOptions) -> AnalysisReport {
    let index = options.index(&snapshot.timetables);
    let clash_report = detect_clashes(index, &options.policy);
    let load = aggregate_load(index).ranked(&snapshot.faculties);
    let directory = check_directories(snapshot);

    tracing::info!(
        programs = snapshot.timetables.programs().len(),
        semesters = snapshot.timetables.semester_count(),
        clashes = clash_report.clashes.len(),
        common = clash_report.common_subjects.len(),
        faculty = load.len(),
        warnings = directory.warning_count(),
        "analysis pass finished"
    );

    AnalysisReport {
        generated_at: Utc::now(),
        policy: options.policy,
        clashes: clash_report.clashes,
        common_subjects: clash_report.common_subjects.into_iter().collect(),
        load,
        directory,
    }
}

pub fn faculty_overview(snapshot: &Snapshot, faculty: &str, options: &AnalysisOptions) -> FacultyOverview {
    let index = options.index(&snapshot.timetables);
    let consolidated = build_consolidated(index, faculty, &options.time_slots);
    let semesters = faculty_semester_views(index, faculty);
    let load = aggregate_load(index).detail_for(faculty, &snapshot.faculties);
    let clashes = detect_clashes(index, &options.policy)
        .clashes_for(faculty)
        .cloned()
        .collect();

    FacultyOverview {
        code: faculty.to_string(),
        name: snapshot.faculties.name_of(faculty).to_string(),
        consolidated,
        semesters,
        load,
        clashes,
    }
}
