use std::collections::BTreeSet;

use quickslot::algorithm::{
    build_consolidated, cell_has_faculty, consolidated_positions, faculty_semester_views, AnalysisOptions,
    TimetableIndex,
};
use quickslot::models::{TimetableCollection, Weekday, DEFAULT_TIME_SLOTS};

fn sample() -> TimetableCollection {
    serde_json::from_str(
        r#"{
            "CS": {"Semester I": [
                ["9-10", "P1 (RJ)", "", "", "", ""],
                ["10-11", "", "L1 (AK,RJ)", "", "", ""]
            ]},
            "IT": {"Semester III": [
                ["9-10", "", "", "", "", "DS (RJ)"],
                ["10-11", "OS (AK)", "", "", "", ""]
            ]}
        }"#,
    )
    .expect("valid timetable JSON")
}

#[test]
fn consolidated_grid_matches_source_positions() {
    let c = sample();
    let grid = build_consolidated(TimetableIndex::unbounded(&c), "RJ", &DEFAULT_TIME_SLOTS);

    assert_eq!(grid.len(), DEFAULT_TIME_SLOTS.len());
    assert_eq!(grid.cell(0, Weekday::Mon), Some("P1 (RJ)"));
    assert_eq!(grid.cell(0, Weekday::Fri), Some("DS (RJ)"));
    assert_eq!(grid.cell(1, Weekday::Tue), Some("L1 (AK,RJ)"));
    assert_eq!(grid.cell(1, Weekday::Mon), Some(""));

    let expected: BTreeSet<(String, Weekday)> = [
        ("9-10".to_string(), Weekday::Mon),
        ("9-10".to_string(), Weekday::Fri),
        ("10-11".to_string(), Weekday::Tue),
    ]
    .into_iter()
    .collect();
    assert_eq!(consolidated_positions(&grid, "RJ"), expected);

    for row in grid.rows() {
        for cell in row.iter().skip(1).filter(|c| !c.is_empty()) {
            assert!(cell_has_faculty(cell, "RJ"));
        }
    }
}

#[test]
fn unscheduled_faculty_gets_blank_grid() {
    let c = sample();
    let options = AnalysisOptions::default();
    let grid = build_consolidated(options.index(&c), "ZZ", &options.time_slots);
    assert!(!grid.has_entries());
    assert_eq!(grid.time_slot(7), Some("4-5"));
    assert!(faculty_semester_views(options.index(&c), "ZZ").is_empty());
}

#[test]
fn semester_views_keep_only_the_faculty() {
    let c = sample();
    let views = faculty_semester_views(TimetableIndex::unbounded(&c), "AK");
    assert_eq!(views.len(), 2);
    assert_eq!(views[1].program, "IT");
    assert_eq!(views[1].grid.cell(0, Weekday::Fri), Some(""));
    assert_eq!(views[1].grid.cell(1, Weekday::Mon), Some("OS (AK)"));
}
