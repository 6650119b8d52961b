use quickslot::algorithm::{aggregate_load, TimetableIndex};
use quickslot::models::{FacultyDirectory, TimetableCollection};

fn collection(json: &str) -> TimetableCollection {
    serde_json::from_str(json).expect("valid timetable JSON")
}

#[test]
fn single_cell_counts_one_hour() {
    let c = collection(r#"{"CS":{"SemI":[["10-11","P1 (RJ)","","","",""]]}}"#);
    let load = aggregate_load(TimetableIndex::unbounded(&c));
    assert_eq!(load.hours_for("RJ"), Some(1));
    assert_eq!(load.hours_for("AK"), None);
    assert!(!load.per_faculty.contains_key("AK"));
}

#[test]
fn hours_add_up_across_programs_and_co_teaching() {
    let c = collection(
        r#"{
            "CS": {"Semester I": [
                ["9-10", "P1 (RJ)", "L2 (AK,RJ)", "", "", ""],
                ["10-11", "P1 (RJ)", "", "", "", ""]
            ]},
            "IT": {"Semester I": [
                ["9-10", "", "", "P2 (RJ)", "", ""]
            ]}
        }"#,
    );
    let load = aggregate_load(TimetableIndex::unbounded(&c));
    assert_eq!(load.hours_for("RJ"), Some(4));
    assert_eq!(load.hours_for("AK"), Some(1));
    assert_eq!(load.total_hours(), 5);

    let faculties = FacultyDirectory::from([("RJ", "Dr. Joshi"), ("AK", "Prof. Kulkarni")]);
    let ranked = load.ranked(&faculties);
    assert_eq!(ranked[0].code, "RJ");
    assert_eq!(ranked[0].name, "Dr. Joshi");
    assert_eq!(ranked[1].hours, 1);

    let detail = load.detail_for("RJ", &faculties);
    assert_eq!(detail.total_hours, 4);
    let p1 = detail.rows.iter().find(|r| r.subject == "P1").unwrap();
    assert_eq!(p1.hours, 2);
}

#[test]
fn slot_limit_bounds_rows() {
    let c = collection(
        r#"{"CS":{"SemI":[
            ["9-10","P1 (RJ)","","","",""],
            ["10-11","P1 (RJ)","","","",""],
            ["11-12","P1 (RJ)","","","",""]
        ]}}"#,
    );
    let load = aggregate_load(TimetableIndex::new(&c, 2));
    assert_eq!(load.hours_for("RJ"), Some(2));
}

#[test]
fn unknown_faculty_ranks_with_placeholder_name() {
    let c = collection(r#"{"CS":{"SemI":[["10-11","P1 (ZZ)","","","",""]]}}"#);
    let ranked = aggregate_load(TimetableIndex::unbounded(&c)).ranked(&FacultyDirectory::new());
    assert_eq!(ranked[0].name, quickslot::models::UNKNOWN_NAME);
}

#[test]
fn joined_cell_breakdown_uses_clean_subjects() {
    let c = collection(r#"{"CS":{"SemI":[["10-11","P1 (RJ) & P2 (SK)","","","",""]]}}"#);
    let subjects: Vec<String> = aggregate_load(TimetableIndex::unbounded(&c))
        .breakdown_rows()
        .into_iter()
        .map(|r| r.subject)
        .collect();
    assert_eq!(subjects, vec!["P1", "P2"]);
}
