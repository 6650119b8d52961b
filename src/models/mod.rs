// Estructuras de datos principales: timetables, directorios y registros de choque.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Display name used whenever a faculty or subject code has no directory entry.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Canonical weekly time slots, one per grid row.
pub const DEFAULT_TIME_SLOTS: [&str; 8] = [
    "9-10", "10-11", "11-12", "12-1", "1-2", "2-3", "3-4", "4-5",
];

/// Wrapper key some older timetable documents nest the grid under.
const LEGACY_GRID_KEY: &str = "Semester I";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "MON")]
    Mon,
    #[serde(rename = "TUE")]
    Tue,
    #[serde(rename = "WED")]
    Wed,
    #[serde(rename = "THU")]
    Thu,
    #[serde(rename = "FRI")]
    Fri,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    /// Grid column -> weekday. Column 0 is the time label and maps to `None`.
    pub fn from_column(col: usize) -> Option<Weekday> {
        col.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn column(self) -> usize {
        self as usize + 1
    }

    pub fn label(self) -> &'static str {
        match self {
            Weekday::Mon => "MON",
            Weekday::Tue => "TUE",
            Weekday::Wed => "WED",
            Weekday::Thu => "THU",
            Weekday::Fri => "FRI",
        }
    }

    pub fn from_label(label: &str) -> Option<Weekday> {
        Self::ALL.into_iter().find(|d| d.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Time label + one cell per weekday.
pub const GRID_COLUMNS: usize = Weekday::ALL.len() + 1;

/// One semester's weekly grid: `[time_slot, MON, TUE, WED, THU, FRI]` per row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimetableGrid {
    pub rows: Vec<Vec<String>>,
}

impl TimetableGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        TimetableGrid { rows }
    }

    /// Grid with one empty row per time slot.
    pub fn blank<S: AsRef<str>>(time_slots: &[S]) -> Self {
        let rows = time_slots
            .iter()
            .map(|slot| {
                let mut row = vec![String::new(); GRID_COLUMNS];
                row[0] = slot.as_ref().to_string();
                row
            })
            .collect();
        TimetableGrid { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn time_slot(&self, row: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.first()).map(String::as_str)
    }

    pub fn cell(&self, row: usize, day: Weekday) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(day.column())).map(String::as_str)
    }

    /// Indices of rows whose column count differs from `GRID_COLUMNS`.
    pub fn irregular_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.len() != GRID_COLUMNS)
            .map(|(i, _)| i)
            .collect()
    }

    /// True when at least one weekday cell is non-blank.
    pub fn has_entries(&self) -> bool {
        self.rows
            .iter()
            .any(|r| r.iter().skip(1).any(|c| !c.trim().is_empty()))
    }

    // Lectura tolerante: acepta la lista de filas directa o un objeto que la envuelve.
    fn from_json(label: &str, value: &Value) -> Option<TimetableGrid> {
        match value {
            Value::Array(rows) => {
                let rows = rows
                    .iter()
                    .enumerate()
                    .filter_map(|(i, row)| match row {
                        Value::Array(cells) => Some(cells.iter().map(cell_text).collect()),
                        _ => {
                            tracing::warn!(semester = label, row = i, "skipping non-array timetable row");
                            None
                        }
                    })
                    .collect();
                Some(TimetableGrid { rows })
            }
            Value::Object(inner) => inner
                .get(label)
                .or_else(|| inner.get(LEGACY_GRID_KEY))
                .filter(|v| v.is_array())
                .and_then(|v| TimetableGrid::from_json(label, v)),
            _ => None,
        }
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemesterTimetable {
    pub label: String,
    pub grid: TimetableGrid,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramTimetables {
    pub name: String,
    pub semesters: Vec<SemesterTimetable>,
}

impl ProgramTimetables {
    pub fn semester(&self, label: &str) -> Option<&SemesterTimetable> {
        self.semesters.iter().find(|s| s.label == label)
    }

    pub fn semester_labels(&self) -> Vec<&str> {
        self.semesters.iter().map(|s| s.label.as_str()).collect()
    }
}

/// program -> semester -> grid, kept in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimetableCollection {
    programs: Vec<ProgramTimetables>,
}

impl TimetableCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn programs(&self) -> &[ProgramTimetables] {
        &self.programs
    }

    pub fn program(&self, name: &str) -> Option<&ProgramTimetables> {
        self.programs.iter().find(|p| p.name == name)
    }

    pub fn grid(&self, program: &str, semester: &str) -> Option<&TimetableGrid> {
        self.program(program)
            .and_then(|p| p.semester(semester))
            .map(|s| &s.grid)
    }

    /// Inserts or replaces a semester grid. New programs and semesters go last;
    /// a replaced grid keeps its position and the previous value is returned.
    pub fn insert_grid(&mut self, program: &str, semester: &str, grid: TimetableGrid) -> Option<TimetableGrid> {
        let idx = match self.programs.iter().position(|p| p.name == program) {
            Some(i) => i,
            None => {
                self.programs.push(ProgramTimetables {
                    name: program.to_string(),
                    semesters: Vec::new(),
                });
                self.programs.len() - 1
            }
        };
        let entry = &mut self.programs[idx];
        match entry.semesters.iter_mut().find(|s| s.label == semester) {
            Some(existing) => Some(std::mem::replace(&mut existing.grid, grid)),
            None => {
                entry.semesters.push(SemesterTimetable {
                    label: semester.to_string(),
                    grid,
                });
                None
            }
        }
    }

    /// `(program, semester, grid)` in document order.
    pub fn grids(&self) -> impl Iterator<Item = (&str, &str, &TimetableGrid)> {
        self.programs.iter().flat_map(|p| {
            p.semesters
                .iter()
                .map(move |s| (p.name.as_str(), s.label.as_str(), &s.grid))
        })
    }

    pub fn semester_count(&self) -> usize {
        self.programs.iter().map(|p| p.semesters.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

struct SemesterMap<'a>(&'a [SemesterTimetable]);

impl Serialize for SemesterMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for s in self.0 {
            map.serialize_entry(&s.label, &s.grid)?;
        }
        map.end()
    }
}

impl Serialize for TimetableCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.programs.len()))?;
        for p in &self.programs {
            map.serialize_entry(&p.name, &SemesterMap(&p.semesters))?;
        }
        map.end()
    }
}

struct CollectionVisitor;

impl<'de> Visitor<'de> for CollectionVisitor {
    type Value = TimetableCollection;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of program -> semester -> timetable rows")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut collection = TimetableCollection::new();
        while let Some((program, semesters)) = access.next_entry::<String, Value>()? {
            let Value::Object(semesters) = semesters else {
                tracing::warn!(program = %program, "skipping program whose value is not an object");
                continue;
            };
            if collection.program(&program).is_some() {
                tracing::warn!(program = %program, "duplicate program key, later entry wins");
            }
            for (label, value) in semesters.iter() {
                match TimetableGrid::from_json(label, value) {
                    Some(grid) => {
                        collection.insert_grid(&program, label, grid);
                    }
                    None => {
                        tracing::warn!(program = %program, semester = %label, "skipping semester with unrecognised grid shape");
                    }
                }
            }
        }
        Ok(collection)
    }
}

impl<'de> Deserialize<'de> for TimetableCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CollectionVisitor)
    }
}

/// faculty code -> display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacultyDirectory {
    names: BTreeMap<String, String>,
}

impl FacultyDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: &str, name: &str) -> Option<String> {
        self.names.insert(code.to_string(), name.to_string())
    }

    pub fn name_of(&self, code: &str) -> &str {
        self.names.get(code).map(String::as_str).unwrap_or(UNKNOWN_NAME)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.names.contains_key(code)
    }

    /// Codes in ascending order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FacultyDirectory {
    fn from(entries: [(&str, &str); N]) -> Self {
        let mut dir = FacultyDirectory::new();
        for (code, name) in entries {
            dir.insert(code, name);
        }
        dir
    }
}

/// program -> semester -> subject code -> display name.
///
/// Missing programs or semesters read as empty maps, so lookups never fail
/// and `entry` can repair a hole additively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectDirectory {
    programs: BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>,
}

impl SubjectDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn semester(&self, program: &str, semester: &str) -> Option<&BTreeMap<String, String>> {
        self.programs.get(program).and_then(|p| p.get(semester))
    }

    pub fn codes(&self, program: &str, semester: &str) -> BTreeSet<&str> {
        self.semester(program, semester)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn name_of(&self, program: &str, semester: &str, code: &str) -> &str {
        self.semester(program, semester)
            .and_then(|m| m.get(code))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_NAME)
    }

    pub fn entry(&mut self, program: &str, semester: &str) -> &mut BTreeMap<String, String> {
        self.programs
            .entry(program.to_string())
            .or_default()
            .entry(semester.to_string())
            .or_default()
    }

    pub fn insert(&mut self, program: &str, semester: &str, code: &str, name: &str) -> Option<String> {
        self.entry(program, semester).insert(code.to_string(), name.to_string())
    }
}

/// Parsed form of one `SUBJECT (FAC[,FAC...])` occurrence inside a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassAssignment {
    pub subject_code: String,
    pub faculty_codes: BTreeSet<String>,
}

/// Identity under which clash detection groups assignments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ScheduleKey {
    pub faculty: String,
    pub day: Weekday,
    pub time_slot: String,
}

impl ScheduleKey {
    pub fn new(faculty: &str, day: Weekday, time_slot: &str) -> Self {
        ScheduleKey {
            faculty: faculty.to_string(),
            day,
            time_slot: time_slot.to_string(),
        }
    }
}

/// A faculty double-booking. `*_a` is the first entry seen for the key,
/// `*_b` the later one that collided with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClashRecord {
    pub faculty: String,
    pub program_a: String,
    pub semester_a: String,
    pub subject_a: String,
    pub program_b: String,
    pub semester_b: String,
    pub subject_b: String,
    pub day: Weekday,
    pub time_slot: String,
    pub similarity: f64,
}

impl fmt::Display for ClashRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} has clash: {} - {} - {} overlaps with {} - {} - {} at {} {}",
            self.faculty,
            self.program_a,
            self.semester_a,
            self.subject_a,
            self.program_b,
            self.semester_b,
            self.subject_b,
            self.day,
            self.time_slot
        )
    }
}

/// Two near-identical subjects sharing a key: one combined lecture, not a clash.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CommonSubjectRecord {
    pub subject_a: String,
    pub subject_b: String,
    pub key: ScheduleKey,
}

/// Read-only inputs of one analysis pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timetables: TimetableCollection,
    pub faculties: FacultyDirectory,
    pub subjects: SubjectDirectory,
}
