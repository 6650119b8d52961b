use serde::{Deserialize, Serialize};

use crate::algorithm::{CommonSubjectPolicy, FacultyEntry, SubjectCount};
use crate::models::{GRID_COLUMNS, TimetableGrid};

/// Body de `PUT /timetables/{program}/{semester}`.
///
/// # JSON esperado:
/// ```json
/// {
///   "rows": [
///     ["9-10", "P1 (RJ)", "", "L1 (AK,MN)", "", ""],
///     ["12-1", "Lunch", "Lunch", "Lunch", "Lunch", "Lunch"]
///   ]
/// }
/// ```
///
/// Every row must carry the time label plus one cell per weekday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridUpdate {
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrregularRows(pub Vec<usize>);

impl std::fmt::Display for IrregularRows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rows {:?} must have exactly {} columns", self.0, GRID_COLUMNS)
    }
}

impl GridUpdate {
    pub fn into_grid(self) -> Result<TimetableGrid, IrregularRows> {
        let grid = TimetableGrid::new(self.rows);
        let irregular = grid.irregular_rows();
        if irregular.is_empty() { Ok(grid) } else { Err(IrregularRows(irregular)) }
    }
}

pub fn parse_grid_update(json_str: &str) -> Result<GridUpdate, serde_json::Error> {
    serde_json::from_str::<GridUpdate>(json_str)
}

/// Query string accepted by the report endpoints: `?policy=admin|checker&format=json|csv`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    pub policy: Option<String>,
    pub format: Option<String>,
}

impl ReportQuery {
    /// Falls back to `default` when no policy is given; unknown names are an error.
    pub fn resolve_policy(&self, default: CommonSubjectPolicy) -> Result<CommonSubjectPolicy, String> {
        match self.policy.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            None => Ok(default),
            Some(name) => CommonSubjectPolicy::from_name(name)
                .ok_or_else(|| format!("unknown policy '{}', expected 'admin' or 'checker'", name)),
        }
    }

    pub fn wants_csv(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.trim().eq_ignore_ascii_case("csv"))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgramListing {
    pub program: String,
    pub semesters: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridView {
    pub program: String,
    pub semester: String,
    pub grid: TimetableGrid,
    pub subjects: Vec<SubjectCount>,
    pub faculty: Vec<FacultyEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_update_checks_row_width() {
        let ok = parse_grid_update(r#"{"rows": [["9-10", "P1 (RJ)", "", "", "", ""]]}"#).unwrap();
        assert_eq!(ok.into_grid().unwrap().len(), 1);

        let bad = parse_grid_update(r#"{"rows": [["9-10", "", "", "", "", ""], ["10-11", "P1 (RJ)"]]}"#).unwrap();
        assert_eq!(bad.into_grid(), Err(IrregularRows(vec![1])));
    }

    #[test]
    fn report_query_policy() {
        let q = ReportQuery::default();
        assert_eq!(q.resolve_policy(CommonSubjectPolicy::admin()), Ok(CommonSubjectPolicy::admin()));

        let q = ReportQuery {
            policy: Some("checker".into()),
            format: Some("CSV".into()),
        };
        assert_eq!(q.resolve_policy(CommonSubjectPolicy::admin()), Ok(CommonSubjectPolicy::checker()));
        assert!(q.wants_csv());

        let q = ReportQuery {
            policy: Some("fuzzy".into()),
            format: None,
        };
        assert!(q.resolve_policy(CommonSubjectPolicy::admin()).is_err());
    }
}
