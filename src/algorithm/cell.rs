// Parser de celdas: "P1 (RJ,SK)" -> ClassAssignment { P1, {RJ, SK} }
use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::ClassAssignment;

/// Substrings that mark a non-class cell. Parenthesised text in these cells is ignored.
pub const BREAK_MARKERS: [&str; 2] = ["Lunch", "Library"];

static ASSIGNMENT_RE: OnceLock<Regex> = OnceLock::new();

// subject text starting at a word char (after the previous group or a separator) + "(faculty list)"
fn assignment_regex() -> &'static Regex {
    ASSIGNMENT_RE.get_or_init(|| {
        Regex::new(r"(\w[^(),/;|&\r\n]*?)\s*\(([^()]*)\)").expect("assignment pattern is a valid regex")
    })
}

pub fn is_break_marker(cell: &str) -> bool {
    BREAK_MARKERS.iter().any(|m| cell.contains(m))
}

/// Extrae todas las asignaciones `subject (fac[,fac...])` de una celda.
///
/// Never fails: break markers, blank cells and text without a parenthesised
/// faculty group all yield an empty list. Occurrences with an empty subject or
/// an empty faculty list are dropped.
pub fn parse_cell(cell: &str) -> Vec<ClassAssignment> {
    if !cell.contains('(') || is_break_marker(cell) {
        return Vec::new();
    }
    assignment_regex()
        .captures_iter(cell)
        .filter_map(|caps| {
            let subject = caps.get(1)?.as_str().trim();
            if subject.is_empty() {
                return None;
            }
            let faculty_codes: BTreeSet<String> = caps
                .get(2)?
                .as_str()
                .split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string)
                .collect();
            if faculty_codes.is_empty() {
                return None;
            }
            Some(ClassAssignment {
                subject_code: subject.to_string(),
                faculty_codes,
            })
        })
        .collect()
}

/// All faculty codes mentioned by a cell.
pub fn cell_faculty_codes(cell: &str) -> BTreeSet<String> {
    parse_cell(cell)
        .into_iter()
        .flat_map(|a| a.faculty_codes)
        .collect()
}

/// Subject codes of a cell, in order of appearance and without repeats.
pub fn cell_subject_codes(cell: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for a in parse_cell(cell) {
        if !out.contains(&a.subject_code) {
            out.push(a.subject_code);
        }
    }
    out
}

pub fn cell_has_faculty(cell: &str, faculty: &str) -> bool {
    parse_cell(cell)
        .iter()
        .any(|a| a.faculty_codes.contains(faculty))
}
