// Detección de choques de docentes: misma (faculty, día, franja) con distintas asignaturas.
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::algorithm::cell::parse_cell;
use crate::algorithm::index::TimetableIndex;
use crate::algorithm::similarity::CommonSubjectPolicy;
use crate::models::{ClashRecord, CommonSubjectRecord, ScheduleKey};

/// First assignment seen for a ScheduleKey. Never evicted.
#[derive(Debug)]
struct SlotOwner<'a> {
    subject: String,
    program: &'a str,
    semester: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClashReport {
    pub clashes: Vec<ClashRecord>,
    pub common_subjects: BTreeSet<CommonSubjectRecord>,
}

impl ClashReport {
    pub fn is_clear(&self) -> bool {
        self.clashes.is_empty()
    }

    pub fn clashes_for<'r>(&'r self, faculty: &'r str) -> impl Iterator<Item = &'r ClashRecord> {
        self.clashes.iter().filter(move |c| c.faculty == faculty)
    }
}

/// Single pass over the index in its fixed order.
///
/// For each `(faculty, day, time_slot)` the first assignment becomes the owner.
/// Every later assignment on that key is compared with the owner only (not with
/// other later arrivals): the same class seen twice is ignored, near-identical
/// subjects become a [`CommonSubjectRecord`], anything else a [`ClashRecord`].
/// Unparseable cells are skipped.
pub fn detect_clashes(index: TimetableIndex<'_>, policy: &CommonSubjectPolicy) -> ClashReport {
    let mut owners: BTreeMap<ScheduleKey, SlotOwner<'_>> = BTreeMap::new();
    let mut report = ClashReport::default();

    for entry in index.entries() {
        for assignment in parse_cell(entry.cell) {
            for faculty in &assignment.faculty_codes {
                let key = ScheduleKey::new(faculty, entry.day, entry.time_slot);
                match owners.entry(key) {
                    Entry::Vacant(slot) => {
                        slot.insert(SlotOwner {
                            subject: assignment.subject_code.clone(),
                            program: entry.program,
                            semester: entry.semester,
                        });
                    }
                    Entry::Occupied(slot) => {
                        let owner = slot.get();
                        if owner.program == entry.program
                            && owner.semester == entry.semester
                            && owner.subject == assignment.subject_code
                        {
                            continue;
                        }

                        let (common, score) = policy.classify(&owner.subject, &assignment.subject_code);
                        if common {
                            report.common_subjects.insert(CommonSubjectRecord {
                                subject_a: owner.subject.clone(),
                                subject_b: assignment.subject_code.clone(),
                                key: slot.key().clone(),
                            });
                        } else {
                            tracing::debug!(
                                faculty = %faculty,
                                day = %entry.day,
                                time_slot = entry.time_slot,
                                first = %owner.subject,
                                second = %assignment.subject_code,
                                score,
                                "faculty clash"
                            );
                            report.clashes.push(ClashRecord {
                                faculty: faculty.clone(),
                                program_a: owner.program.to_string(),
                                semester_a: owner.semester.to_string(),
                                subject_a: owner.subject.clone(),
                                program_b: entry.program.to_string(),
                                semester_b: entry.semester.to_string(),
                                subject_b: assignment.subject_code.clone(),
                                day: entry.day,
                                time_slot: entry.time_slot.to_string(),
                                similarity: score,
                            });
                        }
                    }
                }
            }
        }
    }

    report
}
