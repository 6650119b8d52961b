// Exportación CSV de los reportes de carga y choques.
use thiserror::Error;

use crate::algorithm::FacultyLoad;
use crate::models::ClashRecord;

pub const LOAD_CSV_HEADER: [&str; 3] = ["Faculty Code", "Name", "Total Hours/Week"];
pub const CLASH_CSV_HEADER: [&str; 9] = [
    "Faculty Code",
    "Program",
    "Semester",
    "Subject",
    "Clashing Program",
    "Clashing Semester",
    "Clashing Subject",
    "Day",
    "Time Slot",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush csv buffer: {0}")]
    Flush(String),

    #[error("csv output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer.into_inner().map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Ranked load table, same columns as the load distribution download.
pub fn load_to_csv(rows: &[FacultyLoad]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(LOAD_CSV_HEADER)?;
    for r in rows {
        let hours = r.hours.to_string();
        writer.write_record([r.code.as_str(), r.name.as_str(), hours.as_str()])?;
    }
    finish(writer)
}

pub fn clashes_to_csv(clashes: &[ClashRecord]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CLASH_CSV_HEADER)?;
    for c in clashes {
        writer.write_record([
            c.faculty.as_str(),
            c.program_a.as_str(),
            c.semester_a.as_str(),
            c.subject_a.as_str(),
            c.program_b.as_str(),
            c.semester_b.as_str(),
            c.subject_b.as_str(),
            c.day.label(),
            c.time_slot.as_str(),
        ])?;
    }
    finish(writer)
}
