//! Almacenamiento plano en JSON: `timetable.json`, `faculties.json`, `subjects.json`.
//!
//! The store only loads and saves whole documents. Analysis code receives a
//! [`Snapshot`] and never touches the filesystem; writers do a full
//! read-modify-write with no locking, so concurrent editors can overwrite each
//! other.

mod error;

pub use error::StoreError;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::models::{FacultyDirectory, Snapshot, SubjectDirectory, TimetableCollection};

pub const TIMETABLE_FILE: &str = "timetable.json";
pub const FACULTIES_FILE: &str = "faculties.json";
pub const SUBJECTS_FILE: &str = "subjects.json";

#[derive(Debug, Clone)]
pub struct FlatStore {
    dir: PathBuf,
}

impl FlatStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FlatStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn timetable_path(&self) -> PathBuf {
        self.dir.join(TIMETABLE_FILE)
    }

    pub fn faculties_path(&self) -> PathBuf {
        self.dir.join(FACULTIES_FILE)
    }

    pub fn subjects_path(&self) -> PathBuf {
        self.dir.join(SUBJECTS_FILE)
    }

    /// The timetable document is required.
    pub fn load_timetables(&self) -> Result<TimetableCollection, StoreError> {
        read_json(&self.timetable_path())
    }

    /// A missing faculty document loads as an empty directory.
    pub fn load_faculties(&self) -> Result<FacultyDirectory, StoreError> {
        read_optional_json(&self.faculties_path())
    }

    /// A missing subject document loads as an empty directory.
    pub fn load_subjects(&self) -> Result<SubjectDirectory, StoreError> {
        read_optional_json(&self.subjects_path())
    }

    pub fn load_snapshot(&self) -> Result<Snapshot, StoreError> {
        let snapshot = Snapshot {
            timetables: self.load_timetables()?,
            faculties: self.load_faculties()?,
            subjects: self.load_subjects()?,
        };
        tracing::debug!(
            dir = %self.dir.display(),
            programs = snapshot.timetables.programs().len(),
            faculty = snapshot.faculties.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    pub fn save_timetables(&self, timetables: &TimetableCollection) -> Result<(), StoreError> {
        write_json(&self.timetable_path(), timetables)
    }

    pub fn save_faculties(&self, faculties: &FacultyDirectory) -> Result<(), StoreError> {
        write_json(&self.faculties_path(), faculties)
    }

    pub fn save_subjects(&self, subjects: &SubjectDirectory) -> Result<(), StoreError> {
        write_json(&self.subjects_path(), subjects)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let text = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "document not found, using empty directory");
        return Ok(T::default());
    }
    read_json(path)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| StoreError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir).map_err(write_err)?;
        }
    }
    let mut f = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(write_err)?;
    f.write_all(text.as_bytes()).map_err(write_err)?;
    tracing::info!(path = %path.display(), bytes = text.len(), "document saved");
    Ok(())
}
