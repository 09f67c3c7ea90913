use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::{
    Availability, Room, RoomType, ScheduleData, School, SchoolClass, Shifts, Subject, Teacher,
    default_capacity, default_lesson_duration,
};

/// Template offered for download by the console, one sample row per record type.
pub const CSV_TEMPLATE: &str = "\
Tipo (escola/turma/professor/disciplina),Nome,Dados Extras (Série/Turno/Matérias/Capacidade)
escola,Escola Modelo,Manhã;Tarde
turma,6º Ano A,6º Ano
professor,João Silva,Matemática;Física
disciplina,Matemática,
sala,Sala 101,30
";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Import file is empty")]
    Empty,
}

/// Records produced by one import run. Sections the file did not mention
/// stay `None`/empty and are left alone when the batch is applied.
#[derive(Debug, Default)]
pub struct ImportBatch {
    pub school: Option<School>,
    pub classes: Vec<SchoolClass>,
    pub teachers: Vec<Teacher>,
    pub subjects: Vec<Subject>,
    pub rooms: Vec<Room>,
    pub skipped: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportSummary {
    pub school: bool,
    pub classes: usize,
    pub teachers: usize,
    pub subjects: usize,
    pub rooms: usize,
    pub skipped: usize,
}

impl ImportBatch {
    /// Replaces each aggregate section the batch produced, wholesale.
    /// No merging with existing records.
    pub fn apply(self, data: &mut ScheduleData) -> ImportSummary {
        let summary = ImportSummary {
            school: self.school.is_some(),
            classes: self.classes.len(),
            teachers: self.teachers.len(),
            subjects: self.subjects.len(),
            rooms: self.rooms.len(),
            skipped: self.skipped,
        };

        if let Some(school) = self.school {
            data.school = Some(school);
        }
        if !self.classes.is_empty() {
            data.classes = self.classes;
        }
        if !self.teachers.is_empty() {
            data.teachers = self.teachers;
        }
        if !self.subjects.is_empty() {
            data.subjects.subjects = self.subjects;
        }
        if !self.rooms.is_empty() {
            data.subjects.rooms = self.rooms;
        }

        summary
    }
}

/// Parses the console's three-column bulk import format: type tag, name,
/// semicolon-delimited extras. One header row, comma separated, UTF-8.
pub fn parse_csv(input: &str) -> Result<ImportBatch, ImportError> {
    if input.trim().is_empty() {
        return Err(ImportError::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    // Synthetic ids: import moment plus row position. Unique within this
    // batch only, matching the console's behaviour.
    let batch_epoch = Utc::now().timestamp_millis() as u64;
    let mut batch = ImportBatch::default();

    for (index, record) in reader.records().enumerate() {
        let Ok(record) = record else {
            batch.skipped += 1;
            continue;
        };

        let kind = record.get(0).unwrap_or("").trim().to_lowercase();
        let name = record.get(1).unwrap_or("").trim();
        let extra = record.get(2).unwrap_or("").trim();

        if kind.is_empty() || name.is_empty() {
            batch.skipped += 1;
            continue;
        }

        let id = batch_epoch + index as u64;
        match kind.as_str() {
            "escola" => batch.school = Some(school_from_row(name, extra)),
            "turma" => batch.classes.push(SchoolClass {
                id,
                name: name.to_string(),
                grade: extra.to_string(),
                students: default_capacity(),
                subjects: BTreeMap::new(),
            }),
            "professor" => batch.teachers.push(Teacher {
                id,
                name: name.to_string(),
                subjects: split_extras(extra),
                availability: Availability::default(),
            }),
            "disciplina" => batch.subjects.push(Subject {
                id,
                name: name.to_string(),
                constraints: Vec::new(),
            }),
            "sala" => batch.rooms.push(Room {
                id,
                name: name.to_string(),
                capacity: extra.parse().unwrap_or_else(|_| default_capacity()),
                kind: RoomType::Standard,
            }),
            _ => batch.skipped += 1,
        }
    }

    tracing::debug!(skipped = batch.skipped, "bulk import parsed");
    Ok(batch)
}

fn school_from_row(name: &str, extra: &str) -> School {
    let shifts: Vec<String> = extra
        .split(';')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    School {
        name: name.to_string(),
        shifts: Shifts {
            morning: shifts.iter().any(|s| s == "manhã"),
            afternoon: shifts.iter().any(|s| s == "tarde"),
            night: shifts.iter().any(|s| s == "noite"),
        },
        lesson_duration: default_lesson_duration(),
        breaks: Vec::new(),
    }
}

fn split_extras(extra: &str) -> Vec<String> {
    extra
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
